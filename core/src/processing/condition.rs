use crate::acquisition::window::ChannelData;
use crate::math::{FftHelper, StatsHelper};
use crate::prelude::{ArrayParams, EngineError, EngineResult};

/// Per-station filtered, pressure-unit trace derived from one window. Owned
/// by a single processing cycle.
#[derive(Debug, Clone)]
pub struct ConditionedTrace {
    /// Index of the station within its array.
    pub station: usize,
    pub scnl: String,
    pub samples: Vec<f64>,
    pub sample_rate: f64,
}

/// Detrends, tapers, bandpass-filters and calibrates raw channel buffers.
pub struct SignalConditioner {
    f1: f64,
    f2: f64,
    taper_val: f64,
    digouti: f64,
    min_seconds: f64,
}

impl SignalConditioner {
    pub fn from_params(params: &ArrayParams) -> Self {
        Self {
            f1: params.f1,
            f2: params.f2,
            taper_val: params.taper_val,
            digouti: params.digouti,
            min_seconds: params.duration - params.latency,
        }
    }

    /// Conditions one channel. A buffer shorter than the window duration
    /// minus the allowed latency drops the station from the cycle.
    pub fn condition(
        &self,
        station: usize,
        channel: &ChannelData,
        sample_rate: f64,
    ) -> EngineResult<ConditionedTrace> {
        let need = (self.min_seconds * sample_rate).floor() as usize;
        if channel.samples.len() < need {
            return Err(EngineError::InsufficientData {
                station: channel.scnl.clone(),
                have: channel.samples.len(),
                need,
            });
        }

        let mut samples = channel.samples.clone();
        StatsHelper::demean(&mut samples);
        apply_cosine_taper(&mut samples, (self.taper_val * sample_rate).round() as usize);
        let mut samples = zero_phase_bandpass(&samples, sample_rate, self.f1, self.f2);
        for v in samples.iter_mut() {
            *v *= self.digouti;
        }

        Ok(ConditionedTrace {
            station,
            scnl: channel.scnl.clone(),
            samples,
            sample_rate,
        })
    }
}

/// Symmetric cosine taper over `taper_samples` at each end of the trace.
fn apply_cosine_taper(samples: &mut [f64], taper_samples: usize) {
    let n = samples.len();
    let taper = taper_samples.min(n / 2);
    if taper == 0 {
        return;
    }
    for i in 0..taper {
        let w = 0.5 * (1.0 - (std::f64::consts::PI * i as f64 / taper as f64).cos());
        samples[i] *= w;
        samples[n - 1 - i] *= w;
    }
}

/// Zero-phase bandpass: forward FFT, squared second-order Butterworth
/// magnitude response, inverse FFT. Equivalent to a forward-backward filter
/// pass; phase distortion would bias the downstream lag search.
fn zero_phase_bandpass(samples: &[f64], sample_rate: f64, f1: f64, f2: f64) -> Vec<f64> {
    let n = samples.len();
    if n == 0 {
        return Vec::new();
    }
    let helper = FftHelper::new(n);
    let mut spectrum = helper.forward(samples);
    for (k, bin) in spectrum.iter_mut().enumerate() {
        let f = helper.bin_frequency(k, sample_rate).abs();
        let hp = {
            let r = (f / f1).powi(4);
            r / (1.0 + r)
        };
        let lp = 1.0 / (1.0 + (f / f2).powi(4));
        *bin *= hp * lp;
    }
    helper.inverse(&mut spectrum)
}
