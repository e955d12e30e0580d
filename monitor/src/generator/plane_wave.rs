use infracore::acquisition::{ChannelData, FetchError, WaveformProvider, Window};
use infracore::array::InfrasoundArray;
use infracore::math::GeoHelper;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Configuration for the synthetic plane-wave source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    /// Back-azimuth the arrival appears to come from, degrees from north.
    pub azimuth: f64,
    /// Apparent horizontal velocity, km/s.
    pub velocity_kms: f64,
    /// Peak pressure of the arrival, Pa. Zero yields a noise-only window.
    pub amplitude_pa: f64,
    /// Counts per pascal, the inverse of the array's digouti calibration.
    pub counts_per_pa: f64,
    /// Carrier frequency of the wavelet, Hz.
    pub carrier_hz: f64,
    /// Uniform noise amplitude, Pa.
    pub noise_pa: f64,
    pub sample_rate: f64,
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            azimuth: 0.0,
            velocity_kms: 0.35,
            amplitude_pa: 1.2,
            counts_per_pa: 1.0,
            carrier_hz: 4.0,
            noise_pa: 0.01,
            sample_rate: 50.0,
            seed: 0,
        }
    }
}

/// Waveform source that injects a plane-wave burst across the array from a
/// fixed azimuth, for offline runs and tests. Deterministic for a given
/// seed and station order.
pub struct SyntheticProvider {
    array: InfrasoundArray,
    config: SyntheticConfig,
}

impl SyntheticProvider {
    pub fn new(array: InfrasoundArray, config: SyntheticConfig) -> Self {
        Self { array, config }
    }

    /// Arrival-time offset of a station relative to the array reference, in
    /// seconds. Positive for stations the wavefront sweeps later.
    fn delay_seconds(&self, scnl: &str) -> Option<f64> {
        let index = self.array.index_of(scnl)?;
        let station = &self.array.stations()[index];
        let reference = self.array.reference();
        let (east, north) = GeoHelper::tangent_offset_m(
            reference.lat,
            reference.lon,
            station.lat,
            station.lon,
        );
        // Propagation points away from the source azimuth.
        let prop = (self.config.azimuth + 180.0).to_radians();
        Some((east * prop.sin() + north * prop.cos()) / (self.config.velocity_kms * 1000.0))
    }
}

impl WaveformProvider for SyntheticProvider {
    fn fetch(&self, station_ids: &[String], start: f64, end: f64) -> Result<Window, FetchError> {
        let duration = end - start;
        if duration <= 0.0 {
            return Err(FetchError::Failure(format!(
                "empty window {start} to {end}"
            )));
        }
        let n = (duration * self.config.sample_rate).round() as usize;
        let mut rng = StdRng::seed_from_u64(self.config.seed);
        let center = duration / 2.0;

        let channels: Vec<ChannelData> = station_ids
            .iter()
            .filter_map(|scnl| {
                let delay = self.delay_seconds(scnl)?;
                let samples = (0..n)
                    .map(|k| {
                        let t = k as f64 / self.config.sample_rate - delay;
                        let centered = t - center;
                        let burst = self.config.amplitude_pa
                            * (-centered * centered / 8.0).exp()
                            * (2.0 * PI * self.config.carrier_hz * t).sin();
                        let jitter = if self.config.noise_pa > 0.0 {
                            rng.gen_range(-self.config.noise_pa..self.config.noise_pa)
                        } else {
                            0.0
                        };
                        (burst + jitter) * self.config.counts_per_pa
                    })
                    .collect();
                Some(ChannelData::new(scnl, samples))
            })
            .collect();

        if channels.is_empty() {
            return Err(FetchError::NoData(station_ids.join(",")));
        }
        Ok(Window::new(channels, self.config.sample_rate, start, end))
    }
}
