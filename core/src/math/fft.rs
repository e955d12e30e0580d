use num_complex::Complex64;
use rustfft::{num_traits::Zero, Fft, FftPlanner};
use std::sync::Arc;

/// Helper that wraps a matched forward/inverse `rustfft` plan pair for
/// zero-phase filtering of real-valued traces.
pub struct FftHelper {
    fwd: Arc<dyn Fft<f64>>,
    inv: Arc<dyn Fft<f64>>,
    size: usize,
}

impl FftHelper {
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fwd = planner.plan_fft_forward(size);
        let inv = planner.plan_fft_inverse(size);
        Self { fwd, inv, size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Transforms a real trace, zero-padding or truncating to the plan size.
    pub fn forward(&self, input: &[f64]) -> Vec<Complex64> {
        let mut buffer: Vec<Complex64> = input
            .iter()
            .take(self.size)
            .map(|&value| Complex64::new(value, 0.0))
            .collect();
        buffer.resize(self.size, Complex64::zero());
        self.fwd.process(&mut buffer);
        buffer
    }

    /// Inverse transform back to a real trace, including the 1/N scaling
    /// rustfft leaves to the caller.
    pub fn inverse(&self, spectrum: &mut [Complex64]) -> Vec<f64> {
        self.inv.process(spectrum);
        let scale = 1.0 / self.size as f64;
        spectrum.iter().map(|c| c.re * scale).collect()
    }

    /// Frequency in Hz of spectrum bin `k` (negative above Nyquist).
    pub fn bin_frequency(&self, k: usize, sample_rate: f64) -> f64 {
        let n = self.size as f64;
        let k = k as f64;
        if k <= n / 2.0 {
            k * sample_rate / n
        } else {
            (k - n) * sample_rate / n
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_inverse_round_trips() {
        let helper = FftHelper::new(8);
        let input = [1.0, 0.5, -0.25, 0.0, 0.75, -1.0, 0.25, 0.0];
        let mut spectrum = helper.forward(&input);
        let output = helper.inverse(&mut spectrum);
        for (a, b) in input.iter().zip(output.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn bin_frequency_folds_above_nyquist() {
        let helper = FftHelper::new(8);
        assert_eq!(helper.bin_frequency(0, 50.0), 0.0);
        assert_eq!(helper.bin_frequency(4, 50.0), 25.0);
        assert_eq!(helper.bin_frequency(5, 50.0), -18.75);
    }
}
