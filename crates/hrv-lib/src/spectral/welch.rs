use super::interp::{resample, uniform_grid, InterpolationKind};
use super::{Psd, SpectralEstimator};
use crate::error::{ensure_len, ConfigError, Result};
use realfft::RealFftPlanner;
use std::f64::consts::PI;

const DEFAULT_SEGMENT_LEN: usize = 256;

/// Welch's averaged periodogram on the NN series resampled at
/// `sampling_frequency` Hz.
#[derive(Debug, Clone, Copy)]
pub struct Welch {
    pub sampling_frequency: f64,
    pub interpolation: InterpolationKind,
    segment_len: usize,
}

impl Welch {
    pub fn new(sampling_frequency: f64, interpolation: InterpolationKind) -> Result<Self> {
        if !(sampling_frequency.is_finite() && sampling_frequency > 0.0) {
            return Err(ConfigError::InvalidSamplingFrequency(sampling_frequency).into());
        }
        Ok(Self {
            sampling_frequency,
            interpolation,
            segment_len: DEFAULT_SEGMENT_LEN,
        })
    }
}

impl SpectralEstimator for Welch {
    fn estimate(&self, times: &[f64], nn_ms: &[f64]) -> Result<Psd> {
        ensure_len("Welch PSD", 2, nn_ms.len())?;
        let end = times.last().copied().unwrap_or(0.0);
        let grid = uniform_grid(end, self.sampling_frequency);
        ensure_len("Welch PSD resampling", 2, grid.len())?;
        let mut signal = resample(times, nn_ms, &grid, self.interpolation);
        let mean = signal.iter().sum::<f64>() / signal.len() as f64;
        for x in signal.iter_mut() {
            *x -= mean;
        }
        welch_psd(&signal, self.sampling_frequency, self.segment_len)
    }
}

/// One-sided density estimate: segments of `min(segment_len, n)` samples,
/// 50 % overlap, mean removed per segment.
pub(crate) fn welch_psd(signal: &[f64], fs: f64, segment_len: usize) -> Result<Psd> {
    let n = signal.len();
    let window = segment_len.min(n);
    ensure_len("Welch PSD segment", 2, window)?;
    let overlap = window / 2;
    let step = window - overlap;
    let segments = (n - overlap) / step;

    let mut planner = RealFftPlanner::<f64>::new();
    let r2c = planner.plan_fft_forward(window);
    let window_func = hann(window);
    let scale = 1.0 / (fs * window_func.iter().map(|w| w * w).sum::<f64>());

    let bins = window / 2 + 1;
    let frequencies: Vec<f64> = (0..bins).map(|k| k as f64 * fs / window as f64).collect();
    let mut powers = vec![0.0; bins];
    let mut spectrum = r2c.make_output_vec();
    for segment in 0..segments {
        let slice = &signal[segment * step..segment * step + window];
        let seg_mean = slice.iter().sum::<f64>() / window as f64;
        let mut frame: Vec<f64> = slice
            .iter()
            .zip(window_func.iter())
            .map(|(x, w)| (x - seg_mean) * w)
            .collect();
        r2c.process(&mut frame, &mut spectrum)?;
        for (k, val) in spectrum.iter().enumerate() {
            let one_sided = if k == 0 || (window % 2 == 0 && k == window / 2) {
                1.0
            } else {
                2.0
            };
            powers[k] += one_sided * val.norm_sqr() * scale;
        }
    }
    for p in powers.iter_mut() {
        *p /= segments as f64;
    }
    Ok(Psd {
        frequencies,
        powers,
    })
}

/// Periodic Hann window.
pub fn hann(size: usize) -> Vec<f64> {
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / (size as f64)).cos()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::spectral::test_signals::peak_frequency;

    fn assert_close(actual: f64, expected: f64, rel_tol: f64) {
        let tol = expected.abs().max(1.0) * rel_tol;
        let diff = (actual - expected).abs();
        assert!(
            diff <= tol,
            "expected {expected}, got {actual} (diff {diff} > tol {tol})"
        );
    }

    #[test]
    fn hann_is_periodic() {
        let w = hann(4);
        assert_close(w[0], 0.0, 1e-12);
        assert_close(w[1], 0.5, 1e-12);
        assert_close(w[2], 1.0, 1e-12);
        assert_close(w[3], 0.5, 1e-12);
    }

    #[test]
    fn sine_power_matches_variance() {
        // Integrated density of a unit sine is its variance, 0.5.
        let fs = 4.0;
        let signal: Vec<f64> = (0..2048)
            .map(|i| (2.0 * PI * 0.25 * i as f64 / fs).sin())
            .collect();
        let psd = welch_psd(&signal, fs, 256).unwrap();
        let df = psd.frequencies[1] - psd.frequencies[0];
        let total: f64 = psd.powers.iter().sum::<f64>() * df;
        // Hann leakage spreads the line over three bins; the sum is exact.
        assert_close(total, 0.5, 0.02);
        assert_close(peak_frequency(&psd.frequencies, &psd.powers), 0.25, 1e-9);
    }

    #[test]
    fn short_signal_uses_a_single_segment() {
        let psd = welch_psd(&[1.0, -1.0, 1.0, -1.0, 1.0, -1.0], 2.0, 256).unwrap();
        assert_eq!(psd.len(), 4);
        assert_close(*psd.frequencies.last().unwrap(), 1.0, 1e-12);
    }

    #[test]
    fn degenerate_segment_length_is_an_error() {
        let signal = [1.0, -1.0, 1.0, -1.0];
        for segment_len in [0, 1] {
            assert!(matches!(
                welch_psd(&signal, 4.0, segment_len),
                Err(Error::InsufficientData { actual, .. }) if actual == segment_len
            ));
        }
    }

    #[test]
    fn rejects_non_positive_sampling_frequency() {
        assert!(Welch::new(0.0, InterpolationKind::Linear).is_err());
        assert!(Welch::new(f64::NAN, InterpolationKind::Linear).is_err());
    }
}
