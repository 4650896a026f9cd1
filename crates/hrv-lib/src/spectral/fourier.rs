use super::{Psd, SpectralEstimator};
use crate::error::{ensure_len, Error, Result};
use realfft::RealFftPlanner;

/// Plain DFT periodogram, `|X_k|² / N`, treating the beats as uniformly
/// spaced by the first time step. Only strictly positive frequencies are kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct Fourier;

impl SpectralEstimator for Fourier {
    fn estimate(&self, times: &[f64], nn_ms: &[f64]) -> Result<Psd> {
        ensure_len("Fourier periodogram", 2, nn_ms.len())?;
        let n = nn_ms.len();
        let dt = times[1] - times[0];
        if !(dt > 0.0) {
            return Err(Error::InsufficientData {
                operation: "Fourier periodogram",
                required: 2,
                actual: 1,
            });
        }

        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(n);
        let mut buffer = nn_ms.to_vec();
        let mut spectrum = r2c.make_output_vec();
        r2c.process(&mut buffer, &mut spectrum)?;

        // positive half of the DFT sample frequencies k / (n dt)
        let positive = (n - 1) / 2;
        let frequencies = (1..=positive).map(|k| k as f64 / (n as f64 * dt)).collect();
        let powers = spectrum[1..=positive]
            .iter()
            .map(|c| c.norm_sqr() / n as f64)
            .collect();
        Ok(Psd {
            frequencies,
            powers,
        })
    }
}
