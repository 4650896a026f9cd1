use super::{Psd, SpectralEstimator};
use crate::error::{ensure_len, Error, Result};
use std::f64::consts::PI;

const SAMPLES_PER_PEAK: f64 = 5.0;

/// Generalized (floating mean) Lomb–Scargle periodogram with PSD
/// normalization, evaluated on `[min_frequency, max_frequency]`.
#[derive(Debug, Clone, Copy)]
pub struct Lomb {
    pub min_frequency: f64,
    pub max_frequency: f64,
}

impl Lomb {
    pub fn new(min_frequency: f64, max_frequency: f64) -> Self {
        Self {
            min_frequency,
            max_frequency,
        }
    }

    /// Grid step is `1 / (5 T)` for a recording spanning `T` seconds.
    /// Non-positive frequencies are skipped.
    fn frequency_grid(&self, span: f64) -> Vec<f64> {
        let df = 1.0 / (span * SAMPLES_PER_PEAK);
        let count = 1 + ((self.max_frequency - self.min_frequency) / df).round().max(0.0) as usize;
        (0..count)
            .map(|k| self.min_frequency + df * k as f64)
            .filter(|f| *f > 0.0)
            .collect()
    }
}

impl SpectralEstimator for Lomb {
    fn estimate(&self, times: &[f64], nn_ms: &[f64]) -> Result<Psd> {
        ensure_len("Lomb-Scargle PSD", 2, nn_ms.len())?;
        let span = times[times.len() - 1] - times[0];
        if !(span > 0.0) {
            return Err(Error::InsufficientData {
                operation: "Lomb-Scargle PSD",
                required: 2,
                actual: 1,
            });
        }
        let n = nn_ms.len() as f64;
        let w = 1.0 / n;
        let mean = nn_ms.iter().sum::<f64>() * w;
        let y: Vec<f64> = nn_ms.iter().map(|v| v - mean).collect();

        let frequencies = self.frequency_grid(span);
        let powers = frequencies
            .iter()
            .map(|&f| 0.5 * n * generalized_power(times, &y, w, 2.0 * PI * f))
            .collect();
        Ok(Psd {
            frequencies,
            powers,
        })
    }
}

/// `YC²/CC + YS²/SS` at angular frequency `omega` for centered `y`.
fn generalized_power(times: &[f64], y: &[f64], w: f64, omega: f64) -> f64 {
    let (mut s, mut c, mut s2, mut c2) = (0.0, 0.0, 0.0, 0.0);
    for &t in times {
        let (sin, cos) = (omega * t).sin_cos();
        s += w * sin;
        c += w * cos;
        s2 += w * 2.0 * sin * cos;
        c2 += w * (cos * cos - sin * sin);
    }
    s2 -= 2.0 * s * c;
    c2 -= c * c - s * s;
    let omega_tau = 0.5 * s2.atan2(c2);

    let (mut yc, mut ys, mut cc, mut ss, mut c_tau, mut s_tau) = (0.0, 0.0, 0.0, 0.0, 0.0, 0.0);
    for (&t, &yi) in times.iter().zip(y) {
        let (sin, cos) = (omega * t - omega_tau).sin_cos();
        yc += w * yi * cos;
        ys += w * yi * sin;
        cc += w * cos * cos;
        ss += w * sin * sin;
        c_tau += w * cos;
        s_tau += w * sin;
    }
    cc -= c_tau * c_tau;
    ss -= s_tau * s_tau;
    yc * yc / cc + ys * ys / ss
}
