//! Power spectral density estimation from NN intervals.

mod fourier;
pub mod interp;
mod lomb;
mod welch;

use crate::config::{FrequencyBands, SpectralConfig};
use crate::error::{ConfigError, Result};
use crate::signal::{time_axis_seconds, NnSeries};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use fourier::Fourier;
pub use interp::InterpolationKind;
pub use lomb::Lomb;
pub use welch::{hann, Welch};

/// One-sided power spectral density.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Psd {
    /// Strictly increasing, non-negative (Hz).
    pub frequencies: Vec<f64>,
    pub powers: Vec<f64>,
}

impl Psd {
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PsdMethod {
    /// Resample onto a uniform grid, then Hann-windowed Welch averaging.
    #[default]
    Welch,
    /// Lomb–Scargle periodogram on the irregular beat times.
    Lomb,
    /// Raw DFT periodogram on the beat series.
    Fourier,
}

impl PsdMethod {
    pub fn name(&self) -> &'static str {
        match self {
            PsdMethod::Welch => "welch",
            PsdMethod::Lomb => "lomb",
            PsdMethod::Fourier => "fourier",
        }
    }
}

impl fmt::Display for PsdMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PsdMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "welch" => Ok(PsdMethod::Welch),
            "lomb" | "lomb-scargle" => Ok(PsdMethod::Lomb),
            "fourier" => Ok(PsdMethod::Fourier),
            _ => Err(ConfigError::UnknownPsdMethod(s.to_string())),
        }
    }
}

/// A PSD estimator working on beat times (s, starting at 0) and NN values (ms).
pub trait SpectralEstimator {
    fn estimate(&self, times: &[f64], nn_ms: &[f64]) -> Result<Psd>;
}

/// Estimate the PSD of `nn` with the given method.
///
/// The estimator is configured before the data is touched, so a bad
/// sampling frequency is reported even for unusable input. Missing intervals
/// are interpolated over before the time axis is built.
/// `sampling_frequency` and `interpolation` only matter for Welch; the Lomb
/// frequency range spans `bands.vlf.low` to `bands.hf.high`.
pub fn estimate_psd(
    nn: &NnSeries,
    method: PsdMethod,
    sampling_frequency: f64,
    interpolation: InterpolationKind,
    bands: &FrequencyBands,
) -> Result<Psd> {
    let estimator: Box<dyn SpectralEstimator> = match method {
        PsdMethod::Welch => Box::new(Welch::new(sampling_frequency, interpolation)?),
        PsdMethod::Lomb => Box::new(Lomb::new(bands.vlf.low, bands.hf.high)),
        PsdMethod::Fourier => Box::new(Fourier),
    };
    let values = nn.interpolate_missing()?;
    let times = time_axis_seconds(&values);
    estimator.estimate(&times, &values)
}

pub fn estimate_psd_with(nn: &NnSeries, config: &SpectralConfig) -> Result<Psd> {
    estimate_psd(
        nn,
        config.method,
        config.sampling_frequency,
        config.interpolation,
        &config.bands,
    )
}

#[cfg(test)]
pub(crate) mod test_signals {
    use std::f64::consts::PI;

    /// Five minutes of NN intervals modulated by a sine at `freq_hz`.
    pub fn modulated_nn(freq_hz: f64, amplitude_ms: f64) -> Vec<f64> {
        let mut out = Vec::new();
        let mut t = 0.0;
        while t < 300.0 {
            let nn = 800.0 + amplitude_ms * (2.0 * PI * freq_hz * t).sin();
            out.push(nn);
            t += nn / 1000.0;
        }
        out
    }

    pub fn peak_frequency(freqs: &[f64], powers: &[f64]) -> f64 {
        let (idx, _) = powers
            .iter()
            .enumerate()
            .fold((0, f64::MIN), |best, (i, &p)| if p > best.1 { (i, p) } else { best });
        freqs[idx]
    }
}
