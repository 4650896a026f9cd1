use crate::config::{FrequencyBand, SpectralConfig};
use crate::error::Result;
use crate::features::FeatureSet;
use crate::signal::NnSeries;
use crate::spectral::{estimate_psd_with, Psd};
use serde::{Deserialize, Serialize};

/// Band powers in ms². Ratios are left non-finite when a denominator is zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyDomainFeatures {
    pub ulf: f64,
    pub vlf: f64,
    pub lf: f64,
    pub hf: f64,
    pub total_power: f64,
    pub lf_hf_ratio: f64,
    pub lfnu: f64,
    pub hfnu: f64,
    pub psd: Psd,
}

impl FrequencyDomainFeatures {
    pub fn from_psd(psd: Psd, config: &SpectralConfig) -> Self {
        let bands = &config.bands;
        let ulf = band_power(&psd, bands.ulf);
        let vlf = band_power(&psd, bands.vlf);
        let lf = band_power(&psd, bands.lf);
        let hf = band_power(&psd, bands.hf);
        Self {
            ulf,
            vlf,
            lf,
            hf,
            total_power: vlf + lf + hf,
            lf_hf_ratio: lf / hf,
            lfnu: 100.0 * lf / (lf + hf),
            hfnu: 100.0 * hf / (lf + hf),
            psd,
        }
    }

    pub fn to_feature_set(&self) -> FeatureSet {
        [
            ("ulf", self.ulf),
            ("vlf", self.vlf),
            ("lf", self.lf),
            ("hf", self.hf),
            ("total_power", self.total_power),
            ("lf_hf_ratio", self.lf_hf_ratio),
            ("lfnu", self.lfnu),
            ("hfnu", self.hfnu),
        ]
        .into_iter()
        .collect()
    }
}

pub fn compute(nn: &NnSeries, config: &SpectralConfig) -> Result<FrequencyDomainFeatures> {
    let psd = estimate_psd_with(nn, config)?;
    Ok(FrequencyDomainFeatures::from_psd(psd, config))
}

/// Trapezoidal integral of the PSD over the bins in `[band.low, band.high)`.
pub fn band_power(psd: &Psd, band: FrequencyBand) -> f64 {
    let (freqs, powers): (Vec<f64>, Vec<f64>) = psd
        .frequencies
        .iter()
        .zip(&psd.powers)
        .filter(|(f, _)| band.contains(**f))
        .map(|(f, p)| (*f, *p))
        .unzip();
    freqs
        .windows(2)
        .zip(powers.windows(2))
        .map(|(f, p)| 0.5 * (f[1] - f[0]) * (p[0] + p[1]))
        .sum()
}
