use crate::cleaning::CleaningMethod;
use crate::error::ConfigError;
use crate::metrics::nonlinear::DEFAULT_EMBEDDING_DIMENSION;
use crate::spectral::{InterpolationKind, PsdMethod};
use serde::{Deserialize, Serialize};

/// Half-open frequency interval `[low, high)` in Hz.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct FrequencyBand {
    pub low: f64,
    pub high: f64,
}

impl FrequencyBand {
    pub const fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, frequency: f64) -> bool {
        frequency >= self.low && frequency < self.high
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.low.is_finite() && self.high.is_finite() && self.low >= 0.0 && self.low < self.high
        {
            Ok(())
        } else {
            Err(ConfigError::InvalidRange {
                low: self.low,
                high: self.high,
            })
        }
    }
}

impl From<[f64; 2]> for FrequencyBand {
    fn from([low, high]: [f64; 2]) -> Self {
        Self { low, high }
    }
}

impl From<FrequencyBand> for [f64; 2] {
    fn from(band: FrequencyBand) -> Self {
        [band.low, band.high]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrequencyBands {
    pub ulf: FrequencyBand,
    pub vlf: FrequencyBand,
    pub lf: FrequencyBand,
    pub hf: FrequencyBand,
}

impl Default for FrequencyBands {
    fn default() -> Self {
        Self {
            ulf: FrequencyBand::new(0.0, 0.003),
            vlf: FrequencyBand::new(0.0033, 0.04),
            lf: FrequencyBand::new(0.04, 0.15),
            hf: FrequencyBand::new(0.15, 0.40),
        }
    }
}

/// Ectopic-beat cleaning parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CleaningConfig {
    pub method: CleaningMethod,
    /// Allowed relative change for `CleaningMethod::Custom`.
    pub custom_threshold: Option<f64>,
    /// Physiological range `[low, high]` in ms applied before ectopic
    /// cleaning. Out-of-range intervals are interpolated over.
    pub range_ms: Option<[f64; 2]>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            method: CleaningMethod::Malik,
            custom_threshold: None,
            range_ms: None,
        }
    }
}

/// Power spectral density parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SpectralConfig {
    pub method: PsdMethod,
    /// Resampling frequency (Hz) used by Welch's method.
    pub sampling_frequency: f64,
    pub interpolation: InterpolationKind,
    pub bands: FrequencyBands,
}

impl Default for SpectralConfig {
    fn default() -> Self {
        Self {
            method: PsdMethod::Welch,
            sampling_frequency: 7.0,
            interpolation: InterpolationKind::Linear,
            bands: FrequencyBands::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct NonlinearConfig {
    pub embedding_dimension: usize,
}

impl Default for NonlinearConfig {
    fn default() -> Self {
        Self {
            embedding_dimension: DEFAULT_EMBEDDING_DIMENSION,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub cleaning: CleaningConfig,
    pub spectral: SpectralConfig,
    pub nonlinear: NonlinearConfig,
}

impl PipelineConfig {
    /// Parse a TOML document; missing keys fall back to defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: PipelineConfig =
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.cleaning.method.rule(self.cleaning.custom_threshold)?;
        if let Some([low, high]) = self.cleaning.range_ms {
            crate::cleaning::range::check_range(low, high)?;
        }
        let fs = self.spectral.sampling_frequency;
        if !(fs.is_finite() && fs > 0.0) {
            return Err(ConfigError::InvalidSamplingFrequency(fs));
        }
        let bands = &self.spectral.bands;
        for band in [bands.ulf, bands.vlf, bands.lf, bands.hf] {
            band.validate()?;
        }
        if self.nonlinear.embedding_dimension == 0 {
            return Err(ConfigError::InvalidEmbeddingDimension);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_gives_defaults() {
        let config = PipelineConfig::from_toml_str("").unwrap();
        assert_eq!(config, PipelineConfig::default());
        assert_eq!(config.spectral.sampling_frequency, 7.0);
        assert_eq!(config.spectral.bands.hf, FrequencyBand::new(0.15, 0.40));
    }

    #[test]
    fn parses_nested_sections() {
        let config = PipelineConfig::from_toml_str(
            r#"
            [cleaning]
            method = "custom"
            custom-threshold = 0.15
            range-ms = [300.0, 2000.0]

            [spectral]
            method = "lomb"
            interpolation = "cubic"

            [spectral.bands]
            hf = [0.15, 0.5]

            [nonlinear]
            embedding-dimension = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.cleaning.method, CleaningMethod::Custom);
        assert_eq!(config.cleaning.custom_threshold, Some(0.15));
        assert_eq!(config.cleaning.range_ms, Some([300.0, 2000.0]));
        assert_eq!(config.spectral.method, PsdMethod::Lomb);
        assert_eq!(config.spectral.interpolation, InterpolationKind::Cubic);
        assert_eq!(config.spectral.bands.hf, FrequencyBand::new(0.15, 0.5));
        assert_eq!(config.spectral.bands.lf, FrequencyBand::new(0.04, 0.15));
        assert_eq!(config.nonlinear.embedding_dimension, 3);
    }

    #[test]
    fn unknown_method_is_a_parse_error() {
        let err = PipelineConfig::from_toml_str("[cleaning]\nmethod = \"bogus\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        let err = PipelineConfig::from_toml_str("[spectral]\ninterpolation = \"spline\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn custom_without_threshold_is_rejected() {
        let err = PipelineConfig::from_toml_str("[cleaning]\nmethod = \"custom\"").unwrap_err();
        assert_eq!(err, ConfigError::MissingCustomThreshold);
    }

    #[test]
    fn rejects_bad_sampling_frequency() {
        let mut config = PipelineConfig::default();
        config.spectral.sampling_frequency = 0.0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidSamplingFrequency(0.0))
        );
    }

    #[test]
    fn band_is_half_open() {
        let band = FrequencyBand::new(0.04, 0.15);
        assert!(band.contains(0.04));
        assert!(!band.contains(0.15));
    }
}
