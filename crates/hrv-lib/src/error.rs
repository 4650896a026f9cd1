use thiserror::Error;

/// Rejected configuration. Always raised before any computation starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("unknown cleaning method '{0}' (expected malik, kamath, karlsson, mean-last9 or custom)")]
    UnknownCleaningMethod(String),
    #[error("the custom cleaning method requires a threshold")]
    MissingCustomThreshold,
    #[error("custom threshold must be a finite, non-negative ratio (got {0})")]
    InvalidThreshold(f64),
    #[error("unknown PSD method '{0}' (expected welch, lomb or fourier)")]
    UnknownPsdMethod(String),
    #[error("unsupported interpolation kind '{0}'")]
    UnknownInterpolation(String),
    #[error("sampling frequency must be positive and finite (got {0})")]
    InvalidSamplingFrequency(f64),
    #[error("invalid range [{low}, {high}]")]
    InvalidRange { low: f64, high: f64 },
    #[error("embedding dimension must be at least 1")]
    InvalidEmbeddingDimension,
    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{operation} needs at least {required} usable intervals, got {actual}")]
    InsufficientData {
        operation: &'static str,
        required: usize,
        actual: usize,
    },
    #[error("FFT failed: {0}")]
    Fft(String),
}

impl From<realfft::FftError> for Error {
    fn from(err: realfft::FftError) -> Self {
        Error::Fft(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

pub(crate) fn ensure_len(operation: &'static str, required: usize, actual: usize) -> Result<()> {
    if actual < required {
        Err(Error::InsufficientData {
            operation,
            required,
            actual,
        })
    } else {
        Ok(())
    }
}
