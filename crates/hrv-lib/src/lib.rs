//! Heart rate variability features from RR interval series.
//!
//! Raw intervals are cleaned of ectopic beats into an [`NnSeries`], from which
//! time-domain, frequency-domain and nonlinear descriptors are computed.
//! [`pipeline::run`] chains all stages according to a [`PipelineConfig`].

pub mod cleaning;
pub mod config;
pub mod error;
pub mod features;
pub mod metrics;
pub mod pipeline;
pub mod signal;
pub mod spectral;

pub use cleaning::{clean, CleanedSeries, CleaningMethod};
pub use config::{FrequencyBand, FrequencyBands, PipelineConfig};
pub use error::{ConfigError, Error, Result};
pub use features::FeatureSet;
pub use pipeline::{run, PipelineOutput};
pub use signal::{NnSeries, RrSeries};
pub use spectral::{estimate_psd, InterpolationKind, Psd, PsdMethod};
