pub mod frequency;
pub mod nonlinear;
pub mod quality;
pub mod time;

pub use frequency::{band_power, FrequencyDomainFeatures};
pub use nonlinear::{csi_cvi, poincare, sample_entropy, NonlinearFeatures};
pub use quality::{assess, QualityReport};
pub use time::TimeDomainFeatures;
