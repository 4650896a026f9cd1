use crate::signal::NnSeries;

/// Recordings shorter than this (about four minutes at rest) give unstable
/// frequency-domain estimates.
pub const MIN_INTERVALS: usize = 240;
pub const MAX_OUTLIER_RATIO: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct QualityReport {
    pub interval_count: usize,
    pub outlier_count: usize,
    pub outlier_ratio: f64,
    /// Coefficient of variation of the present NN intervals.
    pub nn_cv: f64,
    pub too_many_outliers: bool,
    pub too_short: bool,
}

impl QualityReport {
    pub fn is_acceptable(&self) -> bool {
        !self.too_many_outliers && !self.too_short
    }
}

pub fn assess(cleaned: &NnSeries, outlier_count: usize) -> QualityReport {
    let interval_count = cleaned.len();
    let outlier_ratio = if interval_count == 0 {
        0.0
    } else {
        outlier_count as f64 / interval_count as f64
    };
    QualityReport {
        interval_count,
        outlier_count,
        outlier_ratio,
        nn_cv: compute_nn_cv(cleaned),
        too_many_outliers: outlier_ratio > MAX_OUTLIER_RATIO,
        too_short: interval_count < MIN_INTERVALS,
    }
}

pub fn compute_nn_cv(nn: &NnSeries) -> f64 {
    let values = nn.present();
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().copied().sum::<f64>() / values.len() as f64;
    if mean == 0.0 {
        return 0.0;
    }
    let sd = (values.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / values.len() as f64).sqrt();
    sd / mean
}
