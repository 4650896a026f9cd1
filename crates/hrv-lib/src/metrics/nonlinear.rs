use crate::error::{ensure_len, ConfigError, Result};
use crate::features::FeatureSet;
use crate::signal::NnSeries;
use serde::{Deserialize, Serialize};

pub const DEFAULT_EMBEDDING_DIMENSION: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoincareFeatures {
    /// Width of the Poincaré cloud (short-term variability).
    pub sd1: f64,
    /// Length of the Poincaré cloud (long-term variability).
    pub sd2: f64,
    pub ratio_sd1_sd2: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CsiCviFeatures {
    pub csi: f64,
    pub cvi: f64,
    pub modified_csi: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NonlinearFeatures {
    pub poincare: PoincareFeatures,
    pub csi_cvi: CsiCviFeatures,
    pub sampen: f64,
}

impl NonlinearFeatures {
    pub fn to_feature_set(&self) -> FeatureSet {
        [
            ("sd1", self.poincare.sd1),
            ("sd2", self.poincare.sd2),
            ("ratio_sd1_sd2", self.poincare.ratio_sd1_sd2),
            ("csi", self.csi_cvi.csi),
            ("cvi", self.csi_cvi.cvi),
            ("modified_csi", self.csi_cvi.modified_csi),
            ("sampen", self.sampen),
        ]
        .into_iter()
        .collect()
    }
}

pub fn compute(nn: &NnSeries, embedding_dimension: usize) -> Result<NonlinearFeatures> {
    let poincare = poincare(nn)?;
    Ok(NonlinearFeatures {
        poincare,
        csi_cvi: csi_cvi_from(&poincare),
        sampen: sample_entropy(nn, embedding_dimension)?,
    })
}

/// SD1 uses the population variance of the successive differences, SD2 the
/// sample variances of the series and of its differences.
pub fn poincare(nn: &NnSeries) -> Result<PoincareFeatures> {
    let values = nn.present();
    let diffs = nn.successive_differences();
    ensure_len("Poincaré plot", 3, values.len())?;
    ensure_len("Poincaré plot successive differences", 2, diffs.len())?;

    let sd1 = (0.5 * variance(&diffs, 0)).sqrt();
    let sd2 = (2.0 * variance(&values, 1) - 0.5 * variance(&diffs, 1)).sqrt();
    Ok(PoincareFeatures {
        sd1,
        sd2,
        ratio_sd1_sd2: sd1 / sd2,
    })
}

pub fn csi_cvi(nn: &NnSeries) -> Result<CsiCviFeatures> {
    Ok(csi_cvi_from(&poincare(nn)?))
}

fn csi_cvi_from(poincare: &PoincareFeatures) -> CsiCviFeatures {
    let t = 4.0 * poincare.sd1;
    let l = 4.0 * poincare.sd2;
    CsiCviFeatures {
        csi: l / t,
        cvi: (l * t).log10(),
        modified_csi: l * l / t,
    }
}

/// Sample entropy with tolerance `0.2 · std` and Chebyshev distance.
///
/// Both template lengths use the same `N - m` starting points. When no
/// template pair matches, the result is infinite or NaN rather than an error.
pub fn sample_entropy(nn: &NnSeries, embedding_dimension: usize) -> Result<f64> {
    if embedding_dimension == 0 {
        return Err(ConfigError::InvalidEmbeddingDimension.into());
    }
    let data = nn.interpolate_missing()?;
    ensure_len("sample entropy", embedding_dimension + 1, data.len())?;
    let r = 0.2 * variance(&data, 0).sqrt();
    Ok(sample_entropy_with_tolerance(&data, embedding_dimension, r))
}

fn sample_entropy_with_tolerance(data: &[f64], m: usize, r: f64) -> f64 {
    let templates = data.len() - m;
    let mut count_m = 0f64;
    let mut count_m1 = 0f64;
    for i in 0..templates {
        for j in (i + 1)..templates {
            if max_diff(data, i, j, m) < r {
                count_m += 1.0;
                if (data[i + m] - data[j + m]).abs() < r {
                    count_m1 += 1.0;
                }
            }
        }
    }
    -(count_m1 / count_m).ln()
}

fn max_diff(data: &[f64], i: usize, j: usize, length: usize) -> f64 {
    data[i..i + length]
        .iter()
        .zip(data[j..j + length].iter())
        .map(|(a, b)| (a - b).abs())
        .fold(0.0, f64::max)
}

fn variance(data: &[f64], ddof: usize) -> f64 {
    let n = data.len() as f64;
    let mean = data.iter().sum::<f64>() / n;
    data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - ddof as f64)
}
