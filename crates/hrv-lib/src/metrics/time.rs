use crate::error::{ensure_len, Result};
use crate::features::FeatureSet;
use crate::signal::NnSeries;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeDomainFeatures {
    pub mean_nni: f64,
    pub median_nni: f64,
    pub range_nni: f64,
    pub sdnn: f64,
    pub sdsd: f64,
    pub rmssd: f64,
    pub nni_50: usize,
    pub pnni_50: f64,
    pub nni_20: usize,
    pub pnni_20: f64,
    /// rmssd / mean_nni
    pub cvsd: f64,
    /// sdnn / mean_nni
    pub cvnni: f64,
}

impl TimeDomainFeatures {
    pub fn to_feature_set(&self) -> FeatureSet {
        [
            ("mean_nni", self.mean_nni),
            ("median_nni", self.median_nni),
            ("range_nni", self.range_nni),
            ("sdnn", self.sdnn),
            ("sdsd", self.sdsd),
            ("rmssd", self.rmssd),
            ("nni_50", self.nni_50 as f64),
            ("pnni_50", self.pnni_50),
            ("nni_20", self.nni_20 as f64),
            ("pnni_20", self.pnni_20),
            ("cvsd", self.cvsd),
            ("cvnni", self.cvnni),
        ]
        .into_iter()
        .collect()
    }
}

/// Time-domain statistics over the present intervals of `nn`.
///
/// Differences are only taken between neighbours that are both present;
/// with no such pair the difference based values are NaN.
pub fn compute(nn: &NnSeries) -> Result<TimeDomainFeatures> {
    let values = nn.present();
    ensure_len("time-domain features", 2, values.len())?;
    let diffs = nn.successive_differences();
    let n = values.len() as f64;

    let mean_nni = values.iter().sum::<f64>() / n;
    let sdnn = (values.iter().map(|x| (x - mean_nni).powi(2)).sum::<f64>() / (n - 1.0)).sqrt();
    let max = values.iter().copied().fold(f64::MIN, f64::max);
    let min = values.iter().copied().fold(f64::MAX, f64::min);

    let m = diffs.len() as f64;
    let diff_mean = diffs.iter().sum::<f64>() / m;
    let sdsd = (diffs.iter().map(|d| (d - diff_mean).powi(2)).sum::<f64>() / m).sqrt();
    let rmssd = (diffs.iter().map(|d| d * d).sum::<f64>() / m).sqrt();

    let nni_50 = diffs.iter().filter(|d| d.abs() > 50.0).count();
    let nni_20 = diffs.iter().filter(|d| d.abs() > 20.0).count();

    Ok(TimeDomainFeatures {
        mean_nni,
        median_nni: median(&values),
        range_nni: max - min,
        sdnn,
        sdsd,
        rmssd,
        nni_50,
        pnni_50: 100.0 * nni_50 as f64 / n,
        nni_20,
        pnni_20: 100.0 * nni_20 as f64 / n,
        cvsd: rmssd / mean_nni,
        cvnni: sdnn / mean_nni,
    })
}

fn median(values: &[f64]) -> f64 {
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn assert_close(actual: f64, expected: f64, tol: f64) {
        let diff = (actual - expected).abs();
        assert!(diff <= tol, "expected {expected}, got {actual}");
    }

    #[test]
    fn known_sequence() {
        let nn = NnSeries::from(vec![800.0, 810.0, 790.0, 805.0, 795.0]);
        let f = compute(&nn).unwrap();
        assert_close(f.mean_nni, 800.0, 1e-12);
        assert_close(f.range_nni, 20.0, 1e-12);
        assert_close(f.median_nni, 800.0, 1e-12);
        // deviations 0, 10, -10, 5, -5 -> 250 / 4
        assert_close(f.sdnn, 62.5f64.sqrt(), 1e-9);
        // diffs 10, -20, 15, -10
        assert_close(f.rmssd, (825.0f64 / 4.0).sqrt(), 1e-9);
        // mean diff -1.25
        assert_close(f.sdsd, (825.0f64 / 4.0 - 1.5625).sqrt(), 1e-9);
        assert_eq!(f.nni_50, 0);
        assert_eq!(f.nni_20, 0);
        assert_close(f.cvsd, f.rmssd / 800.0, 1e-12);
    }

    #[test]
    fn pnn_counts_use_strict_threshold() {
        let nn = NnSeries::from(vec![800.0, 860.0, 840.0, 819.0, 900.0]);
        let f = compute(&nn).unwrap();
        // |diffs| = 60, 20, 21, 81
        assert_eq!(f.nni_50, 2);
        assert_eq!(f.nni_20, 3);
        assert_close(f.pnni_50, 40.0, 1e-12);
        assert_close(f.pnni_20, 60.0, 1e-12);
    }

    #[test]
    fn constant_series_has_no_variability() {
        let f = compute(&NnSeries::from(vec![800.0; 10])).unwrap();
        assert_eq!(f.sdnn, 0.0);
        assert_eq!(f.rmssd, 0.0);
        assert_eq!(f.sdsd, 0.0);
        assert_eq!(f.range_nni, 0.0);
    }

    #[test]
    fn missing_entries_are_excluded() {
        let nn = NnSeries::from_options(vec![
            Some(800.0),
            Some(810.0),
            None,
            Some(790.0),
            Some(805.0),
            Some(795.0),
        ]);
        let f = compute(&nn).unwrap();
        assert_close(f.mean_nni, 800.0, 1e-12);
        // only 10, 15, -10 survive the gap
        assert_close(f.rmssd, (425.0f64 / 3.0).sqrt(), 1e-9);
    }

    #[test]
    fn invariants_hold_on_irregular_data() {
        let nn = NnSeries::from(vec![
            700.0, 950.0, 610.0, 640.0, 1010.0, 980.0, 720.0, 760.0, 700.0, 690.0,
        ]);
        let f = compute(&nn).unwrap();
        assert!(f.sdsd >= 0.0 && f.rmssd >= 0.0 && f.range_nni >= 0.0);
        assert!(f.pnni_50 <= 100.0 && f.pnni_20 <= 100.0);
        assert!(f.nni_50 <= f.nni_20);
    }

    #[test]
    fn isolated_values_give_nan_differences() {
        let nn = NnSeries::from_options(vec![Some(800.0), None, Some(810.0)]);
        let f = compute(&nn).unwrap();
        assert!(f.rmssd.is_nan());
        assert_eq!(f.nni_50, 0);
    }

    #[test]
    fn needs_two_present_intervals() {
        let nn = NnSeries::from_options(vec![Some(800.0), None]);
        assert!(matches!(
            compute(&nn),
            Err(Error::InsufficientData { required: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn feature_names() {
        let set = compute(&NnSeries::from(vec![800.0, 810.0, 790.0]))
            .unwrap()
            .to_feature_set();
        for name in ["mean_nni", "sdnn", "sdsd", "rmssd", "pnni_50", "nni_20", "range_nni"] {
            assert!(set.contains(name), "{name}");
        }
    }
}
