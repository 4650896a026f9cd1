use super::CleanedSeries;
use crate::error::{ConfigError, Result};
use crate::signal::{NnSeries, RrSeries};

/// 200 bpm.
pub const DEFAULT_LOW_RR_MS: f64 = 300.0;
/// 30 bpm.
pub const DEFAULT_HIGH_RR_MS: f64 = 2000.0;

pub(crate) fn check_range(low: f64, high: f64) -> std::result::Result<(), ConfigError> {
    if low.is_finite() && high.is_finite() && low < high {
        Ok(())
    } else {
        Err(ConfigError::InvalidRange { low, high })
    }
}

/// Mark intervals outside `[low_ms, high_ms]` as missing.
pub fn remove_out_of_range(raw: &RrSeries, low_ms: f64, high_ms: f64) -> Result<CleanedSeries> {
    check_range(low_ms, high_ms)?;
    let mut outlier_count = 0;
    let nn = raw
        .rr
        .iter()
        .map(|&rr| {
            if (low_ms..=high_ms).contains(&rr) {
                Some(rr)
            } else {
                outlier_count += 1;
                None
            }
        })
        .collect();
    Ok(CleanedSeries {
        nn: NnSeries::from_options(nn),
        outlier_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn flags_high_and_low_intervals() {
        let raw = RrSeries::new(vec![700.0, 600.0, 2300.0, 200.0, 1000.0, 230.0, 1200.0]);
        let cleaned = remove_out_of_range(&raw, DEFAULT_LOW_RR_MS, DEFAULT_HIGH_RR_MS).unwrap();
        assert_eq!(
            cleaned.nn.as_slice(),
            &[Some(700.0), Some(600.0), None, None, Some(1000.0), None, Some(1200.0)]
        );
        assert_eq!(cleaned.outlier_count, 3);
    }

    #[test]
    fn bounds_are_inclusive() {
        let raw = RrSeries::new(vec![300.0, 2000.0]);
        let cleaned = remove_out_of_range(&raw, 300.0, 2000.0).unwrap();
        assert_eq!(cleaned.outlier_count, 0);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let raw = RrSeries::new(vec![800.0]);
        let err = remove_out_of_range(&raw, 2000.0, 300.0).unwrap_err();
        assert_eq!(
            err,
            Error::Config(ConfigError::InvalidRange {
                low: 2000.0,
                high: 300.0
            })
        );
    }
}
