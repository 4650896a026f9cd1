use crate::error::{ensure_len, Result};
use serde::{Deserialize, Serialize};

/// Raw RR intervals (milliseconds) as delivered by a beat detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RrSeries {
    pub rr: Vec<f64>,
}

impl RrSeries {
    pub fn new(rr: Vec<f64>) -> Self {
        Self { rr }
    }

    pub fn len(&self) -> usize {
        self.rr.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rr.is_empty()
    }
}

impl From<Vec<f64>> for RrSeries {
    fn from(rr: Vec<f64>) -> Self {
        Self { rr }
    }
}

/// Cleaned NN intervals (milliseconds).
///
/// Rejected intervals stay in place as `None` so that indices keep matching
/// the raw series and the time axis can be rebuilt by interpolation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NnSeries {
    nn: Vec<Option<f64>>,
}

impl NnSeries {
    pub fn from_options(nn: Vec<Option<f64>>) -> Self {
        Self { nn }
    }

    pub fn as_slice(&self) -> &[Option<f64>] {
        &self.nn
    }

    pub fn len(&self) -> usize {
        self.nn.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nn.is_empty()
    }

    pub fn missing_count(&self) -> usize {
        self.nn.iter().filter(|v| v.is_none()).count()
    }

    pub fn present_count(&self) -> usize {
        self.nn.len() - self.missing_count()
    }

    /// Present values in temporal order.
    pub fn present(&self) -> Vec<f64> {
        self.nn.iter().flatten().copied().collect()
    }

    /// Differences between index-adjacent intervals. A missing interval
    /// breaks the pair on both sides.
    pub fn successive_differences(&self) -> Vec<f64> {
        self.nn
            .windows(2)
            .filter_map(|w| match (w[0], w[1]) {
                (Some(a), Some(b)) => Some(b - a),
                _ => None,
            })
            .collect()
    }

    /// Fill missing intervals by linear interpolation over the sample index.
    /// Gaps at either end take the nearest present value.
    pub fn interpolate_missing(&self) -> Result<Vec<f64>> {
        ensure_len("gap interpolation", 1, self.present_count())?;
        let known: Vec<(usize, f64)> = self
            .nn
            .iter()
            .enumerate()
            .filter_map(|(i, v)| v.map(|v| (i, v)))
            .collect();

        let mut filled = Vec::with_capacity(self.nn.len());
        let mut next_known: usize = 0;
        for (i, value) in self.nn.iter().enumerate() {
            if let Some(v) = value {
                filled.push(*v);
                next_known += 1;
                continue;
            }
            let before = next_known.checked_sub(1).map(|k| known[k]);
            let after = known.get(next_known).copied();
            let v = match (before, after) {
                (Some((i0, v0)), Some((i1, v1))) => {
                    v0 + (v1 - v0) * (i - i0) as f64 / (i1 - i0) as f64
                }
                (Some((_, v0)), None) => v0,
                (None, Some((_, v1))) => v1,
                (None, None) => unreachable!("at least one present interval was checked above"),
            };
            filled.push(v);
        }
        Ok(filled)
    }
}

impl From<Vec<f64>> for NnSeries {
    fn from(values: Vec<f64>) -> Self {
        Self {
            nn: values.into_iter().map(Some).collect(),
        }
    }
}

/// Beat times in seconds, shifted so the first interval sits at t = 0.
pub fn time_axis_seconds(nn_ms: &[f64]) -> Vec<f64> {
    let mut times = Vec::with_capacity(nn_ms.len());
    let mut acc = 0.0;
    for (i, interval) in nn_ms.iter().enumerate() {
        if i > 0 {
            acc += interval;
        }
        times.push(acc / 1000.0);
    }
    times
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn successive_differences_skip_gaps() {
        let nn = NnSeries::from_options(vec![Some(800.0), Some(810.0), None, Some(790.0), Some(805.0)]);
        assert_eq!(nn.successive_differences(), vec![10.0, 15.0]);
        assert_eq!(nn.present(), vec![800.0, 810.0, 790.0, 805.0]);
        assert_eq!(nn.missing_count(), 1);
        assert_eq!(nn.len(), 5);
    }

    #[test]
    fn interpolation_fills_inner_and_edge_gaps() {
        let nn = NnSeries::from_options(vec![None, Some(800.0), None, None, Some(830.0), None]);
        let filled = nn.interpolate_missing().unwrap();
        assert_eq!(filled, vec![800.0, 800.0, 810.0, 820.0, 830.0, 830.0]);
    }

    #[test]
    fn interpolation_needs_a_present_value() {
        let nn = NnSeries::from_options(vec![None, None]);
        assert!(nn.interpolate_missing().is_err());
    }

    #[test]
    fn time_axis_starts_at_zero() {
        let t = time_axis_seconds(&[800.0, 1000.0, 500.0]);
        assert_eq!(t, vec![0.0, 1.0, 1.5]);
    }
}
