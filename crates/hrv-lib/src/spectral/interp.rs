use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How NN values are evaluated between beat times when resampling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InterpolationKind {
    #[default]
    Linear,
    Nearest,
    Previous,
    Next,
    /// Natural cubic spline.
    Cubic,
}

impl InterpolationKind {
    pub fn name(&self) -> &'static str {
        match self {
            InterpolationKind::Linear => "linear",
            InterpolationKind::Nearest => "nearest",
            InterpolationKind::Previous => "previous",
            InterpolationKind::Next => "next",
            InterpolationKind::Cubic => "cubic",
        }
    }
}

impl fmt::Display for InterpolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for InterpolationKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(InterpolationKind::Linear),
            "nearest" => Ok(InterpolationKind::Nearest),
            "previous" => Ok(InterpolationKind::Previous),
            "next" => Ok(InterpolationKind::Next),
            "cubic" => Ok(InterpolationKind::Cubic),
            _ => Err(ConfigError::UnknownInterpolation(s.to_string())),
        }
    }
}

/// `0, 1/fs, 2/fs, ...` strictly below `end`.
pub fn uniform_grid(end: f64, fs: f64) -> Vec<f64> {
    let step = 1.0 / fs;
    let n = (end / step).ceil().max(0.0) as usize;
    let mut grid: Vec<f64> = (0..n).map(|i| i as f64 * step).collect();
    while grid.last().is_some_and(|&t| t >= end) {
        grid.pop();
    }
    grid
}

/// Evaluate the samples `(times, values)` at every point of `grid`.
///
/// `times` must be strictly increasing and `grid` sorted within
/// `[times[0], times[last]]`.
pub fn resample(times: &[f64], values: &[f64], grid: &[f64], kind: InterpolationKind) -> Vec<f64> {
    debug_assert_eq!(times.len(), values.len());
    if times.is_empty() {
        return Vec::new();
    }
    if times.len() == 1 {
        return vec![values[0]; grid.len()];
    }
    let second_derivatives = match kind {
        InterpolationKind::Cubic => natural_spline_second_derivatives(times, values),
        _ => Vec::new(),
    };
    let last = times.len() - 2;
    let mut idx = 0;
    grid.iter()
        .map(|&t| {
            while idx < last && times[idx + 1] < t {
                idx += 1;
            }
            let (t0, t1) = (times[idx], times[idx + 1]);
            let (y0, y1) = (values[idx], values[idx + 1]);
            match kind {
                InterpolationKind::Linear => y0 + (y1 - y0) * (t - t0) / (t1 - t0),
                InterpolationKind::Nearest => {
                    if t - t0 <= t1 - t {
                        y0
                    } else {
                        y1
                    }
                }
                InterpolationKind::Previous => {
                    if t >= t1 {
                        y1
                    } else {
                        y0
                    }
                }
                InterpolationKind::Next => {
                    if t <= t0 {
                        y0
                    } else {
                        y1
                    }
                }
                InterpolationKind::Cubic => {
                    let h = t1 - t0;
                    let a = (t1 - t) / h;
                    let b = (t - t0) / h;
                    let (m0, m1) = (second_derivatives[idx], second_derivatives[idx + 1]);
                    a * y0
                        + b * y1
                        + ((a * a * a - a) * m0 + (b * b * b - b) * m1) * h * h / 6.0
                }
            }
        })
        .collect()
}

/// Second derivatives of the natural cubic spline through the knots
/// (zero at both ends), via the Thomas algorithm.
fn natural_spline_second_derivatives(x: &[f64], y: &[f64]) -> Vec<f64> {
    let n = x.len();
    let mut m = vec![0.0; n];
    if n < 3 {
        return m;
    }
    let mut c_prime = vec![0.0; n];
    let mut d_prime = vec![0.0; n];
    for i in 1..n - 1 {
        let h0 = x[i] - x[i - 1];
        let h1 = x[i + 1] - x[i];
        let a = h0;
        let b = 2.0 * (h0 + h1);
        let c = h1;
        let d = 6.0 * ((y[i + 1] - y[i]) / h1 - (y[i] - y[i - 1]) / h0);
        let denom = b - a * c_prime[i - 1];
        c_prime[i] = c / denom;
        d_prime[i] = (d - a * d_prime[i - 1]) / denom;
    }
    for i in (1..n - 1).rev() {
        m[i] = d_prime[i] - c_prime[i] * m[i + 1];
    }
    m
}
