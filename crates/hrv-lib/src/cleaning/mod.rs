//! Ectopic beat and outlier rejection.
//!
//! Rejected intervals are replaced by a missing marker rather than removed, so
//! the cleaned [`NnSeries`] always has the length of its input.

pub mod range;

use crate::error::{ensure_len, ConfigError, Result};
use crate::signal::{NnSeries, RrSeries};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use range::{remove_out_of_range, DEFAULT_HIGH_RR_MS, DEFAULT_LOW_RR_MS};

/// Cleaned series plus the number of intervals that were rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanedSeries {
    pub nn: NnSeries,
    pub outlier_count: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CleaningMethod {
    /// Relative change to the previous interval of at most 20 %.
    Malik,
    /// Asymmetric tolerance: +32.5 % lengthening, -24.5 % shortening.
    Kamath,
    /// Deviation below 20 % of the mean of the two neighbouring intervals.
    Karlsson,
    /// Deviation below 20 % of the mean of the last nine cleaned intervals.
    #[serde(rename = "mean-last9")]
    MeanLast9,
    /// Like Malik with a caller supplied ratio.
    Custom,
}

impl CleaningMethod {
    pub fn name(&self) -> &'static str {
        match self {
            CleaningMethod::Malik => "malik",
            CleaningMethod::Kamath => "kamath",
            CleaningMethod::Karlsson => "karlsson",
            CleaningMethod::MeanLast9 => "mean-last9",
            CleaningMethod::Custom => "custom",
        }
    }

    /// The successive-interval rule behind this method, or `None` for
    /// `MeanLast9`, which compares against a window instead.
    pub(crate) fn rule(
        &self,
        custom_threshold: Option<f64>,
    ) -> std::result::Result<Option<Box<dyn EctopicRule>>, ConfigError> {
        let rule: Box<dyn EctopicRule> = match self {
            CleaningMethod::Malik => Box::new(RatioRule::MALIK),
            CleaningMethod::Kamath => Box::new(KamathRule),
            CleaningMethod::Karlsson => Box::new(KarlssonRule),
            CleaningMethod::Custom => Box::new(RatioRule::custom(custom_threshold)?),
            CleaningMethod::MeanLast9 => return Ok(None),
        };
        Ok(Some(rule))
    }
}

impl fmt::Display for CleaningMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CleaningMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "malik" => Ok(CleaningMethod::Malik),
            "kamath" => Ok(CleaningMethod::Kamath),
            "karlsson" => Ok(CleaningMethod::Karlsson),
            "mean-last9" | "meanlast9" => Ok(CleaningMethod::MeanLast9),
            "custom" => Ok(CleaningMethod::Custom),
            _ => Err(ConfigError::UnknownCleaningMethod(s.to_string())),
        }
    }
}

/// Decides whether `next` is a normal successor of `prev`.
pub trait EctopicRule {
    /// `after_next` is the raw interval following `next`, if any.
    fn is_normal(&self, prev: f64, next: f64, after_next: Option<f64>) -> bool;
}

/// Symmetric relative-change rule; Malik is the 0.2 instance.
#[derive(Debug, Clone, Copy)]
pub struct RatioRule {
    pub threshold: f64,
}

impl RatioRule {
    pub const MALIK: RatioRule = RatioRule { threshold: 0.2 };

    /// Rule for [`CleaningMethod::Custom`]; the threshold is mandatory.
    pub fn custom(threshold: Option<f64>) -> std::result::Result<Self, ConfigError> {
        match threshold {
            None => Err(ConfigError::MissingCustomThreshold),
            Some(t) if !t.is_finite() || t < 0.0 => Err(ConfigError::InvalidThreshold(t)),
            Some(threshold) => Ok(Self { threshold }),
        }
    }
}

impl EctopicRule for RatioRule {
    fn is_normal(&self, prev: f64, next: f64, _after_next: Option<f64>) -> bool {
        (prev - next).abs() <= self.threshold * prev
    }
}

#[derive(Debug, Clone, Copy)]
pub struct KamathRule;

impl EctopicRule for KamathRule {
    fn is_normal(&self, prev: f64, next: f64, _after_next: Option<f64>) -> bool {
        let lengthening = next - prev;
        let shortening = prev - next;
        (0.0..=0.325 * prev).contains(&lengthening) || (0.0..=0.245 * prev).contains(&shortening)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct KarlssonRule;

impl EctopicRule for KarlssonRule {
    fn is_normal(&self, prev: f64, next: f64, after_next: Option<f64>) -> bool {
        match after_next {
            Some(after) => {
                let neighbours = (prev + after) / 2.0;
                (neighbours - next).abs() < 0.2 * neighbours
            }
            // the last interval has no right neighbour to compare with
            None => true,
        }
    }
}

const MEAN_LAST9_WINDOW: usize = 9;

/// Replace ectopic intervals of `raw` by missing values.
///
/// `custom_threshold` is only read by [`CleaningMethod::Custom`], for which it
/// is mandatory.
pub fn clean(
    raw: &RrSeries,
    method: CleaningMethod,
    custom_threshold: Option<f64>,
) -> Result<CleanedSeries> {
    let rule = method.rule(custom_threshold)?;
    ensure_len("ectopic beat cleaning", 1, raw.len())?;
    let cleaned = match rule {
        Some(rule) => clean_successive(&raw.rr, &*rule),
        None => clean_mean_last9(&raw.rr),
    };
    Ok(cleaned)
}

/// Compare each raw interval with its raw predecessor.
///
/// The interval right after a rejected one is accepted without being tested,
/// and comparison resumes from it.
pub fn clean_successive<R: EctopicRule + ?Sized>(rr: &[f64], rule: &R) -> CleanedSeries {
    let mut nn = Vec::with_capacity(rr.len());
    let mut outlier_count = 0;
    if let Some(first) = rr.first() {
        nn.push(Some(*first));
    }
    let mut previous_outlier = false;
    for i in 1..rr.len() {
        let next = rr[i];
        if previous_outlier {
            nn.push(Some(next));
            previous_outlier = false;
            continue;
        }
        if rule.is_normal(rr[i - 1], next, rr.get(i + 1).copied()) {
            nn.push(Some(next));
        } else {
            nn.push(None);
            outlier_count += 1;
            previous_outlier = true;
        }
    }
    CleanedSeries {
        nn: NnSeries::from_options(nn),
        outlier_count,
    }
}

fn clean_mean_last9(rr: &[f64]) -> CleanedSeries {
    let mut nn: Vec<Option<f64>> = Vec::with_capacity(rr.len());
    let mut outlier_count = 0;
    for (i, &value) in rr.iter().enumerate() {
        if i < MEAN_LAST9_WINDOW {
            nn.push(Some(value));
            continue;
        }
        let (sum, count) = nn[i - MEAN_LAST9_WINDOW..]
            .iter()
            .flatten()
            .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
        let accepted = count > 0 && {
            let mean = sum / count as f64;
            (mean - value).abs() < 0.2 * mean
        };
        if accepted {
            nn.push(Some(value));
        } else {
            nn.push(None);
            outlier_count += 1;
        }
    }
    CleanedSeries {
        nn: NnSeries::from_options(nn),
        outlier_count,
    }
}
