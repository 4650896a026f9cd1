use crate::cleaning::{self, CleanedSeries};
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::features::FeatureSet;
use crate::metrics::{frequency, nonlinear, quality, time, QualityReport};
use crate::signal::{NnSeries, RrSeries};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineOutput {
    pub nn: NnSeries,
    /// Intervals rejected by the range filter or the ectopic cleaner, i.e.
    /// the missing entries of `nn`.
    pub outlier_count: usize,
    pub features: FeatureSet,
    pub quality: QualityReport,
}

/// Clean `raw` and extract every feature family.
///
/// The configuration is validated before anything is computed, and the first
/// failing stage aborts the run.
pub fn run(raw: &RrSeries, config: &PipelineConfig) -> Result<PipelineOutput> {
    config.validate()?;

    // Out-of-range intervals are bridged so the ectopic rule compares
    // plausible neighbours, then masked again in the output.
    let (input, in_range) = match config.cleaning.range_ms {
        Some([low, high]) => {
            let in_range = cleaning::remove_out_of_range(raw, low, high)?;
            debug!(
                "range filter [{low}, {high}] ms rejected {} of {} intervals",
                in_range.outlier_count,
                raw.len()
            );
            let bridged = RrSeries::new(in_range.nn.interpolate_missing()?);
            (bridged, Some(in_range.nn))
        }
        None => (raw.clone(), None),
    };

    let CleanedSeries { nn, outlier_count } = cleaning::clean(
        &input,
        config.cleaning.method,
        config.cleaning.custom_threshold,
    )?;
    debug!(
        "{} cleaning rejected {outlier_count} of {} intervals",
        config.cleaning.method,
        input.len()
    );
    let nn = match in_range {
        Some(in_range) => NnSeries::from_options(
            nn.as_slice()
                .iter()
                .zip(in_range.as_slice())
                .map(|(&value, &kept)| kept.and(value))
                .collect(),
        ),
        None => nn,
    };
    let outlier_count = nn.missing_count();

    let mut features = time::compute(&nn)?.to_feature_set();
    features.merge(frequency::compute(&nn, &config.spectral)?.to_feature_set());
    features.merge(
        nonlinear::compute(&nn, config.nonlinear.embedding_dimension)?.to_feature_set(),
    );

    let quality = quality::assess(&nn, outlier_count);
    if quality.too_many_outliers {
        warn!(
            "{:.1}% of intervals were rejected as outliers",
            100.0 * quality.outlier_ratio
        );
    }
    if quality.too_short {
        warn!(
            "only {} intervals, at least {} recommended for spectral features",
            quality.interval_count,
            quality::MIN_INTERVALS
        );
    }

    Ok(PipelineOutput {
        nn,
        outlier_count,
        features,
        quality,
    })
}
