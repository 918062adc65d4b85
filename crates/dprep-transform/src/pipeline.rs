//! Stage sequences run by the pipeline.
//!
//! [`clean`] covers missing-value resolution and the outlier report;
//! [`engineer`] covers binning, encoding and scaling. Each stage gets its own
//! span so log lines carry the stage name.

use polars::prelude::*;

use dprep_model::{
    BinReport, EncoderState, MissingValueReport, OutlierReport, PipelineConfig, Result,
    ScalerState, Stage,
};

use crate::binning::derive_features;
use crate::encoding::encode_features;
use crate::missing::resolve_missing;
use crate::outliers::outlier_report;
use crate::scaling::scale_columns;

/// Cleaned table and its diagnostics.
#[derive(Debug, Clone)]
pub struct CleanOutput {
    pub table: DataFrame,
    pub missing: MissingValueReport,
    pub outliers: OutlierReport,
}

/// Fully processed table and the state fitted while producing it.
#[derive(Debug, Clone)]
pub struct EngineerOutput {
    pub table: DataFrame,
    pub bins: Vec<BinReport>,
    pub encoders: Vec<EncoderState>,
    pub scaler: ScalerState,
}

/// Resolve impossible zeros, then report outliers on the cleaned table.
///
/// # Errors
///
/// Returns the first error raised by the missing-value stage.
pub fn clean(raw: &DataFrame, config: &PipelineConfig) -> Result<CleanOutput> {
    let (table, missing) = {
        let _span = tracing::info_span!("stage", name = Stage::Clean.label()).entered();
        resolve_missing(raw, &config.cleaning.zero_missing_features)?
    };
    let outliers = {
        let _span = tracing::info_span!("stage", name = Stage::Outliers.label()).entered();
        outlier_report(
            &table,
            &config.cleaning.outlier_features,
            config.cleaning.iqr_multiplier,
        )?
    };
    Ok(CleanOutput {
        table,
        missing,
        outliers,
    })
}

/// Derive buckets, encode them, then scale the configured numeric columns.
///
/// # Errors
///
/// Returns the first error raised by binning, encoding or scaling.
pub fn engineer(cleaned: &DataFrame, config: &PipelineConfig) -> Result<EngineerOutput> {
    let specs = config.feature_engineering.bin_specs()?;

    let (binned, bins) = {
        let _span = tracing::info_span!("stage", name = Stage::Binning.label()).entered();
        derive_features(cleaned, &specs, config.feature_engineering.out_of_range)?
    };

    let (encoded, encoders) = {
        let _span = tracing::info_span!("stage", name = Stage::Encoding.label()).entered();
        let targets: Vec<String> = specs.iter().map(|spec| spec.target.clone()).collect();
        encode_features(&binned, &targets)?
    };

    let (table, scaler) = {
        let _span = tracing::info_span!("stage", name = Stage::Scaling.label()).entered();
        scale_columns(&encoded, &config.scaling.columns, config.scaling.method)?
    };

    Ok(EngineerOutput {
        table,
        bins,
        encoders,
        scaler,
    })
}
