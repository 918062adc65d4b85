//! Run manifest.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use dprep_ingest::LoadReport;
use dprep_model::{
    BinReport, EncoderState, MissingValueReport, OutOfRangePolicy, OutlierReport, PipelineConfig,
    PrepError, Result, ScalerKind, ScalerState,
};
use dprep_validate::ValidationSummary;

use crate::hash::sha256_file;

/// The raw input a run read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    pub path: PathBuf,
    pub sha256: String,
    pub rows: usize,
    pub columns: usize,
}

impl InputRecord {
    /// Hash the input file and record the loaded shape.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::Io`] if the file cannot be read.
    pub fn from_load(report: &LoadReport) -> Result<Self> {
        Ok(Self {
            path: report.path.clone(),
            sha256: sha256_file(&report.path)?,
            rows: report.rows,
            columns: report.columns,
        })
    }
}

/// Files a run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRecord {
    pub cleaned: PathBuf,
    pub processed: PathBuf,
    pub manifest: PathBuf,
}

impl OutputRecord {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            cleaned: config.cleaned_output_path().to_path_buf(),
            processed: config.processed_output_path(),
            manifest: config.manifest_path(),
        }
    }
}

/// Settings that shaped the outputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    pub target_column: String,
    pub scaler: ScalerKind,
    pub out_of_range: OutOfRangePolicy,
    pub iqr_multiplier: f64,
    pub random_seed: u64,
}

impl RunSettings {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            target_column: config.target_column().to_string(),
            scaler: config.scaling.method,
            out_of_range: config.feature_engineering.out_of_range,
            iqr_multiplier: config.cleaning.iqr_multiplier,
            random_seed: config.params.random_seed,
        }
    }
}

/// Everything one run read, fitted, checked and wrote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    pub tool_version: String,
    pub generated_at: DateTime<Utc>,
    pub input: InputRecord,
    pub settings: RunSettings,
    pub missing_values: MissingValueReport,
    pub outliers: OutlierReport,
    pub bins: Vec<BinReport>,
    pub encoders: Vec<EncoderState>,
    pub scaler: ScalerState,
    pub validation: ValidationSummary,
    pub outputs: OutputRecord,
}

/// Serialize the manifest as pretty JSON with a trailing newline.
///
/// # Errors
///
/// Returns [`PrepError::Serialize`] if serialization fails.
pub fn render_manifest(manifest: &RunManifest) -> Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(manifest).map_err(|e| PrepError::Serialize {
        what: "run manifest",
        message: e.to_string(),
    })?;
    bytes.push(b'\n');
    Ok(bytes)
}
