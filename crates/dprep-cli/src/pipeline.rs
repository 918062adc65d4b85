//! Pipeline runs with explicit stages.
//!
//! A full run goes through these stages in order:
//! 1. **Load**: read the raw CSV and check its schema and target labels
//! 2. **Clean**: resolve impossible zeros, report outliers
//! 3. **Engineer**: bin, encode and scale
//! 4. **Validate**: check the cleaned and processed tables
//! 5. **Write**: cleaned CSV, processed CSV and run manifest
//!
//! Nothing is written until validation has finished, so a failed run
//! leaves earlier outputs untouched.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::Utc;
use polars::prelude::DataFrame;
use tracing::{Level, error, info, info_span, trace};

use dprep_ingest::{LoadReport, check_numeric_columns, check_target_values, validate_schema};
use dprep_model::{MissingValueReport, OutlierReport, PipelineConfig, ScalerKind, Stage};
use dprep_output::{
    InputRecord, OutputRecord, RunManifest, RunSettings, render_csv, render_manifest, save,
    write_all_atomic,
};
use dprep_transform::{
    CleanOutput, EngineerOutput, clean, engineer, missing_value_report, outlier_report,
};
use dprep_validate::{ValidationContext, ValidationReport, validate};

use crate::logging::redact_value;

/// Configuration file read when none is named explicitly.
pub const DEFAULT_CONFIG_PATH: &str = "config/config.toml";

/// Command line values that replace configured ones.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub input: Option<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub scaler: Option<ScalerKind>,
}

/// Build the effective configuration.
///
/// An explicit `config_path` must exist. Without one, `config/config.toml`
/// is used when present and the built-in defaults rooted at the working
/// directory otherwise.
pub fn resolve_config(
    config_path: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<PipelineConfig> {
    let mut config = match config_path {
        Some(path) => PipelineConfig::load(path)
            .with_context(|| format!("load configuration {}", path.display()))?,
        None => {
            let default_path = Path::new(DEFAULT_CONFIG_PATH);
            if default_path.is_file() {
                PipelineConfig::load(default_path)
                    .with_context(|| format!("load configuration {}", default_path.display()))?
            } else {
                let root = std::env::current_dir().context("resolve working directory")?;
                info!(root = %root.display(), "no configuration file, using defaults");
                PipelineConfig::default_for_root(&root)
            }
        }
    };

    if let Some(input) = &overrides.input {
        config.paths.raw_data.clone_from(input);
    }
    if let Some(output_dir) = &overrides.output_dir {
        config.paths.processed_dir.clone_from(output_dir);
    }
    if let Some(scaler) = overrides.scaler {
        config.scaling.method = scaler;
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

// ============================================================================
// Stage 1: Load
// ============================================================================

/// The raw table and its load report.
#[derive(Debug)]
pub struct LoadedInput {
    pub table: DataFrame,
    pub report: LoadReport,
}

/// Read the raw CSV and check it against the configuration.
pub fn load_input(config: &PipelineConfig) -> Result<LoadedInput> {
    let _span = info_span!("stage", name = Stage::Load.label()).entered();
    let path = &config.paths.raw_data;
    let table = dprep_ingest::load(path)?;

    let expected = config.expected_columns();
    validate_schema(&table, &expected)?;
    check_numeric_columns(&table, &expected)?;
    check_target_values(&table, config.target_column())?;

    let report = LoadReport::from_frame(path, &table, &config.cleaning.zero_missing_features)?;
    if tracing::enabled!(Level::TRACE) {
        if let Some(first) = first_row(&table) {
            trace!(row = %redact_value(&first), "first raw row");
        }
    }
    info!(
        rows = report.rows,
        columns = report.columns,
        zero_readings = report.total_zeros(),
        "raw data loaded"
    );
    Ok(LoadedInput { table, report })
}

fn first_row(df: &DataFrame) -> Option<String> {
    let cells: Vec<String> = df
        .get_columns()
        .iter()
        .map(|column| column.get(0).map(|value| value.to_string()))
        .collect::<std::result::Result<_, _>>()
        .ok()?;
    Some(cells.join(","))
}

// ============================================================================
// Report: raw data diagnostics
// ============================================================================

/// Diagnostics of the raw data before anything is changed.
#[derive(Debug)]
pub struct RawReport {
    pub load: LoadReport,
    pub missing: MissingValueReport,
    pub outliers: OutlierReport,
}

/// Count impossible zeros and IQR outliers in the raw data.
pub fn report_raw(config: &PipelineConfig) -> Result<RawReport> {
    let input = load_input(config)?;
    let missing = missing_value_report(&input.table, &config.cleaning.zero_missing_features)
        .context("count missing values")?;
    let outliers = outlier_report(
        &input.table,
        &config.cleaning.outlier_features,
        config.cleaning.iqr_multiplier,
    )
    .context("count outliers")?;
    Ok(RawReport {
        load: input.report,
        missing,
        outliers,
    })
}

// ============================================================================
// Clean: load, resolve missing values, write the cleaned CSV
// ============================================================================

/// Result of a clean-only run.
#[derive(Debug)]
pub struct CleanRun {
    pub load: LoadReport,
    pub clean: CleanOutput,
    /// Destination written, `None` on a dry run.
    pub written: Option<PathBuf>,
}

/// Resolve missing values and write the cleaned table.
pub fn run_clean(config: &PipelineConfig, dry_run: bool) -> Result<CleanRun> {
    let input = load_input(config)?;
    let cleaned = clean(&input.table, config).context("clean raw data")?;

    let written = if dry_run {
        info!("dry run, cleaned data not written");
        None
    } else {
        let _span = info_span!("stage", name = Stage::Write.label()).entered();
        let path = config.cleaned_output_path();
        save(&cleaned.table, path)
            .with_context(|| format!("write cleaned data to {}", path.display()))?;
        Some(path.to_path_buf())
    };

    Ok(CleanRun {
        load: input.report,
        clean: cleaned,
        written,
    })
}

// ============================================================================
// Run: every stage
// ============================================================================

/// Switches for a full run.
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    /// Run every stage but write nothing.
    pub dry_run: bool,
    /// Refuse to write outputs when validation reports errors.
    pub fail_on_validation: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            fail_on_validation: true,
        }
    }
}

/// What happened to the output files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputStatus {
    Written,
    DryRun,
    /// Validation errors kept the outputs from being written.
    Blocked,
}

/// Everything a full run produced.
#[derive(Debug)]
pub struct RunOutcome {
    pub clean: CleanOutput,
    pub engineer: EngineerOutput,
    pub validation: ValidationReport,
    pub manifest: RunManifest,
    pub status: OutputStatus,
}

impl RunOutcome {
    /// 0 on a clean pass, 1 when validation errors blocked the outputs,
    /// 2 when they were written anyway.
    pub fn exit_code(&self) -> i32 {
        match (self.validation.has_errors(), self.status) {
            (false, _) => 0,
            (true, OutputStatus::Written) => 2,
            (true, OutputStatus::DryRun | OutputStatus::Blocked) => 1,
        }
    }
}

/// Run load, clean, engineer and validate, then write the outputs.
pub fn run_pipeline(config: &PipelineConfig, options: RunOptions) -> Result<RunOutcome> {
    let started = Instant::now();
    let input = load_input(config)?;
    let cleaned = clean(&input.table, config).context("clean raw data")?;
    let engineered = engineer(&cleaned.table, config).context("engineer features")?;

    let validation = {
        let _span = info_span!("stage", name = Stage::Validation.label()).entered();
        validate(&ValidationContext {
            raw: &input.table,
            cleaned: &cleaned.table,
            processed: &engineered.table,
            config,
        })
        .context("validate prepared data")?
    };

    let manifest = RunManifest {
        tool_version: env!("CARGO_PKG_VERSION").to_string(),
        generated_at: Utc::now(),
        input: InputRecord::from_load(&input.report).context("hash raw data")?,
        settings: RunSettings::from_config(config),
        missing_values: cleaned.missing.clone(),
        outliers: cleaned.outliers.clone(),
        bins: engineered.bins.clone(),
        encoders: engineered.encoders.clone(),
        scaler: engineered.scaler.clone(),
        validation: validation.summary(),
        outputs: OutputRecord::from_config(config),
    };

    let status = if options.dry_run {
        info!("dry run, no files written");
        OutputStatus::DryRun
    } else if options.fail_on_validation && validation.has_errors() {
        error!(
            errors = validation.errors().count(),
            "validation failed, outputs not written"
        );
        OutputStatus::Blocked
    } else {
        write_outputs(config, &cleaned.table, &engineered.table, &manifest)?;
        OutputStatus::Written
    };

    info!(
        rows = engineered.table.height(),
        columns = engineered.table.width(),
        duration_ms = started.elapsed().as_millis(),
        "pipeline complete"
    );
    Ok(RunOutcome {
        clean: cleaned,
        engineer: engineered,
        validation,
        manifest,
        status,
    })
}

fn write_outputs(
    config: &PipelineConfig,
    cleaned: &DataFrame,
    processed: &DataFrame,
    manifest: &RunManifest,
) -> Result<()> {
    let _span = info_span!("stage", name = Stage::Write.label()).entered();
    let outputs = &manifest.outputs;
    let cleaned_csv = render_csv(cleaned).context("render cleaned data")?;
    let processed_csv = render_csv(processed).context("render processed data")?;
    let manifest_json = render_manifest(manifest).context("render run manifest")?;

    write_all_atomic(&[
        (outputs.cleaned.as_path(), cleaned_csv.as_slice()),
        (outputs.processed.as_path(), processed_csv.as_slice()),
        (outputs.manifest.as_path(), manifest_json.as_slice()),
    ])
    .with_context(|| format!("write outputs next to {}", outputs.processed.display()))?;
    info!(
        cleaned = %outputs.cleaned.display(),
        processed = %outputs.processed.display(),
        manifest = %outputs.manifest.display(),
        "outputs written"
    );
    Ok(())
}
