//! Checks on the prepared dataset.
//!
//! Runs after scaling and before anything is written. Each check module
//! returns a list of [`Issue`]s; [`validate`] collects them into a
//! [`ValidationReport`]. Errors block the outputs, warnings are logged.

pub mod checks;
pub mod issue;
pub mod report;

use polars::prelude::DataFrame;

use dprep_model::{ColumnRole, ColumnSpec, PipelineConfig, Result, encoded_column_name};

pub use issue::{Category, Issue, Severity};
pub use report::{IssueRecord, ValidationReport, ValidationSummary};

/// Tables and configuration of one run.
#[derive(Debug, Clone, Copy)]
pub struct ValidationContext<'a> {
    pub raw: &'a DataFrame,
    pub cleaned: &'a DataFrame,
    pub processed: &'a DataFrame,
    pub config: &'a PipelineConfig,
}

/// A derived label column and its encoded companion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineeredColumn {
    pub label: String,
    pub encoded: String,
}

/// Derived label columns among `specs`, each with its encoded companion.
pub fn engineered_columns(specs: &[ColumnSpec]) -> Vec<EngineeredColumn> {
    specs
        .iter()
        .filter(|spec| spec.role == ColumnRole::DerivedCategorical)
        .map(|spec| EngineeredColumn {
            label: spec.name.clone(),
            encoded: encoded_column_name(&spec.name),
        })
        .collect()
}

/// Run every check.
///
/// # Errors
///
/// Returns an error only when a check cannot run at all; data problems are
/// reported as issues.
pub fn validate(ctx: &ValidationContext<'_>) -> Result<ValidationReport> {
    let specs = ctx.config.column_specs()?;
    let engineered = engineered_columns(&specs);
    let mut issues = Vec::new();

    issues.extend(checks::integrity::check(ctx)?);
    issues.extend(checks::completeness::check(ctx, &specs)?);
    issues.extend(checks::encoding::check(ctx, &engineered)?);
    issues.extend(checks::distribution::check(ctx)?);

    let report = ValidationReport::new(issues);
    for issue in report.warnings() {
        tracing::warn!(category = issue.category().label(), "{}", issue.message());
    }
    for issue in report.errors() {
        tracing::error!(category = issue.category().label(), "{}", issue.message());
    }
    tracing::info!(
        errors = report.errors().count(),
        warnings = report.warnings().count(),
        "validation finished"
    );
    Ok(report)
}
