//! Validation issue types.
//!
//! Each variant carries only the data its message needs.

use std::fmt;

use serde::{Deserialize, Serialize};

use dprep_model::Stage;

/// Issue severity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    /// Blocks the outputs from being written
    Error,
    /// Should review
    Warning,
}

impl Severity {
    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Error => "Error",
            Self::Warning => "Warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Group of related checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Completeness,
    Integrity,
    Distribution,
    Encoding,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Completeness => "completeness",
            Self::Integrity => "integrity",
            Self::Distribution => "distribution",
            Self::Encoding => "encoding",
        }
    }
}

/// Validation issue - each variant carries only its needed data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Issue {
    // Completeness checks
    /// Processed column has null values
    MissingValues { column: String, null_count: usize },
    /// Derived label column left rows unlabeled by configuration
    UnlabeledRows { column: String, count: usize },
    /// Impossible-zero column still holds zeros after cleaning
    ImpossibleZero { column: String, zero_count: usize },
    /// Derived or encoded column absent from the processed table
    MissingEngineeredColumn { column: String },

    // Integrity checks
    /// A stage added or dropped rows
    RowCountChanged {
        stage: Stage,
        expected: usize,
        found: usize,
    },
    /// Target values differ from the raw data
    TargetModified { column: String, changed: usize },
    /// Target does not have exactly two classes
    TargetClasses { column: String, found: usize },
    /// Identical rows in the raw data
    DuplicateRows { count: usize },

    // Distribution checks
    /// Standardized column mean is not close to zero
    ScaledMean { column: String, value: f64 },
    /// Standardized column standard deviation is not close to one
    ScaledStd { column: String, value: f64 },
    /// Min-max scaled column leaves the unit interval
    ScaledRange { column: String, min: f64, max: f64 },
    /// Standardized column holds values beyond the allowed magnitude
    ExtremeScaledValue {
        column: String,
        min: f64,
        max: f64,
        limit: f64,
    },

    // Encoding checks
    /// Feature or encoded column is not numeric
    NonNumeric { column: String, dtype: String },
    /// Encoded column holds a negative code
    EncodingNegative { column: String, count: usize },
    /// Encoded column has fewer than two distinct codes
    EncodingDegenerate {
        column: String,
        distinct: usize,
        source_categories: usize,
    },
}

impl Issue {
    /// Column the issue refers to, if any.
    pub fn column(&self) -> Option<&str> {
        match self {
            Issue::MissingValues { column, .. }
            | Issue::UnlabeledRows { column, .. }
            | Issue::ImpossibleZero { column, .. }
            | Issue::MissingEngineeredColumn { column }
            | Issue::TargetModified { column, .. }
            | Issue::TargetClasses { column, .. }
            | Issue::ScaledMean { column, .. }
            | Issue::ScaledStd { column, .. }
            | Issue::ScaledRange { column, .. }
            | Issue::ExtremeScaledValue { column, .. }
            | Issue::NonNumeric { column, .. }
            | Issue::EncodingNegative { column, .. }
            | Issue::EncodingDegenerate { column, .. } => Some(column.as_str()),
            Issue::RowCountChanged { .. } | Issue::DuplicateRows { .. } => None,
        }
    }

    /// Category for this issue type.
    pub fn category(&self) -> Category {
        match self {
            Issue::MissingValues { .. }
            | Issue::UnlabeledRows { .. }
            | Issue::ImpossibleZero { .. }
            | Issue::MissingEngineeredColumn { .. } => Category::Completeness,
            Issue::RowCountChanged { .. }
            | Issue::TargetModified { .. }
            | Issue::TargetClasses { .. }
            | Issue::DuplicateRows { .. } => Category::Integrity,
            Issue::ScaledMean { .. }
            | Issue::ScaledStd { .. }
            | Issue::ScaledRange { .. }
            | Issue::ExtremeScaledValue { .. } => Category::Distribution,
            Issue::NonNumeric { .. }
            | Issue::EncodingNegative { .. }
            | Issue::EncodingDegenerate { .. } => Category::Encoding,
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Issue::UnlabeledRows { .. } | Issue::DuplicateRows { .. } => Severity::Warning,
            Issue::EncodingDegenerate {
                source_categories, ..
            } if *source_categories < 2 => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Format message with issue-specific data.
    pub fn message(&self) -> String {
        match self {
            Issue::MissingValues { column, null_count } => {
                format!("Column {column} has {null_count} missing values")
            }
            Issue::UnlabeledRows { column, count } => {
                format!("Column {column} has {count} rows outside every bin")
            }
            Issue::ImpossibleZero { column, zero_count } => {
                format!("Column {column} still has {zero_count} impossible zeros after cleaning")
            }
            Issue::MissingEngineeredColumn { column } => {
                format!("Engineered column {column} is missing")
            }
            Issue::RowCountChanged {
                stage,
                expected,
                found,
            } => format!("Row count changed in the {stage} stage: expected {expected}, found {found}"),
            Issue::TargetModified { column, changed } => {
                format!("Target {column} differs from the raw data in {changed} rows")
            }
            Issue::TargetClasses { column, found } => {
                format!("Target {column} has {found} classes, expected 2")
            }
            Issue::DuplicateRows { count } => format!("Processed data has {count} duplicate rows"),
            Issue::ScaledMean { column, value } => {
                format!("Scaled column {column} has mean {value:.4}, expected 0")
            }
            Issue::ScaledStd { column, value } => {
                format!("Scaled column {column} has standard deviation {value:.4}, expected 1")
            }
            Issue::ScaledRange { column, min, max } => {
                format!("Scaled column {column} spans [{min:.4}, {max:.4}], expected [0, 1]")
            }
            Issue::ExtremeScaledValue {
                column,
                min,
                max,
                limit,
            } => format!(
                "Scaled column {column} spans [{min:.4}, {max:.4}], beyond the limit of {limit}"
            ),
            Issue::NonNumeric { column, dtype } => {
                format!("Column {column} should be numeric, found {dtype}")
            }
            Issue::EncodingNegative { column, count } => {
                format!("Encoded column {column} has {count} negative codes")
            }
            Issue::EncodingDegenerate {
                column,
                distinct,
                source_categories,
            } => format!(
                "Encoded column {column} has {distinct} distinct codes from {source_categories} categories"
            ),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.severity(), self.message())
    }
}
