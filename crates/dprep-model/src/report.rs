//! Diagnostic reports and fitted transform state.
//!
//! Everything here is produced within one run and only leaves memory through
//! the run manifest.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::ScalerKind;

fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 / total as f64 * 100.0
    }
}

/// Zero counts for one impossible-zero column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MissingValueEntry {
    pub column: String,
    pub zero_count: usize,
    /// Share of all rows, 0-100.
    pub percentage: f64,
    /// Median used to fill the missing values, once imputation ran.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill_value: Option<f64>,
}

/// Missing-value report for the configured impossible-zero columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MissingValueReport {
    pub total_rows: usize,
    pub entries: Vec<MissingValueEntry>,
}

impl MissingValueReport {
    pub fn new(total_rows: usize) -> Self {
        Self {
            total_rows,
            entries: Vec::new(),
        }
    }

    pub fn push(&mut self, column: impl Into<String>, zero_count: usize) {
        self.entries.push(MissingValueEntry {
            column: column.into(),
            zero_count,
            percentage: percentage(zero_count, self.total_rows),
            fill_value: None,
        });
    }

    pub fn get(&self, column: &str) -> Option<&MissingValueEntry> {
        self.entries.iter().find(|entry| entry.column == column)
    }

    pub fn total_zeros(&self) -> usize {
        self.entries.iter().map(|entry| entry.zero_count).sum()
    }
}

/// IQR bounds and outlier count for one column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlierEntry {
    pub column: String,
    pub count: usize,
    pub percentage: f64,
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

/// Outlier report. Columns absent from the table are listed in `skipped`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutlierReport {
    pub total_rows: usize,
    pub entries: Vec<OutlierEntry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<String>,
}

impl OutlierReport {
    pub fn new(total_rows: usize) -> Self {
        Self {
            total_rows,
            ..Self::default()
        }
    }

    pub fn push(&mut self, column: impl Into<String>, q1: f64, q3: f64, multiplier: f64, count: usize) {
        let iqr = q3 - q1;
        self.entries.push(OutlierEntry {
            column: column.into(),
            count,
            percentage: percentage(count, self.total_rows),
            q1,
            q3,
            iqr,
            lower_bound: q1 - multiplier * iqr,
            upper_bound: q3 + multiplier * iqr,
        });
    }

    pub fn get(&self, column: &str) -> Option<&OutlierEntry> {
        self.entries.iter().find(|entry| entry.column == column)
    }
}

/// Label distribution produced by binning one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinReport {
    pub source: String,
    pub target: String,
    /// Rows per label, in label order.
    pub counts: Vec<(String, usize)>,
    /// Values outside the outer edges, whatever the policy did with them.
    pub out_of_range: usize,
    /// Rows left without a label (missing source or unlabeled policy).
    pub unlabeled: usize,
}

impl BinReport {
    /// Number of labels that received at least one row.
    pub fn populated_labels(&self) -> usize {
        self.counts.iter().filter(|(_, count)| *count > 0).count()
    }
}

/// Label-to-code assignment for one categorical column.
///
/// Codes follow the lexicographic order of the distinct labels, so the same
/// table always yields the same codes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderState {
    pub column: String,
    pub encoded_column: String,
    pub codes: BTreeMap<String, i64>,
}

impl EncoderState {
    /// Assign codes `0..n` to the sorted distinct labels.
    pub fn from_labels<'a>(
        column: impl Into<String>,
        encoded_column: impl Into<String>,
        labels: impl IntoIterator<Item = &'a str>,
    ) -> Self {
        let distinct: std::collections::BTreeSet<&str> = labels.into_iter().collect();
        let codes = distinct
            .into_iter()
            .zip(0_i64..)
            .map(|(label, code)| (label.to_string(), code))
            .collect();
        Self {
            column: column.into(),
            encoded_column: encoded_column.into(),
            codes,
        }
    }

    pub fn code(&self, label: &str) -> Option<i64> {
        self.codes.get(label).copied()
    }

    /// Inverse lookup.
    pub fn decode(&self, code: i64) -> Option<&str> {
        self.codes
            .iter()
            .find(|(_, value)| **value == code)
            .map(|(label, _)| label.as_str())
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}

/// Fitted parameters for one scaled column.
///
/// `center` is the mean (standard) or minimum (min-max); `scale` is the
/// standard deviation or the range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnScale {
    pub column: String,
    pub center: f64,
    pub scale: f64,
}

impl ColumnScale {
    pub fn apply(&self, value: f64) -> f64 {
        (value - self.center) / self.scale
    }
}

/// Scaler statistics fitted on the current table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalerState {
    pub kind: ScalerKind,
    pub columns: Vec<ColumnScale>,
}

impl ScalerState {
    pub fn get(&self, column: &str) -> Option<&ColumnScale> {
        self.columns.iter().find(|scale| scale.column == column)
    }
}
