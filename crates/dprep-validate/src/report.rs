//! Collected validation results.

use serde::{Deserialize, Serialize};

use crate::issue::{Category, Issue, Severity};

/// All issues found in one validation pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    pub fn errors(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity() == Severity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Issue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity() == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// Flattened form recorded in the run manifest.
    pub fn summary(&self) -> ValidationSummary {
        ValidationSummary {
            passed: !self.has_errors(),
            errors: self.errors().count(),
            warnings: self.warnings().count(),
            issues: self
                .issues
                .iter()
                .map(|issue| IssueRecord {
                    severity: issue.severity(),
                    category: issue.category(),
                    column: issue.column().map(str::to_string),
                    message: issue.message(),
                })
                .collect(),
        }
    }
}

/// One issue as a flat record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    pub severity: Severity,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    pub message: String,
}

/// Counts and messages of a validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationSummary {
    pub passed: bool,
    pub errors: usize,
    pub warnings: usize,
    pub issues: Vec<IssueRecord>,
}
