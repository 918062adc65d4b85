//! Bin specifications for categorical feature derivation.
//!
//! Intervals are right-closed, `(edge[i], edge[i + 1]]`, except the first
//! which also includes its lower edge: `[edge[0], edge[1]]`.

use serde::{Deserialize, Serialize};

use crate::error::{PrepError, Result};
use crate::stage::Stage;

/// Where a value falls relative to a bin specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinPosition {
    /// Index of the containing interval.
    Inside(usize),
    /// Strictly below the lowest edge.
    Below,
    /// Strictly above the highest edge.
    Above,
}

/// Ordered edges and labels partitioning a numeric column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BinSpec {
    /// Numeric column to bin.
    pub source: String,
    /// Name of the derived label column.
    pub target: String,
    pub edges: Vec<f64>,
    pub labels: Vec<String>,
}

impl BinSpec {
    /// Build a validated bin specification.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::DataQuality`] when fewer than two edges are given,
    /// an edge is not finite, edges are not strictly increasing, the label
    /// count is not `edges.len() - 1`, or labels repeat.
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        edges: Vec<f64>,
        labels: Vec<String>,
    ) -> Result<Self> {
        let spec = Self {
            source: source.into(),
            target: target.into(),
            edges,
            labels,
        };
        spec.validate()?;
        Ok(spec)
    }

    fn validate(&self) -> Result<()> {
        let invalid = |reason: String| PrepError::data_quality(Stage::Binning, &self.source, reason);
        if self.edges.len() < 2 {
            return Err(invalid(format!(
                "at least two bin edges are required, found {}",
                self.edges.len()
            )));
        }
        if let Some(edge) = self.edges.iter().find(|edge| !edge.is_finite()) {
            return Err(invalid(format!("bin edge {edge} is not finite")));
        }
        if let Some(pair) = self.edges.windows(2).find(|pair| pair[0] >= pair[1]) {
            return Err(invalid(format!(
                "bin edges must be strictly increasing ({} >= {})",
                pair[0], pair[1]
            )));
        }
        if self.labels.len() != self.edges.len() - 1 {
            return Err(invalid(format!(
                "{} edges need {} labels, found {}",
                self.edges.len(),
                self.edges.len() - 1,
                self.labels.len()
            )));
        }
        for (idx, label) in self.labels.iter().enumerate() {
            if label.trim().is_empty() {
                return Err(invalid(format!("bin label {idx} is empty")));
            }
            if self.labels[..idx].contains(label) {
                return Err(invalid(format!("bin label '{label}' is repeated")));
            }
        }
        Ok(())
    }

    /// Lowest edge.
    pub fn lower(&self) -> f64 {
        self.edges.first().copied().unwrap_or(f64::NEG_INFINITY)
    }

    /// Highest edge.
    pub fn upper(&self) -> f64 {
        self.edges.last().copied().unwrap_or(f64::INFINITY)
    }

    /// Locate `value` among the intervals. Returns `None` for NaN.
    pub fn locate(&self, value: f64) -> Option<BinPosition> {
        if value.is_nan() {
            return None;
        }
        if value < self.lower() {
            return Some(BinPosition::Below);
        }
        if value > self.upper() {
            return Some(BinPosition::Above);
        }
        // First edge >= value; the interval ends at that edge.
        let idx = self.edges.partition_point(|edge| *edge < value);
        Some(BinPosition::Inside(idx.saturating_sub(1)))
    }
}
