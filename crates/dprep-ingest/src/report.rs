//! Summary of the raw dataset as loaded.

use std::path::{Path, PathBuf};

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use dprep_common::{finite_values, zero_count};
use dprep_model::Result;

/// Shape of the raw table and the zero readings in impossible-zero columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoadReport {
    pub path: PathBuf,
    pub rows: usize,
    pub columns: usize,
    /// Exact zeros per configured column; absent columns are omitted.
    pub zero_counts: Vec<(String, usize)>,
}

impl LoadReport {
    /// Build the report for a freshly loaded frame.
    ///
    /// # Errors
    ///
    /// Propagates Polars cast failures.
    pub fn from_frame(path: &Path, df: &DataFrame, zero_columns: &[String]) -> Result<Self> {
        let mut zero_counts = Vec::with_capacity(zero_columns.len());
        for name in zero_columns {
            let Ok(column) = df.column(name) else {
                continue;
            };
            let zeros = zero_count(&finite_values(column)?);
            if zeros > 0 {
                tracing::debug!(column = %name, zeros, "impossible zero readings");
            }
            zero_counts.push((name.clone(), zeros));
        }
        Ok(Self {
            path: path.to_path_buf(),
            rows: df.height(),
            columns: df.width(),
            zero_counts,
        })
    }

    pub fn total_zeros(&self) -> usize {
        self.zero_counts.iter().map(|(_, count)| count).sum()
    }
}
