//! Pipeline stage identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A stage of the preparation pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Load,
    Clean,
    Outliers,
    Binning,
    Encoding,
    Scaling,
    Validation,
    Write,
}

impl Stage {
    /// Human-readable label.
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Load => "load",
            Self::Clean => "missing-value",
            Self::Outliers => "outlier",
            Self::Binning => "binning",
            Self::Encoding => "encoding",
            Self::Scaling => "scaling",
            Self::Validation => "validation",
            Self::Write => "write",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
