//! Dataset transforms.
//!
//! Every stage borrows the incoming table and returns a new one, so the
//! caller's frame is never modified:
//!
//! - **missing**: impossible-zero report and median imputation
//! - **outliers**: IQR outlier report (never mutates)
//! - **binning**: categorical buckets from numeric columns
//! - **encoding**: sorted-label integer codes for categorical columns
//! - **scaling**: standard and min-max scaling
//! - **pipeline**: the clean and feature-engineering sequences

mod access;
pub mod binning;
pub mod encoding;
pub mod missing;
pub mod outliers;
pub mod pipeline;
pub mod scaling;

pub use binning::{bin_column, derive_features};
pub use encoding::{encode_column, encode_features};
pub use missing::{missing_value_report, resolve_missing};
pub use outliers::outlier_report;
pub use pipeline::{CleanOutput, EngineerOutput, clean, engineer};
pub use scaling::{apply_scaler, fit_scaler, scale_columns};
