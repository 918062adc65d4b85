//! Raw dataset ingestion.
//!
//! Loads the diabetes CSV into a Polars DataFrame and checks it against the
//! configured schema before any transform runs.
//!
//! # Example
//!
//! ```ignore
//! use dprep_ingest::{load, validate_schema, LoadReport};
//!
//! let df = load(&config.paths.raw_data)?;
//! validate_schema(&df, &config.expected_columns())?;
//! let report = LoadReport::from_frame(&config.paths.raw_data, &df, &config.cleaning.zero_missing_features)?;
//! ```

mod reader;
mod report;
mod schema;

// === CSV Reading ===
pub use reader::load;

// === Load Report ===
pub use report::LoadReport;

// === Schema Checks ===
pub use schema::{check_numeric_columns, check_target_values, validate_schema};
