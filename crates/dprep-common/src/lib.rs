//! Shared utilities for dprep crates.
//!
//! Polars value helpers and the column statistics used by both the
//! transforms and the validator.

pub mod polars;
pub mod stats;

pub use polars::{
    any_to_string, column_names, finite_values, format_numeric, is_numeric_dtype, numeric_values,
};
pub use stats::{quartiles, zero_count};
