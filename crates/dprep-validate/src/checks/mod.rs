//! Validation checks.

pub mod completeness;
pub mod distribution;
pub mod encoding;
pub mod integrity;
