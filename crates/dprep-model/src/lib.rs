//! Data model for the diabetes data-preparation pipeline.
//!
//! This crate holds the types every other stage shares:
//!
//! - **columns**: dataset column names and configured column roles
//! - **config**: the immutable [`PipelineConfig`] loaded once per run
//! - **error**: the [`PrepError`] type returned by all library crates
//! - **report**: diagnostic reports and fitted encoder/scaler state
//! - **stage**: pipeline stage identifiers used in errors and logs

pub mod bins;
pub mod columns;
pub mod config;
pub mod error;
pub mod report;
pub mod stage;

pub use bins::{BinPosition, BinSpec};
pub use columns::{ColumnRole, ColumnSpec, encoded_column_name};
pub use config::{
    CleaningConfig, DataConfig, FeatureEngineeringConfig, OutOfRangePolicy, ParamsConfig,
    PathsConfig, PipelineConfig, ScalerKind, ScalingConfig, ValidationConfig,
};
pub use error::{PrepError, Result};
pub use report::{
    BinReport, ColumnScale, EncoderState, MissingValueEntry, MissingValueReport, OutlierEntry,
    OutlierReport, ScalerState,
};
pub use stage::Stage;
