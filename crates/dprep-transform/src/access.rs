//! Checked column access shared by the mutating stages.

use polars::prelude::*;

use dprep_common::{finite_values, is_numeric_dtype};
use dprep_model::{PrepError, Result, Stage};

/// Finite values of a numeric column required by `stage`; NaN and
/// infinities read as null.
pub(crate) fn required_numeric(df: &DataFrame, name: &str, stage: Stage) -> Result<Float64Chunked> {
    let column = df
        .column(name)
        .map_err(|_| PrepError::schema(stage, name))?;
    if !is_numeric_dtype(column.dtype()) {
        return Err(PrepError::data_quality(
            stage,
            name,
            format!("expected a numeric column, found {}", column.dtype()),
        ));
    }
    Ok(finite_values(column)?)
}

/// `df` with `column` added or replaced.
pub(crate) fn with_replaced(df: &DataFrame, column: Column) -> Result<DataFrame> {
    let mut out = df.clone();
    out.with_column(column)?;
    Ok(out)
}
