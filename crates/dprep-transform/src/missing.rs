//! Impossible-zero detection and median imputation.
//!
//! A zero in a configured column is a missing reading, and so is a null or a
//! non-finite value. Zeros are nulled, the column's median is taken over what
//! remains, and every null is filled with it.

use polars::prelude::*;

use dprep_common::zero_count;
use dprep_model::{MissingValueReport, PrepError, Result, Stage};

use crate::access::{required_numeric, with_replaced};

/// Count exact zeros per column without modifying anything.
///
/// # Errors
///
/// Returns [`PrepError::Schema`] for an absent column.
pub fn missing_value_report(df: &DataFrame, columns: &[String]) -> Result<MissingValueReport> {
    let mut report = MissingValueReport::new(df.height());
    for name in columns {
        let values = required_numeric(df, name, Stage::Clean)?;
        report.push(name.as_str(), zero_count(&values));
    }
    Ok(report)
}

/// Replace zeros and nulls in each column with the column's non-zero median.
///
/// Imputed columns become `Float64`; columns with nothing to fill keep their
/// type. The returned report records the fill value of every column.
///
/// # Errors
///
/// Returns [`PrepError::Schema`] for an absent column and
/// [`PrepError::DataQuality`] when a column has no non-zero finite values.
pub fn resolve_missing(
    df: &DataFrame,
    columns: &[String],
) -> Result<(DataFrame, MissingValueReport)> {
    let mut report = MissingValueReport::new(df.height());
    let mut out = df.clone();

    for name in columns {
        let values = required_numeric(&out, name, Stage::Clean)?;
        let zero_count = zero_count(&values);
        let null_count = values.null_count();

        let observed: Float64Chunked = values
            .into_iter()
            .map(|value| value.filter(|v| *v != 0.0))
            .collect();
        let fill = observed.median().ok_or_else(|| {
            PrepError::data_quality(
                Stage::Clean,
                name.as_str(),
                "no non-zero values to compute a median from",
            )
        })?;

        report.push(name.as_str(), zero_count);
        if let Some(entry) = report.entries.last_mut() {
            entry.fill_value = Some(fill);
        }

        if zero_count == 0 && null_count == 0 {
            tracing::debug!(column = %name, "no missing values");
            continue;
        }

        let filled = observed
            .fill_null_with_values(fill)?
            .with_name(name.as_str().into());
        out = with_replaced(&out, filled.into_series().into())?;

        tracing::debug!(
            column = %name,
            zero_count,
            null_count,
            median = fill,
            "imputed missing values"
        );
    }

    tracing::info!(
        columns = columns.len(),
        total_zeros = report.total_zeros(),
        "resolved impossible zeros"
    );
    Ok((out, report))
}
