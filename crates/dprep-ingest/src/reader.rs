//! CSV file reading.

use std::path::Path;

use polars::prelude::*;

use dprep_common::finite_values;
use dprep_model::{PrepError, Result};

fn csv_error(path: &Path, err: &PolarsError) -> PrepError {
    PrepError::Csv {
        path: path.to_path_buf(),
        message: err.to_string(),
    }
}

/// Replace NaN and infinite readings in float columns with nulls.
fn null_non_finite(mut df: DataFrame, path: &Path) -> Result<DataFrame> {
    let float_columns: Vec<PlSmallStr> = df
        .get_columns()
        .iter()
        .filter(|column| column.dtype().is_float())
        .map(|column| column.name().clone())
        .collect();
    for name in float_columns {
        let column = df.column(name.as_str())?;
        let before = column.null_count();
        let values = finite_values(column)?;
        let replaced = values.null_count() - before;
        if replaced == 0 {
            continue;
        }
        tracing::warn!(
            path = %path.display(),
            column = %name,
            count = replaced,
            "non-finite readings treated as missing"
        );
        df.with_column(values.into_series())?;
    }
    Ok(df)
}

/// Reads the raw dataset into a DataFrame.
///
/// The header row is required. Column types are inferred over the whole file
/// so a late float in an integer-looking column still loads as `Float64`.
/// `NaN` and `inf` cells load as nulls.
///
/// # Errors
///
/// Returns [`PrepError::FileNotFound`] when `path` does not exist,
/// [`PrepError::Io`] when it cannot be inspected, and [`PrepError::Csv`] when
/// parsing fails or the file has no data rows.
pub fn load(path: &Path) -> Result<DataFrame> {
    std::fs::metadata(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PrepError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            PrepError::Io {
                operation: "read",
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| csv_error(path, &e))?
        .finish()
        .map_err(|e| csv_error(path, &e))?;

    let df = null_non_finite(df, path)?;
    if df.height() == 0 {
        return Err(PrepError::Csv {
            path: path.to_path_buf(),
            message: "file has no data rows".to_string(),
        });
    }

    tracing::info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "loaded raw data"
    );
    Ok(df)
}
