//! DataFrame to CSV.

use std::path::Path;

use polars::prelude::*;

use dprep_common::any_to_string;
use dprep_model::{PrepError, Result};

use crate::atomic::write_atomic;

fn csv_error(err: &csv::Error) -> PrepError {
    PrepError::Serialize {
        what: "CSV",
        message: err.to_string(),
    }
}

/// Render a frame as CSV with a header row.
///
/// Nulls become empty cells; floats use their shortest round-trip form.
///
/// # Errors
///
/// Returns [`PrepError::DataFrame`] if a cell cannot be read and
/// [`PrepError::Serialize`] if the CSV writer fails.
pub fn render_csv(df: &DataFrame) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(df.get_column_names().iter().map(|name| name.as_str()))
        .map_err(|e| csv_error(&e))?;

    let columns = df.get_columns();
    let mut record = Vec::with_capacity(columns.len());
    for idx in 0..df.height() {
        record.clear();
        for column in columns {
            record.push(any_to_string(column.get(idx)?));
        }
        writer.write_record(&record).map_err(|e| csv_error(&e))?;
    }

    writer.into_inner().map_err(|e| PrepError::Serialize {
        what: "CSV",
        message: e.to_string(),
    })
}

/// Write a frame to `path` as CSV, atomically.
///
/// # Errors
///
/// Returns any error from [`render_csv`] or [`write_atomic`].
pub fn save(df: &DataFrame, path: &Path) -> Result<()> {
    let bytes = render_csv(df)?;
    write_atomic(path, &bytes)?;
    tracing::info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "saved table"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_csv() {
        let df = DataFrame::new(vec![
            Column::new("Glucose".into(), vec![Some(148.0), Some(95.0)]),
            Column::new("Age_Group".into(), vec![Some("MidAge"), None]),
            Column::new("Outcome".into(), vec![1_i64, 0]),
        ])
        .unwrap();
        let text = String::from_utf8(render_csv(&df).unwrap()).unwrap();
        assert_eq!(text, "Glucose,Age_Group,Outcome\n148,MidAge,1\n95,,0\n");
    }

    #[test]
    fn test_render_csv_keeps_precision() {
        let value = -0.123_456_789_012_345_67_f64;
        let df = DataFrame::new(vec![Column::new("BMI".into(), vec![value])]).unwrap();
        let text = String::from_utf8(render_csv(&df).unwrap()).unwrap();
        let written: f64 = text.lines().nth(1).unwrap().parse().unwrap();
        assert_eq!(written.to_bits(), value.to_bits());
    }
}
