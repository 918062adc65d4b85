//! Input schema checks run once before the first transform.

use polars::prelude::*;

use dprep_common::{is_numeric_dtype, numeric_values};
use dprep_model::{PrepError, Result, Stage};

/// Ensures every expected column is present. Extra columns are tolerated.
///
/// # Errors
///
/// Returns [`PrepError::Schema`] naming the first absent column.
pub fn validate_schema(df: &DataFrame, expected: &[String]) -> Result<()> {
    if let Some(missing) = expected
        .iter()
        .find(|name| df.column(name.as_str()).is_err())
    {
        return Err(PrepError::schema(Stage::Load, missing.as_str()));
    }
    let extra: Vec<&str> = df
        .get_column_names()
        .into_iter()
        .map(|name| name.as_str())
        .filter(|name| !expected.iter().any(|expected| expected == name))
        .collect();
    if !extra.is_empty() {
        tracing::debug!(columns = ?extra, "ignoring unconfigured columns");
    }
    Ok(())
}

/// Ensures the listed columns hold numbers.
///
/// Absent columns are left to [`validate_schema`].
///
/// # Errors
///
/// Returns [`PrepError::DataQuality`] for the first non-numeric column.
pub fn check_numeric_columns(df: &DataFrame, columns: &[String]) -> Result<()> {
    for name in columns {
        let Ok(column) = df.column(name) else {
            continue;
        };
        if !is_numeric_dtype(column.dtype()) {
            return Err(PrepError::data_quality(
                Stage::Load,
                name.as_str(),
                format!("expected a numeric column, found {}", column.dtype()),
            ));
        }
    }
    Ok(())
}

/// Ensures the target holds only the binary labels 0 and 1, with no gaps.
///
/// # Errors
///
/// Returns [`PrepError::Schema`] if the column is absent and
/// [`PrepError::DataQuality`] for a missing or non-binary label.
pub fn check_target_values(df: &DataFrame, target: &str) -> Result<()> {
    let column = df
        .column(target)
        .map_err(|_| PrepError::schema(Stage::Load, target))?;
    if !is_numeric_dtype(column.dtype()) {
        return Err(PrepError::data_quality(
            Stage::Load,
            target,
            format!("expected 0/1 labels, found {} values", column.dtype()),
        ));
    }
    for (row, value) in numeric_values(column)?.into_iter().enumerate() {
        match value {
            Some(v) if v == 0.0 || v == 1.0 => {}
            Some(v) => {
                return Err(PrepError::data_quality(
                    Stage::Load,
                    target,
                    format!("row {row} has label {v}, expected 0 or 1"),
                ));
            }
            None => {
                return Err(PrepError::data_quality(
                    Stage::Load,
                    target,
                    format!("row {row} has no label"),
                ));
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    fn frame() -> DataFrame {
        DataFrame::new(vec![
            Column::new("Glucose".into(), vec![148_i64, 85, 183]),
            Column::new("Outcome".into(), vec![1_i64, 0, 1]),
            Column::new("Note".into(), vec!["a", "b", "c"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_validate_schema_tolerates_extra_columns() {
        validate_schema(&frame(), &names(&["Glucose", "Outcome"])).unwrap();
    }

    #[test]
    fn test_validate_schema_names_first_missing_column() {
        let err = validate_schema(&frame(), &names(&["Glucose", "BMI", "Age"])).unwrap_err();
        assert_eq!(
            err.to_string(),
            "column 'BMI' required by the load stage is missing"
        );
    }

    #[test]
    fn test_check_numeric_columns() {
        check_numeric_columns(&frame(), &names(&["Glucose", "Absent"])).unwrap();
        let err = check_numeric_columns(&frame(), &names(&["Note"])).unwrap_err();
        assert!(matches!(err, PrepError::DataQuality { .. }));
    }

    #[test]
    fn test_check_target_values_accepts_binary() {
        check_target_values(&frame(), "Outcome").unwrap();
    }

    #[test]
    fn test_check_target_values_rejects_other_labels() {
        let df = DataFrame::new(vec![Column::new("Outcome".into(), vec![0_i64, 2])]).unwrap();
        let err = check_target_values(&df, "Outcome").unwrap_err();
        assert!(err.to_string().contains("row 1 has label 2"));
    }

    #[test]
    fn test_check_target_values_rejects_missing_labels() {
        let df =
            DataFrame::new(vec![Column::new("Outcome".into(), vec![Some(0_i64), None])]).unwrap();
        assert!(check_target_values(&df, "Outcome").is_err());
    }
}
