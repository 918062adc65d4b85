//! IQR outlier report.

use polars::prelude::*;

use dprep_common::{finite_values, is_numeric_dtype, quartiles};
use dprep_model::{OutlierReport, Result};

/// Outlier share (percent) above which a column is flagged in the log.
const HIGH_OUTLIER_SHARE: f64 = 10.0;

/// Count values strictly outside `[Q1 - k*IQR, Q3 + k*IQR]` per column.
///
/// Absent, non-numeric and all-null columns are skipped. Nulls and
/// non-finite values are ignored.
///
/// # Errors
///
/// Propagates Polars cast failures.
pub fn outlier_report(df: &DataFrame, columns: &[String], multiplier: f64) -> Result<OutlierReport> {
    let mut report = OutlierReport::new(df.height());

    for name in columns {
        let Ok(column) = df.column(name) else {
            tracing::debug!(column = %name, "outlier column absent, skipping");
            report.skipped.push(name.clone());
            continue;
        };
        if !is_numeric_dtype(column.dtype()) {
            tracing::debug!(column = %name, dtype = %column.dtype(), "outlier column not numeric, skipping");
            report.skipped.push(name.clone());
            continue;
        }
        let values = finite_values(column)?;
        let Some((q1, q3)) = quartiles(&values)? else {
            report.skipped.push(name.clone());
            continue;
        };

        let iqr = q3 - q1;
        let lower = q1 - multiplier * iqr;
        let upper = q3 + multiplier * iqr;
        let count = values
            .into_iter()
            .flatten()
            .filter(|&value| value < lower || value > upper)
            .count();
        report.push(name.as_str(), q1, q3, multiplier, count);

        if let Some(entry) = report.entries.last() {
            if entry.percentage > HIGH_OUTLIER_SHARE {
                tracing::warn!(
                    column = %name,
                    count,
                    percentage = entry.percentage,
                    "high outlier share"
                );
            } else {
                tracing::debug!(column = %name, q1, q3, lower, upper, count, "outlier bounds");
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_string()).collect()
    }

    #[test]
    fn test_iqr_bounds_and_count() {
        // Q1 = 60, Q3 = 80 over the nine values.
        let df = DataFrame::new(vec![Column::new(
            "Glucose".into(),
            vec![50.0, 60.0, 60.0, 70.0, 70.0, 75.0, 80.0, 80.0, 150.0],
        )])
        .unwrap();

        let report = outlier_report(&df, &columns(&["Glucose"]), 1.5).unwrap();
        let entry = report.get("Glucose").unwrap();
        assert_eq!(entry.q1, 60.0);
        assert_eq!(entry.q3, 80.0);
        assert_eq!(entry.iqr, 20.0);
        assert_eq!(entry.lower_bound, 30.0);
        assert_eq!(entry.upper_bound, 110.0);
        assert_eq!(entry.count, 1);
    }

    #[test]
    fn test_value_on_bound_is_not_outlier() {
        let df = DataFrame::new(vec![Column::new(
            "BMI".into(),
            vec![60.0, 60.0, 70.0, 80.0, 80.0, 110.0, 30.0, 70.0, 70.0],
        )])
        .unwrap();
        let report = outlier_report(&df, &columns(&["BMI"]), 1.5).unwrap();
        let entry = report.get("BMI").unwrap();
        assert_eq!((entry.q1, entry.q3), (60.0, 80.0));
        assert_eq!(entry.count, 0);
    }

    #[test]
    fn test_absent_column_is_skipped() {
        let df = DataFrame::new(vec![Column::new("Age".into(), vec![21_i64, 33, 50])]).unwrap();
        let report = outlier_report(&df, &columns(&["Age", "Insulin"]), 1.5).unwrap();
        assert!(report.get("Age").is_some());
        assert!(report.get("Insulin").is_none());
        assert_eq!(report.skipped, vec!["Insulin".to_string()]);
    }

    #[test]
    fn test_nulls_are_ignored() {
        let df = DataFrame::new(vec![Column::new(
            "Insulin".into(),
            vec![Some(1.0), None, Some(2.0), Some(3.0), Some(4.0), Some(5.0)],
        )])
        .unwrap();
        let report = outlier_report(&df, &columns(&["Insulin"]), 1.5).unwrap();
        let entry = report.get("Insulin").unwrap();
        assert_eq!(entry.q1, 2.0);
        assert_eq!(entry.q3, 4.0);
        assert_eq!(entry.count, 0);
    }

    #[test]
    fn test_non_finite_values_are_ignored() {
        let df = DataFrame::new(vec![Column::new(
            "Glucose".into(),
            vec![1.0, f64::NAN, 2.0, 3.0, f64::INFINITY, 4.0, 5.0],
        )])
        .unwrap();
        let report = outlier_report(&df, &columns(&["Glucose"]), 1.5).unwrap();
        let entry = report.get("Glucose").unwrap();
        assert_eq!((entry.q1, entry.q3), (2.0, 4.0));
        assert_eq!(entry.count, 0);
    }

    proptest! {
        #[test]
        fn report_never_mutates_and_bounds_bracket_quartiles(
            values in prop::collection::vec(0.0f64..500.0, 1..100)
        ) {
            let df = DataFrame::new(vec![Column::new("Glucose".into(), values.clone())]).unwrap();
            let report = outlier_report(&df, &columns(&["Glucose"]), 1.5).unwrap();
            let entry = report.get("Glucose").unwrap();
            prop_assert!(entry.lower_bound <= entry.q1);
            prop_assert!(entry.q3 <= entry.upper_bound);
            prop_assert!(entry.count <= values.len());
            let after: Vec<Option<f64>> = df.column("Glucose").unwrap().f64().unwrap().into_iter().collect();
            prop_assert_eq!(after, values.into_iter().map(Some).collect::<Vec<_>>());
        }
    }
}
