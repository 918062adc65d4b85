//! Standard and min-max scaling.
//!
//! Statistics are fitted on the table being transformed and applied to it
//! immediately. Nulls and non-finite values are excluded from fitting and come
//! out null.

use polars::prelude::*;

use dprep_model::{ColumnScale, PrepError, Result, ScalerKind, ScalerState, Stage};

use crate::access::{required_numeric, with_replaced};

fn check_fit(name: &str, what: &str, center: f64, scale: f64) -> Result<()> {
    if !center.is_finite() || !scale.is_finite() {
        return Err(PrepError::data_quality(
            Stage::Scaling,
            name,
            format!("{what} is not finite, column cannot be scaled"),
        ));
    }
    if scale.abs() <= f64::EPSILON * center.abs().max(1.0) {
        return Err(PrepError::data_quality(
            Stage::Scaling,
            name,
            format!("{what} is zero, column cannot be scaled"),
        ));
    }
    Ok(())
}

/// Fit per-column center and scale.
///
/// # Errors
///
/// Returns [`PrepError::Schema`] for an absent column and
/// [`PrepError::DataQuality`] for a non-numeric or all-null column, or one
/// whose standard deviation (standard) or range (min-max) is zero or not
/// finite.
pub fn fit_scaler(df: &DataFrame, columns: &[String], kind: ScalerKind) -> Result<ScalerState> {
    let mut fitted = Vec::with_capacity(columns.len());
    for name in columns {
        let values = required_numeric(df, name, Stage::Scaling)?;
        let no_values = || PrepError::data_quality(Stage::Scaling, name.as_str(), "column has no values");
        let (center, scale, what) = match kind {
            ScalerKind::Standard => {
                let center = values.mean().ok_or_else(no_values)?;
                let std = values.std(0).ok_or_else(no_values)?;
                (center, std, "standard deviation")
            }
            ScalerKind::MinMax => {
                let lo = values.min().ok_or_else(no_values)?;
                let hi = values.max().ok_or_else(no_values)?;
                (lo, hi - lo, "range")
            }
        };
        check_fit(name, what, center, scale)?;
        tracing::debug!(column = %name, center, scale, method = kind.label(), "fitted scaler");
        fitted.push(ColumnScale {
            column: name.clone(),
            center,
            scale,
        });
    }
    Ok(ScalerState {
        kind,
        columns: fitted,
    })
}

/// Replace each fitted column with its scaled `Float64` values.
///
/// # Errors
///
/// Returns [`PrepError::Schema`] if a fitted column is absent.
pub fn apply_scaler(df: &DataFrame, state: &ScalerState) -> Result<DataFrame> {
    let mut out = df.clone();
    for scale in &state.columns {
        let values = required_numeric(&out, &scale.column, Stage::Scaling)?;
        let scaled: Vec<Option<f64>> = values
            .into_iter()
            .map(|value| value.map(|v| scale.apply(v)))
            .collect();
        out = with_replaced(&out, Column::new(scale.column.as_str().into(), scaled))?;
    }
    Ok(out)
}

/// Fit on `df` and transform it in one step.
///
/// Nothing is returned when any column fails to fit.
///
/// # Errors
///
/// See [`fit_scaler`].
pub fn scale_columns(
    df: &DataFrame,
    columns: &[String],
    kind: ScalerKind,
) -> Result<(DataFrame, ScalerState)> {
    let state = fit_scaler(df, columns, kind)?;
    let out = apply_scaler(df, &state)?;
    tracing::info!(columns = state.columns.len(), method = kind.label(), "scaled features");
    Ok((out, state))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| (*name).to_string()).collect()
    }

    fn values(df: &DataFrame, column: &str) -> Vec<f64> {
        df.column(column)
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .flatten()
            .collect()
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-12, "{actual:?} != {expected:?}");
        }
    }

    #[test]
    fn test_standard_scaling_centers_and_scales() {
        let df = DataFrame::new(vec![Column::new(
            "Age".into(),
            vec![2_i64, 4, 4, 4, 5, 5, 7, 9],
        )])
        .unwrap();
        let (scaled, state) = scale_columns(&df, &columns(&["Age"]), ScalerKind::Standard).unwrap();
        let age = state.get("Age").unwrap();
        assert_eq!(age.center, 5.0);
        assert!((age.scale - 2.0).abs() < 1e-12);
        assert_close(
            &values(&scaled, "Age"),
            &[-1.5, -0.5, -0.5, -0.5, 0.0, 0.0, 1.0, 2.0],
        );
    }

    #[test]
    fn test_min_max_scaling() {
        let df = DataFrame::new(vec![Column::new("BMI".into(), vec![20.0, 30.0, 40.0])]).unwrap();
        let (scaled, state) = scale_columns(&df, &columns(&["BMI"]), ScalerKind::MinMax).unwrap();
        assert_eq!(state.kind, ScalerKind::MinMax);
        assert_eq!(values(&scaled, "BMI"), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_constant_column_fails() {
        let df = DataFrame::new(vec![Column::new("Insulin".into(), vec![5.0, 5.0, 5.0])]).unwrap();
        let err = scale_columns(&df, &columns(&["Insulin"]), ScalerKind::Standard).unwrap_err();
        insta::assert_snapshot!(
            err.to_string(),
            @"scaling stage failed on column 'Insulin': standard deviation is zero, column cannot be scaled"
        );
        let err = scale_columns(&df, &columns(&["Insulin"]), ScalerKind::MinMax).unwrap_err();
        assert!(err.to_string().contains("range is zero"));
    }

    #[test]
    fn test_nan_is_excluded_from_fit_and_left_null() {
        let df = DataFrame::new(vec![Column::new(
            "Glucose".into(),
            vec![f64::NAN, 20.0, 30.0, 40.0],
        )])
        .unwrap();
        let (scaled, state) = scale_columns(&df, &columns(&["Glucose"]), ScalerKind::MinMax).unwrap();
        assert_eq!(state.get("Glucose").unwrap().center, 20.0);
        let glucose: Vec<Option<f64>> =
            scaled.column("Glucose").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(glucose, vec![None, Some(0.0), Some(0.5), Some(1.0)]);
    }

    #[test]
    fn test_overflowing_fit_is_not_finite() {
        let df = DataFrame::new(vec![Column::new("Insulin".into(), vec![-f64::MAX, f64::MAX])])
            .unwrap();
        let err = scale_columns(&df, &columns(&["Insulin"]), ScalerKind::MinMax).unwrap_err();
        insta::assert_snapshot!(
            err.to_string(),
            @"scaling stage failed on column 'Insulin': range is not finite, column cannot be scaled"
        );
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let df = DataFrame::new(vec![Column::new("Age".into(), vec![1.0, 2.0])]).unwrap();
        let err = fit_scaler(&df, &columns(&["Pregnancies"]), ScalerKind::Standard).unwrap_err();
        assert!(matches!(err, PrepError::Schema { stage: Stage::Scaling, .. }));
    }

    #[test]
    fn test_unlisted_columns_untouched() {
        let df = DataFrame::new(vec![
            Column::new("Age".into(), vec![21.0, 50.0]),
            Column::new("Outcome".into(), vec![0_i64, 1]),
        ])
        .unwrap();
        let (scaled, _) = scale_columns(&df, &columns(&["Age"]), ScalerKind::Standard).unwrap();
        let outcome: Vec<Option<i64>> =
            scaled.column("Outcome").unwrap().i64().unwrap().into_iter().collect();
        assert_eq!(outcome, vec![Some(0), Some(1)]);
    }

    proptest! {
        #[test]
        fn standard_scaling_has_zero_mean_unit_std(
            values in prop::collection::vec(0.0f64..1000.0, 2..200)
        ) {
            let input = Float64Chunked::from_vec("Glucose".into(), values);
            prop_assume!(input.std(0).unwrap() > 1e-3);
            let df = DataFrame::new(vec![input.into_series().into()]).unwrap();
            let (scaled, _) = scale_columns(&df, &columns(&["Glucose"]), ScalerKind::Standard).unwrap();
            let out = scaled.column("Glucose").unwrap().f64().unwrap().clone();
            prop_assert!(out.mean().unwrap().abs() < 1e-6);
            prop_assert!((out.std(0).unwrap() - 1.0).abs() < 1e-6);
        }

        #[test]
        fn min_max_scaling_stays_in_unit_interval(
            values in prop::collection::vec(-500.0f64..500.0, 2..200)
        ) {
            let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
            let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            prop_assume!(hi - lo > 1e-3);
            let df = DataFrame::new(vec![Column::new("BMI".into(), values)]).unwrap();
            let (scaled, _) = scale_columns(&df, &columns(&["BMI"]), ScalerKind::MinMax).unwrap();
            for value in self::values(&scaled, "BMI") {
                prop_assert!((-1e-12..=1.0 + 1e-12).contains(&value));
            }
        }
    }
}
