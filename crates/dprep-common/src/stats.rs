//! Column statistics on Polars arrays.
//!
//! Inputs come from [`crate::finite_values`], so nulls, NaN and infinities
//! never take part. Medians, means, standard deviations and extremes are the
//! array's own aggregations (`median`, `mean`, `std`, `min`, `max`); this
//! module adds the pieces the stages share on top of them.

use polars::prelude::*;

/// Number of values exactly equal to zero.
pub fn zero_count(values: &Float64Chunked) -> usize {
    values.into_iter().flatten().filter(|&v| v == 0.0).count()
}

/// First and third quartiles with linear interpolation between ranks.
///
/// `None` when the array holds no values.
///
/// ```
/// use polars::prelude::*;
/// use dprep_common::quartiles;
///
/// let values = Float64Chunked::from_vec("Glucose".into(), vec![1.0, 2.0, 3.0, 4.0]);
/// assert_eq!(quartiles(&values).unwrap(), Some((1.75, 3.25)));
/// ```
pub fn quartiles(values: &Float64Chunked) -> PolarsResult<Option<(f64, f64)>> {
    let q1 = values.quantile(0.25, QuantileMethod::Linear)?;
    let q3 = values.quantile(0.75, QuantileMethod::Linear)?;
    Ok(q1.zip(q3))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finite_values;
    use proptest::prelude::*;

    fn array(values: &[f64]) -> Float64Chunked {
        Float64Chunked::from_slice("values".into(), values)
    }

    #[test]
    fn test_median_ignores_non_finite() {
        let column = Column::new("Glucose".into(), vec![90.0, f64::NAN, 80.0, 200.0, 100.0]);
        let values = finite_values(&column).unwrap();
        assert_eq!(values.median(), Some(95.0));
        assert_eq!(quartiles(&values).unwrap(), Some((87.5, 125.0)));
    }

    #[test]
    fn test_quartiles_interpolate() {
        let values = array(&[50.0, 60.0, 70.0, 80.0, 90.0]);
        assert_eq!(quartiles(&values).unwrap(), Some((60.0, 80.0)));
        assert_eq!(quartiles(&array(&[])).unwrap(), None);
    }

    #[test]
    fn test_zero_count() {
        let values = Float64Chunked::from_slice_options(
            "Insulin".into(),
            &[Some(0.0), None, Some(94.0), Some(0.0)],
        );
        assert_eq!(zero_count(&values), 2);
    }

    #[test]
    fn test_population_std() {
        let values = array(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(values.mean(), Some(5.0));
        assert!((values.std(0).unwrap() - 2.0).abs() < 1e-12);
        assert_eq!(array(&[5.0, 5.0, 5.0]).std(0), Some(0.0));
    }

    proptest! {
        #[test]
        fn quartiles_are_ordered(values in prop::collection::vec(-1e6f64..1e6, 1..200)) {
            let values = array(&values);
            let (q1, q3) = quartiles(&values).unwrap().unwrap();
            let median = values.median().unwrap();
            let eps = 1e-6;
            prop_assert!(values.min().unwrap() <= q1 + eps);
            prop_assert!(q1 <= median + eps);
            prop_assert!(median <= q3 + eps);
            prop_assert!(q3 <= values.max().unwrap() + eps);
        }

        #[test]
        fn std_is_non_negative(values in prop::collection::vec(-1e6f64..1e6, 1..200)) {
            prop_assert!(array(&values).std(0).unwrap() >= 0.0);
        }
    }
}
