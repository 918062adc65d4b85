//! Sorted-label integer encoding.

use polars::prelude::*;

use dprep_model::{EncoderState, PrepError, Result, Stage, encoded_column_name};

use crate::access::with_replaced;

/// Add `<column>_encoded` holding the code of each row's label.
///
/// Codes are assigned in lexicographic order of the distinct non-null labels,
/// starting at zero. Null labels stay null.
///
/// # Errors
///
/// Returns [`PrepError::Schema`] if the column is absent and
/// [`PrepError::DataQuality`] if it is not a string column.
pub fn encode_column(df: &DataFrame, column: &str) -> Result<(DataFrame, EncoderState)> {
    let source = df
        .column(column)
        .map_err(|_| PrepError::schema(Stage::Encoding, column))?;
    if source.dtype() != &DataType::String {
        return Err(PrepError::data_quality(
            Stage::Encoding,
            column,
            format!("expected a categorical column, found {}", source.dtype()),
        ));
    }
    let labels = source.str()?;

    let state = EncoderState::from_labels(column, encoded_column_name(column), labels.into_iter().flatten());
    let codes: Vec<Option<i64>> = labels
        .into_iter()
        .map(|label| label.and_then(|label| state.code(label)))
        .collect();

    let out = with_replaced(df, Column::new(state.encoded_column.as_str().into(), codes))?;
    tracing::debug!(column, categories = state.len(), "encoded labels");
    Ok((out, state))
}

/// Encode every listed column.
///
/// # Errors
///
/// Returns the first error raised by [`encode_column`].
pub fn encode_features(df: &DataFrame, columns: &[String]) -> Result<(DataFrame, Vec<EncoderState>)> {
    let mut out = df.clone();
    let mut states = Vec::with_capacity(columns.len());
    for column in columns {
        let (next, state) = encode_column(&out, column)?;
        out = next;
        states.push(state);
    }
    tracing::info!(columns = states.len(), "encoded categorical features");
    Ok((out, states))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn codes(df: &DataFrame, column: &str) -> Vec<Option<i64>> {
        df.column(column).unwrap().i64().unwrap().into_iter().collect()
    }

    #[test]
    fn test_codes_follow_sorted_labels() {
        let df = DataFrame::new(vec![Column::new(
            "Glucose_Level".into(),
            vec!["Prediabetes", "Normal", "Diabetes", "Normal"],
        )])
        .unwrap();
        let (encoded, state) = encode_column(&df, "Glucose_Level").unwrap();
        assert_eq!(state.encoded_column, "Glucose_Level_encoded");
        assert_eq!(
            codes(&encoded, "Glucose_Level_encoded"),
            vec![Some(2), Some(1), Some(0), Some(1)]
        );
        assert_eq!(state.decode(2), Some("Prediabetes"));
    }

    #[test]
    fn test_null_label_stays_null() {
        let df = DataFrame::new(vec![Column::new(
            "Age_Group".into(),
            vec![Some("Young"), None, Some("Adult")],
        )])
        .unwrap();
        let (encoded, state) = encode_column(&df, "Age_Group").unwrap();
        assert_eq!(codes(&encoded, "Age_Group_encoded"), vec![Some(1), None, Some(0)]);
        assert_eq!(state.len(), 2);
    }

    #[test]
    fn test_numeric_column_is_rejected() {
        let df = DataFrame::new(vec![Column::new("Age".into(), vec![21_i64])]).unwrap();
        let err = encode_column(&df, "Age").unwrap_err();
        assert!(matches!(err, PrepError::DataQuality { stage: Stage::Encoding, .. }));
    }

    #[test]
    fn test_missing_column_is_schema_error() {
        let df = DataFrame::new(vec![Column::new("Age".into(), vec![21_i64])]).unwrap();
        assert!(matches!(
            encode_column(&df, "BMI_Category").unwrap_err(),
            PrepError::Schema { .. }
        ));
    }

    proptest! {
        #[test]
        fn encoding_is_deterministic_and_non_negative(
            labels in prop::collection::vec(prop::sample::select(vec!["Young", "Adult", "MidAge", "Senior"]), 1..60)
        ) {
            let df = DataFrame::new(vec![Column::new("Age_Group".into(), labels.clone())]).unwrap();
            let (first, first_state) = encode_column(&df, "Age_Group").unwrap();
            let (second, second_state) = encode_column(&df, "Age_Group").unwrap();
            prop_assert_eq!(&first_state, &second_state);
            let first_codes = codes(&first, "Age_Group_encoded");
            prop_assert_eq!(&first_codes, &codes(&second, "Age_Group_encoded"));
            for (label, code) in labels.iter().zip(&first_codes) {
                let code = code.unwrap();
                prop_assert!(code >= 0);
                prop_assert_eq!(first_state.decode(code), Some(*label));
            }
        }
    }
}
