//! Categorical bucket derivation.

use polars::prelude::*;

use dprep_model::{BinPosition, BinReport, BinSpec, OutOfRangePolicy, PrepError, Result, Stage};

use crate::access::{required_numeric, with_replaced};

/// Add `spec.target` holding the label of each row's `spec.source` value.
///
/// Missing source values get a null label. Values outside the outer edges
/// follow `policy`.
///
/// # Errors
///
/// Returns [`PrepError::Schema`] if the source column is absent and
/// [`PrepError::DataQuality`] for a non-numeric source or, under
/// [`OutOfRangePolicy::Reject`], an out-of-range value.
pub fn bin_column(
    df: &DataFrame,
    spec: &BinSpec,
    policy: OutOfRangePolicy,
) -> Result<(DataFrame, BinReport)> {
    let values = required_numeric(df, &spec.source, Stage::Binning)?;
    let last = spec.labels.len().saturating_sub(1);
    let mut counts = vec![0_usize; spec.labels.len()];
    let mut out_of_range = 0;
    let mut labels: Vec<Option<&str>> = Vec::with_capacity(values.len());

    for (row, value) in values.into_iter().enumerate() {
        let Some(value) = value else {
            labels.push(None);
            continue;
        };
        let idx = match spec.locate(value) {
            Some(BinPosition::Inside(idx)) => Some(idx),
            Some(position @ (BinPosition::Below | BinPosition::Above)) => {
                out_of_range += 1;
                match policy {
                    OutOfRangePolicy::Clamp if position == BinPosition::Below => Some(0),
                    OutOfRangePolicy::Clamp => Some(last),
                    OutOfRangePolicy::Unlabeled => None,
                    OutOfRangePolicy::Reject => {
                        return Err(PrepError::data_quality(
                            Stage::Binning,
                            spec.source.as_str(),
                            format!(
                                "value {value} in row {row} is outside [{}, {}]",
                                spec.lower(),
                                spec.upper()
                            ),
                        ));
                    }
                }
            }
            None => None,
        };
        if let Some(idx) = idx {
            counts[idx] += 1;
        }
        labels.push(idx.map(|idx| spec.labels[idx].as_str()));
    }

    let unlabeled = labels.iter().filter(|label| label.is_none()).count();
    if out_of_range > 0 {
        tracing::warn!(
            column = %spec.source,
            out_of_range,
            policy = ?policy,
            "values outside bin edges"
        );
    }

    let column = Column::new(spec.target.as_str().into(), labels);
    let out = with_replaced(df, column)?;
    let report = BinReport {
        source: spec.source.clone(),
        target: spec.target.clone(),
        counts: spec.labels.iter().cloned().zip(counts).collect(),
        out_of_range,
        unlabeled,
    };
    tracing::debug!(
        column = %spec.target,
        counts = ?report.counts,
        populated = report.populated_labels(),
        "derived bins"
    );
    Ok((out, report))
}

/// Apply every bin specification in order.
///
/// # Errors
///
/// Returns the first error raised by [`bin_column`].
pub fn derive_features(
    df: &DataFrame,
    specs: &[BinSpec],
    policy: OutOfRangePolicy,
) -> Result<(DataFrame, Vec<BinReport>)> {
    let mut out = df.clone();
    let mut reports = Vec::with_capacity(specs.len());
    for spec in specs {
        let (next, report) = bin_column(&out, spec, policy)?;
        out = next;
        reports.push(report);
    }
    tracing::info!(features = reports.len(), "derived categorical features");
    Ok((out, reports))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn labels(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| (*value).to_string()).collect()
    }

    fn age_spec() -> BinSpec {
        BinSpec::new(
            "Age",
            "Age_Group",
            vec![0.0, 25.0, 45.0, 65.0, 100.0],
            labels(&["Young", "Adult", "MidAge", "Senior"]),
        )
        .unwrap()
    }

    fn age_frame(values: Vec<f64>) -> DataFrame {
        DataFrame::new(vec![Column::new("Age".into(), values)]).unwrap()
    }

    fn label_at(df: &DataFrame, column: &str, row: usize) -> Option<String> {
        df.column(column)
            .unwrap()
            .str()
            .unwrap()
            .get(row)
            .map(str::to_string)
    }

    #[test]
    fn test_age_labels_are_right_closed() {
        let df = age_frame(vec![30.0, 25.0, 0.0, 45.0, 66.0]);
        let (binned, report) = bin_column(&df, &age_spec(), OutOfRangePolicy::Clamp).unwrap();
        assert_eq!(label_at(&binned, "Age_Group", 0).as_deref(), Some("Adult"));
        assert_eq!(label_at(&binned, "Age_Group", 1).as_deref(), Some("Young"));
        assert_eq!(label_at(&binned, "Age_Group", 2).as_deref(), Some("Young"));
        assert_eq!(label_at(&binned, "Age_Group", 3).as_deref(), Some("Adult"));
        assert_eq!(label_at(&binned, "Age_Group", 4).as_deref(), Some("Senior"));
        assert_eq!(report.out_of_range, 0);
        assert_eq!(report.populated_labels(), 3);
    }

    #[test]
    fn test_clamp_assigns_outer_labels() {
        let df = age_frame(vec![-3.0, 120.0]);
        let (binned, report) = bin_column(&df, &age_spec(), OutOfRangePolicy::Clamp).unwrap();
        assert_eq!(label_at(&binned, "Age_Group", 0).as_deref(), Some("Young"));
        assert_eq!(label_at(&binned, "Age_Group", 1).as_deref(), Some("Senior"));
        assert_eq!(report.out_of_range, 2);
        assert_eq!(report.unlabeled, 0);
    }

    #[test]
    fn test_unlabeled_leaves_nulls() {
        let df = age_frame(vec![120.0, 30.0]);
        let (binned, report) =
            bin_column(&df, &age_spec(), OutOfRangePolicy::Unlabeled).unwrap();
        assert_eq!(label_at(&binned, "Age_Group", 0), None);
        assert_eq!(report.out_of_range, 1);
        assert_eq!(report.unlabeled, 1);
    }

    #[test]
    fn test_reject_fails() {
        let df = age_frame(vec![30.0, 120.0]);
        let err = bin_column(&df, &age_spec(), OutOfRangePolicy::Reject).unwrap_err();
        insta::assert_snapshot!(
            err.to_string(),
            @"binning stage failed on column 'Age': value 120 in row 1 is outside [0, 100]"
        );
    }

    #[test]
    fn test_missing_source_is_schema_error() {
        let df = DataFrame::new(vec![Column::new("BMI".into(), vec![30.0])]).unwrap();
        let err = bin_column(&df, &age_spec(), OutOfRangePolicy::Clamp).unwrap_err();
        assert!(matches!(err, PrepError::Schema { stage: Stage::Binning, .. }));
    }

    #[test]
    fn test_null_source_gives_null_label() {
        let df = DataFrame::new(vec![Column::new("Age".into(), vec![Some(30.0), None])]).unwrap();
        let (binned, report) = bin_column(&df, &age_spec(), OutOfRangePolicy::Clamp).unwrap();
        assert_eq!(label_at(&binned, "Age_Group", 1), None);
        assert_eq!(report.unlabeled, 1);
    }

    #[test]
    fn test_derive_features_adds_every_target() {
        let df = DataFrame::new(vec![
            Column::new("Age".into(), vec![30.0, 70.0]),
            Column::new("BMI".into(), vec![17.0, 31.0]),
        ])
        .unwrap();
        let bmi = BinSpec::new(
            "BMI",
            "BMI_Category",
            vec![0.0, 18.5, 25.0, 30.0, 100.0],
            labels(&["Underweight", "Normal", "Overweight", "Obese"]),
        )
        .unwrap();
        let (out, reports) =
            derive_features(&df, &[age_spec(), bmi], OutOfRangePolicy::Clamp).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(out.width(), 4);
        assert_eq!(label_at(&out, "BMI_Category", 0).as_deref(), Some("Underweight"));
        assert_eq!(label_at(&out, "BMI_Category", 1).as_deref(), Some("Obese"));
        assert_eq!(df.width(), 2);
    }

    proptest! {
        #[test]
        fn clamp_labels_every_row(values in prop::collection::vec(-50.0f64..200.0, 1..100)) {
            let df = age_frame(values.clone());
            let (binned, report) = bin_column(&df, &age_spec(), OutOfRangePolicy::Clamp).unwrap();
            prop_assert_eq!(binned.column("Age_Group").unwrap().null_count(), 0);
            prop_assert_eq!(report.unlabeled, 0);
            let total: usize = report.counts.iter().map(|(_, count)| count).sum();
            prop_assert_eq!(total, values.len());
        }
    }
}
