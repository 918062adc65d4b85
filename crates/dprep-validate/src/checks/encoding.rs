//! Encoded and feature column type checks.

use std::collections::BTreeSet;

use dprep_common::{is_numeric_dtype, numeric_values};
use dprep_model::Result;

use crate::issue::Issue;
use crate::{EngineeredColumn, ValidationContext};

pub fn check(ctx: &ValidationContext<'_>, engineered: &[EngineeredColumn]) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();

    for name in &ctx.config.scaling.columns {
        let Ok(column) = ctx.processed.column(name) else {
            continue;
        };
        if !is_numeric_dtype(column.dtype()) {
            issues.push(Issue::NonNumeric {
                column: name.clone(),
                dtype: column.dtype().to_string(),
            });
        }
    }

    for columns in engineered {
        let Ok(encoded) = ctx.processed.column(&columns.encoded) else {
            continue;
        };
        if !is_numeric_dtype(encoded.dtype()) {
            issues.push(Issue::NonNumeric {
                column: columns.encoded.clone(),
                dtype: encoded.dtype().to_string(),
            });
            continue;
        }

        let codes: Vec<f64> = numeric_values(encoded)?.into_iter().flatten().collect();
        let negative = codes.iter().filter(|code| **code < 0.0).count();
        if negative > 0 {
            issues.push(Issue::EncodingNegative {
                column: columns.encoded.clone(),
                count: negative,
            });
        }

        let distinct: BTreeSet<u64> = codes.iter().map(|code| code.to_bits()).collect();
        if distinct.len() < 2 {
            let source_categories = ctx
                .processed
                .column(&columns.label)
                .ok()
                .and_then(|label| label.str().ok())
                .map_or(0, |labels| {
                    labels.into_iter().flatten().collect::<BTreeSet<&str>>().len()
                });
            issues.push(Issue::EncodingDegenerate {
                column: columns.encoded.clone(),
                distinct: distinct.len(),
                source_categories,
            });
        }
    }

    Ok(issues)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::Severity;
    use dprep_model::PipelineConfig;
    use polars::prelude::*;
    use std::path::Path;

    fn engineered() -> Vec<EngineeredColumn> {
        vec![EngineeredColumn {
            label: "BMI_Category".to_string(),
            encoded: "BMI_Category_encoded".to_string(),
        }]
    }

    fn run(processed: &DataFrame) -> Vec<Issue> {
        let config = PipelineConfig::default_for_root(Path::new("/project"));
        let ctx = ValidationContext {
            raw: processed,
            cleaned: processed,
            processed,
            config: &config,
        };
        check(&ctx, &engineered()).unwrap()
    }

    #[test]
    fn test_valid_encoding_passes() {
        let df = DataFrame::new(vec![
            Column::new("BMI_Category".into(), vec!["Obese", "Normal"]),
            Column::new("BMI_Category_encoded".into(), vec![1_i64, 0]),
        ])
        .unwrap();
        assert!(run(&df).is_empty());
    }

    #[test]
    fn test_negative_codes() {
        let df = DataFrame::new(vec![
            Column::new("BMI_Category".into(), vec!["Obese", "Normal"]),
            Column::new("BMI_Category_encoded".into(), vec![-1_i64, 0]),
        ])
        .unwrap();
        assert_eq!(run(&df), vec![Issue::EncodingNegative {
            column: "BMI_Category_encoded".to_string(),
            count: 1,
        }]);
    }

    #[test]
    fn test_single_category_is_warning() {
        let df = DataFrame::new(vec![
            Column::new("BMI_Category".into(), vec!["Obese", "Obese"]),
            Column::new("BMI_Category_encoded".into(), vec![0_i64, 0]),
        ])
        .unwrap();
        let issues = run(&df);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].severity(), Severity::Warning);
    }

    #[test]
    fn test_collapsed_codes_are_error() {
        let df = DataFrame::new(vec![
            Column::new("BMI_Category".into(), vec!["Obese", "Normal"]),
            Column::new("BMI_Category_encoded".into(), vec![0_i64, 0]),
        ])
        .unwrap();
        let issues = run(&df);
        assert_eq!(issues[0].severity(), Severity::Error);
    }

    #[test]
    fn test_string_feature_is_non_numeric() {
        let df = DataFrame::new(vec![Column::new("Glucose".into(), vec!["high", "low"])]).unwrap();
        assert_eq!(run(&df), vec![Issue::NonNumeric {
            column: "Glucose".to_string(),
            dtype: "str".to_string(),
        }]);
    }
}
