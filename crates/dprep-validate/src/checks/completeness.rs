//! Missing-value, impossible-zero and engineered-column presence checks.

use dprep_common::{finite_values, zero_count};
use dprep_model::{ColumnRole, ColumnSpec, OutOfRangePolicy, Result};

use crate::ValidationContext;
use crate::issue::Issue;

fn is_engineered(role: ColumnRole) -> bool {
    matches!(
        role,
        ColumnRole::DerivedCategorical | ColumnRole::EncodedCategorical
    )
}

pub fn check(ctx: &ValidationContext<'_>, specs: &[ColumnSpec]) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();

    for spec in specs.iter().filter(|spec| spec.role == ColumnRole::ImpossibleZero) {
        let Ok(column) = ctx.cleaned.column(&spec.name) else {
            continue;
        };
        let zero_count = zero_count(&finite_values(column)?);
        if zero_count > 0 {
            issues.push(Issue::ImpossibleZero {
                column: spec.name.clone(),
                zero_count,
            });
        }
    }

    for spec in specs.iter().filter(|spec| is_engineered(spec.role)) {
        if ctx.processed.column(&spec.name).is_err() {
            issues.push(Issue::MissingEngineeredColumn {
                column: spec.name.clone(),
            });
        }
    }

    let unlabeled_allowed =
        ctx.config.feature_engineering.out_of_range == OutOfRangePolicy::Unlabeled;
    for column in ctx.processed.get_columns() {
        let null_count = column.null_count();
        if null_count == 0 {
            continue;
        }
        let name = column.name().as_str();
        let engineered = specs
            .iter()
            .any(|spec| spec.name == name && is_engineered(spec.role));
        if unlabeled_allowed && engineered {
            issues.push(Issue::UnlabeledRows {
                column: name.to_string(),
                count: null_count,
            });
        } else {
            issues.push(Issue::MissingValues {
                column: name.to_string(),
                null_count,
            });
        }
    }

    Ok(issues)
}
