//! Row count, target and duplicate checks.

use std::collections::BTreeSet;

use polars::prelude::*;

use dprep_common::numeric_values;
use dprep_model::{Result, Stage};

use crate::ValidationContext;
use crate::issue::Issue;

/// Check that no rows were added or dropped and the target survived untouched.
pub fn check(ctx: &ValidationContext<'_>) -> Result<Vec<Issue>> {
    let mut issues = Vec::new();
    let expected = ctx.raw.height();

    for (stage, table) in [(Stage::Clean, ctx.cleaned), (Stage::Scaling, ctx.processed)] {
        if table.height() != expected {
            issues.push(Issue::RowCountChanged {
                stage,
                expected,
                found: table.height(),
            });
        }
    }

    issues.extend(check_target(ctx)?);

    let duplicates = duplicate_rows(ctx.processed)?;
    if duplicates > 0 {
        issues.push(Issue::DuplicateRows { count: duplicates });
    }
    Ok(issues)
}

fn check_target(ctx: &ValidationContext<'_>) -> Result<Vec<Issue>> {
    let target = ctx.config.target_column();
    let mut issues = Vec::new();

    let (Ok(raw), Ok(processed)) = (ctx.raw.column(target), ctx.processed.column(target)) else {
        issues.push(Issue::TargetModified {
            column: target.to_string(),
            changed: ctx.raw.height(),
        });
        return Ok(issues);
    };

    let before = numeric_values(raw)?;
    let after = numeric_values(processed)?;
    let bits = |value: &Option<f64>| value.map(f64::to_bits);
    let changed = before
        .iter()
        .zip(&after)
        .filter(|(a, b)| bits(*a) != bits(*b))
        .count()
        + before.len().abs_diff(after.len());
    if changed > 0 {
        issues.push(Issue::TargetModified {
            column: target.to_string(),
            changed,
        });
    }

    let classes: BTreeSet<u64> = after.iter().flatten().map(|v| v.to_bits()).collect();
    if classes.len() != 2 {
        issues.push(Issue::TargetClasses {
            column: target.to_string(),
            found: classes.len(),
        });
    }
    Ok(issues)
}

/// Number of rows identical to an earlier row.
pub fn duplicate_rows(df: &DataFrame) -> Result<usize> {
    let unique = df
        .clone()
        .lazy()
        .unique_stable(None, UniqueKeepStrategy::First)
        .collect()?;
    Ok(df.height() - unique.height())
}
