//! Scaled column distribution checks.
//!
//! Standard scaling must leave each column with mean near 0, population
//! standard deviation near 1 and no value beyond `validation.max_abs_scaled`.
//! Min-max scaling must keep every value inside `[0, 1]`.

use dprep_common::{finite_values, is_numeric_dtype};
use dprep_model::{Result, ScalerKind};
use polars::prelude::{ChunkAgg, ChunkVar};

use crate::ValidationContext;
use crate::issue::Issue;

/// Slack for rounding at the edges of the unit interval.
const UNIT_RANGE_SLACK: f64 = 1e-9;

pub fn check(ctx: &ValidationContext<'_>) -> Result<Vec<Issue>> {
    let tolerances = &ctx.config.validation;
    let mut issues = Vec::new();

    for name in &ctx.config.scaling.columns {
        let Ok(column) = ctx.processed.column(name) else {
            continue;
        };
        if !is_numeric_dtype(column.dtype()) {
            continue;
        }
        let values = finite_values(column)?;
        let (Some(lo), Some(hi)) = (values.min(), values.max()) else {
            continue;
        };

        match ctx.config.scaling.method {
            ScalerKind::Standard => {
                if let Some(value) = values.mean().filter(|m| m.abs() >= tolerances.mean_tolerance) {
                    issues.push(Issue::ScaledMean {
                        column: name.clone(),
                        value,
                    });
                }
                if let Some(value) = values
                    .std(0)
                    .filter(|std| (std - 1.0).abs() >= tolerances.std_tolerance)
                {
                    issues.push(Issue::ScaledStd {
                        column: name.clone(),
                        value,
                    });
                }
                if lo.abs() > tolerances.max_abs_scaled || hi.abs() > tolerances.max_abs_scaled {
                    issues.push(Issue::ExtremeScaledValue {
                        column: name.clone(),
                        min: lo,
                        max: hi,
                        limit: tolerances.max_abs_scaled,
                    });
                }
            }
            ScalerKind::MinMax => {
                if lo < -UNIT_RANGE_SLACK || hi > 1.0 + UNIT_RANGE_SLACK {
                    issues.push(Issue::ScaledRange {
                        column: name.clone(),
                        min: lo,
                        max: hi,
                    });
                }
            }
        }
        tracing::debug!(column = %name, min = lo, max = hi, "checked scaled distribution");
    }

    Ok(issues)
}
