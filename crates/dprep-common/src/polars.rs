//! Polars helper functions.
//!
//! Value conversions for writing CSV cells and numeric extraction for the
//! statistics in [`crate::stats`].

use polars::prelude::*;

/// Converts a Polars `AnyValue` to a `String` representation.
///
/// Returns an empty string for `Null` and formats floats without trailing
/// zeros.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use dprep_common::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Int64(42)), "42");
/// assert_eq!(any_to_string(AnyValue::Float64(33.6)), "33.6");
/// assert_eq!(any_to_string(AnyValue::String("Adult")), "Adult");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Formats a floating-point number without trailing fractional zeros.
///
/// Uses the shortest representation that round-trips, so written values
/// read back bit-identical.
///
/// # Examples
///
/// ```
/// use dprep_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(1.50), "1.5");
/// assert_eq!(format_numeric(100.0), "100");
/// assert_eq!(format_numeric(-0.25), "-0.25");
/// assert_eq!(format_numeric(-0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    let trimmed = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s.as_str()
    };
    match trimmed {
        "" | "-" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

/// Whether a dtype holds integers or floats.
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Column as `Float64` with NaN and infinities turned into nulls.
///
/// Integer columns are widened; string cells that do not parse become null.
pub fn finite_values(column: &Column) -> PolarsResult<Float64Chunked> {
    let casted = column.cast(&DataType::Float64)?;
    let values = casted.f64()?;
    if values.into_iter().flatten().all(f64::is_finite) {
        return Ok(values.clone());
    }
    Ok(values
        .into_iter()
        .map(|value| value.filter(|v| v.is_finite()))
        .collect::<Float64Chunked>()
        .with_name(column.name().clone()))
}

/// Column values as `f64`, see [`finite_values`].
pub fn numeric_values(column: &Column) -> PolarsResult<Vec<Option<f64>>> {
    Ok(finite_values(column)?.into_iter().collect())
}

/// Column names of a frame, in schema order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}
