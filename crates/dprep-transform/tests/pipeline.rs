//! Tests for the clean and feature-engineering sequences.

use std::path::Path;

use dprep_common::{finite_values, numeric_values};
use dprep_model::{PipelineConfig, ScalerKind};
use dprep_transform::{clean, engineer};
use polars::prelude::*;

const HEADER: [&str; 9] = [
    "Pregnancies",
    "Glucose",
    "BloodPressure",
    "SkinThickness",
    "Insulin",
    "BMI",
    "DiabetesPedigreeFunction",
    "Age",
    "Outcome",
];

const ROWS: [[f64; 9]; 12] = [
    [6.0, 148.0, 72.0, 35.0, 0.0, 33.6, 0.627, 50.0, 1.0],
    [1.0, 85.0, 66.0, 29.0, 0.0, 26.6, 0.351, 31.0, 0.0],
    [8.0, 183.0, 64.0, 0.0, 0.0, 23.3, 0.672, 32.0, 1.0],
    [1.0, 89.0, 66.0, 23.0, 94.0, 28.1, 0.167, 21.0, 0.0],
    [0.0, 137.0, 40.0, 35.0, 168.0, 43.1, 2.288, 33.0, 1.0],
    [5.0, 116.0, 74.0, 0.0, 0.0, 25.6, 0.201, 30.0, 0.0],
    [3.0, 78.0, 50.0, 32.0, 88.0, 31.0, 0.248, 26.0, 1.0],
    [10.0, 115.0, 0.0, 0.0, 0.0, 35.3, 0.134, 29.0, 0.0],
    [2.0, 197.0, 70.0, 45.0, 543.0, 30.5, 0.158, 53.0, 1.0],
    [8.0, 125.0, 96.0, 0.0, 0.0, 0.0, 0.232, 54.0, 1.0],
    [4.0, 110.0, 92.0, 0.0, 0.0, 37.6, 0.191, 30.0, 0.0],
    [10.0, 168.0, 74.0, 0.0, 0.0, 38.0, 0.537, 34.0, 1.0],
];

fn raw_frame() -> DataFrame {
    let columns: Vec<Column> = HEADER
        .iter()
        .enumerate()
        .map(|(idx, name)| -> Column {
            if *name == "Outcome" {
                let values: Vec<i64> = ROWS.iter().map(|row| row[idx] as i64).collect();
                Series::new((*name).into(), values).into()
            } else {
                let values: Vec<f64> = ROWS.iter().map(|row| row[idx]).collect();
                Series::new((*name).into(), values).into()
            }
        })
        .collect();
    DataFrame::new(columns).unwrap()
}

fn config() -> PipelineConfig {
    PipelineConfig::default_for_root(Path::new("/project"))
}

fn floats(df: &DataFrame, column: &str) -> Vec<f64> {
    numeric_values(df.column(column).unwrap())
        .unwrap()
        .into_iter()
        .flatten()
        .collect()
}

#[test]
fn test_clean_removes_every_impossible_zero() {
    let raw = raw_frame();
    let config = config();
    let cleaned = clean(&raw, &config).unwrap();

    assert_eq!(cleaned.table.height(), raw.height());
    for name in &config.cleaning.zero_missing_features {
        let column = cleaned.table.column(name).unwrap();
        assert_eq!(column.null_count(), 0, "{name} has nulls");
        assert!(!floats(&cleaned.table, name).contains(&0.0), "{name} has zeros");
    }
    assert_eq!(cleaned.missing.get("Insulin").unwrap().zero_count, 8);
    assert_eq!(cleaned.missing.get("Glucose").unwrap().zero_count, 0);
    assert_eq!(cleaned.outliers.entries.len(), 6);
}

#[test]
fn test_engineer_adds_features_and_standardizes() {
    let raw = raw_frame();
    let config = config();
    let cleaned = clean(&raw, &config).unwrap();
    let processed = engineer(&cleaned.table, &config).unwrap();
    let table = &processed.table;

    assert_eq!(table.height(), raw.height());
    assert_eq!(table.width(), 9 + 6);
    assert!(
        table
            .column("Outcome")
            .unwrap()
            .as_materialized_series()
            .equals(raw.column("Outcome").unwrap().as_materialized_series())
    );

    for name in &config.scaling.columns {
        let values = finite_values(table.column(name).unwrap()).unwrap();
        assert!(values.mean().unwrap().abs() < 1e-2, "{name} mean");
        assert!((values.std(0).unwrap() - 1.0).abs() < 1e-2, "{name} std");
    }

    for state in &processed.encoders {
        let codes = floats(table, &state.encoded_column);
        assert!(codes.iter().all(|code| *code >= 0.0));
        assert!(state.len() >= 2, "{} is degenerate", state.column);
    }
    assert_eq!(processed.scaler.kind, ScalerKind::Standard);
    assert_eq!(processed.bins.len(), 3);
}

#[test]
fn test_engineer_is_deterministic() {
    let config = config();
    let cleaned = clean(&raw_frame(), &config).unwrap();
    let first = engineer(&cleaned.table, &config).unwrap();
    let second = engineer(&cleaned.table, &config).unwrap();
    assert_eq!(first.encoders, second.encoders);
    assert!(first.table.equals_missing(&second.table));
}

#[test]
fn test_constant_scaling_column_aborts() {
    let mut raw = raw_frame();
    raw.with_column(Series::new("Pregnancies".into(), vec![5.0; 12]))
        .unwrap();
    let config = config();
    let cleaned = clean(&raw, &config).unwrap();
    let err = engineer(&cleaned.table, &config).unwrap_err();
    assert!(err.to_string().contains("'Pregnancies'"));
}

#[test]
fn test_nan_reading_is_imputed_before_scaling() {
    let mut raw = raw_frame();
    let mut glucose: Vec<f64> = ROWS.iter().map(|row| row[1]).collect();
    glucose[1] = f64::NAN;
    raw.with_column(Series::new("Glucose".into(), glucose)).unwrap();
    let config = config();

    let cleaned = clean(&raw, &config).unwrap();
    let entry = cleaned.missing.get("Glucose").unwrap();
    assert_eq!(entry.zero_count, 0);
    assert_eq!(entry.fill_value, Some(125.0));
    let values = floats(&cleaned.table, "Glucose");
    assert_eq!(values.len(), 12);
    assert_eq!(values[1], 125.0);
    assert!(values.iter().all(|value| value.is_finite()));

    let processed = engineer(&cleaned.table, &config).unwrap();
    let scaled = finite_values(processed.table.column("Glucose").unwrap()).unwrap();
    assert_eq!(scaled.null_count(), 0);
    assert!(scaled.mean().unwrap().abs() < 1e-9);
}
