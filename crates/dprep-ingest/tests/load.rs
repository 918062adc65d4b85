//! Loading the raw dataset from disk and checking it.

use std::fs;

use dprep_ingest::{LoadReport, check_target_values, load, validate_schema};
use dprep_model::PipelineConfig;

const RAW: &str = "\
Pregnancies,Glucose,BloodPressure,SkinThickness,Insulin,BMI,DiabetesPedigreeFunction,Age,Outcome
6,148,72,35,0,33.6,0.627,50,1
1,85,66,29,0,26.6,0.351,31,0
8,183,64,0,0,23.3,0.672,32,1
1,89,66,23,94,28.1,0.167,21,0
0,137,40,35,168,43.1,2.288,33,1
";

#[test]
fn loads_reference_header_and_passes_checks() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("diabetes.csv");
    fs::write(&path, RAW).unwrap();

    let config = PipelineConfig::default_for_root(dir.path());
    let df = load(&path).unwrap();
    assert_eq!(df.height(), 5);
    assert_eq!(df.width(), 9);

    validate_schema(&df, &config.expected_columns()).unwrap();
    check_target_values(&df, config.target_column()).unwrap();

    let report =
        LoadReport::from_frame(&path, &df, &config.cleaning.zero_missing_features).unwrap();
    let zeros = |name: &str| {
        report
            .zero_counts
            .iter()
            .find(|(column, _)| column == name)
            .map(|(_, count)| *count)
    };
    assert_eq!(zeros("Insulin"), Some(3));
    assert_eq!(zeros("SkinThickness"), Some(1));
    assert_eq!(zeros("Glucose"), Some(0));
}

#[test]
fn missing_column_is_schema_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("diabetes.csv");
    fs::write(&path, "Glucose,Outcome\n148,1\n").unwrap();

    let config = PipelineConfig::default_for_root(dir.path());
    let df = load(&path).unwrap();
    let err = validate_schema(&df, &config.expected_columns()).unwrap_err();
    assert!(err.to_string().contains("'Pregnancies'"));
}
