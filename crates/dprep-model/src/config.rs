//! Pipeline configuration.
//!
//! The configuration is read once from a TOML document, validated, and then
//! passed by reference into every stage. Relative paths are resolved against
//! the directory holding the configuration file.
//!
//! Required keys: `paths.raw_data`, `cleaning.zero_missing_features` and the
//! six `feature_engineering` bin/label arrays. Everything else has a default.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::bins::BinSpec;
use crate::columns::{
    AGE, AGE_GROUP, BMI, BMI_CATEGORY, ColumnRole, ColumnSpec, FEATURE_COLUMNS, GLUCOSE,
    GLUCOSE_LEVEL, IMPOSSIBLE_ZERO_COLUMNS, OUTCOME, OUTLIER_COLUMNS, RAW_COLUMNS,
    encoded_column_name,
};
use crate::error::{PrepError, Result};

const DEFAULT_RAW_DATA: &str = "data/raw/diabetes.csv";
const DEFAULT_PROCESSED_DIR: &str = "data/processed";
const DEFAULT_CLEANED_PATH: &str = "data/interim/diabetes_cleaned.csv";
const DEFAULT_OUTPUT_FILE: &str = "diabetes_processed.csv";
const MANIFEST_FILE: &str = "manifest.json";

/// Complete, immutable configuration for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub paths: PathsConfig,
    #[serde(default)]
    pub data: DataConfig,
    pub cleaning: CleaningConfig,
    pub feature_engineering: FeatureEngineeringConfig,
    #[serde(default)]
    pub scaling: ScalingConfig,
    #[serde(default)]
    pub validation: ValidationConfig,
    #[serde(default)]
    pub params: ParamsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Raw input CSV.
    pub raw_data: PathBuf,
    /// Directory receiving the processed CSV and the run manifest.
    #[serde(default = "default_processed_dir")]
    pub processed_dir: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Destination of the intermediate cleaned CSV.
    #[serde(default = "default_cleaned_path")]
    pub processed_path: PathBuf,
    /// File name of the final CSV inside `paths.processed_dir`.
    #[serde(default = "default_output_file")]
    pub output_file: String,
    #[serde(default = "default_target_column")]
    pub target_column: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            processed_path: default_cleaned_path(),
            output_file: default_output_file(),
            target_column: default_target_column(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleaningConfig {
    /// Columns where zero is treated as a missing value.
    pub zero_missing_features: Vec<String>,
    /// Columns inspected by the outlier report.
    #[serde(default = "default_outlier_features")]
    pub outlier_features: Vec<String>,
    #[serde(default = "default_iqr_multiplier")]
    pub iqr_multiplier: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureEngineeringConfig {
    pub age_bins: Vec<f64>,
    pub age_labels: Vec<String>,
    pub bmi_bins: Vec<f64>,
    pub bmi_labels: Vec<String>,
    pub glucose_bins: Vec<f64>,
    pub glucose_labels: Vec<String>,
    #[serde(default)]
    pub out_of_range: OutOfRangePolicy,
}

impl FeatureEngineeringConfig {
    /// Validated bin specifications for Age, BMI and Glucose, in that order.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::DataQuality`] for an invalid edge/label set.
    pub fn bin_specs(&self) -> Result<Vec<BinSpec>> {
        Ok(vec![
            BinSpec::new(AGE, AGE_GROUP, self.age_bins.clone(), self.age_labels.clone())?,
            BinSpec::new(BMI, BMI_CATEGORY, self.bmi_bins.clone(), self.bmi_labels.clone())?,
            BinSpec::new(
                GLUCOSE,
                GLUCOSE_LEVEL,
                self.glucose_bins.clone(),
                self.glucose_labels.clone(),
            )?,
        ])
    }
}

/// Handling of values outside the outermost bin edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutOfRangePolicy {
    /// Assign the nearest outer label.
    #[default]
    Clamp,
    /// Leave the label missing.
    Unlabeled,
    /// Fail the run.
    Reject,
}

/// Scaling method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScalerKind {
    /// `(x - mean) / std`
    #[default]
    #[serde(alias = "StandardScaler")]
    Standard,
    /// `(x - min) / (max - min)`
    #[serde(alias = "MinMaxScaler")]
    MinMax,
}

impl ScalerKind {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::MinMax => "min-max",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScalingConfig {
    #[serde(default)]
    pub method: ScalerKind,
    #[serde(default = "default_scaling_columns")]
    pub columns: Vec<String>,
}

impl Default for ScalingConfig {
    fn default() -> Self {
        Self {
            method: ScalerKind::default(),
            columns: default_scaling_columns(),
        }
    }
}

/// Tolerances for post-processing checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "default_tolerance")]
    pub mean_tolerance: f64,
    #[serde(default = "default_tolerance")]
    pub std_tolerance: f64,
    /// Largest absolute value a standardized feature may take.
    #[serde(default = "default_max_abs_scaled")]
    pub max_abs_scaled: f64,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            mean_tolerance: default_tolerance(),
            std_tolerance: default_tolerance(),
            max_abs_scaled: default_max_abs_scaled(),
        }
    }
}

/// Run parameters recorded for provenance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamsConfig {
    #[serde(default = "default_random_seed")]
    pub random_seed: u64,
}

impl Default for ParamsConfig {
    fn default() -> Self {
        Self {
            random_seed: default_random_seed(),
        }
    }
}

fn default_processed_dir() -> PathBuf {
    PathBuf::from(DEFAULT_PROCESSED_DIR)
}

fn default_cleaned_path() -> PathBuf {
    PathBuf::from(DEFAULT_CLEANED_PATH)
}

fn default_output_file() -> String {
    DEFAULT_OUTPUT_FILE.to_string()
}

fn default_target_column() -> String {
    OUTCOME.to_string()
}

fn default_outlier_features() -> Vec<String> {
    OUTLIER_COLUMNS.iter().map(|name| (*name).to_string()).collect()
}

fn default_iqr_multiplier() -> f64 {
    1.5
}

fn default_scaling_columns() -> Vec<String> {
    FEATURE_COLUMNS.iter().map(|name| (*name).to_string()).collect()
}

fn default_tolerance() -> f64 {
    0.01
}

fn default_max_abs_scaled() -> f64 {
    10.0
}

fn default_random_seed() -> u64 {
    42
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_string()).collect()
}

fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

impl PipelineConfig {
    /// Reference configuration rooted at a project directory.
    pub fn default_for_root(root: &Path) -> Self {
        let config = Self {
            paths: PathsConfig {
                raw_data: PathBuf::from(DEFAULT_RAW_DATA),
                processed_dir: default_processed_dir(),
            },
            data: DataConfig::default(),
            cleaning: CleaningConfig {
                zero_missing_features: strings(&IMPOSSIBLE_ZERO_COLUMNS),
                outlier_features: default_outlier_features(),
                iqr_multiplier: default_iqr_multiplier(),
            },
            feature_engineering: FeatureEngineeringConfig {
                age_bins: vec![0.0, 25.0, 45.0, 65.0, 100.0],
                age_labels: strings(&["Young", "Adult", "MidAge", "Senior"]),
                bmi_bins: vec![0.0, 18.5, 25.0, 30.0, 100.0],
                bmi_labels: strings(&["Underweight", "Normal", "Overweight", "Obese"]),
                glucose_bins: vec![0.0, 100.0, 126.0, 300.0],
                glucose_labels: strings(&["Normal", "Prediabetes", "Diabetes"]),
                out_of_range: OutOfRangePolicy::default(),
            },
            scaling: ScalingConfig::default(),
            validation: ValidationConfig::default(),
            params: ParamsConfig::default(),
        };
        config.resolve_paths(root)
    }

    /// Parse a TOML document. Paths are left as written.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::Config`] when the document is malformed or a
    /// required key is missing.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|err| PrepError::config(err.message().to_string()))
    }

    /// Read, resolve and validate a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::Config`] if the file does not exist,
    /// [`PrepError::ConfigParse`] if it cannot be parsed, or any error
    /// raised by [`PipelineConfig::validate`].
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                PrepError::config(format!("configuration file not found: {}", path.display()))
            } else {
                PrepError::Io {
                    operation: "read",
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;
        let config = Self::from_toml_str(&content).map_err(|err| match err {
            PrepError::Config { message } => PrepError::ConfigParse {
                path: path.to_path_buf(),
                message,
            },
            other => other,
        })?;
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let config = config.resolve_paths(base);
        config.validate()?;
        Ok(config)
    }

    /// Make every relative path absolute against `base`.
    #[must_use]
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        self.paths.raw_data = resolve(base, &self.paths.raw_data);
        self.paths.processed_dir = resolve(base, &self.paths.processed_dir);
        self.data.processed_path = resolve(base, &self.data.processed_path);
        self
    }

    /// Check cross-field constraints that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::Config`] naming the offending key, or
    /// [`PrepError::DataQuality`] for unusable bin edges.
    pub fn validate(&self) -> Result<()> {
        if self.cleaning.zero_missing_features.is_empty() {
            return Err(PrepError::config(
                "`cleaning.zero_missing_features` must list at least one column",
            ));
        }
        if let Some(key) = [
            ("cleaning.zero_missing_features", &self.cleaning.zero_missing_features),
            ("cleaning.outlier_features", &self.cleaning.outlier_features),
            ("scaling.columns", &self.scaling.columns),
        ]
        .iter()
        .find(|(_, names)| names.iter().any(|name| name.trim().is_empty()))
        .map(|(key, _)| *key)
        {
            return Err(PrepError::config(format!("`{key}` contains an empty column name")));
        }
        if !(self.cleaning.iqr_multiplier.is_finite() && self.cleaning.iqr_multiplier > 0.0) {
            return Err(PrepError::config(format!(
                "`cleaning.iqr_multiplier` must be a positive number, found {}",
                self.cleaning.iqr_multiplier
            )));
        }
        let target = self.data.target_column.trim();
        if target.is_empty() {
            return Err(PrepError::config("`data.target_column` must not be empty"));
        }
        if self.data.output_file.trim().is_empty() {
            return Err(PrepError::config("`data.output_file` must not be empty"));
        }
        if self.scaling.columns.is_empty() {
            return Err(PrepError::config("`scaling.columns` must list at least one column"));
        }
        if self.scaling.columns.iter().any(|name| name == target) {
            return Err(PrepError::config(format!(
                "target column '{target}' cannot be scaled"
            )));
        }
        if self.cleaning.zero_missing_features.iter().any(|name| name == target) {
            return Err(PrepError::config(format!(
                "target column '{target}' cannot be imputed"
            )));
        }
        for (key, value) in [
            ("validation.mean_tolerance", self.validation.mean_tolerance),
            ("validation.std_tolerance", self.validation.std_tolerance),
            ("validation.max_abs_scaled", self.validation.max_abs_scaled),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(PrepError::config(format!(
                    "`{key}` must be a positive number, found {value}"
                )));
            }
        }
        for spec in self.feature_engineering.bin_specs()? {
            if RAW_COLUMNS.contains(&spec.target.as_str()) {
                return Err(PrepError::config(format!(
                    "derived column '{}' would overwrite an input column",
                    spec.target
                )));
            }
        }
        Ok(())
    }

    pub fn target_column(&self) -> &str {
        &self.data.target_column
    }

    /// Destination of the intermediate cleaned CSV.
    pub fn cleaned_output_path(&self) -> &Path {
        &self.data.processed_path
    }

    /// Destination of the final processed CSV.
    pub fn processed_output_path(&self) -> PathBuf {
        self.paths.processed_dir.join(&self.data.output_file)
    }

    /// Destination of the run manifest.
    pub fn manifest_path(&self) -> PathBuf {
        self.paths.processed_dir.join(MANIFEST_FILE)
    }

    /// Every column the mutating stages need, in first-use order.
    ///
    /// Outlier columns are excluded: the outlier report skips absent columns.
    pub fn expected_columns(&self) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        let mut push = |name: &str| {
            if !columns.iter().any(|existing| existing == name) {
                columns.push(name.to_string());
            }
        };
        for name in RAW_COLUMNS {
            push(name);
        }
        for name in &self.cleaning.zero_missing_features {
            push(name);
        }
        for name in [AGE, BMI, GLUCOSE] {
            push(name);
        }
        for name in &self.scaling.columns {
            push(name);
        }
        push(&self.data.target_column);
        columns
    }

    /// Roles of input and derived columns.
    ///
    /// # Errors
    ///
    /// Propagates bin specification errors.
    pub fn column_specs(&self) -> Result<Vec<ColumnSpec>> {
        let mut specs: Vec<ColumnSpec> = self
            .expected_columns()
            .into_iter()
            .map(|name| {
                let role = if name == self.data.target_column {
                    ColumnRole::Target
                } else if self.cleaning.zero_missing_features.contains(&name) {
                    ColumnRole::ImpossibleZero
                } else {
                    ColumnRole::Numeric
                };
                ColumnSpec::new(name, role)
            })
            .collect();
        for spec in self.feature_engineering.bin_specs()? {
            let encoded = encoded_column_name(&spec.target);
            specs.push(ColumnSpec::new(spec.target, ColumnRole::DerivedCategorical));
            specs.push(ColumnSpec::new(encoded, ColumnRole::EncodedCategorical));
        }
        Ok(specs)
    }

    /// Render the configuration as TOML.
    ///
    /// # Errors
    ///
    /// Returns [`PrepError::Serialize`] if serialization fails.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|err| PrepError::Serialize {
            what: "configuration",
            message: err.to_string(),
        })
    }
}
