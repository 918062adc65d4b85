//! Dataset column names and roles.
//!
//! Roles are configured, never inferred from the data: a column is an
//! impossible-zero feature because the configuration says so.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const PREGNANCIES: &str = "Pregnancies";
pub const GLUCOSE: &str = "Glucose";
pub const BLOOD_PRESSURE: &str = "BloodPressure";
pub const SKIN_THICKNESS: &str = "SkinThickness";
pub const INSULIN: &str = "Insulin";
pub const BMI: &str = "BMI";
pub const DIABETES_PEDIGREE: &str = "DiabetesPedigreeFunction";
pub const AGE: &str = "Age";
pub const OUTCOME: &str = "Outcome";

pub const AGE_GROUP: &str = "Age_Group";
pub const BMI_CATEGORY: &str = "BMI_Category";
pub const GLUCOSE_LEVEL: &str = "Glucose_Level";

/// Header of the raw dataset, in file order.
pub const RAW_COLUMNS: [&str; 9] = [
    PREGNANCIES,
    GLUCOSE,
    BLOOD_PRESSURE,
    SKIN_THICKNESS,
    INSULIN,
    BMI,
    DIABETES_PEDIGREE,
    AGE,
    OUTCOME,
];

/// The eight numeric features (everything except the target).
pub const FEATURE_COLUMNS: [&str; 8] = [
    PREGNANCIES,
    GLUCOSE,
    BLOOD_PRESSURE,
    SKIN_THICKNESS,
    INSULIN,
    BMI,
    AGE,
    DIABETES_PEDIGREE,
];

/// Features where a zero reading is biologically impossible.
pub const IMPOSSIBLE_ZERO_COLUMNS: [&str; 5] = [GLUCOSE, BLOOD_PRESSURE, SKIN_THICKNESS, INSULIN, BMI];

/// Features inspected by the outlier reporter.
pub const OUTLIER_COLUMNS: [&str; 6] = [GLUCOSE, BLOOD_PRESSURE, SKIN_THICKNESS, INSULIN, BMI, AGE];

/// Name of the integer-coded companion of a categorical column.
///
/// ```
/// use dprep_model::encoded_column_name;
///
/// assert_eq!(encoded_column_name("Age_Group"), "Age_Group_encoded");
/// ```
pub fn encoded_column_name(column: &str) -> String {
    format!("{column}_encoded")
}

/// Role a column plays in the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnRole {
    /// Numeric feature where zero is a missing-value sentinel.
    ImpossibleZero,
    /// Plain numeric feature.
    Numeric,
    /// Categorical bucket derived by binning.
    DerivedCategorical,
    /// Integer code for a derived bucket.
    EncodedCategorical,
    /// Outcome label; never transformed.
    Target,
}

impl ColumnRole {
    pub const fn label(&self) -> &'static str {
        match self {
            Self::ImpossibleZero => "impossible-zero numeric",
            Self::Numeric => "numeric",
            Self::DerivedCategorical => "derived categorical",
            Self::EncodedCategorical => "encoded categorical",
            Self::Target => "target label",
        }
    }
}

impl fmt::Display for ColumnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A column name paired with its configured role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    pub role: ColumnRole,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, role: ColumnRole) -> Self {
        Self {
            name: name.into(),
            role,
        }
    }
}
