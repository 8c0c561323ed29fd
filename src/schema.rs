//! The single, versioned feature schema shared by every endpoint.
//!
//! Upstream the required-column contract was re-derived per endpoint; here
//! it lives in one place, is served on `/v1/schema`, and is the only source
//! of truth for CSV header validation and field kinds.

use serde::Serialize;

use crate::record::{FieldValue, HealthRecord};

pub const SCHEMA_VERSION: &str = "1";

pub const AGE: &str = "Age";
pub const GENDER: &str = "Gender";
pub const SYSTOLIC_BP: &str = "Systolic_BP";
pub const DIASTOLIC_BP: &str = "Diastolic_BP";
pub const CHOLESTEROL: &str = "Cholesterol";
pub const GLUCOSE_LEVEL: &str = "Glucose_Level";
pub const BMI: &str = "BMI";
pub const SMOKING_STATUS: &str = "Smoking_Status";
pub const PHYSICAL_ACTIVITY_LEVEL: &str = "Physical_Activity_Level";
pub const ALCOHOL_CONSUMPTION: &str = "Alcohol_Consumption";
pub const SLEEP_HOURS: &str = "Sleep_Hours";

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    Numeric,
    Categorical { levels: Vec<&'static str> },
}

#[derive(Debug, Clone, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    #[serde(flatten)]
    pub kind: FieldKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct FeatureSchema {
    pub version: &'static str,
    pub fields: Vec<FieldSpec>,
}

impl Default for FeatureSchema {
    fn default() -> Self {
        let numeric = |name| FieldSpec {
            name,
            kind: FieldKind::Numeric,
        };
        let categorical = |name, levels: &[&'static str]| FieldSpec {
            name,
            kind: FieldKind::Categorical {
                levels: levels.to_vec(),
            },
        };

        Self {
            version: SCHEMA_VERSION,
            fields: vec![
                numeric(AGE),
                categorical(GENDER, &["Male", "Female", "Other"]),
                numeric(SYSTOLIC_BP),
                numeric(DIASTOLIC_BP),
                numeric(CHOLESTEROL),
                numeric(GLUCOSE_LEVEL),
                numeric(BMI),
                categorical(SMOKING_STATUS, &["Never", "Former", "Current"]),
                categorical(PHYSICAL_ACTIVITY_LEVEL, &["Low", "Moderate", "High"]),
                categorical(ALCOHOL_CONSUMPTION, &["None", "Moderate", "High"]),
                numeric(SLEEP_HOURS),
            ],
        }
    }
}

impl FeatureSchema {
    /// Columns a CSV upload must carry. Single-record input tolerates gaps
    /// (absent features are zero-filled); uploads do not.
    pub fn required_columns(&self) -> Vec<&'static str> {
        self.fields.iter().map(|f| f.name).collect()
    }

    /// The required columns absent from an uploaded header row, sorted so
    /// rejections are stable and name the exact missing set.
    pub fn missing_columns(&self, headers: &[String]) -> Vec<String> {
        let mut missing: Vec<String> = self
            .required_columns()
            .into_iter()
            .filter(|required| !headers.iter().any(|h| h == required))
            .map(str::to_string)
            .collect();
        missing.sort();
        missing
    }
}

/// Aligns a record onto the model's ordered feature set.
///
/// Numeric fields match features by exact name. Categorical fields match by
/// one-hot expansion: a text field `Gender = "Male"` activates the feature
/// named `Gender_Male`. Anything the record does not cover is zero-filled.
pub fn align(record: &HealthRecord, feature_names: &[String]) -> Vec<f64> {
    feature_names
        .iter()
        .map(|feature| {
            if let Some(n) = record.number(feature) {
                return n;
            }
            let one_hot = record.iter().any(|(name, value)| match value {
                FieldValue::Text(text) => {
                    feature.len() == name.len() + 1 + text.len()
                        && feature.starts_with(name)
                        && feature.as_bytes()[name.len()] == b'_'
                        && feature.ends_with(text.as_str())
                }
                FieldValue::Number(_) => false,
            });
            if one_hot { 1.0 } else { 0.0 }
        })
        .collect()
}
