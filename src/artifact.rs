//! Loading and invoking the serialized model artifacts.
//!
//! Three documents live in the artifact directory: `health_model.json`
//! (always), `preprocessor.json` and `feature_names.json` (both optional).
//! They are loaded once at startup and never mutated afterwards.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ArtifactError;
use crate::record::HealthRecord;
use crate::schema::{self, FeatureSchema};

pub const MODEL_FILE: &str = "health_model.json";
pub const PREPROCESSOR_FILE: &str = "preprocessor.json";
pub const FEATURE_NAMES_FILE: &str = "feature_names.json";

/// What the model produces: a numeric value (regressor, e.g. life
/// expectancy) or a class label picked by score cutoffs.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelKind {
    Regressor,
    Classifier {
        /// Ascending score cutoffs; `labels` has one more entry than this.
        cutoffs: Vec<f64>,
        labels: Vec<String>,
    },
}

/// The pre-trained model. Its mathematics is deliberately minimal: a dot
/// product over the aligned feature vector plus an intercept, interpreted
/// per `ModelKind`. Everything else about it is opaque training output.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthModel {
    pub feature_names: Vec<String>,
    pub weights: Vec<f64>,
    pub intercept: f64,
    #[serde(flatten)]
    pub kind: ModelKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Prediction {
    Value(f64),
    Label(String),
}

impl std::fmt::Display for Prediction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Prediction::Value(v) => write!(f, "{v:.1}"),
            Prediction::Label(l) => write!(f, "{l}"),
        }
    }
}

impl HealthModel {
    fn score(&self, features: &[f64]) -> f64 {
        self.weights
            .iter()
            .zip(features)
            .map(|(w, x)| w * x)
            .sum::<f64>()
            + self.intercept
    }

    pub fn predict(&self, features: &[f64]) -> Prediction {
        let score = self.score(features);
        match &self.kind {
            ModelKind::Regressor => Prediction::Value(score),
            ModelKind::Classifier { cutoffs, labels } => {
                let idx = cutoffs.iter().take_while(|c| score > **c).count();
                Prediction::Label(labels[idx].clone())
            }
        }
    }

    fn validate(&self) -> Result<(), ArtifactError> {
        if self.weights.len() != self.feature_names.len() {
            return Err(ArtifactError::Mismatch(format!(
                "model has {} weights but {} feature names",
                self.weights.len(),
                self.feature_names.len()
            )));
        }
        if let ModelKind::Classifier { cutoffs, labels } = &self.kind {
            if labels.len() != cutoffs.len() + 1 {
                return Err(ArtifactError::Mismatch(format!(
                    "classifier has {} cutoffs but {} labels",
                    cutoffs.len(),
                    labels.len()
                )));
            }
        }
        Ok(())
    }
}

/// Fitted per-feature standardization applied before prediction.
#[derive(Debug, Clone, Deserialize)]
pub struct Preprocessor {
    pub scalers: Vec<FeatureScaler>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FeatureScaler {
    pub mean: f64,
    pub scale: f64,
}

impl Preprocessor {
    pub fn transform(&self, features: &mut [f64]) {
        for (value, scaler) in features.iter_mut().zip(&self.scalers) {
            *value -= scaler.mean;
            if scaler.scale != 0.0 {
                *value /= scaler.scale;
            }
        }
    }
}

/// Everything loaded from the artifact directory, shared read-only across
/// requests for the process lifetime.
#[derive(Debug, Clone)]
pub struct ModelArtifacts {
    pub model: HealthModel,
    pub preprocessor: Option<Preprocessor>,
    pub feature_names: Vec<String>,
    pub schema: FeatureSchema,
    pub loaded_at: DateTime<Utc>,
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let raw = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ArtifactError::Parse {
        path: path.display().to_string(),
        source,
    })
}

impl ModelArtifacts {
    pub fn load(dir: &Path) -> Result<Self, ArtifactError> {
        let model: HealthModel = read_json(&dir.join(MODEL_FILE))?;
        model.validate()?;

        let preprocessor_path = dir.join(PREPROCESSOR_FILE);
        let preprocessor: Option<Preprocessor> = if preprocessor_path.exists() {
            Some(read_json(&preprocessor_path)?)
        } else {
            None
        };

        if let Some(pre) = &preprocessor {
            if pre.scalers.len() != model.feature_names.len() {
                return Err(ArtifactError::Mismatch(format!(
                    "preprocessor has {} scalers but the model expects {} features",
                    pre.scalers.len(),
                    model.feature_names.len()
                )));
            }
        }

        // The ordered feature list ships as its own artifact in some
        // variants; fall back to the order baked into the model.
        let names_path = dir.join(FEATURE_NAMES_FILE);
        let feature_names: Vec<String> = if names_path.exists() {
            let names: Vec<String> = read_json(&names_path)?;
            if names != model.feature_names {
                return Err(ArtifactError::Mismatch(
                    "feature_names.json disagrees with the model's feature order".to_string(),
                ));
            }
            names
        } else {
            model.feature_names.clone()
        };

        Ok(Self {
            model,
            preprocessor,
            feature_names,
            schema: FeatureSchema::default(),
            loaded_at: Utc::now(),
        })
    }

    /// Number of artifact documents backing this state, for the health probe.
    pub fn artifact_count(&self) -> usize {
        1 + usize::from(self.preprocessor.is_some())
    }

    /// Align, optionally transform, predict. One pass per record.
    pub fn predict(&self, record: &HealthRecord) -> Prediction {
        let mut features = schema::align(record, &self.feature_names);
        if let Some(pre) = &self.preprocessor {
            pre.transform(&mut features);
        }
        self.model.predict(&features)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn classifier_json() -> serde_json::Value {
        serde_json::json!({
            "feature_names": ["Age", "BMI", "Gender_Male"],
            "weights": [0.01, 0.02, 0.1],
            "intercept": -0.5,
            "kind": "classifier",
            "cutoffs": [0.2, 0.6],
            "labels": ["Low Risk", "Medium Risk", "High Risk"]
        })
    }

    fn write(dir: &Path, name: &str, value: &serde_json::Value) {
        fs::write(dir.join(name), serde_json::to_vec_pretty(value).unwrap()).unwrap();
    }

    #[test]
    fn classifier_picks_label_by_cutoffs() {
        let model: HealthModel = serde_json::from_value(classifier_json()).unwrap();
        assert_eq!(
            model.predict(&[20.0, 10.0, 0.0]),
            Prediction::Label("Low Risk".to_string())
        );
        assert_eq!(
            model.predict(&[50.0, 25.0, 1.0]),
            Prediction::Label("Medium Risk".to_string())
        );
        assert_eq!(
            model.predict(&[80.0, 35.0, 1.0]),
            Prediction::Label("High Risk".to_string())
        );
    }

    #[test]
    fn regressor_returns_raw_score() {
        let model: HealthModel = serde_json::from_value(serde_json::json!({
            "feature_names": ["Age"],
            "weights": [-0.4],
            "intercept": 95.0,
            "kind": "regressor"
        }))
        .unwrap();
        assert_eq!(model.predict(&[50.0]), Prediction::Value(75.0));
    }

    #[test]
    fn load_rejects_weight_name_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let mut bad = classifier_json();
        bad["weights"] = serde_json::json!([0.01]);
        write(dir.path(), MODEL_FILE, &bad);
        assert!(matches!(
            ModelArtifacts::load(dir.path()),
            Err(ArtifactError::Mismatch(_))
        ));
    }

    #[test]
    fn load_rejects_disagreeing_feature_name_artifact() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), MODEL_FILE, &classifier_json());
        write(
            dir.path(),
            FEATURE_NAMES_FILE,
            &serde_json::json!(["BMI", "Age", "Gender_Male"]),
        );
        assert!(matches!(
            ModelArtifacts::load(dir.path()),
            Err(ArtifactError::Mismatch(_))
        ));
    }

    #[test]
    fn load_without_optional_artifacts_uses_model_order() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), MODEL_FILE, &classifier_json());
        let artifacts = ModelArtifacts::load(dir.path()).unwrap();
        assert_eq!(artifacts.feature_names, vec!["Age", "BMI", "Gender_Male"]);
        assert!(artifacts.preprocessor.is_none());
        assert_eq!(artifacts.artifact_count(), 1);
    }

    #[test]
    fn preprocessor_standardizes_before_predict() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), MODEL_FILE, &classifier_json());
        write(
            dir.path(),
            PREPROCESSOR_FILE,
            &serde_json::json!({
                "scalers": [
                    {"mean": 50.0, "scale": 10.0},
                    {"mean": 25.0, "scale": 5.0},
                    {"mean": 0.0, "scale": 1.0}
                ]
            }),
        );
        let artifacts = ModelArtifacts::load(dir.path()).unwrap();

        let record = HealthRecord::from_pairs([("Age", "60"), ("BMI", "30"), ("Gender", "Male")]);
        // Standardized vector is [1, 1, 1]; score = 0.01 + 0.02 + 0.1 - 0.5.
        assert_eq!(
            artifacts.predict(&record),
            Prediction::Label("Low Risk".to_string())
        );
    }

    #[test]
    fn zero_scale_leaves_the_feature_centered_only() {
        let pre = Preprocessor {
            scalers: vec![FeatureScaler {
                mean: 2.0,
                scale: 0.0,
            }],
        };
        let mut features = vec![5.0];
        pre.transform(&mut features);
        assert_eq!(features, vec![3.0]);
    }
}
