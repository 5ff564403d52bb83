//! Classifier adapters loaded from a JSON model artifact.
//!
//! The artifact is a tagged document:
//!
//! ```json
//! {"kind": "linear", "classes": [0, 1], "coefficients": [[...11 weights...]], "intercepts": [-4.2]}
//! {"kind": "forest", "classes": [0, 1], "trees": [{"nodes": [{"split": {...}}, {"leaf": {...}}]}]}
//! ```
//!
//! Everything is validated once at load time; the resulting
//! [`ClassifierModel`] is immutable and shared read-only across workers.

mod forest;
mod linear;

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::domain::ports::{Classifier, ClassifierError};
use crate::domain::{FEATURE_NAMES, FeatureVector, PredictionLabel};

pub use forest::{ForestModel, TreeNode};
pub use linear::LinearModel;

/// Failures raised while reading or validating a model artifact.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelLoadError {
    /// The artifact file could not be read.
    #[error("failed to read model artifact {path}: {message}")]
    Io { path: PathBuf, message: String },
    /// The artifact is not valid JSON for any known model kind.
    #[error("failed to parse model artifact: {message}")]
    Parse { message: String },
    /// The artifact parsed but describes an unusable model.
    #[error("invalid model artifact: {message}")]
    Invalid { message: String },
}

impl ModelLoadError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ArtifactDocument {
    Linear {
        #[serde(default)]
        feature_names: Option<Vec<String>>,
        classes: Vec<i32>,
        coefficients: Vec<Vec<f64>>,
        intercepts: Vec<f64>,
    },
    Forest {
        #[serde(default)]
        feature_names: Option<Vec<String>>,
        classes: Vec<i32>,
        trees: Vec<TreeDocument>,
    },
}

#[derive(Debug, Deserialize)]
struct TreeDocument {
    nodes: Vec<TreeNode>,
}

fn check_feature_names(names: Option<&[String]>) -> Result<(), ModelLoadError> {
    let Some(names) = names else {
        return Ok(());
    };
    let matches = names.len() == FEATURE_NAMES.len()
        && names.iter().zip(FEATURE_NAMES).all(|(got, want)| got == want);
    if matches {
        Ok(())
    } else {
        Err(ModelLoadError::invalid(format!(
            "feature_names {names:?} do not match the expected order {FEATURE_NAMES:?}"
        )))
    }
}

/// Index of the highest score; ties resolve to the lowest index.
pub(crate) fn argmax(scores: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (index, &score) in scores.iter().enumerate() {
        if !score.is_finite() {
            return None;
        }
        match best {
            Some((_, current)) if score <= current => {}
            _ => best = Some((index, score)),
        }
    }
    best.map(|(index, _)| index)
}

/// A validated classifier of either supported kind.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierModel {
    Linear(LinearModel),
    Forest(ForestModel),
}

impl ClassifierModel {
    /// Parse and validate an artifact from its JSON text.
    ///
    /// # Examples
    /// ```
    /// use heart_predictor::domain::ports::Classifier;
    /// use heart_predictor::domain::{FeatureVector, PredictionLabel};
    /// use heart_predictor::outbound::model::ClassifierModel;
    ///
    /// let model = ClassifierModel::from_json(
    ///     r#"{"kind":"linear","classes":[0,1],
    ///         "coefficients":[[1,0,0,0,0,0,0,0,0,0,0]],"intercepts":[-50]}"#,
    /// )
    /// .unwrap();
    /// let older = FeatureVector::new([63.0, 1.0, 3.0, 145.0, 233.0, 1.0, 0.0, 150.0, 0.0, 2.3, 0.0]);
    /// assert_eq!(model.predict(&older).unwrap(), PredictionLabel::new(1));
    /// ```
    pub fn from_json(json: &str) -> Result<Self, ModelLoadError> {
        let document: ArtifactDocument =
            serde_json::from_str(json).map_err(|err| ModelLoadError::Parse {
                message: err.to_string(),
            })?;
        match document {
            ArtifactDocument::Linear {
                feature_names,
                classes,
                coefficients,
                intercepts,
            } => {
                check_feature_names(feature_names.as_deref())?;
                LinearModel::try_new(classes, coefficients, intercepts).map(Self::Linear)
            }
            ArtifactDocument::Forest {
                feature_names,
                classes,
                trees,
            } => {
                check_feature_names(feature_names.as_deref())?;
                let trees = trees.into_iter().map(|tree| tree.nodes).collect();
                ForestModel::try_new(classes, trees).map(Self::Forest)
            }
        }
    }

    /// Read and validate an artifact from disk.
    ///
    /// # Errors
    /// Returns [`ModelLoadError::Io`] when the file cannot be read, otherwise
    /// whatever [`Self::from_json`] reports.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|err| ModelLoadError::Io {
            path: path.to_path_buf(),
            message: err.to_string(),
        })?;
        Self::from_json(&json)
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Linear(_) => "linear",
            Self::Forest(_) => "forest",
        }
    }
}

impl Classifier for ClassifierModel {
    fn predict(&self, features: &FeatureVector) -> Result<PredictionLabel, ClassifierError> {
        match self {
            Self::Linear(model) => model.predict(features),
            Self::Forest(model) => model.predict(features),
        }
    }
}
