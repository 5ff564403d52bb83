//! Port for the trained classifier.
//!
//! Inference is pure CPU work on a fixed-size vector, so the trait is
//! synchronous. The loaded model is shared read-only across requests.

use crate::domain::{FeatureVector, PredictionLabel};

use super::define_port_error;

define_port_error! {
    /// Failures raised while evaluating the classifier.
    pub enum ClassifierError {
        /// The model produced no usable output for the input.
        Evaluation { message: String } => "classifier evaluation failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
pub trait Classifier: Send + Sync {
    /// Map one observation to a class label. Deterministic for a given model.
    fn predict(&self, features: &FeatureVector) -> Result<PredictionLabel, ClassifierError>;
}
