//! Driving port for scoring an observation on behalf of a user.

use async_trait::async_trait;

use crate::domain::{Error, PredictionLabel, PredictionRequest};

/// Domain use-case port for predictions.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PredictionCommand: Send + Sync {
    /// Score the request, record the outcome against the user, and return
    /// the label.
    ///
    /// Nothing is recorded when the user does not exist or the classifier
    /// fails.
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionLabel, Error>;
}
