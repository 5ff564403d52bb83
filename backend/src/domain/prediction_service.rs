//! Prediction use-case service.
//!
//! Resolves the submitting user, scores the observation with the loaded
//! classifier and appends a [`PredictionRecord`]. A failed lookup or a
//! classifier error leaves the history untouched.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::account_service::map_user_persistence_error;
use crate::domain::ports::{
    Classifier, PredictionCommand, PredictionPersistenceError, PredictionRepository,
    UserRepository,
};
use crate::domain::{Error, PredictionLabel, PredictionRecord, PredictionRequest};

/// Message returned when the submitting username is not registered.
pub const USER_NOT_FOUND_MESSAGE: &str = "User not found";

/// Prediction service implementing the [`PredictionCommand`] driving port.
///
/// The classifier may be a trait object so a model chosen at runtime can be
/// shared as `Arc<dyn Classifier>`.
#[derive(Clone)]
pub struct PredictionService<U, C: ?Sized, P> {
    users: Arc<U>,
    classifier: Arc<C>,
    predictions: Arc<P>,
}

impl<U, C: ?Sized, P> PredictionService<U, C, P> {
    /// Create a new service from its collaborators.
    pub fn new(users: Arc<U>, classifier: Arc<C>, predictions: Arc<P>) -> Self {
        Self {
            users,
            classifier,
            predictions,
        }
    }
}

fn map_prediction_persistence_error(error: PredictionPersistenceError) -> Error {
    match error {
        PredictionPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("prediction repository unavailable: {message}"))
        }
        PredictionPersistenceError::Query { message } => {
            Error::internal(format!("prediction repository error: {message}"))
        }
        // The user vanished between lookup and insert.
        PredictionPersistenceError::UnknownUser { .. } => Error::not_found(USER_NOT_FOUND_MESSAGE),
    }
}

#[async_trait]
impl<U, C, P> PredictionCommand for PredictionService<U, C, P>
where
    U: UserRepository,
    C: Classifier + ?Sized,
    P: PredictionRepository,
{
    async fn predict(&self, request: &PredictionRequest) -> Result<PredictionLabel, Error> {
        let account = self
            .users
            .find_by_username(&request.username)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(|| Error::not_found(USER_NOT_FOUND_MESSAGE))?;

        let vector = request.features.to_vector();
        let label = self
            .classifier
            .predict(&vector)
            .map_err(|err| Error::internal(err.to_string()))?;

        let record = PredictionRecord::new(account.user.id().clone(), request.features, label);
        self.predictions
            .insert(&record)
            .await
            .map_err(map_prediction_persistence_error)?;
        Ok(label)
    }
}

#[cfg(test)]
#[path = "prediction_service_tests.rs"]
mod tests;
