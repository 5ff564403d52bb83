//! Port abstraction for prediction history persistence.
use async_trait::async_trait;

use crate::domain::{PredictionRecord, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by prediction repository adapters.
    pub enum PredictionPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "prediction repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "prediction repository query failed: {message}",
        /// The referenced user does not exist.
        UnknownUser { user_id: String } => "prediction references unknown user: {user_id}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PredictionRepository: Send + Sync {
    /// Append one prediction record.
    async fn insert(&self, record: &PredictionRecord) -> Result<(), PredictionPersistenceError>;

    /// All records for a user, oldest first.
    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PredictionRecord>, PredictionPersistenceError>;
}
