//! In-memory `PredictionRepository`.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{PredictionPersistenceError, PredictionRepository};
use crate::domain::{PredictionRecord, UserId};

use super::InMemoryUserRepository;

/// Append-only record store that checks user references against an
/// [`InMemoryUserRepository`].
#[derive(Debug)]
pub struct InMemoryPredictionRepository {
    users: Arc<InMemoryUserRepository>,
    records: Mutex<Vec<PredictionRecord>>,
}

impl InMemoryPredictionRepository {
    /// Create an empty store bound to `users`.
    pub fn new(users: Arc<InMemoryUserRepository>) -> Self {
        Self {
            users,
            records: Mutex::new(Vec::new()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<PredictionRecord>>, PredictionPersistenceError> {
        self.records
            .lock()
            .map_err(|_| PredictionPersistenceError::query("prediction store lock poisoned"))
    }

    /// Total number of records across all users.
    pub fn len(&self) -> Result<usize, PredictionPersistenceError> {
        Ok(self.lock()?.len())
    }

    /// Whether no records have been written.
    pub fn is_empty(&self) -> Result<bool, PredictionPersistenceError> {
        Ok(self.lock()?.is_empty())
    }
}

#[async_trait]
impl PredictionRepository for InMemoryPredictionRepository {
    async fn insert(&self, record: &PredictionRecord) -> Result<(), PredictionPersistenceError> {
        let known = self
            .users
            .contains_id(&record.user_id)
            .map_err(|err| PredictionPersistenceError::query(err.to_string()))?;
        if !known {
            return Err(PredictionPersistenceError::unknown_user(
                record.user_id.as_ref(),
            ));
        }
        self.lock()?.push(record.clone());
        Ok(())
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PredictionRecord>, PredictionPersistenceError> {
        Ok(self
            .lock()?
            .iter()
            .filter(|record| &record.user_id == user_id)
            .cloned()
            .collect())
    }
}
