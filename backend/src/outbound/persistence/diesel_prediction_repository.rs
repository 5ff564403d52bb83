//! PostgreSQL-backed `PredictionRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{PredictionPersistenceError, PredictionRepository};
use crate::domain::{PredictionRecord, UserId};

use super::diesel_error_mapping::{DbFailure, classify_diesel_error, pool_failure};
use super::models::PredictionRecordRow;
use super::pool::DbPool;
use super::schema::prediction_records;

/// Diesel-backed implementation of the [`PredictionRepository`] port.
///
/// Records are insert-only; nothing in this adapter updates or deletes them.
#[derive(Clone)]
pub struct DieselPredictionRepository {
    pool: DbPool,
}

impl DieselPredictionRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_port_error(failure: DbFailure, user_id: &UserId) -> PredictionPersistenceError {
    match failure {
        DbFailure::Connection(message) => PredictionPersistenceError::connection(message),
        DbFailure::ForeignKeyViolation => {
            PredictionPersistenceError::unknown_user(user_id.as_ref())
        }
        DbFailure::UniqueViolation(_) => {
            PredictionPersistenceError::query("unique constraint violation")
        }
        DbFailure::Query(message) => PredictionPersistenceError::query(message),
    }
}

#[async_trait]
impl PredictionRepository for DieselPredictionRepository {
    async fn insert(&self, record: &PredictionRecord) -> Result<(), PredictionPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| to_port_error(pool_failure(err), &record.user_id))?;

        diesel::insert_into(prediction_records::table)
            .values(PredictionRecordRow::from(record))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| to_port_error(classify_diesel_error(err), &record.user_id))
    }

    async fn list_for_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<PredictionRecord>, PredictionPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| to_port_error(pool_failure(err), user_id))?;

        let rows: Vec<PredictionRecordRow> = prediction_records::table
            .filter(prediction_records::user_id.eq(*user_id.as_uuid()))
            .select(PredictionRecordRow::as_select())
            .order_by((
                prediction_records::created_at.asc(),
                prediction_records::id.asc(),
            ))
            .load(&mut conn)
            .await
            .map_err(|err| to_port_error(classify_diesel_error(err), user_id))?;

        Ok(rows.into_iter().map(PredictionRecord::from).collect())
    }
}
