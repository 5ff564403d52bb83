//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Uniqueness of usernames and emails is left to the table constraints; a
//! violation is mapped back to the matching duplicate error so concurrent
//! registrations cannot both succeed.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{UserAccount, Username};

use super::diesel_error_mapping::{
    DbFailure, USERS_EMAIL_KEY, USERS_USERNAME_KEY, classify_diesel_error, pool_failure,
};
use super::models::{NewUserRow, UserRow};
use super::pool::DbPool;
use super::schema::users;

/// Diesel-backed implementation of the [`UserRepository`] port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn to_port_error(failure: DbFailure, account: Option<&UserAccount>) -> UserPersistenceError {
    match failure {
        DbFailure::Connection(message) => UserPersistenceError::connection(message),
        DbFailure::UniqueViolation(constraint) => {
            match (constraint.as_deref(), account) {
                (Some(USERS_USERNAME_KEY), Some(account)) => {
                    UserPersistenceError::duplicate_username(account.user.username().as_ref())
                }
                (Some(USERS_EMAIL_KEY), Some(account)) => {
                    UserPersistenceError::duplicate_email(account.user.email().as_ref())
                }
                (other, _) => {
                    warn!(constraint = ?other, "unrecognised unique violation on users");
                    UserPersistenceError::query("unique constraint violation")
                }
            }
        }
        DbFailure::ForeignKeyViolation => UserPersistenceError::query("foreign key violation"),
        DbFailure::Query(message) => UserPersistenceError::query(message),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| to_port_error(pool_failure(err), None))?;

        diesel::insert_into(users::table)
            .values(NewUserRow::from(account))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| to_port_error(classify_diesel_error(err), Some(account)))
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| to_port_error(pool_failure(err), None))?;

        let row: Option<UserRow> = users::table
            .filter(users::username.eq(username.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| to_port_error(classify_diesel_error(err), None))?;

        row.map(UserAccount::try_from)
            .transpose()
            .map_err(|err| UserPersistenceError::query(format!("corrupt user row: {err}")))
    }
}
