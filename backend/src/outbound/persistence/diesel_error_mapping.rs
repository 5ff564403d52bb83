//! Shared Diesel error classification for the repositories.
//!
//! Repositories first classify a Diesel failure into a [`DbFailure`], then
//! translate it into their own port error. Constraint names come from the
//! migrations.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Unique constraint on `users.username`.
pub(crate) const USERS_USERNAME_KEY: &str = "users_username_key";
/// Unique constraint on `users.email`.
pub(crate) const USERS_EMAIL_KEY: &str = "users_email_key";

/// Storage-agnostic classification of a failed statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DbFailure {
    /// The connection dropped or could not be checked out.
    Connection(String),
    /// A unique constraint rejected the write; carries the constraint name.
    UniqueViolation(Option<String>),
    /// A foreign key rejected the write.
    ForeignKeyViolation,
    /// Anything else.
    Query(&'static str),
}

/// Extract the message from a pool error.
pub(crate) fn pool_failure(error: PoolError) -> DbFailure {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            DbFailure::Connection(message)
        }
    }
}

/// Classify a Diesel error, logging the raw detail at debug level only.
pub(crate) fn classify_diesel_error(error: DieselError) -> DbFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DbFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DbFailure::Query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DbFailure::UniqueViolation(info.constraint_name().map(str::to_owned))
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
            DbFailure::ForeignKeyViolation
        }
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DbFailure::Connection("database connection error".to_owned())
        }
        DieselError::DatabaseError(_, _) => DbFailure::Query("database error"),
        _ => DbFailure::Query("database error"),
    }
}

#[cfg(test)]
mod tests {
    //! Classification coverage for synthetic Diesel errors.
    use super::*;
    use diesel::result::DatabaseErrorInformation;
    use rstest::rstest;

    struct StubInfo {
        constraint: Option<&'static str>,
    }

    impl DatabaseErrorInformation for StubInfo {
        fn message(&self) -> &str {
            "stub"
        }
        fn details(&self) -> Option<&str> {
            None
        }
        fn hint(&self) -> Option<&str> {
            None
        }
        fn table_name(&self) -> Option<&str> {
            None
        }
        fn column_name(&self) -> Option<&str> {
            None
        }
        fn constraint_name(&self) -> Option<&str> {
            self.constraint
        }
        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(StubInfo { constraint }))
    }

    #[rstest]
    #[case(
        database_error(DatabaseErrorKind::UniqueViolation, Some(USERS_EMAIL_KEY)),
        DbFailure::UniqueViolation(Some(USERS_EMAIL_KEY.to_owned()))
    )]
    #[case(
        database_error(DatabaseErrorKind::ForeignKeyViolation, None),
        DbFailure::ForeignKeyViolation
    )]
    #[case(
        database_error(DatabaseErrorKind::ClosedConnection, None),
        DbFailure::Connection("database connection error".to_owned())
    )]
    #[case(DieselError::NotFound, DbFailure::Query("record not found"))]
    fn classifies_diesel_errors(#[case] error: DieselError, #[case] expected: DbFailure) {
        assert_eq!(classify_diesel_error(error), expected);
    }

    #[rstest]
    fn pool_errors_are_connection_failures() {
        assert_eq!(
            pool_failure(PoolError::checkout("timed out")),
            DbFailure::Connection("timed out".to_owned())
        );
    }
}
