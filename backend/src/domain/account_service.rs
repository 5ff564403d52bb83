//! Account registration and login services.
//!
//! [`AccountService`] implements both the [`RegistrationService`] and
//! [`LoginService`] driving ports on top of a [`UserRepository`] and a
//! [`PasswordHasher`]. Plaintext passwords never leave this module except
//! on their way into the hasher.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    LoginService, PasswordHashError, PasswordHasher, RegistrationService, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    Error, LoginCredentials, Registration, User, UserAccount, UserId, Username,
};

/// Message returned for every failed login, whatever the cause.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid username or password";

/// Account service implementing the registration and login driving ports.
#[derive(Clone)]
pub struct AccountService<U, H> {
    users: Arc<U>,
    hasher: Arc<H>,
}

impl<U, H> AccountService<U, H> {
    /// Create a new service with the given repository and hasher.
    pub fn new(users: Arc<U>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

pub(crate) fn map_user_persistence_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateUsername { .. } => {
            Error::conflict("Username already taken")
        }
        UserPersistenceError::DuplicateEmail { .. } => Error::conflict("Email already registered"),
    }
}

fn map_hash_error(error: PasswordHashError) -> Error {
    Error::internal(error.to_string())
}

fn invalid_credentials() -> Error {
    Error::unauthorized(INVALID_CREDENTIALS_MESSAGE)
}

#[async_trait]
impl<U, H> RegistrationService for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn register(&self, registration: &Registration) -> Result<UserId, Error> {
        let password_digest = self
            .hasher
            .hash(registration.password())
            .await
            .map_err(map_hash_error)?;

        let user = User::new(
            UserId::random(),
            registration.username().clone(),
            registration.email().clone(),
        );
        let id = user.id().clone();
        let account = UserAccount {
            user,
            password_digest,
        };

        self.users
            .insert(&account)
            .await
            .map_err(map_user_persistence_error)?;
        Ok(id)
    }
}

#[async_trait]
impl<U, H> LoginService for AccountService<U, H>
where
    U: UserRepository,
    H: PasswordHasher,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Username, Error> {
        // A handle that cannot be a stored username cannot match an account.
        let username = Username::new(credentials.username()).map_err(|_| invalid_credentials())?;

        let account = self
            .users
            .find_by_username(&username)
            .await
            .map_err(map_user_persistence_error)?
            .ok_or_else(invalid_credentials)?;

        let verified = self
            .hasher
            .verify(credentials.password(), &account.password_digest)
            .await
            .map_err(map_hash_error)?;

        if verified {
            Ok(account.user.username().clone())
        } else {
            Err(invalid_credentials())
        }
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
