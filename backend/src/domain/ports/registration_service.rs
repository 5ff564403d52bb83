//! Driving port for account sign-up.

use async_trait::async_trait;

use crate::domain::{Error, Registration, UserId};

/// Domain use-case port for creating accounts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationService: Send + Sync {
    /// Create an account and return its new identifier.
    ///
    /// A username or email that is already taken yields
    /// [`crate::domain::ErrorCode::Conflict`].
    async fn register(&self, registration: &Registration) -> Result<UserId, Error>;
}
