//! In-memory `UserRepository`.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{UserAccount, UserId, Username};

/// Account store keyed by username.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    accounts: Mutex<HashMap<String, UserAccount>>,
}

impl InMemoryUserRepository {
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, UserAccount>>, UserPersistenceError> {
        self.accounts
            .lock()
            .map_err(|_| UserPersistenceError::query("user store lock poisoned"))
    }

    /// Whether an account with this identifier exists.
    pub fn contains_id(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        Ok(self
            .lock()?
            .values()
            .any(|account| account.user.id() == id))
    }

    /// Number of stored accounts.
    pub fn len(&self) -> Result<usize, UserPersistenceError> {
        Ok(self.lock()?.len())
    }

    /// Whether the store holds no accounts.
    pub fn is_empty(&self) -> Result<bool, UserPersistenceError> {
        Ok(self.lock()?.is_empty())
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, account: &UserAccount) -> Result<(), UserPersistenceError> {
        let mut accounts = self.lock()?;
        let username = account.user.username().as_ref();
        if accounts.contains_key(username) {
            return Err(UserPersistenceError::duplicate_username(username));
        }
        let email = account.user.email();
        if accounts.values().any(|existing| existing.user.email() == email) {
            return Err(UserPersistenceError::duplicate_email(email.as_ref()));
        }
        accounts.insert(username.to_owned(), account.clone());
        Ok(())
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<UserAccount>, UserPersistenceError> {
        Ok(self.lock()?.get(username.as_ref()).cloned())
    }
}
