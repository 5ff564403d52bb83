//! Argon2id implementation of the [`PasswordHasher`] port.
//!
//! Digests are PHC strings (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`) so
//! the cost parameters travel with each digest and verification keeps
//! working after the defaults change. Both operations run on Tokio's
//! blocking pool.

use argon2::password_hash::{self, PasswordHash, SaltString};
use argon2::{
    Algorithm, Argon2, Params, PasswordHasher as _, PasswordVerifier as _, Version,
};
use async_trait::async_trait;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::domain::PasswordDigest;
use crate::domain::ports::{PasswordHashError, PasswordHasher};

const SALT_LEN: usize = 16;

/// Argon2id hasher with configurable cost parameters.
#[derive(Debug, Clone)]
pub struct Argon2PasswordHasher {
    params: Params,
}

impl Default for Argon2PasswordHasher {
    /// Library-recommended cost (19 MiB, 2 passes, 1 lane).
    fn default() -> Self {
        Self {
            params: Params::default(),
        }
    }
}

impl Argon2PasswordHasher {
    /// Use explicit cost parameters for new digests.
    pub fn new(params: Params) -> Self {
        Self { params }
    }

    /// Cheapest parameters argon2 accepts; only for tests.
    ///
    /// # Errors
    /// Returns [`PasswordHashError::Hashing`] if argon2 rejects the parameters.
    pub fn minimal_cost() -> Result<Self, PasswordHashError> {
        let params = Params::new(Params::MIN_M_COST, Params::MIN_T_COST, Params::MIN_P_COST, None)
            .map_err(|err| PasswordHashError::hashing(err.to_string()))?;
        Ok(Self::new(params))
    }

    fn hash_blocking(params: Params, password: &[u8]) -> Result<String, PasswordHashError> {
        let mut salt_bytes = [0_u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt_bytes);
        let salt = SaltString::encode_b64(&salt_bytes)
            .map_err(|err| PasswordHashError::hashing(err.to_string()))?;

        Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
            .hash_password(password, &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| PasswordHashError::hashing(err.to_string()))
    }

    fn verify_blocking(password: &[u8], digest: &str) -> Result<bool, PasswordHashError> {
        let parsed = PasswordHash::new(digest)
            .map_err(|err| PasswordHashError::malformed_digest(err.to_string()))?;
        // Parameters are read from the digest, not from `self`.
        match Argon2::default().verify_password(password, &parsed) {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordHashError::hashing(err.to_string())),
        }
    }
}

#[async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    async fn hash(&self, password: &str) -> Result<PasswordDigest, PasswordHashError> {
        let params = self.params.clone();
        let password = Zeroizing::new(password.as_bytes().to_vec());
        tokio::task::spawn_blocking(move || Self::hash_blocking(params, &password))
            .await
            .map_err(|err| PasswordHashError::hashing(format!("hashing task failed: {err}")))?
            .map(PasswordDigest::new)
    }

    async fn verify(
        &self,
        password: &str,
        digest: &PasswordDigest,
    ) -> Result<bool, PasswordHashError> {
        let password = Zeroizing::new(password.as_bytes().to_vec());
        let digest = digest.as_str().to_owned();
        tokio::task::spawn_blocking(move || Self::verify_blocking(&password, &digest))
            .await
            .map_err(|err| PasswordHashError::hashing(format!("verification task failed: {err}")))?
    }
}
