//! Password hashing and token signing.
//!
//! - [`CredentialHasher`] / [`BcryptHasher`]: salted, cost-parameterized
//!   one-way hashing of user passwords.
//! - [`jwt`]: the HS256 token issuer.

pub mod jwt;

use crate::config::{MAX_BCRYPT_COST, MIN_BCRYPT_COST};
use crate::errors::AuthError;
use crate::models::StoredCredential;
use crate::observability::metrics::record_credential_hash;
use async_trait::async_trait;
use common::secret::{ExposeSecret, SecretString};
use std::time::Instant;
use tracing::instrument;

pub use jwt::{JwtTokenIssuer, TokenIssuer, UserClaims};

/// bcrypt only reads the first 72 bytes of its input; longer passwords are
/// refused instead of silently truncated.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// One-way transform of user passwords.
///
/// Implementations must salt every hash and verify through the salt and cost
/// embedded in the stored value; comparing two independently computed hashes
/// for equality is not a valid verification.
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext password for storage.
    async fn hash(&self, plaintext: &SecretString) -> Result<StoredCredential, AuthError>;

    /// Check a plaintext password against a stored hash.
    ///
    /// Returns `false` for mismatches and for malformed stored values.
    async fn verify(&self, plaintext: &SecretString, stored: &StoredCredential) -> bool;
}

/// Hash a password with bcrypt using the given cost factor.
///
/// Runs synchronously; async callers go through [`BcryptHasher`], which moves
/// the work onto the blocking pool.
///
/// # Errors
///
/// - `AuthError::InvalidInput` if the password is empty or longer than
///   [`MAX_PASSWORD_BYTES`]
/// - `AuthError::Crypto` if the cost is outside 10-14 or bcrypt fails
#[instrument(skip_all)]
pub fn hash_password(password: &str, cost: u32) -> Result<String, AuthError> {
    if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
        return Err(AuthError::Crypto(format!(
            "Invalid bcrypt cost: {} (must be {}-{})",
            cost, MIN_BCRYPT_COST, MAX_BCRYPT_COST
        )));
    }

    if password.is_empty() {
        return Err(AuthError::InvalidInput(
            "Password must not be empty".to_string(),
        ));
    }

    if password.len() > MAX_PASSWORD_BYTES {
        return Err(AuthError::InvalidInput(format!(
            "Password must be at most {} bytes",
            MAX_PASSWORD_BYTES
        )));
    }

    bcrypt::hash(password, cost)
        .map_err(|e| AuthError::Crypto(format!("Password hashing failed: {}", e)))
}

/// Verify a password against a bcrypt hash.
///
/// bcrypt re-derives the hash with the salt and cost stored in `hash` and
/// compares in constant time. A malformed `hash` is treated as a mismatch,
/// as is a password longer than [`MAX_PASSWORD_BYTES`] (no stored hash can
/// have been produced from one).
#[instrument(skip_all)]
pub fn verify_password(password: &str, hash: &str) -> bool {
    if password.len() > MAX_PASSWORD_BYTES {
        tracing::debug!(target: "crypto", "Password exceeds bcrypt input limit");
        return false;
    }

    match bcrypt::verify(password, hash) {
        Ok(valid) => valid,
        Err(e) => {
            tracing::debug!(target: "crypto", error = %e, "Stored credential could not be parsed");
            false
        }
    }
}

/// bcrypt-backed [`CredentialHasher`].
///
/// Hashing at cost 10 takes tens of milliseconds of CPU, so both operations
/// run on tokio's blocking pool instead of an executor thread.
#[derive(Debug, Clone, Copy)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Result<Self, AuthError> {
        if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
            return Err(AuthError::Crypto(format!(
                "Invalid bcrypt cost: {} (must be {}-{})",
                cost, MIN_BCRYPT_COST, MAX_BCRYPT_COST
            )));
        }
        Ok(Self { cost })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }
}

#[async_trait]
impl CredentialHasher for BcryptHasher {
    #[instrument(skip_all, fields(cost = self.cost))]
    async fn hash(&self, plaintext: &SecretString) -> Result<StoredCredential, AuthError> {
        let secret = plaintext.clone();
        let cost = self.cost;
        let start = Instant::now();

        let hash = tokio::task::spawn_blocking(move || hash_password(secret.expose_secret(), cost))
            .await
            .map_err(|e| {
                tracing::error!(target: "crypto", error = %e, "Hashing task failed");
                AuthError::Internal
            })??;

        record_credential_hash("hash", start.elapsed());
        Ok(StoredCredential::new(hash))
    }

    #[instrument(skip_all)]
    async fn verify(&self, plaintext: &SecretString, stored: &StoredCredential) -> bool {
        let secret = plaintext.clone();
        let stored = stored.clone();
        let start = Instant::now();

        let valid = tokio::task::spawn_blocking(move || {
            verify_password(secret.expose_secret(), stored.as_str())
        })
        .await
        .unwrap_or_else(|e| {
            tracing::error!(target: "crypto", error = %e, "Verification task failed");
            false
        });

        record_credential_hash("verify", start.elapsed());
        valid
    }
}
