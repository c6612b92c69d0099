//! Signup and login orchestration.
//!
//! [`AuthService`] holds its three collaborators as immutable trait objects
//! and keeps no per-call state. Every call is an independent unit:
//!
//! - signup: hash -> create -> build payload -> sign
//! - login: find by email -> verify -> build payload -> sign
//!
//! Each step short-circuits on failure. The token issuer is only reached on
//! the success path.

use crate::crypto::{CredentialHasher, TokenIssuer};
use crate::errors::AuthError;
use crate::models::{
    CreateUserInput, IssuedToken, LoginInput, NewUser, StoredCredential, TokenPayload,
};
use crate::observability::hash_for_correlation;
use crate::observability::metrics::record_auth_operation;
use crate::repositories::UserStore;
use common::secret::SecretString;
use std::sync::Arc;
use std::time::Instant;
use tracing::instrument;

/// Plaintext hashed once at startup when login timing equalization is on.
const LOGIN_DECOY_PLAINTEXT: &str = "decoy-credential-for-unknown-email";

pub struct AuthService {
    users: Arc<dyn UserStore>,
    hasher: Arc<dyn CredentialHasher>,
    issuer: Arc<dyn TokenIssuer>,
    login_decoy: Option<StoredCredential>,
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserStore>,
        hasher: Arc<dyn CredentialHasher>,
        issuer: Arc<dyn TokenIssuer>,
    ) -> Self {
        Self {
            users,
            hasher,
            issuer,
            login_decoy: None,
        }
    }

    /// Make unknown-email logins pay for one verification.
    ///
    /// Hashes a decoy credential with the configured hasher. Afterwards a login
    /// for an email with no record verifies the submitted password against
    /// the decoy before failing with `InvalidEmail`, so both login failures
    /// cost roughly one hasher verification.
    ///
    /// # Errors
    ///
    /// Propagates the hasher's error if the decoy cannot be hashed.
    pub async fn with_login_timing_equalization(mut self) -> Result<Self, AuthError> {
        let decoy = self
            .hasher
            .hash(&SecretString::from(LOGIN_DECOY_PLAINTEXT))
            .await?;
        self.login_decoy = Some(decoy);
        Ok(self)
    }

    pub fn equalizes_login_timing(&self) -> bool {
        self.login_decoy.is_some()
    }

    /// Register a user and return a token for them.
    ///
    /// The user store receives a fresh [`NewUser`] carrying the hash; the
    /// caller's input is not modified.
    ///
    /// # Errors
    ///
    /// - `AuthError::CreationFailed` if the store produces no record
    ///   (including duplicate email or username)
    /// - `AuthError::InvalidInput` if the hasher rejects the password
    /// - store, hasher and issuer infrastructure errors unchanged
    #[instrument(skip_all, fields(email_hash = %hash_for_correlation(&input.email)))]
    pub async fn signup(&self, input: &CreateUserInput) -> Result<IssuedToken, AuthError> {
        let start = Instant::now();
        let result = self.signup_inner(input).await;
        record_outcome("signup", &result, start);
        result
    }

    async fn signup_inner(&self, input: &CreateUserInput) -> Result<IssuedToken, AuthError> {
        let password_hash = self.hasher.hash(&input.password).await?;
        let new_user = NewUser::from_input(input, password_hash);

        let record = self.users.create(&new_user).await?.ok_or_else(|| {
            tracing::debug!(target: "auth.service", "User store produced no record");
            AuthError::CreationFailed
        })?;

        tracing::info!(target: "auth.service", "User created");
        self.issuer.sign(&TokenPayload::for_user(&record)).await
    }

    /// Authenticate by email and password and return a token.
    ///
    /// # Errors
    ///
    /// - `AuthError::InvalidEmail` if no record has this email
    /// - `AuthError::InvalidPassword` if the password does not verify
    /// - store and issuer infrastructure errors unchanged
    #[instrument(skip_all, fields(email_hash = %hash_for_correlation(&input.email)))]
    pub async fn login(&self, input: &LoginInput) -> Result<IssuedToken, AuthError> {
        let start = Instant::now();
        let result = self.login_inner(input).await;
        record_outcome("login", &result, start);
        result
    }

    async fn login_inner(&self, input: &LoginInput) -> Result<IssuedToken, AuthError> {
        let Some(record) = self.users.find_by_email(&input.email).await? else {
            if let Some(decoy) = &self.login_decoy {
                let _ = self.hasher.verify(&input.password, decoy).await;
            }
            tracing::debug!(target: "auth.service", "Login rejected: unknown email");
            return Err(AuthError::InvalidEmail);
        };

        if !self
            .hasher
            .verify(&input.password, &record.password_hash)
            .await
        {
            tracing::debug!(target: "auth.service", "Login rejected: password mismatch");
            return Err(AuthError::InvalidPassword);
        }

        self.issuer.sign(&TokenPayload::for_user(&record)).await
    }
}

fn record_outcome(operation: &'static str, result: &Result<IssuedToken, AuthError>, start: Instant) {
    let status = match result {
        Ok(_) => "success",
        Err(e) => e.metric_status(),
    };
    record_auth_operation(operation, status, start.elapsed());
}
