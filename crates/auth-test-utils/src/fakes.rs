//! Recording fakes for the authentication service's collaborators
//!
//! Each fake wraps a real implementation and records how it was called, so
//! tests can assert on side effects (what the store received, whether the
//! hasher or issuer ran at all) without mocking behavior away.

use crate::crypto_fixtures::test_token_issuer;
use async_trait::async_trait;
use auth_service::config::DEFAULT_BCRYPT_COST;
use auth_service::crypto::{BcryptHasher, CredentialHasher, JwtTokenIssuer, TokenIssuer};
use auth_service::errors::AuthError;
use auth_service::models::{IssuedToken, NewUser, StoredCredential, TokenPayload, UserRecord};
use auth_service::repositories::{InMemoryUserStore, UserStore};
use auth_service::services::AuthService;
use common::secret::SecretString;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// User Store
// ============================================================================

/// [`InMemoryUserStore`] that records every call.
///
/// `decline_creates` makes `create` answer `Ok(None)` after recording the
/// request, which is how a store signals a creation failure.
#[derive(Debug, Default)]
pub struct RecordingUserStore {
    inner: InMemoryUserStore,
    created: Mutex<Vec<NewUser>>,
    lookups: Mutex<Vec<String>>,
    decline_creates: AtomicBool,
}

impl RecordingUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that records create requests but never produces a record.
    pub fn declining() -> Self {
        let store = Self::default();
        store.decline_creates.store(true, Ordering::SeqCst);
        store
    }

    /// Every `NewUser` passed to `create`, in call order.
    pub fn create_requests(&self) -> Vec<NewUser> {
        self.created.lock().unwrap().clone()
    }

    pub fn create_calls(&self) -> usize {
        self.created.lock().unwrap().len()
    }

    /// Every email passed to `find_by_email`, in call order.
    pub fn lookups(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }

    pub async fn user_count(&self) -> usize {
        self.inner.len().await
    }
}

#[async_trait]
impl UserStore for RecordingUserStore {
    async fn create(&self, user: &NewUser) -> Result<Option<UserRecord>, AuthError> {
        self.created.lock().unwrap().push(user.clone());
        if self.decline_creates.load(Ordering::SeqCst) {
            return Ok(None);
        }
        self.inner.create(user).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError> {
        self.lookups.lock().unwrap().push(email.to_string());
        self.inner.find_by_email(email).await
    }
}

/// Store whose backend is unreachable.
///
/// Every call fails with an `AuthError::Database` carrying infrastructure
/// detail that must never reach an HTTP response body.
#[derive(Debug, Default)]
pub struct FailingUserStore;

/// Detail carried by [`FailingUserStore`] errors.
pub const FAILING_STORE_DETAIL: &str = "connection refused (10.0.0.5:5432)";

#[async_trait]
impl UserStore for FailingUserStore {
    async fn create(&self, _user: &NewUser) -> Result<Option<UserRecord>, AuthError> {
        Err(AuthError::Database(FAILING_STORE_DETAIL.to_string()))
    }

    async fn find_by_email(&self, _email: &str) -> Result<Option<UserRecord>, AuthError> {
        Err(AuthError::Database(FAILING_STORE_DETAIL.to_string()))
    }
}

// ============================================================================
// Credential Hasher
// ============================================================================

/// [`BcryptHasher`] at the default cost that counts calls.
#[derive(Debug)]
pub struct CountingHasher {
    inner: BcryptHasher,
    hash_calls: AtomicUsize,
    verify_calls: AtomicUsize,
}

impl CountingHasher {
    pub fn new() -> Self {
        Self {
            inner: BcryptHasher::new(DEFAULT_BCRYPT_COST).expect("default cost is valid"),
            hash_calls: AtomicUsize::new(0),
            verify_calls: AtomicUsize::new(0),
        }
    }

    pub fn hash_calls(&self) -> usize {
        self.hash_calls.load(Ordering::SeqCst)
    }

    pub fn verify_calls(&self) -> usize {
        self.verify_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.hash_calls() + self.verify_calls()
    }
}

impl Default for CountingHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CredentialHasher for CountingHasher {
    async fn hash(&self, plaintext: &SecretString) -> Result<StoredCredential, AuthError> {
        self.hash_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.hash(plaintext).await
    }

    async fn verify(&self, plaintext: &SecretString, stored: &StoredCredential) -> bool {
        self.verify_calls.fetch_add(1, Ordering::SeqCst);
        self.inner.verify(plaintext, stored).await
    }
}

// ============================================================================
// Token Issuer
// ============================================================================

/// [`JwtTokenIssuer`] on the test secret that captures payloads.
#[derive(Debug)]
pub struct RecordingTokenIssuer {
    inner: JwtTokenIssuer,
    payloads: Mutex<Vec<TokenPayload>>,
}

impl RecordingTokenIssuer {
    pub fn new() -> Self {
        Self {
            inner: test_token_issuer(),
            payloads: Mutex::new(Vec::new()),
        }
    }

    /// Every payload passed to `sign`, in call order.
    pub fn payloads(&self) -> Vec<TokenPayload> {
        self.payloads.lock().unwrap().clone()
    }

    pub fn sign_calls(&self) -> usize {
        self.payloads.lock().unwrap().len()
    }

    /// The issuer that actually signs, for decoding issued tokens.
    pub fn issuer(&self) -> &JwtTokenIssuer {
        &self.inner
    }
}

impl Default for RecordingTokenIssuer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenIssuer for RecordingTokenIssuer {
    async fn sign(&self, payload: &TokenPayload) -> Result<IssuedToken, AuthError> {
        self.payloads.lock().unwrap().push(payload.clone());
        self.inner.sign(payload).await
    }
}

/// Issuer whose signing backend is unavailable.
#[derive(Debug, Default)]
pub struct FailingTokenIssuer;

#[async_trait]
impl TokenIssuer for FailingTokenIssuer {
    async fn sign(&self, _payload: &TokenPayload) -> Result<IssuedToken, AuthError> {
        Err(AuthError::Crypto("signing backend unavailable".to_string()))
    }
}

// ============================================================================
// Bundle
// ============================================================================

/// One of each recording fake, shared with the service under test.
pub struct Fakes {
    pub store: Arc<RecordingUserStore>,
    pub hasher: Arc<CountingHasher>,
    pub issuer: Arc<RecordingTokenIssuer>,
}

impl Fakes {
    pub fn new() -> Self {
        Self::with_store(RecordingUserStore::new())
    }

    pub fn with_store(store: RecordingUserStore) -> Self {
        Self {
            store: Arc::new(store),
            hasher: Arc::new(CountingHasher::new()),
            issuer: Arc::new(RecordingTokenIssuer::new()),
        }
    }

    pub fn auth_service(&self) -> AuthService {
        AuthService::new(self.store.clone(), self.hasher.clone(), self.issuer.clone())
    }
}

impl Default for Fakes {
    fn default() -> Self {
        Self::new()
    }
}
