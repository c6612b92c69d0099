//! Test server harness for E2E testing
//!
//! Provides TestAuthServer for spawning real auth server instances in tests.

use crate::crypto_fixtures::test_token_issuer;
use crate::user_builders::TestUserBuilder;
use auth_service::config::DEFAULT_BCRYPT_COST;
use auth_service::crypto::{BcryptHasher, JwtTokenIssuer};
use auth_service::repositories::{InMemoryUserStore, PgUserStore, UserStore};
use auth_service::routes::{self, AppState};
use auth_service::services::AuthService;
use metrics_exporter_prometheus::PrometheusBuilder;
use sqlx::PgPool;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinHandle;

/// Test harness for spawning the auth server in E2E tests
///
/// # Example
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_signup_e2e() -> Result<()> {
///     let server = TestAuthServer::spawn().await?;
///
///     let response = server.signup(&TestUserBuilder::alice()).await?;
///
///     assert_eq!(response.status(), 201);
///     Ok(())
/// }
/// ```
pub struct TestAuthServer {
    addr: SocketAddr,
    client: reqwest::Client,
    issuer: JwtTokenIssuer,
    _handle: JoinHandle<()>,
}

impl TestAuthServer {
    /// Spawn a server on a fresh in-memory user store
    pub async fn spawn() -> Result<Self, anyhow::Error> {
        Self::spawn_with_store(Arc::new(InMemoryUserStore::new()), false).await
    }

    /// Spawn a server with login timing equalization enabled
    pub async fn spawn_equalized() -> Result<Self, anyhow::Error> {
        Self::spawn_with_store(Arc::new(InMemoryUserStore::new()), true).await
    }

    /// Spawn a server backed by Postgres (typically from `#[sqlx::test]`)
    pub async fn spawn_with_pool(pool: PgPool) -> Result<Self, anyhow::Error> {
        Self::spawn_with_store(Arc::new(PgUserStore::new(pool)), false).await
    }

    /// Spawn a server on any user store
    ///
    /// The server will:
    /// - Bind to a random available port (127.0.0.1:0)
    /// - Sign tokens with the deterministic test secret
    /// - Start the HTTP server in the background
    pub async fn spawn_with_store(
        users: Arc<dyn UserStore>,
        equalize_login_timing: bool,
    ) -> Result<Self, anyhow::Error> {
        let hasher = Arc::new(BcryptHasher::new(DEFAULT_BCRYPT_COST)?);
        let mut auth = AuthService::new(users, hasher, Arc::new(test_token_issuer()));
        if equalize_login_timing {
            auth = auth.with_login_timing_equalization().await?;
        }

        let state = Arc::new(AppState {
            auth: Arc::new(auth),
        });

        // The global recorder can only be installed once per test process.
        // Later servers get a standalone recorder that is not installed.
        let metrics_handle = match routes::init_metrics_recorder() {
            Ok(handle) => handle,
            Err(_) => PrometheusBuilder::new().build_recorder().handle(),
        };

        let app = routes::build_routes(state, metrics_handle);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| anyhow::anyhow!("Failed to bind test server: {}", e))?;

        let addr = listener
            .local_addr()
            .map_err(|e| anyhow::anyhow!("Failed to get local address: {}", e))?;

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Test server error: {}", e);
            }
        });

        Ok(Self {
            addr,
            client: reqwest::Client::new(),
            issuer: test_token_issuer(),
            _handle: handle,
        })
    }

    /// Get the base URL of the test server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Get the socket address
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Issuer holding the server's signing secret, for decoding tokens
    pub fn issuer(&self) -> &JwtTokenIssuer {
        &self.issuer
    }

    /// POST the user's signup body to `/api/v1/auth/signup`
    pub async fn signup(&self, user: &TestUserBuilder) -> Result<reqwest::Response, anyhow::Error> {
        self.post_json("/api/v1/auth/signup", &user.to_json()).await
    }

    /// POST the user's credentials to `/api/v1/auth/login`
    pub async fn login(&self, user: &TestUserBuilder) -> Result<reqwest::Response, anyhow::Error> {
        self.post_json("/api/v1/auth/login", &user.login_json()).await
    }

    pub async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<reqwest::Response, anyhow::Error> {
        let response = self
            .client
            .post(format!("{}{}", self.url(), path))
            .json(body)
            .send()
            .await?;
        Ok(response)
    }

    /// Sign up and return the access token, failing on any non-201 status
    pub async fn signup_token(&self, user: &TestUserBuilder) -> Result<String, anyhow::Error> {
        let response = self.signup(user).await?;
        let status = response.status();
        if status != reqwest::StatusCode::CREATED {
            anyhow::bail!("signup returned {}: {}", status, response.text().await?);
        }
        access_token(response).await
    }
}

/// Extract `access_token` from a token response body
pub async fn access_token(response: reqwest::Response) -> Result<String, anyhow::Error> {
    let body: serde_json::Value = response.json().await?;
    body["access_token"]
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("response has no access_token: {}", body))
}
