//! Fault injection tests for user store unavailability
//!
//! These tests validate that the auth service handles store failures
//! gracefully:
//! - Signup and login return 500 DATABASE_ERROR, not an auth error
//! - Error bodies don't leak connection details
//! - Health probe still returns 200 (liveness unaffected)

use auth_test_utils::*;
use reqwest::StatusCode;
use sqlx::PgPool;
use std::sync::Arc;

async fn assert_database_error(response: reqwest::Response) -> Result<(), anyhow::Error> {
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], "DATABASE_ERROR");
    assert!(
        !body.to_string().contains("10.0.0.5"),
        "Error body must not leak infrastructure details: {}",
        body
    );
    Ok(())
}

#[tokio::test]
async fn test_signup_store_unreachable_returns_500() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn_with_store(Arc::new(FailingUserStore), false).await?;

    let response = server.signup(&TestUserBuilder::alice()).await?;

    assert_database_error(response).await
}

#[tokio::test]
async fn test_login_store_unreachable_returns_500_not_401() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn_with_store(Arc::new(FailingUserStore), false).await?;

    let response = server.login(&TestUserBuilder::alice()).await?;

    assert_database_error(response).await
}

#[tokio::test]
async fn test_health_unaffected_by_store_failure() -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn_with_store(Arc::new(FailingUserStore), false).await?;

    let response = server
        .client()
        .get(format!("{}/health", server.url()))
        .send()
        .await?;

    assert_eq!(response.status(), StatusCode::OK);
    Ok(())
}

/// Closing the pool mid-run turns subsequent requests into 500s.
#[sqlx::test(migrations = "../../migrations")]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn test_login_after_pool_closed_returns_500(pool: PgPool) -> Result<(), anyhow::Error> {
    let server = TestAuthServer::spawn_with_pool(pool.clone()).await?;
    let alice = TestUserBuilder::alice();
    server.signup_token(&alice).await?;

    pool.close().await;

    let response = server.login(&alice).await?;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: serde_json::Value = response.json().await?;
    assert_eq!(body["error"]["code"], "DATABASE_ERROR");
    Ok(())
}
