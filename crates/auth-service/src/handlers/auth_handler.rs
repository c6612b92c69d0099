use crate::errors::AuthError;
use crate::models::{CreateUserInput, LoginInput, TokenResponse};
use crate::routes::AppState;
use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

/// Handle signup request
///
/// POST /api/v1/auth/signup
///
/// Returns 201 with the access token of the newly created user.
pub async fn handle_signup(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateUserInput>,
) -> Result<(StatusCode, Json<TokenResponse>), AuthError> {
    let access_token = state.auth.signup(&payload).await?;

    Ok((StatusCode::CREATED, Json(TokenResponse { access_token })))
}

/// Handle login request
///
/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginInput>,
) -> Result<Json<TokenResponse>, AuthError> {
    let access_token = state.auth.login(&payload).await?;

    Ok(Json(TokenResponse { access_token }))
}
