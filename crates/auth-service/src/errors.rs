use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// The user store accepted the request but produced no record
    /// (includes email/username uniqueness violations).
    #[error("Failed to create user")]
    CreationFailed,

    /// Login with an email no record is stored under.
    #[error("Invalid email")]
    InvalidEmail,

    /// Login with a password that does not match the stored credential.
    #[error("Invalid password")]
    InvalidPassword,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Cryptographic error: {0}")]
    Crypto(String),

    #[error("Internal server error")]
    Internal,
}

impl AuthError {
    /// Bounded label used for the `status` dimension of auth metrics.
    pub fn metric_status(&self) -> &'static str {
        match self {
            AuthError::CreationFailed => "creation_failed",
            AuthError::InvalidEmail => "invalid_email",
            AuthError::InvalidPassword => "invalid_password",
            AuthError::InvalidInput(_) => "invalid_input",
            AuthError::Database(_) | AuthError::Crypto(_) | AuthError::Internal => "error",
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AuthError::CreationFailed => (
                StatusCode::NOT_FOUND,
                "USER_NOT_CREATED",
                "Failed to create user".to_string(),
            ),
            AuthError::InvalidEmail => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Invalid email".to_string(),
            ),
            AuthError::InvalidPassword => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Invalid password".to_string(),
            ),
            AuthError::InvalidInput(reason) => {
                (StatusCode::BAD_REQUEST, "INVALID_INPUT", reason.clone())
            }
            AuthError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "DATABASE_ERROR",
                "An internal database error occurred".to_string(),
            ),
            AuthError::Crypto(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "CRYPTO_ERROR",
                "An internal cryptographic error occurred".to_string(),
            ),
            AuthError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                "An internal error occurred".to_string(),
            ),
        };

        if status.is_server_error() {
            tracing::error!(target: "auth.errors", error = %self, "Request failed");
        }

        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(error_response)).into_response()
    }
}
