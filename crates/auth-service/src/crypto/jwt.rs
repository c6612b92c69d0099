//! Signed-token issuance (HS256 JWT).
//!
//! The signing secret and token lifetime are issuer configuration, passed to
//! [`JwtTokenIssuer::new`]. The authentication service only ever sees the
//! [`TokenIssuer`] trait.

use crate::errors::AuthError;
use crate::models::{IssuedToken, TokenPayload};
use async_trait::async_trait;
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::instrument;

/// Produces a signed, opaque token from a payload.
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    async fn sign(&self, payload: &TokenPayload) -> Result<IssuedToken, AuthError>;
}

/// Claims carried by an issued token.
///
/// `username` and `sub` come from the payload; `iat`/`exp` are added by the
/// issuer.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserClaims {
    pub username: String,
    /// Subject (user record id)
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Custom Debug implementation that redacts the `sub` field.
impl fmt::Debug for UserClaims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserClaims")
            .field("username", &self.username)
            .field("sub", &"[REDACTED]")
            .field("iat", &self.iat)
            .field("exp", &self.exp)
            .finish()
    }
}

/// HS256 [`TokenIssuer`].
pub struct JwtTokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry_seconds: i64,
}

impl fmt::Debug for JwtTokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtTokenIssuer")
            .field("secret", &"[REDACTED]")
            .field("expiry_seconds", &self.expiry_seconds)
            .finish()
    }
}

impl JwtTokenIssuer {
    pub fn new(secret: &[u8], expiry_seconds: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expiry_seconds,
        }
    }

    pub fn expiry_seconds(&self) -> i64 {
        self.expiry_seconds
    }

    /// Sign claims for `payload`, issued at `now` (unix seconds).
    fn sign_at(&self, payload: &TokenPayload, now: i64) -> Result<IssuedToken, AuthError> {
        let exp = now.checked_add(self.expiry_seconds).ok_or_else(|| {
            AuthError::Crypto(format!(
                "Token expiry overflows: iat {} + {} seconds",
                now, self.expiry_seconds
            ))
        })?;

        let claims = UserClaims {
            username: payload.username.clone(),
            sub: payload.subject.to_string(),
            iat: now,
            exp,
        };

        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());

        let token = encode(&header, &claims, &self.encoding_key)
            .map_err(|e| AuthError::Crypto(format!("JWT signing operation failed: {}", e)))?;

        Ok(IssuedToken::new(token))
    }

    /// Verify the signature and expiry of a token minted by this issuer.
    #[instrument(skip_all)]
    pub fn decode(&self, token: &str) -> Result<UserClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;

        let token_data = decode::<UserClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            tracing::debug!(target: "crypto", error = %e, "Token verification failed");
            AuthError::Crypto("The access token is invalid or expired".to_string())
        })?;

        Ok(token_data.claims)
    }
}

#[async_trait]
impl TokenIssuer for JwtTokenIssuer {
    #[instrument(skip_all)]
    async fn sign(&self, payload: &TokenPayload) -> Result<IssuedToken, AuthError> {
        self.sign_at(payload, Utc::now().timestamp())
    }
}
