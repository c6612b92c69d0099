use base64::{engine::general_purpose, Engine as _};
use common::secret::SecretBox;
use std::collections::HashMap;
use std::env;
use thiserror::Error;

/// Default bcrypt cost factor (2^10 rounds).
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Lowest bcrypt cost accepted by the hasher.
pub const MIN_BCRYPT_COST: u32 = 10;

/// Highest bcrypt cost accepted by the hasher (~800ms per hash).
pub const MAX_BCRYPT_COST: u32 = 14;

/// Default lifetime of an issued token.
pub const DEFAULT_JWT_EXPIRY_SECONDS: i64 = 3600;

/// Longest accepted token lifetime (10 years).
pub const MAX_JWT_EXPIRY_SECONDS: i64 = 10 * 365 * 24 * 60 * 60;

/// Minimum decoded length of the HS256 signing secret.
pub const MIN_JWT_SECRET_BYTES: usize = 32;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";

#[derive(Debug)]
pub struct Config {
    /// Postgres connection string, or `memory` for the in-process store.
    pub database_url: String,
    pub bind_address: String,
    /// HS256 signing secret (decoded from base64).
    pub jwt_secret: SecretBox<Vec<u8>>,
    pub jwt_expiry_seconds: i64,
    pub bcrypt_cost: u32,
    /// Run a decoy verification on unknown-email logins.
    pub equalize_login_timing: bool,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid JWT secret: {0}")]
    InvalidJwtSecret(String),

    #[error("Base64 decode error: {0}")]
    Base64Error(#[from] base64::DecodeError),

    #[error("Invalid value for {name}: {reason}")]
    InvalidValue { name: String, reason: String },
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(&env::vars().collect())
    }

    /// Load configuration from a HashMap (for testing)
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let database_url = vars
            .get("DATABASE_URL")
            .ok_or_else(|| ConfigError::MissingEnvVar("DATABASE_URL".to_string()))?
            .clone();

        let bind_address = vars
            .get("BIND_ADDRESS")
            .cloned()
            .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let jwt_secret_base64 = vars
            .get("JWT_SECRET")
            .ok_or_else(|| ConfigError::MissingEnvVar("JWT_SECRET".to_string()))?;

        let jwt_secret = general_purpose::STANDARD
            .decode(jwt_secret_base64)
            .map_err(ConfigError::Base64Error)?;

        if jwt_secret.len() < MIN_JWT_SECRET_BYTES {
            return Err(ConfigError::InvalidJwtSecret(format!(
                "Expected at least {} bytes, got {}",
                MIN_JWT_SECRET_BYTES,
                jwt_secret.len()
            )));
        }

        let jwt_expiry_seconds = match vars.get("JWT_EXPIRES_IN_SECONDS") {
            Some(raw) => {
                let value: i64 = raw.parse().map_err(|e| ConfigError::InvalidValue {
                    name: "JWT_EXPIRES_IN_SECONDS".to_string(),
                    reason: format!("{}", e),
                })?;
                if value <= 0 {
                    return Err(ConfigError::InvalidValue {
                        name: "JWT_EXPIRES_IN_SECONDS".to_string(),
                        reason: "must be positive".to_string(),
                    });
                }
                if value > MAX_JWT_EXPIRY_SECONDS {
                    return Err(ConfigError::InvalidValue {
                        name: "JWT_EXPIRES_IN_SECONDS".to_string(),
                        reason: format!("must be at most {}", MAX_JWT_EXPIRY_SECONDS),
                    });
                }
                value
            }
            None => DEFAULT_JWT_EXPIRY_SECONDS,
        };

        let bcrypt_cost = match vars.get("BCRYPT_COST") {
            Some(raw) => {
                let value: u32 = raw.parse().map_err(|e| ConfigError::InvalidValue {
                    name: "BCRYPT_COST".to_string(),
                    reason: format!("{}", e),
                })?;
                if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&value) {
                    return Err(ConfigError::InvalidValue {
                        name: "BCRYPT_COST".to_string(),
                        reason: format!(
                            "must be {}-{}, got {}",
                            MIN_BCRYPT_COST, MAX_BCRYPT_COST, value
                        ),
                    });
                }
                value
            }
            None => DEFAULT_BCRYPT_COST,
        };

        let equalize_login_timing = match vars.get("AUTH_EQUALIZE_LOGIN_TIMING") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                name: "AUTH_EQUALIZE_LOGIN_TIMING".to_string(),
                reason: format!("expected true or false, got {:?}", raw),
            })?,
            None => false,
        };

        Ok(Config {
            database_url,
            bind_address,
            jwt_secret: SecretBox::new(Box::new(jwt_secret)),
            jwt_expiry_seconds,
            bcrypt_cost,
            equalize_login_timing,
        })
    }
}
