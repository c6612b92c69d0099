//! Deterministic fixtures for testing
//!
//! A fixed HS256 secret and a matching service configuration, so tokens
//! minted in one test can be decoded by the same fixture in another.

use auth_service::config::{Config, DEFAULT_BCRYPT_COST};
use auth_service::crypto::JwtTokenIssuer;
use base64::engine::general_purpose;
use base64::Engine;
use std::collections::HashMap;

/// Token lifetime used by test issuers.
pub const TEST_JWT_EXPIRY_SECONDS: i64 = 3600;

/// Deterministic 32-byte HS256 secret.
pub fn test_jwt_secret() -> [u8; 32] {
    let mut secret = [0u8; 32];
    for (i, byte) in secret.iter_mut().enumerate() {
        *byte = (i as u8).wrapping_mul(7).wrapping_add(3);
    }
    secret
}

/// [`test_jwt_secret`] as the `JWT_SECRET` environment variable expects it.
pub fn test_jwt_secret_base64() -> String {
    general_purpose::STANDARD.encode(test_jwt_secret())
}

/// Issuer signing with [`test_jwt_secret`].
pub fn test_token_issuer() -> JwtTokenIssuer {
    JwtTokenIssuer::new(&test_jwt_secret(), TEST_JWT_EXPIRY_SECONDS)
}

/// Environment for a service on the in-memory store.
pub fn test_config_vars() -> HashMap<String, String> {
    HashMap::from([
        ("DATABASE_URL".to_string(), "memory".to_string()),
        ("BIND_ADDRESS".to_string(), "127.0.0.1:0".to_string()),
        ("JWT_SECRET".to_string(), test_jwt_secret_base64()),
        (
            "JWT_EXPIRES_IN_SECONDS".to_string(),
            TEST_JWT_EXPIRY_SECONDS.to_string(),
        ),
        ("BCRYPT_COST".to_string(), DEFAULT_BCRYPT_COST.to_string()),
    ])
}

/// Configuration built from [`test_config_vars`].
pub fn test_config() -> Config {
    Config::from_vars(&test_config_vars()).expect("test configuration should be valid")
}
