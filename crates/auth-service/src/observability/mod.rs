//! Observability for the auth service.
//!
//! # Privacy by Default
//!
//! All instrumentation uses `#[instrument(skip_all)]` and explicit safe field allow-listing.
//! Fields are categorized as:
//! - **SAFE**: Can be logged in plaintext (operation names, status labels)
//! - **HASHED**: Must be SHA-256 hashed for correlation (email)
//! - **NEVER**: Must never appear in logs (passwords, stored hashes, tokens)
//!
//! Correlation hashes are plain SHA-256 truncated to 32 bits. They let a
//! signup and later logins for the same address be tied together in logs, but
//! are not a substitute for a keyed hash if emails are enumerable.

pub mod metrics;

use sha2::{Digest, Sha256};

/// Hash a field value for correlation in logs (SHA-256, first 8 hex chars)
///
/// This is NOT cryptographically secure for secrets - it's a one-way hash
/// for correlation purposes only.
pub fn hash_for_correlation(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let result = hasher.finalize();
    // 32 bits: enough for correlation, limits reversibility
    hex::encode(result.get(..4).unwrap_or_default())
}
