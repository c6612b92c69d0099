//! # Auth Test Utilities
//!
//! Shared test utilities for the auth service.
//!
//! This crate provides:
//! - Deterministic fixtures (fixed JWT secret, test configuration)
//! - Recording fakes for the user store, hasher and token issuer
//! - Test data builders (TestUserBuilder)
//! - Server test harness (TestAuthServer for E2E tests)
//! - Fixed test identities (usernames, emails, passwords)
//! - Custom assertions (TokenAssertions trait)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use auth_test_utils::*;
//!
//! #[tokio::test]
//! async fn test_example() {
//!     let fakes = Fakes::new();
//!     let service = fakes.auth_service();
//!
//!     let token = service.signup(&TestUserBuilder::alice().build()).await?;
//!
//!     token.as_str()
//!         .assert_valid_jwt()
//!         .assert_for_username(TEST_USERNAME_ALICE);
//! }
//! ```

pub mod assertions;
pub mod crypto_fixtures;
pub mod fakes;
pub mod server_harness;
pub mod test_ids;
pub mod user_builders;

// Re-export commonly used items
pub use assertions::*;
pub use crypto_fixtures::*;
pub use fakes::*;
pub use server_harness::*;
pub use test_ids::*;
pub use user_builders::*;
