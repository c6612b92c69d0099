//! Secret types for protecting sensitive values from accidental logging.
//!
//! Re-exports [`secrecy`] so every crate in the workspace names the same
//! types. Passwords arriving from clients, signing keys and other key
//! material are held in these wrappers from the moment they are parsed.
//!
//! `SecretBox<T>` and `SecretString` implement `Debug` with redaction, so a
//! request struct that derives `Debug` stays safe to log. The inner value is
//! zeroized on drop.
//!
//! # Example
//!
//! ```rust
//! use common::secret::{ExposeSecret, SecretString};
//!
//! #[derive(Debug)]
//! struct LoginForm {
//!     email: String,
//!     password: SecretString,
//! }
//!
//! let form = LoginForm {
//!     email: "alice@example.com".to_string(),
//!     password: SecretString::from("hunter2"),
//! };
//!
//! assert!(!format!("{form:?}").contains("hunter2"));
//! assert_eq!(form.password.expose_secret(), "hunter2");
//! ```
//!
//! With the `serde` feature of `secrecy` (enabled workspace-wide) a
//! `SecretString` field deserializes straight from a JSON request body.

pub use secrecy::{ExposeSecret, SecretBox, SecretString};
