//! User persistence.
//!
//! The authentication service depends only on [`UserStore`]. Two
//! implementations ship with the crate: [`users::PgUserStore`] (Postgres)
//! and [`memory::InMemoryUserStore`] (process-local, for development and
//! tests).

pub mod memory;
pub mod users;

use crate::errors::AuthError;
use crate::models::{NewUser, UserRecord};
use async_trait::async_trait;

pub use memory::InMemoryUserStore;
pub use users::PgUserStore;

/// Persistent collection of user records.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Persist a new user.
    ///
    /// `Ok(None)` means the store declined to produce a record, including
    /// when the email or username is already taken.
    async fn create(&self, user: &NewUser) -> Result<Option<UserRecord>, AuthError>;

    /// Look up a user by exact email.
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError>;
}
