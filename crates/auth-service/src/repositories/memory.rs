//! Process-local user store.
//!
//! Enforces the same uniqueness rules as the Postgres schema (username and
//! email). Ids are assigned sequentially as `u1`, `u2`, ...

use crate::errors::AuthError;
use crate::models::{NewUser, UserRecord, UserStatus};
use crate::repositories::UserStore;
use async_trait::async_trait;
use chrono::Utc;
use common::types::UserId;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<Vec<UserRecord>>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn create(&self, user: &NewUser) -> Result<Option<UserRecord>, AuthError> {
        let mut users = self.users.write().await;

        if users
            .iter()
            .any(|u| u.email == user.email || u.username == user.username)
        {
            return Ok(None);
        }

        let record = UserRecord {
            id: UserId(format!("u{}", users.len() + 1)),
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            avatar: user.avatar.clone(),
            status: UserStatus::default(),
            created_at: Utc::now(),
        };
        users.push(record.clone());

        Ok(Some(record))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError> {
        let users = self.users.read().await;
        Ok(users.iter().find(|u| u.email == email).cloned())
    }
}
