//! Postgres-backed user store.

use crate::errors::AuthError;
use crate::models::{NewUser, StoredCredential, UserRecord, UserStatus};
use crate::repositories::UserStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::types::UserId;
use sqlx::PgPool;
use tracing::instrument;

/// Row shape of the `users` table.
#[derive(sqlx::FromRow)]
struct UserRow {
    id: String,
    username: String,
    email: String,
    password_hash: String,
    first_name: Option<String>,
    last_name: Option<String>,
    avatar: Option<String>,
    status: i16,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for UserRecord {
    fn from(row: UserRow) -> Self {
        UserRecord {
            id: UserId(row.id),
            username: row.username,
            email: row.email,
            password_hash: StoredCredential::new(row.password_hash),
            first_name: row.first_name,
            last_name: row.last_name,
            avatar: row.avatar,
            status: UserStatus::from_i16(row.status),
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    /// Insert a user. A clash on the unique `username` or `email` columns
    /// yields `Ok(None)` rather than an error.
    #[instrument(skip_all)]
    async fn create(&self, user: &NewUser) -> Result<Option<UserRecord>, AuthError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, email, password_hash, first_name, last_name, avatar)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT DO NOTHING
            RETURNING
                id::text AS id, username, email, password_hash,
                first_name, last_name, avatar, status, created_at
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.password_hash.as_str())
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.avatar)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Database(format!("Failed to create user: {}", e)))?;

        if row.is_none() {
            tracing::debug!(target: "auth.repositories", "User insert skipped on unique conflict");
        }

        Ok(row.map(UserRecord::from))
    }

    #[instrument(skip_all)]
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT
                id::text AS id, username, email, password_hash,
                first_name, last_name, avatar, status, created_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AuthError::Database(format!("Failed to fetch user by email: {}", e)))?;

        Ok(row.map(UserRecord::from))
    }
}
