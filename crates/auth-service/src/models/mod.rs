use chrono::{DateTime, Utc};
use common::secret::SecretString;
use common::types::UserId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Salted bcrypt hash persisted in place of a user's password.
///
/// Only ever produced by a [`crate::crypto::CredentialHasher`] or read back
/// from the user store. Debug output is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct StoredCredential(String);

impl StoredCredential {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for StoredCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("StoredCredential([REDACTED])")
    }
}

/// Presence status of a user (0 = offline, 1 = online, 2 = typing).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UserStatus {
    #[default]
    Offline,
    Online,
    Typing,
}

impl UserStatus {
    pub fn as_i16(self) -> i16 {
        match self {
            UserStatus::Offline => 0,
            UserStatus::Online => 1,
            UserStatus::Typing => 2,
        }
    }

    /// Unknown values decode as `Offline`.
    pub fn from_i16(value: i16) -> Self {
        match value {
            1 => UserStatus::Online,
            2 => UserStatus::Typing,
            _ => UserStatus::Offline,
        }
    }
}

/// Signup request body.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserInput {
    pub username: String,
    pub email: String,
    pub password: SecretString,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Login request body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    pub email: String,
    pub password: SecretString,
}

/// Record handed to [`crate::repositories::UserStore::create`].
///
/// Built fresh from a [`CreateUserInput`]; it carries the hash, never the
/// plaintext password.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: StoredCredential,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
}

impl NewUser {
    pub fn from_input(input: &CreateUserInput, password_hash: StoredCredential) -> Self {
        Self {
            username: input.username.clone(),
            email: input.email.clone(),
            password_hash,
            first_name: input.first_name.clone(),
            last_name: input.last_name.clone(),
            avatar: input.avatar.clone(),
        }
    }
}

/// A persisted user as returned by the user store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub password_hash: StoredCredential,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub avatar: Option<String>,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
}

/// Claims handed to the token issuer: exactly the username and the record id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPayload {
    pub username: String,
    pub subject: UserId,
}

impl TokenPayload {
    pub fn for_user(user: &UserRecord) -> Self {
        Self {
            username: user.username.clone(),
            subject: user.id.clone(),
        }
    }
}

/// Signed token returned to the caller. Opaque to this service.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssuedToken(String);

impl IssuedToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("IssuedToken([REDACTED])")
    }
}

/// Response body for successful signup and login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: IssuedToken,
}
