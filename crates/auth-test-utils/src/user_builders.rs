//! Builder patterns for test data construction
//!
//! Provides fluent APIs for signup and login inputs, both as typed values
//! for service-level tests and as JSON bodies for HTTP tests.

use crate::test_ids::*;
use auth_service::models::{CreateUserInput, LoginInput};
use common::secret::SecretString;
use serde_json::json;

/// Builder for signup requests
///
/// # Example
/// ```rust,ignore
/// let input = TestUserBuilder::alice()
///     .with_first_name("Alice")
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct TestUserBuilder {
    username: String,
    email: String,
    password: String,
    first_name: Option<String>,
    last_name: Option<String>,
    avatar: Option<String>,
}

impl TestUserBuilder {
    pub fn new(username: &str, email: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            first_name: None,
            last_name: None,
            avatar: None,
        }
    }

    pub fn alice() -> Self {
        Self::new(TEST_USERNAME_ALICE, TEST_EMAIL_ALICE, TEST_PASSWORD_ALICE)
    }

    pub fn bob() -> Self {
        Self::new(TEST_USERNAME_BOB, TEST_EMAIL_BOB, TEST_PASSWORD_BOB)
    }

    pub fn with_username(mut self, username: &str) -> Self {
        self.username = username.to_string();
        self
    }

    pub fn with_email(mut self, email: &str) -> Self {
        self.email = email.to_string();
        self
    }

    pub fn with_password(mut self, password: &str) -> Self {
        self.password = password.to_string();
        self
    }

    pub fn with_first_name(mut self, first_name: &str) -> Self {
        self.first_name = Some(first_name.to_string());
        self
    }

    pub fn with_last_name(mut self, last_name: &str) -> Self {
        self.last_name = Some(last_name.to_string());
        self
    }

    pub fn with_avatar(mut self, avatar: &str) -> Self {
        self.avatar = Some(avatar.to_string());
        self
    }

    pub fn build(self) -> CreateUserInput {
        CreateUserInput {
            username: self.username,
            email: self.email,
            password: SecretString::from(self.password),
            first_name: self.first_name,
            last_name: self.last_name,
            avatar: self.avatar,
        }
    }

    /// Login input with this user's email and password.
    pub fn login(&self) -> LoginInput {
        login_input(&self.email, &self.password)
    }

    /// The signup request as an HTTP body.
    pub fn to_json(&self) -> serde_json::Value {
        let mut body = json!({
            "username": self.username,
            "email": self.email,
            "password": self.password,
        });
        if let Some(obj) = body.as_object_mut() {
            for (key, value) in [
                ("first_name", &self.first_name),
                ("last_name", &self.last_name),
                ("avatar", &self.avatar),
            ] {
                if let Some(value) = value {
                    obj.insert(key.to_string(), json!(value));
                }
            }
        }
        body
    }

    pub fn login_json(&self) -> serde_json::Value {
        json!({ "email": self.email, "password": self.password })
    }
}

pub fn login_input(email: &str, password: &str) -> LoginInput {
    LoginInput {
        email: email.to_string(),
        password: SecretString::from(password),
    }
}
