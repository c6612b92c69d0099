//! Auth Service Library
//!
//! Credential issuance for Parley: user signup and login, bcrypt password
//! hashing, and HS256 token issuance.
//!
//! # Modules
//!
//! - `config` - Service configuration
//! - `crypto` - Password hashing and token signing
//! - `errors` - Error types
//! - `handlers` - HTTP request handlers
//! - `middleware` - HTTP metrics middleware
//! - `models` - Data models
//! - `observability` - Metrics and log correlation
//! - `repositories` - User store implementations
//! - `routes` - Router and application state
//! - `services` - Signup and login orchestration

pub mod config;
pub mod crypto;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod repositories;
pub mod routes;
pub mod services;
