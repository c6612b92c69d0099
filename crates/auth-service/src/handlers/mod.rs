//! HTTP request handlers.

pub mod auth_handler;
pub mod health;
pub mod metrics;

pub use auth_handler::{handle_login, handle_signup};
pub use health::health_check;
pub use metrics::metrics_handler;
