//! Metrics definitions for the auth service
//!
//! All metrics follow Prometheus naming conventions:
//! - `auth_` prefix
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Cardinality
//!
//! Labels are bounded to prevent cardinality explosion:
//! - `operation`: signup, login (auth) or hash, verify (credential hashing)
//! - `status`: success or one of [`crate::errors::AuthError::metric_status`]
//! - `path`: the fixed route table, anything else collapses to `other`

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;

/// Initialize Prometheus metrics recorder and return the handle
/// for serving metrics via HTTP.
///
/// Must be called before any metrics are recorded. Credential hashing
/// buckets are coarse (25ms minimum) so the histogram cannot be used to
/// distinguish individual verifications.
///
/// # Errors
///
/// Returns error if Prometheus recorder fails to install (e.g., already installed).
pub fn init_metrics_recorder() -> Result<PrometheusHandle, String> {
    PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Prefix("auth_http_request".to_string()),
            &[
                0.005, 0.010, 0.025, 0.050, 0.100, 0.200, 0.300, 0.500, 1.000, 2.000,
            ],
        )
        .map_err(|e| format!("Failed to set HTTP request buckets: {e}"))?
        .set_buckets_for_metric(
            Matcher::Full("auth_operation_duration_seconds".to_string()),
            &[0.010, 0.025, 0.050, 0.100, 0.200, 0.350, 0.500, 1.000, 2.000],
        )
        .map_err(|e| format!("Failed to set auth operation buckets: {e}"))?
        .set_buckets_for_metric(
            Matcher::Full("auth_credential_hash_duration_seconds".to_string()),
            &[0.025, 0.050, 0.100, 0.250, 0.500, 1.000, 2.000],
        )
        .map_err(|e| format!("Failed to set credential hash buckets: {e}"))?
        .install_recorder()
        .map_err(|e| format!("Failed to install Prometheus recorder: {e}"))
}

// ============================================================================
// Auth Operation Metrics
// ============================================================================

/// Record the outcome and duration of a signup or login.
///
/// Metric: `auth_signup_total` / `auth_login_total`, `auth_operation_duration_seconds`
/// Labels: `status` (counters), `operation` and `status` (histogram)
pub fn record_auth_operation(operation: &'static str, status: &'static str, duration: Duration) {
    histogram!("auth_operation_duration_seconds", "operation" => operation, "status" => status)
        .record(duration.as_secs_f64());

    match operation {
        "signup" => counter!("auth_signup_total", "status" => status).increment(1),
        "login" => counter!("auth_login_total", "status" => status).increment(1),
        _ => {}
    }
}

// ============================================================================
// Crypto Metrics
// ============================================================================

/// Record credential hasher duration
///
/// Metric: `auth_credential_hash_duration_seconds`
/// Labels: `operation` (hash, verify)
pub fn record_credential_hash(operation: &'static str, duration: Duration) {
    histogram!("auth_credential_hash_duration_seconds", "operation" => operation)
        .record(duration.as_secs_f64());
}

// ============================================================================
// HTTP Metrics
// ============================================================================

/// Record HTTP request completion
///
/// Metric: `auth_http_requests_total`, `auth_http_request_duration_seconds`
/// Labels: `method`, `path`, `status_code`
///
/// Captures framework-level rejections too (415, 422 on bad JSON, 404, 405).
pub fn record_http_request(method: &str, path: &str, status_code: u16, duration: Duration) {
    let normalized_path = normalize_path(path);

    histogram!("auth_http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => normalized_path,
        "status_code" => status_code.to_string()
    )
    .record(duration.as_secs_f64());

    counter!("auth_http_requests_total",
        "method" => method.to_string(),
        "path" => normalized_path,
        "status_code" => status_code.to_string()
    )
    .increment(1);
}

/// Map a request path onto the fixed route table.
fn normalize_path(path: &str) -> &'static str {
    match path {
        "/health" => "/health",
        "/metrics" => "/metrics",
        "/api/v1/auth/signup" => "/api/v1/auth/signup",
        "/api/v1/auth/login" => "/api/v1/auth/login",
        _ => "other",
    }
}
