//! Liveness probe.

/// Returns "OK" while the process can serve requests. Does not check the
/// user store.
pub async fn health_check() -> &'static str {
    "OK"
}
