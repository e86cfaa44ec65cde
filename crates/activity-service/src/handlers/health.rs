//! Liveness probe handler.

/// Liveness probe handler.
///
/// Returns a plain "OK" while the process is serving requests. The catalog
/// is in memory, so there are no dependencies to check.
pub async fn health_check() -> &'static str {
    "OK"
}
