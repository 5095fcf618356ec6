//! Policy for suites that cannot start embedded PostgreSQL.
//!
//! Bootstrap failures skip the calling test by default. CI sets
//! `REQUIRE_TEST_CLUSTER=1` so a broken cluster fails loudly instead.

/// True when `REQUIRE_TEST_CLUSTER` is `1`, `true`, or `yes`.
pub fn cluster_required() -> bool {
    std::env::var("REQUIRE_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Print a skip marker and return `None`, or panic when the cluster is
/// required.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if cluster_required() {
        panic!("test cluster setup failed: {reason}");
    }
    eprintln!("SKIP-TEST-CLUSTER: {reason}");
    None
}
