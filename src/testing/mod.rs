//! Shared test support for the harness's own test suites.

pub mod mock;

pub use mock::MockOrchestrator;

/// Initialize tracing output for integration tests.
///
/// Safe to call from every test; only the first call installs the
/// subscriber.
pub fn init_logging() {
    use std::sync::Once;

    static INIT: Once = Once::new();
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}
