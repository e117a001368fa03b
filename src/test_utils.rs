//! Test helpers: logging initialisation and assertion macros.
//!
//! Available to unit tests and, with the `test-internals` feature, to
//! integration tests. Not for production use.
//!
//! ```ignore
//! fn init_test(name: &str) {
//!     asupersync_authctx::test_utils::init_test_logging();
//!     asupersync_authctx::test_phase!(name);
//! }
//! ```

use std::sync::Once;

static INIT_LOGGING: Once = Once::new();

/// Installs a test-friendly tracing subscriber exactly once per process.
///
/// Honors `RUST_LOG`; defaults to `trace` for this crate so that comparator
/// and extension events show up in failing test output.
pub fn init_test_logging() {
    INIT_LOGGING.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("asupersync_authctx=trace"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Marks the start of a test.
#[macro_export]
macro_rules! test_phase {
    ($name:expr) => {
        ::tracing::info!(test = %$name, "========== TEST START ==========");
    };
}

/// Marks a section inside a test.
#[macro_export]
macro_rules! test_section {
    ($name:expr) => {
        ::tracing::debug!(section = %$name, "---------- section ----------");
    };
}

/// Asserts a condition, logging expected and actual values first.
#[macro_export]
macro_rules! assert_with_log {
    ($cond:expr, $msg:expr, $expected:expr, $actual:expr) => {{
        let cond = $cond;
        ::tracing::debug!(
            passed = cond,
            expected = ?$expected,
            actual = ?$actual,
            "assert: {}",
            $msg
        );
        assert!(
            cond,
            "{}: expected {:?}, got {:?}",
            $msg,
            $expected,
            $actual
        );
    }};
}

/// Marks the successful end of a test.
#[macro_export]
macro_rules! test_complete {
    ($name:expr) => {
        ::tracing::info!(test = %$name, "========== TEST PASSED ==========");
    };
}
