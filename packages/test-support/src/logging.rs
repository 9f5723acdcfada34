//! Test logging shared by unit and integration suites.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, EnvFilter};

static INITIALIZED: OnceCell<()> = OnceCell::new();

const QUIET_FILTER: &str = "warn,sqlx=error";

fn filter_directive(test_log: Option<String>, rust_log: Option<String>) -> String {
    test_log
        .or(rust_log)
        .unwrap_or_else(|| QUIET_FILTER.to_string())
}

/// Install a test-writer subscriber once per process.
///
/// `TEST_LOG` wins over `RUST_LOG`; with neither set only warnings show.
/// Safe to call from every test.
pub fn init() {
    INITIALIZED.get_or_init(|| {
        let directive = filter_directive(
            std::env::var("TEST_LOG").ok(),
            std::env::var("RUST_LOG").ok(),
        );

        fmt()
            .with_env_filter(EnvFilter::new(directive))
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}
