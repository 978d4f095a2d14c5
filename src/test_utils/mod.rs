//! Test utilities for tera-encore
//!
//! Helpers shared by unit and integration tests: logging setup and a
//! temporary project with built assets and templates.
//!
//! ```rust,no_run
//! use tera_encore::test_utils::TestProject;
//!
//! let project = TestProject::new().unwrap();
//! project.template("index.html", r#"{{ asset(key="website.css") }}"#).unwrap();
//! let engine = project.engine().unwrap();
//! ```

pub mod project;

pub use project::{ENTRYPOINTS_JSON, MANIFEST_JSON, TestProject};

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, `RUST_LOG` otherwise; logs nothing if neither is
/// set. Only the first call has an effect.
///
/// ```bash
/// RUST_LOG=tera_encore=trace cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .with_ansi(true)
            .try_init();
    });
}
