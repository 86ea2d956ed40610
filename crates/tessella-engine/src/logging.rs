//! Process-wide `tracing` subscriber setup.
//!
//! Libraries only emit events; binaries and tests call [`init`] once to
//! print them. The `RUST_LOG` environment variable refines the default
//! directive, e.g. `RUST_LOG=tessella_cells=debug`.

use tracing_subscriber::EnvFilter;

/// Install a formatting subscriber filtered by `RUST_LOG` plus
/// `default_directive` (e.g. `"info"`).
///
/// Returns `false` if the directive does not parse or a global
/// subscriber is already installed. Calling it twice is harmless.
pub fn init(default_directive: &str) -> bool {
    let Ok(directive) = default_directive.parse() else {
        return false;
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(directive))
        .try_init()
        .is_ok()
}

/// Like [`init`], but writes through the test harness's captured output.
pub fn init_for_tests() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
