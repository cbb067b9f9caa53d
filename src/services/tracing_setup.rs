//! Diagnostic logging for the viewer binary
//!
//! The terminal belongs to the UI, so log output goes to a file. `RUST_LOG`
//! overrides the default `xmlview=info` filter.

use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when `RUST_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "xmlview=info";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
}

/// Install a global subscriber writing to `log_file`.
///
/// Logging is skipped when the file can't be created; a subscriber that is
/// already installed is left in place.
pub fn init_file_logging(log_file: &Path) -> bool {
    let Ok(file) = std::fs::File::create(log_file) else {
        return false;
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(Arc::new(file)).with_ansi(false))
        .with(env_filter())
        .try_init()
        .is_ok()
}

/// Install a global subscriber writing to stderr, for non-interactive runs
pub fn init_stderr_logging() -> bool {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(env_filter())
        .try_init()
        .is_ok()
}
