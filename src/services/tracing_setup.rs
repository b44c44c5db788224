//! Tracing subscriber setup
//!
//! Logs go to a file so they never draw over the terminal UI. The same
//! subscriber configuration is used by the binary and by tests.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize the global tracing subscriber writing to `log_file_path`.
///
/// Filtering follows `RUST_LOG`, with DEBUG as the default level.
/// Returns false if the log file could not be created; the viewer then
/// runs without logging.
pub fn init_global(log_file_path: &Path) -> bool {
    let Ok(log_file) = File::create(log_file_path) else {
        return false;
    };

    build_subscriber(log_file).init();
    true
}

/// Build a subscriber that writes formatted events to `log_file`.
pub fn build_subscriber(log_file: File) -> impl tracing::Subscriber + Send + Sync {
    let env_filter = EnvFilter::from_default_env()
        .add_directive(tracing::Level::DEBUG.into())
        // rustls and ureq are chatty at debug level
        .add_directive("rustls=info".parse().expect("static directive"))
        .add_directive("ureq=info".parse().expect("static directive"));

    let fmt_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry().with(fmt_layer).with(env_filter)
}
