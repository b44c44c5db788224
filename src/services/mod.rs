//! External integrations
//!
//! Network access, disk cache, clipboard, logging, terminal modes and time.
//! Everything that touches the outside world lives here.

pub mod cache;
pub mod clipboard;
pub mod github;
pub mod loader;
pub mod log_dirs;
pub mod terminal_modes;
pub mod time_source;
pub mod token;
pub mod tracing_setup;
