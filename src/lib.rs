// repotree library - exposes every module for the binary and for tests

// Tree model, display state and configuration need no runtime dependencies
pub mod config;
pub mod model;
pub mod view;

#[cfg(feature = "runtime")]
pub mod app;
#[cfg(feature = "runtime")]
pub mod config_io;
#[cfg(feature = "runtime")]
pub mod services;
#[cfg(feature = "runtime")]
pub mod ui;
