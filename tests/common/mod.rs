// Common test utilities

#[allow(dead_code)]
pub mod harness;
#[allow(dead_code)]
pub mod mock_github;
#[allow(dead_code)]
pub mod tracing;
