use std::sync::Once;

static INIT: Once = Once::new();

/// Print `RUST_LOG`-selected events from the crate while a test runs
///
/// Events go to the test's captured stdout; the HTTP and TLS stacks stay at
/// info so mock-server traffic does not drown the viewer's own logs.
pub fn init_tracing_from_env() {
    INIT.call_once(|| {
        let mut filter = tracing_subscriber::EnvFilter::from_default_env();
        for quiet in ["ureq=info", "rustls=info"] {
            if let Ok(directive) = quiet.parse() {
                filter = filter.add_directive(directive);
            }
        }
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}
