use std::sync::Once;

static INIT: Once = Once::new();

/// Install a test subscriber once per test binary. `RUST_LOG` filters as
/// usual; output only shows for failing tests.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    });
}
