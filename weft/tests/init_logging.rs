//! One-time tracing init for integration tests; include with `mod init_logging;`.

use tracing_subscriber::EnvFilter;

#[ctor::ctor]
fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}
