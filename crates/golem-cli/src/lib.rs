use tracing_subscriber::EnvFilter;

/// Installs the stderr `fmt` subscriber shared by both binaries. The level
/// comes from `RUST_LOG`, falling back to `warn`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
