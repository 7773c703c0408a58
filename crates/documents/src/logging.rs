//! Log output for the fail-soft storage overloads.
//!
//! Storage failures that are swallowed are reported through `tracing`
//! events. Nothing is printed until a subscriber is installed; [`init`]
//! installs one writing to stderr.

use tracing_subscriber::EnvFilter;

/// Installs a stderr `fmt` subscriber filtered by `RUST_LOG` (default
/// `warn`). Calling it again, or after another subscriber was installed, is
/// a no-op.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
