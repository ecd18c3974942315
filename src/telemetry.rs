//! Logging setup for the binaries.

use {
    tracing::Level,
    tracing_subscriber::{EnvFilter, fmt, prelude::*},
};

/// Install a global subscriber writing to stderr. `RUST_LOG` wins over
/// `level`. Calling it twice is harmless.
pub fn init_tracing(json: bool, level: Level) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let layer = fmt::layer().with_target(false).with_writer(std::io::stderr);
    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.json())
            .try_init()
            .ok();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer)
            .try_init()
            .ok();
    }
}
