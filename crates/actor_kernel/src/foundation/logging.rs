//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace, LevelFilter};

/// Initialize the logging system from the `RUST_LOG` environment variable
pub fn init() {
    // A second initialization (tests, embedding apps) is not an error for us
    let _ = env_logger::try_init();
}

/// Initialize the logging system with a default level.
///
/// `RUST_LOG` still overrides `level` when set.
pub fn init_with_level(level: LevelFilter) {
    let _ = env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .try_init();
}

/// Parse a textual level ("error", "warn", "info", "debug", "trace", "off")
///
/// Unknown strings fall back to [`LevelFilter::Info`].
pub fn parse_level(level: &str) -> LevelFilter {
    level.parse().unwrap_or(LevelFilter::Info)
}
