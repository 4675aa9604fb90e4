//! Logging setup using `tracing-subscriber`.
//!
//! # Log Levels
//!
//! - `warn` (default): failed actions, discarded responses
//! - `info` (`-v`): phase changes, request and transform counts
//! - `debug` (`-vv`): per-action details, prompt sizes
//! - `trace` (`-vvv`): cell values and full prompts
//!
//! `RUST_LOG` overrides the level derived from `-v`.

use std::io;

use tracing::Level;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Configuration for logging behavior.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Log level for colmap crates.
    pub level: Level,
    /// Whether to include target (module path) in log output.
    pub with_target: bool,
    /// Whether to use ANSI colors in output.
    pub with_ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            with_target: false,
            with_ansi: true,
        }
    }
}

impl LogConfig {
    /// Create a `LogConfig` from CLI verbosity count.
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            with_target: verbosity > 1,
            ..Default::default()
        }
    }
}

/// Install the global subscriber, writing to stderr.
///
/// Does nothing if a subscriber is already installed.
pub fn init_logging(config: &LogConfig) {
    let layer = fmt::layer()
        .with_writer(io::stderr)
        .with_ansi(config.with_ansi)
        .with_target(config.with_target)
        .without_time();

    let _ = tracing_subscriber::registry()
        .with(build_env_filter(config.level))
        .with(layer)
        .try_init();
}

/// Build an `EnvFilter` from the given level, respecting `RUST_LOG`.
fn build_env_filter(level: Level) -> EnvFilter {
    let level_str = level.as_str().to_lowercase();

    // External crates stay at warn level to reduce noise
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,colmap={level},colmap_cli={level}",
            level = level_str
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(LogConfig::from_verbosity(0).level, Level::WARN);
        assert_eq!(LogConfig::from_verbosity(1).level, Level::INFO);
        assert_eq!(LogConfig::from_verbosity(2).level, Level::DEBUG);
        assert_eq!(LogConfig::from_verbosity(7).level, Level::TRACE);
    }
}
