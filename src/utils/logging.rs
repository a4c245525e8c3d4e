//! Structured logging configuration.
//!
//! Thin wrapper over `tracing-subscriber` so embedding processes get the
//! same log shape everywhere. Honors `RUST_LOG` when set.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Install a global subscriber at the given default level.
///
/// Safe to call more than once; subsequent calls are no-ops.
pub fn init_logging(default_level: Level) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_init_is_safe() {
        init_logging(Level::DEBUG);
        init_logging(Level::INFO);
    }
}

