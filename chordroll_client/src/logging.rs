// Tracing setup for the CLI.
//
// Logs go to stderr so stdout carries only the rendered roll (or JSON). The
// configured level is the default directive; `RUST_LOG` takes precedence
// when set. An unparseable level falls back to `info`.

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

/// Parse a level name, defaulting to INFO.
pub fn parse_level(level: &str) -> LevelFilter {
    level.trim().parse().unwrap_or(LevelFilter::INFO)
}

/// Install the global subscriber. Calling this twice is harmless: the second
/// call leaves the first subscriber in place.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::builder()
        .with_default_directive(parse_level(level).into())
        .from_env_lossy();

    let installed = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(filter)
        .try_init();

    if installed.is_ok() {
        tracing::debug!(level, "logging initialized");
    }
}
