//! Logging initialization for the CLI.
//!
//! Library code emits `tracing` events; the binary installs a subscriber that
//! writes them to stderr, keeping stdout for command output.

use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Install the global subscriber.
///
/// `RUST_LOG` takes precedence. Otherwise the level is `warn`, or `debug`
/// with `verbose`.
pub fn init(verbose: bool) {
    let default_level = if verbose { "imgstamp=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}
