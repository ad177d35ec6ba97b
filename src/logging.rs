//! Tracing initialization.

use std::sync::Once;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

static INIT: Once = Once::new();

/// Environment variable holding a per-module filter, e.g.
/// `CALLSCAN_LOG=callscan::frontend=debug`.
pub const LOG_ENV: &str = "CALLSCAN_LOG";

/// Initialize logging to stderr so stdout carries only CSV.
///
/// `default_level` is used when `CALLSCAN_LOG` is unset or invalid.
/// Calling this more than once is a no-op.
pub fn init_tracing(default_level: &str) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_new(default_level))
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .without_time(),
            )
            .with(filter)
            .init();
    });
}
