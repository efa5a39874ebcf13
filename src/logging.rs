//! Diagnostics for the runner.
//!
//! The container crate logs through the `log` facade; those records are
//! forwarded into `tracing` so one subscriber prints both.

use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Maps the `-v` count to a default filter directive.
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Installs the stderr subscriber. `RUST_LOG` overrides the verbosity level.
///
/// Calling this more than once is harmless; later calls are ignored.
pub fn init_logging(verbosity: u8) {
    LOGGER_INITIALIZED.get_or_init(|| {
        tracing_log::LogTracer::init().ok();

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_writer(std::io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .ok();
    });
}
