//! Tracing subscriber setup

use grabbi_domain::{LogFormat, LoggingConfig};
use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber.
///
/// `RUST_LOG` takes precedence over the configured level. Returns `false`
/// when a global subscriber was already installed, in which case nothing
/// changes.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    let filter = build_filter(config);

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false);

    let installed = match config.format {
        LogFormat::Json => subscriber.json().try_init().is_ok(),
        LogFormat::Text => subscriber.try_init().is_ok(),
    };

    if installed {
        tracing::debug!(level = %config.level, format = %config.format, "Tracing initialised");
    }
    installed
}

fn build_filter(config: &LoggingConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new("info"))
    })
}
