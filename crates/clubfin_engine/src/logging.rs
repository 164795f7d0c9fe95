//! Logging initialization for the engine's composition root

use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging to stderr.
///
/// The filter defaults to `clubfin_engine=<level>,clubfin_core=warn` and can
/// be overridden with the `RUST_LOG` environment variable. Call once from
/// the process that owns the engine handle.
pub fn init_logging(level: &str) -> Result<(), TryInitError> {
    let default_filter = format!("clubfin_engine={level},clubfin_core=warn");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .with_target(true),
        )
        .try_init()?;

    tracing::info!("clubfin logging initialized");
    Ok(())
}
