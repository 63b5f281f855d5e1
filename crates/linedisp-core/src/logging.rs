/*!
 * Logging setup for linedisp.
 *
 * The library crates only emit `tracing` events; applications call one of the
 * initializers here to install a subscriber.
 */
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::LoggingConfig;
use crate::error::{Error, Result};

/// Initialize the logging system with default configuration
pub fn init() -> Result<()> {
    init_with_filter("info")
}

/// Initialize the logging system with a specific filter
///
/// `RUST_LOG` takes precedence over `filter` when it is set.
///
/// # Arguments
///
/// * `filter` - The log filter string (e.g., "info", "debug", "linedisp_drivers=trace")
pub fn init_with_filter(filter: &str) -> Result<()> {
    install(filter, true)
}

/// Initialize the logging system from a loaded configuration section
pub fn init_from_config(config: &LoggingConfig) -> Result<()> {
    install(&config.level, config.with_target)
}

fn install(filter: &str, with_target: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(with_target))
        .with(filter)
        .try_init()
        .map_err(|e| Error::runtime(format!("Failed to initialize logging: {}", e)))?;

    Ok(())
}

/// A type alias for a tracing span
pub type Span = tracing::Span;

/// Create a span for one display instance
///
/// # Arguments
///
/// * `driver` - The driver the display was opened through
/// * `protocol` - The protocol the display speaks
pub fn display_span(driver: &str, protocol: &str) -> Span {
    tracing::debug_span!("display", driver = %driver, protocol = %protocol)
}
