/*!
 * linedisp core
 *
 * This crate provides the pieces shared by every linedisp crate:
 * option values, configuration loading, logging setup and the core error type.
 */

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod logging;
pub mod prelude;
pub mod types;

/// linedisp core crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library initialization
pub fn init() -> Result<(), error::Error> {
    logging::init()?;
    tracing::info!("linedisp core {} initialized", VERSION);
    Ok(())
}
