/*!
 * linedisp drivers
 *
 * Customer-facing line displays: the command protocols they speak, the
 * transports that reach them and the registry that hands out open displays
 * by driver name.
 */

#![warn(missing_docs)]

// Re-export core types
pub use linedisp_core::prelude;

pub mod display;
pub mod driver;
pub mod encoding;
pub mod error;
pub mod protocol;
pub mod protocols;
pub mod registry;

#[cfg(feature = "serial")]
pub mod serial;

pub use display::{Display, RawChannel};
pub use driver::Driver;
pub use encoding::{CodePage, EncodingError};
pub use error::{DisplayError, RegistrationError, Result};
pub use protocol::{Command, CursorMove, Protocol, ScrollMode};
pub use registry::{DriverRegistry, Handle, SharedDriverRegistry};

/// linedisp drivers crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the driver layer
pub fn init() -> std::result::Result<(), linedisp_core::error::Error> {
    tracing::info!(
        "linedisp drivers {} initialized (drivers: {:?}, protocols: {:?})",
        VERSION,
        available_drivers(),
        protocols::available_protocols()
    );
    Ok(())
}

/// Drivers compiled into this build
pub fn available_drivers() -> Vec<&'static str> {
    #[allow(unused_mut)]
    let mut drivers = Vec::new();

    #[cfg(feature = "serial")]
    drivers.push(serial::NAME);

    drivers
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_matches_available_drivers() {
        let registry = DriverRegistry::with_builtin_drivers();
        assert_eq!(registry.drivers(), available_drivers());
    }

    #[test_log::test]
    fn test_init() {
        assert!(init().is_ok());
        assert!(!VERSION.is_empty());
    }
}
