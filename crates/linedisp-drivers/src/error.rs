/*!
 * Error types for the linedisp drivers crate.
 */
use std::fmt;

use thiserror::Error;

use linedisp_core::types::OptionError;

use crate::encoding::EncodingError;

/// Error type for driver lookup and display operations
#[derive(Error, Debug)]
pub enum DisplayError {
    /// No driver is registered under the requested name
    #[error("unknown driver {0:?}")]
    DriverNotFound(String),

    /// The display has no open channel
    #[error("the device is not initialized")]
    NotInitialized,

    /// The protocol cannot express the command
    #[error("command {command} is not supported by the protocol")]
    NotSupported {
        /// The command that was requested
        command: &'static str,
    },

    /// The channel accepted fewer bytes than it was given
    #[error("short write: expected {expected} byte(s), channel accepted {actual}")]
    ShortWrite {
        /// Length of the byte sequence handed to the channel
        expected: usize,
        /// Number of bytes the channel reported as written
        actual: usize,
    },

    /// Channel I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Text could not be converted to the display code page
    #[error(transparent)]
    Encoding(#[from] EncodingError),

    /// No protocol is known under the requested name
    #[error("unknown protocol {0:?}")]
    UnknownProtocol(String),

    /// The encoding label does not name a supported code page
    #[error("unknown encoding {0:?}")]
    UnknownEncoding(String),

    /// A required driver option is absent
    #[error("missing required option {0:?}")]
    MissingOption(&'static str),

    /// A driver option has an unusable value
    #[error(transparent)]
    InvalidOption(#[from] OptionError),

    /// Serial port error
    #[cfg(feature = "serial")]
    #[error(transparent)]
    Serial(#[from] serialport::Error),
}

/// Result type for driver and display operations
pub type Result<T> = std::result::Result<T, DisplayError>;

/// A driver registration that can never succeed.
///
/// These are configuration bugs, so [`DriverRegistry::register`] raises them
/// as a panic whose payload is this type rather than returning them. Tests
/// can recover the value with `catch_unwind` and `downcast`.
///
/// [`DriverRegistry::register`]: crate::registry::DriverRegistry::register
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    /// The driver name is empty
    EmptyName,
    /// No driver was supplied for the name
    MissingDriver(String),
    /// The name is already taken
    Duplicate(String),
}

impl fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistrationError::EmptyName => write!(f, "driver name must not be empty"),
            RegistrationError::MissingDriver(name) => {
                write!(f, "no driver supplied for {:?}", name)
            }
            RegistrationError::Duplicate(name) => {
                write!(f, "driver {:?} is already registered", name)
            }
        }
    }
}

impl std::error::Error for RegistrationError {}
