/*!
 * Prelude module for linedisp core.
 *
 * This module re-exports commonly used types so they can be imported at once.
 */

// Re-export error types
pub use crate::error::{Error, Result};

// Re-export core types
pub use crate::types::{DriverConfig, OptionError, Value};

// Re-export config types
pub use crate::config::{Config, ConfigBuilder, DisplayConfig, LoggingConfig};

// Re-export logging macros
pub use tracing::{debug, error, info, trace, warn};

// Re-export core initialization
pub use crate::init;
