/*!
 * Protocol implementations for linedisp.
 *
 * This module contains the built-in controller command sets and a lookup by
 * name for configuration driven opening.
 */
use std::sync::Arc;

use crate::protocol::Protocol;

pub mod firich;

// Re-export specific protocol implementations for convenience
pub use firich::FirichProtocol;

/// Names of the built-in protocols, sorted
pub fn available_protocols() -> Vec<&'static str> {
    vec![firich::NAME]
}

/// Looks up a built-in protocol by name (case-insensitive)
pub fn lookup(name: &str) -> Option<Arc<dyn Protocol>> {
    match name.trim().to_ascii_lowercase().as_str() {
        firich::NAME => Some(Arc::new(FirichProtocol)),
        _ => None,
    }
}
