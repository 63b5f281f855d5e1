/*!
 * Driver trait.
 *
 * A driver knows how to acquire one kind of transport and hand back an open
 * [`Display`] speaking the caller's protocol over it.
 */
use std::fmt::Debug;
use std::sync::Arc;

use linedisp_core::types::DriverConfig;

use crate::display::Display;
use crate::error::Result;
use crate::protocol::Protocol;

/// Factory for open displays
pub trait Driver: Send + Sync + Debug {
    /// Resolve transport settings from `config`, acquire the channel and
    /// return a display that is already open.
    ///
    /// Failures to acquire the channel are returned as-is and no display is
    /// produced.
    fn get_display(&self, protocol: Arc<dyn Protocol>, config: &DriverConfig) -> Result<Display>;
}
