//! Hardware backend trait and error types.
//!
//! Hardware backends (simulation, real drives) own the interface slots and
//! exchange values with the physical (or simulated) joints once per cycle:
//! `read()` before the controllers run, `write()` after.

use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::interface::InterfaceSlot;

/// Error types for hardware operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HardwareError {
    /// Backend configuration is invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Communication with a joint failed or produced an unusable value.
    #[error("Hardware communication error: {0}")]
    Communication(String),
}

/// Trait defining the interface for hardware backends.
///
/// # Lifecycle
///
/// 1. `export_*_interfaces()` - Called once by the host to build its registry
/// 2. `read()` - Every cycle, publishes joint state into state slots
/// 3. `write()` - Every cycle, consumes command slots
pub trait HardwareInterface: Send {
    /// Returns the backend's identifier (e.g., "simulation").
    fn name(&self) -> &'static str;

    /// State slots exported by this backend.
    fn export_state_interfaces(&self) -> Vec<Arc<InterfaceSlot>>;

    /// Command slots exported by this backend.
    fn export_command_interfaces(&self) -> Vec<Arc<InterfaceSlot>>;

    /// Publish the current joint state.
    fn read(&mut self, time: Duration, period: Duration) -> Result<(), HardwareError>;

    /// Apply the current commands for one period.
    fn write(&mut self, time: Duration, period: Duration) -> Result<(), HardwareError>;
}
