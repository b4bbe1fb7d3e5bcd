//! Prelude module for common re-exports.
//!
//! ```rust
//! use jrc_common::prelude::*;
//! ```

use std::time::Duration;

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, SharedConfig};

// ─── System Constants ───────────────────────────────────────────────
pub use crate::consts::{CYCLE_TIME_US, DEFAULT_ARM_ID, NUM_JOINTS};

// ─── Lifecycle & Interfaces ─────────────────────────────────────────
pub use crate::controller::ControllerInterface;
pub use crate::hardware::{HardwareError, HardwareInterface};
pub use crate::interface::{
    CommandInterface, InterfaceError, InterfaceKind, InterfaceSlot, StateInterface,
    joint_interface_name,
};
pub use crate::lifecycle::{CallbackReturn, LifecycleState, ReturnType};

/// Default system cycle time as Duration.
pub const DEFAULT_CYCLE_TIME: Duration = Duration::from_micros(CYCLE_TIME_US);
