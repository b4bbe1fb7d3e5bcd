//! JRC Common Library
//!
//! Shared constants, interface handles and host-facing traits for all JRC
//! workspace crates.
//!
//! # Module Structure
//!
//! - [`consts`] - Joint count, trajectory limits and default paths
//! - [`config`] - Configuration loading traits and types
//! - [`lifecycle`] - Controller lifecycle states and callback return codes
//! - [`interface`] - Host-owned interface slots and the loans handed to controllers
//! - [`controller`] - `ControllerInterface` trait implemented by controllers
//! - [`hardware`] - `HardwareInterface` trait implemented by hardware backends
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use jrc_common::prelude::*;
//!
//! let slot = InterfaceSlot::new(joint_interface_name("fr3", 1, InterfaceKind::Position));
//! let state = StateInterface::new(slot.clone());
//! slot.set(0.25);
//! assert_eq!(state.get_value().unwrap(), 0.25);
//! ```

pub mod config;
pub mod consts;
pub mod controller;
pub mod hardware;
pub mod interface;
pub mod lifecycle;
pub mod prelude;
