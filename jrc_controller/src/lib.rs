//! # JRC Controller Library
//!
//! Joint return ("move to start") controller for a 7-joint arm. Drives every
//! joint from the pose measured at activation to a configured start pose
//! along a synchronized trajectory, using a per-joint PD law:
//!
//! ```text
//! command_i = K_i · (q_d,i(t) − q_i) − D_i · dq_i
//! ```
//!
//! ## Layers
//!
//! 1. **config**: parameter deserialization and eager validation
//! 2. **state**: Unconfigured → Inactive → Active lifecycle FSM
//! 3. **control**: PD law and synchronized trajectory, pure functions
//! 4. **controller**: [`JointReturnController`], binds host interfaces and
//!    runs one cycle per `update`
//!
//! ## Zero-Allocation Update
//!
//! Interface handles are bound into fixed-capacity storage at activation.
//! `update` performs no heap allocation and no blocking.

pub mod config;
pub mod control;
pub mod controller;
pub mod error;
pub mod state;

pub use config::{ControllerConfig, ControllerParams};
pub use controller::JointReturnController;
pub use error::{ActivationError, ConfigurationError, CycleError, LifecycleError};
