//! Controller error taxonomy.
//!
//! Every failure is returned to the host; none is fatal inside the controller.
//! Whether to retry, stop the loop or reconfigure is host policy.

use jrc_common::consts::MIN_SPEED_FACTOR;
use jrc_common::interface::InterfaceError;
use jrc_common::lifecycle::LifecycleState;
use thiserror::Error;

/// Configure rejected. The previous configuration is left untouched.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error("{0} parameter not set")]
    MissingParameter(&'static str),

    #[error("{name} should be of size {expected} but is of size {actual}")]
    WrongLength {
        name: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("{name}[{index}] is not finite")]
    NonFinite { name: &'static str, index: usize },

    #[error("{name}[{index}] = {value} is negative")]
    NegativeGain {
        name: &'static str,
        index: usize,
        value: f64,
    },

    #[error("speed_factor {0} out of range [{min}, 1]", min = MIN_SPEED_FACTOR)]
    InvalidSpeedFactor(f64),

    #[error("velocity_filter_alpha {0} out of range (0, 1]")]
    InvalidFilterAlpha(f64),

    #[error("arm_id cannot be empty")]
    EmptyArmId,

    /// Parameter table could not be deserialized.
    #[error("invalid parameters: {0}")]
    Parse(String),

    #[error("cannot configure while {0}")]
    InvalidState(LifecycleState),
}

/// Activate rejected. The controller stays in its previous state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActivationError {
    #[error("controller is not configured")]
    NotConfigured,

    #[error("controller is already active")]
    AlreadyActive,

    #[error("missing command interface '{0}'")]
    MissingCommandInterface(String),

    #[error("missing state interface '{0}'")]
    MissingStateInterface(String),

    /// Initial joint positions could not be read.
    #[error("failed to read start pose: {0}")]
    StateRead(InterfaceError),

    #[error("state interface '{0}' returned a non-finite start position")]
    NonFiniteStartPose(String),

    /// Planned start-pose trajectory never reaches the goal.
    #[error("start-pose trajectory has no finite duration")]
    InfeasibleTrajectory,
}

/// A single control cycle failed. No retry is attempted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CycleError {
    #[error("update called while {0}")]
    NotActive(LifecycleState),

    #[error("state read failed: {0}")]
    StateRead(InterfaceError),

    #[error("state interface '{name}' returned non-finite value {value}")]
    NonFiniteState { name: String, value: f64 },

    #[error("command write failed: {0}")]
    CommandWrite(InterfaceError),
}

/// Deactivate or cleanup requested from a state that does not allow it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transition rejected in state {from}: {reason}")]
pub struct LifecycleError {
    pub from: LifecycleState,
    pub reason: &'static str,
}
