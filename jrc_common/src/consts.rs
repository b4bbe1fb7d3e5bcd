//! System-wide constants for the JRC workspace.
//!
//! Single source of truth for joint count, trajectory limits and default paths.
//! Imported by all crates; never duplicated.

use static_assertions::const_assert_eq;

/// Number of actuated joints on the arm.
pub const NUM_JOINTS: usize = 7;

/// Default arm identifier, used as interface name prefix (`fr3_joint1/position`).
pub const DEFAULT_ARM_ID: &str = "fr3";

/// Maximum joint velocity [rad/s] before speed-factor scaling.
pub const MAX_JOINT_VELOCITY: [f64; NUM_JOINTS] = [2.0, 2.0, 2.0, 2.0, 2.5, 2.5, 2.5];

/// Maximum joint acceleration [rad/s²] at trajectory start, before scaling.
pub const MAX_JOINT_ACCELERATION_START: [f64; NUM_JOINTS] = [5.0; NUM_JOINTS];

/// Maximum joint deceleration [rad/s²] at trajectory end, before scaling.
pub const MAX_JOINT_ACCELERATION_GOAL: [f64; NUM_JOINTS] = [5.0; NUM_JOINTS];

/// Joint offsets below this magnitude [rad] are treated as already reached.
pub const MOTION_FINISHED_EPS: f64 = 1e-6;

/// Default trajectory speed factor.
pub const DEFAULT_SPEED_FACTOR: f64 = 0.2;

/// Smallest accepted speed factor. Scaled limits stay well clear of underflow.
pub const MIN_SPEED_FACTOR: f64 = 1e-3;

/// Default system cycle time in microseconds (1 kHz = 1000 µs).
pub const CYCLE_TIME_US: u64 = 1000;

/// Default simulation config path.
pub const DEFAULT_CONFIG_PATH: &str = "config/jrc_sim.toml";

// Interface slots store f64 values as raw bits in an AtomicU64.
static_assertions::assert_eq_size!(f64, u64);
const_assert_eq!(NUM_JOINTS, 7);
static_assertions::const_assert!(MIN_SPEED_FACTOR > 0.0 && MIN_SPEED_FACTOR < DEFAULT_SPEED_FACTOR);
