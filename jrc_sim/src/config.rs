//! Simulation configuration (`jrc_sim.toml`).
//!
//! Three sections: `[shared]` (logging and service name), `[simulation]`
//! (arm model and run length) and `[controller]`, which is passed verbatim to
//! the controller as its named parameters.

use jrc_common::config::{ConfigError, SharedConfig};
use jrc_common::consts::{CYCLE_TIME_US, DEFAULT_ARM_ID, NUM_JOINTS};
use jrc_common::interface::InterfaceKind;
use serde::{Deserialize, Serialize};

/// Complete simulation config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimConfig {
    pub shared: SharedConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Controller parameters, validated by the controller on configure.
    #[serde(default)]
    pub controller: toml::Table,
}

impl SimConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.shared.validate()?;
        self.simulation.validate()
    }
}

fn default_cycle_time_us() -> u64 {
    CYCLE_TIME_US
}

fn default_cycles() -> u64 {
    8000
}

fn default_arm_id() -> String {
    DEFAULT_ARM_ID.to_string()
}

fn default_inertia() -> [f64; NUM_JOINTS] {
    [0.5, 0.5, 0.5, 0.5, 0.2, 0.1, 0.05]
}

fn default_damping() -> [f64; NUM_JOINTS] {
    [0.1, 0.1, 0.1, 0.1, 0.05, 0.05, 0.02]
}

fn default_command_interface() -> InterfaceKind {
    InterfaceKind::Effort
}

/// Simulated arm and run parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationConfig {
    /// Cycle period [µs].
    #[serde(default = "default_cycle_time_us")]
    pub cycle_time_us: u64,
    /// Number of cycles to run.
    #[serde(default = "default_cycles")]
    pub cycles: u64,
    /// Interface name prefix exported by the arm.
    #[serde(default = "default_arm_id")]
    pub arm_id: String,
    /// Joint positions at t = 0 [rad].
    #[serde(default)]
    pub initial_positions: [f64; NUM_JOINTS],
    /// Joint inertia [kg·m²]. Must be > 0.
    #[serde(default = "default_inertia")]
    pub inertia: [f64; NUM_JOINTS],
    /// Viscous damping [1/s]. Must be ≥ 0.
    #[serde(default = "default_damping")]
    pub damping: [f64; NUM_JOINTS],
    /// Kind of command interface the arm exports.
    #[serde(default = "default_command_interface")]
    pub command_interface: InterfaceKind,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            cycle_time_us: default_cycle_time_us(),
            cycles: default_cycles(),
            arm_id: default_arm_id(),
            initial_positions: [0.0; NUM_JOINTS],
            inertia: default_inertia(),
            damping: default_damping(),
            command_interface: default_command_interface(),
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cycle_time_us == 0 {
            return Err(invalid("cycle_time_us must be > 0"));
        }
        if self.arm_id.trim().is_empty() {
            return Err(invalid("arm_id cannot be empty"));
        }
        for j in 0..NUM_JOINTS {
            if !self.initial_positions[j].is_finite() {
                return Err(invalid(format!("initial_positions[{j}] is not finite")));
            }
            if !(self.inertia[j].is_finite() && self.inertia[j] > 0.0) {
                return Err(invalid(format!(
                    "inertia[{j}] = {} must be finite and > 0",
                    self.inertia[j]
                )));
            }
            if !(self.damping[j].is_finite() && self.damping[j] >= 0.0) {
                return Err(invalid(format!(
                    "damping[{j}] = {} must be finite and >= 0",
                    self.damping[j]
                )));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn cycle_time_s(&self) -> f64 {
        self.cycle_time_us as f64 * 1e-6
    }
}

fn invalid(msg: impl Into<String>) -> ConfigError {
    ConfigError::ValidationError(msg.into())
}

// ─── Tests ──────────────────────────────────────────────────────────
