//! Controller parameters: deserialization and eager validation.
//!
//! Hosts pass named parameters as a TOML table. [`ControllerParams`] mirrors
//! that table one-to-one; [`ControllerParams::validate`] turns it into a
//! fixed-size [`ControllerConfig`] or rejects it as a whole.
//!
//! # TOML Example
//!
//! ```toml
//! arm_id = "fr3"
//! k_gains = [600.0, 600.0, 600.0, 600.0, 250.0, 150.0, 50.0]
//! d_gains = [30.0, 30.0, 30.0, 30.0, 10.0, 10.0, 5.0]
//! q_goal = [0.0, -0.785, 0.0, -2.356, 0.0, 1.571, 0.785]
//! speed_factor = 0.2
//! command_interface = "effort"
//! ```

use jrc_common::consts::{DEFAULT_ARM_ID, DEFAULT_SPEED_FACTOR, MIN_SPEED_FACTOR, NUM_JOINTS};
use jrc_common::interface::{InterfaceKind, joint_interface_name};
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

fn default_arm_id() -> String {
    DEFAULT_ARM_ID.to_string()
}

fn default_speed_factor() -> f64 {
    DEFAULT_SPEED_FACTOR
}

fn default_filter_alpha() -> f64 {
    1.0
}

/// Raw controller parameters as supplied by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ControllerParams {
    /// Interface name prefix.
    #[serde(default = "default_arm_id")]
    pub arm_id: String,
    /// Proportional gains, one per joint. Required.
    #[serde(default)]
    pub k_gains: Option<Vec<f64>>,
    /// Damping gains, one per joint. Required.
    #[serde(default)]
    pub d_gains: Option<Vec<f64>>,
    /// Start pose [rad]. All zeros when absent.
    #[serde(default)]
    pub q_goal: Option<Vec<f64>>,
    /// Trajectory velocity/acceleration scale, (0, 1].
    #[serde(default = "default_speed_factor")]
    pub speed_factor: f64,
    /// Kind of the per-joint command interface.
    #[serde(default)]
    pub command_interface: InterfaceKind,
    /// Measured-velocity filter weight, (0, 1]. 1.0 = unfiltered.
    #[serde(default = "default_filter_alpha")]
    pub velocity_filter_alpha: f64,
}

impl Default for ControllerParams {
    fn default() -> Self {
        Self {
            arm_id: default_arm_id(),
            k_gains: None,
            d_gains: None,
            q_goal: None,
            speed_factor: default_speed_factor(),
            command_interface: InterfaceKind::default(),
            velocity_filter_alpha: default_filter_alpha(),
        }
    }
}

impl ControllerParams {
    /// Deserialize from a host parameter table.
    pub fn from_table(table: &toml::Table) -> Result<Self, ConfigurationError> {
        toml::Value::Table(table.clone())
            .try_into()
            .map_err(|e: toml::de::Error| ConfigurationError::Parse(e.message().to_string()))
    }

    /// Validate every field. All-or-nothing: the first violation is returned.
    pub fn validate(&self) -> Result<ControllerConfig, ConfigurationError> {
        if self.arm_id.trim().is_empty() {
            return Err(ConfigurationError::EmptyArmId);
        }

        let k_gains = gain_vector("k_gains", self.k_gains.as_deref())?;
        let d_gains = gain_vector("d_gains", self.d_gains.as_deref())?;

        let q_goal = match self.q_goal.as_deref() {
            Some(values) => joint_vector("q_goal", values)?,
            None => [0.0; NUM_JOINTS],
        };

        if !(self.speed_factor >= MIN_SPEED_FACTOR && self.speed_factor <= 1.0) {
            return Err(ConfigurationError::InvalidSpeedFactor(self.speed_factor));
        }
        if !(self.velocity_filter_alpha > 0.0 && self.velocity_filter_alpha <= 1.0) {
            return Err(ConfigurationError::InvalidFilterAlpha(
                self.velocity_filter_alpha,
            ));
        }

        Ok(ControllerConfig {
            arm_id: self.arm_id.clone(),
            k_gains,
            d_gains,
            q_goal,
            speed_factor: self.speed_factor,
            command_interface: self.command_interface,
            velocity_filter_alpha: self.velocity_filter_alpha,
        })
    }
}

/// Length and finiteness check, then copy into a fixed array.
fn joint_vector(name: &'static str, values: &[f64]) -> Result<[f64; NUM_JOINTS], ConfigurationError> {
    if values.len() != NUM_JOINTS {
        return Err(ConfigurationError::WrongLength {
            name,
            expected: NUM_JOINTS,
            actual: values.len(),
        });
    }
    let mut out = [0.0; NUM_JOINTS];
    for (index, (slot, &value)) in out.iter_mut().zip(values).enumerate() {
        if !value.is_finite() {
            return Err(ConfigurationError::NonFinite { name, index });
        }
        *slot = value;
    }
    Ok(out)
}

fn gain_vector(
    name: &'static str,
    values: Option<&[f64]>,
) -> Result<[f64; NUM_JOINTS], ConfigurationError> {
    let values = values.ok_or(ConfigurationError::MissingParameter(name))?;
    let gains = joint_vector(name, values)?;
    if let Some((index, &value)) = gains.iter().enumerate().find(|(_, g)| **g < 0.0) {
        return Err(ConfigurationError::NegativeGain { name, index, value });
    }
    Ok(gains)
}

/// Validated, fixed-size controller configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerConfig {
    pub arm_id: String,
    pub k_gains: [f64; NUM_JOINTS],
    pub d_gains: [f64; NUM_JOINTS],
    pub q_goal: [f64; NUM_JOINTS],
    pub speed_factor: f64,
    pub command_interface: InterfaceKind,
    pub velocity_filter_alpha: f64,
}

impl ControllerConfig {
    /// `{arm_id}_joint{n}/{command_interface}` for n = 1..=7.
    pub fn command_interface_names(&self) -> Vec<String> {
        (1..=NUM_JOINTS)
            .map(|joint| joint_interface_name(&self.arm_id, joint, self.command_interface))
            .collect()
    }

    /// Position then velocity for each joint, in joint order.
    pub fn state_interface_names(&self) -> Vec<String> {
        (1..=NUM_JOINTS)
            .flat_map(|joint| {
                [InterfaceKind::Position, InterfaceKind::Velocity]
                    .map(|kind| joint_interface_name(&self.arm_id, joint, kind))
            })
            .collect()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
