//! Simulated 7-joint arm.
//!
//! Each joint is an independent rigid body with inertia `I` and viscous
//! damping `b`, integrated with semi-implicit Euler once per `write`:
//!
//! | Command kind | Integration |
//! |--------------|-------------|
//! | effort | `v += (u − b · v) / I · dt`, `q += v · dt` |
//! | velocity | `v = u`, `q += v · dt` |
//! | position | `v = (u − q) / dt`, `q = u` |

use std::sync::Arc;
use std::time::Duration;

use jrc_common::consts::NUM_JOINTS;
use jrc_common::hardware::{HardwareError, HardwareInterface};
use jrc_common::interface::{InterfaceKind, InterfaceSlot, joint_interface_name};
use tracing::debug;

use crate::config::SimulationConfig;

/// Per-joint model state.
#[derive(Debug, Clone, Copy)]
struct JointModel {
    position: f64,
    velocity: f64,
    inertia: f64,
    damping: f64,
}

impl JointModel {
    #[inline]
    fn step(&mut self, kind: InterfaceKind, command: f64, dt: f64) {
        match kind {
            InterfaceKind::Effort => {
                let accel = (command - self.damping * self.velocity) / self.inertia;
                self.velocity += accel * dt;
                self.position += self.velocity * dt;
            }
            InterfaceKind::Velocity => {
                self.velocity = command;
                self.position += self.velocity * dt;
            }
            InterfaceKind::Position => {
                if dt > 0.0 {
                    self.velocity = (command - self.position) / dt;
                }
                self.position = command;
            }
        }
    }
}

/// Simulation backend implementing [`HardwareInterface`].
#[derive(Debug)]
pub struct SimulatedArm {
    command_kind: InterfaceKind,
    joints: [JointModel; NUM_JOINTS],
    positions: Vec<Arc<InterfaceSlot>>,
    velocities: Vec<Arc<InterfaceSlot>>,
    commands: Vec<Arc<InterfaceSlot>>,
}

impl SimulatedArm {
    /// Build the arm and publish the initial state.
    pub fn new(config: &SimulationConfig) -> Result<Self, HardwareError> {
        config
            .validate()
            .map_err(|e| HardwareError::Configuration(e.to_string()))?;

        let slots = |kind| {
            (1..=NUM_JOINTS)
                .map(|j| InterfaceSlot::new(joint_interface_name(&config.arm_id, j, kind)))
                .collect::<Vec<_>>()
        };

        let mut joints = [JointModel {
            position: 0.0,
            velocity: 0.0,
            inertia: 1.0,
            damping: 0.0,
        }; NUM_JOINTS];
        for (j, joint) in joints.iter_mut().enumerate() {
            joint.position = config.initial_positions[j];
            joint.inertia = config.inertia[j];
            joint.damping = config.damping[j];
        }

        let arm = Self {
            command_kind: config.command_interface,
            joints,
            positions: slots(InterfaceKind::Position),
            velocities: slots(InterfaceKind::Velocity),
            commands: slots(config.command_interface),
        };
        arm.publish();
        debug!(
            arm_id = %config.arm_id,
            command_interface = %config.command_interface,
            "simulated arm created"
        );
        Ok(arm)
    }

    pub fn positions(&self) -> [f64; NUM_JOINTS] {
        self.joints.map(|j| j.position)
    }

    pub fn velocities(&self) -> [f64; NUM_JOINTS] {
        self.joints.map(|j| j.velocity)
    }

    #[inline]
    pub fn command_kind(&self) -> InterfaceKind {
        self.command_kind
    }

    fn publish(&self) {
        for (j, joint) in self.joints.iter().enumerate() {
            self.positions[j].set(joint.position);
            self.velocities[j].set(joint.velocity);
        }
    }
}

impl HardwareInterface for SimulatedArm {
    fn name(&self) -> &'static str {
        "simulation"
    }

    fn export_state_interfaces(&self) -> Vec<Arc<InterfaceSlot>> {
        self.positions
            .iter()
            .chain(&self.velocities)
            .cloned()
            .collect()
    }

    fn export_command_interfaces(&self) -> Vec<Arc<InterfaceSlot>> {
        self.commands.clone()
    }

    fn read(&mut self, _time: Duration, _period: Duration) -> Result<(), HardwareError> {
        self.publish();
        Ok(())
    }

    fn write(&mut self, _time: Duration, period: Duration) -> Result<(), HardwareError> {
        // Validate every command before touching the model.
        let mut commands = [0.0; NUM_JOINTS];
        for (value, slot) in commands.iter_mut().zip(&self.commands) {
            if !slot.is_available() {
                return Err(HardwareError::Communication(format!(
                    "command interface '{}' unavailable",
                    slot.name()
                )));
            }
            *value = slot.get();
            if !value.is_finite() {
                return Err(HardwareError::Communication(format!(
                    "command interface '{}' holds non-finite value {value}",
                    slot.name()
                )));
            }
        }

        let dt = period.as_secs_f64();
        for (joint, &command) in self.joints.iter_mut().zip(&commands) {
            joint.step(self.command_kind, command, dt);
        }
        Ok(())
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
