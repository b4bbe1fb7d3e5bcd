//! In-memory host: one slot per joint interface, loaned to a controller.

use std::sync::Arc;

use jrc_common::consts::NUM_JOINTS;
use jrc_common::interface::{
    CommandInterface, InterfaceKind, InterfaceSlot, StateInterface, joint_interface_name,
};
use jrc_controller::JointReturnController;

pub const DEFAULT_K: [f64; NUM_JOINTS] = [24.0, 24.0, 24.0, 24.0, 10.0, 6.0, 2.0];
pub const DEFAULT_D: [f64; NUM_JOINTS] = [2.0, 2.0, 2.0, 1.0, 1.0, 1.0, 0.5];

pub struct Rig {
    pub commands: Vec<Arc<InterfaceSlot>>,
    pub positions: Vec<Arc<InterfaceSlot>>,
    pub velocities: Vec<Arc<InterfaceSlot>>,
}

impl Rig {
    pub fn new(arm_id: &str, command_kind: InterfaceKind) -> Self {
        let slots = |kind| {
            (1..=NUM_JOINTS)
                .map(|j| InterfaceSlot::new(joint_interface_name(arm_id, j, kind)))
                .collect::<Vec<_>>()
        };
        Self {
            commands: slots(command_kind),
            positions: slots(InterfaceKind::Position),
            velocities: slots(InterfaceKind::Velocity),
        }
    }

    pub fn loans(&self) -> (Vec<CommandInterface>, Vec<StateInterface>) {
        let commands = self.commands.iter().cloned().map(CommandInterface::new).collect();
        let states = self
            .positions
            .iter()
            .chain(&self.velocities)
            .cloned()
            .map(StateInterface::new)
            .collect();
        (commands, states)
    }

    pub fn assign_to(&self, controller: &mut JointReturnController) {
        let (commands, states) = self.loans();
        controller.assign(commands, states);
    }

    pub fn set_state(&self, q: &[f64; NUM_JOINTS], dq: &[f64; NUM_JOINTS]) {
        for j in 0..NUM_JOINTS {
            self.positions[j].set(q[j]);
            self.velocities[j].set(dq[j]);
        }
    }

    pub fn command_values(&self) -> [f64; NUM_JOINTS] {
        let mut out = [0.0; NUM_JOINTS];
        for (o, slot) in out.iter_mut().zip(&self.commands) {
            *o = slot.get();
        }
        out
    }
}
