//! End-of-run summary, serialized as JSON by the binary.

use std::path::Path;

use jrc_common::consts::NUM_JOINTS;
use jrc_common::controller::ControllerInterface;
use jrc_common::lifecycle::LifecycleState;
use jrc_controller::JointReturnController;
use serde::Serialize;

use crate::arm::SimulatedArm;
use crate::cycle::CycleStats;
use crate::manager::ControllerManager;

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub service_name: String,
    pub controller: String,
    pub lifecycle_state: LifecycleState,
    pub cycles: u64,
    /// Simulated time [s].
    pub sim_time_s: f64,
    /// Planned trajectory duration [s], if the controller was active.
    pub trajectory_duration_s: Option<f64>,
    pub motion_finished: bool,
    pub goal: Option<[f64; NUM_JOINTS]>,
    pub final_positions: [f64; NUM_JOINTS],
    pub final_velocities: [f64; NUM_JOINTS],
    /// max |q_i − goal_i| [rad].
    pub max_goal_error: Option<f64>,
    pub stats: CycleStats,
    /// First fatal error, if the run stopped early.
    pub error: Option<String>,
}

impl RunReport {
    /// Snapshot the manager. Call before deactivating so goal and trajectory
    /// data are still available.
    pub fn collect(
        service_name: &str,
        manager: &ControllerManager<SimulatedArm, JointReturnController>,
        cycles: u64,
        error: Option<String>,
    ) -> Self {
        let controller = manager.controller();
        let final_positions = manager.hardware().positions();
        let goal = controller
            .goal()
            .or_else(|| controller.config().map(|c| c.q_goal));
        let max_goal_error = goal.map(|g| {
            final_positions
                .iter()
                .zip(&g)
                .map(|(q, g)| (q - g).abs())
                .fold(0.0, f64::max)
        });

        Self {
            service_name: service_name.to_string(),
            controller: ControllerInterface::name(controller).to_string(),
            lifecycle_state: controller.lifecycle_state(),
            cycles,
            sim_time_s: manager.time().as_secs_f64(),
            trajectory_duration_s: controller.trajectory_duration().map(|d| d.as_secs_f64()),
            motion_finished: controller.is_motion_finished(),
            goal,
            final_positions,
            final_velocities: manager.hardware().velocities(),
            max_goal_error,
            stats: manager.stats().clone(),
            error,
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn write(&self, path: &Path) -> std::io::Result<()> {
        let json = self.to_json().map_err(std::io::Error::other)?;
        std::fs::write(path, json)
    }
}
