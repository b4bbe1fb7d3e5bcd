//! Joint return controller: lifecycle, interface binding and the control cycle.
//!
//! ## Cycle Body
//! 1. Read position and velocity of all 7 joints (any failure aborts the
//!    cycle before a single command is written).
//! 2. Advance trajectory time by `period` and sample the target pose.
//! 3. `command_i = K_i · (target_i − q_i) − D_i · dq_f,i`, written per joint.

use std::time::Duration;

use jrc_common::consts::NUM_JOINTS;
use jrc_common::controller::ControllerInterface;
use jrc_common::interface::{
    CommandInterface, InterfaceKind, StateInterface, joint_interface_name,
};
use jrc_common::lifecycle::{CallbackReturn, LifecycleState, ReturnType};
use tracing::{debug, error, info};

use crate::config::{ControllerConfig, ControllerParams};
use crate::control::pd::{PdGains, VelocityFilter, pd_compute_all};
use crate::control::trajectory::SyncTrajectory;
use crate::error::{ActivationError, ConfigurationError, CycleError, LifecycleError};
use crate::state::lifecycle::{LifecycleEvent, LifecycleStateMachine, TransitionResult};

/// Indices of one joint's interfaces within the assigned loans.
#[derive(Debug, Clone, Copy)]
struct JointBinding {
    command: usize,
    position: usize,
    velocity: usize,
}

/// Runtime state that only exists while Active.
#[derive(Debug)]
struct ActiveCycle {
    joints: heapless::Vec<JointBinding, NUM_JOINTS>,
    gains: PdGains,
    trajectory: SyncTrajectory,
    filter: VelocityFilter,
    /// Trajectory time, sum of all `period`s since activation.
    elapsed: Duration,
    motion_finished: bool,
}

/// Drives a 7-joint arm back to its configured start pose.
#[derive(Debug)]
pub struct JointReturnController {
    name: String,
    lifecycle: LifecycleStateMachine,
    config: Option<ControllerConfig>,
    command_loans: Vec<CommandInterface>,
    state_loans: Vec<StateInterface>,
    active: Option<ActiveCycle>,
}

impl Default for JointReturnController {
    fn default() -> Self {
        Self::new("joint_return_controller")
    }
}

impl JointReturnController {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lifecycle: LifecycleStateMachine::new(),
            config: None,
            command_loans: Vec::new(),
            state_loans: Vec::new(),
            active: None,
        }
    }

    #[inline]
    pub fn lifecycle_state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    /// Last successfully validated configuration.
    ///
    /// Kept after a failed reconfigure (the controller is then Unconfigured
    /// and cannot be activated until a configure succeeds).
    pub fn config(&self) -> Option<&ControllerConfig> {
        self.config.as_ref()
    }

    /// Duration of the current start-pose trajectory, while Active.
    pub fn trajectory_duration(&self) -> Option<Duration> {
        self.active
            .as_ref()
            .and_then(|a| Duration::try_from_secs_f64(a.trajectory.duration()).ok())
    }

    /// Goal pose of the current trajectory, while Active.
    pub fn goal(&self) -> Option<[f64; NUM_JOINTS]> {
        self.active.as_ref().map(|a| a.trajectory.goal())
    }

    /// True once the trajectory target has reached the goal.
    pub fn is_motion_finished(&self) -> bool {
        self.active.as_ref().is_some_and(|a| a.motion_finished)
    }

    // ─── Lifecycle ──────────────────────────────────────────────

    /// Validate and store parameters.
    ///
    /// On failure nothing stored is changed and the controller becomes
    /// Unconfigured.
    pub fn configure(&mut self, params: &ControllerParams) -> Result<(), ConfigurationError> {
        self.ensure_configurable()?;
        match params.validate() {
            Ok(config) => {
                info!(
                    controller = %self.name,
                    arm_id = %config.arm_id,
                    command_interface = %config.command_interface,
                    speed_factor = config.speed_factor,
                    "configured: k_gains={:?} d_gains={:?}",
                    config.k_gains,
                    config.d_gains,
                );
                self.config = Some(config);
                self.lifecycle.handle_event(LifecycleEvent::Configure);
                Ok(())
            }
            Err(e) => self.reject_configuration(e),
        }
    }

    /// Deserialize named parameters, then [`configure`](Self::configure).
    pub fn configure_from_table(&mut self, table: &toml::Table) -> Result<(), ConfigurationError> {
        self.ensure_configurable()?;
        match ControllerParams::from_table(table) {
            Ok(params) => self.configure(&params),
            Err(e) => self.reject_configuration(e),
        }
    }

    fn ensure_configurable(&self) -> Result<(), ConfigurationError> {
        let state = self.lifecycle.state();
        if state == LifecycleState::Active {
            error!(controller = %self.name, "configure rejected: controller is active");
            return Err(ConfigurationError::InvalidState(state));
        }
        Ok(())
    }

    fn reject_configuration(&mut self, e: ConfigurationError) -> Result<(), ConfigurationError> {
        error!(controller = %self.name, "configure failed: {e}");
        self.lifecycle.handle_event(LifecycleEvent::ConfigureFailed);
        Err(e)
    }

    /// Interface names to request from the host. Empty unless configured.
    pub fn command_interface_names(&self) -> Vec<String> {
        match (&self.config, self.lifecycle.state()) {
            (Some(config), LifecycleState::Inactive | LifecycleState::Active) => {
                config.command_interface_names()
            }
            _ => Vec::new(),
        }
    }

    /// State interface names to request from the host. Empty unless configured.
    pub fn state_interface_names(&self) -> Vec<String> {
        match (&self.config, self.lifecycle.state()) {
            (Some(config), LifecycleState::Inactive | LifecycleState::Active) => {
                config.state_interface_names()
            }
            _ => Vec::new(),
        }
    }

    /// Store interface loans handed over by the host.
    pub fn assign(&mut self, commands: Vec<CommandInterface>, states: Vec<StateInterface>) {
        self.command_loans = commands;
        self.state_loans = states;
    }

    /// Drop all interface loans. Deactivates first when Active.
    pub fn release(&mut self) {
        if self.lifecycle.is_active() {
            // Cannot fail from Active.
            let _ = self.deactivate();
        }
        self.command_loans.clear();
        self.state_loans.clear();
    }

    /// Bind interfaces, capture the start pose and go Active.
    pub fn activate(&mut self) -> Result<(), ActivationError> {
        let result = self.try_activate();
        if let Err(e) = &result {
            error!(controller = %self.name, "activate failed: {e}");
        }
        result
    }

    fn try_activate(&mut self) -> Result<(), ActivationError> {
        match self.lifecycle.state() {
            LifecycleState::Unconfigured => return Err(ActivationError::NotConfigured),
            LifecycleState::Active => return Err(ActivationError::AlreadyActive),
            LifecycleState::Inactive => {}
        }
        let config = self.config.as_ref().ok_or(ActivationError::NotConfigured)?;

        let joints = (1..=NUM_JOINTS)
            .map(|joint| self.bind_joint(config, joint))
            .collect::<Result<heapless::Vec<JointBinding, NUM_JOINTS>, _>>()?;

        let mut q_start = [0.0; NUM_JOINTS];
        for (q, binding) in q_start.iter_mut().zip(&joints) {
            let state = &self.state_loans[binding.position];
            *q = state.get_value().map_err(ActivationError::StateRead)?;
            if !q.is_finite() {
                return Err(ActivationError::NonFiniteStartPose(state.name().to_string()));
            }
        }

        let trajectory = SyncTrajectory::new(config.speed_factor, q_start, config.q_goal);
        if !trajectory.is_feasible() {
            return Err(ActivationError::InfeasibleTrajectory);
        }
        info!(
            controller = %self.name,
            duration_s = trajectory.duration(),
            "activated: start={:?} goal={:?}",
            q_start,
            config.q_goal,
        );

        self.active = Some(ActiveCycle {
            joints,
            gains: PdGains {
                k: config.k_gains,
                d: config.d_gains,
            },
            trajectory,
            filter: VelocityFilter::new(config.velocity_filter_alpha),
            elapsed: Duration::ZERO,
            motion_finished: false,
        });
        self.lifecycle.handle_event(LifecycleEvent::Activate);
        Ok(())
    }

    fn bind_joint(&self, config: &ControllerConfig, joint: usize) -> Result<JointBinding, ActivationError> {
        let command_name = joint_interface_name(&config.arm_id, joint, config.command_interface);
        let command = self
            .command_loans
            .iter()
            .position(|c| c.name() == command_name)
            .ok_or(ActivationError::MissingCommandInterface(command_name))?;

        let find_state = |kind: InterfaceKind| {
            let name = joint_interface_name(&config.arm_id, joint, kind);
            self.state_loans
                .iter()
                .position(|s| s.name() == name)
                .ok_or(ActivationError::MissingStateInterface(name))
        };

        Ok(JointBinding {
            command,
            position: find_state(InterfaceKind::Position)?,
            velocity: find_state(InterfaceKind::Velocity)?,
        })
    }

    /// Active → Inactive. Bindings are dropped; configuration is kept.
    pub fn deactivate(&mut self) -> Result<(), LifecycleError> {
        self.transition(LifecycleEvent::Deactivate)?;
        self.active = None;
        info!(controller = %self.name, "deactivated");
        Ok(())
    }

    /// Inactive → Unconfigured. Drops the stored configuration.
    pub fn cleanup(&mut self) -> Result<(), LifecycleError> {
        self.transition(LifecycleEvent::Cleanup)?;
        self.config = None;
        info!(controller = %self.name, "cleaned up");
        Ok(())
    }

    fn transition(&mut self, event: LifecycleEvent) -> Result<(), LifecycleError> {
        let from = self.lifecycle.state();
        match self.lifecycle.handle_event(event) {
            TransitionResult::Ok(_) => Ok(()),
            TransitionResult::Rejected(reason) => {
                debug!(controller = %self.name, ?event, "transition rejected: {reason}");
                Err(LifecycleError { from, reason })
            }
        }
    }

    // ─── Cycle ──────────────────────────────────────────────────

    /// Run one control cycle.
    ///
    /// `period` advances the trajectory; `time` is only used for logging.
    pub fn update(&mut self, time: Duration, period: Duration) -> Result<(), CycleError> {
        let state = self.lifecycle.state();
        let Some(active) = self.active.as_mut() else {
            return Err(CycleError::NotActive(state));
        };

        // ── Read ──
        let mut q = [0.0; NUM_JOINTS];
        let mut dq = [0.0; NUM_JOINTS];
        for (i, binding) in active.joints.iter().enumerate() {
            q[i] = read_state(&self.state_loans[binding.position])?;
            dq[i] = read_state(&self.state_loans[binding.velocity])?;
        }

        // ── Process ──
        active.elapsed += period;
        let target = active.trajectory.sample(active.elapsed.as_secs_f64());
        let dq_filtered = active.filter.apply(&dq);
        let commands = pd_compute_all(&active.gains, &target.positions, &q, &dq_filtered);

        // ── Write ──
        // All or nothing: no joint gets a new command unless every one can.
        for binding in &active.joints {
            self.command_loans[binding.command]
                .check_writable()
                .map_err(CycleError::CommandWrite)?;
        }
        for (binding, &value) in active.joints.iter().zip(&commands) {
            self.command_loans[binding.command]
                .set_value(value)
                .map_err(CycleError::CommandWrite)?;
        }

        if target.finished && !active.motion_finished {
            active.motion_finished = true;
            info!(
                controller = %self.name,
                time_s = time.as_secs_f64(),
                "start pose trajectory finished"
            );
        }
        Ok(())
    }
}

#[inline]
fn read_state(state: &StateInterface) -> Result<f64, CycleError> {
    let value = state.get_value().map_err(CycleError::StateRead)?;
    if !value.is_finite() {
        return Err(CycleError::NonFiniteState {
            name: state.name().to_string(),
            value,
        });
    }
    Ok(value)
}

// ─── Host Interface ─────────────────────────────────────────────────

impl ControllerInterface for JointReturnController {
    fn name(&self) -> &str {
        &self.name
    }

    fn lifecycle_state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    fn on_configure(&mut self, params: &toml::Table) -> CallbackReturn {
        self.configure_from_table(params).into()
    }

    fn command_interface_configuration(&self) -> Vec<String> {
        self.command_interface_names()
    }

    fn state_interface_configuration(&self) -> Vec<String> {
        self.state_interface_names()
    }

    fn assign_interfaces(&mut self, commands: Vec<CommandInterface>, states: Vec<StateInterface>) {
        self.assign(commands, states);
    }

    fn release_interfaces(&mut self) {
        self.release();
    }

    fn on_activate(&mut self) -> CallbackReturn {
        self.activate().into()
    }

    fn on_deactivate(&mut self) -> CallbackReturn {
        self.deactivate().into()
    }

    fn on_cleanup(&mut self) -> CallbackReturn {
        self.cleanup().into()
    }

    fn update(&mut self, time: Duration, period: Duration) -> ReturnType {
        JointReturnController::update(self, time, period).into()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
