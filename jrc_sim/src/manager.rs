//! Controller manager: interface registry, lifecycle driving and the cycle.
//!
//! Owns one hardware backend and one controller. Every cycle runs
//! `hardware.read → controller.update → hardware.write` with a monotonically
//! increasing host time.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use jrc_common::controller::ControllerInterface;
use jrc_common::hardware::{HardwareError, HardwareInterface};
use jrc_common::interface::{CommandInterface, InterfaceSlot, StateInterface};
use jrc_common::lifecycle::ReturnType;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::cycle::CycleStats;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ManagerError {
    #[error("controller '{0}' rejected its configuration")]
    ConfigureFailed(String),

    #[error("controller '{0}' failed to activate")]
    ActivateFailed(String),

    #[error("controller '{0}' failed to deactivate")]
    DeactivateFailed(String),

    #[error("controller '{0}' failed to clean up")]
    CleanupFailed(String),

    #[error("controller '{controller}' update failed in cycle {cycle}")]
    UpdateFailed { controller: String, cycle: u64 },

    #[error(transparent)]
    Hardware(#[from] HardwareError),
}

/// Drives one controller against one hardware backend.
pub struct ControllerManager<H, C> {
    hardware: H,
    controller: C,
    state_slots: HashMap<String, Arc<InterfaceSlot>>,
    command_slots: HashMap<String, Arc<InterfaceSlot>>,
    time: Duration,
    stats: CycleStats,
}

fn registry(slots: Vec<Arc<InterfaceSlot>>) -> HashMap<String, Arc<InterfaceSlot>> {
    slots
        .into_iter()
        .map(|slot| (slot.name().to_string(), slot))
        .collect()
}

impl<H: HardwareInterface, C: ControllerInterface> ControllerManager<H, C> {
    pub fn new(hardware: H, controller: C) -> Self {
        let state_slots = registry(hardware.export_state_interfaces());
        let command_slots = registry(hardware.export_command_interfaces());
        info!(
            hardware = hardware.name(),
            controller = controller.name(),
            "manager created: {} state / {} command interfaces",
            state_slots.len(),
            command_slots.len()
        );
        Self {
            hardware,
            controller,
            state_slots,
            command_slots,
            time: Duration::ZERO,
            stats: CycleStats::new(),
        }
    }

    pub fn hardware(&self) -> &H {
        &self.hardware
    }

    pub fn controller(&self) -> &C {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut C {
        &mut self.controller
    }

    /// Host time of the last executed cycle.
    #[inline]
    pub fn time(&self) -> Duration {
        self.time
    }

    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    /// Current value of an exported state slot.
    pub fn state_value(&self, name: &str) -> Option<f64> {
        self.state_slots.get(name).map(|slot| slot.get())
    }

    /// Current value of an exported command slot.
    pub fn command_value(&self, name: &str) -> Option<f64> {
        self.command_slots.get(name).map(|slot| slot.get())
    }

    // ─── Lifecycle ──────────────────────────────────────────────

    pub fn configure(&mut self, params: &toml::Table) -> Result<(), ManagerError> {
        if self.controller.on_configure(params).is_success() {
            info!(controller = self.controller.name(), "configure: success");
            Ok(())
        } else {
            error!(controller = self.controller.name(), "configure: failure");
            Err(ManagerError::ConfigureFailed(self.controller.name().to_string()))
        }
    }

    /// Loan the requested interfaces the hardware exports, then activate.
    ///
    /// Names the hardware does not export are skipped; the controller
    /// decides whether it can run without them.
    pub fn activate(&mut self) -> Result<(), ManagerError> {
        let commands = self
            .controller
            .command_interface_configuration()
            .into_iter()
            .filter_map(|name| match self.command_slots.get(&name) {
                Some(slot) => Some(CommandInterface::new(Arc::clone(slot))),
                None => {
                    warn!("command interface '{name}' not exported by {}", self.hardware.name());
                    None
                }
            })
            .collect();
        let states = self
            .controller
            .state_interface_configuration()
            .into_iter()
            .filter_map(|name| match self.state_slots.get(&name) {
                Some(slot) => Some(StateInterface::new(Arc::clone(slot))),
                None => {
                    warn!("state interface '{name}' not exported by {}", self.hardware.name());
                    None
                }
            })
            .collect();

        // Publish the current state so activation sees the real start pose.
        self.hardware.read(self.time, Duration::ZERO)?;
        self.controller.assign_interfaces(commands, states);

        if self.controller.on_activate().is_success() {
            info!(controller = self.controller.name(), "activate: success");
            Ok(())
        } else {
            self.controller.release_interfaces();
            error!(controller = self.controller.name(), "activate: failure");
            Err(ManagerError::ActivateFailed(self.controller.name().to_string()))
        }
    }

    pub fn deactivate(&mut self) -> Result<(), ManagerError> {
        let result = self.controller.on_deactivate();
        self.controller.release_interfaces();
        if result.is_success() {
            info!(controller = self.controller.name(), "deactivate: success");
            Ok(())
        } else {
            Err(ManagerError::DeactivateFailed(self.controller.name().to_string()))
        }
    }

    pub fn cleanup(&mut self) -> Result<(), ManagerError> {
        if self.controller.on_cleanup().is_success() {
            info!(controller = self.controller.name(), "cleanup: success");
            Ok(())
        } else {
            Err(ManagerError::CleanupFailed(self.controller.name().to_string()))
        }
    }

    // ─── Cycle ──────────────────────────────────────────────────

    /// One read → update → write cycle of length `period`.
    pub fn cycle(&mut self, period: Duration) -> Result<(), ManagerError> {
        let start = Instant::now();
        self.time += period;
        let result = self.cycle_body(period);
        self.stats
            .record(start.elapsed().as_nanos() as i64, period.as_nanos() as i64);
        if result.is_err() {
            self.stats.record_error();
        }
        result
    }

    fn cycle_body(&mut self, period: Duration) -> Result<(), ManagerError> {
        // ═══ READ ═══
        self.hardware.read(self.time, period)?;

        // ═══ UPDATE ═══
        if self.controller.update(self.time, period) == ReturnType::Error {
            return Err(ManagerError::UpdateFailed {
                controller: self.controller.name().to_string(),
                cycle: self.stats.cycle_count + 1,
            });
        }

        // ═══ WRITE ═══
        self.hardware.write(self.time, period)?;
        Ok(())
    }

    /// Run up to `cycles` cycles, stopping early when `running` clears.
    ///
    /// With `pace` set, each cycle sleeps out the rest of `period` so the
    /// simulation runs at wall-clock rate. Stops on the first cycle error.
    /// Returns the number of cycles executed.
    pub fn run(
        &mut self,
        cycles: u64,
        period: Duration,
        running: &AtomicBool,
        pace: bool,
    ) -> Result<u64, ManagerError> {
        info!(
            "starting cycle loop: {cycles} cycles, period={}us, paced={pace}",
            period.as_micros()
        );
        let mut executed = 0;
        while executed < cycles && running.load(Ordering::SeqCst) {
            let cycle_start = Instant::now();
            self.cycle(period)?;
            executed += 1;

            if executed % 1000 == 0 {
                debug!(
                    "cycle loop: {} cycles, avg={}ns, max={}ns, overruns={}",
                    self.stats.cycle_count,
                    self.stats.avg_cycle_ns(),
                    self.stats.max_cycle_ns,
                    self.stats.overruns
                );
            }

            if pace {
                if let Some(remaining) = period.checked_sub(cycle_start.elapsed()) {
                    std::thread::sleep(remaining);
                }
            }
        }
        info!("cycle loop stopped after {executed} cycles");
        Ok(executed)
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
