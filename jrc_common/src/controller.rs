//! Host-facing controller trait.
//!
//! A host (controller manager) drives every controller through this trait:
//!
//! 1. `on_configure()` - with named parameters, Unconfigured/Inactive → Inactive
//! 2. `assign_interfaces()` - loans for the names the controller asked for
//! 3. `on_activate()` - Inactive → Active
//! 4. `update()` - once per cycle while Active
//! 5. `on_deactivate()` / `release_interfaces()` / `on_cleanup()` - teardown
//!
//! The host guarantees single-threaded, strictly ordered calls; controllers
//! still reject out-of-order calls with `Failure`/`Error` instead of panicking.

use std::time::Duration;

use crate::interface::{CommandInterface, StateInterface};
use crate::lifecycle::{CallbackReturn, LifecycleState, ReturnType};

/// Trait defining the interface between a host and a controller plugin.
///
/// # Timing Contracts
///
/// | Operation | RT Constraint |
/// |-----------|---------------|
/// | `on_configure()` | None (may allocate) |
/// | `on_activate()` | None |
/// | `update()` | **HARD**: bounded, no allocation, no blocking |
pub trait ControllerInterface {
    /// Controller instance name used in logs.
    fn name(&self) -> &str;

    /// Current lifecycle state.
    fn lifecycle_state(&self) -> LifecycleState;

    /// Configure from named parameters (a TOML table).
    fn on_configure(&mut self, params: &toml::Table) -> CallbackReturn;

    /// Command interface names required after a successful configure.
    fn command_interface_configuration(&self) -> Vec<String>;

    /// State interface names required after a successful configure.
    fn state_interface_configuration(&self) -> Vec<String>;

    /// Hand over interface loans. Order is irrelevant; binding is by name.
    fn assign_interfaces(&mut self, commands: Vec<CommandInterface>, states: Vec<StateInterface>);

    /// Drop every interface loan.
    fn release_interfaces(&mut self);

    fn on_activate(&mut self) -> CallbackReturn;

    fn on_deactivate(&mut self) -> CallbackReturn;

    fn on_cleanup(&mut self) -> CallbackReturn;

    /// Execute one control cycle.
    ///
    /// # Arguments
    /// * `time` - Host time of this cycle
    /// * `period` - Time elapsed since the previous cycle
    fn update(&mut self, time: Duration, period: Duration) -> ReturnType;
}
