//! Configure / activate / update / deactivate / cleanup through the public API.

use std::time::Duration;

use jrc_common::controller::ControllerInterface;
use jrc_common::interface::InterfaceKind;
use jrc_common::lifecycle::{CallbackReturn, LifecycleState, ReturnType};
use jrc_controller::{
    ActivationError, ConfigurationError, ControllerParams, CycleError, JointReturnController,
};

use super::rig::{DEFAULT_D, DEFAULT_K, Rig};

fn valid_params() -> ControllerParams {
    ControllerParams {
        k_gains: Some(DEFAULT_K.to_vec()),
        d_gains: Some(DEFAULT_D.to_vec()),
        ..Default::default()
    }
}

fn active(rig: &Rig) -> JointReturnController {
    let mut controller = JointReturnController::default();
    rig.assign_to(&mut controller);
    controller.configure(&valid_params()).unwrap();
    controller.activate().unwrap();
    controller
}

// ─── Configure ──────────────────────────────────────────────────────

#[test]
fn vanishing_speed_factor_is_rejected() {
    let rig = Rig::new("fr3", InterfaceKind::Position);
    rig.set_state(&[0.5; 7], &[0.0; 7]);
    let mut controller = JointReturnController::default();
    rig.assign_to(&mut controller);

    let err = controller
        .configure(&ControllerParams {
            speed_factor: 1e-200,
            ..valid_params()
        })
        .unwrap_err();
    assert!(matches!(err, ConfigurationError::InvalidSpeedFactor(_)));
    assert_eq!(controller.lifecycle_state(), LifecycleState::Unconfigured);
    assert_eq!(controller.activate(), Err(ActivationError::NotConfigured));
    assert!(controller.trajectory_duration().is_none());
}

#[test]
fn configure_fails_without_gains() {
    let mut controller = JointReturnController::default();
    let err = controller.configure(&ControllerParams::default()).unwrap_err();
    assert_eq!(err, ConfigurationError::MissingParameter("k_gains"));
    assert_eq!(err.to_string(), "k_gains parameter not set");
    assert_eq!(controller.lifecycle_state(), LifecycleState::Unconfigured);
}

#[test]
fn configure_fails_with_empty_k_gains() {
    let mut controller = JointReturnController::default();
    let params = ControllerParams {
        k_gains: Some(Vec::new()),
        ..valid_params()
    };
    let err = controller.configure(&params).unwrap_err();
    assert_eq!(
        err.to_string(),
        "k_gains should be of size 7 but is of size 0"
    );
}

#[test]
fn configure_fails_with_empty_d_gains() {
    let mut controller = JointReturnController::default();
    let params = ControllerParams {
        d_gains: Some(Vec::new()),
        ..valid_params()
    };
    assert!(matches!(
        controller.configure(&params),
        Err(ConfigurationError::WrongLength { name: "d_gains", expected: 7, actual: 0 })
    ));
}

#[test]
fn configure_succeeds_with_valid_gains() {
    let mut controller = JointReturnController::default();
    controller.configure(&valid_params()).unwrap();
    assert_eq!(controller.lifecycle_state(), LifecycleState::Inactive);
    let config = controller.config().unwrap();
    assert_eq!(config.k_gains, DEFAULT_K);
    assert_eq!(config.d_gains, DEFAULT_D);
}

#[test]
fn failed_reconfigure_keeps_config_but_blocks_activation() {
    let rig = Rig::new("fr3", InterfaceKind::Position);
    let mut controller = JointReturnController::default();
    rig.assign_to(&mut controller);
    controller.configure(&valid_params()).unwrap();

    let bad = ControllerParams {
        k_gains: Some(vec![1.0; 3]),
        ..valid_params()
    };
    assert!(controller.configure(&bad).is_err());
    assert_eq!(controller.config().unwrap().k_gains, DEFAULT_K);
    assert_eq!(controller.activate(), Err(ActivationError::NotConfigured));

    controller.configure(&valid_params()).unwrap();
    controller.activate().unwrap();
}

#[test]
fn configure_from_host_table() {
    let table: toml::Table = toml::from_str(
        r#"
        arm_id = "panda"
        k_gains = [600.0, 600.0, 600.0, 600.0, 250.0, 150.0, 50.0]
        d_gains = [30.0, 30.0, 30.0, 30.0, 10.0, 10.0, 5.0]
        command_interface = "effort"
        "#,
    )
    .unwrap();
    let mut controller = JointReturnController::default();
    assert_eq!(controller.on_configure(&table), CallbackReturn::Success);
    assert_eq!(
        controller.command_interface_configuration()[0],
        "panda_joint1/effort"
    );
    assert_eq!(
        controller.state_interface_configuration()[13],
        "panda_joint7/velocity"
    );
}

#[test]
fn unknown_parameter_is_rejected() {
    let table: toml::Table = toml::from_str(
        r#"
        k_gains = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]
        d_gains = [1.0, 1.0, 1.0, 1.0, 1.0, 1.0, 1.0]
        kp = 3.0
        "#,
    )
    .unwrap();
    let mut controller = JointReturnController::default();
    assert!(matches!(
        controller.configure_from_table(&table),
        Err(ConfigurationError::Parse(_))
    ));
    assert_eq!(controller.on_configure(&table), CallbackReturn::Failure);
}

#[test]
fn configure_while_active_is_rejected() {
    let rig = Rig::new("fr3", InterfaceKind::Position);
    let mut controller = active(&rig);
    assert_eq!(
        controller.configure(&valid_params()),
        Err(ConfigurationError::InvalidState(LifecycleState::Active))
    );
    assert_eq!(controller.lifecycle_state(), LifecycleState::Active);
}

// ─── Activate / Update ──────────────────────────────────────────────

#[test]
fn update_at_zero_state_commands_zero() {
    let rig = Rig::new("fr3", InterfaceKind::Position);
    let mut controller = active(&rig);

    controller
        .update(Duration::ZERO, Duration::from_millis(1))
        .unwrap();
    for value in rig.command_values() {
        assert!(value.abs() < 1e-5, "command {value} not near zero");
    }
}

#[test]
fn repeated_update_is_idempotent_when_settled() {
    let rig = Rig::new("fr3", InterfaceKind::Position);
    let mut controller = active(&rig);

    rig.set_state(&[0.1, -0.1, 0.2, -0.2, 0.3, -0.3, 0.4], &[0.01; 7]);
    controller.update(Duration::ZERO, Duration::ZERO).unwrap();
    let first = rig.command_values();
    controller.update(Duration::ZERO, Duration::ZERO).unwrap();
    assert_eq!(first, rig.command_values());
}

#[test]
fn update_is_idempotent_once_motion_finished() {
    let rig = Rig::new("fr3", InterfaceKind::Position);
    rig.set_state(&[0.1, -0.1, 0.05, 0.0, 0.2, -0.05, 0.1], &[0.0; 7]);
    let mut controller = JointReturnController::default();
    rig.assign_to(&mut controller);
    controller
        .configure(&ControllerParams {
            speed_factor: 1.0,
            ..valid_params()
        })
        .unwrap();
    controller.activate().unwrap();

    let period = Duration::from_millis(1);
    let mut time = Duration::ZERO;
    while !controller.is_motion_finished() {
        assert!(time < Duration::from_secs(10), "motion never finished");
        time += period;
        controller.update(time, period).unwrap();
    }

    rig.set_state(&[0.02, -0.01, 0.0, 0.03, -0.02, 0.01, 0.0], &[0.05; 7]);
    controller.update(time + period, period).unwrap();
    let first = rig.command_values();
    controller.update(time + period * 2, period).unwrap();
    assert_eq!(first, rig.command_values());
    assert!(first.iter().any(|c| *c != 0.0));
}

#[test]
fn activate_requires_configure() {
    let rig = Rig::new("fr3", InterfaceKind::Position);
    let mut controller = JointReturnController::default();
    rig.assign_to(&mut controller);
    assert_eq!(controller.activate(), Err(ActivationError::NotConfigured));
    assert_eq!(controller.on_activate(), CallbackReturn::Failure);
}

#[test]
fn activate_twice_is_rejected() {
    let rig = Rig::new("fr3", InterfaceKind::Position);
    let mut controller = active(&rig);
    assert_eq!(controller.activate(), Err(ActivationError::AlreadyActive));
}

#[test]
fn activate_fails_on_missing_interface() {
    let rig = Rig::new("fr3", InterfaceKind::Position);
    let mut controller = JointReturnController::default();
    let (commands, mut states) = rig.loans();
    states.retain(|s| s.name() != "fr3_joint5/velocity");
    controller.assign(commands, states);
    controller.configure(&valid_params()).unwrap();

    assert_eq!(
        controller.activate(),
        Err(ActivationError::MissingStateInterface("fr3_joint5/velocity".into()))
    );
    assert_eq!(controller.lifecycle_state(), LifecycleState::Inactive);
}

#[test]
fn arm_id_mismatch_fails_activation() {
    let rig = Rig::new("panda", InterfaceKind::Position);
    let mut controller = JointReturnController::default();
    rig.assign_to(&mut controller);
    controller.configure(&valid_params()).unwrap();
    assert!(matches!(
        controller.activate(),
        Err(ActivationError::MissingCommandInterface(_))
    ));
}

#[test]
fn activate_fails_when_start_pose_unreadable() {
    let rig = Rig::new("fr3", InterfaceKind::Position);
    let mut controller = JointReturnController::default();
    rig.assign_to(&mut controller);
    controller.configure(&valid_params()).unwrap();
    rig.positions[4].set_available(false);
    assert!(matches!(
        controller.activate(),
        Err(ActivationError::StateRead(_))
    ));
}

#[test]
fn update_requires_active() {
    let mut controller = JointReturnController::default();
    assert_eq!(
        controller.update(Duration::ZERO, Duration::ZERO),
        Err(CycleError::NotActive(LifecycleState::Unconfigured))
    );
    assert_eq!(
        ControllerInterface::update(&mut controller, Duration::ZERO, Duration::ZERO),
        ReturnType::Error
    );
}

#[test]
fn unavailable_state_fails_cycle_and_keeps_commands() {
    let rig = Rig::new("fr3", InterfaceKind::Position);
    let mut controller = active(&rig);
    for slot in &rig.commands {
        slot.set(7.0);
    }
    rig.positions[6].set_available(false);
    assert!(matches!(
        controller.update(Duration::ZERO, Duration::ZERO),
        Err(CycleError::StateRead(_))
    ));
    assert_eq!(rig.command_values(), [7.0; 7]);
    // Controller stays active; the next good cycle succeeds.
    rig.positions[6].set_available(true);
    controller.update(Duration::ZERO, Duration::ZERO).unwrap();
}

// ─── Deactivate / Cleanup ───────────────────────────────────────────

#[test]
fn full_lifecycle_round_trip() {
    let rig = Rig::new("fr3", InterfaceKind::Position);
    let mut controller = active(&rig);

    controller.deactivate().unwrap();
    assert_eq!(controller.lifecycle_state(), LifecycleState::Inactive);
    assert!(controller.trajectory_duration().is_none());
    assert!(controller.config().is_some());

    // Loans are still assigned: reactivation works without reassigning.
    controller.activate().unwrap();
    controller.deactivate().unwrap();

    controller.cleanup().unwrap();
    assert_eq!(controller.lifecycle_state(), LifecycleState::Unconfigured);
    assert!(controller.config().is_none());
    assert!(controller.command_interface_configuration().is_empty());
}

#[test]
fn deactivate_and_cleanup_reject_wrong_state() {
    let rig = Rig::new("fr3", InterfaceKind::Position);
    let mut controller = JointReturnController::default();
    let err = controller.deactivate().unwrap_err();
    assert_eq!(err.from, LifecycleState::Unconfigured);

    let mut controller = active(&rig);
    let err = controller.cleanup().unwrap_err();
    assert_eq!(err.from, LifecycleState::Active);
    assert_eq!(controller.on_cleanup(), CallbackReturn::Failure);
    assert_eq!(controller.on_deactivate(), CallbackReturn::Success);
    assert_eq!(controller.on_deactivate(), CallbackReturn::Failure);
}
