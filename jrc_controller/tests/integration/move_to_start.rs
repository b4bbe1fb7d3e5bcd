//! Closed-loop tracking: controller drives a simulated 7-joint plant from an
//! arbitrary pose to the start pose.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};
use std::time::Duration;

use jrc_common::consts::NUM_JOINTS;
use jrc_common::interface::InterfaceKind;
use jrc_controller::{ControllerParams, JointReturnController};

use super::rig::Rig;

const START_POSE: [f64; NUM_JOINTS] = [0.0, -FRAC_PI_4, 0.0, -3.0 * FRAC_PI_4, 0.0, FRAC_PI_2, FRAC_PI_4];
const K: [f64; NUM_JOINTS] = [600.0, 600.0, 600.0, 600.0, 250.0, 150.0, 50.0];
const D: [f64; NUM_JOINTS] = [30.0, 30.0, 30.0, 30.0, 10.0, 10.0, 5.0];
const INERTIA: [f64; NUM_JOINTS] = [0.5, 0.5, 0.5, 0.5, 0.2, 0.1, 0.05];
const DAMPING: [f64; NUM_JOINTS] = [0.1, 0.1, 0.1, 0.1, 0.05, 0.05, 0.02];

const DT: f64 = 0.001; // 1 kHz

/// Integrator-based joint model, one per joint.
///
/// `velocity += (effort − damping · velocity) / inertia · dt`
/// `position += velocity · dt`
struct SimulatedJoints {
    position: [f64; NUM_JOINTS],
    velocity: [f64; NUM_JOINTS],
}

impl SimulatedJoints {
    fn step(&mut self, effort: &[f64; NUM_JOINTS], dt: f64) {
        for j in 0..NUM_JOINTS {
            let accel = (effort[j] - DAMPING[j] * self.velocity[j]) / INERTIA[j];
            self.velocity[j] += accel * dt;
            self.position[j] += self.velocity[j] * dt;
        }
    }
}

struct Run {
    final_error: f64,
    max_tracking_error: f64,
    controller: JointReturnController,
}

fn run(initial: [f64; NUM_JOINTS], cycles: usize) -> Run {
    let rig = Rig::new("fr3", InterfaceKind::Effort);
    let mut plant = SimulatedJoints {
        position: initial,
        velocity: [0.0; NUM_JOINTS],
    };
    rig.set_state(&plant.position, &plant.velocity);

    let mut controller = JointReturnController::default();
    rig.assign_to(&mut controller);
    controller
        .configure(&ControllerParams {
            k_gains: Some(K.to_vec()),
            d_gains: Some(D.to_vec()),
            q_goal: Some(START_POSE.to_vec()),
            command_interface: InterfaceKind::Effort,
            ..Default::default()
        })
        .unwrap();
    controller.activate().unwrap();

    let period = Duration::from_secs_f64(DT);
    let mut time = Duration::ZERO;
    let mut max_tracking_error: f64 = 0.0;
    for _ in 0..cycles {
        time += period;
        controller.update(time, period).unwrap();
        plant.step(&rig.command_values(), DT);
        rig.set_state(&plant.position, &plant.velocity);

        // Distance from the straight-line envelope between start and goal.
        for j in 0..NUM_JOINTS {
            let lo = initial[j].min(START_POSE[j]);
            let hi = initial[j].max(START_POSE[j]);
            let outside = (lo - plant.position[j]).max(plant.position[j] - hi).max(0.0);
            max_tracking_error = max_tracking_error.max(outside);
        }
    }

    let final_error = plant
        .position
        .iter()
        .zip(&START_POSE)
        .map(|(q, g)| (q - g).abs())
        .fold(0.0, f64::max);
    Run {
        final_error,
        max_tracking_error,
        controller,
    }
}

#[test]
fn converges_from_zero_pose() {
    let result = run([0.0; NUM_JOINTS], 10_000);
    let duration = result.controller.trajectory_duration().unwrap();
    assert!(duration < Duration::from_secs(9), "trajectory too slow: {duration:?}");
    assert!(result.controller.is_motion_finished());
    assert!(
        result.final_error < 1e-3,
        "final error {} rad exceeds 1e-3",
        result.final_error
    );
}

#[test]
fn no_significant_overshoot_along_the_way() {
    let result = run([0.3, 0.2, -0.4, -1.0, 0.5, 1.0, 0.0], 10_000);
    assert!(
        result.max_tracking_error < 0.05,
        "left the start/goal envelope by {} rad",
        result.max_tracking_error
    );
    assert!(result.final_error < 1e-3);
}

#[test]
fn already_at_goal_stays_put() {
    let result = run(START_POSE, 500);
    assert_eq!(result.controller.trajectory_duration(), Some(Duration::ZERO));
    assert!(result.final_error < 1e-9);
}
