//! Synchronized joint-space trajectory from a start pose to a goal pose.
//!
//! Every joint follows a smooth accelerate / cruise / decelerate profile and
//! all moving joints finish at the same time. Limits come from
//! `jrc_common::consts`, scaled by the speed factor.
//!
//! Per joint with offset `Δq` and peak velocity `v`:
//!
//! ```text
//! t_1  = 1.5 · v / a_start              acceleration phase (quartic)
//! Δt_2 = 1.5 · v / a_goal               deceleration phase (quartic)
//! t_f  = t_1/2 + Δt_2/2 + |Δq| / v      total
//! ```
//!
//! The slowest joint sets `T = max t_f`; every other joint solves for the
//! peak velocity that makes its own `t_f` equal `T`.

use jrc_common::consts::{
    MAX_JOINT_ACCELERATION_GOAL, MAX_JOINT_ACCELERATION_START, MAX_JOINT_VELOCITY,
    MOTION_FINISHED_EPS, NUM_JOINTS,
};

/// Precomputed synchronized profile. Sampling is allocation-free.
#[derive(Debug, Clone, Copy)]
pub struct SyncTrajectory {
    q_start: [f64; NUM_JOINTS],
    delta_q: [f64; NUM_JOINTS],
    dq_max_sync: [f64; NUM_JOINTS],
    t_1_sync: [f64; NUM_JOINTS],
    t_2_sync: [f64; NUM_JOINTS],
    t_f_sync: [f64; NUM_JOINTS],
    q_1: [f64; NUM_JOINTS],
    duration: f64,
}

/// Sample of a trajectory at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectorySample {
    /// Desired joint positions [rad].
    pub positions: [f64; NUM_JOINTS],
    /// All joints have reached the goal.
    pub finished: bool,
}

#[inline]
fn sign(x: f64) -> f64 {
    if x > 0.0 {
        1.0
    } else if x < 0.0 {
        -1.0
    } else {
        0.0
    }
}

impl SyncTrajectory {
    /// Plan a trajectory.
    ///
    /// `speed_factor` must lie in `[MIN_SPEED_FACTOR, 1]`; callers validate it
    /// at configure time and check [`is_feasible`](Self::is_feasible) after.
    pub fn new(speed_factor: f64, q_start: [f64; NUM_JOINTS], q_goal: [f64; NUM_JOINTS]) -> Self {
        let mut dq_max = [0.0; NUM_JOINTS];
        let mut ddq_start = [0.0; NUM_JOINTS];
        let mut ddq_goal = [0.0; NUM_JOINTS];
        let mut delta_q = [0.0; NUM_JOINTS];
        for i in 0..NUM_JOINTS {
            dq_max[i] = MAX_JOINT_VELOCITY[i] * speed_factor;
            ddq_start[i] = MAX_JOINT_ACCELERATION_START[i] * speed_factor;
            ddq_goal[i] = MAX_JOINT_ACCELERATION_GOAL[i] * speed_factor;
            delta_q[i] = q_goal[i] - q_start[i];
        }

        // ── Unsynchronized per-joint duration ───────────────────
        let mut t_f = [0.0; NUM_JOINTS];
        for i in 0..NUM_JOINTS {
            let dist = delta_q[i].abs();
            if dist <= MOTION_FINISHED_EPS {
                continue;
            }
            let mut dq_reach = dq_max[i];
            // Too short to reach the velocity limit: triangular-like profile.
            let min_dist = 0.75 * dq_max[i] * dq_max[i] / ddq_start[i]
                + 0.75 * dq_max[i] * dq_max[i] / ddq_goal[i];
            if dist < min_dist {
                dq_reach = (4.0 / 3.0 * dist * (ddq_start[i] * ddq_goal[i])
                    / (ddq_start[i] + ddq_goal[i]))
                    .sqrt();
            }
            let t_1 = 1.5 * dq_reach / ddq_start[i];
            let delta_t_2 = 1.5 * dq_reach / ddq_goal[i];
            t_f[i] = t_1 / 2.0 + delta_t_2 / 2.0 + dist / dq_reach;
        }
        let max_t_f = t_f.iter().copied().fold(0.0, f64::max);

        // ── Synchronize every moving joint to max_t_f ───────────
        let mut traj = Self {
            q_start,
            delta_q,
            dq_max_sync: [0.0; NUM_JOINTS],
            t_1_sync: [0.0; NUM_JOINTS],
            t_2_sync: [0.0; NUM_JOINTS],
            t_f_sync: [0.0; NUM_JOINTS],
            q_1: [0.0; NUM_JOINTS],
            duration: 0.0,
        };
        for i in 0..NUM_JOINTS {
            let dist = delta_q[i].abs();
            if dist <= MOTION_FINISHED_EPS {
                continue;
            }
            let a = 0.75 * (ddq_goal[i] + ddq_start[i]);
            let b = -max_t_f * ddq_goal[i] * ddq_start[i];
            let c = dist * ddq_goal[i] * ddq_start[i];
            let discriminant = (b * b - 4.0 * a * c).max(0.0);

            let v = (-b - discriminant.sqrt()) / (2.0 * a);
            let t_1 = 1.5 * v / ddq_start[i];
            let delta_t_2 = 1.5 * v / ddq_goal[i];
            let t_f = t_1 / 2.0 + delta_t_2 / 2.0 + dist / v;

            traj.dq_max_sync[i] = v;
            traj.t_1_sync[i] = t_1;
            traj.t_f_sync[i] = t_f;
            traj.t_2_sync[i] = t_f - delta_t_2;
            traj.q_1[i] = v * sign(delta_q[i]) * 0.5 * t_1;
        }
        // Equal to max_t_f up to rounding; use the synchronized values so
        // that sampling at `duration()` always reports finished.
        traj.duration = traj.t_f_sync.iter().copied().fold(0.0, f64::max);
        traj
    }

    /// Synchronized duration [s]. Zero when start and goal coincide.
    #[inline]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// False when any moving joint ended up with a zero or non-finite peak
    /// velocity, i.e. the goal would never be reached.
    pub fn is_feasible(&self) -> bool {
        self.duration.is_finite()
            && (0..NUM_JOINTS).all(|i| {
                self.delta_q[i].abs() <= MOTION_FINISHED_EPS
                    || (self.dq_max_sync[i].is_finite() && self.dq_max_sync[i] > 0.0)
            })
    }

    /// Goal pose.
    pub fn goal(&self) -> [f64; NUM_JOINTS] {
        let mut goal = self.q_start;
        for (g, d) in goal.iter_mut().zip(&self.delta_q) {
            *g += d;
        }
        goal
    }

    /// Desired positions at trajectory time `t` [s] (negative `t` = start).
    pub fn sample(&self, t: f64) -> TrajectorySample {
        let t = t.max(0.0);
        let mut positions = self.q_start;
        let mut finished = true;

        for i in 0..NUM_JOINTS {
            let delta = self.delta_q[i];
            if delta.abs() <= MOTION_FINISHED_EPS {
                continue;
            }
            let s = sign(delta);
            let v = self.dq_max_sync[i];
            let t_1 = self.t_1_sync[i];
            let t_2 = self.t_2_sync[i];
            let t_f = self.t_f_sync[i];

            let offset = if t < t_1 {
                finished = false;
                -1.0 / t_1.powi(3) * v * s * (0.5 * t - t_1) * t.powi(3)
            } else if t < t_2 {
                finished = false;
                self.q_1[i] + (t - t_1) * v * s
            } else if t < t_f {
                finished = false;
                let t_d = t_2 - t_1;
                let delta_t_2 = t_f - t_2;
                let tau = t - t_1 - t_d;
                delta
                    + 0.5
                        * (1.0 / delta_t_2.powi(3) * (tau - 2.0 * delta_t_2) * tau.powi(3)
                            + (2.0 * tau - delta_t_2))
                        * v
                        * s
            } else {
                delta
            };
            positions[i] += offset;
        }

        TrajectorySample {
            positions,
            finished,
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
