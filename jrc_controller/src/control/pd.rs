//! Joint-space PD law with optional first-order velocity filter.
//!
//! The damping term acts on measured velocity only (no target velocity),
//! so a joint at rest on its target produces exactly zero output.

use jrc_common::consts::NUM_JOINTS;

/// Per-joint PD gains.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PdGains {
    /// Proportional (stiffness) gains.
    pub k: [f64; NUM_JOINTS],
    /// Damping gains.
    pub d: [f64; NUM_JOINTS],
}

/// One joint: `k · (target − position) − d · velocity`.
#[inline]
pub fn pd_compute(k: f64, d: f64, target: f64, position: f64, velocity: f64) -> f64 {
    k * (target - position) - d * velocity
}

/// All joints at once.
#[inline]
pub fn pd_compute_all(
    gains: &PdGains,
    target: &[f64; NUM_JOINTS],
    position: &[f64; NUM_JOINTS],
    velocity: &[f64; NUM_JOINTS],
) -> [f64; NUM_JOINTS] {
    let mut out = [0.0; NUM_JOINTS];
    for i in 0..NUM_JOINTS {
        out[i] = pd_compute(gains.k[i], gains.d[i], target[i], position[i], velocity[i]);
    }
    out
}

/// Exponential smoothing of measured joint velocity.
///
/// `filtered ← (1 − α) · filtered + α · measured`. With `α = 1` the filter
/// passes the measurement through unchanged.
#[derive(Debug, Clone, Copy)]
pub struct VelocityFilter {
    alpha: f64,
    filtered: [f64; NUM_JOINTS],
}

impl VelocityFilter {
    pub const fn new(alpha: f64) -> Self {
        Self {
            alpha,
            filtered: [0.0; NUM_JOINTS],
        }
    }

    #[inline]
    pub fn apply(&mut self, measured: &[f64; NUM_JOINTS]) -> [f64; NUM_JOINTS] {
        for (f, m) in self.filtered.iter_mut().zip(measured) {
            *f = (1.0 - self.alpha) * *f + self.alpha * m;
        }
        self.filtered
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
