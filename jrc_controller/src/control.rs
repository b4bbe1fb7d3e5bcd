//! Control engine: PD law and start-pose trajectory.
//!
//! Pure functions over fixed-size joint arrays; no allocation.

pub mod pd;
pub mod trajectory;
