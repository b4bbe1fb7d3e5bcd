//! Lifecycle state machine.

pub mod lifecycle;
