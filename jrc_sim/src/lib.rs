//! # JRC Simulation Host
//!
//! Runs the joint return controller against a simulated 7-joint arm.
//!
//! ## Modules
//!
//! - **arm**: [`arm::SimulatedArm`], per-joint rigid-body model exporting
//!   position/velocity state and one command interface per joint
//! - **config**: `jrc_sim.toml` loading and validation
//! - **cycle**: cycle statistics and RT thread setup (`rt` feature)
//! - **manager**: [`manager::ControllerManager`], lifecycle driving and the
//!   read → update → write cycle
//! - **report**: JSON run summary

pub mod arm;
pub mod config;
pub mod cycle;
pub mod manager;
pub mod report;
