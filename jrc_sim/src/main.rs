//! # JRC Simulation Binary
//!
//! Loads `jrc_sim.toml`, builds a simulated arm and a joint return controller,
//! drives it through configure → activate → N cycles → deactivate → cleanup
//! and optionally writes a JSON run report.
//!
//! # Usage
//!
//! ```bash
//! # Default config, as fast as possible
//! jrc_sim
//!
//! # Wall-clock pacing, verbose, report
//! jrc_sim --config config/jrc_sim.toml --realtime -v --report run.json
//! ```

#![deny(warnings)]

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use clap::Parser;
use jrc_common::config::{ConfigLoader, LogLevel};
use jrc_common::consts::DEFAULT_CONFIG_PATH;
use jrc_controller::JointReturnController;
use jrc_sim::arm::SimulatedArm;
use jrc_sim::config::SimConfig;
use jrc_sim::manager::ControllerManager;
use jrc_sim::report::RunReport;
use tracing::{Level, error, info, warn};
use tracing_subscriber::EnvFilter;

/// JRC Sim - joint return controller on a simulated 7-joint arm
#[derive(Parser, Debug)]
#[command(name = "jrc_sim")]
#[command(version)]
#[command(about = "Runs the joint return controller against a simulated arm")]
#[command(long_about = None)]
struct Args {
    /// Path to simulation config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Number of cycles to run (overrides [simulation].cycles)
    #[arg(short = 'n', long)]
    cycles: Option<u64>,

    /// Pace cycles at wall-clock rate instead of running flat out
    #[arg(long)]
    realtime: bool,

    /// Write a JSON run report to this path
    #[arg(long, value_name = "FILE")]
    report: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long)]
    json: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if let Err(e) = run() {
        error!("jrc_sim failed: {}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Config decides the default log level, so load it before tracing is up
    // and report a load failure afterwards.
    let loaded = SimConfig::load(&args.config);
    let log_level = loaded
        .as_ref()
        .map(|c| c.shared.log_level)
        .unwrap_or_default();
    setup_tracing(&args, log_level);

    info!("JRC Sim v{} starting...", env!("CARGO_PKG_VERSION"));
    let config = loaded.map_err(|e| format!("{}: {e}", args.config.display()))?;
    config.validate()?;
    info!("Loaded config from {:?}", args.config);

    let arm = SimulatedArm::new(&config.simulation)?;
    let controller = JointReturnController::default();
    let mut manager = ControllerManager::new(arm, controller);

    manager.configure(&config.controller)?;
    manager.activate()?;
    if let Some(duration) = manager.controller().trajectory_duration() {
        info!("Start-pose trajectory planned: {:.3}s", duration.as_secs_f64());
    }

    let running = Arc::new(AtomicBool::new(true));
    let flag = Arc::clone(&running);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        flag.store(false, Ordering::SeqCst);
    })?;

    let cycles = args.cycles.unwrap_or(config.simulation.cycles);
    let period = Duration::from_micros(config.simulation.cycle_time_us);
    let outcome = manager.run(cycles, period, &running, args.realtime);

    let (executed, run_error) = match &outcome {
        Ok(n) => (*n, None),
        Err(e) => {
            error!("Cycle loop error: {e}");
            (manager.stats().cycle_count, Some(e.to_string()))
        }
    };

    let report = RunReport::collect(&config.shared.service_name, &manager, executed, run_error);
    info!(
        cycles = report.cycles,
        sim_time_s = report.sim_time_s,
        motion_finished = report.motion_finished,
        "Run finished: max goal error {:?} rad, avg cycle {}ns, max {}ns",
        report.max_goal_error,
        report.stats.avg_cycle_ns(),
        report.stats.max_cycle_ns
    );
    if let Some(path) = &args.report {
        report.write(path)?;
        info!("Report written to {:?}", path);
    }

    if let Err(e) = manager.deactivate() {
        warn!("Deactivate failed: {e}");
    }
    manager.cleanup()?;

    outcome?;
    info!("JRC Sim shutdown complete");
    Ok(())
}

/// Setup tracing subscriber based on CLI arguments and config.
fn setup_tracing(args: &Args, config_level: LogLevel) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        config_level.into()
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
