//! # TAKT Simulator
//!
//! Runs the demo mission on the simulated rover: load and validate the
//! TOML config, optionally apply RT scheduling, wire the device bus onto
//! the tick runner, and drive the mission tree to completion.

use std::path::PathBuf;
use std::process;
use std::time::Duration;

use clap::Parser;
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

use takt_core::prelude::*;
use takt_sim::config::load_config;
use takt_sim::mission::{mission, Rover};
use takt_sim::rt::rt_setup;

/// TAKT Simulator — simulated rover on the cooperative tick engine
#[derive(Parser, Debug)]
#[command(name = "takt_sim")]
#[command(version)]
#[command(about = "Simulated rover mission on the TAKT process engine")]
struct Args {
    /// Path to the simulator configuration TOML.
    #[arg(default_value = "config/sim.toml")]
    config: PathBuf,

    /// Override the configured tick interval [µs].
    #[arg(long, value_name = "MICROS")]
    tick_time_us: Option<u32>,

    /// CPU core to pin the tick loop to (rt feature only).
    #[arg(long, default_value_t = 1)]
    cpu_core: usize,

    /// SCHED_FIFO priority (rt feature only).
    #[arg(long, default_value_t = 80)]
    rt_priority: i32,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    setup_tracing(&args);

    info!("TAKT Simulator v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("TAKT Simulator run complete");
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = load_config(&args.config)?;
    if let Some(tick_time_us) = args.tick_time_us {
        config.sim.tick_time_us = tick_time_us;
        config.validate().map_err(|e| format!("tick override: {e}"))?;
    }
    info!(
        "Config OK: tick_time={}µs, cruise={}%, follow={}s",
        config.sim.tick_time_us, config.mission.cruise_power, config.mission.follow_seconds,
    );

    rt_setup(args.cpu_core, args.rt_priority)?;

    let rover = Rover::new(&config);
    let tree = mission(&rover, &config);

    let refresh_bus = rover.bus.clone();
    let flush_bus = rover.bus.clone();
    let mut runner = Runner::new()
        .paced(Duration::from_micros(config.sim.tick_time_us as u64))
        .on_refresh(move |now| refresh_bus.refresh_all(now))
        .on_flush(move |now| flush_bus.flush_all(now));

    info!("Mission tree built, entering tick loop");
    let ticks = runner.run(tree);

    let stats = runner.stats();
    info!(
        ticks,
        overruns = stats.overruns,
        avg_tick_us = stats.avg_tick_ns() / 1_000,
        max_tick_us = stats.max_tick_ns / 1_000,
        left_encoder = rover.left.borrow().encoder(),
        right_encoder = rover.right.borrow().encoder(),
        "mission complete"
    );

    Ok(())
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
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
