//! Simulator integration tests: config file round-trip, and the shipped
//! mission driven end-to-end on a scripted clock.

use std::fs;

use tempfile::TempDir;

use takt_core::prelude::*;
use takt_sim::config::{load_config, ConfigError, SimConfig};
use takt_sim::mission::{mission, Rover};

const CONFIG: &str = r#"
[sim]
tick_time_us = 10000

[motors]
max_power = 100.0
encoder_gain = 1000.0

[pid]
kp = 5.0
ki = 0.0001
kd = 0.5
integral_limit = 50.0

[mission]
cruise_power = 60.0
approach_degrees = 600
follow_seconds = 2.0
settle_seconds = 0.1
"#;

fn write_config(dir: &TempDir, text: &str) -> std::path::PathBuf {
    let path = dir.path().join("sim.toml");
    fs::write(&path, text).unwrap();
    path
}

fn scripted_runner(rover: &Rover) -> Runner {
    let mut t = -0.01;
    let refresh_bus = rover.bus.clone();
    let flush_bus = rover.bus.clone();
    Runner::with_clock(move || {
        t += 0.01;
        t
    })
    .on_refresh(move |now| refresh_bus.refresh_all(now))
    .on_flush(move |now| flush_bus.flush_all(now))
}

#[test]
fn config_loads_from_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, CONFIG);
    let config = load_config(&path).unwrap();
    assert_eq!(config.sim.tick_time_us, 10_000);
    assert_eq!(config.mission.approach_degrees, 600);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = load_config(&dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn invalid_file_is_rejected_with_validation_error() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, &CONFIG.replace("cruise_power = 60.0", "cruise_power = 0.0"));
    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Validation(_)));
}

#[test]
fn mission_runs_to_completion_on_the_scripted_clock() {
    let config: SimConfig = takt_sim::config::load_config_from_str(CONFIG).unwrap();
    let rover = Rover::new(&config);
    // Start the follow leg off-center so the regulator has work to do.
    rover.track.borrow().displace(6.0);

    let mut runner = scripted_runner(&rover);
    let ticks = runner.run(mission(&rover, &config));

    // settle + approach (600 deg at 60% ≈ 100 ticks) + settle + follow
    // (2 s = 200 ticks) + back-away + stop: the run lands in a narrow band.
    assert!((320..=430).contains(&(ticks as i32)), "ticks = {ticks}");
    assert!(rover.left.borrow().encoder() >= config.mission.approach_degrees);
    assert_eq!(rover.left.borrow().speed(), 0.0);
    assert_eq!(rover.right.borrow().speed(), 0.0);
    assert!(rover.track.borrow().offset().abs() < 2.0);
    assert_eq!(runner.stats().completed_processes, 1);
}

#[test]
fn mission_tree_reports_progress_through_shared_handles() {
    let config: SimConfig = takt_sim::config::load_config_from_str(CONFIG).unwrap();
    let rover = Rover::new(&config);

    // The application keeps its own handle on a leaf inside the tree and
    // reads it after the run.
    let marker = share(LambdaProcess::new(|_| false));
    let tree = mission(&rover, &config).then(marker.clone());

    let mut runner = scripted_runner(&rover);
    runner.run(tree);
    assert!(marker.borrow_mut().is_completed(0.0));
}
