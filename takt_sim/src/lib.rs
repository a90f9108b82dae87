//! # TAKT Simulator
//!
//! Driver application for the TAKT process engine: a simulated
//! differential-drive rover whose devices marshal values through wires,
//! composed into a demo mission and driven by the paced tick runner.
//!
//! The binary (`takt_sim`) loads a TOML configuration, wires the device
//! bus onto the runner's refresh/flush hooks, and executes the mission.

pub mod config;
pub mod devices;
pub mod mission;
pub mod rt;
