//! TOML configuration loader with validation.
//!
//! Loads [`SimConfig`] from a single TOML file and validates parameter
//! bounds before anything is constructed from it: tick time, motor limits,
//! PID gains, and mission geometry.

use std::path::Path;

use serde::Deserialize;

// ─── Error Type ─────────────────────────────────────────────────────

/// Configuration loading/validation error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File I/O error.
    #[error("config I/O error: {0}")]
    Io(String),
    /// TOML parse error.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Parameter validation error.
    #[error("config validation: {0}")]
    Validation(String),
}

// ─── Config Tables ──────────────────────────────────────────────────

/// Tick loop settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimSection {
    /// Tick interval [µs].
    #[serde(default = "default_tick_time_us")]
    pub tick_time_us: u32,
}

fn default_tick_time_us() -> u32 {
    10_000
}

/// Simulated drivetrain settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MotorSection {
    /// Power clamp, symmetric [% of full].
    #[serde(default = "default_max_power")]
    pub max_power: f64,
    /// Shaft speed at full power [encoder degrees/s].
    #[serde(default = "default_encoder_gain")]
    pub encoder_gain: f64,
}

fn default_max_power() -> f64 {
    100.0
}

fn default_encoder_gain() -> f64 {
    1000.0
}

/// Line-follow regulator gains.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PidSection {
    pub kp: f64,
    pub ki: f64,
    pub kd: f64,
    /// Symmetric integral clamp (0 = unclamped).
    #[serde(default)]
    pub integral_limit: f64,
}

/// Demo mission geometry and pacing.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MissionSection {
    /// Cruise power for drive segments [%].
    pub cruise_power: f64,
    /// Encoder distance of the approach segment [degrees].
    pub approach_degrees: i32,
    /// Line-follow leg duration [s].
    pub follow_seconds: f64,
    /// Settle pause between legs [s].
    #[serde(default = "default_settle_seconds")]
    pub settle_seconds: f64,
}

fn default_settle_seconds() -> f64 {
    0.25
}

/// Complete validated configuration, ready for runtime use.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimConfig {
    pub sim: SimSection,
    pub motors: MotorSection,
    pub pid: PidSection,
    pub mission: MissionSection,
}

impl SimConfig {
    /// Validate parameter bounds. Returns the first violation found.
    pub fn validate(&self) -> Result<(), String> {
        if self.sim.tick_time_us == 0 {
            return Err("sim.tick_time_us must be > 0".into());
        }
        if !(self.motors.max_power > 0.0 && self.motors.max_power <= 100.0) {
            return Err(format!(
                "motors.max_power must be in (0, 100], got {}",
                self.motors.max_power
            ));
        }
        if self.motors.encoder_gain <= 0.0 {
            return Err(format!(
                "motors.encoder_gain must be > 0, got {}",
                self.motors.encoder_gain
            ));
        }
        for (name, value) in [
            ("pid.kp", self.pid.kp),
            ("pid.ki", self.pid.ki),
            ("pid.kd", self.pid.kd),
            ("pid.integral_limit", self.pid.integral_limit),
        ] {
            if value < 0.0 {
                return Err(format!("{name} must be >= 0, got {value}"));
            }
        }
        if self.mission.cruise_power <= 0.0 || self.mission.cruise_power > self.motors.max_power {
            return Err(format!(
                "mission.cruise_power must be in (0, max_power], got {}",
                self.mission.cruise_power
            ));
        }
        if self.mission.approach_degrees == 0 {
            return Err("mission.approach_degrees must be non-zero".into());
        }
        if self.mission.follow_seconds <= 0.0 {
            return Err(format!(
                "mission.follow_seconds must be > 0, got {}",
                self.mission.follow_seconds
            ));
        }
        if self.mission.settle_seconds < 0.0 {
            return Err(format!(
                "mission.settle_seconds must be >= 0, got {}",
                self.mission.settle_seconds
            ));
        }
        Ok(())
    }
}

// ─── Loading Functions ──────────────────────────────────────────────

/// Load and validate the configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<SimConfig, ConfigError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::Io(format!("failed to read {}: {e}", path.display())))?;
    load_config_from_str(&text)
}

/// Load config from a TOML string (for testing).
pub fn load_config_from_str(text: &str) -> Result<SimConfig, ConfigError> {
    let config: SimConfig =
        toml::from_str(text).map_err(|e| ConfigError::Parse(e.to_string()))?;
    config.validate().map_err(ConfigError::Validation)?;
    Ok(config)
}

// ─── Tests ──────────────────────────────────────────────────────────
