//! Demo mission: composition of the simulated rover's run.
//!
//! Builds the process tree the binary executes: timed drive segments,
//! encoder-bounded approach, a PID line-follow leg raced against a timer,
//! and motor-stopping cleanup. Also home to the application-defined leaf
//! processes ([`WaitEncoder`], [`StopMotors`]) — the engine's `Process`
//! trait is the extension point, the mission only composes.

use std::cell::RefCell;
use std::rc::Rc;

use takt_control::{Pid, PidGains};
use takt_core::prelude::*;

use crate::config::SimConfig;
use crate::devices::{DeviceBus, Side, SimMotor, SimTrack};

/// Offset drift per unit wheel-speed difference [units per deg].
const TRACK_STEER_GAIN: f64 = 0.01;

/// Shaft speed below which a motor counts as stopped [deg/s].
const STOP_SPEED_THRESHOLD: f64 = 3.0;

// ─── Rover ──────────────────────────────────────────────────────────

/// The simulated rover: two drive motors, a two-sensor track model, and
/// the line-follow regulator, all pre-wired.
pub struct Rover {
    pub left: Rc<RefCell<SimMotor>>,
    pub right: Rc<RefCell<SimMotor>>,
    pub track: Rc<RefCell<SimTrack>>,
    pub pid: Rc<RefCell<Pid>>,
    pub bus: Rc<DeviceBus>,
}

impl Rover {
    /// Build the rover from a validated configuration.
    pub fn new(config: &SimConfig) -> Self {
        let left = Rc::new(RefCell::new(SimMotor::new(
            "left",
            config.motors.max_power,
            config.motors.encoder_gain,
        )));
        let right = Rc::new(RefCell::new(SimMotor::new(
            "right",
            config.motors.max_power,
            config.motors.encoder_gain,
        )));
        let track = Rc::new(RefCell::new(SimTrack::new(
            &left.borrow(),
            &right.borrow(),
            TRACK_STEER_GAIN,
        )));

        let mut pid = Pid::new(PidGains {
            kp: config.pid.kp,
            ki: config.pid.ki,
            kd: config.pid.kd,
            integral_limit: config.pid.integral_limit,
        });
        // Error convention: right minus left reflectance, zero on center.
        let t = track.borrow();
        pid.set_error(t.reflectance_wire(Side::Right) - t.reflectance_wire(Side::Left));
        drop(t);
        let pid = Rc::new(RefCell::new(pid));

        // The track integrates from motor speeds, so it refreshes first.
        let mut bus = DeviceBus::new();
        bus.attach(track.clone());
        bus.attach(left.clone());
        bus.attach(right.clone());

        Self {
            left,
            right,
            track,
            pid,
            bus: Rc::new(bus),
        }
    }
}

// ─── Application Leaves ─────────────────────────────────────────────

/// Complete once an encoder wire has traveled `target` degrees from where
/// it stood when the process started. Negative targets wait for reverse
/// travel.
pub struct WaitEncoder {
    encoder: IntWire,
    target: i32,
    start: Option<i32>,
}

impl WaitEncoder {
    pub fn new(encoder: IntWire, target: i32) -> Self {
        Self {
            encoder,
            target,
            start: None,
        }
    }
}

impl Process for WaitEncoder {
    fn on_started(&mut self, _now: Time) {
        self.start = Some(self.encoder.value());
    }

    fn is_completed(&mut self, _now: Time) -> bool {
        let Some(start) = self.start else {
            return false;
        };
        let traveled = self.encoder.value() - start;
        if self.target >= 0 {
            traveled >= self.target
        } else {
            traveled <= self.target
        }
    }
}

/// Cut power to both motors, complete once both shafts are at rest.
pub struct StopMotors {
    left: Rc<RefCell<SimMotor>>,
    right: Rc<RefCell<SimMotor>>,
}

impl StopMotors {
    pub fn new(left: Rc<RefCell<SimMotor>>, right: Rc<RefCell<SimMotor>>) -> Self {
        Self { left, right }
    }
}

impl Process for StopMotors {
    fn on_started(&mut self, _now: Time) {
        self.left.borrow_mut().stop();
        self.right.borrow_mut().stop();
    }

    fn is_completed(&mut self, _now: Time) -> bool {
        self.left.borrow().speed().abs() <= STOP_SPEED_THRESHOLD
            && self.right.borrow().speed().abs() <= STOP_SPEED_THRESHOLD
    }
}

// ─── Mission Legs ───────────────────────────────────────────────────

/// Drive both motors at `power` for `seconds`, cutting power afterwards.
pub fn drive_straight(rover: &Rover, power: f64, seconds: f64) -> TimeProcess {
    let (left, right) = (rover.left.clone(), rover.right.clone());
    let (left_end, right_end) = (rover.left.clone(), rover.right.clone());
    TimeProcess::new(seconds, move |_| {
        left.borrow_mut().set_power(power);
        right.borrow_mut().set_power(power);
    })
    .with_completion(move |_| {
        left_end.borrow_mut().stop();
        right_end.borrow_mut().stop();
    })
}

/// Drive straight until the left encoder travels `degrees`, then stop.
///
/// The drive leaf never completes on its own — the encoder watch wins the
/// race, and the group's terminal fan-out still reaches the drive leaf so
/// its cleanup runs.
pub fn drive_distance(rover: &Rover, power: f64, degrees: i32) -> Sequence {
    let (left, right) = (rover.left.clone(), rover.right.clone());
    let (left_end, right_end) = (rover.left.clone(), rover.right.clone());
    let drive = LambdaProcess::with_completion(
        move |_| {
            left.borrow_mut().set_power(power);
            right.borrow_mut().set_power(power);
            true
        },
        move |_| {
            left_end.borrow_mut().stop();
            right_end.borrow_mut().stop();
        },
    );
    let reached = WaitEncoder::new(rover.left.borrow().encoder_wire(), degrees);

    drive
        .or(reached)
        .then(StopMotors::new(rover.left.clone(), rover.right.clone()))
}

/// PID line follow for `seconds` at `base` power.
///
/// The steering leaf runs forever; the timer completes the group. Cleanup
/// on both branches stops the motors.
pub fn follow_line(rover: &Rover, base: f64, seconds: f64) -> Group {
    rover.pid.borrow_mut().reset();
    let pid = rover.pid.clone();
    let (left, right) = (rover.left.clone(), rover.right.clone());
    let (left_end, right_end) = (rover.left.clone(), rover.right.clone());

    let steer = LambdaProcess::with_completion(
        move |now| {
            let mut pid = pid.borrow_mut();
            pid.update(now);
            let correction = pid.power();
            left.borrow_mut().set_power(base + correction);
            right.borrow_mut().set_power(base - correction);
            true
        },
        move |_| {
            left_end.borrow_mut().stop();
            right_end.borrow_mut().stop();
        },
    );

    steer.or(TimeProcess::wait(seconds))
}

/// The full demo run: settle, approach by encoder, settle, follow the
/// line, back away, stop.
pub fn mission(rover: &Rover, config: &SimConfig) -> Sequence {
    let m = &config.mission;
    Sequence::new()
        .then(TimeProcess::wait(m.settle_seconds))
        .then(drive_distance(rover, m.cruise_power, m.approach_degrees))
        .then(TimeProcess::wait(m.settle_seconds))
        .then(follow_line(rover, m.cruise_power, m.follow_seconds))
        .then(drive_straight(rover, -m.cruise_power / 2.0, m.settle_seconds * 2.0))
        .then(StopMotors::new(rover.left.clone(), rover.right.clone()))
}

// ─── Tests ──────────────────────────────────────────────────────────
