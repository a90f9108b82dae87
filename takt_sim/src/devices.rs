//! Simulated device bindings.
//!
//! Devices marshal values between the process tree and the simulated plant
//! through wires: a motor reads its commanded power from a wire at
//! output-flush time, sensors expose their readings as wires latched at
//! input-refresh time. Processes never touch a device type directly — they
//! read and write wires, which is what keeps the engine decoupled from any
//! concrete hardware.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use takt_core::prelude::{FloatWire, IntWire, Time};

// ─── Device Contract ────────────────────────────────────────────────

/// One simulated device on the tick loop.
///
/// `refresh` runs before the tree's update (latch inputs), `flush` after it
/// (apply outputs). Both default to no-ops.
pub trait Device {
    fn refresh(&mut self, _now: Time) {}
    fn flush(&mut self, _now: Time) {}
}

/// Registry of devices serviced by the runner's hooks, in attach order.
#[derive(Default)]
pub struct DeviceBus {
    devices: Vec<Rc<RefCell<dyn Device>>>,
}

impl DeviceBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, device: Rc<RefCell<dyn Device>>) {
        self.devices.push(device);
    }

    pub fn refresh_all(&self, now: Time) {
        for device in &self.devices {
            device.borrow_mut().refresh(now);
        }
    }

    pub fn flush_all(&self, now: Time) {
        for device in &self.devices {
            device.borrow_mut().flush(now);
        }
    }
}

// ─── Motor ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
struct MotorState {
    /// Accumulated shaft angle [deg].
    encoder: f64,
    /// Shaft speed [deg/s].
    speed: f64,
}

/// Simulated motor: commanded through a power wire, observed through
/// encoder and speed wires.
///
/// The plant is first order and instant: at flush, the commanded power is
/// clamped and becomes shaft speed, and the encoder integrates it over the
/// time since the previous flush.
pub struct SimMotor {
    name: &'static str,
    command: FloatWire,
    max_power: f64,
    encoder_gain: f64,
    state: Rc<Cell<MotorState>>,
    last_flush: Option<Time>,
}

impl SimMotor {
    /// Motor clamped to `max_power` [%], turning `encoder_gain` deg/s at
    /// full power.
    pub fn new(name: &'static str, max_power: f64, encoder_gain: f64) -> Self {
        Self {
            name,
            command: FloatWire::constant(0.0),
            max_power,
            encoder_gain,
            state: Rc::new(Cell::new(MotorState::default())),
            last_flush: None,
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Command a fixed power [%]. Replaces any previously set wire.
    pub fn set_power(&mut self, power: f64) {
        self.command.set_value(power);
    }

    /// Command power from a wire, read once per flush.
    pub fn set_power_wire(&mut self, wire: FloatWire) {
        self.command = wire;
    }

    /// Shorthand for commanding zero power.
    pub fn stop(&mut self) {
        self.set_power(0.0);
    }

    /// Power currently on the command wire [%], before clamping. Applied to
    /// the plant at the next flush.
    #[inline]
    pub fn commanded_power(&self) -> f64 {
        self.command.value()
    }

    /// Current encoder value [deg].
    #[inline]
    pub fn encoder(&self) -> i32 {
        self.state.get().encoder as i32
    }

    /// Current shaft speed [deg/s].
    #[inline]
    pub fn speed(&self) -> f64 {
        self.state.get().speed
    }

    /// Live encoder wire [deg].
    pub fn encoder_wire(&self) -> IntWire {
        let state = self.state.clone();
        IntWire::new(move || state.get().encoder as i32)
    }

    /// Live speed wire [deg/s].
    pub fn speed_wire(&self) -> FloatWire {
        let state = self.state.clone();
        FloatWire::new(move || state.get().speed)
    }
}

impl Device for SimMotor {
    fn flush(&mut self, now: Time) {
        let power = self
            .command
            .value()
            .clamp(-self.max_power, self.max_power);
        let speed = power / 100.0 * self.encoder_gain;

        let dt = match self.last_flush {
            Some(last) => (now - last).max(0.0),
            None => 0.0,
        };
        let mut state = self.state.get();
        state.encoder += speed * dt;
        state.speed = speed;
        self.state.set(state);
        self.last_flush = Some(now);
    }
}

// ─── Line Sensors ───────────────────────────────────────────────────

/// Which side of the line a sensor sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Simulated track under a two-sensor line follower.
///
/// The model is linearized: the lateral offset from the line center grows
/// with the speed difference of the two wheels, and each reflectance
/// reading is the 0–100 mid-gray value shifted by the offset — positive
/// offset brightens the right sensor and darkens the left one, so
/// `right − left` is a signed error usable directly as a PID input.
pub struct SimTrack {
    left_speed: FloatWire,
    right_speed: FloatWire,
    steer_gain: f64,
    offset: Rc<Cell<f64>>,
    last_refresh: Option<Time>,
}

impl SimTrack {
    /// Track observing the two drive motors. `steer_gain` converts the
    /// wheel-speed difference [deg/s] into offset drift [units/s].
    pub fn new(left: &SimMotor, right: &SimMotor, steer_gain: f64) -> Self {
        Self {
            left_speed: left.speed_wire(),
            right_speed: right.speed_wire(),
            steer_gain,
            offset: Rc::new(Cell::new(0.0)),
            last_refresh: None,
        }
    }

    /// Displace the robot sideways (e.g. to seed the follow leg).
    pub fn displace(&self, amount: f64) {
        self.offset.set(self.offset.get() + amount);
    }

    /// Current lateral offset [units]; zero means centered on the line.
    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset.get()
    }

    /// Live reflectance wire for one sensor, 0–100.
    pub fn reflectance_wire(&self, side: Side) -> FloatWire {
        let offset = self.offset.clone();
        let sign = match side {
            Side::Left => -1.0,
            Side::Right => 1.0,
        };
        FloatWire::new(move || (50.0 + sign * offset.get()).clamp(0.0, 100.0))
    }
}

impl Device for SimTrack {
    fn refresh(&mut self, now: Time) {
        let dt = match self.last_refresh {
            Some(last) => (now - last).max(0.0),
            None => 0.0,
        };
        let drift = self.steer_gain * (self.right_speed.value() - self.left_speed.value());
        self.offset.set(self.offset.get() + drift * dt);
        self.last_refresh = Some(now);
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motor_integrates_power_between_flushes() {
        let mut motor = SimMotor::new("left", 100.0, 1000.0);
        motor.set_power(50.0);
        motor.flush(0.0); // establishes the epoch, no elapsed time yet
        motor.flush(1.0);
        // 50% of 1000 deg/s over 1 s.
        assert_eq!(motor.encoder(), 500);
        assert_eq!(motor.speed(), 500.0);
    }

    #[test]
    fn motor_clamps_command() {
        let mut motor = SimMotor::new("left", 80.0, 1000.0);
        motor.set_power(200.0);
        motor.flush(0.0);
        assert_eq!(motor.speed(), 800.0);
        motor.set_power(-200.0);
        motor.flush(0.5);
        assert_eq!(motor.speed(), -800.0);
    }

    #[test]
    fn encoder_wire_is_live() {
        let mut motor = SimMotor::new("right", 100.0, 1000.0);
        let encoder = motor.encoder_wire();
        assert_eq!(encoder.value(), 0);
        motor.set_power(100.0);
        motor.flush(0.0);
        motor.flush(0.25);
        assert_eq!(encoder.value(), 250);
    }

    #[test]
    fn power_wire_is_read_at_flush_time() {
        let level = Rc::new(Cell::new(0.0));
        let l = level.clone();
        let mut motor = SimMotor::new("left", 100.0, 1000.0);
        motor.set_power_wire(FloatWire::new(move || l.get()));
        motor.flush(0.0);
        assert_eq!(motor.speed(), 0.0);
        level.set(30.0);
        motor.flush(1.0);
        assert_eq!(motor.speed(), 300.0);
    }

    #[test]
    fn track_drifts_with_wheel_speed_difference() {
        let mut left = SimMotor::new("left", 100.0, 1000.0);
        let mut right = SimMotor::new("right", 100.0, 1000.0);
        let mut track = SimTrack::new(&left, &right, 0.01);

        left.set_power(40.0);
        right.set_power(60.0);
        track.refresh(0.0);
        left.flush(0.0);
        right.flush(0.0);
        track.refresh(1.0);
        // drift = 0.01 * (600 - 400) = 2 units/s.
        assert!((track.offset() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn reflectance_splits_around_mid_gray() {
        let left = SimMotor::new("left", 100.0, 1000.0);
        let right = SimMotor::new("right", 100.0, 1000.0);
        let track = SimTrack::new(&left, &right, 0.01);
        track.displace(10.0);

        let l = track.reflectance_wire(Side::Left);
        let r = track.reflectance_wire(Side::Right);
        assert_eq!(l.value(), 40.0);
        assert_eq!(r.value(), 60.0);
        // Error wire in the usual "right minus left" form.
        let error = r - l;
        assert_eq!(error.value(), 20.0);
    }

    #[test]
    fn reflectance_saturates() {
        let left = SimMotor::new("left", 100.0, 1000.0);
        let right = SimMotor::new("right", 100.0, 1000.0);
        let track = SimTrack::new(&left, &right, 0.01);
        track.displace(500.0);
        assert_eq!(track.reflectance_wire(Side::Right).value(), 100.0);
        assert_eq!(track.reflectance_wire(Side::Left).value(), 0.0);
    }

    #[test]
    fn bus_services_devices_in_attach_order() {
        let mut bus = DeviceBus::new();
        let motor = Rc::new(RefCell::new(SimMotor::new("left", 100.0, 1000.0)));
        motor.borrow_mut().set_power(100.0);
        bus.attach(motor.clone());
        bus.flush_all(0.0);
        bus.flush_all(2.0);
        assert_eq!(motor.borrow().encoder(), 2000);
    }
}
