//! PID regulator over wires.
//!
//! The error input arrives through a [`FloatWire`] (typically "target minus
//! sensor"), the compensating power leaves through one. Zero `ki` disables
//! the integral term; zero `kd` disables the derivative. The regulator is a
//! plain recurrence stepped once per tick by whatever process owns it —
//! it is a collaborator of the scheduling engine, not part of it.

use std::cell::RefCell;
use std::rc::Rc;

use takt_core::prelude::{FloatWire, Time};

/// PID gains.
#[derive(Debug, Clone, Copy)]
pub struct PidGains {
    /// Proportional gain.
    pub kp: f64,
    /// Integral gain (0 = disabled).
    pub ki: f64,
    /// Derivative gain (0 = disabled).
    pub kd: f64,
    /// Symmetric clamp on the integral accumulator (0 = unclamped).
    pub integral_limit: f64,
}

impl Default for PidGains {
    fn default() -> Self {
        // Line-follow defaults carried over from field tuning.
        Self {
            kp: 0.4,
            ki: 0.00001,
            kd: 1.2,
            integral_limit: 0.0,
        }
    }
}

/// PID regulator state.
///
/// Call [`Pid::update`] once per tick; read the result via [`Pid::power`]
/// or a wire from [`Pid::power_wire`]. Reset on mode changes so a stale
/// integral or derivative never kicks the next maneuver.
pub struct Pid {
    gains: PidGains,
    error_wire: FloatWire,
    last_error: f64,
    integral: f64,
    last_update: Option<Time>,
    power: f64,
}

impl Pid {
    /// Regulator with the given gains and a zero error input.
    pub fn new(gains: PidGains) -> Self {
        Self {
            gains,
            error_wire: FloatWire::constant(0.0),
            last_error: 0.0,
            integral: 0.0,
            last_update: None,
            power: 0.0,
        }
    }

    /// Current gains.
    #[inline]
    pub fn gains(&self) -> PidGains {
        self.gains
    }

    /// Replace the gains at runtime.
    pub fn set_gains(&mut self, gains: PidGains) {
        self.gains = gains;
    }

    /// Connect the error input. The wire is read once per update.
    pub fn set_error(&mut self, error_wire: FloatWire) {
        self.error_wire = error_wire;
    }

    /// Error value as of the last update.
    #[inline]
    pub fn error(&self) -> f64 {
        self.last_error
    }

    /// Compensating power as of the last update.
    #[inline]
    pub fn power(&self) -> f64 {
        self.power
    }

    /// Step the recurrence with the tick timestamp.
    ///
    /// The first update after construction (or [`Pid::reset`]) has no
    /// history: the derivative term is zero and nothing is integrated.
    pub fn update(&mut self, now: Time) {
        let error = self.error_wire.value();

        let (p, i, d) = match self.last_update {
            Some(last) => {
                let dt = now - last;
                if dt > 0.0 {
                    if self.gains.ki != 0.0 {
                        self.integral += error * dt;
                        if self.gains.integral_limit > 0.0 {
                            self.integral = self
                                .integral
                                .clamp(-self.gains.integral_limit, self.gains.integral_limit);
                        }
                    }
                    (
                        self.gains.kp * error,
                        self.gains.ki * self.integral,
                        self.gains.kd * (error - self.last_error) / dt,
                    )
                } else {
                    // Repeated timestamp: hold the derivative, keep P fresh.
                    (self.gains.kp * error, self.gains.ki * self.integral, 0.0)
                }
            }
            None => (self.gains.kp * error, 0.0, 0.0),
        };

        self.power = p + i + d;
        self.last_error = error;
        self.last_update = Some(now);
    }

    /// Clear integral, derivative history, and output.
    pub fn reset(&mut self) {
        self.last_error = 0.0;
        self.integral = 0.0;
        self.last_update = None;
        self.power = 0.0;
    }
}

/// Expose a shared regulator's output as a wire.
///
/// The wire reads the power computed by the most recent [`Pid::update`];
/// it does not step the regulator itself.
pub fn power_wire(pid: &Rc<RefCell<Pid>>) -> FloatWire {
    let pid = Rc::clone(pid);
    FloatWire::new(move || pid.borrow().power())
}

// ─── Tests ──────────────────────────────────────────────────────────
