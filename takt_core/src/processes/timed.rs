//! Delay + fixed-duration leaf process.

use crate::process::{Process, Time};

/// Leaf process active for a fixed time window.
///
/// The window opens `delay` seconds after the start timestamp (captured in
/// `on_started`) and closes `delay + duration` seconds after it. The wrapped
/// closure fires once per tick while the window is open, including on the
/// tick that closes it; completion is latched after that final invocation.
///
/// With a no-op closure and zero delay this is a pure timer — see
/// [`TimeProcess::wait`].
pub struct TimeProcess {
    update_fn: Box<dyn FnMut(Time)>,
    completed_fn: Option<Box<dyn FnMut(Time)>>,
    start_time: Option<Time>,
    delay: Time,
    duration: Time,
    completed: bool,
}

impl TimeProcess {
    /// Run `update_fn` once per tick for `duration` seconds.
    pub fn new(duration: Time, update_fn: impl FnMut(Time) + 'static) -> Self {
        Self::with_delay(0.0, duration, update_fn)
    }

    /// Run `update_fn` once per tick for `duration` seconds, starting
    /// `delay` seconds after activation.
    pub fn with_delay(delay: Time, duration: Time, update_fn: impl FnMut(Time) + 'static) -> Self {
        Self {
            update_fn: Box::new(update_fn),
            completed_fn: None,
            start_time: None,
            delay,
            duration,
            completed: false,
        }
    }

    /// Pure timer: do nothing for `duration` seconds, then complete.
    pub fn wait(duration: Time) -> Self {
        Self::new(duration, |_| {})
    }

    /// Attach a terminal closure, invoked on `on_completed`.
    pub fn with_completion(mut self, completed_fn: impl FnMut(Time) + 'static) -> Self {
        self.completed_fn = Some(Box::new(completed_fn));
        self
    }

    fn window_elapsed(&self, now: Time) -> bool {
        match self.start_time {
            Some(start) => now - start >= self.delay + self.duration,
            None => false,
        }
    }
}

impl Process for TimeProcess {
    fn on_started(&mut self, now: Time) {
        self.start_time = Some(now);
    }

    fn update(&mut self, now: Time) {
        let Some(start) = self.start_time else {
            return;
        };
        if self.completed || now - start < self.delay {
            return;
        }
        (self.update_fn)(now);
        // Latch after firing: the closure sees the completing tick.
        if self.window_elapsed(now) {
            self.completed = true;
        }
    }

    fn on_completed(&mut self, now: Time) {
        if let Some(hook) = self.completed_fn.as_mut() {
            hook(now);
        }
    }

    fn is_completed(&mut self, now: Time) -> bool {
        if !self.completed && self.window_elapsed(now) {
            self.completed = true;
        }
        self.completed
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
