//! Closure-driven leaf process.

use crate::process::{Process, Time};

/// Leaf process whose behavior lives in caller-supplied closures.
///
/// The update closure receives the tick timestamp and returns whether the
/// process should keep running. The first `false` latches completion
/// permanently; the closure is never invoked again. An optional terminal
/// closure runs when the owning driver delivers `on_completed`.
///
/// A closure that panics aborts the whole active tick — the engine offers
/// no isolation between siblings.
pub struct LambdaProcess {
    update_fn: Box<dyn FnMut(Time) -> bool>,
    completed_fn: Option<Box<dyn FnMut(Time)>>,
    completed: bool,
}

impl LambdaProcess {
    /// Process driven by `update_fn` until it returns `false`.
    pub fn new(update_fn: impl FnMut(Time) -> bool + 'static) -> Self {
        Self {
            update_fn: Box::new(update_fn),
            completed_fn: None,
            completed: false,
        }
    }

    /// Like [`LambdaProcess::new`], with a terminal closure.
    pub fn with_completion(
        update_fn: impl FnMut(Time) -> bool + 'static,
        completed_fn: impl FnMut(Time) + 'static,
    ) -> Self {
        Self {
            update_fn: Box::new(update_fn),
            completed_fn: Some(Box::new(completed_fn)),
            completed: false,
        }
    }
}

impl Process for LambdaProcess {
    fn update(&mut self, now: Time) {
        if !self.completed && !(self.update_fn)(now) {
            self.completed = true;
        }
    }

    fn on_completed(&mut self, now: Time) {
        if let Some(hook) = self.completed_fn.as_mut() {
            hook(now);
        }
    }

    fn is_completed(&mut self, _now: Time) -> bool {
        // Stored flag only — the closure is not re-consulted.
        self.completed
    }
}

// ─── Tests ──────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn completes_when_closure_returns_false() {
        let mut ticks = 0;
        let mut p = LambdaProcess::new(move |_| {
            ticks += 1;
            ticks < 3
        });
        assert!(!p.is_completed(0.0));
        p.update(0.0);
        p.update(1.0);
        assert!(!p.is_completed(1.0));
        p.update(2.0);
        assert!(p.is_completed(2.0));
    }

    #[test]
    fn closure_not_invoked_after_completion() {
        let calls = Rc::new(Cell::new(0u32));
        let c = calls.clone();
        let mut p = LambdaProcess::new(move |_| {
            c.set(c.get() + 1);
            false
        });
        p.update(0.0);
        p.update(1.0);
        p.update(2.0);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn terminal_closure_runs_on_completed() {
        let fired = Rc::new(Cell::new(false));
        let f = fired.clone();
        let mut p = LambdaProcess::with_completion(|_| false, move |_| f.set(true));
        p.update(0.0);
        assert!(p.is_completed(0.0));
        assert!(!fired.get());
        p.on_completed(0.0);
        assert!(fired.get());
    }

    #[test]
    fn closure_sees_tick_timestamps() {
        let last = Rc::new(Cell::new(0.0));
        let l = last.clone();
        let mut p = LambdaProcess::new(move |now| {
            l.set(now);
            true
        });
        p.update(0.5);
        assert_eq!(last.get(), 0.5);
        p.update(1.25);
        assert_eq!(last.get(), 1.25);
    }
}
