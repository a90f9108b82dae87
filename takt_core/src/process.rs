//! Process tick contract and shared-handle support.
//!
//! A [`Process`] is one schedulable unit of work, driven cooperatively by a
//! tick loop: `on_started` once, then `update(t)` once per tick until
//! `is_completed(t)` reports true, then `on_completed` once. No call may
//! block; a process that needs to wait reports incomplete across many ticks.
//!
//! Ownership is reference counted: [`share`] wraps a process in
//! `Rc<RefCell<…>>`, and shared handles implement [`Process`] themselves, so
//! the same leaf can sit inside a composition tree while the application
//! keeps a handle to inspect it after the tree finishes. Everything runs on
//! one logical thread; there are no locks.

use std::cell::RefCell;
use std::rc::Rc;

/// Timestamp in seconds since the driver's epoch.
///
/// Monotonically non-decreasing across the ticks delivered to one process.
pub type Time = f64;

// ─── Tick Contract ──────────────────────────────────────────────────

/// One schedulable unit of work.
///
/// Default behavior is the no-op process: `is_completed` is immediately
/// true, the lifecycle hooks do nothing. Implementors override the subset
/// they need. A closure passed to a process must not re-enter the process
/// that owns it through a shared handle — the handle is already mutably
/// borrowed for the duration of the call.
pub trait Process {
    /// Called once, before the first `update`.
    fn on_started(&mut self, _now: Time) {}

    /// Called once per tick while the process is running.
    fn update(&mut self, _now: Time) {}

    /// Called once, after the driver first observes completion.
    fn on_completed(&mut self, _now: Time) {}

    /// Completion predicate. Once reported true to a driver, the process
    /// receives no further `update` calls.
    fn is_completed(&mut self, _now: Time) -> bool {
        true
    }
}

/// Type-erased, reference-counted process handle.
pub type SharedProcess = Rc<RefCell<dyn Process>>;

/// Wrap a process in a shared handle.
///
/// The concrete type is preserved so the caller can keep a clone and read
/// results out of the leaf after the tree completes.
pub fn share<P: Process>(process: P) -> Rc<RefCell<P>> {
    Rc::new(RefCell::new(process))
}

/// A shared handle ticks the process it refers to.
impl<P: Process + ?Sized> Process for Rc<RefCell<P>> {
    fn on_started(&mut self, now: Time) {
        self.borrow_mut().on_started(now);
    }

    fn update(&mut self, now: Time) {
        self.borrow_mut().update(now);
    }

    fn on_completed(&mut self, now: Time) {
        self.borrow_mut().on_completed(now);
    }

    fn is_completed(&mut self, now: Time) -> bool {
        self.borrow_mut().is_completed(now)
    }
}

impl<P: Process + ?Sized> Process for Box<P> {
    fn on_started(&mut self, now: Time) {
        (**self).on_started(now);
    }

    fn update(&mut self, now: Time) {
        (**self).update(now);
    }

    fn on_completed(&mut self, now: Time) {
        (**self).on_completed(now);
    }

    fn is_completed(&mut self, now: Time) -> bool {
        (**self).is_completed(now)
    }
}

// ─── Lifecycle Slot ─────────────────────────────────────────────────

/// Per-child lifecycle bookkeeping shared by the combinators and the runner.
///
/// The slot, not the process, owns the exactly-once guarantees: `on_started`
/// before any update, completion latched on first report, terminal hook
/// delivered once. Keeping the flags here means any caller-defined leaf gets
/// the full contract without carrying its own state.
pub(crate) struct Slot {
    process: Box<dyn Process>,
    started: bool,
    completed: bool,
    finished: bool,
}

impl Slot {
    pub(crate) fn new(process: impl Process + 'static) -> Self {
        Self {
            process: Box::new(process),
            started: false,
            completed: false,
            finished: false,
        }
    }

    /// Completion as last observed, without consulting the process.
    #[inline]
    pub(crate) fn completed(&self) -> bool {
        self.completed
    }

    /// Deliver `on_started` if it has not been delivered yet.
    pub(crate) fn ensure_started(&mut self, now: Time) {
        if !self.started {
            self.process.on_started(now);
            self.started = true;
        }
    }

    /// Consult the completion predicate, latching the first true report.
    pub(crate) fn poll_completed(&mut self, now: Time) -> bool {
        if !self.completed {
            self.completed = self.process.is_completed(now);
        }
        self.completed
    }

    /// Tick the process. Callers only invoke this while not completed.
    #[inline]
    pub(crate) fn update(&mut self, now: Time) {
        self.process.update(now);
    }

    /// Deliver the terminal hook if it has not been delivered yet.
    pub(crate) fn finish(&mut self, now: Time) {
        if !self.finished {
            self.process.on_completed(now);
            self.finished = true;
        }
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
