//! Tick driver: refresh inputs → update → flush outputs, until completion.
//!
//! The runner owns the loop discipline the process contract assumes:
//! `on_started` before the first update, one `update(t)` per tick with a
//! completion check against the same timestamp, and the terminal hook
//! exactly once after the first completed observation. Timestamps come from
//! a pluggable clock (monotonic by default, scripted in tests) and are
//! threaded explicitly through every call — there is no ambient time.
//!
//! Pacing is optional: with a tick interval set, the runner sleeps off the
//! remainder of each interval and counts ticks that ran over budget. The
//! composition tree itself never logs; the runner reports at the driver
//! level via `tracing`.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::process::{Process, Slot, Time};

// ─── Tick Statistics ────────────────────────────────────────────────

/// O(1) per-tick timing statistics, updated every tick with no allocation.
#[derive(Debug, Clone)]
pub struct TickStats {
    /// Total ticks executed.
    pub tick_count: u64,
    /// Last tick body duration [ns].
    pub last_tick_ns: i64,
    /// Minimum tick body duration [ns].
    pub min_tick_ns: i64,
    /// Maximum tick body duration [ns].
    pub max_tick_ns: i64,
    /// Running sum for average computation.
    pub sum_tick_ns: i64,
    /// Ticks that exceeded the pacing interval.
    pub overruns: u64,
    /// Processes run to completion by this runner.
    pub completed_processes: u64,
}

impl TickStats {
    /// New zeroed stats instance.
    pub const fn new() -> Self {
        Self {
            tick_count: 0,
            last_tick_ns: 0,
            min_tick_ns: i64::MAX,
            max_tick_ns: 0,
            sum_tick_ns: 0,
            overruns: 0,
            completed_processes: 0,
        }
    }

    /// Record one tick body duration.
    #[inline]
    pub fn record(&mut self, duration_ns: i64) {
        self.tick_count += 1;
        self.last_tick_ns = duration_ns;
        if duration_ns < self.min_tick_ns {
            self.min_tick_ns = duration_ns;
        }
        if duration_ns > self.max_tick_ns {
            self.max_tick_ns = duration_ns;
        }
        self.sum_tick_ns += duration_ns;
    }

    /// Average tick body duration [ns] (0 before the first tick).
    #[inline]
    pub fn avg_tick_ns(&self) -> i64 {
        if self.tick_count == 0 {
            0
        } else {
            self.sum_tick_ns / self.tick_count as i64
        }
    }
}

impl Default for TickStats {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Runner ─────────────────────────────────────────────────────────

type Hook = Box<dyn FnMut(Time)>;

/// Cooperative tick loop driver.
///
/// Per tick: read the clock, run the input-refresh hook, update the
/// process, run the output-flush hook, then check completion with the same
/// timestamp. Hooks are where device bindings latch inputs and push
/// outputs; the engine itself performs no I/O.
pub struct Runner {
    clock: Box<dyn FnMut() -> Time>,
    refresh_inputs: Option<Hook>,
    flush_outputs: Option<Hook>,
    tick_interval: Option<Duration>,
    stats: TickStats,
}

impl Runner {
    /// Runner on a monotonic clock with its epoch at construction time.
    pub fn new() -> Self {
        let epoch = Instant::now();
        Self::with_clock(move || epoch.elapsed().as_secs_f64())
    }

    /// Runner on a caller-supplied clock. The clock must be monotonically
    /// non-decreasing; tests typically script it.
    pub fn with_clock(clock: impl FnMut() -> Time + 'static) -> Self {
        Self {
            clock: Box::new(clock),
            refresh_inputs: None,
            flush_outputs: None,
            tick_interval: None,
            stats: TickStats::new(),
        }
    }

    /// Install the input-refresh hook, run before every update.
    pub fn on_refresh(mut self, hook: impl FnMut(Time) + 'static) -> Self {
        self.refresh_inputs = Some(Box::new(hook));
        self
    }

    /// Install the output-flush hook, run after every update.
    pub fn on_flush(mut self, hook: impl FnMut(Time) + 'static) -> Self {
        self.flush_outputs = Some(Box::new(hook));
        self
    }

    /// Pace the loop at a fixed tick interval. Ticks whose body exceeds
    /// the interval are counted as overruns (and not slept).
    pub fn paced(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = Some(tick_interval);
        self
    }

    /// Timing statistics accumulated so far.
    #[inline]
    pub fn stats(&self) -> &TickStats {
        &self.stats
    }

    /// Drive `process` to completion. Returns the number of ticks run.
    ///
    /// An instantly-complete process is started, observed complete at the
    /// first check, and receives its terminal hook without a single update.
    pub fn run(&mut self, process: impl Process + 'static) -> u64 {
        let mut slot = Slot::new(process);
        let mut ticks = 0u64;
        let mut now = (self.clock)();

        slot.ensure_started(now);
        while !slot.poll_completed(now) {
            now = (self.clock)();
            let body_start = Instant::now();

            if let Some(refresh) = self.refresh_inputs.as_mut() {
                refresh(now);
            }
            slot.update(now);
            if let Some(flush) = self.flush_outputs.as_mut() {
                flush(now);
            }

            let body = body_start.elapsed();
            self.stats.record(body.as_nanos() as i64);
            ticks += 1;

            if let Some(interval) = self.tick_interval {
                match interval.checked_sub(body) {
                    Some(remaining) => std::thread::sleep(remaining),
                    None => self.stats.overruns += 1,
                }
            }
        }
        slot.finish(now);
        self.stats.completed_processes += 1;

        debug!(
            ticks,
            completed = self.stats.completed_processes,
            overruns = self.stats.overruns,
            "process ran to completion"
        );
        ticks
    }
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

/// Clock stepping through a fixed schedule of timestamps, holding the last
/// one once exhausted. The deterministic counterpart of the monotonic
/// default, for tests and replays.
pub fn scripted_clock(timestamps: Vec<Time>) -> impl FnMut() -> Time {
    let mut index = 0usize;
    move || {
        let now = timestamps
            .get(index)
            .or_else(|| timestamps.last())
            .copied()
            .unwrap_or(0.0);
        index += 1;
        now
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
