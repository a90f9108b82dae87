//! Serial combinator: run children to completion in insertion order.

use std::collections::VecDeque;

use crate::process::{Process, Slot, Time};

/// FIFO chain of processes, one active at a time.
///
/// Only the front child receives ticks. When it completes, its terminal
/// hook fires, it is popped, and the next child is started on the same tick
/// so that a hand-off never consumes an extra tick; children that are
/// complete the moment they start drain within that tick as well. A child
/// never receives an update after it has reported completion, and a later
/// child never observes a timestamp earlier than its own start.
///
/// An empty (or fully drained) sequence is vacuously complete.
pub struct Sequence {
    queue: VecDeque<Slot>,
}

impl Sequence {
    /// Empty sequence.
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Number of children not yet run to completion.
    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Append a child to the back of the queue.
    pub fn push(&mut self, child: impl Process + 'static) {
        self.queue.push_back(Slot::new(child));
    }

    /// Builder form of [`Sequence::push`]: `seq.then(a).then(b)` runs `a`
    /// to completion, then `b`.
    pub fn then(mut self, child: impl Process + 'static) -> Self {
        self.push(child);
        self
    }
}

impl Default for Sequence {
    fn default() -> Self {
        Self::new()
    }
}

impl Process for Sequence {
    fn update(&mut self, now: Time) {
        // At most one child update per tick; completions hand off to the
        // successor within the same tick.
        let mut ticked = false;
        while let Some(front) = self.queue.front_mut() {
            front.ensure_started(now);
            if front.poll_completed(now) {
                front.finish(now);
                self.queue.pop_front();
                continue;
            }
            if ticked {
                // The successor is started; its first update is next tick.
                return;
            }
            front.update(now);
            ticked = true;
            if front.poll_completed(now) {
                front.finish(now);
                self.queue.pop_front();
                continue;
            }
            return;
        }
    }

    fn is_completed(&mut self, _now: Time) -> bool {
        self.queue.is_empty()
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
