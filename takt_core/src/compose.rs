//! Named composition builders.
//!
//! The composition surface is a set of builder methods — `then` (run after),
//! `and` (run together, all must finish), `or` (run together, first finish
//! wins) — available on every process, plus list builders for homogeneous
//! collections of shared handles.
//!
//! Chaining the same combinator grows one group instead of nesting:
//! `a.or(b).or(c)` is a single flat three-child OR group, so completion of
//! any one of the three completes the whole. [`Group`] and [`Sequence`]
//! carry inherent `or`/`and`/`then` methods that implement the flattening;
//! the blanket methods here cover every other process type.

use crate::process::{Process, SharedProcess};
use crate::processes::{Group, Sequence};

/// Composition methods available on every process.
pub trait Compose: Process + Sized + 'static {
    /// Run `self` to completion, then `next`.
    fn then(self, next: impl Process + 'static) -> Sequence {
        Sequence::new().then(self).then(next)
    }

    /// Run `self` and `other` together; complete when both are complete.
    fn and(self, other: impl Process + 'static) -> Group {
        Group::all().with(self).with(other)
    }

    /// Run `self` and `other` together; complete when either is complete.
    fn or(self, other: impl Process + 'static) -> Group {
        Group::any().with(self).with(other)
    }
}

impl<P: Process + Sized + 'static> Compose for P {}

/// Serial chain over a list of shared handles.
pub fn sequence_of(children: impl IntoIterator<Item = SharedProcess>) -> Sequence {
    let mut sequence = Sequence::new();
    for child in children {
        sequence.push(child);
    }
    sequence
}

/// All-must-complete group over a list of shared handles.
pub fn all_of(children: impl IntoIterator<Item = SharedProcess>) -> Group {
    let mut group = Group::all();
    for child in children {
        group.push(child);
    }
    group
}

/// Any-completes group over a list of shared handles.
pub fn any_of(children: impl IntoIterator<Item = SharedProcess>) -> Group {
    let mut group = Group::any();
    for child in children {
        group.push(child);
    }
    group
}

// ─── Tests ──────────────────────────────────────────────────────────
