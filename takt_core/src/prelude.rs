//! Prelude module for common re-exports.
//!
//! `use takt_core::prelude::*;` brings in the tick contract, the leaf and
//! combinator types, the composition builders, wires, and the runner.

// ─── Tick Contract ──────────────────────────────────────────────────
pub use crate::process::{share, Process, SharedProcess, Time};

// ─── Leaves & Combinators ───────────────────────────────────────────
pub use crate::processes::{CompletionRule, Group, LambdaProcess, Sequence, TimeProcess};

// ─── Composition Builders ───────────────────────────────────────────
pub use crate::compose::{all_of, any_of, sequence_of, Compose};

// ─── Wires ──────────────────────────────────────────────────────────
pub use crate::wire::{BoolWire, FloatWire, IntWire, TextWire, Wire};

// ─── Driver ─────────────────────────────────────────────────────────
pub use crate::runner::{scripted_clock, Runner, TickStats};
