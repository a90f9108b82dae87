//! # TAKT Core
//!
//! Cooperative, single-threaded process composition and scheduling, plus a
//! lazy pull-based dataflow ("wire") layer for threading live values between
//! composed processes and device bindings.
//!
//! ## Architecture
//!
//! 1. **Process** — the tick contract: `on_started` / `update` /
//!    `on_completed` / `is_completed`, driven one timestamp at a time.
//! 2. **Leaves** — [`processes::LambdaProcess`], [`processes::TimeProcess`];
//!    applications add their own by implementing [`process::Process`].
//! 3. **Combinators** — [`processes::Group`] (all/any completion) and
//!    [`processes::Sequence`] (serial FIFO), composed as declarative trees
//!    through the [`compose`] builders.
//! 4. **Wire** — [`wire::Wire`], recomputed lazily on every read, never
//!    cached.
//! 5. **Runner** — [`runner::Runner`], the refresh → update → flush tick
//!    loop with per-tick statistics.
//!
//! ## Execution model
//!
//! Strictly single-threaded and cooperative: no blocking calls, no
//! preemption, no locks. Trees use reference-counted shared handles so an
//! application can inspect a leaf after its tree finishes. The hot loop
//! performs no allocation — composition allocates, ticking does not.

pub mod compose;
pub mod prelude;
pub mod process;
pub mod processes;
pub mod runner;
pub mod wire;
