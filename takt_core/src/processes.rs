//! Leaf processes and combinators.
//!
//! Leaves: [`LambdaProcess`] (closure-driven) and [`TimeProcess`]
//! (delay + fixed-duration window). Combinators: [`Group`] (parallel, with
//! an All/Any completion rule) and [`Sequence`] (serial FIFO). Applications
//! define further leaves by implementing [`crate::process::Process`].

mod group;
mod lambda;
mod sequence;
mod timed;

pub use group::{CompletionRule, Group};
pub use lambda::LambdaProcess;
pub use sequence::Sequence;
pub use timed::TimeProcess;
