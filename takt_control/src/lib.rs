//! # TAKT Control
//!
//! Numeric regulators consumed through the TAKT wire layer. Currently the
//! PID regulator used for line following and straight-drive correction.
//! Regulators are external collaborators of the scheduling core: a process
//! steps them from its update closure, wires carry the error in and the
//! power out.

pub mod pid;

pub use pid::{power_wire, Pid, PidGains};
