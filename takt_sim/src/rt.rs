//! Real-time setup for the tick loop (Linux, `rt` feature).
//!
//! Sequence: lock all memory pages, prefault the stack, pin the thread to
//! one core, switch to SCHED_FIFO. Without the `rt` feature every step is a
//! no-op so the simulator runs unprivileged on any host.

/// RT setup error.
#[derive(Debug, thiserror::Error)]
#[error("RT setup: {0}")]
pub struct RtError(pub String);

/// Perform the full RT setup sequence. Call before entering the tick loop.
pub fn rt_setup(cpu_core: usize, priority: i32) -> Result<(), RtError> {
    lock_memory()?;
    prefault_stack();
    pin_to_core(cpu_core)?;
    set_fifo_scheduler(priority)?;
    Ok(())
}

/// Touch a stack buffer so its pages are resident before the loop starts.
fn prefault_stack() {
    let mut buf = [0u8; 256 * 1024];
    for byte in buf.iter_mut() {
        unsafe { core::ptr::write_volatile(byte, 0xFF) };
    }
    core::hint::black_box(&buf);
}

#[cfg(feature = "rt")]
fn lock_memory() -> Result<(), RtError> {
    use nix::sys::mman::{mlockall, MlockallFlags};
    mlockall(MlockallFlags::MCL_CURRENT | MlockallFlags::MCL_FUTURE)
        .map_err(|e| RtError(format!("mlockall failed: {e}")))
}

#[cfg(feature = "rt")]
fn pin_to_core(cpu: usize) -> Result<(), RtError> {
    use nix::sched::{sched_setaffinity, CpuSet};
    use nix::unistd::Pid;

    let mut set = CpuSet::new();
    set.set(cpu)
        .map_err(|e| RtError(format!("CpuSet::set({cpu}) failed: {e}")))?;
    sched_setaffinity(Pid::from_raw(0), &set)
        .map_err(|e| RtError(format!("sched_setaffinity failed: {e}")))
}

#[cfg(feature = "rt")]
fn set_fifo_scheduler(priority: i32) -> Result<(), RtError> {
    let param = libc::sched_param {
        sched_priority: priority,
    };
    let ret = unsafe { libc::sched_setscheduler(0, libc::SCHED_FIFO, &param) };
    if ret != 0 {
        let err = std::io::Error::last_os_error();
        return Err(RtError(format!(
            "sched_setscheduler(SCHED_FIFO, {priority}) failed: {err}"
        )));
    }
    Ok(())
}

#[cfg(not(feature = "rt"))]
fn lock_memory() -> Result<(), RtError> {
    Ok(())
}

#[cfg(not(feature = "rt"))]
fn pin_to_core(_cpu: usize) -> Result<(), RtError> {
    Ok(())
}

#[cfg(not(feature = "rt"))]
fn set_fifo_scheduler(_priority: i32) -> Result<(), RtError> {
    Ok(())
}

// ─── Tests ──────────────────────────────────────────────────────────
