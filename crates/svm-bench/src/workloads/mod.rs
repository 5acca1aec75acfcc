//! The four benchmark workloads, each runnable under either memory strategy.

pub mod gemm;
pub mod hello;
pub mod vec_add;
pub mod vec_copy;

use std::fmt;
use std::time::Duration;

use opencl3::event::Event;

/// How host data reaches the device.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Strategy {
    /// Shared Virtual Memory: one allocation visible to host and device,
    /// mapped and unmapped around host accesses.
    Svm,
    /// Classical device buffers with explicit write/read copies.
    Copy,
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Svm => f.write_str("svm"),
            Strategy::Copy => f.write_str("copy"),
        }
    }
}

/// Timing summary of one verified workload run.
#[derive(Debug)]
pub struct RunReport {
    pub workload: &'static str,
    pub strategy: Strategy,
    /// Problem size in elements (matrix dimension for gemm).
    pub elements: usize,
    /// Wall-clock time over the allocate→dispatch→read-back region.
    pub elapsed: Duration,
    /// Kernel-only time from the profiling event, when the driver provides it.
    pub kernel_time: Option<Duration>,
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:<8} {:<5} n={:<10} total={:>12}",
            self.workload,
            self.strategy,
            self.elements,
            format!("{:.3?}", self.elapsed),
        )?;
        match self.kernel_time {
            Some(k) => write!(f, "  kernel={:.3?}", k),
            None => write!(f, "  kernel=n/a"),
        }
    }
}

/// Kernel duration from the profiling counters, best effort.
pub(crate) fn kernel_time(event: &Event) -> Option<Duration> {
    let start = event.profiling_command_start().ok()?;
    let end = event.profiling_command_end().ok()?;
    Some(Duration::from_nanos(end.saturating_sub(start)))
}
