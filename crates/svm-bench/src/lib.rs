//! Host-side OpenCL memory-strategy benchmarks.
//!
//! Each workload in [`workloads`] runs the same kernel under two memory
//! strategies: coarse-grain Shared Virtual Memory (map/unmap around every
//! host access) and classical device buffers with explicit copies. Both
//! paths share one [`Session`] and verify their results on the host, so the
//! reported times are actually comparable.

pub mod memory;
pub mod session;
pub mod workloads;

#[cfg(feature = "metrics")]
pub mod metrics;

#[cfg(feature = "memtrace")]
pub mod trace;

pub use memory::DeviceBuffer;
pub use session::Session;
pub use workloads::{RunReport, Strategy};

#[derive(thiserror::Error, Debug)]
pub enum ClError {
    #[error("OpenCL API error code {0}")]
    Api(i32),
    #[error("no OpenCL platform available")]
    NoPlatform,
    #[error("no OpenCL device on platform {0}")]
    NoDevice(usize),
    #[error("device has no coarse-grain SVM buffer support")]
    SvmUnsupported,
    #[error("invalid buffer size: {0}")]
    InvalidSize(usize),
    #[error("program build failed:\n{0}")]
    Build(String),
    #[error("verification failed at element {0}")]
    Verify(usize),
}

impl From<opencl3::error_codes::ClError> for ClError {
    fn from(err: opencl3::error_codes::ClError) -> Self {
        ClError::Api(err.0)
    }
}
