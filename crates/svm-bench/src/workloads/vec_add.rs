//! Float vector add `c = a + b`, one work-item per element.

use std::time::Instant;

use opencl3::kernel::{ExecuteKernel, Kernel};
use opencl3::types::{cl_float, cl_uint};

use crate::memory::{svm_alloc, svm_map_read, svm_map_write, svm_unmap, DeviceBuffer};
use crate::workloads::{kernel_time, RunReport, Strategy};
use crate::{ClError, Session};

#[cfg(feature = "memtrace")]
use crate::trace::{self, Phase};

const SRC: &str = include_str!("../../kernels/vec_add.cl");
const KERNEL: &str = "vector_add";

const A_VALUE: cl_float = 1.0;
const B_VALUE: cl_float = 2.0;

/// The original added 1e8 elements (400 MiB per vector); 2^22 keeps the
/// default run inside small device memories.
pub const DEFAULT_N: usize = 1 << 22;

pub fn run(session: &Session, strategy: Strategy, n: usize) -> Result<RunReport, ClError> {
    if n == 0 {
        return Err(ClError::InvalidSize(n));
    }
    let (_program, kernel) = session.build_kernel(SRC, KERNEL)?;
    match strategy {
        Strategy::Svm => run_svm(session, &kernel, n),
        Strategy::Copy => run_copy(session, &kernel, n),
    }
}

pub fn verify(c: &[cl_float]) -> Result<(), ClError> {
    let want = A_VALUE + B_VALUE;
    match c.iter().position(|&x| (x - want).abs() > 1e-6) {
        Some(i) => Err(ClError::Verify(i)),
        None => Ok(()),
    }
}

fn run_svm(session: &Session, kernel: &Kernel, n: usize) -> Result<RunReport, ClError> {
    if !session.svm_supported() {
        return Err(ClError::SvmUnsupported);
    }
    let queue = session.queue();

    let t0 = Instant::now();

    let mut a = svm_alloc::<cl_float>(session.context(), n)?;
    let mut b = svm_alloc::<cl_float>(session.context(), n)?;
    let mut c = svm_alloc::<cl_float>(session.context(), n)?;

    svm_map_write(queue, &mut a)?;
    a.fill(A_VALUE);
    svm_unmap(queue, &a)?;

    svm_map_write(queue, &mut b)?;
    b.fill(B_VALUE);
    svm_unmap(queue, &b)?;

    #[cfg(feature = "memtrace")]
    let tok = trace::start(Phase::Kernel, 0);

    let event = unsafe {
        ExecuteKernel::new(kernel)
            .set_arg_svm(a.as_ptr())
            .set_arg_svm(b.as_ptr())
            .set_arg_svm(c.as_mut_ptr())
            .set_arg(&(n as cl_uint))
            .set_global_work_size(n)
            .enqueue_nd_range(queue)?
    };
    event.wait()?;

    #[cfg(feature = "memtrace")]
    tok.finish();

    svm_map_read(queue, &mut c)?;
    let elapsed = t0.elapsed();

    verify(&c)?;
    svm_unmap(queue, &c)?;

    Ok(RunReport {
        workload: "vec_add",
        strategy: Strategy::Svm,
        elements: n,
        elapsed,
        kernel_time: kernel_time(&event),
    })
}

fn run_copy(session: &Session, kernel: &Kernel, n: usize) -> Result<RunReport, ClError> {
    let queue = session.queue();
    let host_a = vec![A_VALUE; n];
    let host_b = vec![B_VALUE; n];
    let mut host_c = vec![0.0 as cl_float; n];

    let t0 = Instant::now();

    let mut a = DeviceBuffer::<cl_float>::new(session.context(), n)?;
    let mut b = DeviceBuffer::<cl_float>::new(session.context(), n)?;
    let c = DeviceBuffer::<cl_float>::new(session.context(), n)?;
    a.write(queue, &host_a)?;
    b.write(queue, &host_b)?;

    #[cfg(feature = "memtrace")]
    let tok = trace::start(Phase::Kernel, 0);

    let event = unsafe {
        ExecuteKernel::new(kernel)
            .set_arg(a.raw())
            .set_arg(b.raw())
            .set_arg(c.raw())
            .set_arg(&(n as cl_uint))
            .set_global_work_size(n)
            .enqueue_nd_range(queue)?
    };
    event.wait()?;

    #[cfg(feature = "memtrace")]
    tok.finish();

    c.read(queue, &mut host_c)?;
    let elapsed = t0.elapsed();

    verify(&host_c)?;

    Ok(RunReport {
        workload: "vec_add",
        strategy: Strategy::Copy,
        elements: n,
        elapsed,
        kernel_time: kernel_time(&event),
    })
}
