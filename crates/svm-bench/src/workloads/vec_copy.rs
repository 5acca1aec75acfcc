//! Scaled vector copy `out = alpha * in` on a fixed 16384-item grid.
//!
//! This is the ViennaCL vector-assign launch shape: the grid size never
//! changes with the vector length, each work-item strides by the global
//! size. With `alpha = 1` it is a pure device-side copy, which makes it the
//! cleanest probe of the two transfer paths.

use std::time::Instant;

use opencl3::kernel::{ExecuteKernel, Kernel};
use opencl3::types::{cl_float, cl_uint};

use crate::memory::{svm_alloc, svm_map_read, svm_map_write, svm_unmap, DeviceBuffer};
use crate::workloads::{kernel_time, RunReport, Strategy};
use crate::{ClError, Session};

#[cfg(feature = "memtrace")]
use crate::trace::{self, Phase};

const SRC: &str = include_str!("../../kernels/vec_copy.cl");
const KERNEL: &str = "scaled_copy";

pub const GLOBAL_SIZE: usize = 16384;
pub const LOCAL_SIZE: usize = 128;
const ALPHA: cl_float = 1.0;

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

fn host_input(n: usize) -> Vec<cl_float> {
    // Small repeating pattern, exact in f32.
    (0..n).map(|i| (i % 64) as cl_float).collect()
}

pub fn verify(out: &[cl_float], input: &[cl_float]) -> Result<(), ClError> {
    match out
        .iter()
        .zip(input)
        .position(|(&got, &src)| (got - ALPHA * src).abs() > 1e-6)
    {
        Some(i) => Err(ClError::Verify(i)),
        None => Ok(()),
    }
}

fn run_svm(session: &Session, kernel: &Kernel, n: usize) -> Result<RunReport, ClError> {
    if !session.svm_supported() {
        return Err(ClError::SvmUnsupported);
    }
    let queue = session.queue();
    let host_in = host_input(n);

    let t0 = Instant::now();

    let mut input = svm_alloc::<cl_float>(session.context(), n)?;
    let mut output = svm_alloc::<cl_float>(session.context(), n)?;

    svm_map_write(queue, &mut input)?;
    input.copy_from_slice(&host_in);
    svm_unmap(queue, &input)?;

    #[cfg(feature = "memtrace")]
    let tok = trace::start(Phase::Kernel, 0);

    let global = [GLOBAL_SIZE];
    let local = [LOCAL_SIZE];
    let event = unsafe {
        ExecuteKernel::new(kernel)
            .set_arg_svm(output.as_mut_ptr())
            .set_arg(&(n as cl_uint))
            .set_arg(&ALPHA)
            .set_arg_svm(input.as_ptr())
            .set_global_work_sizes(&global)
            .set_local_work_sizes(&local)
            .enqueue_nd_range(queue)?
    };
    event.wait()?;

    #[cfg(feature = "memtrace")]
    tok.finish();

    svm_map_read(queue, &mut output)?;
    let elapsed = t0.elapsed();

    verify(&output, &host_in)?;
    svm_unmap(queue, &output)?;

    Ok(RunReport {
        workload: "vec_copy",
        strategy: Strategy::Svm,
        elements: n,
        elapsed,
        kernel_time: kernel_time(&event),
    })
}

fn run_copy(session: &Session, kernel: &Kernel, n: usize) -> Result<RunReport, ClError> {
    let queue = session.queue();
    let host_in = host_input(n);
    let mut host_out = vec![0.0 as cl_float; n];

    let t0 = Instant::now();

    let mut input = DeviceBuffer::<cl_float>::new(session.context(), n)?;
    let output = DeviceBuffer::<cl_float>::new(session.context(), n)?;
    input.write(queue, &host_in)?;

    #[cfg(feature = "memtrace")]
    let tok = trace::start(Phase::Kernel, 0);

    let global = [GLOBAL_SIZE];
    let local = [LOCAL_SIZE];
    let event = unsafe {
        ExecuteKernel::new(kernel)
            .set_arg(output.raw())
            .set_arg(&(n as cl_uint))
            .set_arg(&ALPHA)
            .set_arg(input.raw())
            .set_global_work_sizes(&global)
            .set_local_work_sizes(&local)
            .enqueue_nd_range(queue)?
    };
    event.wait()?;

    #[cfg(feature = "memtrace")]
    tok.finish();

    output.read(queue, &mut host_out)?;
    let elapsed = t0.elapsed();

    verify(&host_out, &host_in)?;

    Ok(RunReport {
        workload: "vec_copy",
        strategy: Strategy::Copy,
        elements: n,
        elapsed,
        kernel_time: kernel_time(&event),
    })
}
