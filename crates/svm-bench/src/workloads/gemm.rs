//! Square integer matrix multiply `C = A × B` with `A[i] = i` and `B = 1`.
//!
//! With an all-ones `B`, every element of row `r` of `C` equals the sum of
//! row `r` of `A`, so verification is per-row instead of a second O(n³)
//! host multiply. The accumulation wraps like the kernel's `int`.

use std::time::Instant;

use opencl3::kernel::{ExecuteKernel, Kernel};
use opencl3::types::cl_int;

use crate::memory::{svm_alloc, svm_map_read, svm_map_write, svm_unmap, DeviceBuffer};
use crate::workloads::{kernel_time, RunReport, Strategy};
use crate::{ClError, Session};

#[cfg(feature = "memtrace")]
use crate::trace::{self, Phase};

const SRC: &str = include_str!("../../kernels/gemm.cl");
const KERNEL: &str = "mat_mul";

/// The original ran 2000×2000; that is minutes of naive multiply on a CPU
/// driver, so the default here is small enough to iterate with.
pub const DEFAULT_DIM: usize = 256;

pub fn run(session: &Session, strategy: Strategy, dim: usize) -> Result<RunReport, ClError> {
    if dim == 0 {
        return Err(ClError::InvalidSize(dim));
    }
    let (_program, kernel) = session.build_kernel(SRC, KERNEL)?;
    match strategy {
        Strategy::Svm => run_svm(session, &kernel, dim),
        Strategy::Copy => run_copy(session, &kernel, dim),
    }
}

fn host_inputs(dim: usize) -> (Vec<cl_int>, Vec<cl_int>) {
    let sz = dim * dim;
    let a: Vec<cl_int> = (0..sz).map(|i| i as cl_int).collect();
    let b: Vec<cl_int> = vec![1; sz];
    (a, b)
}

/// The value every element of row `row` must hold: the wrapping sum of
/// `row*dim .. row*dim + dim`.
pub fn expected_row(dim: usize, row: usize) -> cl_int {
    let n = dim as cl_int;
    let base = (row as cl_int).wrapping_mul(n);
    let mut acc: cl_int = 0;
    for k in 0..n {
        acc = acc.wrapping_add(base.wrapping_add(k));
    }
    acc
}

pub fn verify(c: &[cl_int], dim: usize) -> Result<(), ClError> {
    for row in 0..dim {
        let want = expected_row(dim, row);
        for col in 0..dim {
            let idx = row * dim + col;
            if c[idx] != want {
                return Err(ClError::Verify(idx));
            }
        }
    }
    Ok(())
}

fn run_svm(session: &Session, kernel: &Kernel, dim: usize) -> Result<RunReport, ClError> {
    if !session.svm_supported() {
        return Err(ClError::SvmUnsupported);
    }
    let queue = session.queue();
    let (host_a, host_b) = host_inputs(dim);
    let sz = dim * dim;

    let t0 = Instant::now();

    let mut a = svm_alloc::<cl_int>(session.context(), sz)?;
    let mut b = svm_alloc::<cl_int>(session.context(), sz)?;
    let mut c = svm_alloc::<cl_int>(session.context(), sz)?;

    svm_map_write(queue, &mut a)?;
    a.copy_from_slice(&host_a);
    svm_unmap(queue, &a)?;

    svm_map_write(queue, &mut b)?;
    b.copy_from_slice(&host_b);
    svm_unmap(queue, &b)?;

    #[cfg(feature = "memtrace")]
    let tok = trace::start(Phase::Kernel, 0);

    let global = [dim, dim];
    let event = unsafe {
        ExecuteKernel::new(kernel)
            .set_arg_svm(a.as_ptr())
            .set_arg_svm(b.as_ptr())
            .set_arg_svm(c.as_mut_ptr())
            .set_arg(&(dim as cl_int))
            .set_arg(&(dim as cl_int))
            .set_arg(&(dim as cl_int))
            .set_global_work_sizes(&global)
            .enqueue_nd_range(queue)?
    };
    event.wait()?;

    #[cfg(feature = "memtrace")]
    tok.finish();

    svm_map_read(queue, &mut c)?;
    let elapsed = t0.elapsed();

    verify(&c, dim)?;
    svm_unmap(queue, &c)?;

    Ok(RunReport {
        workload: "gemm",
        strategy: Strategy::Svm,
        elements: dim,
        elapsed,
        kernel_time: kernel_time(&event),
    })
}

fn run_copy(session: &Session, kernel: &Kernel, dim: usize) -> Result<RunReport, ClError> {
    let queue = session.queue();
    let (host_a, host_b) = host_inputs(dim);
    let sz = dim * dim;
    let mut host_c = vec![0 as cl_int; sz];

    let t0 = Instant::now();

    let mut a = DeviceBuffer::<cl_int>::new(session.context(), sz)?;
    let mut b = DeviceBuffer::<cl_int>::new(session.context(), sz)?;
    let c = DeviceBuffer::<cl_int>::new(session.context(), sz)?;
    a.write(queue, &host_a)?;
    b.write(queue, &host_b)?;

    #[cfg(feature = "memtrace")]
    let tok = trace::start(Phase::Kernel, 0);

    let global = [dim, dim];
    let event = unsafe {
        ExecuteKernel::new(kernel)
            .set_arg(a.raw())
            .set_arg(b.raw())
            .set_arg(c.raw())
            .set_arg(&(dim as cl_int))
            .set_arg(&(dim as cl_int))
            .set_arg(&(dim as cl_int))
            .set_global_work_sizes(&global)
            .enqueue_nd_range(queue)?
    };
    event.wait()?;

    #[cfg(feature = "memtrace")]
    tok.finish();

    c.read(queue, &mut host_c)?;
    let elapsed = t0.elapsed();

    verify(&host_c, dim)?;

    Ok(RunReport {
        workload: "gemm",
        strategy: Strategy::Copy,
        elements: dim,
        elapsed,
        kernel_time: kernel_time(&event),
    })
}
