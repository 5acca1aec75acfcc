//! 1D byte-array round-trip: device shifts every byte up by one.
//!
//! The classic "GdkknVnqkc" input decodes to "HelloWorld", which makes a
//! wrong transfer obvious in the output rather than just in a checksum.

use std::time::Instant;

use opencl3::kernel::{ExecuteKernel, Kernel};

use crate::memory::{svm_alloc, svm_map_read, svm_map_write, svm_unmap, DeviceBuffer};
use crate::workloads::{kernel_time, RunReport, Strategy};
use crate::{ClError, Session};

#[cfg(feature = "memtrace")]
use crate::trace::{self, Phase};

const SRC: &str = include_str!("../../kernels/hello.cl");
const KERNEL: &str = "shift_char";

pub const INPUT: &[u8] = b"GdkknVnqkc";
pub const EXPECTED: &[u8] = b"HelloWorld";

pub fn run(session: &Session, strategy: Strategy) -> Result<RunReport, ClError> {
    let (_program, kernel) = session.build_kernel(SRC, KERNEL)?;
    match strategy {
        Strategy::Svm => run_svm(session, &kernel),
        Strategy::Copy => run_copy(session, &kernel),
    }
}

/// Checks the decoded output, reporting the first wrong byte. An output of
/// the wrong length fails at the first index the two sides do not share.
pub fn verify(out: &[u8]) -> Result<(), ClError> {
    if out.len() != EXPECTED.len() {
        return Err(ClError::Verify(out.len().min(EXPECTED.len())));
    }
    match out.iter().zip(EXPECTED).position(|(got, want)| got != want) {
        Some(i) => Err(ClError::Verify(i)),
        None => Ok(()),
    }
}

fn run_svm(session: &Session, kernel: &Kernel) -> Result<RunReport, ClError> {
    if !session.svm_supported() {
        return Err(ClError::SvmUnsupported);
    }
    let queue = session.queue();
    let n = INPUT.len();

    let t0 = Instant::now();

    let mut input = svm_alloc::<u8>(session.context(), n)?;
    let mut output = svm_alloc::<u8>(session.context(), n)?;

    svm_map_write(queue, &mut input)?;
    input.copy_from_slice(INPUT);
    svm_unmap(queue, &input)?;

    #[cfg(feature = "memtrace")]
    let tok = trace::start(Phase::Kernel, 0);

    let event = unsafe {
        ExecuteKernel::new(kernel)
            .set_arg_svm(input.as_ptr())
            .set_arg_svm(output.as_mut_ptr())
            .set_global_work_size(n)
            .enqueue_nd_range(queue)?
    };
    event.wait()?;

    #[cfg(feature = "memtrace")]
    tok.finish();

    svm_map_read(queue, &mut output)?;
    let elapsed = t0.elapsed();

    verify(&output)?;
    svm_unmap(queue, &output)?;

    Ok(RunReport {
        workload: "hello",
        strategy: Strategy::Svm,
        elements: n,
        elapsed,
        kernel_time: kernel_time(&event),
    })
}

fn run_copy(session: &Session, kernel: &Kernel) -> Result<RunReport, ClError> {
    let queue = session.queue();
    let n = INPUT.len();
    let mut host_out = vec![0u8; n];

    let t0 = Instant::now();

    let mut input = DeviceBuffer::<u8>::new(session.context(), n)?;
    let output = DeviceBuffer::<u8>::new(session.context(), n)?;
    input.write(queue, INPUT)?;

    #[cfg(feature = "memtrace")]
    let tok = trace::start(Phase::Kernel, 0);

    let event = unsafe {
        ExecuteKernel::new(kernel)
            .set_arg(input.raw())
            .set_arg(output.raw())
            .set_global_work_size(n)
            .enqueue_nd_range(queue)?
    };
    event.wait()?;

    #[cfg(feature = "memtrace")]
    tok.finish();

    output.read(queue, &mut host_out)?;
    let elapsed = t0.elapsed();

    verify(&host_out)?;

    Ok(RunReport {
        workload: "hello",
        strategy: Strategy::Copy,
        elements: n,
        elapsed,
        kernel_time: kernel_time(&event),
    })
}
