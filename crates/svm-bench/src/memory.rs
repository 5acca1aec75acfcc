//! The two memory strategies: explicit device buffers and coarse-grain SVM.
//!
//! All transfers are blocking. The benchmarks time whole
//! allocate→dispatch→read-back regions, so overlapping individual copies
//! would only blur what is being compared.

use std::ptr;

#[cfg(any(feature = "metrics", feature = "memtrace"))]
use std::mem::size_of;

use opencl3::{
    command_queue::CommandQueue,
    context::Context,
    memory::{Buffer, CL_MAP_READ, CL_MAP_WRITE_INVALIDATE_REGION, CL_MEM_READ_WRITE},
    svm::SvmVec,
    types::CL_BLOCKING,
};

use crate::ClError;

#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;
#[cfg(feature = "metrics")]
use std::time::Instant;

#[cfg(feature = "memtrace")]
use crate::trace::{self, Phase};

/// A typed device-side buffer for the explicit-copy strategy.
pub struct DeviceBuffer<T> {
    buf: Buffer<T>,
    len: usize,
}

impl<T> DeviceBuffer<T> {
    pub fn new(context: &Context, len: usize) -> Result<Self, ClError> {
        if len == 0 {
            return Err(ClError::InvalidSize(len));
        }

        #[cfg(feature = "metrics")]
        {
            crate::metrics::ALLOCS.fetch_add(1, Ordering::Relaxed);
            crate::metrics::ALLOC_BYTES.fetch_add(len * size_of::<T>(), Ordering::Relaxed);
        }

        let buf =
            unsafe { Buffer::<T>::create(context, CL_MEM_READ_WRITE, len, ptr::null_mut())? };
        Ok(Self { buf, len })
    }

    /// Blocking host→device copy of the whole buffer.
    pub fn write(&mut self, queue: &CommandQueue, host: &[T]) -> Result<(), ClError> {
        debug_assert_eq!(host.len(), self.len, "host data length mismatch");

        #[cfg(feature = "metrics")]
        let t = Instant::now();
        #[cfg(feature = "memtrace")]
        let tok = trace::start(Phase::H2D, self.len * size_of::<T>());

        unsafe {
            queue.enqueue_write_buffer(&mut self.buf, CL_BLOCKING, 0, host, &[])?;
        }

        #[cfg(feature = "memtrace")]
        tok.finish();
        #[cfg(feature = "metrics")]
        crate::metrics::record("enqueue_write", t);

        Ok(())
    }

    /// Blocking device→host copy of the whole buffer.
    pub fn read(&self, queue: &CommandQueue, host: &mut [T]) -> Result<(), ClError> {
        debug_assert_eq!(host.len(), self.len, "host output length mismatch");

        #[cfg(feature = "metrics")]
        let t = Instant::now();
        #[cfg(feature = "memtrace")]
        let tok = trace::start(Phase::D2H, self.len * size_of::<T>());

        unsafe {
            queue.enqueue_read_buffer(&self.buf, CL_BLOCKING, 0, host, &[])?;
        }

        #[cfg(feature = "memtrace")]
        tok.finish();
        #[cfg(feature = "metrics")]
        crate::metrics::record("enqueue_read", t);

        Ok(())
    }

    pub fn raw(&self) -> &Buffer<T> {
        &self.buf
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Allocates an SVM region of `len` elements.
pub fn svm_alloc<'a, T>(context: &'a Context, len: usize) -> Result<SvmVec<'a, T>, ClError> {
    if len == 0 {
        return Err(ClError::InvalidSize(len));
    }

    #[cfg(feature = "metrics")]
    {
        crate::metrics::ALLOCS.fetch_add(1, Ordering::Relaxed);
        crate::metrics::ALLOC_BYTES.fetch_add(len * size_of::<T>(), Ordering::Relaxed);
    }

    Ok(SvmVec::<T>::allocate(context, len)?)
}

/// Maps an SVM region for host writes. No-op on fine-grain devices, where
/// the host may touch the memory at any time.
pub fn svm_map_write<T>(queue: &CommandQueue, svm: &mut SvmVec<'_, T>) -> Result<(), ClError> {
    if svm.is_fine_grained() {
        return Ok(());
    }

    #[cfg(feature = "memtrace")]
    let tok = trace::start(Phase::Map, svm.len() * size_of::<T>());

    unsafe {
        queue.enqueue_svm_map(CL_BLOCKING, CL_MAP_WRITE_INVALIDATE_REGION, svm, &[])?;
    }

    #[cfg(feature = "memtrace")]
    tok.finish();
    Ok(())
}

/// Maps an SVM region for host reads. No-op on fine-grain devices.
pub fn svm_map_read<T>(queue: &CommandQueue, svm: &mut SvmVec<'_, T>) -> Result<(), ClError> {
    if svm.is_fine_grained() {
        return Ok(());
    }

    #[cfg(feature = "memtrace")]
    let tok = trace::start(Phase::Map, svm.len() * size_of::<T>());

    unsafe {
        queue.enqueue_svm_map(CL_BLOCKING, CL_MAP_READ, svm, &[])?;
    }

    #[cfg(feature = "memtrace")]
    tok.finish();
    Ok(())
}

/// Returns a mapped SVM region to the device. The unmap is waited on, the
/// region must not be touched by the host afterwards.
pub fn svm_unmap<T>(queue: &CommandQueue, svm: &SvmVec<'_, T>) -> Result<(), ClError> {
    if svm.is_fine_grained() {
        return Ok(());
    }

    #[cfg(feature = "memtrace")]
    let tok = trace::start(Phase::Unmap, svm.len() * size_of::<T>());

    let event = unsafe { queue.enqueue_svm_unmap(svm, &[])? };
    event.wait()?;

    #[cfg(feature = "memtrace")]
    tok.finish();
    Ok(())
}
