//! Platform/device discovery, context and queue setup, program builds.

use opencl3::{
    command_queue::{CommandQueue, CL_QUEUE_PROFILING_ENABLE},
    context::Context,
    device::{
        get_device_ids, Device, CL_DEVICE_SVM_COARSE_GRAIN_BUFFER,
        CL_DEVICE_SVM_FINE_GRAIN_BUFFER, CL_DEVICE_TYPE_ALL, CL_DEVICE_TYPE_CPU,
        CL_DEVICE_TYPE_GPU,
    },
    kernel::Kernel,
    platform::get_platforms,
    program::{Program, CL_STD_2_0},
};

use crate::ClError;

/// One OpenCL platform/device/context/queue tuple, shared by every run so
/// the two memory strategies are timed against the same device state.
pub struct Session {
    queue: CommandQueue,
    context: Context,
    device: Device,
}

impl Session {
    /// Picks the `device_index`-th GPU on the `platform_index`-th platform,
    /// falling back to the platform's CPU devices when it has no GPU.
    ///
    /// The queue is created with profiling enabled so workloads can report
    /// kernel-only times next to wall-clock times.
    pub fn new(platform_index: usize, device_index: usize) -> Result<Self, ClError> {
        let platforms = get_platforms()?;
        let platform = platforms.get(platform_index).ok_or(ClError::NoPlatform)?;

        let mut device_ids = get_device_ids(platform.id(), CL_DEVICE_TYPE_GPU).unwrap_or_default();
        if device_ids.is_empty() {
            log::warn!(
                "no GPU device on platform {}, falling back to CPU",
                platform_index
            );
            device_ids = get_device_ids(platform.id(), CL_DEVICE_TYPE_CPU).unwrap_or_default();
        }
        let device_id = *device_ids
            .get(device_index)
            .ok_or(ClError::NoDevice(platform_index))?;
        let device = Device::new(device_id);

        let context = Context::from_device(&device)?;
        let queue =
            CommandQueue::create_default_with_properties(&context, CL_QUEUE_PROFILING_ENABLE, 0)?;

        log::info!(
            "using device {} ({})",
            device.name().unwrap_or_else(|_| "unknown".into()),
            device.vendor().unwrap_or_else(|_| "unknown".into()),
        );

        Ok(Self {
            queue,
            context,
            device,
        })
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn queue(&self) -> &CommandQueue {
        &self.queue
    }

    pub fn device_name(&self) -> String {
        self.device.name().unwrap_or_else(|_| "unknown".into())
    }

    /// Coarse-grain SVM buffer support is the minimum the SVM strategy needs;
    /// fine-grain devices additionally skip the map/unmap round trips.
    pub fn svm_supported(&self) -> bool {
        let caps = self.device.svm_mem_capability();
        caps & (CL_DEVICE_SVM_COARSE_GRAIN_BUFFER | CL_DEVICE_SVM_FINE_GRAIN_BUFFER) != 0
    }

    /// Builds `source` with `-cl-std=CL2.0` and extracts one kernel.
    ///
    /// The program is returned alongside the kernel so the caller keeps it
    /// alive for as long as the kernel is used.
    pub fn build_kernel(&self, source: &str, name: &str) -> Result<(Program, Kernel), ClError> {
        log::debug!("building kernel `{}`", name);
        let program = Program::create_and_build_from_source(&self.context, source, CL_STD_2_0)
            .map_err(ClError::Build)?;
        let kernel = Kernel::create(&program, name)?;
        Ok((program, kernel))
    }
}

/// Prints every platform and device visible to the OpenCL runtime.
pub fn list_devices() -> Result<(), ClError> {
    let platforms = get_platforms()?;
    if platforms.is_empty() {
        println!("no OpenCL platforms found");
        return Ok(());
    }

    for (plat_idx, platform) in platforms.iter().enumerate() {
        let plat_name = platform.name().unwrap_or_else(|_| "unknown".into());
        println!("platform {}: {}", plat_idx, plat_name);

        match get_device_ids(platform.id(), CL_DEVICE_TYPE_ALL) {
            Ok(device_ids) if !device_ids.is_empty() => {
                for (dev_idx, device_id) in device_ids.iter().enumerate() {
                    let device = Device::new(*device_id);
                    let name = device.name().unwrap_or_else(|_| "unknown".into());
                    let vendor = device.vendor().unwrap_or_else(|_| "unknown".into());
                    let mem = device.global_mem_size().unwrap_or(0);
                    let caps = device.svm_mem_capability();
                    let svm = if caps & CL_DEVICE_SVM_FINE_GRAIN_BUFFER != 0 {
                        "svm: fine-grain"
                    } else if caps & CL_DEVICE_SVM_COARSE_GRAIN_BUFFER != 0 {
                        "svm: coarse-grain"
                    } else {
                        "svm: none"
                    };
                    println!(
                        "  device {}: {} ({}) - {} MiB, {}",
                        dev_idx,
                        name,
                        vendor,
                        mem / (1024 * 1024),
                        svm
                    );
                }
            }
            Ok(_) => println!("  no devices on this platform"),
            Err(e) => println!("  error listing devices: {}", e),
        }
    }
    Ok(())
}
