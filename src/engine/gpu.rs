//! OpenCL engine
//!
//! Compiles the generated work kernel once per engine and keeps four small
//! device buffers alive across searches: batch start, winner slot, root words
//! and difficulty. A batch is one `nano_work` launch over `batch.size` lanes
//! followed by a blocking read of the winner slot.

use std::ptr;

use nanowork_core::kernel::{opencl_source, VALUES_KERNEL, WORK_KERNEL};
use opencl3::command_queue::CommandQueue;
use opencl3::context::Context;
use opencl3::device::{get_all_devices, Device, CL_DEVICE_TYPE_GPU};
use opencl3::kernel::{ExecuteKernel, Kernel};
use opencl3::memory::{Buffer, CL_MEM_READ_ONLY, CL_MEM_READ_WRITE, CL_MEM_WRITE_ONLY};
use opencl3::program::Program;
use opencl3::types::{cl_mem_flags, cl_ulong, CL_BLOCKING};

use crate::engine::{BackendKind, Batch, BatchOutcome, WinnerSlot, WorkEngine, WorkJob};
use crate::error::WorkError;

/// Summary of one enumerated GPU
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    pub index: usize,
    pub name: String,
    pub vendor: String,
    pub compute_units: u32,
    pub global_mem_size: u64,
}

/// List GPUs without creating contexts; empty when no OpenCL runtime exists
pub fn list_devices() -> Vec<DeviceInfo> {
    let ids = match get_all_devices(CL_DEVICE_TYPE_GPU) {
        Ok(ids) => ids,
        Err(_) => return Vec::new(),
    };

    ids.into_iter()
        .enumerate()
        .map(|(index, id)| {
            let dev = Device::new(id);
            DeviceInfo {
                index,
                name: dev.name().unwrap_or_default().trim().to_string(),
                vendor: dev.vendor().unwrap_or_default().trim().to_string(),
                compute_units: dev.max_compute_units().unwrap_or(0),
                global_mem_size: dev.global_mem_size().unwrap_or(0),
            }
        })
        .collect()
}

/// Number of enumerated GPUs
pub fn device_count() -> usize {
    get_all_devices(CL_DEVICE_TYPE_GPU)
        .map(|ids| ids.len())
        .unwrap_or(0)
}

/// Unavailable-backend error for failures while bringing a device up
fn init_error(stage: &str, err: impl std::fmt::Display) -> WorkError {
    WorkError::BackendUnavailable(format!("OpenCL {stage}: {err}"))
}

fn upload(
    queue: &CommandQueue,
    buffer: &mut Buffer<cl_ulong>,
    data: &[cl_ulong],
) -> Result<(), WorkError> {
    let event = unsafe {
        queue
            .enqueue_write_buffer(buffer, CL_BLOCKING, 0, data, &[])
            .map_err(|e| WorkError::device("upload", e))?
    };
    event.wait().map_err(|e| WorkError::device("upload", e))
}

fn readback(
    queue: &CommandQueue,
    buffer: &Buffer<cl_ulong>,
    data: &mut [cl_ulong],
) -> Result<(), WorkError> {
    let event = unsafe {
        queue
            .enqueue_read_buffer(buffer, CL_BLOCKING, 0, data, &[])
            .map_err(|e| WorkError::device("readback", e))?
    };
    event.wait().map_err(|e| WorkError::device("readback", e))
}

pub struct GpuEngine {
    _device: Device,
    context: Context,
    queue: CommandQueue,
    work_kernel: Kernel,
    values_kernel: Kernel,
    attempt: Buffer<cl_ulong>,
    result: Buffer<cl_ulong>,
    root: Buffer<cl_ulong>,
    difficulty: Buffer<cl_ulong>,
    device_name: String,
}

// SAFETY: the opencl3 handles are opaque references into the OpenCL runtime,
// which serializes access internally. The engine is only ever driven by one
// thread at a time (`&mut self` on every device call).
unsafe impl Send for GpuEngine {}

impl GpuEngine {
    /// Open GPU `index` and compile the work kernel
    pub fn new(index: usize) -> Result<Self, WorkError> {
        let ids = get_all_devices(CL_DEVICE_TYPE_GPU).map_err(|e| init_error("enumerate", e))?;
        let id = *ids.get(index).ok_or_else(|| {
            WorkError::BackendUnavailable(format!(
                "GPU {index} requested but {} found",
                ids.len()
            ))
        })?;

        let device = Device::new(id);
        let device_name = device.name().unwrap_or_default().trim().to_string();

        let context = Context::from_device(&device).map_err(|e| init_error("context", e))?;

        // OpenCL 1.2 entry point; macOS has nothing newer
        #[allow(deprecated)]
        let queue =
            CommandQueue::create_default(&context, 0).map_err(|e| init_error("queue", e))?;

        let source = opencl_source();
        let program = Program::create_and_build_from_source(&context, &source, "")
            .map_err(|log| init_error("kernel build", log))?;
        let work_kernel =
            Kernel::create(&program, WORK_KERNEL).map_err(|e| init_error("kernel", e))?;
        let values_kernel =
            Kernel::create(&program, VALUES_KERNEL).map_err(|e| init_error("kernel", e))?;

        let attempt = Self::buffer(&context, CL_MEM_READ_ONLY, 1)?;
        let result = Self::buffer(&context, CL_MEM_READ_WRITE, 1)?;
        let root = Self::buffer(&context, CL_MEM_READ_ONLY, 4)?;
        let difficulty = Self::buffer(&context, CL_MEM_READ_ONLY, 1)?;

        log::info!("GPU engine initialized on {} (device {})", device_name, index);

        Ok(Self {
            _device: device,
            context,
            queue,
            work_kernel,
            values_kernel,
            attempt,
            result,
            root,
            difficulty,
            device_name,
        })
    }

    fn buffer(
        context: &Context,
        flags: cl_mem_flags,
        len: usize,
    ) -> Result<Buffer<cl_ulong>, WorkError> {
        unsafe {
            Buffer::<cl_ulong>::create(context, flags, len, ptr::null_mut())
                .map_err(|e| init_error("buffer", e))
        }
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    /// Work values of arbitrary nonces, computed on the device
    pub fn values(&self, job: &WorkJob, nonces: &[u64]) -> Result<Vec<u64>, WorkError> {
        if nonces.is_empty() {
            return Ok(Vec::new());
        }

        let mut root = unsafe {
            Buffer::<cl_ulong>::create(&self.context, CL_MEM_READ_ONLY, 4, ptr::null_mut())
                .map_err(|e| WorkError::device("allocate", e))?
        };
        let mut input = unsafe {
            Buffer::<cl_ulong>::create(
                &self.context,
                CL_MEM_READ_ONLY,
                nonces.len(),
                ptr::null_mut(),
            )
            .map_err(|e| WorkError::device("allocate", e))?
        };
        let output = unsafe {
            Buffer::<cl_ulong>::create(
                &self.context,
                CL_MEM_WRITE_ONLY,
                nonces.len(),
                ptr::null_mut(),
            )
            .map_err(|e| WorkError::device("allocate", e))?
        };

        upload(&self.queue, &mut root, job.root_words())?;
        upload(&self.queue, &mut input, nonces)?;

        let event = unsafe {
            ExecuteKernel::new(&self.values_kernel)
                .set_arg(&input)
                .set_arg(&output)
                .set_arg(&root)
                .set_global_work_size(nonces.len())
                .enqueue_nd_range(&self.queue)
                .map_err(|e| WorkError::device("launch", e))?
        };
        event.wait().map_err(|e| WorkError::device("launch", e))?;

        let mut values = vec![0u64; nonces.len()];
        readback(&self.queue, &output, &mut values)?;
        Ok(values)
    }
}

impl WorkEngine for GpuEngine {
    fn name(&self) -> &'static str {
        "opencl-blake2b"
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Gpu
    }

    fn prepare(&mut self, job: &WorkJob) -> Result<(), WorkError> {
        upload(&self.queue, &mut self.root, job.root_words())?;
        upload(&self.queue, &mut self.difficulty, &[job.difficulty()])
    }

    fn evaluate(&mut self, _job: &WorkJob, batch: Batch) -> Result<BatchOutcome, WorkError> {
        upload(&self.queue, &mut self.attempt, &[batch.start])?;
        upload(&self.queue, &mut self.result, &[WinnerSlot::EMPTY])?;

        let event = unsafe {
            ExecuteKernel::new(&self.work_kernel)
                .set_arg(&self.attempt)
                .set_arg(&self.result)
                .set_arg(&self.root)
                .set_arg(&self.difficulty)
                .set_global_work_size(batch.size as usize)
                .enqueue_nd_range(&self.queue)
                .map_err(|e| WorkError::device("launch", e))?
        };
        event.wait().map_err(|e| WorkError::device("launch", e))?;

        let mut winner = [WinnerSlot::EMPTY];
        readback(&self.queue, &self.result, &mut winner)?;

        Ok(BatchOutcome {
            winner: match winner[0] {
                WinnerSlot::EMPTY => None,
                nonce => Some(nonce),
            },
            hashes: batch.size,
        })
    }
}
