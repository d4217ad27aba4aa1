//! Backend selection
//!
//! `Auto` prefers a GPU whenever one is enumerated. Once a GPU has been seen,
//! failing to bring it up is reported as an error; there is no quiet retreat
//! to the CPU that would hide a broken driver.

use crate::config::{BackendChoice, EngineConfig};
use crate::engine::cpu::CpuEngine;
use crate::engine::WorkEngine;
use crate::error::WorkError;

/// Number of usable OpenCL GPUs (0 when built without `opencl`)
pub fn gpu_device_count() -> usize {
    #[cfg(feature = "opencl")]
    {
        super::gpu::device_count()
    }
    #[cfg(not(feature = "opencl"))]
    {
        0
    }
}

#[cfg(feature = "opencl")]
fn open_gpu(index: usize) -> Result<Box<dyn WorkEngine>, WorkError> {
    Ok(Box::new(super::gpu::GpuEngine::new(index)?))
}

#[cfg(not(feature = "opencl"))]
fn open_gpu(_index: usize) -> Result<Box<dyn WorkEngine>, WorkError> {
    Err(WorkError::BackendUnavailable(
        "built without OpenCL support".to_string(),
    ))
}

fn open_cpu(config: &EngineConfig) -> Result<Box<dyn WorkEngine>, WorkError> {
    Ok(Box::new(CpuEngine::new(config.cpu_threads())?))
}

/// Build the engine `config` asks for
pub fn select_engine(config: &EngineConfig) -> Result<Box<dyn WorkEngine>, WorkError> {
    select_with(config, gpu_device_count(), open_gpu)
}

fn select_with<G>(
    config: &EngineConfig,
    gpu_count: usize,
    open_gpu: G,
) -> Result<Box<dyn WorkEngine>, WorkError>
where
    G: FnOnce(usize) -> Result<Box<dyn WorkEngine>, WorkError>,
{
    match config.backend {
        BackendChoice::Cpu => open_cpu(config),
        BackendChoice::Gpu => {
            if gpu_count == 0 {
                return Err(WorkError::BackendUnavailable(
                    "no OpenCL GPU found".to_string(),
                ));
            }
            open_gpu(config.gpu_device)
        }
        BackendChoice::Auto if gpu_count > 0 => {
            log::debug!("{} GPU(s) enumerated, using device {}", gpu_count, config.gpu_device);
            open_gpu(config.gpu_device)
        }
        BackendChoice::Auto => {
            log::debug!("no GPU enumerated, using CPU");
            open_cpu(config)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::BackendKind;

    fn config(backend: BackendChoice, threads: Option<usize>) -> EngineConfig {
        EngineConfig {
            backend,
            threads,
            gpu_device: 0,
        }
    }

    fn unreachable_gpu(_: usize) -> Result<Box<dyn WorkEngine>, WorkError> {
        panic!("GPU must not be opened")
    }

    fn broken_gpu(_: usize) -> Result<Box<dyn WorkEngine>, WorkError> {
        Err(WorkError::BackendUnavailable("context".to_string()))
    }

    #[test]
    fn test_auto_without_gpu_uses_cpu() {
        let engine = select_with(&config(BackendChoice::Auto, Some(1)), 0, unreachable_gpu).unwrap();
        assert_eq!(engine.kind(), BackendKind::Cpu);
    }

    #[test]
    fn test_auto_without_any_backend_is_unavailable() {
        let result = select_with(&config(BackendChoice::Auto, Some(0)), 0, unreachable_gpu);
        assert!(matches!(result, Err(WorkError::BackendUnavailable(_))));
    }

    #[test]
    fn test_enumerated_gpu_failure_is_not_masked() {
        let result = select_with(&config(BackendChoice::Auto, Some(1)), 1, broken_gpu);
        assert!(matches!(result, Err(WorkError::BackendUnavailable(_))));
    }

    #[test]
    fn test_forced_gpu_without_devices() {
        let result = select_with(&config(BackendChoice::Gpu, Some(1)), 0, unreachable_gpu);
        assert!(matches!(result, Err(WorkError::BackendUnavailable(_))));
    }

    #[test]
    fn test_forced_cpu_ignores_gpus() {
        let engine = select_with(&config(BackendChoice::Cpu, Some(2)), 4, unreachable_gpu).unwrap();
        assert_eq!(engine.kind(), BackendKind::Cpu);
    }
}
