//! Engine configuration
//!
//! Read from a JSON file, then overridden by command-line flags. Every field
//! has a default so an empty object (or no file at all) is a valid config.

use std::fs;
use std::path::Path;
#[cfg(feature = "cli")]
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Which backend the generator should run on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendChoice {
    /// GPU when one is enumerated, otherwise CPU
    #[default]
    Auto,
    Gpu,
    Cpu,
}

impl std::str::FromStr for BackendChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(BackendChoice::Auto),
            "gpu" => Ok(BackendChoice::Gpu),
            "cpu" => Ok(BackendChoice::Cpu),
            other => Err(format!("unknown backend {other:?} (expected auto, gpu or cpu)")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub backend: BackendChoice,
    /// CPU worker threads (default: number of logical cores)
    pub threads: Option<usize>,
    /// Index among enumerated OpenCL GPUs
    pub gpu_device: usize,
}

impl EngineConfig {
    /// Load a JSON config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&contents)?)
    }

    /// Load `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// CPU thread count after applying the default
    pub fn cpu_threads(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get)
    }
}

/// `<config dir>/nanowork/config.json`
#[cfg(feature = "cli")]
pub fn default_config_path() -> PathBuf {
    let base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("nanowork").join("config.json")
}
