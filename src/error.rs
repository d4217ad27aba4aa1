//! Error taxonomy for work generation

use thiserror::Error;

/// Why a work request could not produce a nonce
///
/// No variant is ever turned into a default nonce: callers either get a
/// nonce that meets the difficulty or one of these.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkError {
    /// No CPU or GPU execution resource could be set up
    #[error("no usable work backend: {0}")]
    BackendUnavailable(String),

    /// Rejected before any hashing took place
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A compute device call failed mid-search
    #[error("compute device failure during {stage}: {message}")]
    DeviceFailure {
        stage: &'static str,
        message: String,
    },
}

impl WorkError {
    pub(crate) fn device(stage: &'static str, err: impl std::fmt::Display) -> Self {
        WorkError::DeviceFailure {
            stage,
            message: err.to_string(),
        }
    }
}
