//! Accelerator failure modes.

use thiserror::Error;

/// Errors surfaced by an accelerator batch. Any of them fails the whole batch.
#[derive(Debug, Error)]
pub enum AcceleratorError {
    /// No device could be acquired.
    #[error("accelerator unavailable: {0}")]
    Unavailable(String),

    /// The device accepted the request but did not return a usable result.
    #[error("accelerator fault: {0}")]
    Fault(String),

    /// The request was malformed before it reached the device.
    #[error(transparent)]
    Core(#[from] aes_core::Error),
}

impl From<bincode::Error> for AcceleratorError {
    fn from(err: bincode::Error) -> Self {
        AcceleratorError::Fault(format!("frame codec: {err}"))
    }
}

/// Result alias for accelerator operations.
pub type Result<T> = core::result::Result<T, AcceleratorError>;
