//! Offload contract for running AES-128 batches on an external accelerator.
//!
//! A device is reached through an owned [`Session`] acquired per batch and
//! released on drop; no device handle outlives the batch it serves. The
//! [`LoopbackAccelerator`] implements the contract in software so callers
//! and tests can exercise the offload path without hardware.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod device;
mod error;
mod loopback;
mod protocol;

pub use device::{run_batch, Accelerator, Session};
pub use error::{AcceleratorError, Result};
pub use loopback::LoopbackAccelerator;
pub use protocol::{Request, Response};
