//! Device traits and the fail-closed batch call.

use aes_core::{block_count, Aes128Key, Direction, Error};
use log::{debug, warn};

use crate::error::{AcceleratorError, Result};
use crate::protocol::{Request, Response};

/// An acquired device. Dropping it releases every device resource it holds.
pub trait Session {
    /// Runs one batch synchronously, blocking until the device answers.
    fn submit(&mut self, request: &Request) -> Result<Response>;
}

/// A device able to transform whole batches of blocks.
pub trait Accelerator {
    /// Human-readable device name for logs.
    fn name(&self) -> &str;

    /// Acquires a session scoped to a single batch.
    fn open(&self) -> Result<Box<dyn Session + '_>>;
}

/// Offloads `blocks` blocks of `buffer` to `accel`.
///
/// The caller's buffer is only overwritten once the device has returned a
/// response of exactly `16 * blocks` bytes; on any failure it is left as it was.
pub fn run_batch<A: Accelerator + ?Sized>(
    accel: &A,
    mode: Direction,
    buffer: &mut [u8],
    blocks: usize,
    key: &Aes128Key,
) -> Result<()> {
    if block_count(buffer.len())? != blocks {
        return Err(Error::InvalidBufferLength {
            len: buffer.len(),
            blocks,
        }
        .into());
    }
    if blocks == 0 {
        return Ok(());
    }

    let response = {
        let mut session = accel.open().map_err(|err| {
            warn!("{}: could not open session: {err}", accel.name());
            err
        })?;
        debug!("{}: submitting {blocks} block(s) to {mode}", accel.name());
        let request = Request {
            mode,
            key: *key,
            data: buffer.to_vec(),
        };
        session.submit(&request).map_err(|err| {
            warn!("{}: batch failed: {err}", accel.name());
            err
        })?
    };

    if response.data.len() != buffer.len() {
        warn!(
            "{}: returned {} bytes for a {}-byte batch",
            accel.name(),
            response.data.len(),
            buffer.len()
        );
        return Err(AcceleratorError::Fault(format!(
            "expected {} bytes back, got {}",
            buffer.len(),
            response.data.len()
        )));
    }
    buffer.copy_from_slice(&response.data);
    Ok(())
}
