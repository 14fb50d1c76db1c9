//! Software device that honours the accelerator contract.
//!
//! Requests cross an encoded frame boundary just as they would on a real
//! transport; the device side expands the key itself and runs the core
//! batch driver.

use std::sync::atomic::{AtomicUsize, Ordering};

use aes_core::{apply_blocks_with, block_count, expand_key, BatchConfig};
use log::debug;

use crate::device::{Accelerator, Session};
use crate::error::{AcceleratorError, Result};
use crate::protocol::{Request, Response};

/// In-process accelerator backed by `aes-core`.
#[derive(Debug, Default)]
pub struct LoopbackAccelerator {
    offline: bool,
    config: BatchConfig,
    sessions: AtomicUsize,
}

impl LoopbackAccelerator {
    /// Creates an online device running batches on the submitting thread.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an online device that spreads each batch over worker threads.
    pub fn with_config(config: BatchConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Creates a device that refuses every session.
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    /// Number of sessions currently held open.
    pub fn active_sessions(&self) -> usize {
        self.sessions.load(Ordering::SeqCst)
    }

    fn execute(&self, frame: &[u8]) -> Result<Vec<u8>> {
        let Request { mode, key, mut data } = Request::decode(frame)?;
        let schedule = expand_key(&key);
        let blocks = block_count(data.len())?;
        apply_blocks_with(mode, &mut data, blocks, &schedule, &self.config)?;
        Ok(Response { data }.encode()?)
    }
}

impl Accelerator for LoopbackAccelerator {
    fn name(&self) -> &str {
        "loopback"
    }

    fn open(&self) -> Result<Box<dyn Session + '_>> {
        if self.offline {
            return Err(AcceleratorError::Unavailable(
                "loopback device is offline".into(),
            ));
        }
        let live = self.sessions.fetch_add(1, Ordering::SeqCst) + 1;
        debug!("loopback: session acquired ({live} live)");
        Ok(Box::new(LoopbackSession { device: self }))
    }
}

struct LoopbackSession<'a> {
    device: &'a LoopbackAccelerator,
}

impl Session for LoopbackSession<'_> {
    fn submit(&mut self, request: &Request) -> Result<Response> {
        let frame = request.encode()?;
        let reply = self.device.execute(&frame)?;
        Ok(Response::decode(&reply)?)
    }
}

impl Drop for LoopbackSession<'_> {
    fn drop(&mut self) {
        let live = self.device.sessions.fetch_sub(1, Ordering::SeqCst) - 1;
        debug!("loopback: session released ({live} live)");
    }
}
