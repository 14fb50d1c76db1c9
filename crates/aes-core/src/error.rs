//! Error type shared by the key schedule and the batch driver.

use thiserror::Error;

/// Errors raised before any block is transformed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// The cipher key was not exactly 16 bytes.
    #[error("invalid key length: expected 16 bytes, got {got}")]
    InvalidKeyLength {
        /// Number of bytes supplied.
        got: usize,
    },

    /// The buffer is not a whole number of blocks, or disagrees with the declared block count.
    #[error("invalid buffer length: {len} bytes for {blocks} declared blocks")]
    InvalidBufferLength {
        /// Buffer length in bytes.
        len: usize,
        /// Declared number of 16-byte blocks.
        blocks: usize,
    },
}

/// Result alias for fallible AES operations.
pub type Result<T> = core::result::Result<T, Error>;
