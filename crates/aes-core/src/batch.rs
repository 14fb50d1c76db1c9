//! ECB batch driver over buffers of concatenated 16-byte blocks.

use core::fmt;
use core::num::NonZeroUsize;
use core::str::FromStr;
use std::thread;

use log::debug;

use crate::block::{for_each_block_mut, Block, BLOCK_SIZE};
use crate::cipher::{decrypt_block_in_place, encrypt_block_in_place};
use crate::error::{Error, Result};
use crate::key::KeySchedule;

/// Which way a batch is transformed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Direction {
    /// Plaintext to ciphertext.
    Encrypt,
    /// Ciphertext to plaintext.
    Decrypt,
}

impl Direction {
    /// Mode tag understood by external accelerators.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Encrypt => "encrypt",
            Direction::Decrypt => "decrypt",
        }
    }

    fn block_fn(self) -> fn(&mut Block, &KeySchedule) {
        match self {
            Direction::Encrypt => encrypt_block_in_place,
            Direction::Decrypt => decrypt_block_in_place,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "encrypt" | "enc" => Ok(Direction::Encrypt),
            "decrypt" | "dec" => Ok(Direction::Decrypt),
            other => Err(format!("unknown direction: {other}")),
        }
    }
}

/// Worker configuration for the batch driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Upper bound on threads used for one batch. `1` runs on the caller's thread.
    pub workers: NonZeroUsize,
}

impl BatchConfig {
    /// Uses `workers` threads; zero is treated as one.
    pub fn with_workers(workers: usize) -> Self {
        Self {
            workers: NonZeroUsize::new(workers).unwrap_or(NonZeroUsize::MIN),
        }
    }

    /// Uses as many threads as the platform reports available.
    pub fn available() -> Self {
        Self {
            workers: thread::available_parallelism().unwrap_or(NonZeroUsize::MIN),
        }
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            workers: NonZeroUsize::MIN,
        }
    }
}

/// Returns the number of whole blocks in a buffer of `len` bytes.
pub fn block_count(len: usize) -> Result<usize> {
    if len % BLOCK_SIZE != 0 {
        return Err(Error::InvalidBufferLength {
            len,
            blocks: len / BLOCK_SIZE,
        });
    }
    Ok(len / BLOCK_SIZE)
}

fn check_buffer(len: usize, blocks: usize) -> Result<()> {
    match blocks.checked_mul(BLOCK_SIZE) {
        Some(expected) if expected == len => Ok(()),
        _ => Err(Error::InvalidBufferLength { len, blocks }),
    }
}

fn process(direction: Direction, data: &mut [u8], schedule: &KeySchedule) {
    let transform = direction.block_fn();
    for_each_block_mut(data, |state| transform(state, schedule));
}

/// Transforms `blocks` independent blocks of `buffer` in place, in index order.
///
/// The buffer must be exactly `16 * blocks` bytes; otherwise nothing is
/// touched and [`Error::InvalidBufferLength`] is returned.
pub fn apply_blocks(
    direction: Direction,
    buffer: &mut [u8],
    blocks: usize,
    schedule: &KeySchedule,
) -> Result<()> {
    check_buffer(buffer.len(), blocks)?;
    debug!("{direction} {blocks} block(s) on the calling thread");
    process(direction, buffer, schedule);
    Ok(())
}

/// Encrypts every block of `buffer` in place.
pub fn encrypt_blocks(buffer: &mut [u8], blocks: usize, schedule: &KeySchedule) -> Result<()> {
    apply_blocks(Direction::Encrypt, buffer, blocks, schedule)
}

/// Decrypts every block of `buffer` in place.
pub fn decrypt_blocks(buffer: &mut [u8], blocks: usize, schedule: &KeySchedule) -> Result<()> {
    apply_blocks(Direction::Decrypt, buffer, blocks, schedule)
}

/// Like [`apply_blocks`], but spreads contiguous runs of blocks over scoped worker threads.
///
/// Each worker owns a disjoint slice of the buffer and reads the shared
/// schedule; output is identical to the sequential driver.
pub fn apply_blocks_with(
    direction: Direction,
    buffer: &mut [u8],
    blocks: usize,
    schedule: &KeySchedule,
    config: &BatchConfig,
) -> Result<()> {
    check_buffer(buffer.len(), blocks)?;

    let workers = config.workers.get().min(blocks);
    if workers <= 1 {
        debug!("{direction} {blocks} block(s) on the calling thread");
        process(direction, buffer, schedule);
        return Ok(());
    }

    let per_worker = blocks.div_ceil(workers);
    debug!("{direction} {blocks} block(s) across {workers} workers ({per_worker} per worker)");
    thread::scope(|scope| {
        for chunk in buffer.chunks_mut(per_worker * BLOCK_SIZE) {
            scope.spawn(move || process(direction, chunk, schedule));
        }
    });
    Ok(())
}

/// Parallel counterpart of [`encrypt_blocks`].
pub fn encrypt_blocks_with(
    buffer: &mut [u8],
    blocks: usize,
    schedule: &KeySchedule,
    config: &BatchConfig,
) -> Result<()> {
    apply_blocks_with(Direction::Encrypt, buffer, blocks, schedule, config)
}

/// Parallel counterpart of [`decrypt_blocks`].
pub fn decrypt_blocks_with(
    buffer: &mut [u8],
    blocks: usize,
    schedule: &KeySchedule,
    config: &BatchConfig,
) -> Result<()> {
    apply_blocks_with(Direction::Decrypt, buffer, blocks, schedule, config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cipher::encrypt_block;
    use crate::key::Aes128Key;
    use crate::schedule::expand_key;
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha20Rng;

    fn harness_schedule() -> KeySchedule {
        let key: [u8; 16] = core::array::from_fn(|i| i as u8 + 1);
        expand_key(&Aes128Key::from(key))
    }

    fn random_buffer(seed: u8, blocks: usize) -> Vec<u8> {
        let mut rng = ChaCha20Rng::from_seed([seed; 32]);
        let mut data = vec![0u8; blocks * BLOCK_SIZE];
        rng.fill_bytes(&mut data);
        data
    }

    #[test]
    fn batch_matches_single_block_encryption() {
        let schedule = harness_schedule();
        let original = random_buffer(1, 5);
        let mut data = original.clone();
        encrypt_blocks(&mut data, 5, &schedule).unwrap();

        for (out, input) in data
            .chunks_exact(BLOCK_SIZE)
            .zip(original.chunks_exact(BLOCK_SIZE))
        {
            let block: Block = input.try_into().unwrap();
            assert_eq!(out, &encrypt_block(&block, &schedule));
        }
    }

    #[test]
    fn equal_blocks_encrypt_equally() {
        let schedule = harness_schedule();
        let mut data = [0x42u8; 32];
        encrypt_blocks(&mut data, 2, &schedule).unwrap();
        assert_eq!(data[..16], data[16..]);
    }

    #[test]
    fn batch_round_trip() {
        let schedule = harness_schedule();
        let original = random_buffer(2, 9);
        let mut data = original.clone();
        encrypt_blocks(&mut data, 9, &schedule).unwrap();
        assert_ne!(data, original);
        decrypt_blocks(&mut data, 9, &schedule).unwrap();
        assert_eq!(data, original);
    }

    #[test]
    fn zero_blocks_is_a_no_op() {
        let schedule = harness_schedule();
        let mut data: Vec<u8> = Vec::new();
        encrypt_blocks(&mut data, 0, &schedule).unwrap();
        decrypt_blocks_with(&mut data, 0, &schedule, &BatchConfig::with_workers(4)).unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn rejects_ragged_buffer_without_touching_it() {
        let schedule = harness_schedule();
        let mut data = vec![0xaau8; 17];
        assert_eq!(
            encrypt_blocks(&mut data, 1, &schedule),
            Err(Error::InvalidBufferLength { len: 17, blocks: 1 })
        );
        assert!(data.iter().all(|&b| b == 0xaa));
    }

    #[test]
    fn rejects_block_count_mismatch() {
        let schedule = harness_schedule();
        let mut data = vec![0u8; 48];
        assert_eq!(
            decrypt_blocks(&mut data, 2, &schedule),
            Err(Error::InvalidBufferLength { len: 48, blocks: 2 })
        );
        assert_eq!(
            encrypt_blocks_with(&mut data, 4, &schedule, &BatchConfig::available()),
            Err(Error::InvalidBufferLength { len: 48, blocks: 4 })
        );
        assert_eq!(
            apply_blocks(Direction::Encrypt, &mut data, usize::MAX, &schedule),
            Err(Error::InvalidBufferLength {
                len: 48,
                blocks: usize::MAX
            })
        );
        assert!(data.iter().all(|&b| b == 0));
    }

    #[test]
    fn block_count_infers_whole_blocks() {
        assert_eq!(block_count(0), Ok(0));
        assert_eq!(block_count(64), Ok(4));
        assert_eq!(
            block_count(65),
            Err(Error::InvalidBufferLength { len: 65, blocks: 4 })
        );
    }

    #[test]
    fn parallel_matches_sequential() {
        let schedule = harness_schedule();
        for blocks in [1usize, 2, 7, 64, 101] {
            let original = random_buffer(blocks as u8, blocks);
            let mut sequential = original.clone();
            encrypt_blocks(&mut sequential, blocks, &schedule).unwrap();

            for workers in [1usize, 3, 8, 200] {
                let config = BatchConfig::with_workers(workers);
                let mut parallel = original.clone();
                encrypt_blocks_with(&mut parallel, blocks, &schedule, &config).unwrap();
                assert_eq!(parallel, sequential, "blocks={blocks} workers={workers}");

                decrypt_blocks_with(&mut parallel, blocks, &schedule, &config).unwrap();
                assert_eq!(parallel, original);
            }
        }
    }

    #[test]
    fn direction_tags() {
        assert_eq!(Direction::Encrypt.as_str(), "encrypt");
        assert_eq!(Direction::Decrypt.to_string(), "decrypt");
        assert_eq!("ENCRYPT".parse::<Direction>(), Ok(Direction::Encrypt));
        assert_eq!("dec".parse::<Direction>(), Ok(Direction::Decrypt));
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn zero_workers_means_one() {
        assert_eq!(BatchConfig::with_workers(0), BatchConfig::default());
        assert!(BatchConfig::available().workers.get() >= 1);
    }
}
