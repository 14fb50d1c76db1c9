//! AES-128 key expansion.

use log::debug;

use crate::block::BLOCK_SIZE;
use crate::error::Result;
use crate::key::{Aes128Key, KeySchedule, ROUNDS, SCHEDULE_BYTES};
use crate::sbox::{sbox, RCON};

/// RotWord, SubWord and the round constant, applied to the word that opens each round key.
fn schedule_core(word: &mut [u8; 4], round: usize) {
    word.rotate_left(1);
    for byte in word.iter_mut() {
        *byte = sbox(*byte);
    }
    word[0] ^= RCON[round];
}

/// Expands a 128-bit key into 11 round keys.
pub fn expand_key(key: &Aes128Key) -> KeySchedule {
    let mut expanded = [0u8; SCHEDULE_BYTES];
    expanded[..BLOCK_SIZE].copy_from_slice(key.as_bytes());

    let mut round = 1;
    let mut offset = BLOCK_SIZE;
    while offset < SCHEDULE_BYTES {
        let mut temp = [0u8; 4];
        temp.copy_from_slice(&expanded[offset - 4..offset]);
        if offset % BLOCK_SIZE == 0 {
            schedule_core(&mut temp, round);
            round += 1;
        }
        for t in temp {
            expanded[offset] = expanded[offset - BLOCK_SIZE] ^ t;
            offset += 1;
        }
    }

    let mut round_keys = [[0u8; BLOCK_SIZE]; ROUNDS + 1];
    for (round_key, chunk) in round_keys
        .iter_mut()
        .zip(expanded.chunks_exact(BLOCK_SIZE))
    {
        round_key.copy_from_slice(chunk);
    }
    KeySchedule(round_keys)
}

/// Derives the key schedule from raw key bytes, rejecting anything but 16 bytes.
pub fn derive_schedule(key: &[u8]) -> Result<KeySchedule> {
    let key = Aes128Key::try_from(key)?;
    debug!("derived AES-128 key schedule ({} round keys)", ROUNDS + 1);
    Ok(expand_key(&key))
}
