//! AES-128 block cipher built from first principles.
//!
//! This crate follows FIPS-197 and provides:
//! - GF(2^8) arithmetic and the fixed substitution tables.
//! - Key schedule for AES-128.
//! - Single-block encryption and decryption.
//! - An ECB batch driver, sequential or spread over scoped threads.
//!
//! The implementation aims for clarity and testability rather than constant-time
//! guarantees; it should not be treated as side-channel hardened.

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod batch;
mod block;
mod cipher;
mod error;
mod gf;
mod key;
mod round;
mod sbox;
mod schedule;

pub use crate::batch::{
    apply_blocks, apply_blocks_with, block_count, decrypt_blocks, decrypt_blocks_with,
    encrypt_blocks, encrypt_blocks_with, BatchConfig, Direction,
};
pub use crate::block::{xor_in_place, Block, BLOCK_SIZE};
pub use crate::cipher::{
    decrypt_block, decrypt_block_in_place, encrypt_block, encrypt_block_in_place,
};
pub use crate::error::{Error, Result};
pub use crate::gf::{multiply, xtime};
pub use crate::key::{Aes128Key, KeySchedule, ROUNDS, SCHEDULE_BYTES};
pub use crate::round::{
    add_round_key, inv_mix_columns, inv_shift_rows, inv_sub_bytes, mix_columns, shift_rows,
    sub_bytes,
};
pub use crate::sbox::{inv_sbox, sbox, tables_consistent, RCON, RSBOX, SBOX};
pub use crate::schedule::{derive_schedule, expand_key};
