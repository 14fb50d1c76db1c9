//! AES-128 block encryption and decryption.

use crate::block::Block;
use crate::key::{KeySchedule, ROUNDS};
use crate::round::{
    add_round_key, inv_mix_columns, inv_shift_rows, inv_sub_bytes, mix_columns, shift_rows,
    sub_bytes,
};

/// Encrypts a block in place with pre-expanded round keys.
pub fn encrypt_block_in_place(state: &mut Block, schedule: &KeySchedule) {
    add_round_key(state, schedule.round_key(0));

    for round in 1..ROUNDS {
        sub_bytes(state);
        shift_rows(state);
        mix_columns(state);
        add_round_key(state, schedule.round_key(round));
    }

    // the final round has no MixColumns
    sub_bytes(state);
    shift_rows(state);
    add_round_key(state, schedule.round_key(ROUNDS));
}

/// Decrypts a block in place with pre-expanded round keys.
pub fn decrypt_block_in_place(state: &mut Block, schedule: &KeySchedule) {
    add_round_key(state, schedule.round_key(ROUNDS));

    for round in (1..ROUNDS).rev() {
        inv_shift_rows(state);
        inv_sub_bytes(state);
        add_round_key(state, schedule.round_key(round));
        inv_mix_columns(state);
    }

    inv_shift_rows(state);
    inv_sub_bytes(state);
    add_round_key(state, schedule.round_key(0));
}

/// Encrypts a single 16-byte block with pre-expanded round keys.
pub fn encrypt_block(block: &Block, schedule: &KeySchedule) -> Block {
    let mut state = *block;
    encrypt_block_in_place(&mut state, schedule);
    state
}

/// Decrypts a single 16-byte block with pre-expanded round keys.
pub fn decrypt_block(block: &Block, schedule: &KeySchedule) -> Block {
    let mut state = *block;
    decrypt_block_in_place(&mut state, schedule);
    state
}
