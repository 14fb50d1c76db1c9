//! Block representation helpers.

/// Size of one AES block in bytes.
pub const BLOCK_SIZE: usize = 16;

/// AES block of 16 bytes, laid out column-major (`state[4 * col + row]`).
pub type Block = [u8; BLOCK_SIZE];

/// XORs `rhs` into `dst`.
#[inline]
pub fn xor_in_place(dst: &mut Block, rhs: &Block) {
    for (d, r) in dst.iter_mut().zip(rhs) {
        *d ^= r;
    }
}

/// Runs `f` over every whole block of `data`, writing each result back.
/// Trailing bytes short of a block are left alone.
pub(crate) fn for_each_block_mut(data: &mut [u8], mut f: impl FnMut(&mut Block)) {
    for chunk in data.chunks_exact_mut(BLOCK_SIZE) {
        let mut state = [0u8; BLOCK_SIZE];
        state.copy_from_slice(chunk);
        f(&mut state);
        chunk.copy_from_slice(&state);
    }
}
