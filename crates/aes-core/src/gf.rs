//! Arithmetic in GF(2^8) modulo x^8 + x^4 + x^3 + x + 1.

/// Multiplies `x` by `{02}`, reducing by `0x1b` when the high bit overflows.
#[inline]
pub const fn xtime(x: u8) -> u8 {
    let shifted = x << 1;
    if x & 0x80 != 0 {
        shifted ^ 0x1b
    } else {
        shifted
    }
}

/// Full field multiplication by shift-and-add over the bits of `x`.
#[inline]
pub const fn multiply(mut x: u8, y: u8) -> u8 {
    let mut product = 0u8;
    let mut doubled = y;
    let mut i = 0;
    while i < 8 {
        if x & 1 != 0 {
            product ^= doubled;
        }
        x >>= 1;
        doubled = xtime(doubled);
        i += 1;
    }
    product
}
