//! Key types for AES-128.

use crate::block::{Block, BLOCK_SIZE};
use crate::error::Error;

/// Number of rounds for AES-128.
pub const ROUNDS: usize = 10;

/// Size in bytes of a fully expanded key schedule.
pub const SCHEDULE_BYTES: usize = BLOCK_SIZE * (ROUNDS + 1);

/// AES-128 key wrapper.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Aes128Key(pub [u8; 16]);

impl Aes128Key {
    /// Returns the raw key bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }
}

impl From<[u8; 16]> for Aes128Key {
    fn from(value: [u8; 16]) -> Self {
        Self(value)
    }
}

impl TryFrom<&[u8]> for Aes128Key {
    type Error = Error;

    fn try_from(value: &[u8]) -> Result<Self, Self::Error> {
        let bytes: [u8; 16] = value
            .try_into()
            .map_err(|_| Error::InvalidKeyLength { got: value.len() })?;
        Ok(Self(bytes))
    }
}

/// Expanded key schedule: one round key per round plus the initial whitening key.
///
/// Never mutated after derivation, so a single schedule can be shared by
/// reference across any number of concurrent block operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeySchedule(pub(crate) [Block; ROUNDS + 1]);

impl KeySchedule {
    /// Returns the round key at the requested index (0..=10).
    #[inline]
    pub fn round_key(&self, round: usize) -> &Block {
        &self.0[round]
    }

    /// Returns all round keys in order.
    #[inline]
    pub fn round_keys(&self) -> &[Block; ROUNDS + 1] {
        &self.0
    }

    /// Flattens the schedule into its 176-byte wire layout.
    pub fn to_bytes(&self) -> [u8; SCHEDULE_BYTES] {
        let mut out = [0u8; SCHEDULE_BYTES];
        for (chunk, round_key) in out.chunks_exact_mut(BLOCK_SIZE).zip(self.0.iter()) {
            chunk.copy_from_slice(round_key);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_from_slice_checks_length() {
        let bytes = [7u8; 16];
        let key = Aes128Key::try_from(&bytes[..]).unwrap();
        assert_eq!(key.as_bytes(), &bytes);

        assert_eq!(
            Aes128Key::try_from(&bytes[..15]),
            Err(Error::InvalidKeyLength { got: 15 })
        );
        assert_eq!(
            Aes128Key::try_from(&[0u8; 32][..]),
            Err(Error::InvalidKeyLength { got: 32 })
        );
    }

    #[test]
    fn schedule_flattens_in_round_order() {
        let mut rounds = [[0u8; 16]; ROUNDS + 1];
        for (i, rk) in rounds.iter_mut().enumerate() {
            *rk = [i as u8; 16];
        }
        let schedule = KeySchedule(rounds);
        let flat = schedule.to_bytes();
        assert_eq!(flat.len(), 176);
        assert_eq!(&flat[..16], &[0u8; 16]);
        assert_eq!(&flat[160..], &[10u8; 16]);
        assert_eq!(schedule.round_key(3), &[3u8; 16]);
    }
}
