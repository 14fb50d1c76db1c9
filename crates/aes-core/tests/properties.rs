//! Property-based tests for the block cipher and the batch driver.

use aes_core::{
    decrypt_block, decrypt_blocks, derive_schedule, encrypt_block, encrypt_blocks,
    encrypt_blocks_with, expand_key, inv_mix_columns, inv_shift_rows, inv_sub_bytes,
    mix_columns, shift_rows, sub_bytes, Aes128Key, BatchConfig, Block, Error, BLOCK_SIZE,
};
use proptest::prelude::*;

/// Whole blocks, up to 32 of them.
fn block_aligned_data() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<[u8; 16]>(), 0..=32).prop_map(|blocks| blocks.concat())
}

proptest! {
    #[test]
    fn block_round_trip(key in any::<[u8; 16]>(), plain in any::<[u8; 16]>()) {
        let schedule = expand_key(&Aes128Key::from(key));
        let cipher = encrypt_block(&plain, &schedule);
        prop_assert_eq!(decrypt_block(&cipher, &schedule), plain);
    }

    #[test]
    fn schedule_derivation_is_deterministic(key in any::<[u8; 16]>()) {
        let a = derive_schedule(&key).unwrap();
        let b = derive_schedule(&key).unwrap();
        prop_assert_eq!(a.to_bytes(), b.to_bytes());
        prop_assert_eq!(a, expand_key(&Aes128Key::from(key)));
    }

    #[test]
    fn rejects_non_128_bit_keys(key in prop::collection::vec(any::<u8>(), 0..64)) {
        prop_assume!(key.len() != 16);
        prop_assert_eq!(derive_schedule(&key), Err(Error::InvalidKeyLength { got: key.len() }));
    }

    #[test]
    fn layers_invert(state in any::<[u8; 16]>()) {
        let mut s: Block = state;
        sub_bytes(&mut s);
        shift_rows(&mut s);
        mix_columns(&mut s);
        inv_mix_columns(&mut s);
        inv_shift_rows(&mut s);
        inv_sub_bytes(&mut s);
        prop_assert_eq!(s, state);
    }

    #[test]
    fn batch_is_blockwise(key in any::<[u8; 16]>(), data in block_aligned_data()) {
        let schedule = expand_key(&Aes128Key::from(key));
        let blocks = data.len() / BLOCK_SIZE;
        let mut batch = data.clone();
        encrypt_blocks(&mut batch, blocks, &schedule).unwrap();

        let expected: Vec<u8> = data
            .chunks_exact(BLOCK_SIZE)
            .flat_map(|chunk| {
                let block: Block = chunk.try_into().unwrap();
                encrypt_block(&block, &schedule)
            })
            .collect();
        prop_assert_eq!(&batch, &expected);

        let mut parallel = data.clone();
        encrypt_blocks_with(&mut parallel, blocks, &schedule, &BatchConfig::with_workers(4)).unwrap();
        prop_assert_eq!(&parallel, &expected);

        decrypt_blocks(&mut batch, blocks, &schedule).unwrap();
        prop_assert_eq!(batch, data);
    }

    #[test]
    fn ragged_buffers_are_rejected(len in 0usize..256) {
        prop_assume!(len % BLOCK_SIZE != 0);
        let schedule = expand_key(&Aes128Key::from([0u8; 16]));
        let mut data = vec![0u8; len];
        let blocks = len / BLOCK_SIZE;
        prop_assert_eq!(
            encrypt_blocks(&mut data, blocks, &schedule),
            Err(Error::InvalidBufferLength { len, blocks })
        );
    }
}
