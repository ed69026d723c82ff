use std::io::Cursor;

use chatcrypt::{
    add_padding, remove_padding, AlgorithmKind, BlockCipher, CipherConfig, CipherContext, CipherMode, PaddingScheme,
    Rc5,
};

use proptest::prelude::*;

// Strategy for generating algorithms
fn algorithms() -> impl Strategy<Value = AlgorithmKind> {
    prop_oneof![
        Just(AlgorithmKind::Loki97),
        Just(AlgorithmKind::Rc5),
        Just(AlgorithmKind::Magenta),
    ]
}

// Strategy for generating modes of operation
fn modes() -> impl Strategy<Value = CipherMode> {
    prop::sample::select(CipherMode::ALL.to_vec())
}

// Strategy for padding schemes that round-trip any plaintext
fn lossless_paddings() -> impl Strategy<Value = PaddingScheme> {
    prop_oneof![
        Just(PaddingScheme::AnsiX923),
        Just(PaddingScheme::Pkcs7),
        Just(PaddingScheme::Iso10126),
    ]
}

// Strategy for generating keys of every accepted length
fn keys() -> impl Strategy<Value = Vec<u8>> {
    prop_oneof![
        prop::collection::vec(any::<u8>(), 16),
        prop::collection::vec(any::<u8>(), 24),
        prop::collection::vec(any::<u8>(), 32),
    ]
}

// Strategy for generating small non-empty messages
fn messages() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 1..300)
}

fn context(algorithm: AlgorithmKind, mode: CipherMode, padding: PaddingScheme, key: &[u8], iv: &[u8]) -> CipherContext {
    // LOKI97 only takes 16-byte keys
    let key = if algorithm == AlgorithmKind::Loki97 { &key[..16] } else { key };
    CipherContext::new(key, algorithm, mode, padding, iv, 16).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn test_encrypt_decrypt_roundtrip(
        algorithm in algorithms(),
        mode in modes(),
        padding in lossless_paddings(),
        key in keys(),
        iv in prop::collection::vec(any::<u8>(), 16),
        message in messages(),
    ) {
        let ctx = context(algorithm, mode, padding, &key, &iv);
        let encrypted = ctx.encrypt(&message).unwrap();
        prop_assert_eq!(encrypted.len() % 16, 0);
        prop_assert!(encrypted.len() > message.len());
        prop_assert_eq!(ctx.decrypt(&encrypted).unwrap(), message);
    }

    #[test]
    fn test_stream_roundtrip(
        algorithm in algorithms(),
        mode in modes(),
        key in keys(),
        message in prop::collection::vec(any::<u8>(), 0..2000),
        buffer_blocks in 1usize..8,
    ) {
        let config = CipherConfig::with_algorithms(algorithm, mode, PaddingScheme::Pkcs7)
            .with_stream_buffer_blocks(buffer_blocks);
        let key = if algorithm == AlgorithmKind::Loki97 { &key[..16] } else { &key[..] };
        let ctx = CipherContext::from_config(key, &[0x24u8; 16], config).unwrap();

        let mut sealed = Vec::new();
        ctx.encrypt_stream(Cursor::new(&message), &mut sealed).unwrap();
        let mut opened = Vec::new();
        ctx.decrypt_stream(Cursor::new(&sealed), &mut opened).unwrap();
        prop_assert_eq!(opened, message);
    }

    #[test]
    fn test_parallel_modes_ignore_worker_count(
        mode in prop_oneof![Just(CipherMode::Ecb), Just(CipherMode::Ctr)],
        message in prop::collection::vec(any::<u8>(), 1..20_000),
        workers in 2usize..16,
    ) {
        let base = CipherConfig::with_algorithms(AlgorithmKind::Magenta, mode, PaddingScheme::Pkcs7);
        let sequential = CipherContext::from_config(&[3u8; 16], &[4u8; 16], base.clone().with_workers(1)).unwrap();
        let parallel = CipherContext::from_config(&[3u8; 16], &[4u8; 16], base.with_workers(workers)).unwrap();
        prop_assert_eq!(sequential.encrypt(&message).unwrap(), parallel.encrypt(&message).unwrap());
    }

    #[test]
    fn test_padding_roundtrip(
        data in prop::collection::vec(any::<u8>(), 0..100),
        block_size in 1usize..=64,
        padding in lossless_paddings(),
    ) {
        let padded = add_padding(&data, block_size, padding).unwrap();
        prop_assert_eq!(padded.len() % block_size, 0);
        prop_assert!(padded.len() > data.len());
        prop_assert_eq!(remove_padding(&padded, padding).unwrap(), data);
    }

    #[test]
    fn test_rc5_single_bit_flip_spreads(
        key in prop::collection::vec(any::<u8>(), 16),
        block in prop::collection::vec(any::<u8>(), 16),
        bit in 0usize..128,
    ) {
        let mut rc5 = Rc5::new();
        rc5.set_key(&key).unwrap();

        let mut flipped = block.clone();
        flipped[bit / 8] ^= 1 << (bit % 8);
        let a = rc5.encrypt_block(&block).unwrap();
        let b = rc5.encrypt_block(&flipped).unwrap();
        let differing: u32 = a.iter().zip(&b).map(|(x, y)| (x ^ y).count_ones()).sum();
        prop_assert!(differing > 16, "only {} bits changed", differing);
    }

    #[test]
    fn test_rc5_key_bit_flip_changes_zero_block(
        key in prop::collection::vec(any::<u8>(), 16),
        bit in 0usize..128,
    ) {
        let zero = [0u8; 16];
        let mut rc5 = Rc5::new();
        rc5.set_key(&key).unwrap();
        let first = rc5.encrypt_block(&zero).unwrap();
        prop_assert_eq!(&first, &rc5.encrypt_block(&zero).unwrap());

        let mut flipped_key = key.clone();
        flipped_key[bit / 8] ^= 1 << (bit % 8);
        let mut other = Rc5::new();
        other.set_key(&flipped_key).unwrap();
        prop_assert_ne!(first, other.encrypt_block(&zero).unwrap());
    }
}
