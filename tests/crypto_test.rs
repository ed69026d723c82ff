use chatcrypt::{
    create_cipher, galois, AlgorithmKind, BlockCipher, CryptoError, Error, Loki97, Magenta, Rc5, Result,
};

// ----- Galois Field Tests -----

#[test]
fn test_gf_multiply_commutes() {
    for (a, b) in [(0x3u16, 0x7u16), (0x155, 0x2AA), (0x1FFF, 0x1234 & 0x1FFF)] {
        assert_eq!(
            galois::gf_multiply(a, b, galois::S1_MODULUS, galois::S1_BITS),
            galois::gf_multiply(b, a, galois::S1_MODULUS, galois::S1_BITS)
        );
    }
}

#[test]
fn test_gf_cube_matches_repeated_multiply() {
    let x = 0x0ABCu16;
    let square = galois::gf_multiply(x, x, galois::S1_MODULUS, galois::S1_BITS);
    let cube = galois::gf_multiply(square, x, galois::S1_MODULUS, galois::S1_BITS);
    assert_eq!(galois::gf_cube(x, galois::S1_MODULUS, galois::S1_BITS), cube);
}

#[test]
fn test_sboxes_are_pure() {
    for x in [0u16, 1, 0x7FF, 0x1FFF] {
        assert_eq!(galois::s1(x), galois::s1(x));
        assert_eq!(galois::s2(x), galois::s2(x));
    }
}

// ----- Block Cipher Tests -----

fn all_ciphers() -> Vec<(AlgorithmKind, Box<dyn BlockCipher>)> {
    vec![
        (AlgorithmKind::Loki97, Box::new(Loki97::new())),
        (AlgorithmKind::Rc5, Box::new(Rc5::new())),
        (AlgorithmKind::Magenta, Box::new(Magenta::new())),
    ]
}

#[test]
fn test_block_round_trip_for_every_algorithm() -> Result<()> {
    for (kind, mut cipher) in all_ciphers() {
        cipher.set_key(&[0x5Au8; 16])?;
        assert_eq!(cipher.algorithm(), kind);
        assert!(cipher.is_initialized());

        let block: Vec<u8> = (0..cipher.block_size() as u8).collect();
        let encrypted = cipher.encrypt_block(&block)?;
        assert_ne!(encrypted, block, "{} left the block unchanged", kind);
        assert_eq!(cipher.decrypt_block(&encrypted)?, block, "{} failed to invert", kind);
    }
    Ok(())
}

#[test]
fn test_ciphers_require_a_key() {
    for (kind, cipher) in all_ciphers() {
        let block = vec![0u8; cipher.block_size()];
        assert!(
            matches!(cipher.encrypt_block(&block), Err(Error::Crypto(CryptoError::KeyNotSet))),
            "{} encrypted without a key",
            kind
        );
    }
}

#[test]
fn test_wrong_block_length_is_rejected() -> Result<()> {
    for (_, mut cipher) in all_ciphers() {
        cipher.set_key(&[1u8; 16])?;
        let short = vec![0u8; cipher.block_size() - 1];
        assert!(matches!(
            cipher.encrypt_block(&short),
            Err(Error::Crypto(CryptoError::InvalidBlockLength { .. }))
        ));
    }
    Ok(())
}

#[test]
fn test_different_keys_give_different_ciphertexts() -> Result<()> {
    for kind in AlgorithmKind::ALL {
        let mut a = create_cipher(kind);
        let mut b = create_cipher(kind);
        a.set_key(&[0u8; 16])?;
        b.set_key(&[1u8; 16])?;
        let block = vec![0x33u8; a.block_size()];
        assert_ne!(a.encrypt_block(&block)?, b.encrypt_block(&block)?, "{}", kind);
    }
    Ok(())
}

#[test]
fn test_rc5_reference_vector() -> Result<()> {
    let mut rc5 = Rc5::with_params(32, 12)?;
    rc5.set_key(&[0u8; 16])?;
    let encrypted = rc5.encrypt_block(&[0u8; 8])?;
    assert_eq!(hex::encode(&encrypted), "21a5dbee154b8f6d");
    Ok(())
}

#[test]
fn test_rc5_parameters_are_validated() {
    assert!(Rc5::with_params(24, 12).is_err());
    assert!(Rc5::with_params(16, 256).is_err());

    let mut rc5 = Rc5::new();
    assert!(matches!(rc5.set_key(&[]), Err(Error::Crypto(CryptoError::EmptyKey))));
}

#[test]
fn test_loki97_rejects_other_key_sizes() {
    let mut loki = Loki97::new();
    assert!(matches!(
        loki.set_key(&[0u8; 24]),
        Err(Error::Crypto(CryptoError::InvalidKeyLength { expected: 16, actual: 24 }))
    ));
}

#[test]
fn test_magenta_round_counts_change_output() -> Result<()> {
    let mut short = Magenta::with_rounds(4);
    let mut long = Magenta::with_rounds(16);
    short.set_key(b"magenta key 0001")?;
    long.set_key(b"magenta key 0001")?;
    let block = [0x10u8; 16];
    let a = short.encrypt_block(&block)?;
    let b = long.encrypt_block(&block)?;
    assert_ne!(a, b);
    assert_eq!(short.decrypt_block(&a)?, block.to_vec());
    assert_eq!(long.decrypt_block(&b)?, block.to_vec());
    Ok(())
}

#[test]
fn test_cipher_shared_across_threads() -> Result<()> {
    let mut cipher = create_cipher(AlgorithmKind::Loki97);
    cipher.set_key(&[9u8; 16])?;
    let expected = cipher.encrypt_block(&[7u8; 16])?;

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                assert_eq!(cipher.encrypt_block(&[7u8; 16]).unwrap(), expected);
            });
        }
    });
    Ok(())
}
