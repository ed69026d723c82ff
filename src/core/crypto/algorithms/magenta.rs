/*!
Magenta-style substitution-diffusion cipher.

A 128-bit block is handled as two little-endian 64-bit words. Each round
runs the left word through an xorshift substitution, mixes in a round
key and the right word, then diffuses the right word into the new left.
Both the substitution and the diffusion are bijections on `u64` with
closed-form inverses, so decryption undoes encryption exactly.
*/

use byteorder::{ByteOrder, LittleEndian};

use crate::core::constants::sizes::magenta::{BLOCK_SIZE, ROUNDS};
use crate::core::crypto::config::AlgorithmKind;
use crate::core::crypto::traits::BlockCipher;
use crate::core::error::{CryptoError, Result};
use crate::crypto_err;

/// Two-word substitution-diffusion cipher
#[derive(Clone, Debug)]
pub struct Magenta {
    rounds: usize,
    round_keys: Option<Vec<u64>>,
}

impl Default for Magenta {
    fn default() -> Self {
        Self {
            rounds: ROUNDS,
            round_keys: None,
        }
    }
}

impl Magenta {
    /// Create a cipher with the default round count and no key set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cipher with a custom round count
    pub fn with_rounds(rounds: usize) -> Self {
        Self {
            rounds,
            round_keys: None,
        }
    }

    fn keys(&self) -> Result<&[u64]> {
        match self.round_keys.as_deref() {
            Some(keys) => Ok(keys),
            None => crypto_err!(CryptoError::KeyNotSet),
        }
    }

    fn read_words(block: &[u8]) -> Result<(u64, u64)> {
        if block.len() != BLOCK_SIZE {
            return crypto_err!(CryptoError::InvalidBlockLength {
                expected: BLOCK_SIZE,
                actual: block.len(),
            });
        }
        Ok((LittleEndian::read_u64(&block[..8]), LittleEndian::read_u64(&block[8..])))
    }

    fn write_words(a: u64, b: u64) -> Vec<u8> {
        let mut out = vec![0u8; BLOCK_SIZE];
        LittleEndian::write_u64(&mut out[..8], a);
        LittleEndian::write_u64(&mut out[8..], b);
        out
    }
}

impl BlockCipher for Magenta {
    fn set_key(&mut self, key: &[u8]) -> Result<()> {
        if key.is_empty() {
            return crypto_err!(CryptoError::EmptyKey);
        }
        let count = 2 * (self.rounds + 1);
        let keys = (0..count)
            .map(|i| ((i as u64) << 32) | u64::from(key[i % key.len()]))
            .collect();
        self.round_keys = Some(keys);
        Ok(())
    }

    fn encrypt_block(&self, block: &[u8]) -> Result<Vec<u8>> {
        let keys = self.keys()?;
        let (mut a, mut b) = Self::read_words(block)?;

        for i in 0..self.rounds {
            a = substitute(a) ^ keys[i % keys.len()] ^ b;
            b = diffuse(b) ^ a;
        }

        Ok(Self::write_words(a, b))
    }

    fn decrypt_block(&self, block: &[u8]) -> Result<Vec<u8>> {
        let keys = self.keys()?;
        let (mut a, mut b) = Self::read_words(block)?;

        for i in (0..self.rounds).rev() {
            b = diffuse_inverse(b ^ a);
            a = substitute_inverse(a ^ keys[i % keys.len()] ^ b);
        }

        Ok(Self::write_words(a, b))
    }

    fn block_size(&self) -> usize {
        BLOCK_SIZE
    }

    fn algorithm(&self) -> AlgorithmKind {
        AlgorithmKind::Magenta
    }

    fn is_initialized(&self) -> bool {
        self.round_keys.is_some()
    }
}

fn substitute(x: u64) -> u64 {
    let t = x ^ (x << 3);
    t ^ (t >> 2)
}

fn substitute_inverse(y: u64) -> u64 {
    undo_xor_shl(undo_xor_shr(y, 2), 3)
}

fn diffuse(x: u64) -> u64 {
    x ^ (x >> 1)
}

fn diffuse_inverse(y: u64) -> u64 {
    undo_xor_shr(y, 1)
}

/// Invert `y = x ^ (x << k)`
fn undo_xor_shl(y: u64, k: u32) -> u64 {
    let mut x = y;
    let mut shift = k;
    while shift < 64 {
        x ^= x << shift;
        shift *= 2;
    }
    x
}

/// Invert `y = x ^ (x >> k)`
fn undo_xor_shr(y: u64, k: u32) -> u64 {
    let mut x = y;
    let mut shift = k;
    while shift < 64 {
        x ^= x >> shift;
        shift *= 2;
    }
    x
}
