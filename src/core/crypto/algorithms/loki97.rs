/*!
LOKI97-style Feistel block cipher.

128-bit blocks, 128-bit keys, 16 rounds over a 48-entry subkey
schedule. The round function chains a key-controlled bit swap, a 64→96
bit expansion, two Galois-field S-box layers and a fixed bit
permutation. Tables and additive combinations are this engine's own and
deliberately differ from the published LOKI97 reference.
*/

use crate::core::constants::sizes::loki97::{BLOCK_SIZE, DELTA, KEY_SIZE, ROUNDS, SUBKEYS};
use crate::core::crypto::algorithms::galois::{s1, s2};
use crate::core::crypto::config::AlgorithmKind;
use crate::core::crypto::traits::BlockCipher;
use crate::core::crypto::utils::{add_bytes, sub_bytes, xor_bytes};
use crate::core::error::{CryptoError, Error, Result};
use crate::crypto_err;

type Half = [u8; 8];

/// Bit permutation applied between the S-box layers (MSB-first indices)
const PERMUTATION: [usize; 64] = [
    56, 48, 40, 32, 24, 16, 8, 0,
    57, 49, 41, 33, 25, 17, 9, 1,
    58, 50, 42, 34, 26, 18, 10, 2,
    59, 51, 43, 35, 27, 19, 11, 3,
    60, 52, 44, 36, 28, 20, 12, 4,
    61, 53, 45, 37, 29, 21, 13, 5,
    62, 54, 46, 38, 30, 22, 14, 6,
    63, 55, 47, 39, 31, 23, 15, 7,
];

/// Feistel cipher with a 48-subkey schedule
#[derive(Clone, Default)]
pub struct Loki97 {
    subkeys: Option<Box<[Half; SUBKEYS]>>,
}

impl Loki97 {
    /// Create a cipher with no key set
    pub fn new() -> Self {
        Self::default()
    }

    fn schedule(&self) -> Result<&[Half; SUBKEYS]> {
        match self.subkeys.as_deref() {
            Some(subkeys) => Ok(subkeys),
            None => crypto_err!(CryptoError::KeyNotSet),
        }
    }

    fn check_block(block: &[u8]) -> Result<(Half, Half)> {
        if block.len() != BLOCK_SIZE {
            return crypto_err!(CryptoError::InvalidBlockLength {
                expected: BLOCK_SIZE,
                actual: block.len(),
            });
        }
        Ok(split(block))
    }
}

impl BlockCipher for Loki97 {
    fn set_key(&mut self, key: &[u8]) -> Result<()> {
        if key.len() != KEY_SIZE {
            return crypto_err!(CryptoError::InvalidKeyLength {
                expected: KEY_SIZE,
                actual: key.len(),
            });
        }
        let (ka, kb) = split(key);
        self.subkeys = Some(Box::new(expand_key(ka, kb)?));
        Ok(())
    }

    fn encrypt_block(&self, block: &[u8]) -> Result<Vec<u8>> {
        let subkeys = self.schedule()?;
        let (mut l, mut r) = Self::check_block(block)?;

        for i in 1..=ROUNDS {
            let (sk1, sk2, sk3) = round_subkeys(subkeys, i);
            let r_sk1 = add(r, sk1)?;
            let new_r = xor(l, f(r_sk1, sk2))?;
            let new_l = add(r_sk1, sk3)?;
            l = new_l;
            r = new_r;
        }

        Ok(join(r, l))
    }

    fn decrypt_block(&self, block: &[u8]) -> Result<Vec<u8>> {
        let subkeys = self.schedule()?;
        let (mut l, mut r) = Self::check_block(block)?;

        for i in (1..=ROUNDS).rev() {
            let (sk1, sk2, sk3) = round_subkeys(subkeys, i);
            let r_sk3 = sub(r, sk3)?;
            let new_r = xor(l, f(r_sk3, sk2))?;
            let new_l = sub(r_sk3, sk1)?;
            l = new_l;
            r = new_r;
        }

        Ok(join(r, l))
    }

    fn block_size(&self) -> usize {
        BLOCK_SIZE
    }

    fn algorithm(&self) -> AlgorithmKind {
        AlgorithmKind::Loki97
    }

    fn is_initialized(&self) -> bool {
        self.subkeys.is_some()
    }
}

/// Subkeys (SK1, SK2, SK3) for round `i`, indices 3i-2, 3i-1 and 3i mod 48
fn round_subkeys(subkeys: &[Half; SUBKEYS], i: usize) -> (Half, Half, Half) {
    (
        subkeys[(3 * i - 2) % SUBKEYS],
        subkeys[(3 * i - 1) % SUBKEYS],
        subkeys[(3 * i) % SUBKEYS],
    )
}

fn expand_key(ka: Half, kb: Half) -> Result<[Half; SUBKEYS]> {
    let mut k4 = ka;
    let mut k3 = kb;
    let mut k2 = f(kb, ka);
    let mut k1 = f(ka, kb);

    let mut subkeys = [[0u8; 8]; SUBKEYS];
    for (i, subkey) in subkeys.iter_mut().enumerate() {
        *subkey = xor(k1, g(k1, k3, k2, i as u64)?)?;
        (k1, k2, k3, k4) = (k4, k1, k2, k3);
    }
    Ok(subkeys)
}

fn g(k1: Half, k3: Half, k2: Half, i: u64) -> Result<Half> {
    let delta = DELTA.wrapping_mul(i).to_be_bytes();
    Ok(f(add(add(k1, k3)?, delta)?, k2))
}

/// Round function
fn f(a: Half, b: Half) -> Half {
    sb(permute(sa(expand(key_permute(a, b)))), b)
}

/// Swap bit `i` of the two 32-bit halves of `a` wherever bit `i` of the
/// low half of `b` is set
fn key_permute(a: Half, b: Half) -> Half {
    let mut out = a;
    for i in 0..32 {
        let mask = 1u8 << (7 - i % 8);
        if b[4 + i / 8] & mask != 0 {
            let left = out[i / 8] & mask;
            let right = out[4 + i / 8] & mask;
            if left != right {
                out[i / 8] ^= mask;
                out[4 + i / 8] ^= mask;
            }
        }
    }
    out
}

/// Expansion of 64 bits to 96 bits
fn expand(input: Half) -> [u8; 12] {
    [
        (input[0] >> 4) & 0x1F,
        (input[7] >> 6) & 0x3F,
        input[5] >> 4,
        input[4] >> 4,
        input[3] >> 3,
        input[2] >> 2,
        input[1] >> 2,
        input[7],
        input[6],
        (input[5] >> 5) & 0x1F,
        input[4] >> 3,
        input[3] >> 6,
    ]
}

/// Unkeyed S-box layer over the first 64 expanded bits
fn sa(expanded: [u8; 12]) -> Half {
    let mut out = [0u8; 8];
    for (i, byte) in out.iter_mut().enumerate() {
        let x = u16::from(expanded[i]);
        *byte = if i % 2 == 0 { s1(x) } else { s2(x) };
    }
    out
}

/// Keyed S-box layer: S2 over the data on even bytes, S1 over the key on odd bytes
fn sb(a: Half, b: Half) -> Half {
    let mut out = [0u8; 8];
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = if i % 2 == 0 {
            s2(u16::from(a[i]))
        } else {
            s1(u16::from(b[i]))
        };
    }
    out
}

fn permute(input: Half) -> Half {
    let mut out = [0u8; 8];
    for (i, &p) in PERMUTATION.iter().enumerate() {
        if (input[p / 8] >> (7 - p % 8)) & 1 == 1 {
            out[i / 8] |= 1 << (7 - i % 8);
        }
    }
    out
}

fn split(bytes: &[u8]) -> (Half, Half) {
    let mut left = [0u8; 8];
    let mut right = [0u8; 8];
    left.copy_from_slice(&bytes[..8]);
    right.copy_from_slice(&bytes[8..16]);
    (left, right)
}

fn join(first: Half, second: Half) -> Vec<u8> {
    let mut out = Vec::with_capacity(BLOCK_SIZE);
    out.extend_from_slice(&first);
    out.extend_from_slice(&second);
    out
}

fn to_half(bytes: Vec<u8>) -> Result<Half> {
    let len = bytes.len();
    bytes.try_into().map_err(|_| {
        Error::Crypto(CryptoError::LengthMismatch {
            left: len,
            right: BLOCK_SIZE / 2,
        })
    })
}

fn xor(a: Half, b: Half) -> Result<Half> {
    to_half(xor_bytes(&a, &b)?)
}

fn add(a: Half, b: Half) -> Result<Half> {
    to_half(add_bytes(&a, &b)?)
}

fn sub(a: Half, b: Half) -> Result<Half> {
    to_half(sub_bytes(&a, &b)?)
}
