/*!
RC5-family block cipher.

Data-dependent rotations over two words per block. The default is
RC5-64/12 (two 64-bit words, 12 rounds, 16-byte blocks); 16- and 32-bit
words are supported with all arithmetic masked to the word width. Words
are read and written little-endian.
*/

use byteorder::{ByteOrder, LittleEndian};

use crate::core::constants::sizes::rc5::{MAGIC_16, MAGIC_32, MAGIC_64, ROUNDS, WORD_BITS};
use crate::core::crypto::config::AlgorithmKind;
use crate::core::crypto::traits::BlockCipher;
use crate::core::error::{ConfigError, CryptoError, Result};
use crate::{config_err, crypto_err};

/// RC5 with a configurable word size and round count
#[derive(Clone, Debug)]
pub struct Rc5 {
    word_bits: u32,
    rounds: usize,
    schedule: Option<Vec<u64>>,
}

impl Default for Rc5 {
    fn default() -> Self {
        Self {
            word_bits: WORD_BITS,
            rounds: ROUNDS,
            schedule: None,
        }
    }
}

impl Rc5 {
    /// RC5-64/12
    pub fn new() -> Self {
        Self::default()
    }

    /// RC5 with the given word size (16, 32 or 64 bits) and round count
    pub fn with_params(word_bits: u32, rounds: usize) -> Result<Self> {
        if !matches!(word_bits, 16 | 32 | 64) {
            return config_err!(ConfigError::UnsupportedWordSize(word_bits));
        }
        if rounds > 255 {
            return config_err!(ConfigError::InvalidParameter(format!(
                "RC5 supports at most 255 rounds, got {}",
                rounds
            )));
        }
        Ok(Self {
            word_bits,
            rounds,
            schedule: None,
        })
    }

    /// Word size in bits
    pub fn word_bits(&self) -> u32 {
        self.word_bits
    }

    /// Number of rounds
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    fn word_bytes(&self) -> usize {
        (self.word_bits / 8) as usize
    }

    fn mask(&self) -> u64 {
        if self.word_bits == 64 {
            u64::MAX
        } else {
            (1u64 << self.word_bits) - 1
        }
    }

    fn magic(&self) -> (u64, u64) {
        match self.word_bits {
            16 => MAGIC_16,
            32 => MAGIC_32,
            _ => MAGIC_64,
        }
    }

    fn add(&self, a: u64, b: u64) -> u64 {
        a.wrapping_add(b) & self.mask()
    }

    fn sub(&self, a: u64, b: u64) -> u64 {
        a.wrapping_sub(b) & self.mask()
    }

    fn rotl(&self, x: u64, n: u64) -> u64 {
        let n = (n % u64::from(self.word_bits)) as u32;
        if n == 0 {
            return x;
        }
        ((x << n) | (x >> (self.word_bits - n))) & self.mask()
    }

    fn rotr(&self, x: u64, n: u64) -> u64 {
        let n = (n % u64::from(self.word_bits)) as u32;
        if n == 0 {
            return x;
        }
        ((x >> n) | (x << (self.word_bits - n))) & self.mask()
    }

    fn expand_key(&self, key: &[u8]) -> Vec<u64> {
        let u = self.word_bytes();
        let c = key.len().div_ceil(u).max(1);
        let t = 2 * (self.rounds + 1);

        let mut l = vec![0u64; c];
        for i in (0..key.len()).rev() {
            l[i / u] = self.add(l[i / u] << 8, u64::from(key[i]));
        }

        let (p, q) = self.magic();
        let mut s = vec![0u64; t];
        s[0] = p & self.mask();
        for i in 1..t {
            s[i] = self.add(s[i - 1], q);
        }

        let (mut a, mut b) = (0u64, 0u64);
        let (mut i, mut j) = (0usize, 0usize);
        for _ in 0..3 * t.max(c) {
            s[i] = self.rotl(self.add(self.add(s[i], a), b), 3);
            a = s[i];
            let ab = self.add(a, b);
            l[j] = self.rotl(self.add(l[j], ab), ab);
            b = l[j];
            i = (i + 1) % t;
            j = (j + 1) % c;
        }
        s
    }

    fn schedule(&self) -> Result<&[u64]> {
        match self.schedule.as_deref() {
            Some(s) => Ok(s),
            None => crypto_err!(CryptoError::KeyNotSet),
        }
    }

    fn read_words(&self, block: &[u8]) -> Result<(u64, u64)> {
        let u = self.word_bytes();
        if block.len() != 2 * u {
            return crypto_err!(CryptoError::InvalidBlockLength {
                expected: 2 * u,
                actual: block.len(),
            });
        }
        Ok((
            LittleEndian::read_uint(&block[..u], u),
            LittleEndian::read_uint(&block[u..], u),
        ))
    }

    fn write_words(&self, a: u64, b: u64) -> Vec<u8> {
        let u = self.word_bytes();
        let mut out = vec![0u8; 2 * u];
        LittleEndian::write_uint(&mut out[..u], a, u);
        LittleEndian::write_uint(&mut out[u..], b, u);
        out
    }
}

impl BlockCipher for Rc5 {
    fn set_key(&mut self, key: &[u8]) -> Result<()> {
        if key.is_empty() {
            return crypto_err!(CryptoError::EmptyKey);
        }
        if key.len() > 255 {
            return crypto_err!(CryptoError::InvalidKeyLength {
                expected: 255,
                actual: key.len(),
            });
        }
        self.schedule = Some(self.expand_key(key));
        Ok(())
    }

    fn encrypt_block(&self, block: &[u8]) -> Result<Vec<u8>> {
        let s = self.schedule()?;
        let (a, b) = self.read_words(block)?;
        let w = u64::from(self.word_bits);

        let mut a = self.add(a, s[0]);
        let mut b = self.add(b, s[1]);
        for i in 1..=self.rounds {
            a = self.add(self.rotl(a ^ b, b % w), s[2 * i]);
            b = self.add(self.rotl(b ^ a, a % w), s[2 * i + 1]);
        }

        Ok(self.write_words(a, b))
    }

    fn decrypt_block(&self, block: &[u8]) -> Result<Vec<u8>> {
        let s = self.schedule()?;
        let (mut a, mut b) = self.read_words(block)?;
        let w = u64::from(self.word_bits);

        for i in (1..=self.rounds).rev() {
            b = self.rotr(self.sub(b, s[2 * i + 1]), a % w) ^ a;
            a = self.rotr(self.sub(a, s[2 * i]), b % w) ^ b;
        }
        let b = self.sub(b, s[1]);
        let a = self.sub(a, s[0]);

        Ok(self.write_words(a, b))
    }

    fn block_size(&self) -> usize {
        2 * self.word_bytes()
    }

    fn algorithm(&self) -> AlgorithmKind {
        AlgorithmKind::Rc5
    }

    fn is_initialized(&self) -> bool {
        self.schedule.is_some()
    }
}
