/*!
Cipher context: modes of operation and padding over a block cipher.

A [`CipherContext`] owns one keyed block cipher, the mode and padding
tags, the key and the IV. It keeps no chaining state between calls:
every `encrypt` or `decrypt` starts a fresh chain from the stored IV, so
a context can be shared between threads and identical inputs give
identical outputs (except for RandomDelta and ISO 10126, which draw
fresh randomness per call).
*/

pub mod modes;
pub mod padding;
pub mod parallel;
pub mod stream;

#[cfg(feature = "async")]
pub mod async_ops;

use crate::core::constants::VALID_KEY_SIZES;
use crate::core::crypto::algorithms::{create_cipher, CipherAlgorithm};
use crate::core::crypto::config::{AlgorithmKind, CipherConfig, CipherMode, PaddingScheme};
use crate::core::crypto::traits::BlockCipher;
use crate::core::error::{ConfigError, Result};
use crate::{config_err, data_err};

pub use modes::ChainState;
pub use padding::{add_padding, remove_padding};
pub use stream::{StreamDecryptor, StreamEncryptor};

/// Block cipher wrapped in a mode of operation and a padding scheme
pub struct CipherContext<C: BlockCipher = CipherAlgorithm> {
    cipher: C,
    key: Vec<u8>,
    iv: Vec<u8>,
    config: CipherConfig,
}

impl CipherContext<CipherAlgorithm> {
    /// Create a context for one of the built-in algorithms
    pub fn new(
        key: &[u8],
        algorithm: AlgorithmKind,
        mode: CipherMode,
        padding: PaddingScheme,
        iv: &[u8],
        block_size: usize,
    ) -> Result<Self> {
        let config = CipherConfig {
            block_size,
            ..CipherConfig::with_algorithms(algorithm, mode, padding)
        };
        Self::from_config(key, iv, config)
    }

    /// Create a context from the string tags carried by the transport
    pub fn from_tags(key: &[u8], algorithm: &str, mode: &str, padding: &str, iv: &[u8], block_size: usize) -> Result<Self> {
        Self::new(key, algorithm.parse()?, mode.parse()?, padding.parse()?, iv, block_size)
    }

    /// Create a context from a full configuration
    pub fn from_config(key: &[u8], iv: &[u8], config: CipherConfig) -> Result<Self> {
        Self::with_cipher(create_cipher(config.algorithm), key, iv, config)
    }
}

impl<C: BlockCipher> CipherContext<C> {
    /// Wrap an unkeyed cipher, validate the parameters and set its key
    pub fn with_cipher(mut cipher: C, key: &[u8], iv: &[u8], config: CipherConfig) -> Result<Self> {
        config.validate()?;

        let block_size = config.block_size;
        if !VALID_KEY_SIZES.contains(&key.len()) && key.len() != block_size {
            return config_err!(ConfigError::InvalidKeySize(key.len()));
        }
        if cipher.block_size() != block_size {
            return config_err!(ConfigError::BlockSizeMismatch {
                expected: cipher.block_size(),
                actual: block_size,
            });
        }
        if config.mode.requires_iv() && iv.len() != block_size {
            return config_err!(ConfigError::InvalidIvSize {
                expected: block_size,
                actual: iv.len(),
            });
        }

        cipher.set_key(key)?;
        log::debug!(
            "Cipher context ready: {} {} {} ({}-byte blocks, {} workers)",
            cipher.algorithm(),
            config.mode,
            config.padding,
            block_size,
            config.workers
        );

        Ok(Self {
            cipher,
            key: key.to_vec(),
            iv: if config.mode.requires_iv() { iv.to_vec() } else { Vec::new() },
            config,
        })
    }

    /// Get the wrapped cipher
    pub fn cipher(&self) -> &C {
        &self.cipher
    }

    /// Get the configuration
    pub fn config(&self) -> &CipherConfig {
        &self.config
    }

    /// Get the algorithm being used
    pub fn algorithm(&self) -> AlgorithmKind {
        self.cipher.algorithm()
    }

    /// Get the mode of operation
    pub fn mode(&self) -> CipherMode {
        self.config.mode
    }

    /// Get the padding scheme
    pub fn padding(&self) -> PaddingScheme {
        self.config.padding
    }

    /// Block size in bytes
    pub fn block_size(&self) -> usize {
        self.config.block_size
    }

    /// Key the cipher was initialized with
    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// IV every chain starts from (empty for ECB and RandomDelta)
    pub fn iv(&self) -> &[u8] {
        &self.iv
    }

    /// Fresh chaining state starting from the stored IV
    pub fn new_chain(&self) -> ChainState {
        ChainState::new(self.config.mode, &self.iv, self.config.block_size)
    }

    /// Pad and encrypt a whole message
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        if plaintext.is_empty() {
            return data_err!("plaintext is empty");
        }
        let padded = add_padding(plaintext, self.block_size(), self.padding())?;

        let mut chain = self.new_chain();
        let mut out = chain.begin_encrypt()?;
        out.extend(chain.encrypt(&self.cipher, &padded, self.config.workers)?);
        Ok(out)
    }

    /// Decrypt a whole message and strip its padding
    pub fn decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>> {
        if ciphertext.is_empty() {
            return data_err!("ciphertext is empty");
        }
        let mut chain = self.new_chain();
        let header_len = chain.header_len();
        if ciphertext.len() < header_len {
            return data_err!("data too short to contain delta");
        }
        let (header, body) = ciphertext.split_at(header_len);
        if body.len() % self.block_size() != 0 {
            return data_err!(
                "ciphertext length {} is not a multiple of the block size {}",
                body.len(),
                self.block_size()
            );
        }

        chain.begin_decrypt(header)?;
        let plain = chain.decrypt(&self.cipher, body, self.config.workers)?;
        remove_padding(&plain, self.padding()).inspect_err(|e| {
            log::warn!("Rejected ciphertext with bad {} padding: {}", self.padding(), e);
        })
    }
}

impl<C: BlockCipher> std::fmt::Debug for CipherContext<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherContext")
            .field("algorithm", &self.cipher.algorithm())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
