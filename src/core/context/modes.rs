/*!
Chaining engine for the modes of operation.

A [`ChainState`] carries everything a mode needs between consecutive
block-aligned segments of one message: the feedback register for CBC,
PCBC, CFB and OFB, the block counter for CTR and the delta for
RandomDelta. The whole-buffer path runs a single segment; the streaming
path feeds one segment per buffer and gets byte-identical output.
*/

use rand::TryRngCore;
use rand::rngs::OsRng;

use crate::core::context::parallel::process_blocks;
use crate::core::crypto::config::CipherMode;
use crate::core::crypto::traits::BlockCipher;
use crate::core::crypto::utils::{add_counter, xor_bytes};
use crate::core::error::{Error, Result};
use crate::data_err;

/// Per-message chaining state for one mode
#[derive(Debug, Clone)]
pub struct ChainState {
    mode: CipherMode,
    block_size: usize,
    iv: Vec<u8>,
    feedback: Vec<u8>,
    block_index: u64,
    delta: Vec<u8>,
}

impl ChainState {
    /// Start a fresh chain from `iv`
    pub fn new(mode: CipherMode, iv: &[u8], block_size: usize) -> Self {
        Self {
            mode,
            block_size,
            iv: iv.to_vec(),
            feedback: iv.to_vec(),
            block_index: 0,
            delta: Vec::new(),
        }
    }

    /// Mode this chain runs
    pub fn mode(&self) -> CipherMode {
        self.mode
    }

    /// Blocks processed so far
    pub fn blocks_processed(&self) -> u64 {
        self.block_index
    }

    /// Bytes the mode places in front of the ciphertext
    pub fn header_len(&self) -> usize {
        match self.mode {
            CipherMode::RandomDelta => self.block_size,
            _ => 0,
        }
    }

    /// Prepare for encryption and return the ciphertext header
    pub fn begin_encrypt(&mut self) -> Result<Vec<u8>> {
        if self.mode != CipherMode::RandomDelta {
            return Ok(Vec::new());
        }
        let mut delta = vec![0u8; self.block_size];
        OsRng
            .try_fill_bytes(&mut delta)
            .map_err(|e| Error::Entropy(format!("failed to generate delta: {}", e)))?;
        self.delta = delta.clone();
        Ok(delta)
    }

    /// Prepare for decryption from the ciphertext header
    pub fn begin_decrypt(&mut self, header: &[u8]) -> Result<()> {
        if header.len() != self.header_len() {
            return data_err!("data too short to contain delta");
        }
        if self.mode == CipherMode::RandomDelta {
            self.delta = header.to_vec();
        }
        Ok(())
    }

    fn check_aligned(&self, data: &[u8]) -> Result<()> {
        if data.len() % self.block_size != 0 {
            return data_err!(
                "data length {} is not a multiple of the block size {}",
                data.len(),
                self.block_size
            );
        }
        Ok(())
    }

    /// Encrypt one block-aligned segment, advancing the chain
    pub fn encrypt<C: BlockCipher>(&mut self, cipher: &C, data: &[u8], workers: usize) -> Result<Vec<u8>> {
        self.check_aligned(data)?;
        let bs = self.block_size;

        let out = match self.mode {
            CipherMode::Ecb => process_blocks(data, bs, workers, |_, block| cipher.encrypt_block(block))?,
            CipherMode::Ctr => self.ctr(cipher, data, workers)?,
            CipherMode::RandomDelta => self.add_delta(data),
            CipherMode::Cbc => {
                let mut out = Vec::with_capacity(data.len());
                for block in data.chunks(bs) {
                    let encrypted = cipher.encrypt_block(&xor_bytes(block, &self.feedback)?)?;
                    out.extend_from_slice(&encrypted);
                    self.feedback = encrypted;
                }
                out
            }
            CipherMode::Pcbc => {
                let mut out = Vec::with_capacity(data.len());
                for block in data.chunks(bs) {
                    let encrypted = cipher.encrypt_block(&xor_bytes(block, &self.feedback)?)?;
                    self.feedback = xor_bytes(block, &encrypted)?;
                    out.extend_from_slice(&encrypted);
                }
                out
            }
            CipherMode::Cfb => {
                let mut out = Vec::with_capacity(data.len());
                for block in data.chunks(bs) {
                    let encrypted = xor_bytes(block, &cipher.encrypt_block(&self.feedback)?)?;
                    out.extend_from_slice(&encrypted);
                    self.feedback = encrypted;
                }
                out
            }
            CipherMode::Ofb => self.ofb(cipher, data)?,
        };

        if !matches!(self.mode, CipherMode::Ctr) {
            self.block_index += (data.len() / bs) as u64;
        }
        Ok(out)
    }

    /// Decrypt one block-aligned segment, advancing the chain
    pub fn decrypt<C: BlockCipher>(&mut self, cipher: &C, data: &[u8], workers: usize) -> Result<Vec<u8>> {
        self.check_aligned(data)?;
        let bs = self.block_size;

        let out = match self.mode {
            CipherMode::Ecb => process_blocks(data, bs, workers, |_, block| cipher.decrypt_block(block))?,
            CipherMode::Ctr => self.ctr(cipher, data, workers)?,
            CipherMode::RandomDelta => self.sub_delta(data),
            CipherMode::Cbc => {
                let mut out = Vec::with_capacity(data.len());
                for block in data.chunks(bs) {
                    let decrypted = xor_bytes(&cipher.decrypt_block(block)?, &self.feedback)?;
                    out.extend_from_slice(&decrypted);
                    self.feedback = block.to_vec();
                }
                out
            }
            CipherMode::Pcbc => {
                let mut out = Vec::with_capacity(data.len());
                for block in data.chunks(bs) {
                    let decrypted = xor_bytes(&cipher.decrypt_block(block)?, &self.feedback)?;
                    self.feedback = xor_bytes(&decrypted, block)?;
                    out.extend_from_slice(&decrypted);
                }
                out
            }
            CipherMode::Cfb => {
                let mut out = Vec::with_capacity(data.len());
                for block in data.chunks(bs) {
                    let decrypted = xor_bytes(block, &cipher.encrypt_block(&self.feedback)?)?;
                    out.extend_from_slice(&decrypted);
                    self.feedback = block.to_vec();
                }
                out
            }
            CipherMode::Ofb => self.ofb(cipher, data)?,
        };

        if !matches!(self.mode, CipherMode::Ctr) {
            self.block_index += (data.len() / bs) as u64;
        }
        Ok(out)
    }

    /// Keystream from successive encryptions of the feedback register
    fn ofb<C: BlockCipher>(&mut self, cipher: &C, data: &[u8]) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(data.len());
        for block in data.chunks(self.block_size) {
            self.feedback = cipher.encrypt_block(&self.feedback)?;
            out.extend_from_slice(&xor_bytes(block, &self.feedback)?);
        }
        Ok(out)
    }

    /// Keystream from the encrypted counter `iv + index`
    fn ctr<C: BlockCipher>(&mut self, cipher: &C, data: &[u8], workers: usize) -> Result<Vec<u8>> {
        let iv = &self.iv;
        let start = self.block_index;
        let out = process_blocks(data, self.block_size, workers, |index, block| {
            let counter = add_counter(iv, start + index as u64);
            xor_bytes(block, &cipher.encrypt_block(&counter)?)
        })?;
        self.block_index += (data.len() / self.block_size) as u64;
        Ok(out)
    }

    fn add_delta(&self, data: &[u8]) -> Vec<u8> {
        data.iter()
            .zip(self.delta.iter().cycle())
            .map(|(b, d)| b.wrapping_add(*d))
            .collect()
    }

    fn sub_delta(&self, data: &[u8]) -> Vec<u8> {
        data.iter()
            .zip(self.delta.iter().cycle())
            .map(|(b, d)| b.wrapping_sub(*d))
            .collect()
    }
}
