/*!
Traits for symmetric block encryption and decryption.

This module defines the contract shared by every block cipher the
cipher context can drive.
*/

use crate::core::crypto::config::AlgorithmKind;
use crate::core::error::Result;

/// Trait for block cipher operations
///
/// `set_key` derives the round-key schedule once. After it succeeds the
/// schedule and block size never change, so `encrypt_block` and
/// `decrypt_block` only read state and may be called from several
/// worker threads at once.
pub trait BlockCipher: Send + Sync {
    /// Derive the round-key schedule from `key`
    fn set_key(&mut self, key: &[u8]) -> Result<()>;

    /// Encrypt exactly one block
    fn encrypt_block(&self, block: &[u8]) -> Result<Vec<u8>>;

    /// Decrypt exactly one block
    fn decrypt_block(&self, block: &[u8]) -> Result<Vec<u8>>;

    /// Block size in bytes
    fn block_size(&self) -> usize;

    /// Get the algorithm being used
    fn algorithm(&self) -> AlgorithmKind;

    /// Check if a key schedule has been derived
    fn is_initialized(&self) -> bool;
}
