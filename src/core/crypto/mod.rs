/*!
Cryptographic components for the cipher engine.

This module provides the block ciphers, their shared trait and byte
helpers, the cipher configuration tags, and Diffie-Hellman key agreement.
*/

// Block cipher implementations
pub mod algorithms;

// Config
pub mod config;

// Key agreement
pub mod key_exchange;

// Cipher trait
pub mod traits;

// Byte-slice helpers
pub mod utils;

// Re-export frequently used types
pub use algorithms::{create_cipher, CipherAlgorithm, Loki97, Magenta, Rc5};
pub use config::{AlgorithmKind, CipherConfig, CipherMode, PaddingScheme};
pub use key_exchange::{DhKeyPair, DhParameters, SessionKeys};
pub use traits::BlockCipher;
