/*!
Core traits for cryptographic operations.

This module defines the interface every block cipher exposes to the
cipher context.
*/

pub mod cipher;

// Re-export core traits for easier access
pub use cipher::BlockCipher;
