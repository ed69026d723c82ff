//! Core components of the cipher engine.
//!
//! This module contains the block ciphers, the cipher context with its
//! modes and paddings, Diffie-Hellman key agreement, room sessions and
//! error handling.

// Cryptographic primitives and key agreement
pub mod crypto;

// Modes of operation, padding and streaming
pub mod context;

// Room session management
pub mod session;

// Engine constants
pub mod constants;

// Error handling
pub mod error;

// Re-exports for convenience
pub use self::context::CipherContext;
pub use self::error::{ConfigError, CryptoError, Error, KeyExchangeError, PaddingError, Result};
pub use self::session::{RoomSession, SessionRegistry, SessionState};
pub use self::constants::VERSION;
