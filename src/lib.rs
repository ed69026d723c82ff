/*!
# Chatcrypt

Symmetric block ciphers, modes of operation and Diffie-Hellman key
agreement for end-to-end encrypted chat rooms.

## Overview

- LOKI97-style Feistel, RC5 and Magenta-style block ciphers
- ECB, CBC, PCBC, CFB, OFB, CTR and RandomDelta modes
- Zeros, ANSI X.923, PKCS#7 and ISO 10126 padding
- Multi-threaded ECB and CTR over large buffers
- Streaming and file encryption with bounded memory
- Diffie-Hellman key agreement and per-room sessions
- Optional Tokio wrappers (`async` feature) and serde types (`serde-support` feature)

## Example

```no_run
use chatcrypt::{AlgorithmKind, CipherContext, CipherMode, PaddingScheme};

let ctx = CipherContext::new(&[7u8; 16], AlgorithmKind::Loki97, CipherMode::Cbc,
    PaddingScheme::Pkcs7, &[0u8; 16], 16)?;
let ciphertext = ctx.encrypt(b"hello room")?;
assert_eq!(ctx.decrypt(&ciphertext)?, b"hello room");
# Ok::<(), chatcrypt::Error>(())
```
*/

// Core engine components
pub mod core;

// Serialization support (optional)
#[cfg(feature = "serde-support")]
pub mod serde;

// Re-export commonly used types for convenience
pub use crate::core::error::{ConfigError, CryptoError, Error, KeyExchangeError, PaddingError, Result};
pub use crate::core::constants::{VERSION, DEFAULT_BLOCK_SIZE, VALID_KEY_SIZES};

// Ciphers and configuration
pub use crate::core::crypto::{
    create_cipher, AlgorithmKind, BlockCipher, CipherAlgorithm, CipherConfig, CipherMode, Loki97, Magenta,
    PaddingScheme, Rc5,
};
pub use crate::core::crypto::algorithms::galois;

// Key agreement
pub use crate::core::crypto::key_exchange::{DhKeyPair, DhParameters, SessionKeys};

// Cipher context
pub use crate::core::context::{add_padding, remove_padding, CipherContext, StreamDecryptor, StreamEncryptor};

// Sessions
pub use crate::core::session::{RoomSession, SessionRegistry, SessionState};

// Asynchronous wrappers (enabled with the "async" feature)
#[cfg(feature = "async")]
pub mod r#async {
    pub use crate::core::context::async_ops::{decrypt_async, decrypt_file_async, encrypt_async, encrypt_file_async};
}
