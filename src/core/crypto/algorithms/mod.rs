/*!
Implementations of the block cipher algorithms.

This module provides the concrete ciphers and a closed enum over them
that a cipher context drives without dynamic dispatch.
*/

pub mod galois;
pub mod loki97;
pub mod magenta;
pub mod rc5;

pub use loki97::Loki97;
pub use magenta::Magenta;
pub use rc5::Rc5;

use crate::core::crypto::config::AlgorithmKind;
use crate::core::crypto::traits::BlockCipher;
use crate::core::error::Result;

/// Any of the supported block ciphers
#[derive(Clone)]
pub enum CipherAlgorithm {
    Loki97(Loki97),
    Rc5(Rc5),
    Magenta(Magenta),
}

impl CipherAlgorithm {
    fn inner(&self) -> &dyn BlockCipher {
        match self {
            CipherAlgorithm::Loki97(c) => c,
            CipherAlgorithm::Rc5(c) => c,
            CipherAlgorithm::Magenta(c) => c,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn BlockCipher {
        match self {
            CipherAlgorithm::Loki97(c) => c,
            CipherAlgorithm::Rc5(c) => c,
            CipherAlgorithm::Magenta(c) => c,
        }
    }
}

impl From<AlgorithmKind> for CipherAlgorithm {
    fn from(kind: AlgorithmKind) -> Self {
        create_cipher(kind)
    }
}

impl BlockCipher for CipherAlgorithm {
    fn set_key(&mut self, key: &[u8]) -> Result<()> {
        self.inner_mut().set_key(key)
    }

    fn encrypt_block(&self, block: &[u8]) -> Result<Vec<u8>> {
        self.inner().encrypt_block(block)
    }

    fn decrypt_block(&self, block: &[u8]) -> Result<Vec<u8>> {
        self.inner().decrypt_block(block)
    }

    fn block_size(&self) -> usize {
        self.inner().block_size()
    }

    fn algorithm(&self) -> AlgorithmKind {
        self.inner().algorithm()
    }

    fn is_initialized(&self) -> bool {
        self.inner().is_initialized()
    }
}

/// Create an unkeyed cipher with default parameters
pub fn create_cipher(kind: AlgorithmKind) -> CipherAlgorithm {
    match kind {
        AlgorithmKind::Loki97 => CipherAlgorithm::Loki97(Loki97::new()),
        AlgorithmKind::Rc5 => CipherAlgorithm::Rc5(Rc5::new()),
        AlgorithmKind::Magenta => CipherAlgorithm::Magenta(Magenta::new()),
    }
}
