/*!
Error handling for the cipher engine.

Errors are grouped by how a caller can react to them: configuration
errors are fatal to the context being built, data-shape errors are
recoverable per call, padding-integrity errors are always surfaced, and
worker errors abort the whole parallel call.
*/

use std::io;
use thiserror::Error;

/// Result type for the cipher engine
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the cipher engine
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Invalid configuration, surfaced at construction time
    #[error("Invalid configuration: {0}")]
    Config(#[source] ConfigError),

    /// Block cipher failure
    #[error("Cryptographic operation failed: {0}")]
    Crypto(#[source] CryptoError),

    /// Padding could not be applied or removed
    #[error("Padding error: {0}")]
    Padding(#[source] PaddingError),

    /// Key agreement failure
    #[error("Key exchange failed: {0}")]
    KeyExchange(#[source] KeyExchangeError),

    /// Input has the wrong shape for the requested operation
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A parallel worker failed
    #[error("Worker failed at block {block}: {source}")]
    Worker {
        block: usize,
        #[source]
        source: Box<Error>,
    },

    /// The entropy source could not produce random bytes
    #[error("Entropy source failure: {0}")]
    Entropy(String),

    /// Session not in the state required by the operation
    #[error("Session not in correct state: expected {expected}, but was {actual}")]
    InvalidState {
        expected: String,
        actual: String,
    },

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Configuration errors for contexts and ciphers
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Key length is not 16, 24, 32 or the block size
    #[error("key size is invalid: {0} bytes")]
    InvalidKeySize(usize),

    /// IV length differs from the block size
    #[error("invalid IV size: expected {expected}, got {actual}")]
    InvalidIvSize { expected: usize, actual: usize },

    /// Declared block size differs from the cipher's block size
    #[error("block size mismatch: cipher uses {expected} bytes, context declared {actual}")]
    BlockSizeMismatch { expected: usize, actual: usize },

    /// Unknown cipher mode tag
    #[error("unsupported cipher mode: {0}")]
    UnsupportedMode(String),

    /// Unknown padding tag
    #[error("unsupported padding mode: {0}")]
    UnsupportedPadding(String),

    /// Unknown algorithm tag
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// RC5 word size other than 16, 32 or 64 bits
    #[error("unsupported word size: {0} bits")]
    UnsupportedWordSize(u32),

    /// Any other out-of-range parameter
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Block cipher errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Key has the wrong length for the cipher
    #[error("key size must be {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    /// Key is empty
    #[error("key cannot be empty")]
    EmptyKey,

    /// Block has the wrong length for the cipher
    #[error("block size must be {expected} bytes, got {actual}")]
    InvalidBlockLength { expected: usize, actual: usize },

    /// Cipher used before a key was set
    #[error("cipher key not set")]
    KeyNotSet,

    /// Byte-wise operation on slices of different lengths
    #[error("operands must have the same length: {left} != {right}")]
    LengthMismatch { left: usize, right: usize },
}

/// Padding errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaddingError {
    /// Nothing to unpad
    #[error("data is empty")]
    Empty,

    /// The final byte does not describe a usable padding length
    #[error("invalid padding length: {0}")]
    InvalidLength(usize),

    /// A PKCS#7 padding byte does not match the padding length
    #[error("invalid PKCS7 padding")]
    Mismatch,

    /// The block size is too large for a one-byte padding length
    #[error("padding length {0} must be between 1 and 255")]
    TooLong(usize),
}

/// Key agreement errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KeyExchangeError {
    /// Requested prime is too small
    #[error("prime size must be at least 2 bits, got {0}")]
    InvalidPrimeSize(usize),

    /// Modulus is unusable (zero or one)
    #[error("invalid modulus")]
    InvalidModulus,

    /// Peer public value is out of range
    #[error("invalid public key")]
    InvalidPublicKey,

    /// Hex text could not be decoded
    #[error("invalid hex encoding: {0}")]
    InvalidEncoding(String),
}

/// Create a configuration error
#[macro_export]
macro_rules! config_err {
    ($err:expr) => {
        Err($crate::core::error::Error::Config($err))
    };
}

/// Create a crypto error
#[macro_export]
macro_rules! crypto_err {
    ($err:expr) => {
        Err($crate::core::error::Error::Crypto($err))
    };
}

/// Create a padding error
#[macro_export]
macro_rules! padding_err {
    ($err:expr) => {
        Err($crate::core::error::Error::Padding($err))
    };
}

/// Create an invalid data error
#[macro_export]
macro_rules! data_err {
    ($msg:expr) => {
        Err($crate::core::error::Error::InvalidData($msg.to_string()))
    };
    ($fmt:expr, $($arg:tt)*) => {
        Err($crate::core::error::Error::InvalidData(format!($fmt, $($arg)*)))
    };
}

/// Create an invalid state error
#[macro_export]
macro_rules! invalid_state_err {
    ($expected:expr, $actual:expr) => {
        Err($crate::core::error::Error::InvalidState {
            expected: $expected.to_string(),
            actual: $actual.to_string(),
        })
    };
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

impl From<CryptoError> for Error {
    fn from(err: CryptoError) -> Self {
        Error::Crypto(err)
    }
}

impl From<PaddingError> for Error {
    fn from(err: PaddingError) -> Self {
        Error::Padding(err)
    }
}

impl From<KeyExchangeError> for Error {
    fn from(err: KeyExchangeError) -> Self {
        Error::KeyExchange(err)
    }
}

/// Convert from Error to io::Error (for the Read/Write streaming paths)
impl From<Error> for io::Error {
    fn from(error: Error) -> Self {
        match error {
            Error::Io(io_error) => io_error,
            Error::Config(err) => io::Error::new(io::ErrorKind::InvalidInput, err),
            Error::Crypto(err) => io::Error::new(io::ErrorKind::InvalidData, err),
            Error::Padding(err) => io::Error::new(io::ErrorKind::InvalidData, err),
            Error::KeyExchange(err) => io::Error::new(io::ErrorKind::InvalidInput, err),
            Error::InvalidData(msg) => io::Error::new(io::ErrorKind::InvalidData, msg),
            err @ Error::Worker { .. } => io::Error::other(err.to_string()),
            Error::Entropy(msg) => io::Error::other(msg),
            Error::InvalidState { expected, actual } => io::Error::new(
                io::ErrorKind::NotConnected,
                format!("Invalid state: expected {}, but was {}", expected, actual),
            ),
            Error::Internal(msg) => io::Error::other(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Config(ConfigError::InvalidKeySize(7));
        assert_eq!(format!("{}", err), "Invalid configuration: key size is invalid: 7 bytes");

        let err = Error::Padding(PaddingError::Mismatch);
        assert_eq!(format!("{}", err), "Padding error: invalid PKCS7 padding");

        let err = Error::Worker {
            block: 3,
            source: Box::new(Error::Crypto(CryptoError::KeyNotSet)),
        };
        assert!(format!("{}", err).contains("block 3"));
    }

    #[test]
    fn test_io_error_conversion() {
        let err = Error::Padding(PaddingError::InvalidLength(0));
        let io_err = io::Error::from(err);
        assert_eq!(io_err.kind(), io::ErrorKind::InvalidData);

        let err = Error::Config(ConfigError::UnsupportedMode("XTS".into()));
        let io_err = io::Error::from(err);
        assert_eq!(io_err.kind(), io::ErrorKind::InvalidInput);
        assert!(format!("{}", io_err).contains("XTS"));
    }

    #[test]
    fn test_sub_error_conversion() {
        let err: Error = CryptoError::EmptyKey.into();
        assert!(matches!(err, Error::Crypto(CryptoError::EmptyKey)));
    }
}
