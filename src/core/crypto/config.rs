/*!
Cipher configuration for the engine.

This module provides the algorithm, mode and padding tags exchanged by
room participants, and the configuration a cipher context is built from.
Tags parse from the strings the transport layer carries.
*/

use std::fmt;
use std::str::FromStr;

use crate::core::constants::{DEFAULT_BLOCK_SIZE, STREAM_BUFFER_BLOCKS};
use crate::core::error::{ConfigError, Error, Result};

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

/// Supported block cipher algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum AlgorithmKind {
    /// 16-round Feistel network with Galois-field S-boxes
    Loki97,
    /// RC5-family cipher, two 64-bit words by default
    #[default]
    Rc5,
    /// Lightweight substitution-diffusion cipher
    Magenta,
}

impl AlgorithmKind {
    /// All supported algorithms
    pub const ALL: [AlgorithmKind; 3] = [AlgorithmKind::Loki97, AlgorithmKind::Rc5, AlgorithmKind::Magenta];

    /// Get the transport tag of the algorithm
    pub fn name(&self) -> &'static str {
        match self {
            AlgorithmKind::Loki97 => "loki97",
            AlgorithmKind::Rc5 => "rc5",
            AlgorithmKind::Magenta => "magenta",
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AlgorithmKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        AlgorithmKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::Config(ConfigError::UnsupportedAlgorithm(s.to_string())))
    }
}

/// Modes of operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum CipherMode {
    /// Electronic codebook, blocks processed in parallel
    Ecb,
    /// Cipher block chaining
    #[default]
    Cbc,
    /// Propagating cipher block chaining
    Pcbc,
    /// Cipher feedback
    Cfb,
    /// Output feedback
    Ofb,
    /// Counter mode, blocks processed in parallel
    Ctr,
    /// Additive stream keyed by a random delta block
    RandomDelta,
}

impl CipherMode {
    /// All supported modes
    pub const ALL: [CipherMode; 7] = [
        CipherMode::Ecb,
        CipherMode::Cbc,
        CipherMode::Pcbc,
        CipherMode::Cfb,
        CipherMode::Ofb,
        CipherMode::Ctr,
        CipherMode::RandomDelta,
    ];

    /// Get the transport tag of the mode
    pub fn name(&self) -> &'static str {
        match self {
            CipherMode::Ecb => "ECB",
            CipherMode::Cbc => "CBC",
            CipherMode::Pcbc => "PCBC",
            CipherMode::Cfb => "CFB",
            CipherMode::Ofb => "OFB",
            CipherMode::Ctr => "CTR",
            CipherMode::RandomDelta => "RandomDelta",
        }
    }

    /// Whether the mode chains from the IV
    pub fn requires_iv(&self) -> bool {
        !matches!(self, CipherMode::Ecb | CipherMode::RandomDelta)
    }

    /// Whether blocks are independent and can be dispatched to workers
    pub fn is_parallel(&self) -> bool {
        matches!(self, CipherMode::Ecb | CipherMode::Ctr)
    }
}

impl fmt::Display for CipherMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CipherMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        CipherMode::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::Config(ConfigError::UnsupportedMode(s.to_string())))
    }
}

/// Padding schemes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum PaddingScheme {
    /// Zero bytes, stripped greedily on removal
    Zeros,
    /// Zero fill with the length in the final byte
    AnsiX923,
    /// Every padding byte holds the length
    #[default]
    Pkcs7,
    /// Random fill with the length in the final byte
    Iso10126,
}

impl PaddingScheme {
    /// All supported padding schemes
    pub const ALL: [PaddingScheme; 4] = [
        PaddingScheme::Zeros,
        PaddingScheme::AnsiX923,
        PaddingScheme::Pkcs7,
        PaddingScheme::Iso10126,
    ];

    /// Get the transport tag of the padding scheme
    pub fn name(&self) -> &'static str {
        match self {
            PaddingScheme::Zeros => "Zeros",
            PaddingScheme::AnsiX923 => "ANSIX923",
            PaddingScheme::Pkcs7 => "PKCS7",
            PaddingScheme::Iso10126 => "ISO10126",
        }
    }
}

impl fmt::Display for PaddingScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PaddingScheme {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        PaddingScheme::ALL
            .into_iter()
            .find(|padding| padding.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::Config(ConfigError::UnsupportedPadding(s.to_string())))
    }
}

/// Configuration a cipher context is built from
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct CipherConfig {
    /// Block cipher algorithm
    pub algorithm: AlgorithmKind,
    /// Mode of operation
    pub mode: CipherMode,
    /// Padding scheme
    pub padding: PaddingScheme,
    /// Block size in bytes
    pub block_size: usize,
    /// Upper bound on workers for ECB and CTR
    pub workers: usize,
    /// Blocks read per buffer when streaming
    pub stream_buffer_blocks: usize,
}

impl Default for CipherConfig {
    fn default() -> Self {
        Self {
            algorithm: AlgorithmKind::default(),
            mode: CipherMode::default(),
            padding: PaddingScheme::default(),
            block_size: DEFAULT_BLOCK_SIZE,
            workers: default_workers(),
            stream_buffer_blocks: STREAM_BUFFER_BLOCKS,
        }
    }
}

impl CipherConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new configuration with specific algorithm, mode and padding
    pub fn with_algorithms(algorithm: AlgorithmKind, mode: CipherMode, padding: PaddingScheme) -> Self {
        Self {
            algorithm,
            mode,
            padding,
            ..Self::default()
        }
    }

    /// Parse a configuration from the transport's room tags
    pub fn from_tags(algorithm: &str, mode: &str, padding: &str) -> Result<Self> {
        Ok(Self::with_algorithms(algorithm.parse()?, mode.parse()?, padding.parse()?))
    }

    /// Configuration tuned for bulk data: counter mode across all cores
    pub fn parallel() -> Self {
        Self {
            mode: CipherMode::Ctr,
            ..Self::default()
        }
    }

    /// Configuration that never spawns worker threads
    pub fn sequential() -> Self {
        Self {
            workers: 1,
            ..Self::default()
        }
    }

    /// Set the worker bound
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the streaming buffer size in blocks
    pub fn with_stream_buffer_blocks(mut self, blocks: usize) -> Self {
        self.stream_buffer_blocks = blocks;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(Error::Config(ConfigError::InvalidParameter(
                "block size must be non-zero".into(),
            )));
        }
        if self.workers == 0 {
            return Err(Error::Config(ConfigError::InvalidParameter(
                "worker count must be non-zero".into(),
            )));
        }
        if self.stream_buffer_blocks == 0 {
            return Err(Error::Config(ConfigError::InvalidParameter(
                "stream buffer must hold at least one block".into(),
            )));
        }
        Ok(())
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism().map_or(1, |n| n.get())
}
