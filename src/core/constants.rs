/*!
Constants for the cipher engine.

This module contains block and key sizes, cipher parameters and the
defaults used by contexts, streams and key agreement.
*/

/// Crate version tag carried in serialized room parameters
pub const VERSION: u8 = 0x01;

/// Key lengths accepted by a cipher context besides the block size
pub const VALID_KEY_SIZES: [usize; 3] = [16, 24, 32];

/// Default block size in bytes (128 bits)
pub const DEFAULT_BLOCK_SIZE: usize = 16;

/// Number of blocks read per streaming buffer
pub const STREAM_BUFFER_BLOCKS: usize = 1024;

/// Fewest blocks handed to one worker in ECB and CTR
pub const PARALLEL_MIN_BLOCKS: usize = 64;

/// Size constants for the ciphers and key agreement
pub mod sizes {
    /// Feistel cipher constants
    pub mod loki97 {
        /// Block size in bytes
        pub const BLOCK_SIZE: usize = 16;

        /// Key size in bytes
        pub const KEY_SIZE: usize = 16;

        /// Number of Feistel rounds
        pub const ROUNDS: usize = 16;

        /// Number of subkeys in the schedule (three per round)
        pub const SUBKEYS: usize = 48;

        /// Round-dependent delta of the key schedule
        pub const DELTA: u64 = 0x9e37_79b9;
    }

    /// RC5-family cipher constants
    pub mod rc5 {
        /// Default word size in bits
        pub const WORD_BITS: u32 = 64;

        /// Default number of rounds
        pub const ROUNDS: usize = 12;

        /// Magic constants (Pw, Qw) for 16-bit words
        pub const MAGIC_16: (u64, u64) = (0xb7e1, 0x9e37);

        /// Magic constants (Pw, Qw) for 32-bit words
        pub const MAGIC_32: (u64, u64) = (0xb7e1_5163, 0x9e37_79b9);

        /// Magic constants (Pw, Qw) for 64-bit words
        pub const MAGIC_64: (u64, u64) = (0xb7e1_5162_8aed_2a6b, 0x9e37_79b9_7f4a_7c15);
    }

    /// Substitution-diffusion cipher constants
    pub mod magenta {
        /// Block size in bytes
        pub const BLOCK_SIZE: usize = 16;

        /// Number of rounds
        pub const ROUNDS: usize = 12;
    }

    /// Diffie-Hellman constants
    pub mod dh {
        /// Fixed generator
        pub const GENERATOR: u32 = 2;

        /// SHA-256 digest size
        pub const HASH_SIZE: usize = 32;

        /// Symmetric key size cut from the re-hashed secret
        pub const SESSION_KEY_SIZE: usize = 16;

        /// Miller-Rabin rounds for probable primes
        pub const MILLER_RABIN_ROUNDS: usize = 20;
    }
}
