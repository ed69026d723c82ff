/*!
Diffie-Hellman key agreement for chat rooms.

This module provides prime generation, key pair generation, shared
secret computation and the SHA-256 derivation that turns a shared
secret into cipher key material. A room's prime is generated once and
shared through the transport; every participant uses the fixed
generator 2. Raw shared secrets never reach a cipher directly: they are
always hashed first.
*/

use num_bigint::BigUint;
use num_traits::{One, Zero};
use rand::TryRngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};

use crate::core::constants::DEFAULT_BLOCK_SIZE;
use crate::core::constants::sizes::dh::{GENERATOR, HASH_SIZE, MILLER_RABIN_ROUNDS, SESSION_KEY_SIZE};
use crate::core::error::{ConfigError, Error, KeyExchangeError, Result};

/// Small primes used to reject most candidates before Miller-Rabin
const SMALL_PRIMES: [u32; 54] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89,
    97, 101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191,
    193, 197, 199, 211, 223, 227, 229, 233, 239, 241, 251,
];

fn fill_random(buf: &mut [u8]) -> Result<()> {
    OsRng
        .try_fill_bytes(buf)
        .map_err(|e| Error::Entropy(e.to_string()))
}

/// Uniform random value in `[0, bound)`
fn random_below(bound: &BigUint) -> Result<BigUint> {
    if bound.is_zero() {
        return Err(KeyExchangeError::InvalidModulus.into());
    }
    let bits = bound.bits() as usize;
    let mut buf = vec![0u8; bits.div_ceil(8)];
    let excess = buf.len() * 8 - bits;
    loop {
        fill_random(&mut buf)?;
        buf[0] &= 0xFF >> excess;
        let candidate = BigUint::from_bytes_be(&buf);
        if &candidate < bound {
            return Ok(candidate);
        }
    }
}

/// Random odd candidate of exactly `bits` bits with the top two bits set
fn random_candidate(bits: usize) -> Result<BigUint> {
    let mut buf = vec![0u8; bits.div_ceil(8)];
    fill_random(&mut buf)?;

    let excess = buf.len() * 8 - bits;
    buf[0] &= 0xFF >> excess;
    let top = bits - 1;
    for bit in [top, top - 1] {
        let from_msb = buf.len() * 8 - 1 - bit;
        buf[from_msb / 8] |= 0x80 >> (from_msb % 8);
    }
    let last = buf.len() - 1;
    buf[last] |= 1;

    Ok(BigUint::from_bytes_be(&buf))
}

/// Probabilistic primality test: trial division then Miller-Rabin
pub fn is_probable_prime(n: &BigUint, rounds: usize) -> Result<bool> {
    let two = BigUint::from(2u32);
    if n < &two {
        return Ok(false);
    }
    for &p in SMALL_PRIMES.iter() {
        let p = BigUint::from(p);
        if n == &p {
            return Ok(true);
        }
        if (n % &p).is_zero() {
            return Ok(false);
        }
    }

    let one = BigUint::one();
    let n_minus_one = n - &one;
    let s = n_minus_one.trailing_zeros().unwrap_or(0);
    let d = &n_minus_one >> s;
    // Witnesses are drawn from [2, n - 2]
    let span = n - BigUint::from(3u32);

    'witness: for _ in 0..rounds {
        let a = random_below(&span)? + &two;
        let mut x = a.modpow(&d, n);
        if x == one || x == n_minus_one {
            continue;
        }
        for _ in 1..s {
            x = x.modpow(&two, n);
            if x == n_minus_one {
                continue 'witness;
            }
            if x == one {
                return Ok(false);
            }
        }
        return Ok(false);
    }
    Ok(true)
}

/// Generate a random probable prime of exactly `bits` bits
pub fn generate_prime(bits: usize) -> Result<BigUint> {
    if bits < 2 {
        return Err(KeyExchangeError::InvalidPrimeSize(bits).into());
    }
    let mut attempts = 0usize;
    loop {
        attempts += 1;
        let candidate = random_candidate(bits)?;
        if is_probable_prime(&candidate, MILLER_RABIN_ROUNDS)? {
            log::debug!("Generated {}-bit prime after {} candidates", bits, attempts);
            return Ok(candidate);
        }
    }
}

/// Generate a safe prime `p = 2q + 1` of `bits` bits, with `q` prime
///
/// Much slower than [`generate_prime`]; intended for rooms that want a
/// prime-order subgroup of size `q`.
pub fn generate_safe_prime(bits: usize) -> Result<BigUint> {
    if bits < 3 {
        return Err(KeyExchangeError::InvalidPrimeSize(bits).into());
    }
    loop {
        let q = generate_prime(bits - 1)?;
        let p: BigUint = (q << 1u32) + 1u32;
        if p.bits() as usize == bits && is_probable_prime(&p, MILLER_RABIN_ROUNDS)? {
            log::debug!("Generated {}-bit safe prime", bits);
            return Ok(p);
        }
    }
}

/// Generate a private scalar uniformly in `[0, prime)`
pub fn generate_private_key(prime: &BigUint) -> Result<BigUint> {
    random_below(prime)
}

fn check_modulus(prime: &BigUint) -> Result<()> {
    if prime <= &BigUint::one() {
        return Err(KeyExchangeError::InvalidModulus.into());
    }
    Ok(())
}

/// Public value `generator^private mod prime`
pub fn generate_public_key(generator: &BigUint, private_key: &BigUint, prime: &BigUint) -> Result<BigUint> {
    check_modulus(prime)?;
    Ok(generator.modpow(private_key, prime))
}

/// Shared secret `other_public^private mod prime`
pub fn generate_shared_key(private_key: &BigUint, other_public: &BigUint, prime: &BigUint) -> Result<BigUint> {
    check_modulus(prime)?;
    Ok(other_public.modpow(private_key, prime))
}

/// Minimal big-endian encoding; zero encodes as no bytes
fn minimal_bytes(value: &BigUint) -> Vec<u8> {
    if value.is_zero() {
        Vec::new()
    } else {
        value.to_bytes_be()
    }
}

/// SHA-256 of the shared secret's big-endian bytes
pub fn hash_shared_key(shared_key: &BigUint) -> [u8; HASH_SIZE] {
    Sha256::digest(minimal_bytes(shared_key)).into()
}

/// Encode a big integer as hex of its minimal big-endian bytes
pub fn to_hex(value: &BigUint) -> String {
    hex::encode(minimal_bytes(value))
}

/// Decode a big integer from the hex bytes carried by the transport
pub fn from_hex(text: &str) -> Result<BigUint> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(KeyExchangeError::InvalidEncoding("empty string".into()).into());
    }
    let bytes = hex::decode(trimmed).map_err(|e| KeyExchangeError::InvalidEncoding(e.to_string()))?;
    Ok(BigUint::from_bytes_be(&bytes))
}

/// Parameters shared by every participant of a room
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DhParameters {
    /// Prime modulus
    pub prime: BigUint,
    /// Generator, fixed at 2
    pub generator: BigUint,
}

impl DhParameters {
    /// Wrap an existing prime with the fixed generator
    pub fn new(prime: BigUint) -> Result<Self> {
        if prime <= BigUint::from(GENERATOR) {
            return Err(KeyExchangeError::InvalidModulus.into());
        }
        Ok(Self {
            prime,
            generator: BigUint::from(GENERATOR),
        })
    }

    /// Generate parameters around a fresh probable prime
    pub fn generate(bits: usize) -> Result<Self> {
        Self::new(generate_prime(bits)?)
    }

    /// Generate parameters around a fresh safe prime
    pub fn generate_safe(bits: usize) -> Result<Self> {
        Self::new(generate_safe_prime(bits)?)
    }

    /// Parse parameters from the hex prime carried by the transport
    pub fn from_hex(prime: &str) -> Result<Self> {
        Self::new(from_hex(prime)?)
    }

    /// Prime as hex text
    pub fn prime_hex(&self) -> String {
        to_hex(&self.prime)
    }

    /// Check that a peer's public value lies in `(1, prime - 1)`
    pub fn validate_public_key(&self, public_key: &BigUint) -> Result<()> {
        let upper = &self.prime - 1u32;
        if public_key <= &BigUint::one() || public_key >= &upper {
            return Err(KeyExchangeError::InvalidPublicKey.into());
        }
        Ok(())
    }
}

/// A participant's private scalar and public value
#[derive(Clone)]
pub struct DhKeyPair {
    private_key: BigUint,
    public_key: BigUint,
}

impl std::fmt::Debug for DhKeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DhKeyPair")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

impl DhKeyPair {
    /// Generate a key pair for the given room parameters
    pub fn generate(params: &DhParameters) -> Result<Self> {
        let private_key = generate_private_key(&params.prime)?;
        let public_key = generate_public_key(&params.generator, &private_key, &params.prime)?;
        Ok(Self {
            private_key,
            public_key,
        })
    }

    /// Public value to publish to the room
    pub fn public_key(&self) -> &BigUint {
        &self.public_key
    }

    /// Public value as hex text
    pub fn public_key_hex(&self) -> String {
        to_hex(&self.public_key)
    }

    /// Compute the shared secret with a peer's validated public value
    pub fn shared_secret(&self, other_public: &BigUint, params: &DhParameters) -> Result<BigUint> {
        params.validate_public_key(other_public)?;
        generate_shared_key(&self.private_key, other_public, &params.prime)
    }
}

/// Symmetric key and IV derived from a shared secret
#[derive(Clone, PartialEq, Eq)]
pub struct SessionKeys {
    /// Cipher key
    pub key: Vec<u8>,
    /// Initialization vector
    pub iv: Vec<u8>,
}

impl std::fmt::Debug for SessionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionKeys").finish_non_exhaustive()
    }
}

impl SessionKeys {
    /// Derive a 16-byte key and a 16-byte IV from a shared secret
    ///
    /// Both come from `SHA-256(hash_shared_key(secret))`, so the two
    /// participants derive them without further negotiation.
    pub fn derive(shared_secret: &BigUint) -> Self {
        let digest = Sha256::digest(hash_shared_key(shared_secret));
        Self {
            key: digest[..SESSION_KEY_SIZE].to_vec(),
            iv: digest[..DEFAULT_BLOCK_SIZE].to_vec(),
        }
    }

    /// Derive keys for a cipher whose block size differs from 16 bytes
    pub fn derive_for_block_size(shared_secret: &BigUint, block_size: usize) -> Result<Self> {
        if block_size == 0 || block_size > HASH_SIZE {
            return Err(Error::Config(ConfigError::InvalidParameter(format!(
                "cannot derive a {}-byte IV from a {}-byte digest",
                block_size, HASH_SIZE
            ))));
        }
        let digest = Sha256::digest(hash_shared_key(shared_secret));
        Ok(Self {
            key: digest[..SESSION_KEY_SIZE].to_vec(),
            iv: digest[..block_size].to_vec(),
        })
    }
}
