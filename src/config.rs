/*
    Copyright Hyperledger Foundation. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Default bit length of each RSA factor, giving a ~3072-bit modulus
pub const DEFAULT_PRIME_BITS: usize = 1536;
/// Default bit length of hash-to-prime encodings
pub const DEFAULT_HASH_BITS: usize = 128;
/// Largest accepted bit length of hash-to-prime encodings
pub const MAX_HASH_BITS: usize = 4096;
/// Default number of elements per chunk in chunked batch helpers
pub const DEFAULT_BATCH_SIZE: usize = 64;
/// Default cap on random candidates tried while generating a factor
pub const DEFAULT_MAX_PRIME_ATTEMPTS: u64 = 100_000;
/// Default cap on nonces tried while encoding one element
pub const DEFAULT_MAX_NONCE_ATTEMPTS: u64 = 100_000;

/// Accumulator configuration
///
/// Fixed when an accumulator is set up and passed explicitly to
/// every operation that needs it.
#[derive(Copy, Clone, Debug, Deserialize, Serialize, Eq, PartialEq, Hash)]
pub struct AccParams {
    /// Bit length of each of the two modulus factors
    pub prime_bits: usize,
    /// Bit length of the primes elements are encoded to
    pub hash_bits: usize,
    /// Elements per chunk for [`crate::RsaAccumulator::add_elements_chunked`]
    pub batch_size: usize,
    /// Random candidates tried per factor before setup fails
    pub max_prime_attempts: u64,
    /// Nonces tried per element before encoding fails
    pub max_nonce_attempts: u64,
    /// Use a random quadratic residue as base instead of 2
    pub random_base: bool,
}

impl Default for AccParams {
    fn default() -> Self {
        Self {
            prime_bits: DEFAULT_PRIME_BITS,
            hash_bits: DEFAULT_HASH_BITS,
            batch_size: DEFAULT_BATCH_SIZE,
            max_prime_attempts: DEFAULT_MAX_PRIME_ATTEMPTS,
            max_nonce_attempts: DEFAULT_MAX_NONCE_ATTEMPTS,
            random_base: false,
        }
    }
}

// positive, at most MAX_HASH_BITS and a whole number of hex digits
pub(crate) fn valid_hash_bits(bits: usize) -> bool {
    bits != 0 && bits <= MAX_HASH_BITS && bits % 4 == 0
}

impl AccParams {
    /// Default parameters with a different factor size
    pub fn with_prime_bits(prime_bits: usize) -> Self {
        Self {
            prime_bits,
            ..Self::default()
        }
    }

    /// Check every field is in range
    pub fn validate(&self) -> Result<()> {
        if self.prime_bits < 16 {
            return Err(Error::InvalidParameter("prime_bits must be at least 16"));
        }
        if !valid_hash_bits(self.hash_bits) {
            return Err(Error::InvalidBitLength(self.hash_bits));
        }
        if self.batch_size == 0 {
            return Err(Error::InvalidParameter("batch_size must be positive"));
        }
        if self.max_prime_attempts == 0 || self.max_nonce_attempts == 0 {
            return Err(Error::InvalidParameter("attempt caps must be positive"));
        }
        Ok(())
    }

    /// Byte width of the modulus and of every group element
    pub fn modulus_bytes(&self) -> usize {
        (2 * self.prime_bits + 7) / 8
    }

    /// Byte width of an encoded prime
    pub fn prime_bytes(&self) -> usize {
        (self.hash_bits + 7) / 8
    }
}
