/*
    Copyright Hyperledger Foundation. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
use super::prime::generate_probable_prime;
use crate::config::{valid_hash_bits, AccParams};
use crate::error::{Error, Result};
use crate::utils::to_padded_hex;
use core::fmt::{self, Display, Formatter};
use num_bigint::{BigUint, RandBigInt};
use num_integer::Integer;
use num_traits::One;
use rand::{CryptoRng, RngCore};
use serde::{Deserialize, Serialize};

/// Base used when no random base is requested
pub const DEFAULT_BASE: u32 = 2;

/// Everything a verifier needs: the modulus `n`, the base `A0` and the
/// width elements are hashed to
///
/// Deserialized values go through the same checks as [`PublicParams::new`].
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawPublicParams")]
pub struct PublicParams {
    pub(crate) modulus: BigUint,
    pub(crate) base: BigUint,
    pub(crate) hash_bits: usize,
}

#[derive(Deserialize)]
struct RawPublicParams {
    modulus: BigUint,
    base: BigUint,
    hash_bits: usize,
}

impl TryFrom<RawPublicParams> for PublicParams {
    type Error = Error;

    fn try_from(raw: RawPublicParams) -> Result<Self> {
        Self::new(raw.modulus, raw.base, raw.hash_bits)
    }
}

impl Display for PublicParams {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PublicParams {{ modulus: {}, base: {}, hash_bits: {} }}",
            self.modulus, self.base, self.hash_bits
        )
    }
}

impl PublicParams {
    /// Wrap a modulus produced elsewhere, e.g. by a multi-party ceremony
    pub fn new(modulus: BigUint, base: BigUint, hash_bits: usize) -> Result<Self> {
        let params = Self {
            modulus,
            base,
            hash_bits,
        };
        params.check()?;
        Ok(params)
    }

    /// Odd modulus above 3, a unit base strictly between 1 and `n`, and a
    /// supported hash width
    pub(crate) fn check(&self) -> Result<()> {
        if self.modulus <= BigUint::from(3u8) || self.modulus.is_even() {
            return Err(Error::InvalidModulus);
        }
        if !valid_hash_bits(self.hash_bits) {
            return Err(Error::InvalidBitLength(self.hash_bits));
        }
        if self.base <= BigUint::one()
            || self.base >= self.modulus
            || !self.base.gcd(&self.modulus).is_one()
        {
            return Err(Error::InvalidBase);
        }
        Ok(())
    }

    /// Run setup: two distinct probable primes are multiplied into `n`
    /// and dropped before this returns, so nothing keeps the factorization.
    ///
    /// `BigUint` cannot be wiped in place, so the factors' limbs are freed
    /// rather than overwritten. The random bytes they were drawn from are
    /// zeroized by [`generate_probable_prime`].
    pub fn generate(params: &AccParams, mut rng: impl RngCore + CryptoRng) -> Result<Self> {
        params.validate()?;
        let modulus = {
            let (p, q) = generate_two_distinct_primes(params, &mut rng)?;
            p * q
        };

        let base = if params.random_base {
            random_quadratic_residue(&modulus, &mut rng)
        } else {
            BigUint::from(DEFAULT_BASE)
        };
        tracing::debug!("accumulator setup with a {}-bit modulus", modulus.bits());
        Self::new(modulus, base, params.hash_bits)
    }

    /// The modulus `n`
    pub fn modulus(&self) -> &BigUint {
        &self.modulus
    }

    /// The base `A0`
    pub fn base(&self) -> &BigUint {
        &self.base
    }

    /// Bit length of element encodings
    pub fn hash_bits(&self) -> usize {
        self.hash_bits
    }

    /// The modulus as fixed-width hex
    pub fn modulus_hex(&self, byte_len: usize) -> Result<String> {
        to_padded_hex(&self.modulus, byte_len)
    }
}

fn generate_two_distinct_primes<R: RngCore + CryptoRng + ?Sized>(
    params: &AccParams,
    rng: &mut R,
) -> Result<(BigUint, BigUint)> {
    let p = generate_probable_prime(params.prime_bits, params.max_prime_attempts, rng)?;
    loop {
        let q = generate_probable_prime(params.prime_bits, params.max_prime_attempts, rng)?;
        if q != p {
            return Ok((p, q));
        }
        tracing::warn!("setup drew the same prime twice, regenerating");
    }
}

// r^2 mod n for a random unit r
fn random_quadratic_residue<R: RngCore + CryptoRng + ?Sized>(
    modulus: &BigUint,
    rng: &mut R,
) -> BigUint {
    let two = BigUint::from(2u8);
    loop {
        let r = rng.gen_biguint_range(&two, modulus);
        let base = r.modpow(&two, modulus);
        if base > BigUint::one() && base.gcd(modulus).is_one() {
            return base;
        }
    }
}
