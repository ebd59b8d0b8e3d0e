/*
    Copyright Hyperledger Foundation. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
use super::prime::is_probable_prime;
use crate::config::{valid_hash_bits, DEFAULT_MAX_NONCE_ATTEMPTS};
use crate::error::{Error, Result};
use crate::utils::to_padded_hex;
use core::fmt::{self, Display, Formatter};
use num_bigint::BigUint;
use num_traits::One;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// The prime an element is accumulated as, with the nonce that found it
///
/// Anyone holding the element and the nonce can recompute the prime.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct PrimeRepresentative {
    /// The encoded prime
    pub prime: BigUint,
    /// Offset added to the element before hashing
    pub nonce: u64,
}

impl Display for PrimeRepresentative {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PrimeRepresentative {{ prime: {}, nonce: {} }}",
            self.prime, self.nonce
        )
    }
}

impl PrimeRepresentative {
    /// Recompute the candidate for exactly this nonce, `None` if it is not prime
    pub fn at_nonce(x: &BigUint, bits: usize, nonce: u64) -> Result<Option<Self>> {
        let candidate = hash_to_length(&(x + nonce), bits)?;
        Ok(is_probable_prime(&candidate).then_some(Self {
            prime: candidate,
            nonce,
        }))
    }

    /// The prime as fixed-width hex
    pub fn to_hex(&self, byte_len: usize) -> Result<String> {
        to_padded_hex(&self.prime, byte_len)
    }
}

/// Expand `x` to a `bits`-bit integer.
///
/// SHA-256 is applied to the decimal strings of `x`, `x + 1`, ... and the
/// digests are concatenated big-endian. Leading nibbles beyond `bits` are
/// dropped and the top bit is set so the result has exactly `bits` bits.
/// `bits` must be a positive multiple of 4 no larger than
/// [`crate::MAX_HASH_BITS`].
pub fn hash_to_length(x: &BigUint, bits: usize) -> Result<BigUint> {
    if !valid_hash_bits(bits) {
        return Err(Error::InvalidBitLength(bits));
    }
    let blocks = (bits + 255) / 256;
    let mut digests = Vec::with_capacity(blocks * 32);
    for i in 0..blocks {
        let input = x + i;
        digests.extend_from_slice(&Sha256::digest(input.to_str_radix(10).as_bytes()));
    }
    let mut value = BigUint::from_bytes_be(&digests);
    if blocks * 256 > bits {
        value &= (BigUint::one() << bits) - 1u32;
    }
    value.set_bit(bits as u64 - 1, true);
    Ok(value)
}

/// Smallest nonce from `nonce` upward for which `hash_to_length(x + nonce)`
/// is prime, with the default search cap
pub fn hash_to_prime(x: &BigUint, bits: usize, nonce: u64) -> Result<PrimeRepresentative> {
    hash_to_prime_bounded(x, bits, nonce, DEFAULT_MAX_NONCE_ATTEMPTS)
}

/// [`hash_to_prime`] giving up after `max_attempts` candidates
pub fn hash_to_prime_bounded(
    x: &BigUint,
    bits: usize,
    nonce: u64,
    max_attempts: u64,
) -> Result<PrimeRepresentative> {
    let mut nonce = nonce;
    for _ in 0..max_attempts {
        if let Some(rep) = PrimeRepresentative::at_nonce(x, bits, nonce)? {
            tracing::trace!("hash to prime found nonce {}", rep.nonce);
            return Ok(rep);
        }
        nonce = nonce
            .checked_add(1)
            .ok_or(Error::PrimalityCheckExhausted {
                attempts: max_attempts,
            })?;
    }
    Err(Error::PrimalityCheckExhausted {
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex_int(s: &str) -> BigUint {
        BigUint::parse_bytes(s.as_bytes(), 16).unwrap()
    }

    #[test]
    fn known_lengths() {
        let seven = BigUint::from(7u8);
        assert_eq!(
            hash_to_length(&seven, 128).unwrap(),
            hex_int("e86b22c56a189f7625a6da49081b2451")
        );
        // top bit forced
        assert_eq!(
            hash_to_length(&BigUint::from(13u8), 128).unwrap(),
            hex_int("e257113072a909c162f7e470e581e278")
        );
        for bits in [4, 128, 256, 384, 520] {
            assert_eq!(hash_to_length(&seven, bits).unwrap().bits(), bits as u64);
        }
    }

    #[test]
    fn rejects_bad_lengths() {
        let x = BigUint::from(1u8);
        assert!(matches!(hash_to_length(&x, 0), Err(Error::InvalidBitLength(0))));
        assert!(matches!(hash_to_length(&x, 126), Err(Error::InvalidBitLength(126))));
        assert!(hash_to_prime(&x, 127, 0).is_err());
        assert!(hash_to_length(&x, usize::MAX - 3).is_err());
    }

    #[test]
    fn deterministic_prime() {
        let x = BigUint::from(7u8);
        let first = hash_to_prime(&x, 128, 0).unwrap();
        let second = hash_to_prime(&x, 128, 0).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.nonce, 10);
        assert_eq!(
            first.prime,
            BigUint::parse_bytes(b"282591108303614708267264971295200557539", 10).unwrap()
        );
        assert_eq!(first.prime.bits(), 128);
        assert!(is_probable_prime(&first.prime));
        // restarting from the published nonce finds it immediately
        assert_eq!(hash_to_prime(&x, 128, first.nonce).unwrap(), first);
        assert_eq!(
            PrimeRepresentative::at_nonce(&x, 128, first.nonce).unwrap(),
            Some(first.clone())
        );
        assert_eq!(PrimeRepresentative::at_nonce(&x, 128, 0).unwrap(), None);
        assert_eq!(first.to_hex(32).unwrap().len(), 66);
    }

    #[test]
    fn nonce_offsets_alias() {
        // the encoding hashes x + nonce, so 7, 11 and 13 all land on 17
        let p7 = hash_to_prime(&BigUint::from(7u8), 128, 0).unwrap();
        let p11 = hash_to_prime(&BigUint::from(11u8), 128, 0).unwrap();
        let p13 = hash_to_prime(&BigUint::from(13u8), 128, 0).unwrap();
        assert_eq!((p11.nonce, p13.nonce), (6, 4));
        assert_eq!(p7.prime, p11.prime);
        assert_eq!(p11.prime, p13.prime);
    }

    #[test]
    fn search_is_bounded() {
        assert!(matches!(
            hash_to_prime_bounded(&BigUint::from(7u8), 128, 0, 3),
            Err(Error::PrimalityCheckExhausted { attempts: 3 })
        ));
    }
}
