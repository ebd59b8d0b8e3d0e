/*
    Copyright Hyperledger Foundation. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
use crate::error::{Error, Result};
use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

/// Independent Rabin-Miller witnesses per test, error rate at most 4^-5
pub const RABIN_MILLER_ROUNDS: usize = 5;

/// Every prime below 1000
const SMALL_PRIMES: [u32; 168] = [
    2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79, 83, 89, 97,
    101, 103, 107, 109, 113, 127, 131, 137, 139, 149, 151, 157, 163, 167, 173, 179, 181, 191, 193,
    197, 199, 211, 223, 227, 229, 233, 239, 241, 251, 257, 263, 269, 271, 277, 281, 283, 293, 307,
    311, 313, 317, 331, 337, 347, 349, 353, 359, 367, 373, 379, 383, 389, 397, 401, 409, 419, 421,
    431, 433, 439, 443, 449, 457, 461, 463, 467, 479, 487, 491, 499, 503, 509, 521, 523, 541, 547,
    557, 563, 569, 571, 577, 587, 593, 599, 601, 607, 613, 617, 619, 631, 641, 643, 647, 653, 659,
    661, 673, 677, 683, 691, 701, 709, 719, 727, 733, 739, 743, 751, 757, 761, 769, 773, 787, 797,
    809, 811, 821, 823, 827, 829, 839, 853, 857, 859, 863, 877, 881, 883, 887, 907, 911, 919, 929,
    937, 941, 947, 953, 967, 971, 977, 983, 991, 997,
];

/// Probabilistic primality test using the thread local CSPRNG for witnesses
pub fn is_probable_prime(num: &BigUint) -> bool {
    is_probable_prime_with_rng(num, &mut rand::thread_rng())
}

/// Trial division by the primes below 1000, then Rabin-Miller
pub fn is_probable_prime_with_rng<R: RngCore + CryptoRng + ?Sized>(
    num: &BigUint,
    rng: &mut R,
) -> bool {
    if *num < BigUint::from(2u8) {
        return false;
    }
    for p in SMALL_PRIMES {
        if (num % p).is_zero() {
            return *num == BigUint::from(p);
        }
    }
    rabin_miller(num, rng)
}

// num is odd and larger than 997 here
fn rabin_miller<R: RngCore + CryptoRng + ?Sized>(num: &BigUint, rng: &mut R) -> bool {
    let one = BigUint::one();
    let two = BigUint::from(2u8);
    let num_minus_one = num - &one;
    // num - 1 = s * 2^t with s odd
    let t = num_minus_one.trailing_zeros().unwrap_or(0);
    let s = &num_minus_one >> t;

    for _ in 0..RABIN_MILLER_ROUNDS {
        // [2, num - 2]
        let a = rng.gen_biguint_range(&two, &num_minus_one);
        let mut v = a.modpow(&s, num);
        if v != one {
            let mut i = 0u64;
            while v != num_minus_one {
                if i + 1 == t {
                    return false;
                }
                i += 1;
                v = (&v * &v) % num;
            }
        }
    }
    true
}

/// Rejection sample odd `bits`-bit integers until one is a probable prime.
///
/// The top bit is forced so the product of two such primes has a
/// predictable width. The random bytes behind each candidate are
/// zeroized once the search ends.
pub fn generate_probable_prime<R: RngCore + CryptoRng + ?Sized>(
    bits: usize,
    max_attempts: u64,
    rng: &mut R,
) -> Result<BigUint> {
    if bits < 2 {
        return Err(Error::InvalidBitLength(bits));
    }
    let mut bytes = Zeroizing::new(vec![0u8; (bits + 7) / 8]);
    let excess = bytes.len() * 8 - bits;
    for _ in 0..max_attempts {
        rng.fill_bytes(bytes.as_mut_slice());
        bytes[0] &= 0xff >> excess;
        let mut candidate = BigUint::from_bytes_be(&bytes);
        candidate.set_bit(bits as u64 - 1, true);
        candidate.set_bit(0, true);
        if is_probable_prime_with_rng(&candidate, rng) {
            return Ok(candidate);
        }
    }
    Err(Error::PrimalityCheckExhausted {
        attempts: max_attempts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    fn sieve(limit: usize) -> Vec<bool> {
        let mut is_prime = vec![true; limit];
        is_prime[0] = false;
        is_prime[1] = false;
        let mut i = 2;
        while i * i < limit {
            if is_prime[i] {
                let mut j = i * i;
                while j < limit {
                    is_prime[j] = false;
                    j += i;
                }
            }
            i += 1;
        }
        is_prime
    }

    #[test]
    fn matches_sieve_below_one_million() {
        let expected = sieve(1_000_000);
        for (n, &prime) in expected.iter().enumerate() {
            assert_eq!(
                is_probable_prime(&BigUint::from(n)),
                prime,
                "disagreement at {}",
                n
            );
        }
    }

    #[test]
    fn carmichael_numbers_rejected() {
        for n in [561u64, 41_041, 825_265, 321_197_185, 5_394_826_801] {
            assert!(!is_probable_prime(&BigUint::from(n)));
        }
    }

    #[test]
    fn large_known_values() {
        let m61 = (BigUint::one() << 61u32) - 1u32;
        let m127 = (BigUint::one() << 127u32) - 1u32;
        let m31 = (BigUint::one() << 31u32) - 1u32;
        assert!(is_probable_prime(&m61));
        assert!(is_probable_prime(&m127));
        assert!(!is_probable_prime(&(&m61 * &m31)));
        assert!(!is_probable_prime(&(&m127 * &m61)));
        // 2^128 + 51
        let l = (BigUint::one() << 128u32) + 51u32;
        assert!(is_probable_prime(&l));
    }

    #[test]
    fn generated_prime_has_width() {
        let p = generate_probable_prime(96, 10_000, &mut OsRng).unwrap();
        assert_eq!(p.bits(), 96);
        assert!(p.bit(0));
        assert!(is_probable_prime(&p));
    }

    #[test]
    fn unaligned_widths_are_exact() {
        for bits in [17, 61, 129] {
            let p = generate_probable_prime(bits, 10_000, &mut OsRng).unwrap();
            assert_eq!(p.bits(), bits as u64);
        }
    }

    #[test]
    fn generation_is_bounded() {
        assert!(matches!(
            generate_probable_prime(64, 0, &mut OsRng),
            Err(Error::PrimalityCheckExhausted { attempts: 0 })
        ));
        assert!(matches!(
            generate_probable_prime(1, 10, &mut OsRng),
            Err(Error::InvalidBitLength(1))
        ));
    }
}
