/*
    Copyright Hyperledger Foundation. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
//! Stateless integer helpers: extended Euclid, inverses, products and
//! the fixed-width hex form used to publish group elements and primes.

use crate::error::{Error, Result};
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};
use rayon::prelude::*;

/// Iterative extended Euclidean algorithm.
///
/// Returns `(g, x, y)` with `b*x + a*y = g`. Quotients use floor division
/// so the signed coefficients match the textbook recurrence exactly.
pub fn extended_gcd(b: &BigInt, a: &BigInt) -> (BigInt, BigInt, BigInt) {
    let (mut b, mut a) = (b.clone(), a.clone());
    let (mut x0, mut x1) = (BigInt::one(), BigInt::zero());
    let (mut y0, mut y1) = (BigInt::zero(), BigInt::one());
    while !a.is_zero() {
        let (q, r) = b.div_mod_floor(&a);
        b = core::mem::replace(&mut a, r);
        let x2 = &x0 - &q * &x1;
        x0 = core::mem::replace(&mut x1, x2);
        let y2 = &y0 - &q * &y1;
        y0 = core::mem::replace(&mut y1, y2);
    }
    (b, x0, y0)
}

/// Compute `b^-1 mod n`
pub fn modular_inverse(b: &BigUint, n: &BigUint) -> Result<BigUint> {
    if n.is_zero() {
        return Err(Error::NotInvertible);
    }
    let n = BigInt::from(n.clone());
    let (g, x, _) = extended_gcd(&BigInt::from(b.clone()), &n);
    if !g.is_one() {
        return Err(Error::NotInvertible);
    }
    x.mod_floor(&n).to_biguint().ok_or(Error::NotInvertible)
}

/// Coefficients `(x, y)` with `a*x + b*y = gcd(a, b)`
pub fn bezout_coefficients(a: &BigUint, b: &BigUint) -> (BigInt, BigInt) {
    let (_, x, y) = extended_gcd(&BigInt::from(a.clone()), &BigInt::from(b.clone()));
    (x, y)
}

/// Left fold multiplication, 1 for an empty input
pub fn product<'a, I>(values: I) -> BigUint
where
    I: IntoIterator<Item = &'a BigUint>,
{
    values
        .into_iter()
        .fold(BigUint::one(), |acc, value| acc * value)
}

/// Same as [`product`] but reduces pairwise on the rayon pool
pub fn par_product(values: &[BigUint]) -> BigUint {
    values
        .par_iter()
        .cloned()
        .reduce(BigUint::one, |a, b| a * b)
}

/// `0x` prefixed big-endian hex, left padded to `byte_len` bytes
pub fn to_padded_hex(value: &BigUint, byte_len: usize) -> Result<String> {
    let bytes = value.to_bytes_be();
    if bytes.len() > byte_len {
        return Err(Error::ValueTooLarge {
            bytes: bytes.len(),
            max: byte_len,
        });
    }
    let mut padded = vec![0u8; byte_len - bytes.len()];
    padded.extend_from_slice(&bytes);
    Ok(format!("0x{}", hex::encode(padded)))
}

/// Shortest `0x` prefixed hex with an even number of digits
pub fn to_even_hex(value: &BigUint) -> String {
    let digits = value.to_str_radix(16);
    if digits.len() % 2 == 0 {
        format!("0x{}", digits)
    } else {
        format!("0x0{}", digits)
    }
}

/// Parse hex with or without `0x`, tolerating an odd digit count
pub fn from_hex(s: &str) -> Result<BigUint> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    let bytes = if digits.len() % 2 == 0 {
        hex::decode(digits)?
    } else {
        hex::decode(format!("0{}", digits))?
    };
    Ok(BigUint::from_bytes_be(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn int(v: i64) -> BigInt {
        BigInt::from(v)
    }

    #[test]
    fn xgcd_known_values() {
        let (g, x, y) = extended_gcd(&int(240), &int(46));
        assert_eq!(g, int(2));
        assert_eq!(x, int(-9));
        assert_eq!(y, int(47));

        let (g, x, y) = extended_gcd(&int(7), &int(0));
        assert_eq!((g, x, y), (int(7), int(1), int(0)));
    }

    #[test]
    fn inverse() {
        let inv = modular_inverse(&BigUint::from(3u8), &BigUint::from(11u8)).unwrap();
        assert_eq!(inv, BigUint::from(4u8));
        assert!(matches!(
            modular_inverse(&BigUint::from(6u8), &BigUint::from(9u8)),
            Err(Error::NotInvertible)
        ));
        assert!(modular_inverse(&BigUint::from(6u8), &BigUint::zero()).is_err());
    }

    #[test]
    fn empty_product_is_one() {
        assert_eq!(product(core::iter::empty()), BigUint::one());
        assert_eq!(par_product(&[]), BigUint::one());
        let values = [3u32, 5, 7, 11].map(BigUint::from);
        assert_eq!(product(&values), BigUint::from(1155u32));
        assert_eq!(par_product(&values), BigUint::from(1155u32));
    }

    #[test]
    fn padded_hex() {
        let v = BigUint::from(0xabcu32);
        assert_eq!(to_padded_hex(&v, 4).unwrap(), "0x00000abc");
        assert_eq!(to_even_hex(&v), "0x0abc");
        assert_eq!(from_hex("0x00000abc").unwrap(), v);
        assert_eq!(from_hex("abc").unwrap(), v);
        assert!(matches!(
            to_padded_hex(&v, 1),
            Err(Error::ValueTooLarge { bytes: 2, max: 1 })
        ));
        assert!(from_hex("0xzz").is_err());
    }

    proptest! {
        #[test]
        fn bezout_identity(a in 1u64.., b in 1u64..) {
            let (a, b) = (BigUint::from(a), BigUint::from(b));
            let (x, y) = bezout_coefficients(&a, &b);
            let lhs = BigInt::from(a.clone()) * x + BigInt::from(b.clone()) * y;
            prop_assert_eq!(lhs, BigInt::from(a.gcd(&b)));
        }

        #[test]
        fn inverse_round_trip(b in 1u64.., n in 2u64..) {
            let (b, n) = (BigUint::from(b), BigUint::from(n));
            match modular_inverse(&b, &n) {
                Ok(inv) => prop_assert!((b * inv % &n).is_one() || n.is_one()),
                Err(_) => prop_assert!(!b.gcd(&n).is_one()),
            }
        }
    }
}
