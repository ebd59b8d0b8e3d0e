/*
    Copyright Hyperledger Foundation. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
//! Shamir's trick: two witnesses for coprime exponents `x1`, `x2` of the
//! same accumulator value combine into one witness for `x1 * x2`.

use crate::accumulator::PublicParams;
use crate::error::{Error, Result};
use crate::utils::{extended_gcd, modular_inverse};
use crate::witness::MembershipWitness;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};

/// Combine `pi1` (for exponent `x1`) and `pi2` (for `x2`) into a witness
/// for `x1 * x2`.
///
/// `pi1^x1 == pi2^x2` is assumed and not checked; use
/// [`shamir_trick_checked`] for witnesses from an untrusted source.
pub fn shamir_trick(
    pi1: &MembershipWitness,
    pi2: &MembershipWitness,
    x1: &BigUint,
    x2: &BigUint,
    n: &BigUint,
) -> Result<MembershipWitness> {
    if n.is_zero() {
        return Err(Error::InvalidModulus);
    }
    // a*x1 + b*x2 = 1
    let (g, a, b) = extended_gcd(&BigInt::from(x1.clone()), &BigInt::from(x2.clone()));
    if !g.is_one() {
        return Err(Error::NotCoprime);
    }
    // pi1^b * pi2^a, inverting whichever base carries a negative exponent
    let (power1, power2) = match (a.sign(), b.sign()) {
        (Sign::Minus, _) => {
            let inverse_pi2 = modular_inverse(&pi2.0, n)?;
            (pi1.0.modpow(b.magnitude(), n), inverse_pi2.modpow(a.magnitude(), n))
        }
        (_, Sign::Minus) => {
            let inverse_pi1 = modular_inverse(&pi1.0, n)?;
            (inverse_pi1.modpow(b.magnitude(), n), pi2.0.modpow(a.magnitude(), n))
        }
        _ => (pi1.0.modpow(b.magnitude(), n), pi2.0.modpow(a.magnitude(), n)),
    };
    Ok(MembershipWitness((power1 * power2) % n))
}

/// [`shamir_trick`] after checking both witnesses open the same value
pub fn shamir_trick_checked(
    pi1: &MembershipWitness,
    pi2: &MembershipWitness,
    x1: &BigUint,
    x2: &BigUint,
    n: &BigUint,
) -> Result<MembershipWitness> {
    if pi1.0.modpow(x1, n) != pi2.0.modpow(x2, n) {
        return Err(Error::InvalidWitnessPrecondition);
    }
    shamir_trick(pi1, pi2, x1, x2, n)
}

impl MembershipWitness {
    /// Aggregate with `other`, checking both open the same value.
    /// Returns the combined exponent with the combined witness.
    pub fn aggregate(
        &self,
        x1: &BigUint,
        other: &Self,
        x2: &BigUint,
        params: &PublicParams,
    ) -> Result<(BigUint, Self)> {
        let pi = shamir_trick_checked(self, other, x1, x2, params.modulus())?;
        Ok((x1 * x2, pi))
    }
}

/// Fold many `(exponent, witness)` pairs into one, left to right
pub fn aggregate_all(
    params: &PublicParams,
    proofs: &[(BigUint, MembershipWitness)],
) -> Result<(BigUint, MembershipWitness)> {
    let mut iter = proofs.iter();
    let (x, pi) = iter
        .next()
        .ok_or(Error::InvalidParameter("no witnesses to aggregate"))?;
    iter.try_fold((x.clone(), pi.clone()), |(x, pi), (next_x, next_pi)| {
        pi.aggregate(&x, next_pi, next_x, params)
    })
}
