/*
    Copyright Hyperledger Foundation. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
use crate::accumulator::{Accumulator, Element, PrimeRepresentative, PublicParams, Registry};
use crate::error::{Error, Result};
use crate::utils::{from_hex, to_padded_hex};
use core::fmt::{self, Display, Formatter};
use num_bigint::BigUint;
use num_traits::One;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A membership witness: raised to the prime of an element, or the
/// product of primes of a subset, it reproduces the accumulator value
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct MembershipWitness(pub BigUint);

impl Display for MembershipWitness {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "MembershipWitness {{ {} }}", self.0)
    }
}

impl From<BigUint> for MembershipWitness {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl MembershipWitness {
    /// Verify this witness for a single element and its published nonce
    pub fn verify(
        &self,
        params: &PublicParams,
        accumulator: &Accumulator,
        element: &Element,
        nonce: u64,
    ) -> bool {
        verify_membership(params, accumulator, element, nonce, self)
    }

    /// Verify this witness for a subset and the matching nonces
    pub fn batch_verify(
        &self,
        params: &PublicParams,
        accumulator: &Accumulator,
        elements: &[Element],
        nonces: &[u64],
    ) -> bool {
        batch_verify_membership(params, accumulator, elements, nonces, self)
    }

    /// Fixed-width hex, padded like the accumulator value
    pub fn to_hex(&self, byte_len: usize) -> Result<String> {
        to_padded_hex(&self.0, byte_len)
    }

    /// Parse from hex with or without `0x`
    pub fn from_hex(s: &str) -> Result<Self> {
        from_hex(s).map(Self)
    }
}

/// Witness for `element`: the base raised to the primes of every other
/// accumulated element
pub fn prove_membership(
    params: &PublicParams,
    registry: &Registry,
    element: &Element,
) -> Result<MembershipWitness> {
    batch_prove_membership(params, registry, core::slice::from_ref(element))
}

/// Witness for a subset: the base raised to the primes of every
/// accumulated element outside the subset
pub fn batch_prove_membership(
    params: &PublicParams,
    registry: &Registry,
    elements: &[Element],
) -> Result<MembershipWitness> {
    let mut seen = BTreeSet::new();
    for element in elements {
        if !registry.contains(element) {
            return Err(Error::ElementNotFound(element.clone()));
        }
        if !seen.insert(element) {
            return Err(Error::DuplicateElement(element.clone()));
        }
    }
    let exponent = registry.product_excluding(elements);
    tracing::debug!("proving {} of {} elements", elements.len(), registry.len());
    Ok(MembershipWitness(
        params.base().modpow(&exponent, params.modulus()),
    ))
}

/// Recompute the product of primes for published `(element, nonce)` pairs.
///
/// Each nonce must encode its element to a prime directly; the search is
/// not continued past a wrong nonce.
pub fn calculate_primes_product(
    elements: &[Element],
    nonces: &[u64],
    hash_bits: usize,
) -> Result<BigUint> {
    if elements.len() != nonces.len() {
        return Err(Error::LengthMismatch {
            elements: elements.len(),
            nonces: nonces.len(),
        });
    }
    elements
        .par_iter()
        .zip(nonces.par_iter())
        .map(|(element, &nonce)| {
            PrimeRepresentative::at_nonce(&element.0, hash_bits, nonce)?
                .map(|rep| rep.prime)
                .ok_or_else(|| Error::InvalidNonce(element.clone()))
        })
        .try_reduce(BigUint::one, |a, b| Ok(a * b))
}

/// Check `witness^p mod n == A` where `p` is recomputed from `element`
/// and `nonce`
///
/// The prime is derived from `element + nonce`, so membership is proven
/// for that sum rather than for `element` alone: a non-member `x + k`
/// verifies with nonce 0 against the witness of a member `x` published
/// with nonce `k`. For example 7, 11 and 13 all encode through 17.
/// Callers that need distinct members must compare primes, not elements.
pub fn verify_membership(
    params: &PublicParams,
    accumulator: &Accumulator,
    element: &Element,
    nonce: u64,
    witness: &MembershipWitness,
) -> bool {
    match PrimeRepresentative::at_nonce(&element.0, params.hash_bits(), nonce) {
        Ok(Some(rep)) => opens(params, accumulator, witness, &rep.prime),
        _ => false,
    }
}

/// Check `witness^P mod n == A` where `P` is the recomputed prime product
pub fn batch_verify_membership(
    params: &PublicParams,
    accumulator: &Accumulator,
    elements: &[Element],
    nonces: &[u64],
    witness: &MembershipWitness,
) -> bool {
    match calculate_primes_product(elements, nonces, params.hash_bits()) {
        Ok(exponent) => opens(params, accumulator, witness, &exponent),
        Err(_) => false,
    }
}

// witnesses are canonical residues
fn opens(
    params: &PublicParams,
    accumulator: &Accumulator,
    witness: &MembershipWitness,
    exponent: &BigUint,
) -> bool {
    witness.0 < *params.modulus()
        && witness.0.modpow(exponent, params.modulus()) == accumulator.0
}
