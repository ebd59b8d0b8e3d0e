/*
    Copyright Hyperledger Foundation. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
use super::hash::hash_to_prime_bounded;
use super::{PublicParams, Registry};
use crate::config::AccParams;
use crate::error::{Error, Result};
use crate::utils::{from_hex, par_product, to_padded_hex};
use crate::witness::MembershipWitness;
use core::fmt::{self, Display, Formatter};
use num_bigint::BigUint;
use rand::{CryptoRng, RngCore};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// An element in the accumulator, any non-negative integer
#[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Element(pub BigUint);

impl Display for Element {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Element {{ {} }}", self.0)
    }
}

impl From<BigUint> for Element {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl From<u64> for Element {
    fn from(value: u64) -> Self {
        Self(BigUint::from(value))
    }
}

impl Element {
    /// Parse from hex with or without `0x`
    pub fn from_hex(s: &str) -> Result<Self> {
        from_hex(s).map(Self)
    }
}

/// The accumulator value `A`, an element of the group mod `n`
#[derive(Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Accumulator(pub BigUint);

impl Display for Accumulator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "Accumulator {{ {} }}", self.0)
    }
}

impl From<BigUint> for Accumulator {
    fn from(value: BigUint) -> Self {
        Self(value)
    }
}

impl From<Accumulator> for BigUint {
    fn from(a: Accumulator) -> Self {
        a.0
    }
}

impl Accumulator {
    /// The empty accumulator is the base `A0`
    pub fn new(params: &PublicParams) -> Self {
        Self(params.base.clone())
    }

    /// Fixed-width hex, e.g. 384 bytes for a 3072-bit modulus
    pub fn to_hex(&self, byte_len: usize) -> Result<String> {
        to_padded_hex(&self.0, byte_len)
    }

    /// Parse from hex with or without `0x`
    pub fn from_hex(s: &str) -> Result<Self> {
        from_hex(s).map(Self)
    }
}

/// Accumulate one element: `A' = A^p mod n` where `p` encodes `element`.
///
/// The element is recorded in `registry` with its nonce. An element that
/// is already present is rejected and nothing changes.
pub fn add(
    value: &Accumulator,
    registry: &mut Registry,
    element: Element,
    params: &PublicParams,
    max_nonce_attempts: u64,
) -> Result<(Accumulator, u64)> {
    if registry.contains(&element) {
        tracing::warn!("rejecting duplicate {}", element);
        return Err(Error::DuplicateElement(element));
    }
    let rep = hash_to_prime_bounded(&element.0, params.hash_bits, 0, max_nonce_attempts)?;
    let next = Accumulator(value.0.modpow(&rep.prime, &params.modulus));
    let nonce = rep.nonce;
    registry.insert(element, rep)?;
    Ok((next, nonce))
}

/// Accumulate many elements with a single exponentiation by the product
/// of their primes.
///
/// Encodings run in parallel. Nothing is recorded unless every element is
/// new, distinct and encodes within the nonce cap.
pub fn batch_add(
    value: &Accumulator,
    registry: &mut Registry,
    elements: &[Element],
    params: &PublicParams,
    max_nonce_attempts: u64,
) -> Result<(Accumulator, Vec<u64>)> {
    let mut seen = BTreeSet::new();
    for element in elements {
        if registry.contains(element) || !seen.insert(element) {
            tracing::warn!("rejecting duplicate {} in batch", element);
            return Err(Error::DuplicateElement(element.clone()));
        }
    }
    let reps = elements
        .par_iter()
        .map(|e| hash_to_prime_bounded(&e.0, params.hash_bits, 0, max_nonce_attempts))
        .collect::<Result<Vec<_>>>()?;
    let primes = reps.iter().map(|rep| rep.prime.clone()).collect::<Vec<_>>();
    let exponent = par_product(&primes);
    let next = Accumulator(value.0.modpow(&exponent, &params.modulus));
    tracing::debug!("batch added {} elements", elements.len());

    let mut nonces = Vec::with_capacity(reps.len());
    for (element, rep) in elements.iter().zip(reps) {
        nonces.push(rep.nonce);
        registry.insert(element.clone(), rep)?;
    }
    Ok((next, nonces))
}

/// An RSA accumulator: public parameters, the current value `A` and the
/// element registry `S`
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRsaAccumulator")]
pub struct RsaAccumulator {
    params: PublicParams,
    config: AccParams,
    value: Accumulator,
    registry: Registry,
}

#[derive(Deserialize)]
struct RawRsaAccumulator {
    params: PublicParams,
    config: AccParams,
    value: Accumulator,
    registry: Registry,
}

impl TryFrom<RawRsaAccumulator> for RsaAccumulator {
    type Error = Error;

    fn try_from(raw: RawRsaAccumulator) -> Result<Self> {
        let mut acc = Self::with_params(raw.params, raw.config)?;
        if raw.value.0 >= acc.params.modulus {
            return Err(Error::InvalidParameter("accumulator value is not below the modulus"));
        }
        acc.value = raw.value;
        acc.registry = raw.registry;
        Ok(acc)
    }
}

impl Display for RsaAccumulator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "RsaAccumulator {{ value: {}, elements: {} }}",
            self.value.0,
            self.registry.len()
        )
    }
}

impl RsaAccumulator {
    /// Run setup and start with the empty set
    pub fn setup(config: &AccParams, rng: impl RngCore + CryptoRng) -> Result<Self> {
        let params = PublicParams::generate(config, rng)?;
        Self::with_params(params, *config)
    }

    /// Start an empty accumulator over existing public parameters
    pub fn with_params(params: PublicParams, config: AccParams) -> Result<Self> {
        params.check()?;
        config.validate()?;
        if config.hash_bits != params.hash_bits {
            return Err(Error::InvalidParameter(
                "hash_bits differs from the public parameters",
            ));
        }
        Ok(Self {
            value: Accumulator::new(&params),
            params,
            config,
            registry: Registry::new(),
        })
    }

    /// The public parameters
    pub fn params(&self) -> &PublicParams {
        &self.params
    }

    /// The configuration this accumulator was built with
    pub fn config(&self) -> &AccParams {
        &self.config
    }

    /// The current value `A`
    pub fn value(&self) -> &Accumulator {
        &self.value
    }

    /// The element registry `S`
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The nonce `element` was encoded with, if it is accumulated
    pub fn nonce(&self, element: &Element) -> Option<u64> {
        self.registry.nonce(element)
    }

    /// Add a value and return the new accumulator
    pub fn add(&self, element: Element) -> Result<(Self, u64)> {
        let mut next = self.clone();
        let nonce = next.add_assign(element)?;
        Ok((next, nonce))
    }

    /// Add a value and update this accumulator
    pub fn add_assign(&mut self, element: Element) -> Result<u64> {
        let (value, nonce) = add(
            &self.value,
            &mut self.registry,
            element,
            &self.params,
            self.config.max_nonce_attempts,
        )?;
        self.value = value;
        Ok(nonce)
    }

    /// Add many members and return the new accumulator
    pub fn add_elements(&self, elements: &[Element]) -> Result<(Self, Vec<u64>)> {
        let mut next = self.clone();
        let nonces = next.add_elements_assign(elements)?;
        Ok((next, nonces))
    }

    /// Add many members
    pub fn add_elements_assign(&mut self, elements: &[Element]) -> Result<Vec<u64>> {
        let (value, nonces) = batch_add(
            &self.value,
            &mut self.registry,
            elements,
            &self.params,
            self.config.max_nonce_attempts,
        )?;
        self.value = value;
        Ok(nonces)
    }

    /// Add many members, one exponentiation per `batch_size` chunk.
    ///
    /// Chunks already applied stay applied if a later chunk fails.
    pub fn add_elements_chunked(&mut self, elements: &[Element]) -> Result<Vec<u64>> {
        let mut nonces = Vec::with_capacity(elements.len());
        for chunk in elements.chunks(self.config.batch_size) {
            nonces.extend(self.add_elements_assign(chunk)?);
        }
        Ok(nonces)
    }

    /// Witness for one accumulated element
    pub fn prove_membership(&self, element: &Element) -> Result<MembershipWitness> {
        crate::witness::prove_membership(&self.params, &self.registry, element)
    }

    /// Witness for a subset of accumulated elements
    pub fn batch_prove_membership(&self, elements: &[Element]) -> Result<MembershipWitness> {
        crate::witness::batch_prove_membership(&self.params, &self.registry, elements)
    }
}
