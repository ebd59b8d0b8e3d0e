/*
    Copyright Hyperledger Foundation. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
use super::{Element, PrimeRepresentative};
use crate::error::{Error, Result};
use num_bigint::BigUint;
use num_traits::One;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{btree_map, BTreeMap, BTreeSet};

/// The element registry `S`: every accumulated element mapped to the
/// prime it was accumulated as.
///
/// Membership is key presence and the nonce is read from the value, so a
/// single ordered map serves both purposes. Entries are never replaced.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Registry(BTreeMap<Element, PrimeRepresentative>);

impl Registry {
    /// An empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of accumulated elements
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if nothing has been accumulated
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True if `element` has been accumulated
    pub fn contains(&self, element: &Element) -> bool {
        self.0.contains_key(element)
    }

    /// The prime representative of `element`
    pub fn get(&self, element: &Element) -> Option<&PrimeRepresentative> {
        self.0.get(element)
    }

    /// The nonce `element` was encoded with
    pub fn nonce(&self, element: &Element) -> Option<u64> {
        self.0.get(element).map(|rep| rep.nonce)
    }

    /// Nonces for a batch, in the order given
    pub fn nonces_for(&self, elements: &[Element]) -> Result<Vec<u64>> {
        elements
            .iter()
            .map(|e| self.nonce(e).ok_or_else(|| Error::ElementNotFound(e.clone())))
            .collect()
    }

    /// Iterate in element order
    pub fn iter(&self) -> btree_map::Iter<'_, Element, PrimeRepresentative> {
        self.0.iter()
    }

    pub(crate) fn insert(&mut self, element: Element, rep: PrimeRepresentative) -> Result<()> {
        match self.0.entry(element) {
            btree_map::Entry::Occupied(entry) => Err(Error::DuplicateElement(entry.key().clone())),
            btree_map::Entry::Vacant(entry) => {
                entry.insert(rep);
                Ok(())
            }
        }
    }

    /// Product of the primes of every element not in `excluded`
    pub(crate) fn product_excluding(&self, excluded: &[Element]) -> BigUint {
        let excluded = excluded.iter().collect::<BTreeSet<_>>();
        self.0
            .par_iter()
            .filter(|(element, _)| !excluded.contains(element))
            .map(|(_, rep)| rep.prime.clone())
            .reduce(BigUint::one, |a, b| a * b)
    }
}

impl<'a> IntoIterator for &'a Registry {
    type Item = (&'a Element, &'a PrimeRepresentative);
    type IntoIter = btree_map::Iter<'a, Element, PrimeRepresentative>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rep(prime: u32, nonce: u64) -> PrimeRepresentative {
        PrimeRepresentative {
            prime: BigUint::from(prime),
            nonce,
        }
    }

    #[test]
    fn insert_once() {
        let mut registry = Registry::new();
        assert!(registry.is_empty());
        registry.insert(Element::from(5u64), rep(7, 2)).unwrap();
        assert!(matches!(
            registry.insert(Element::from(5u64), rep(11, 0)),
            Err(Error::DuplicateElement(_))
        ));
        assert_eq!(registry.nonce(&Element::from(5u64)), Some(2));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn nonces_in_request_order() {
        let mut registry = Registry::new();
        registry.insert(Element::from(1u64), rep(3, 1)).unwrap();
        registry.insert(Element::from(2u64), rep(5, 2)).unwrap();
        let nonces = registry
            .nonces_for(&[Element::from(2u64), Element::from(1u64)])
            .unwrap();
        assert_eq!(nonces, vec![2, 1]);
        assert!(matches!(
            registry.nonces_for(&[Element::from(9u64)]),
            Err(Error::ElementNotFound(_))
        ));
    }

    #[test]
    fn product_skips_excluded() {
        let mut registry = Registry::new();
        for (e, p) in [(1u64, 3u32), (2, 5), (3, 7)] {
            registry.insert(Element::from(e), rep(p, 0)).unwrap();
        }
        assert_eq!(registry.product_excluding(&[]), BigUint::from(105u32));
        assert_eq!(
            registry.product_excluding(&[Element::from(2u64)]),
            BigUint::from(21u32)
        );
        assert_eq!(
            registry.product_excluding(&[Element::from(1u64), Element::from(3u64)]),
            BigUint::from(5u32)
        );
    }
}
