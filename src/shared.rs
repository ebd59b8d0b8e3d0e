/*
    Copyright Hyperledger Foundation. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
use crate::accumulator::{Element, RsaAccumulator};
use crate::error::Result;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;

/// Single writer, many reader handle on an accumulator.
///
/// Readers get an immutable snapshot of `(A, S)` and never wait on an
/// exponentiation. Writers are serialized, work on a private copy and
/// publish it in one swap, so no reader observes a half applied update.
#[derive(Debug)]
pub struct SharedAccumulator {
    current: RwLock<Arc<RsaAccumulator>>,
    writer: Mutex<()>,
}

impl From<RsaAccumulator> for SharedAccumulator {
    fn from(acc: RsaAccumulator) -> Self {
        Self::new(acc)
    }
}

impl SharedAccumulator {
    /// Share an accumulator
    pub fn new(acc: RsaAccumulator) -> Self {
        Self {
            current: RwLock::new(Arc::new(acc)),
            writer: Mutex::new(()),
        }
    }

    /// The latest published state
    pub fn snapshot(&self) -> Arc<RsaAccumulator> {
        self.current.read().clone()
    }

    /// Add one element and publish the new state
    pub fn add(&self, element: Element) -> Result<u64> {
        self.update(|acc| acc.add_assign(element))
    }

    /// Add a batch and publish the new state
    pub fn add_elements(&self, elements: &[Element]) -> Result<Vec<u64>> {
        self.update(|acc| acc.add_elements_assign(elements))
    }

    fn update<T>(&self, f: impl FnOnce(&mut RsaAccumulator) -> Result<T>) -> Result<T> {
        let _writer = self.writer.lock();
        let mut next = RsaAccumulator::clone(&self.snapshot());
        let out = f(&mut next)?;
        *self.current.write() = Arc::new(next);
        Ok(out)
    }
}
