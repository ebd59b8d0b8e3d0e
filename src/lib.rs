/*
    Copyright Hyperledger Foundation. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
//! An RSA accumulator over a group of hidden order.
//!
//! Elements are mapped to primes with a nonce-salted hash, the accumulator
//! value is `A = A0^(p_1 * ... * p_k) mod n` and a membership witness is
//! the same power with the proven primes left out. Batches of elements
//! are added and proven with one exponentiation, and witnesses for coprime
//! exponents combine with Shamir's trick.
#![deny(
    missing_docs,
    unused_import_braces,
    unused_qualifications,
    unused_parens,
    unused_lifetimes,
    unconditional_recursion,
    unused_extern_crates,
    trivial_casts,
    trivial_numeric_casts
)]
mod aggregate;
mod config;
mod error;
mod shared;
mod witness;


/// Setup, prime encoding and the accumulator state
pub mod accumulator;
/// Integer helpers and the hex form of published values
pub mod utils;

pub use accumulator::{Accumulator, Element, PublicParams, Registry, RsaAccumulator};
pub use aggregate::*;
pub use config::*;
pub use error::*;
pub use shared::*;
pub use witness::*;
