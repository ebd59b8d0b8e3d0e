/*
    Copyright Hyperledger Foundation. All Rights Reserved.
    SPDX-License-Identifier: Apache-2.0
*/
//! Error type shared by every accumulator operation.

use crate::accumulator::Element;
use thiserror::Error;

/// Failures raised by setup, encoding, accumulation and aggregation.
///
/// Verification never returns one of these: a failed check is `false`.
#[derive(Debug, Error)]
pub enum Error {
    /// The value has no inverse modulo the modulus
    #[error("value is not invertible modulo n")]
    NotInvertible,

    /// Shamir's trick needs coprime exponents
    #[error("exponents are not coprime")]
    NotCoprime,

    /// A prime search hit its attempt cap
    #[error("no probable prime found after {attempts} attempts")]
    PrimalityCheckExhausted {
        /// Number of candidates tested before giving up
        attempts: u64,
    },

    /// The element is already in the registry
    #[error("{0} is already accumulated")]
    DuplicateElement(Element),

    /// The published nonce does not encode the element to a prime
    #[error("nonce does not encode {0} to a prime")]
    InvalidNonce(Element),

    /// The element is not in the registry
    #[error("{0} is not accumulated")]
    ElementNotFound(Element),

    /// `pi1^x1 != pi2^x2` for the witnesses handed to Shamir's trick
    #[error("witnesses do not open the same accumulator value")]
    InvalidWitnessPrecondition,

    /// Hash output length must be a positive multiple of 4 bits
    #[error("invalid bit length {0}")]
    InvalidBitLength(usize),

    /// The base is not a unit strictly between 1 and the modulus
    #[error("invalid accumulator base")]
    InvalidBase,

    /// The modulus is too small or even
    #[error("invalid modulus")]
    InvalidModulus,

    /// Parallel element and nonce lists differ in length
    #[error("{elements} elements but {nonces} nonces")]
    LengthMismatch {
        /// Number of elements supplied
        elements: usize,
        /// Number of nonces supplied
        nonces: usize,
    },

    /// A value does not fit the requested fixed width
    #[error("value needs {bytes} bytes but only {max} are available")]
    ValueTooLarge {
        /// Bytes needed by the value
        bytes: usize,
        /// Width requested by the caller
        max: usize,
    },

    /// A configuration value is out of range
    #[error("invalid parameter: {0}")]
    InvalidParameter(&'static str),

    /// Malformed hexadecimal input
    #[error("hex decode error: {0}")]
    Hex(#[from] hex::FromHexError),
}

/// Convenient alias for results throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;
