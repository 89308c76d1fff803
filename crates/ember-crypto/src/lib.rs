//! # ember-crypto
//!
//! Keccak-256 hashing for the Ember node kernel.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod hash;

pub use hash::keccak256;
