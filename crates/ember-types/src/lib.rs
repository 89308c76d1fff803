//! # ember-types
//!
//! Header and block types for the Ember node kernel.
//!
//! Headers are immutable once written and content-addressed by the
//! Keccak-256 hash of their RLP encoding.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod block;
mod bloom;
mod header;

pub use block::Block;
pub use bloom::Bloom;
pub use header::{Header, EMPTY_OMMERS_HASH};
