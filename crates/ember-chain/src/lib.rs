//! # ember-chain
//!
//! Header-chain validation and block storage for the Ember node kernel.
//!
//! The header chain is a content-addressed store with height and
//! total-difficulty indices; admission enforces parent linkage,
//! timestamp monotonicity, gas-limit drift bounds and exact difficulty
//! recomputation. The head always tracks the greatest cumulative
//! difficulty, reorganizing the canonical height index when a
//! side-chain overtakes it.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod chain;
mod error;
mod header_chain;
mod store;

pub use chain::Blockchain;
pub use error::{ChainError, ChainResult, StoreError};
pub use header_chain::{calculate_difficulty, keys, ChainConfig, HeaderChain};
pub use store::{MemoryStore, RocksStore, Store, WriteBatch};
