//! # ember-state
//!
//! The world state consumed by the virtual machine: a mapping from
//! address to account, with snapshot/revert/commit so nested call frames
//! can tentatively mutate and either keep or discard their effects.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod account;
mod memory;

pub use account::Account;
pub use memory::MemoryState;

use bytes::Bytes;
use ember_primitives::{Address, U256};

/// Opaque snapshot token. Tokens nest: reverting to an older token
/// discards every younger one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Snapshot(pub(crate) usize);

/// Authoritative world state.
///
/// Absent accounts are observationally equivalent to an account with zero
/// balance, zero nonce, empty code and empty storage. A frame sees its
/// ancestors' committed-so-far effects; a reverted frame leaves no trace.
pub trait State {
    /// Account balance, zero for absent accounts
    fn balance(&self, address: &Address) -> U256;

    /// Account nonce, zero for absent accounts
    fn nonce(&self, address: &Address) -> U256;

    /// Set an account's balance
    fn set_balance(&mut self, address: &Address, value: U256);

    /// Add to an account's balance (wrapping)
    fn add_balance(&mut self, address: &Address, amount: U256);

    /// Subtract from an account's balance; returns false (and leaves the
    /// account untouched) if the balance is insufficient
    fn sub_balance(&mut self, address: &Address, amount: U256) -> bool;

    /// Set an account's nonce
    fn set_nonce(&mut self, address: &Address, value: U256);

    /// Increment an account's nonce, returning the previous value
    fn increment_nonce(&mut self, address: &Address) -> U256;

    /// Account code, empty for absent accounts
    fn code(&self, address: &Address) -> Bytes;

    /// Install account code
    fn set_code(&mut self, address: &Address, code: Bytes);

    /// Read a storage slot, zero for untouched slots
    fn get_storage(&self, address: &Address, key: &U256) -> U256;

    /// Write a storage slot
    fn set_storage(&mut self, address: &Address, key: U256, value: U256);

    /// Whether an account record exists at all
    fn exists(&self, address: &Address) -> bool;

    /// Remove an account record entirely (post-self-destruct cleanup)
    fn remove_account(&mut self, address: &Address);

    /// Take a snapshot of the current state
    fn snapshot(&mut self) -> Snapshot;

    /// Roll state back to the snapshot, discarding it and every younger one
    fn revert(&mut self, snapshot: Snapshot);

    /// Keep all changes since the snapshot and discard the snapshot
    fn commit(&mut self, snapshot: Snapshot);
}
