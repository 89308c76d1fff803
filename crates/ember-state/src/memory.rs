//! In-memory world state with snapshot journaling

use crate::{Account, Snapshot, State};
use bytes::Bytes;
use ember_primitives::{Address, U256};
use std::collections::HashMap;

/// In-memory world state.
///
/// Snapshots are whole-map clones pushed onto a stack; `revert` restores
/// the clone and `commit` merely forgets it. Frames nest naturally: a
/// child's snapshot sits above its parent's, so reverting the child can
/// never disturb effects the parent has already seen.
#[derive(Clone, Debug, Default)]
pub struct MemoryState {
    accounts: HashMap<Address, Account>,
    snapshots: Vec<HashMap<Address, Account>>,
}

impl MemoryState {
    /// Create an empty world state
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live account records
    pub fn account_count(&self) -> usize {
        self.accounts.len()
    }

    fn entry(&mut self, address: &Address) -> &mut Account {
        self.accounts.entry(*address).or_default()
    }
}

impl State for MemoryState {
    fn balance(&self, address: &Address) -> U256 {
        self.accounts
            .get(address)
            .map(|a| a.balance)
            .unwrap_or_default()
    }

    fn nonce(&self, address: &Address) -> U256 {
        self.accounts
            .get(address)
            .map(|a| a.nonce)
            .unwrap_or_default()
    }

    fn set_balance(&mut self, address: &Address, value: U256) {
        self.entry(address).balance = value;
    }

    fn add_balance(&mut self, address: &Address, amount: U256) {
        let account = self.entry(address);
        account.balance = account.balance.overflowing_add(amount).0;
    }

    fn sub_balance(&mut self, address: &Address, amount: U256) -> bool {
        let account = self.entry(address);
        if account.balance < amount {
            return false;
        }
        account.balance -= amount;
        true
    }

    fn set_nonce(&mut self, address: &Address, value: U256) {
        self.entry(address).nonce = value;
    }

    fn increment_nonce(&mut self, address: &Address) -> U256 {
        let account = self.entry(address);
        let previous = account.nonce;
        account.nonce = previous.overflowing_add(U256::one()).0;
        previous
    }

    fn code(&self, address: &Address) -> Bytes {
        self.accounts
            .get(address)
            .map(|a| a.code.clone())
            .unwrap_or_default()
    }

    fn set_code(&mut self, address: &Address, code: Bytes) {
        self.entry(address).code = code;
    }

    fn get_storage(&self, address: &Address, key: &U256) -> U256 {
        self.accounts
            .get(address)
            .and_then(|a| a.storage.get(key))
            .copied()
            .unwrap_or_default()
    }

    fn set_storage(&mut self, address: &Address, key: U256, value: U256) {
        self.entry(address).storage.insert(key, value);
    }

    fn exists(&self, address: &Address) -> bool {
        self.accounts.contains_key(address)
    }

    fn remove_account(&mut self, address: &Address) {
        self.accounts.remove(address);
    }

    fn snapshot(&mut self) -> Snapshot {
        self.snapshots.push(self.accounts.clone());
        Snapshot(self.snapshots.len() - 1)
    }

    fn revert(&mut self, snapshot: Snapshot) {
        self.accounts = self.snapshots[snapshot.0].clone();
        self.snapshots.truncate(snapshot.0);
    }

    fn commit(&mut self, snapshot: Snapshot) {
        self.snapshots.truncate(snapshot.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(b: u8) -> Address {
        Address::from_bytes([b; 20])
    }

    #[test]
    fn test_absent_account_reads_zero() {
        let state = MemoryState::new();
        assert!(state.balance(&addr(1)).is_zero());
        assert!(state.nonce(&addr(1)).is_zero());
        assert!(state.code(&addr(1)).is_empty());
        assert!(state.get_storage(&addr(1), &U256::one()).is_zero());
        assert!(!state.exists(&addr(1)));
    }

    #[test]
    fn test_balance_arithmetic() {
        let mut state = MemoryState::new();
        state.set_balance(&addr(1), U256::from(100u64));
        state.add_balance(&addr(1), U256::from(50u64));
        assert_eq!(state.balance(&addr(1)), U256::from(150u64));

        assert!(state.sub_balance(&addr(1), U256::from(150u64)));
        assert!(state.balance(&addr(1)).is_zero());

        // Insufficient funds leave the balance untouched
        assert!(!state.sub_balance(&addr(1), U256::one()));
        assert!(state.balance(&addr(1)).is_zero());
    }

    #[test]
    fn test_increment_nonce_returns_previous() {
        let mut state = MemoryState::new();
        assert_eq!(state.increment_nonce(&addr(1)), U256::zero());
        assert_eq!(state.increment_nonce(&addr(1)), U256::one());
        assert_eq!(state.nonce(&addr(1)), U256::from(2u64));
    }

    #[test]
    fn test_storage_roundtrip() {
        let mut state = MemoryState::new();
        let key = U256::from(0x01u64);
        state.set_storage(&addr(0xAA), key, U256::from(0xFFu64));
        assert_eq!(state.get_storage(&addr(0xAA), &key), U256::from(0xFFu64));
    }

    #[test]
    fn test_snapshot_revert() {
        let mut state = MemoryState::new();
        state.set_balance(&addr(1), U256::from(10u64));

        let snap = state.snapshot();
        state.set_balance(&addr(1), U256::from(99u64));
        state.set_storage(&addr(1), U256::one(), U256::from(7u64));

        state.revert(snap);
        assert_eq!(state.balance(&addr(1)), U256::from(10u64));
        assert!(state.get_storage(&addr(1), &U256::one()).is_zero());
    }

    #[test]
    fn test_snapshot_commit_keeps_changes() {
        let mut state = MemoryState::new();
        let snap = state.snapshot();
        state.set_balance(&addr(1), U256::from(42u64));
        state.commit(snap);
        assert_eq!(state.balance(&addr(1)), U256::from(42u64));
    }

    #[test]
    fn test_nested_snapshots() {
        let mut state = MemoryState::new();
        state.set_balance(&addr(1), U256::from(1u64));

        let outer = state.snapshot();
        state.set_balance(&addr(1), U256::from(2u64));

        let inner = state.snapshot();
        state.set_balance(&addr(1), U256::from(3u64));

        // Child sees ancestor's uncommitted-but-applied effects
        state.revert(inner);
        assert_eq!(state.balance(&addr(1)), U256::from(2u64));

        state.revert(outer);
        assert_eq!(state.balance(&addr(1)), U256::from(1u64));
    }

    #[test]
    fn test_revert_to_outer_discards_inner() {
        let mut state = MemoryState::new();
        let outer = state.snapshot();
        state.set_balance(&addr(1), U256::from(2u64));
        let _inner = state.snapshot();
        state.set_balance(&addr(1), U256::from(3u64));

        state.revert(outer);
        assert!(state.balance(&addr(1)).is_zero());
        // A fresh snapshot works fine afterwards
        let snap = state.snapshot();
        state.set_balance(&addr(1), U256::from(5u64));
        state.commit(snap);
        assert_eq!(state.balance(&addr(1)), U256::from(5u64));
    }

    #[test]
    fn test_remove_account() {
        let mut state = MemoryState::new();
        state.set_balance(&addr(1), U256::from(10u64));
        assert!(state.exists(&addr(1)));
        state.remove_account(&addr(1));
        assert!(!state.exists(&addr(1)));
        assert!(state.balance(&addr(1)).is_zero());
    }
}
