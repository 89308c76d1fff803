//! Account record

use bytes::Bytes;
use ember_primitives::U256;
use std::collections::HashMap;

/// A single account: balance, nonce, code and key/value storage.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Account {
    /// Balance in the smallest currency unit
    pub balance: U256,
    /// Number of transactions sent (or contracts created) by this account
    pub nonce: U256,
    /// Contract code, empty for externally-owned accounts
    pub code: Bytes,
    /// Contract storage
    pub storage: HashMap<U256, U256>,
}

impl Account {
    /// An account with every field zeroed and code removed is dead and
    /// eligible for implicit removal after self-destruct.
    pub fn is_dead(&self) -> bool {
        self.balance.is_zero()
            && self.nonce.is_zero()
            && self.code.is_empty()
            && self.storage.values().all(|v| v.is_zero())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_dead() {
        assert!(Account::default().is_dead());
    }

    #[test]
    fn test_balance_keeps_alive() {
        let account = Account {
            balance: U256::one(),
            ..Default::default()
        };
        assert!(!account.is_dead());
    }

    #[test]
    fn test_zeroed_storage_is_dead() {
        let mut account = Account::default();
        account.storage.insert(U256::from(3u64), U256::zero());
        assert!(account.is_dead());

        account.storage.insert(U256::from(3u64), U256::one());
        assert!(!account.is_dead());
    }
}
