//! Chain error types

use ember_primitives::{H256, U256};
use thiserror::Error;

/// Storage backend errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying backend failed
    #[error("store backend error: {0}")]
    Backend(String),
}

impl From<rocksdb::Error> for StoreError {
    fn from(err: rocksdb::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Header and block validation errors. A rejected header never mutates
/// the store.
#[derive(Debug, Error)]
pub enum ChainError {
    /// The parent header is not in the store
    #[error("unknown parent: {0}")]
    UnknownParent(H256),

    /// number != parent.number + 1
    #[error("non-sequential block number {got} (parent is {parent})")]
    NonSequentialNumber {
        /// Parent height
        parent: u64,
        /// Offered height
        got: u64,
    },

    /// timestamp <= parent.timestamp
    #[error("timestamp {got} not after parent timestamp {parent}")]
    StaleTimestamp {
        /// Parent timestamp
        parent: u64,
        /// Offered timestamp
        got: u64,
    },

    /// Gas limit below the floor or drifting too far from the parent's
    #[error("gas limit {got} out of bounds (parent {parent})")]
    GasLimitOutOfBounds {
        /// Parent gas limit
        parent: u64,
        /// Offered gas limit
        got: u64,
    },

    /// Recomputed difficulty disagrees with the header
    #[error("difficulty mismatch: expected {expected}, got {got}")]
    InvalidDifficulty {
        /// Difficulty the rules require
        expected: U256,
        /// Difficulty the header claims
        got: U256,
    },

    /// No block stored under this hash
    #[error("unknown block: {0}")]
    UnknownBlock(H256),

    /// Stored bytes failed to decode; treated as an invalid block
    #[error("codec error: {0}")]
    Codec(#[from] ember_rlp::DecoderError),

    /// Backend failure
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Result alias for chain operations
pub type ChainResult<T> = Result<T, ChainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = ChainError::NonSequentialNumber { parent: 5, got: 9 };
        assert_eq!(
            format!("{}", err),
            "non-sequential block number 9 (parent is 5)"
        );

        let err = ChainError::StaleTimestamp { parent: 10, got: 10 };
        assert_eq!(format!("{}", err), "timestamp 10 not after parent timestamp 10");
    }

    #[test]
    fn test_store_error_conversion() {
        let err: ChainError = StoreError::Backend("disk on fire".into()).into();
        assert!(matches!(err, ChainError::Store(_)));
    }
}
