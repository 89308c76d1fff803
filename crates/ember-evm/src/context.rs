//! Execution environment

use bytes::Bytes;
use ember_primitives::{Address, U256};

/// Per-invocation call context: the instruction descriptor of a frame.
#[derive(Clone, Debug)]
pub struct CallContext {
    /// Account whose storage and balance the code runs against
    pub address: Address,
    /// Immediate caller
    pub caller: Address,
    /// Value attached to the call
    pub value: U256,
    /// Input data
    pub input: Bytes,
    /// Code being executed
    pub code: Bytes,
    /// Whether state modifications are forbidden
    pub is_static: bool,
}

impl CallContext {
    /// Create a call context for running `code` at `address`
    pub fn new(address: Address, caller: Address, value: U256, input: Bytes, code: Bytes) -> Self {
        Self {
            address,
            caller,
            value,
            input,
            code,
            is_static: false,
        }
    }
}

impl Default for CallContext {
    fn default() -> Self {
        Self {
            address: Address::ZERO,
            caller: Address::ZERO,
            value: U256::zero(),
            input: Bytes::new(),
            code: Bytes::new(),
            is_static: false,
        }
    }
}

/// Block-level environment
#[derive(Clone, Debug)]
pub struct BlockContext {
    /// Block number
    pub number: u64,
    /// Block timestamp
    pub timestamp: u64,
    /// Block gas limit
    pub gas_limit: u64,
    /// Block producer
    pub coinbase: Address,
    /// Block difficulty
    pub difficulty: U256,
}

impl Default for BlockContext {
    fn default() -> Self {
        Self {
            number: 0,
            timestamp: 0,
            gas_limit: 30_000_000,
            coinbase: Address::ZERO,
            difficulty: U256::zero(),
        }
    }
}

/// Transaction-level environment
#[derive(Clone, Debug, Default)]
pub struct TxContext {
    /// Original transaction sender
    pub origin: Address,
    /// Gas price
    pub gas_price: U256,
}

/// Complete execution environment
#[derive(Clone, Debug, Default)]
pub struct Environment {
    /// Block context
    pub block: BlockContext,
    /// Transaction context
    pub tx: TxContext,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_call_context_new() {
        let ctx = CallContext::new(
            Address::from_bytes([0x11; 20]),
            Address::from_bytes([0x22; 20]),
            U256::from(1000u64),
            Bytes::from_static(&[1, 2, 3]),
            Bytes::from_static(&[0x00]),
        );
        assert_eq!(ctx.address, Address::from_bytes([0x11; 20]));
        assert_eq!(ctx.caller, Address::from_bytes([0x22; 20]));
        assert_eq!(ctx.value, U256::from(1000u64));
        assert!(!ctx.is_static);
    }

    #[test]
    fn test_defaults() {
        let env = Environment::default();
        assert_eq!(env.block.number, 0);
        assert_eq!(env.block.gas_limit, 30_000_000);
        assert_eq!(env.tx.origin, Address::ZERO);
        assert!(env.tx.gas_price.is_zero());
    }
}
