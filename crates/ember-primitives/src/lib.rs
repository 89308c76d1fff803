//! # ember-primitives
//!
//! Primitive types for the Ember node kernel.
//!
//! Provides the 20-byte [`Address`] and 32-byte [`H256`] newtypes used
//! throughout the system, plus the 256-bit word type the virtual machine
//! computes over.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod address;
mod hash;

pub use address::{Address, AddressError};
pub use hash::{Hash, HashError, H256};

// Re-export primitive-types for 256-bit words. U512 is used as the
// double-width intermediate for modular arithmetic.
pub use primitive_types::{U256, U512};

/// Block height type
pub type BlockNumber = u64;

/// Gas type
pub type Gas = u64;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn u256_wraps_modulo_2_256() {
        let (sum, overflow) = U256::MAX.overflowing_add(U256::one());
        assert!(overflow);
        assert_eq!(sum, U256::zero());
    }

    #[test]
    fn address_word_roundtrip() {
        let addr = Address::from_bytes([0xAB; 20]);
        assert_eq!(Address::from_word(addr.into_word()), addr);
    }
}
