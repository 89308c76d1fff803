//! Gas cost schedule
//!
//! Static per-opcode costs are charged before dispatch; dynamic costs
//! (memory growth, copies, hashing, storage writes, calls) are charged by
//! the handlers.

use crate::opcode::Opcode;
use ember_primitives::U256;

/// Gas cost constants
pub mod cost {
    /// Zero gas
    pub const ZERO: u64 = 0;
    /// Base gas
    pub const BASE: u64 = 2;
    /// Very low gas
    pub const VERYLOW: u64 = 3;
    /// Low gas
    pub const LOW: u64 = 5;
    /// Mid gas
    pub const MID: u64 = 8;
    /// High gas
    pub const HIGH: u64 = 10;

    /// Jump dest gas
    pub const JUMPDEST: u64 = 1;
    /// Exp base gas
    pub const EXP: u64 = 10;
    /// Exp gas per exponent byte
    pub const EXP_BYTE: u64 = 50;
    /// SHA3 base gas
    pub const SHA3: u64 = 30;
    /// SHA3 gas per word
    pub const SHA3_WORD: u64 = 6;

    /// Balance lookup gas
    pub const BALANCE: u64 = 400;
    /// External code size gas
    pub const EXTCODE: u64 = 700;
    /// Block hash lookup gas
    pub const BLOCKHASH: u64 = 20;

    /// Storage read gas
    pub const SLOAD: u64 = 200;
    /// Storage write gas, zero to non-zero
    pub const SSTORE_SET: u64 = 20000;
    /// Storage write gas, any other transition
    pub const SSTORE_RESET: u64 = 5000;

    /// Log base gas
    pub const LOG: u64 = 375;
    /// Log gas per topic
    pub const LOG_TOPIC: u64 = 375;
    /// Log gas per data byte
    pub const LOG_DATA: u64 = 8;

    /// Create gas
    pub const CREATE: u64 = 32000;
    /// Gas per byte of deposited contract code
    pub const CREATE_DATA: u64 = 200;
    /// Call base gas
    pub const CALL: u64 = 700;
    /// Call value transfer surcharge
    pub const CALL_VALUE: u64 = 9000;
    /// Stipend granted to the callee of a value transfer
    pub const CALL_STIPEND: u64 = 2300;

    /// Memory gas per word
    pub const MEMORY: u64 = 3;
    /// Copy gas per word
    pub const COPY: u64 = 3;

    /// Selfdestruct gas
    pub const SELFDESTRUCT: u64 = 5000;

    /// Max call depth
    pub const MAX_CALL_DEPTH: usize = 1024;
}

/// Static gas cost for an opcode
pub fn static_gas(opcode: Opcode) -> u64 {
    use Opcode::*;
    match opcode {
        STOP | RETURN | REVERT | INVALID => cost::ZERO,

        ADDRESS | ORIGIN | CALLER | CALLVALUE | CALLDATASIZE | CODESIZE | GASPRICE
        | RETURNDATASIZE | COINBASE | TIMESTAMP | NUMBER | DIFFICULTY | GASLIMIT | POP | PC
        | MSIZE | GAS => cost::BASE,

        ADD | SUB | LT | GT | SLT | SGT | EQ | ISZERO | AND | OR | XOR | NOT | BYTE
        | CALLDATALOAD | MLOAD | MSTORE | MSTORE8 | CALLDATACOPY | CODECOPY
        | RETURNDATACOPY => cost::VERYLOW,

        MUL | DIV | SDIV | MOD | SMOD | SIGNEXTEND => cost::LOW,

        ADDMOD | MULMOD | JUMP => cost::MID,

        JUMPI => cost::HIGH,

        EXP => cost::EXP,
        SHA3 => cost::SHA3,
        BALANCE => cost::BALANCE,
        EXTCODESIZE | EXTCODECOPY => cost::EXTCODE,
        BLOCKHASH => cost::BLOCKHASH,
        SLOAD => cost::SLOAD,
        // SSTORE charges dynamically on the value transition
        SSTORE => cost::ZERO,
        JUMPDEST => cost::JUMPDEST,
        CREATE => cost::CREATE,
        CALL | CALLCODE | DELEGATECALL => cost::CALL,
        SELFDESTRUCT => cost::SELFDESTRUCT,

        other => {
            if other.is_push() || other.dup_depth() > 0 || other.swap_depth() > 0 {
                cost::VERYLOW
            } else {
                // LOGk: the full cost is charged dynamically
                cost::ZERO
            }
        }
    }
}

fn word_cost(len: usize) -> u128 {
    let words = (len as u128).div_ceil(32);
    words * cost::MEMORY as u128 + words * words / 512
}

/// Gas for growing memory from `current` to `required` bytes (both
/// rounded up to words); zero if no growth happens
pub fn memory_expansion(current: usize, required: usize) -> u64 {
    if required <= current {
        return 0;
    }
    u64::try_from(word_cost(required) - word_cost(current)).unwrap_or(u64::MAX)
}

/// Gas for copying `size` bytes
pub fn copy_gas(size: usize) -> u64 {
    (size.div_ceil(32) as u64).saturating_mul(cost::COPY)
}

/// Dynamic gas for hashing `size` bytes
pub fn sha3_gas(size: usize) -> u64 {
    (size.div_ceil(32) as u64).saturating_mul(cost::SHA3_WORD)
}

/// Dynamic gas for EXP, paid per significant exponent byte
pub fn exp_gas(exponent: U256) -> u64 {
    let bytes = (exponent.bits() as u64).div_ceil(8);
    bytes * cost::EXP_BYTE
}

/// Dynamic gas for LOGk
pub fn log_gas(topics: usize, size: usize) -> u64 {
    cost::LOG
        + cost::LOG_TOPIC * topics as u64
        + cost::LOG_DATA.saturating_mul(size as u64)
}

/// Dynamic gas for SSTORE based on the value transition
pub fn sstore_gas(current: U256, new: U256) -> u64 {
    if current.is_zero() && !new.is_zero() {
        cost::SSTORE_SET
    } else {
        cost::SSTORE_RESET
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_costs() {
        assert_eq!(static_gas(Opcode::STOP), 0);
        assert_eq!(static_gas(Opcode::ADD), 3);
        assert_eq!(static_gas(Opcode::MUL), 5);
        assert_eq!(static_gas(Opcode::ADDMOD), 8);
        assert_eq!(static_gas(Opcode::JUMPI), 10);
        assert_eq!(static_gas(Opcode::PUSH1), 3);
        assert_eq!(static_gas(Opcode::DUP16), 3);
        assert_eq!(static_gas(Opcode::SWAP1), 3);
        assert_eq!(static_gas(Opcode::JUMPDEST), 1);
        assert_eq!(static_gas(Opcode::CREATE), 32000);
        assert_eq!(static_gas(Opcode::CALL), 700);
        assert_eq!(static_gas(Opcode::SELFDESTRUCT), 5000);
    }

    #[test]
    fn test_memory_expansion_quadratic() {
        // First word: 3 + 1/512 -> 3
        assert_eq!(memory_expansion(0, 32), 3);
        // No growth, no charge
        assert_eq!(memory_expansion(64, 32), 0);
        assert_eq!(memory_expansion(64, 64), 0);
        // Growth charges the difference of the word costs
        let to_10_words = memory_expansion(0, 320);
        let to_5_words = memory_expansion(0, 160);
        assert_eq!(memory_expansion(160, 320), to_10_words - to_5_words);
        // The quadratic term shows up for large sizes
        let words = 1024usize;
        let expected = (words as u64) * 3 + ((words * words) as u64) / 512;
        assert_eq!(memory_expansion(0, words * 32), expected);
    }

    #[test]
    fn test_copy_and_sha3_gas_round_up_to_words() {
        assert_eq!(copy_gas(0), 0);
        assert_eq!(copy_gas(1), 3);
        assert_eq!(copy_gas(32), 3);
        assert_eq!(copy_gas(33), 6);
        assert_eq!(sha3_gas(64), 12);
    }

    #[test]
    fn test_exp_gas_per_byte() {
        assert_eq!(exp_gas(U256::zero()), 0);
        assert_eq!(exp_gas(U256::from(0xFFu64)), 50);
        assert_eq!(exp_gas(U256::from(0x100u64)), 100);
        assert_eq!(exp_gas(U256::MAX), 32 * 50);
    }

    #[test]
    fn test_log_gas() {
        assert_eq!(log_gas(0, 0), 375);
        assert_eq!(log_gas(2, 10), 375 + 750 + 80);
    }

    #[test]
    fn test_sstore_gas_transitions() {
        assert_eq!(sstore_gas(U256::zero(), U256::one()), 20000);
        assert_eq!(sstore_gas(U256::one(), U256::zero()), 5000);
        assert_eq!(sstore_gas(U256::one(), U256::from(2u64)), 5000);
        assert_eq!(sstore_gas(U256::zero(), U256::zero()), 5000);
    }
}
