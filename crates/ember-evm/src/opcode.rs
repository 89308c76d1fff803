//! Opcode definitions and static stack arities

/// Static stack effect of an opcode: how many words it pops and pushes.
/// The interpreter validates the stack against these before dispatching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpInfo {
    /// Words consumed from the stack
    pub inputs: usize,
    /// Words left on the stack
    pub outputs: usize,
}

const fn op(inputs: usize, outputs: usize) -> OpInfo {
    OpInfo { inputs, outputs }
}

/// Opcodes (Yellow Paper Appendix H)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
#[allow(missing_docs)]
pub enum Opcode {
    // Stop and Arithmetic
    STOP = 0x00,
    ADD = 0x01,
    MUL = 0x02,
    SUB = 0x03,
    DIV = 0x04,
    SDIV = 0x05,
    MOD = 0x06,
    SMOD = 0x07,
    ADDMOD = 0x08,
    MULMOD = 0x09,
    EXP = 0x0A,
    SIGNEXTEND = 0x0B,

    // Comparison & Bitwise Logic
    LT = 0x10,
    GT = 0x11,
    SLT = 0x12,
    SGT = 0x13,
    EQ = 0x14,
    ISZERO = 0x15,
    AND = 0x16,
    OR = 0x17,
    XOR = 0x18,
    NOT = 0x19,
    BYTE = 0x1A,

    // SHA3
    SHA3 = 0x20,

    // Environmental Information
    ADDRESS = 0x30,
    BALANCE = 0x31,
    ORIGIN = 0x32,
    CALLER = 0x33,
    CALLVALUE = 0x34,
    CALLDATALOAD = 0x35,
    CALLDATASIZE = 0x36,
    CALLDATACOPY = 0x37,
    CODESIZE = 0x38,
    CODECOPY = 0x39,
    GASPRICE = 0x3A,
    EXTCODESIZE = 0x3B,
    EXTCODECOPY = 0x3C,
    RETURNDATASIZE = 0x3D,
    RETURNDATACOPY = 0x3E,

    // Block Information
    BLOCKHASH = 0x40,
    COINBASE = 0x41,
    TIMESTAMP = 0x42,
    NUMBER = 0x43,
    DIFFICULTY = 0x44,
    GASLIMIT = 0x45,

    // Stack, Memory, Storage and Flow Operations
    POP = 0x50,
    MLOAD = 0x51,
    MSTORE = 0x52,
    MSTORE8 = 0x53,
    SLOAD = 0x54,
    SSTORE = 0x55,
    JUMP = 0x56,
    JUMPI = 0x57,
    PC = 0x58,
    MSIZE = 0x59,
    GAS = 0x5A,
    JUMPDEST = 0x5B,

    // Push Operations
    PUSH1 = 0x60,
    PUSH2 = 0x61,
    PUSH3 = 0x62,
    PUSH4 = 0x63,
    PUSH5 = 0x64,
    PUSH6 = 0x65,
    PUSH7 = 0x66,
    PUSH8 = 0x67,
    PUSH9 = 0x68,
    PUSH10 = 0x69,
    PUSH11 = 0x6A,
    PUSH12 = 0x6B,
    PUSH13 = 0x6C,
    PUSH14 = 0x6D,
    PUSH15 = 0x6E,
    PUSH16 = 0x6F,
    PUSH17 = 0x70,
    PUSH18 = 0x71,
    PUSH19 = 0x72,
    PUSH20 = 0x73,
    PUSH21 = 0x74,
    PUSH22 = 0x75,
    PUSH23 = 0x76,
    PUSH24 = 0x77,
    PUSH25 = 0x78,
    PUSH26 = 0x79,
    PUSH27 = 0x7A,
    PUSH28 = 0x7B,
    PUSH29 = 0x7C,
    PUSH30 = 0x7D,
    PUSH31 = 0x7E,
    PUSH32 = 0x7F,

    // Dup Operations
    DUP1 = 0x80,
    DUP2 = 0x81,
    DUP3 = 0x82,
    DUP4 = 0x83,
    DUP5 = 0x84,
    DUP6 = 0x85,
    DUP7 = 0x86,
    DUP8 = 0x87,
    DUP9 = 0x88,
    DUP10 = 0x89,
    DUP11 = 0x8A,
    DUP12 = 0x8B,
    DUP13 = 0x8C,
    DUP14 = 0x8D,
    DUP15 = 0x8E,
    DUP16 = 0x8F,

    // Swap Operations
    SWAP1 = 0x90,
    SWAP2 = 0x91,
    SWAP3 = 0x92,
    SWAP4 = 0x93,
    SWAP5 = 0x94,
    SWAP6 = 0x95,
    SWAP7 = 0x96,
    SWAP8 = 0x97,
    SWAP9 = 0x98,
    SWAP10 = 0x99,
    SWAP11 = 0x9A,
    SWAP12 = 0x9B,
    SWAP13 = 0x9C,
    SWAP14 = 0x9D,
    SWAP15 = 0x9E,
    SWAP16 = 0x9F,

    // Logging
    LOG0 = 0xA0,
    LOG1 = 0xA1,
    LOG2 = 0xA2,
    LOG3 = 0xA3,
    LOG4 = 0xA4,

    // System Operations
    CREATE = 0xF0,
    CALL = 0xF1,
    CALLCODE = 0xF2,
    RETURN = 0xF3,
    DELEGATECALL = 0xF4,
    REVERT = 0xFD,
    INVALID = 0xFE,
    SELFDESTRUCT = 0xFF,
}

impl Opcode {
    /// Try to convert from a byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00..=0x0B | 0x10..=0x1A | 0x20 | 0x30..=0x3E | 0x40..=0x45 | 0x50..=0x5B => {
                Some(unsafe { std::mem::transmute::<u8, Opcode>(byte) })
            }
            0x60..=0x7F | 0x80..=0x8F | 0x90..=0x9F | 0xA0..=0xA4 => {
                Some(unsafe { std::mem::transmute::<u8, Opcode>(byte) })
            }
            0xF0 => Some(Self::CREATE),
            0xF1 => Some(Self::CALL),
            0xF2 => Some(Self::CALLCODE),
            0xF3 => Some(Self::RETURN),
            0xF4 => Some(Self::DELEGATECALL),
            0xFD => Some(Self::REVERT),
            0xFE => Some(Self::INVALID),
            0xFF => Some(Self::SELFDESTRUCT),
            _ => None,
        }
    }

    /// PUSH operand size (1-32 for PUSH1-PUSH32, 0 otherwise)
    pub fn push_size(self) -> usize {
        let byte = self as u8;
        if (0x60..=0x7F).contains(&byte) {
            (byte - 0x5F) as usize
        } else {
            0
        }
    }

    /// Check if this is a PUSH opcode
    pub fn is_push(self) -> bool {
        let byte = self as u8;
        (0x60..=0x7F).contains(&byte)
    }

    /// DUP depth (1-16 for DUP1-DUP16, 0 otherwise)
    pub fn dup_depth(self) -> usize {
        let byte = self as u8;
        if (0x80..=0x8F).contains(&byte) {
            (byte - 0x7F) as usize
        } else {
            0
        }
    }

    /// SWAP depth (1-16 for SWAP1-SWAP16, 0 otherwise)
    pub fn swap_depth(self) -> usize {
        let byte = self as u8;
        if (0x90..=0x9F).contains(&byte) {
            (byte - 0x8F) as usize
        } else {
            0
        }
    }

    /// LOG topic count (0-4 for LOG0-LOG4, 0 otherwise)
    pub fn log_topics(self) -> usize {
        let byte = self as u8;
        if (0xA0..=0xA4).contains(&byte) {
            (byte - 0xA0) as usize
        } else {
            0
        }
    }

    /// Static stack arities, consulted before dispatch
    pub fn info(self) -> OpInfo {
        use Opcode::*;
        match self {
            STOP | JUMPDEST | INVALID => op(0, 0),
            ADD | MUL | SUB | DIV | SDIV | MOD | SMOD | EXP | SIGNEXTEND => op(2, 1),
            ADDMOD | MULMOD => op(3, 1),
            LT | GT | SLT | SGT | EQ | AND | OR | XOR | BYTE => op(2, 1),
            ISZERO | NOT => op(1, 1),
            SHA3 => op(2, 1),
            ADDRESS | ORIGIN | CALLER | CALLVALUE | CALLDATASIZE | CODESIZE | GASPRICE
            | RETURNDATASIZE => op(0, 1),
            BALANCE | CALLDATALOAD | EXTCODESIZE | BLOCKHASH => op(1, 1),
            CALLDATACOPY | CODECOPY | RETURNDATACOPY => op(3, 0),
            EXTCODECOPY => op(4, 0),
            COINBASE | TIMESTAMP | NUMBER | DIFFICULTY | GASLIMIT => op(0, 1),
            POP => op(1, 0),
            MLOAD | SLOAD => op(1, 1),
            MSTORE | MSTORE8 | SSTORE => op(2, 0),
            JUMP => op(1, 0),
            JUMPI => op(2, 0),
            PC | MSIZE | GAS => op(0, 1),
            CREATE => op(3, 1),
            CALL | CALLCODE => op(7, 1),
            DELEGATECALL => op(6, 1),
            RETURN | REVERT => op(2, 0),
            SELFDESTRUCT => op(1, 0),
            other => {
                if other.is_push() {
                    op(0, 1)
                } else if other.dup_depth() > 0 {
                    op(other.dup_depth(), other.dup_depth() + 1)
                } else if other.swap_depth() > 0 {
                    op(other.swap_depth() + 1, other.swap_depth() + 1)
                } else {
                    // LOGk: offset, size, then k topics
                    op(other.log_topics() + 2, 0)
                }
            }
        }
    }
}
