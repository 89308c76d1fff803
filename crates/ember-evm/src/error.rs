//! Interpreter error types

use thiserror::Error;

/// Frame-level execution errors. Every variant aborts the current frame
/// only; the CREATE/CALL family converts a child's failure into a zero
/// pushed on the parent stack rather than propagating it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvmError {
    /// Out of gas
    #[error("out of gas")]
    OutOfGas,

    /// Stack underflow
    #[error("stack underflow")]
    StackUnderflow,

    /// Stack overflow
    #[error("stack overflow (max 1024)")]
    StackOverflow,

    /// Invalid jump destination
    #[error("invalid jump destination: {0}")]
    InvalidJump(usize),

    /// Unknown or explicitly invalid opcode
    #[error("invalid opcode: 0x{0:02x}")]
    InvalidOpcode(u8),

    /// Memory offset or size out of addressable range
    #[error("invalid memory access")]
    InvalidMemoryAccess,

    /// Write attempted in a static context
    #[error("state modification in static context")]
    StaticCallViolation,

    /// RETURNDATACOPY past the end of the return buffer
    #[error("return data out of bounds")]
    ReturnDataOutOfBounds,

    /// Call depth exceeded
    #[error("call depth exceeded (max 1024)")]
    CallDepthExceeded,

    /// Insufficient balance for a value transfer
    #[error("insufficient balance")]
    InsufficientBalance,

    /// Explicit REVERT: state rolls back, output is preserved
    #[error("execution reverted")]
    Revert(Vec<u8>),
}

/// Result type for interpreter operations
pub type EvmResult<T> = Result<T, EvmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(format!("{}", EvmError::OutOfGas), "out of gas");
        assert_eq!(format!("{}", EvmError::StackUnderflow), "stack underflow");
        assert_eq!(
            format!("{}", EvmError::StackOverflow),
            "stack overflow (max 1024)"
        );
        assert_eq!(
            format!("{}", EvmError::InvalidJump(100)),
            "invalid jump destination: 100"
        );
        assert_eq!(
            format!("{}", EvmError::InvalidOpcode(0xFE)),
            "invalid opcode: 0xfe"
        );
        assert_eq!(
            format!("{}", EvmError::StaticCallViolation),
            "state modification in static context"
        );
    }

    #[test]
    fn test_error_equality() {
        assert_eq!(EvmError::OutOfGas, EvmError::OutOfGas);
        assert_ne!(EvmError::OutOfGas, EvmError::StackUnderflow);
        assert_eq!(EvmError::InvalidJump(10), EvmError::InvalidJump(10));
        assert_ne!(
            EvmError::Revert(vec![1]),
            EvmError::Revert(vec![2])
        );
    }
}
