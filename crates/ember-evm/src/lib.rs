//! # ember-evm
//!
//! Stack-based bytecode interpreter for the Ember node kernel.
//!
//! The virtual machine deterministically interprets contract bytecode
//! against a mutable world state: a 1024-deep operand stack of 256-bit
//! words, word-aligned zero-filled memory, per-account storage, and an
//! explicit frame stack for the CREATE/CALL family with
//! snapshot-and-rollback state semantics.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod arith;
mod context;
mod error;
mod frame;
pub mod gas;
mod interpreter;
mod memory;
mod opcode;
mod stack;

pub use context::{BlockContext, CallContext, Environment, TxContext};
pub use error::{EvmError, EvmResult};
pub use frame::{CallScheme, Frame, LogEntry};
pub use interpreter::{
    create_address, BlockHashProvider, ExecutionResult, NoBlockHashes, Vm,
};
pub use memory::Memory;
pub use opcode::{OpInfo, Opcode};
pub use stack::{Stack, STACK_LIMIT};
