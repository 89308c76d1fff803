//! Call frame

use crate::context::CallContext;
use crate::error::{EvmError, EvmResult};
use crate::memory::Memory;
use crate::stack::Stack;
use ember_primitives::{Address, H256};
use ember_state::Snapshot;
use std::collections::HashSet;

/// A log record emitted by the LOG opcodes
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LogEntry {
    /// Emitting contract
    pub address: Address,
    /// Indexed topics (0-4)
    pub topics: Vec<H256>,
    /// Opaque payload
    pub data: Vec<u8>,
}

/// How a child frame was entered; decides how its completion is merged
/// into the parent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CallScheme {
    /// Plain CALL: callee runs in its own storage context
    Call,
    /// CALLCODE: foreign code runs in the caller's storage context
    CallCode,
    /// DELEGATECALL: like CALLCODE but sender and value pass through
    DelegateCall,
    /// CREATE: init code whose output becomes the new account's code
    Create,
}

/// Where a completed child's results land in the parent.
#[derive(Clone, Debug)]
pub(crate) struct Resume {
    pub scheme: CallScheme,
    pub out_offset: usize,
    pub out_size: usize,
    pub created: Option<Address>,
}

/// The execution record of a single call or creation invocation.
///
/// Side effects (logs, refund set, self-destruct set) accumulate locally
/// and merge into the parent only when the frame completes successfully.
#[derive(Clone, Debug)]
pub struct Frame {
    /// Instruction descriptor
    pub ctx: CallContext,
    /// Program counter
    pub pc: usize,
    /// Remaining gas
    pub gas: u64,
    /// Operand stack
    pub stack: Stack,
    /// Byte memory
    pub memory: Memory,
    /// Return buffer from the most recent child call
    pub return_data: Vec<u8>,
    /// Output produced by RETURN (or carried by REVERT)
    pub output: Vec<u8>,
    /// Jump target set by JUMP/JUMPI, validated by the interpreter
    pub pending_jump: Option<usize>,
    /// Logs emitted by this frame and its committed children
    pub logs: Vec<LogEntry>,
    /// Addresses entitled to gas refunds
    pub refunds: HashSet<Address>,
    /// Contracts scheduled for removal at transaction end
    pub suicides: HashSet<Address>,
    pub(crate) snapshot: Snapshot,
    pub(crate) resume: Option<Resume>,
    jumpdests: HashSet<usize>,
}

impl Frame {
    /// Create a frame over `ctx.code` with `gas` available. `snapshot` is
    /// the state mark to roll back to if the frame fails.
    pub fn new(ctx: CallContext, gas: u64, snapshot: Snapshot) -> Self {
        let jumpdests = analyze_jump_dests(&ctx.code);
        Self {
            ctx,
            pc: 0,
            gas,
            stack: Stack::new(),
            memory: Memory::new(),
            return_data: Vec::new(),
            output: Vec::new(),
            pending_jump: None,
            logs: Vec::new(),
            refunds: HashSet::new(),
            suicides: HashSet::new(),
            snapshot,
            resume: None,
            jumpdests,
        }
    }

    /// Whether `dest` is a JUMPDEST outside of PUSH immediate data
    pub fn is_valid_jump(&self, dest: usize) -> bool {
        self.jumpdests.contains(&dest)
    }

    /// Deduct gas, failing the frame when it runs dry
    pub fn use_gas(&mut self, amount: u64) -> EvmResult<()> {
        if self.gas < amount {
            return Err(EvmError::OutOfGas);
        }
        self.gas -= amount;
        Ok(())
    }
}

/// Scan code for JUMPDEST bytes, skipping PUSH immediates so a 0x5b
/// inside push data is not a valid target.
fn analyze_jump_dests(code: &[u8]) -> HashSet<usize> {
    let mut dests = HashSet::new();
    let mut i = 0;

    while i < code.len() {
        let opcode = code[i];
        if opcode == 0x5B {
            dests.insert(i);
        }
        if (0x60..=0x7F).contains(&opcode) {
            i += (opcode - 0x5F) as usize;
        }
        i += 1;
    }

    dests
}
