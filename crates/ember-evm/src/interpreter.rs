//! Bytecode interpreter
//!
//! Frames live on an explicit heap-allocated stack rather than the Rust
//! call stack; a child frame runs to completion before its parent
//! resumes, and its tentative state mutations are committed or discarded
//! through the state's snapshot tokens.

use crate::arith;
use crate::context::{CallContext, Environment};
use crate::error::{EvmError, EvmResult};
use crate::frame::{CallScheme, Frame, LogEntry, Resume};
use crate::gas::{self, cost};
use crate::memory::Memory;
use crate::opcode::Opcode;
use crate::stack::STACK_LIMIT;
use bytes::Bytes;
use ember_crypto::keccak256;
use ember_primitives::{Address, H256, U256};
use ember_state::State;
use rlp::RlpStream;
use std::collections::HashSet;

/// Resolver for the BLOCKHASH opcode. The chain implements this by
/// walking parent-hash links; tests use a map.
pub trait BlockHashProvider {
    /// Hash of the block at `number`, or zero if unknown
    fn block_hash(&self, number: u64) -> H256;
}

/// Provider that knows no hashes; every lookup yields zero.
pub struct NoBlockHashes;

impl BlockHashProvider for NoBlockHashes {
    fn block_hash(&self, _number: u64) -> H256 {
        H256::ZERO
    }
}

static NO_BLOCK_HASHES: NoBlockHashes = NoBlockHashes;

/// Outcome of a top-level invocation.
#[derive(Clone, Debug)]
pub struct ExecutionResult {
    /// Whether the invocation completed without fault or revert
    pub success: bool,
    /// Gas consumed
    pub gas_used: u64,
    /// RETURN output (or REVERT payload)
    pub output: Vec<u8>,
    /// Logs emitted by committed frames
    pub logs: Vec<LogEntry>,
    /// Addresses entitled to gas refunds
    pub refunds: HashSet<Address>,
    /// Contracts scheduled for removal; already removed from state on
    /// success
    pub suicides: HashSet<Address>,
}

/// What a single step asks the frame loop to do next.
enum Action {
    /// Keep stepping the same frame
    Continue,
    /// Run a child frame to completion, then resume this one
    Spawn(Box<Frame>),
    /// The frame halted successfully (STOP, RETURN, SELFDESTRUCT,
    /// code end)
    Halt,
}

/// How a frame ended.
enum Outcome {
    Success,
    Revert(Vec<u8>),
    Fault,
}

/// The virtual machine: an environment, a world state and a frame stack.
pub struct Vm<'a> {
    state: &'a mut dyn State,
    env: Environment,
    hashes: &'a dyn BlockHashProvider,
    frames: Vec<Frame>,
}

impl<'a> Vm<'a> {
    /// Create a VM without block-hash lookup (BLOCKHASH pushes zero)
    pub fn new(state: &'a mut dyn State, env: Environment) -> Self {
        Self::with_block_hashes(state, env, &NO_BLOCK_HASHES)
    }

    /// Create a VM with a BLOCKHASH resolver
    pub fn with_block_hashes(
        state: &'a mut dyn State,
        env: Environment,
        hashes: &'a dyn BlockHashProvider,
    ) -> Self {
        Self {
            state,
            env,
            hashes,
            frames: Vec::new(),
        }
    }

    /// Run `ctx` to completion with `gas` available and return the
    /// outcome. On success the self-destruct set has been applied to the
    /// state; on failure every state effect is rolled back.
    pub fn call(&mut self, ctx: CallContext, gas: u64) -> ExecutionResult {
        let snapshot = self.state.snapshot();
        self.frames.push(Frame::new(ctx, gas, snapshot));

        loop {
            let depth = self.frames.len();
            let state = &mut *self.state;
            let frame = match self.frames.last_mut() {
                Some(frame) => frame,
                None => unreachable!("frame stack is non-empty until the root completes"),
            };

            let stepped = step(frame, state, &self.env, self.hashes, depth);
            let finished = match stepped {
                Ok(Action::Continue) => None,
                Ok(Action::Spawn(child)) => {
                    self.frames.push(*child);
                    None
                }
                Ok(Action::Halt) => self.finish(Outcome::Success, gas),
                Err(EvmError::Revert(data)) => self.finish(Outcome::Revert(data), gas),
                Err(_) => self.finish(Outcome::Fault, gas),
            };
            if let Some(result) = finished {
                return result;
            }
        }
    }

    /// Pop the completed frame and either merge it into its parent or
    /// produce the final result.
    fn finish(&mut self, outcome: Outcome, initial_gas: u64) -> Option<ExecutionResult> {
        let mut child = self.frames.pop()?;
        let success = matches!(outcome, Outcome::Success);

        if success {
            self.state.commit(child.snapshot);
        } else {
            self.state.revert(child.snapshot);
        }
        match outcome {
            Outcome::Success => {}
            Outcome::Revert(data) => child.output = data,
            Outcome::Fault => {
                child.gas = 0;
                child.output.clear();
            }
        }

        let parent = match self.frames.last_mut() {
            Some(parent) => parent,
            None => {
                if success {
                    for address in &child.suicides {
                        self.state.remove_account(address);
                    }
                }
                return Some(ExecutionResult {
                    success,
                    gas_used: initial_gas - child.gas,
                    output: child.output,
                    logs: if success { child.logs } else { Vec::new() },
                    refunds: if success { child.refunds } else { HashSet::new() },
                    suicides: if success { child.suicides } else { HashSet::new() },
                });
            }
        };

        // Unused child gas flows back; a faulted child has none left.
        parent.gas += child.gas;
        parent.return_data = child.output.clone();

        if let Some(resume) = child.resume.take() {
            let pushed = match resume.scheme {
                CallScheme::Create => {
                    let mut created_word = U256::zero();
                    if success {
                        if let Some(created) = resume.created {
                            // Code deposit; an unpayable deposit leaves the
                            // account with empty code (the create still
                            // succeeds).
                            let deposit =
                                cost::CREATE_DATA.saturating_mul(child.output.len() as u64);
                            if parent.gas >= deposit {
                                parent.gas -= deposit;
                                self.state
                                    .set_code(&created, Bytes::from(child.output.clone()));
                            }
                            created_word = created.into_word();
                        }
                    }
                    created_word
                }
                _ => {
                    let n = child.output.len().min(resume.out_size);
                    if n > 0 {
                        parent.memory.store(resume.out_offset, n, &child.output[..n]);
                    }
                    if success {
                        U256::one()
                    } else {
                        U256::zero()
                    }
                }
            };
            // The arity check reserved the output slot when the call
            // opcode dispatched.
            let push = parent.stack.push(pushed);
            debug_assert!(push.is_ok());
        }

        if success {
            parent.logs.append(&mut child.logs);
            parent.refunds.extend(child.refunds.iter().copied());
            parent.suicides.extend(child.suicides.iter().copied());
        }
        None
    }
}

/// Execute one instruction of `frame`: fetch, arity-check, charge static
/// gas, dispatch, then settle the program counter (pending jumps are
/// validated here, not in the handlers).
fn step(
    frame: &mut Frame,
    state: &mut dyn State,
    env: &Environment,
    hashes: &dyn BlockHashProvider,
    depth: usize,
) -> EvmResult<Action> {
    if frame.pc >= frame.ctx.code.len() {
        return Ok(Action::Halt);
    }

    let byte = frame.ctx.code[frame.pc];
    let op = Opcode::from_byte(byte).ok_or(EvmError::InvalidOpcode(byte))?;
    let info = op.info();
    if frame.stack.len() < info.inputs {
        return Err(EvmError::StackUnderflow);
    }
    if frame.stack.len() - info.inputs + info.outputs > STACK_LIMIT {
        return Err(EvmError::StackOverflow);
    }
    frame.use_gas(gas::static_gas(op))?;

    let action = exec(frame, op, state, env, hashes, depth)?;

    match &action {
        Action::Continue => {
            if let Some(dest) = frame.pending_jump.take() {
                if !frame.is_valid_jump(dest) {
                    return Err(EvmError::InvalidJump(dest));
                }
                frame.pc = dest;
            } else {
                frame.pc += 1 + op.push_size();
            }
        }
        // The parent resumes at the instruction after the call.
        Action::Spawn(_) => frame.pc += 1,
        Action::Halt => {}
    }
    Ok(action)
}

/// Dispatch a single opcode against the frame and world state.
fn exec(
    frame: &mut Frame,
    op: Opcode,
    state: &mut dyn State,
    env: &Environment,
    hashes: &dyn BlockHashProvider,
    depth: usize,
) -> EvmResult<Action> {
    match op {
        Opcode::STOP => return Ok(Action::Halt),

        // Arithmetic
        Opcode::ADD => {
            let (a, b) = frame.stack.pop2()?;
            frame.stack.push(arith::add(a, b))?;
        }
        Opcode::MUL => {
            let (a, b) = frame.stack.pop2()?;
            frame.stack.push(arith::mul(a, b))?;
        }
        Opcode::SUB => {
            let (a, b) = frame.stack.pop2()?;
            frame.stack.push(arith::sub(a, b))?;
        }
        Opcode::DIV => {
            let (a, b) = frame.stack.pop2()?;
            frame.stack.push(arith::div(a, b))?;
        }
        Opcode::SDIV => {
            let (a, b) = frame.stack.pop2()?;
            frame.stack.push(arith::sdiv(a, b))?;
        }
        Opcode::MOD => {
            let (a, b) = frame.stack.pop2()?;
            frame.stack.push(arith::rem(a, b))?;
        }
        Opcode::SMOD => {
            let (a, b) = frame.stack.pop2()?;
            frame.stack.push(arith::srem(a, b))?;
        }
        Opcode::ADDMOD => {
            let (a, b, m) = frame.stack.pop3()?;
            frame.stack.push(arith::addmod(a, b, m))?;
        }
        Opcode::MULMOD => {
            let (a, b, m) = frame.stack.pop3()?;
            frame.stack.push(arith::mulmod(a, b, m))?;
        }
        Opcode::EXP => {
            let (base, exponent) = frame.stack.pop2()?;
            frame.use_gas(gas::exp_gas(exponent))?;
            frame.stack.push(arith::exp(base, exponent))?;
        }
        Opcode::SIGNEXTEND => {
            let (bits, value) = frame.stack.pop2()?;
            frame.stack.push(arith::signextend(bits, value))?;
        }

        // Comparison and bitwise
        Opcode::LT => {
            let (a, b) = frame.stack.pop2()?;
            frame.stack.push(bool_word(a < b))?;
        }
        Opcode::GT => {
            let (a, b) = frame.stack.pop2()?;
            frame.stack.push(bool_word(a > b))?;
        }
        Opcode::SLT => {
            let (a, b) = frame.stack.pop2()?;
            frame.stack.push(bool_word(arith::slt(a, b)))?;
        }
        Opcode::SGT => {
            let (a, b) = frame.stack.pop2()?;
            frame.stack.push(bool_word(arith::sgt(a, b)))?;
        }
        Opcode::EQ => {
            let (a, b) = frame.stack.pop2()?;
            frame.stack.push(bool_word(a == b))?;
        }
        Opcode::ISZERO => {
            let a = frame.stack.pop()?;
            frame.stack.push(bool_word(a.is_zero()))?;
        }
        Opcode::AND => {
            let (a, b) = frame.stack.pop2()?;
            frame.stack.push(a & b)?;
        }
        Opcode::OR => {
            let (a, b) = frame.stack.pop2()?;
            frame.stack.push(a | b)?;
        }
        Opcode::XOR => {
            let (a, b) = frame.stack.pop2()?;
            frame.stack.push(a ^ b)?;
        }
        Opcode::NOT => {
            let a = frame.stack.pop()?;
            frame.stack.push(!a)?;
        }
        Opcode::BYTE => {
            let (pos, value) = frame.stack.pop2()?;
            frame.stack.push(arith::byte(pos, value))?;
        }

        Opcode::SHA3 => {
            let (offset, size) = frame.stack.pop2()?;
            let (offset, size) = mem_span(frame, offset, size)?;
            frame.use_gas(gas::sha3_gas(size))?;
            let data = frame.memory.fetch(offset, size);
            frame.stack.push(U256::from(keccak256(&data)))?;
        }

        // Environment
        Opcode::ADDRESS => frame.stack.push(frame.ctx.address.into_word())?,
        Opcode::BALANCE => {
            let address = Address::from_word(frame.stack.pop()?);
            frame.stack.push(state.balance(&address))?;
        }
        Opcode::ORIGIN => frame.stack.push(env.tx.origin.into_word())?,
        Opcode::CALLER => frame.stack.push(frame.ctx.caller.into_word())?,
        Opcode::CALLVALUE => frame.stack.push(frame.ctx.value)?,
        Opcode::CALLDATALOAD => {
            let offset = frame.stack.pop()?;
            let mut buf = [0u8; 32];
            if offset <= U256::from(usize::MAX as u64) {
                let offset = offset.low_u64() as usize;
                for (i, slot) in buf.iter_mut().enumerate() {
                    if let Some(index) = offset.checked_add(i) {
                        if index < frame.ctx.input.len() {
                            *slot = frame.ctx.input[index];
                        }
                    }
                }
            }
            frame.stack.push(U256::from_big_endian(&buf))?;
        }
        Opcode::CALLDATASIZE => frame.stack.push(U256::from(frame.ctx.input.len()))?,
        Opcode::CALLDATACOPY => {
            let (dest, src, size) = frame.stack.pop3()?;
            let (dest, size) = mem_span(frame, dest, size)?;
            frame.use_gas(gas::copy_gas(size))?;
            let data = copy_padded(&frame.ctx.input, src, size);
            frame.memory.store(dest, size, &data);
        }
        Opcode::CODESIZE => frame.stack.push(U256::from(frame.ctx.code.len()))?,
        Opcode::CODECOPY => {
            let (dest, src, size) = frame.stack.pop3()?;
            let (dest, size) = mem_span(frame, dest, size)?;
            frame.use_gas(gas::copy_gas(size))?;
            let data = copy_padded(&frame.ctx.code, src, size);
            frame.memory.store(dest, size, &data);
        }
        Opcode::GASPRICE => frame.stack.push(env.tx.gas_price)?,
        Opcode::EXTCODESIZE => {
            let address = Address::from_word(frame.stack.pop()?);
            frame.stack.push(U256::from(state.code(&address).len()))?;
        }
        Opcode::EXTCODECOPY => {
            let address = Address::from_word(frame.stack.pop()?);
            let (dest, src, size) = frame.stack.pop3()?;
            let (dest, size) = mem_span(frame, dest, size)?;
            frame.use_gas(gas::copy_gas(size))?;
            let code = state.code(&address);
            let data = copy_padded(&code, src, size);
            frame.memory.store(dest, size, &data);
        }
        Opcode::RETURNDATASIZE => frame.stack.push(U256::from(frame.return_data.len()))?,
        Opcode::RETURNDATACOPY => {
            let (dest, src, size) = frame.stack.pop3()?;
            let (dest, size) = mem_span(frame, dest, size)?;
            frame.use_gas(gas::copy_gas(size))?;
            let src = to_usize(src).map_err(|_| EvmError::ReturnDataOutOfBounds)?;
            let end = src
                .checked_add(size)
                .ok_or(EvmError::ReturnDataOutOfBounds)?;
            if end > frame.return_data.len() {
                return Err(EvmError::ReturnDataOutOfBounds);
            }
            let data = frame.return_data[src..end].to_vec();
            frame.memory.store(dest, size, &data);
        }

        // Block information
        Opcode::BLOCKHASH => {
            let requested = frame.stack.pop()?;
            let current = env.block.number;
            let hash = if requested >= U256::from(current)
                || requested + U256::from(256u64) < U256::from(current)
            {
                H256::ZERO
            } else {
                hashes.block_hash(requested.low_u64())
            };
            frame.stack.push(U256::from(hash))?;
        }
        Opcode::COINBASE => frame.stack.push(env.block.coinbase.into_word())?,
        Opcode::TIMESTAMP => frame.stack.push(U256::from(env.block.timestamp))?,
        Opcode::NUMBER => frame.stack.push(U256::from(env.block.number))?,
        Opcode::DIFFICULTY => frame.stack.push(env.block.difficulty)?,
        Opcode::GASLIMIT => frame.stack.push(U256::from(env.block.gas_limit))?,

        // Stack, memory, storage, flow
        Opcode::POP => {
            frame.stack.pop()?;
        }
        Opcode::MLOAD => {
            let offset = frame.stack.pop()?;
            let (offset, _) = mem_span(frame, offset, U256::from(32u64))?;
            let value = frame.memory.load_word(offset);
            frame.stack.push(value)?;
        }
        Opcode::MSTORE => {
            let (offset, value) = frame.stack.pop2()?;
            let (offset, _) = mem_span(frame, offset, U256::from(32u64))?;
            frame.memory.store_word(offset, value);
        }
        Opcode::MSTORE8 => {
            let (offset, value) = frame.stack.pop2()?;
            let (offset, _) = mem_span(frame, offset, U256::one())?;
            frame.memory.store_byte(offset, value.byte(0));
        }
        Opcode::SLOAD => {
            let key = frame.stack.pop()?;
            frame
                .stack
                .push(state.get_storage(&frame.ctx.address, &key))?;
        }
        Opcode::SSTORE => {
            if frame.ctx.is_static {
                return Err(EvmError::StaticCallViolation);
            }
            let (key, value) = frame.stack.pop2()?;
            let current = state.get_storage(&frame.ctx.address, &key);
            frame.use_gas(gas::sstore_gas(current, value))?;
            state.set_storage(&frame.ctx.address, key, value);
        }
        Opcode::JUMP => {
            let dest = frame.stack.pop()?;
            frame.pending_jump = Some(to_usize(dest).map_err(|_| EvmError::InvalidJump(usize::MAX))?);
        }
        Opcode::JUMPI => {
            let (dest, condition) = frame.stack.pop2()?;
            if !condition.is_zero() {
                frame.pending_jump =
                    Some(to_usize(dest).map_err(|_| EvmError::InvalidJump(usize::MAX))?);
            }
        }
        Opcode::PC => frame.stack.push(U256::from(frame.pc))?,
        Opcode::MSIZE => frame.stack.push(U256::from(frame.memory.len()))?,
        Opcode::GAS => frame.stack.push(U256::from(frame.gas))?,
        Opcode::JUMPDEST => {}

        // Logging
        Opcode::LOG0 | Opcode::LOG1 | Opcode::LOG2 | Opcode::LOG3 | Opcode::LOG4 => {
            if frame.ctx.is_static {
                return Err(EvmError::StaticCallViolation);
            }
            let (offset, size) = frame.stack.pop2()?;
            let (offset, size) = mem_span(frame, offset, size)?;
            let count = op.log_topics();
            frame.use_gas(gas::log_gas(count, size))?;
            let topics = frame
                .stack
                .pop_list(count)?
                .into_iter()
                .map(H256::from)
                .collect();
            let data = frame.memory.fetch(offset, size);
            frame.logs.push(LogEntry {
                address: frame.ctx.address,
                topics,
                data,
            });
        }

        // System
        Opcode::CREATE => return do_create(frame, state, depth),
        Opcode::CALL => return do_call(frame, CallScheme::Call, state, depth),
        Opcode::CALLCODE => return do_call(frame, CallScheme::CallCode, state, depth),
        Opcode::DELEGATECALL => return do_call(frame, CallScheme::DelegateCall, state, depth),
        Opcode::RETURN => {
            let (offset, size) = frame.stack.pop2()?;
            let (offset, size) = mem_span(frame, offset, size)?;
            frame.output = frame.memory.fetch(offset, size);
            return Ok(Action::Halt);
        }
        Opcode::REVERT => {
            let (offset, size) = frame.stack.pop2()?;
            let (offset, size) = mem_span(frame, offset, size)?;
            return Err(EvmError::Revert(frame.memory.fetch(offset, size)));
        }
        Opcode::INVALID => return Err(EvmError::InvalidOpcode(Opcode::INVALID as u8)),
        Opcode::SELFDESTRUCT => {
            if frame.ctx.is_static {
                return Err(EvmError::StaticCallViolation);
            }
            let beneficiary = Address::from_word(frame.stack.pop()?);
            let balance = state.balance(&frame.ctx.address);
            state.add_balance(&beneficiary, balance);
            state.set_balance(&frame.ctx.address, U256::zero());
            frame.suicides.insert(frame.ctx.address);
            frame.refunds.insert(beneficiary);
            return Ok(Action::Halt);
        }

        other => {
            if other.is_push() {
                let size = other.push_size();
                let mut buf = [0u8; 32];
                for i in 0..size {
                    let index = frame.pc + 1 + i;
                    // Reads past code end are zero-padded
                    if index < frame.ctx.code.len() {
                        buf[32 - size + i] = frame.ctx.code[index];
                    }
                }
                frame.stack.push(U256::from_big_endian(&buf))?;
            } else if other.dup_depth() > 0 {
                frame.stack.dup(other.dup_depth())?;
            } else if other.swap_depth() > 0 {
                frame.stack.swap(other.swap_depth())?;
            } else {
                return Err(EvmError::InvalidOpcode(other as u8));
            }
        }
    }

    Ok(Action::Continue)
}

/// CREATE: run the init code in a child frame; its output becomes the new
/// account's code.
fn do_create(frame: &mut Frame, state: &mut dyn State, depth: usize) -> EvmResult<Action> {
    if frame.ctx.is_static {
        return Err(EvmError::StaticCallViolation);
    }
    let (value, offset, size) = frame.stack.pop3()?;
    let (offset, size) = mem_span(frame, offset, size)?;
    let init_code = frame.memory.fetch(offset, size);

    if depth >= cost::MAX_CALL_DEPTH || state.balance(&frame.ctx.address) < value {
        frame.stack.push(U256::zero())?;
        frame.return_data.clear();
        return Ok(Action::Continue);
    }

    let nonce = state.nonce(&frame.ctx.address);
    let created = create_address(&frame.ctx.address, nonce);
    // The nonce bump survives even if the init code fails.
    state.increment_nonce(&frame.ctx.address);

    let snapshot = state.snapshot();
    state.sub_balance(&frame.ctx.address, value);
    state.add_balance(&created, value);

    // The init code gets everything the parent has left.
    let child_gas = frame.gas;
    frame.gas = 0;

    let ctx = CallContext {
        address: created,
        caller: frame.ctx.address,
        value,
        input: Bytes::new(),
        code: Bytes::from(init_code),
        is_static: false,
    };
    let mut child = Frame::new(ctx, child_gas, snapshot);
    child.resume = Some(Resume {
        scheme: CallScheme::Create,
        out_offset: 0,
        out_size: 0,
        created: Some(created),
    });
    Ok(Action::Spawn(Box::new(child)))
}

/// CALL / CALLCODE / DELEGATECALL: run foreign code in a child frame and
/// report its success as a word on the parent stack.
fn do_call(
    frame: &mut Frame,
    scheme: CallScheme,
    state: &mut dyn State,
    depth: usize,
) -> EvmResult<Action> {
    let gas_word = frame.stack.pop()?;
    let to = Address::from_word(frame.stack.pop()?);
    let value = match scheme {
        CallScheme::Call | CallScheme::CallCode => frame.stack.pop()?,
        _ => U256::zero(),
    };
    let (in_offset, in_size) = frame.stack.pop2()?;
    let (out_offset, out_size) = frame.stack.pop2()?;

    if frame.ctx.is_static && scheme == CallScheme::Call && !value.is_zero() {
        return Err(EvmError::StaticCallViolation);
    }

    let (in_offset, in_size) = mem_span(frame, in_offset, in_size)?;
    let (out_offset, out_size) = mem_span(frame, out_offset, out_size)?;

    let has_value = !value.is_zero() && matches!(scheme, CallScheme::Call | CallScheme::CallCode);
    if has_value {
        frame.use_gas(cost::CALL_VALUE)?;
    }

    let requested = if gas_word > U256::from(u64::MAX) {
        u64::MAX
    } else {
        gas_word.low_u64()
    };
    let mut child_gas = requested.min(frame.gas);
    frame.gas -= child_gas;
    if has_value {
        child_gas += cost::CALL_STIPEND;
    }

    let transfers = scheme == CallScheme::Call && !value.is_zero();
    if depth >= cost::MAX_CALL_DEPTH
        || (has_value && state.balance(&frame.ctx.address) < value)
    {
        frame.gas += child_gas;
        frame.stack.push(U256::zero())?;
        frame.return_data.clear();
        return Ok(Action::Continue);
    }

    let input = frame.memory.fetch(in_offset, in_size);
    let snapshot = state.snapshot();
    if transfers {
        state.sub_balance(&frame.ctx.address, value);
        state.add_balance(&to, value);
    }

    let (address, caller, child_value) = match scheme {
        CallScheme::Call => (to, frame.ctx.address, value),
        CallScheme::CallCode => (frame.ctx.address, frame.ctx.address, value),
        CallScheme::DelegateCall => (frame.ctx.address, frame.ctx.caller, frame.ctx.value),
        CallScheme::Create => unreachable!("create goes through do_create"),
    };

    let ctx = CallContext {
        address,
        caller,
        value: child_value,
        input: Bytes::from(input),
        code: state.code(&to),
        is_static: frame.ctx.is_static,
    };
    let mut child = Frame::new(ctx, child_gas, snapshot);
    child.resume = Some(Resume {
        scheme,
        out_offset,
        out_size,
        created: None,
    });
    Ok(Action::Spawn(Box::new(child)))
}

/// The address of a contract created by `creator` at `nonce`:
/// the low 20 bytes of keccak256(rlp([creator, nonce])).
pub fn create_address(creator: &Address, nonce: U256) -> Address {
    let mut stream = RlpStream::new_list(2);
    stream.append(creator);
    stream.append(&nonce);
    let hash = keccak256(&stream.out());
    Address::from_word(U256::from(hash))
}

/// Convert offsets and sizes to host width; anything wider faults.
fn to_usize(word: U256) -> EvmResult<usize> {
    if word > U256::from(usize::MAX as u64) {
        return Err(EvmError::InvalidMemoryAccess);
    }
    Ok(word.low_u64() as usize)
}

/// Charge memory expansion for the span and grow the frame's memory.
/// A zero size neither charges nor grows.
fn mem_span(frame: &mut Frame, offset: U256, size: U256) -> EvmResult<(usize, usize)> {
    let size = to_usize(size)?;
    if size == 0 {
        return Ok((0, 0));
    }
    let offset = to_usize(offset)?;
    let required = Memory::required_len(offset, size);
    frame.use_gas(gas::memory_expansion(frame.memory.len(), required))?;
    frame.memory.extend(offset, size);
    Ok((offset, size))
}

/// Copy `size` bytes of `source` starting at `offset`, zero-padding past
/// the end.
fn copy_padded(source: &[u8], offset: U256, size: usize) -> Vec<u8> {
    let mut out = vec![0u8; size];
    if offset <= U256::from(usize::MAX as u64) {
        let offset = offset.low_u64() as usize;
        if offset < source.len() {
            let n = (source.len() - offset).min(size);
            out[..n].copy_from_slice(&source[offset..offset + n]);
        }
    }
    out
}

fn bool_word(value: bool) -> U256 {
    if value {
        U256::one()
    } else {
        U256::zero()
    }
}
