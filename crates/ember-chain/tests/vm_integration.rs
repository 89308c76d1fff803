//! The chain as the VM's BLOCKHASH collaborator.

use bytes::Bytes;
use ember_chain::{calculate_difficulty, Blockchain, ChainConfig, MemoryStore};
use ember_evm::{BlockContext, CallContext, Environment, Vm};
use ember_primitives::{Address, U256};
use ember_state::MemoryState;
use ember_types::{Block, Header};
use std::sync::Arc;

fn child_of(parent: &Header, delta: u64) -> Block {
    let mut header = parent.clone();
    header.parent_hash = parent.hash();
    header.number = parent.number + 1;
    header.timestamp = parent.timestamp + delta;
    header.difficulty = calculate_difficulty(&header, parent, &ChainConfig::default());
    Block::new(header, vec![], vec![])
}

#[test]
fn blockhash_opcode_reads_chain_history() {
    let genesis = Block::new(
        Header::genesis(U256::from(131_072u64), 5_000_000),
        vec![],
        vec![],
    );
    let chain = Blockchain::new(
        Arc::new(MemoryStore::new()),
        genesis.clone(),
        ChainConfig::default(),
    )
    .unwrap();

    let block1 = child_of(&genesis.header, 10);
    let block2 = child_of(&block1.header, 10);
    chain
        .insert_blocks(&[block1.clone(), block2.clone()])
        .unwrap();

    // Executing "inside block 3": BLOCKHASH(1) must resolve block1
    let env = Environment {
        block: BlockContext {
            number: 3,
            timestamp: block2.header.timestamp + 10,
            gas_limit: 5_000_000,
            coinbase: Address::ZERO,
            difficulty: block2.header.difficulty,
        },
        ..Default::default()
    };

    let mut state = MemoryState::new();
    let mut vm = Vm::with_block_hashes(&mut state, env, &chain);
    let ctx = CallContext {
        // PUSH1 1, BLOCKHASH, MSTORE(0), RETURN(0, 32)
        code: Bytes::from_static(&[
            0x60, 0x01, 0x40, 0x60, 0x00, 0x52, 0x60, 0x20, 0x60, 0x00, 0xF3,
        ]),
        ..Default::default()
    };
    let result = vm.call(ctx, 1_000_000);

    assert!(result.success);
    assert_eq!(
        U256::from_big_endian(&result.output),
        U256::from(block1.hash())
    );
}
