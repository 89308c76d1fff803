//! Blockchain facade: block-by-hash storage over the header chain.

use crate::error::ChainResult;
use crate::header_chain::{keys, ChainConfig, HeaderChain};
use crate::store::{Store, WriteBatch};
use ember_evm::BlockHashProvider;
use ember_primitives::{H256, U256};
use ember_types::{Block, Header};
use std::sync::Arc;
use tracing::{debug, info};

/// Stores blocks by hash and delegates head and total-difficulty
/// tracking to the header chain. Construction bootstraps the genesis
/// block when the store is empty.
pub struct Blockchain {
    store: Arc<dyn Store>,
    headers: HeaderChain,
}

impl Blockchain {
    /// Open a blockchain over `store`, writing `genesis` if no head
    /// exists yet.
    pub fn new(store: Arc<dyn Store>, genesis: Block, config: ChainConfig) -> ChainResult<Self> {
        let headers = HeaderChain::new(Arc::clone(&store), config);
        let chain = Self { store, headers };

        if chain.headers.head()?.is_none() {
            let hash = genesis.hash();
            let mut batch = WriteBatch::new();
            chain.headers.stage_genesis(&mut batch, &genesis.header);
            batch.put(&keys::block(&hash), &ember_rlp::encode(&genesis));
            chain.store.write(batch)?;
            info!(hash = %hash, difficulty = %genesis.header.difficulty, "wrote genesis block");
        }
        Ok(chain)
    }

    /// The header chain underneath
    pub fn headers(&self) -> &HeaderChain {
        &self.headers
    }

    /// Current head header
    pub fn head(&self) -> ChainResult<Option<Header>> {
        self.headers.head()
    }

    /// Total difficulty at the head
    pub fn total_difficulty(&self) -> ChainResult<Option<U256>> {
        self.headers.head_total_difficulty()
    }

    /// Fetch a block by hash
    pub fn block(&self, hash: &H256) -> ChainResult<Option<Block>> {
        match self.store.get(&keys::block(hash))? {
            Some(bytes) => Ok(Some(ember_rlp::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Fetch the canonical block at a height
    pub fn block_by_number(&self, number: u64) -> ChainResult<Option<Block>> {
        match self.headers.get_header_hash_by_number(number)? {
            Some(hash) => self.block(&hash),
            None => Ok(None),
        }
    }

    /// Validate and persist one block: header admission, block bytes and
    /// any head/canonical-index updates commit in a single atomic batch.
    /// A rejected block leaves the chain unchanged.
    pub fn insert_block(&self, block: &Block) -> ChainResult<U256> {
        let mut batch = WriteBatch::new();
        let td = self.headers.stage_insert(&mut batch, &block.header)?;
        batch.put(&keys::block(&block.hash()), &ember_rlp::encode(block));
        self.store.write(batch)?;
        debug!(
            number = block.number(),
            hash = %block.hash(),
            txs = block.tx_count(),
            "inserted block"
        );
        Ok(td)
    }

    /// Append blocks in order; the first invalid block aborts and is
    /// surfaced to the caller with the chain unchanged past the last
    /// good block.
    pub fn insert_blocks(&self, blocks: &[Block]) -> ChainResult<()> {
        for block in blocks {
            self.insert_block(block)?;
        }
        Ok(())
    }
}

impl BlockHashProvider for Blockchain {
    /// Resolve a height by walking parent-hash links back from the head;
    /// anything unresolvable yields the zero hash.
    fn block_hash(&self, number: u64) -> H256 {
        let head = match self.head() {
            Ok(Some(head)) => head,
            _ => return H256::ZERO,
        };
        if number > head.number {
            return H256::ZERO;
        }
        if number == head.number {
            return head.hash();
        }

        let mut hash = head.parent_hash;
        let mut height = head.number - 1;
        while height > number {
            match self.headers.header(&hash) {
                Ok(Some(header)) => {
                    hash = header.parent_hash;
                    height -= 1;
                }
                _ => return H256::ZERO,
            }
        }
        hash
    }
}
