//! Header chain: validation, difficulty, total-difficulty accounting and
//! the hash/height indices.

use crate::error::{ChainError, ChainResult};
use crate::store::{Store, WriteBatch};
use ember_primitives::{H256, U256};
use ember_types::{Header, EMPTY_OMMERS_HASH};
use std::sync::Arc;
use tracing::debug;

/// Persisted key layout.
///
/// - `"head"`             -> encoded head header
/// - `"genesis"`          -> encoded genesis header
/// - `"h" hash`           -> encoded header
/// - `"h" hash "t"`       -> encoded total difficulty
/// - `"h" be64(number) "n"` -> canonical hash at that height
/// - `"b" hash`           -> encoded block
pub mod keys {
    use ember_primitives::H256;
    use ember_rlp::be;

    /// Head pointer
    pub const HEAD: &[u8] = b"head";
    /// Genesis header (reserved)
    pub const GENESIS: &[u8] = b"genesis";

    /// Header by hash
    pub fn header(hash: &H256) -> Vec<u8> {
        let mut key = Vec::with_capacity(33);
        key.push(b'h');
        key.extend_from_slice(hash.as_bytes());
        key
    }

    /// Total difficulty by hash
    pub fn total_difficulty(hash: &H256) -> Vec<u8> {
        let mut key = header(hash);
        key.push(b't');
        key
    }

    /// Canonical hash by height
    pub fn canonical(number: u64) -> Vec<u8> {
        let mut key = Vec::with_capacity(10);
        key.push(b'h');
        key.extend_from_slice(&be::u64_bytes(number));
        key.push(b'n');
        key
    }

    /// Block by hash
    pub fn block(hash: &H256) -> Vec<u8> {
        let mut key = Vec::with_capacity(33);
        key.push(b'b');
        key.extend_from_slice(hash.as_bytes());
        key
    }
}

/// Protocol constants for header validation and difficulty.
#[derive(Clone, Debug)]
pub struct ChainConfig {
    /// Lower clamp of the difficulty calculation
    pub minimum_difficulty: U256,
    /// Divisor extracting the per-block adjustment quantum
    pub difficulty_bound_divisor: u64,
    /// Seconds per time-factor decrement
    pub difficulty_increment_divisor: u64,
    /// Absolute gas-limit floor
    pub minimum_gas_limit: u64,
    /// Divisor bounding gas-limit drift between consecutive blocks
    pub gas_limit_bound_divisor: u64,
    /// Heights subtracted before the difficulty bomb kicks in
    pub bomb_delay: u64,
    /// Heights per doubling of the bomb term
    pub bomb_period: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            minimum_difficulty: U256::from(131_072u64),
            difficulty_bound_divisor: 2048,
            difficulty_increment_divisor: 9,
            minimum_gas_limit: 5_000,
            gas_limit_bound_divisor: 1024,
            bomb_delay: 3_000_000,
            bomb_period: 100_000,
        }
    }
}

/// Compute the difficulty `header` must carry over `parent`.
///
/// Deterministic in (parent.difficulty, parent.timestamp, header.number,
/// header.timestamp, header.ommers_hash). The lower clamp is the
/// configured protocol constant, never the header's own claim.
pub fn calculate_difficulty(header: &Header, parent: &Header, config: &ChainConfig) -> U256 {
    if header.number == 0 {
        return header.difficulty;
    }

    let x = parent.difficulty / U256::from(config.difficulty_bound_divisor);
    let y: i64 = if header.ommers_hash == EMPTY_OMMERS_HASH {
        1
    } else {
        2
    };
    let elapsed = header.timestamp.saturating_sub(parent.timestamp)
        / config.difficulty_increment_divisor;
    let time_factor = (y - elapsed.min(i64::MAX as u64) as i64).max(-99);

    let adjusted = if time_factor >= 0 {
        parent.difficulty + x * U256::from(time_factor as u64)
    } else {
        parent
            .difficulty
            .saturating_sub(x * U256::from((-time_factor) as u64))
    };

    let fake_height = header.number.saturating_sub(config.bomb_delay);
    let period = fake_height / config.bomb_period;
    let bomb = if (2..258).contains(&period) {
        U256::one() << (period - 2)
    } else if period >= 258 {
        U256::MAX
    } else {
        U256::zero()
    };

    adjusted
        .saturating_add(bomb)
        .max(config.minimum_difficulty)
}

/// Content-addressed header store with auxiliary indices and a
/// distinguished head pointer tracking the greatest total difficulty.
pub struct HeaderChain {
    store: Arc<dyn Store>,
    config: ChainConfig,
}

impl HeaderChain {
    /// Create a header chain over `store`
    pub fn new(store: Arc<dyn Store>, config: ChainConfig) -> Self {
        Self { store, config }
    }

    /// Protocol constants in force
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    /// Fetch a header by hash
    pub fn header(&self, hash: &H256) -> ChainResult<Option<Header>> {
        match self.store.get(&keys::header(hash))? {
            Some(bytes) => Ok(Some(ember_rlp::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Whether a header is stored
    pub fn contains(&self, hash: &H256) -> ChainResult<bool> {
        Ok(self.store.get(&keys::header(hash))?.is_some())
    }

    /// Cumulative total difficulty of a stored header
    pub fn total_difficulty(&self, hash: &H256) -> ChainResult<Option<U256>> {
        match self.store.get(&keys::total_difficulty(hash))? {
            Some(bytes) => Ok(Some(ember_rlp::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// The header with the greatest known total difficulty
    pub fn head(&self) -> ChainResult<Option<Header>> {
        match self.store.get(keys::HEAD)? {
            Some(bytes) => Ok(Some(ember_rlp::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Total difficulty at the head
    pub fn head_total_difficulty(&self) -> ChainResult<Option<U256>> {
        match self.head()? {
            Some(head) => self.total_difficulty(&head.hash()),
            None => Ok(None),
        }
    }

    /// Canonical hash at a height
    pub fn get_header_hash_by_number(&self, number: u64) -> ChainResult<Option<H256>> {
        match self.store.get(&keys::canonical(number))? {
            Some(bytes) => Ok(Some(
                H256::from_slice(&bytes).map_err(|_| ChainError::Codec(ember_rlp::DecoderError::Custom("canonical index entry is not a hash")))?,
            )),
            None => Ok(None),
        }
    }

    /// Record the canonical hash for a height
    pub fn write_header_hash_number(&self, hash: &H256, number: u64) -> ChainResult<()> {
        self.store.put(&keys::canonical(number), hash.as_bytes())?;
        Ok(())
    }

    /// Check every admission rule for `header` against its stored parent.
    /// The store is left untouched.
    pub fn validate(&self, header: &Header) -> ChainResult<()> {
        let parent = self
            .header(&header.parent_hash)?
            .ok_or(ChainError::UnknownParent(header.parent_hash))?;
        self.validate_with_parent(header, &parent)
    }

    fn validate_with_parent(&self, header: &Header, parent: &Header) -> ChainResult<()> {
        if parent.number + 1 != header.number {
            return Err(ChainError::NonSequentialNumber {
                parent: parent.number,
                got: header.number,
            });
        }
        if header.timestamp <= parent.timestamp {
            return Err(ChainError::StaleTimestamp {
                parent: parent.timestamp,
                got: header.timestamp,
            });
        }
        if header.gas_limit < self.config.minimum_gas_limit {
            return Err(ChainError::GasLimitOutOfBounds {
                parent: parent.gas_limit,
                got: header.gas_limit,
            });
        }
        let drift = header.gas_limit.abs_diff(parent.gas_limit);
        if drift >= parent.gas_limit / self.config.gas_limit_bound_divisor {
            return Err(ChainError::GasLimitOutOfBounds {
                parent: parent.gas_limit,
                got: header.gas_limit,
            });
        }
        let expected = calculate_difficulty(header, parent, &self.config);
        if expected != header.difficulty {
            return Err(ChainError::InvalidDifficulty {
                expected,
                got: header.difficulty,
            });
        }
        Ok(())
    }

    /// Persist a header plus its total difficulty. Indices and the head
    /// pointer are untouched; `insert` is the usual entry point.
    pub fn write(&self, header: &Header) -> ChainResult<U256> {
        let mut batch = WriteBatch::new();
        let td = self.stage_write(&mut batch, header)?;
        self.store.write(batch)?;
        Ok(td)
    }

    /// Validate and persist a header; on a total-difficulty win the head
    /// pointer moves and the canonical height index is rebuilt back to
    /// the fork point, all in one atomic batch. Returns the header's TD.
    pub fn insert(&self, header: &Header) -> ChainResult<U256> {
        let mut batch = WriteBatch::new();
        let td = self.stage_insert(&mut batch, header)?;
        self.store.write(batch)?;
        Ok(td)
    }

    /// Stage a full insert into `batch` without committing.
    pub(crate) fn stage_insert(
        &self,
        batch: &mut WriteBatch,
        header: &Header,
    ) -> ChainResult<U256> {
        let parent = self
            .header(&header.parent_hash)?
            .ok_or(ChainError::UnknownParent(header.parent_hash))?;
        self.validate_with_parent(header, &parent)?;

        let td = self.stage_write(batch, header)?;
        let hash = header.hash();

        let head_td = self.head_total_difficulty()?;
        if head_td.map_or(true, |current| td > current) {
            self.stage_canonical(batch, header, &hash)?;
            debug!(
                number = header.number,
                hash = %hash,
                total_difficulty = %td,
                "new chain head"
            );
        } else {
            debug!(number = header.number, hash = %hash, "stored side-chain header");
        }
        Ok(td)
    }

    /// Stage the content-addressed writes: header bytes and cumulative
    /// total difficulty.
    fn stage_write(&self, batch: &mut WriteBatch, header: &Header) -> ChainResult<U256> {
        let td = if header.number == 0 {
            header.difficulty
        } else {
            let parent_td = self
                .total_difficulty(&header.parent_hash)?
                .ok_or(ChainError::UnknownParent(header.parent_hash))?;
            parent_td + header.difficulty
        };
        let hash = header.hash();
        batch.put(&keys::header(&hash), &ember_rlp::encode(header));
        batch.put(&keys::total_difficulty(&hash), &ember_rlp::encode(&td));
        Ok(td)
    }

    /// Stage the head move: rewrite the canonical height index along the
    /// winning chain back to the common ancestor and drop stale entries
    /// above the new head.
    fn stage_canonical(
        &self,
        batch: &mut WriteBatch,
        header: &Header,
        hash: &H256,
    ) -> ChainResult<()> {
        batch.put(keys::HEAD, &ember_rlp::encode(header));

        if let Some(old_head) = self.head()? {
            let mut stale = old_head.number;
            while stale > header.number {
                batch.delete(&keys::canonical(stale));
                stale -= 1;
            }
        }

        batch.put(&keys::canonical(header.number), hash.as_bytes());
        let mut cursor = header.clone();
        while cursor.number > 0 {
            if self.get_header_hash_by_number(cursor.number - 1)? == Some(cursor.parent_hash) {
                break;
            }
            let parent = self
                .header(&cursor.parent_hash)?
                .ok_or(ChainError::UnknownParent(cursor.parent_hash))?;
            batch.put(&keys::canonical(parent.number), cursor.parent_hash.as_bytes());
            cursor = parent;
        }
        Ok(())
    }

    /// Stage the genesis bootstrap writes.
    pub(crate) fn stage_genesis(&self, batch: &mut WriteBatch, genesis: &Header) {
        let hash = genesis.hash();
        batch.put(&keys::header(&hash), &ember_rlp::encode(genesis));
        batch.put(&keys::total_difficulty(&hash), &ember_rlp::encode(&genesis.difficulty));
        batch.put(&keys::canonical(0), hash.as_bytes());
        batch.put(keys::HEAD, &ember_rlp::encode(genesis));
        batch.put(keys::GENESIS, &ember_rlp::encode(genesis));
    }
}
