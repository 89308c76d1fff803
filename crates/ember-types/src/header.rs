//! Block header

use crate::bloom::Bloom;
use bytes::Bytes;
use ember_crypto::keccak256;
use ember_primitives::{Address, H256, U256};
use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};

/// Hash of the RLP encoding of an empty ommer list, keccak256(0xc0).
/// A header whose `ommers_hash` equals this references no ommers.
pub const EMPTY_OMMERS_HASH: H256 = H256::from_bytes([
    0x1d, 0xcc, 0x4d, 0xe8, 0xde, 0xc7, 0x5d, 0x7a,
    0xab, 0x85, 0xb5, 0x67, 0xb6, 0xcc, 0xd4, 0x1a,
    0xd3, 0x12, 0x45, 0x1b, 0x94, 0x8a, 0x74, 0x13,
    0xf0, 0xa1, 0x42, 0xfd, 0x40, 0xd4, 0x93, 0x47,
]);

/// Block header. Immutable once written; persisted as a 15-item RLP list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    /// Parent block hash
    pub parent_hash: H256,
    /// Hash of the RLP-encoded ommer list
    pub ommers_hash: H256,
    /// Block producer / fee recipient
    pub beneficiary: Address,
    /// State root after executing the block
    pub state_root: H256,
    /// Transactions trie root
    pub transactions_root: H256,
    /// Receipts trie root
    pub receipts_root: H256,
    /// Logs bloom filter
    pub logs_bloom: Bloom,
    /// Proof-of-work difficulty
    pub difficulty: U256,
    /// Block number (height)
    pub number: u64,
    /// Gas limit for the block
    pub gas_limit: u64,
    /// Gas used by all transactions
    pub gas_used: u64,
    /// Block timestamp (Unix seconds)
    pub timestamp: u64,
    /// Extra data
    pub extra_data: Bytes,
    /// Proof-of-work mix hash
    pub mix_hash: H256,
    /// Proof-of-work nonce
    pub nonce: u64,
}

impl Header {
    /// Content address: keccak256 of the RLP encoding.
    pub fn hash(&self) -> H256 {
        keccak256(&rlp::encode(self))
    }

    /// Build a genesis header with the given starting difficulty and gas
    /// limit. All roots are zero; the state root is the caller's problem.
    pub fn genesis(difficulty: U256, gas_limit: u64) -> Self {
        Self {
            parent_hash: H256::ZERO,
            ommers_hash: EMPTY_OMMERS_HASH,
            beneficiary: Address::ZERO,
            state_root: H256::ZERO,
            transactions_root: H256::ZERO,
            receipts_root: H256::ZERO,
            logs_bloom: Bloom::ZERO,
            difficulty,
            number: 0,
            gas_limit,
            gas_used: 0,
            timestamp: 0,
            extra_data: Bytes::new(),
            mix_hash: H256::ZERO,
            nonce: 0,
        }
    }

    /// Check if this is a genesis header
    pub fn is_genesis(&self) -> bool {
        self.number == 0 && self.parent_hash == H256::ZERO
    }
}

impl Encodable for Header {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(15);
        s.append(&self.parent_hash);
        s.append(&self.ommers_hash);
        s.append(&self.beneficiary);
        s.append(&self.state_root);
        s.append(&self.transactions_root);
        s.append(&self.receipts_root);
        s.append(&self.logs_bloom);
        s.append(&self.difficulty);
        s.append(&self.number);
        s.append(&self.gas_limit);
        s.append(&self.gas_used);
        s.append(&self.timestamp);
        s.append(&self.extra_data.to_vec());
        s.append(&self.mix_hash);
        s.append(&self.nonce);
    }
}

impl Decodable for Header {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        if rlp.item_count()? != 15 {
            return Err(DecoderError::RlpIncorrectListLen);
        }
        Ok(Self {
            parent_hash: rlp.val_at(0)?,
            ommers_hash: rlp.val_at(1)?,
            beneficiary: rlp.val_at(2)?,
            state_root: rlp.val_at(3)?,
            transactions_root: rlp.val_at(4)?,
            receipts_root: rlp.val_at(5)?,
            logs_bloom: rlp.val_at(6)?,
            difficulty: rlp.val_at(7)?,
            number: rlp.val_at(8)?,
            gas_limit: rlp.val_at(9)?,
            gas_used: rlp.val_at(10)?,
            timestamp: rlp.val_at(11)?,
            extra_data: Bytes::from(rlp.val_at::<Vec<u8>>(12)?),
            mix_hash: rlp.val_at(13)?,
            nonce: rlp.val_at(14)?,
        })
    }
}
