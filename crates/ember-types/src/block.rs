//! Block type

use crate::header::Header;
use bytes::Bytes;
use ember_primitives::H256;
use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};

/// Complete block: header, transaction payloads and ommer headers.
///
/// Transactions are carried as opaque RLP payloads; decoding and executing
/// them is the transaction layer's concern, not the chain's.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    /// Block header
    pub header: Header,
    /// Raw RLP transaction payloads
    pub transactions: Vec<Bytes>,
    /// Ommer headers
    pub ommers: Vec<Header>,
}

impl Block {
    /// Create a new block
    pub fn new(header: Header, transactions: Vec<Bytes>, ommers: Vec<Header>) -> Self {
        Self {
            header,
            transactions,
            ommers,
        }
    }

    /// Block hash (the header's hash)
    pub fn hash(&self) -> H256 {
        self.header.hash()
    }

    /// Block number
    pub fn number(&self) -> u64 {
        self.header.number
    }

    /// Transaction count
    pub fn tx_count(&self) -> usize {
        self.transactions.len()
    }
}

impl Encodable for Block {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.begin_list(3);
        s.append(&self.header);
        s.begin_list(self.transactions.len());
        for tx in &self.transactions {
            s.append(&tx.to_vec());
        }
        s.append_list(&self.ommers);
    }
}

impl Decodable for Block {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        if rlp.item_count()? != 3 {
            return Err(DecoderError::RlpIncorrectListLen);
        }
        let header = rlp.val_at(0)?;
        let txs = rlp.at(1)?;
        let mut transactions = Vec::with_capacity(txs.item_count()?);
        for i in 0..txs.item_count()? {
            transactions.push(Bytes::from(txs.val_at::<Vec<u8>>(i)?));
        }
        let ommers = rlp.list_at(2)?;
        Ok(Self {
            header,
            transactions,
            ommers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ember_primitives::U256;

    #[test]
    fn test_block_rlp_roundtrip() {
        let header = Header::genesis(U256::from(131_072u64), 5_000);
        let block = Block::new(
            header,
            vec![Bytes::from_static(&[0x01, 0x02]), Bytes::from_static(&[0x03])],
            vec![],
        );
        let encoded = rlp::encode(&block);
        let decoded: Block = rlp::decode(&encoded).unwrap();
        assert_eq!(block, decoded);
        assert_eq!(decoded.tx_count(), 2);
    }

    #[test]
    fn test_block_with_ommers_roundtrip() {
        let mut ommer = Header::genesis(U256::from(131_072u64), 5_000);
        ommer.number = 9;
        let mut header = Header::genesis(U256::from(131_072u64), 5_000);
        header.number = 10;
        let block = Block::new(header, vec![], vec![ommer]);

        let encoded = rlp::encode(&block);
        let decoded: Block = rlp::decode(&encoded).unwrap();
        assert_eq!(decoded.ommers.len(), 1);
        assert_eq!(decoded.ommers[0].number, 9);
    }

    #[test]
    fn test_block_hash_is_header_hash() {
        let header = Header::genesis(U256::from(131_072u64), 5_000);
        let block = Block::new(header.clone(), vec![], vec![]);
        assert_eq!(block.hash(), header.hash());
        assert_eq!(block.number(), 0);
    }
}
