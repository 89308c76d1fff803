//! # ember-rlp
//!
//! RLP (Recursive Length Prefix) encoding and decoding for Ember.
//!
//! The chain persists headers, blocks and total difficulties in the
//! canonical Ethereum wire encoding: a length-prefixed recursive encoding
//! of nested byte sequences. The heavy lifting lives in the `rlp` crate;
//! this layer pins down the conversion surface the rest of the workspace
//! uses and adds the minimal big-endian integer helpers the chain's
//! height index relies on.
//!
//! ## Encoding rules
//!
//! - Single byte `[0x00, 0x7f]`: itself
//! - Short string (0-55 bytes): `0x80 + len` + data
//! - Long string (>55 bytes): `0xb7 + len_of_len` + len + data
//! - Short list (0-55 bytes payload): `0xc0 + len` + items
//! - Long list (>55 bytes payload): `0xf7 + len_of_len` + len + items

#![warn(missing_docs)]
#![warn(clippy::all)]

// Re-export the rlp crate surface for direct use
pub use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};

// Re-export primitives with RLP support
pub use ember_primitives::{Address, H256, U256};

/// Encode a value to RLP bytes
pub fn encode<T: Encodable>(value: &T) -> Vec<u8> {
    rlp::encode(value).to_vec()
}

/// Decode RLP bytes to a value
pub fn decode<T: Decodable>(data: &[u8]) -> Result<T, DecoderError> {
    rlp::decode(data)
}

/// Fixed-width big-endian integer helpers for persisted keys
pub mod be {
    /// Encode a block number as 8 fixed big-endian bytes. Keys built from
    /// this sort in height order in an ordered store.
    pub fn u64_bytes(value: u64) -> [u8; 8] {
        value.to_be_bytes()
    }

    /// Decode 8 big-endian bytes back into a block number
    pub fn u64_from(bytes: &[u8]) -> Option<u64> {
        let arr: [u8; 8] = bytes.try_into().ok()?;
        Some(u64::from_be_bytes(arr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode_h256() {
        let hash = H256::from_bytes([0x42; 32]);
        let encoded = encode(&hash);
        let decoded: H256 = decode(&encoded).unwrap();
        assert_eq!(hash, decoded);
    }

    #[test]
    fn test_encode_decode_address() {
        let addr = Address::from_bytes([0x42; 20]);
        let encoded = encode(&addr);
        let decoded: Address = decode(&encoded).unwrap();
        assert_eq!(addr, decoded);
    }

    #[test]
    fn test_encode_decode_u256() {
        for value in [U256::zero(), U256::one(), U256::MAX, U256::from(131_072u64)] {
            let encoded = encode(&value);
            let decoded: U256 = decode(&encoded).unwrap();
            assert_eq!(value, decoded);
        }
    }

    #[test]
    fn test_ethereum_rlp_examples() {
        // From the Yellow Paper
        // "dog" = [0x83, 'd', 'o', 'g']
        let encoded = rlp::encode(&"dog");
        assert_eq!(&encoded[..], &[0x83, b'd', b'o', b'g']);

        // Empty string = [0x80]
        let encoded = rlp::encode(&"");
        assert_eq!(&encoded[..], &[0x80]);

        // Integer 0 = [0x80] (same as empty string)
        let encoded = rlp::encode(&0u64);
        assert_eq!(&encoded[..], &[0x80]);

        // Integer 1024 = [0x82, 0x04, 0x00]
        let encoded = rlp::encode(&1024u64);
        assert_eq!(&encoded[..], &[0x82, 0x04, 0x00]);

        // Empty list = [0xc0]
        let stream = RlpStream::new_list(0);
        let encoded = stream.out();
        assert_eq!(&encoded[..], &[0xc0]);
    }

    #[test]
    fn test_be_u64_roundtrip() {
        for n in [0u64, 1, 255, 1 << 40, u64::MAX] {
            assert_eq!(be::u64_from(&be::u64_bytes(n)), Some(n));
        }
    }

    #[test]
    fn test_be_u64_sorts_by_height() {
        assert!(be::u64_bytes(255) < be::u64_bytes(256));
        assert!(be::u64_bytes(1) < be::u64_bytes(1 << 32));
    }

    #[test]
    fn test_be_u64_rejects_wrong_width() {
        assert_eq!(be::u64_from(&[0u8; 7]), None);
        assert_eq!(be::u64_from(&[0u8; 9]), None);
    }
}
