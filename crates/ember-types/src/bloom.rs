//! 2048-bit logs bloom filter

use ember_crypto::keccak256;
use rlp::{Decodable, DecoderError, Encodable, Rlp, RlpStream};

/// Logs bloom filter (2048 bits = 256 bytes)
#[derive(Clone, PartialEq, Eq)]
pub struct Bloom(pub [u8; 256]);

impl Default for Bloom {
    fn default() -> Self {
        Self([0u8; 256])
    }
}

impl std::fmt::Debug for Bloom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let set: u32 = self.0.iter().map(|b| b.count_ones()).sum();
        write!(f, "Bloom({} bits set)", set)
    }
}

impl Bloom {
    /// Empty bloom filter
    pub const ZERO: Bloom = Bloom([0u8; 256]);

    /// Create a bloom filter from bytes
    pub fn from_bytes(bytes: [u8; 256]) -> Self {
        Self(bytes)
    }

    /// Check if the bloom filter is empty
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }

    /// Add data to the bloom filter. Three bits are set, indexed by byte
    /// pairs of the input's keccak hash.
    pub fn accrue(&mut self, input: &[u8]) {
        let hash = keccak256(input);
        let hash_bytes = hash.as_bytes();

        for i in 0..3 {
            let bit_index =
                ((hash_bytes[i * 2] as usize) << 8 | hash_bytes[i * 2 + 1] as usize) & 0x7FF;
            let byte_index = 255 - bit_index / 8;
            let bit_position = bit_index % 8;
            self.0[byte_index] |= 1 << bit_position;
        }
    }

    /// Check if the bloom might contain the input
    pub fn contains(&self, input: &[u8]) -> bool {
        let hash = keccak256(input);
        let hash_bytes = hash.as_bytes();

        for i in 0..3 {
            let bit_index =
                ((hash_bytes[i * 2] as usize) << 8 | hash_bytes[i * 2 + 1] as usize) & 0x7FF;
            let byte_index = 255 - bit_index / 8;
            let bit_position = bit_index % 8;
            if self.0[byte_index] & (1 << bit_position) == 0 {
                return false;
            }
        }
        true
    }

    /// Combine with another bloom filter (OR)
    pub fn accrue_bloom(&mut self, other: &Bloom) {
        for i in 0..256 {
            self.0[i] |= other.0[i];
        }
    }
}

impl Encodable for Bloom {
    fn rlp_append(&self, s: &mut RlpStream) {
        s.encoder().encode_value(&self.0);
    }
}

impl Decodable for Bloom {
    fn decode(rlp: &Rlp) -> Result<Self, DecoderError> {
        let bytes: Vec<u8> = rlp.as_val()?;
        if bytes.len() != 256 {
            return Err(DecoderError::RlpInvalidLength);
        }
        let mut arr = [0u8; 256];
        arr.copy_from_slice(&bytes);
        Ok(Bloom(arr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bloom_empty() {
        let bloom = Bloom::default();
        assert!(bloom.is_empty());
    }

    #[test]
    fn test_bloom_accrue_and_contains() {
        let mut bloom = Bloom::default();
        bloom.accrue(b"hello");
        assert!(!bloom.is_empty());
        assert!(bloom.contains(b"hello"));
    }

    #[test]
    fn test_bloom_combine() {
        let mut bloom1 = Bloom::default();
        bloom1.accrue(b"hello");

        let mut bloom2 = Bloom::default();
        bloom2.accrue(b"world");

        bloom1.accrue_bloom(&bloom2);
        assert!(bloom1.contains(b"hello"));
        assert!(bloom1.contains(b"world"));
    }

    #[test]
    fn test_bloom_rlp_roundtrip() {
        let mut bloom = Bloom::default();
        bloom.accrue(b"topic");
        let encoded = rlp::encode(&bloom);
        let decoded: Bloom = rlp::decode(&encoded).unwrap();
        assert_eq!(bloom, decoded);
    }
}
