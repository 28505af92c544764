//! Core type definitions for Shutter v01 identity-based encryption.
//!
//! This crate provides the byte-level data structures shared by the
//! encryption crate and its callers: compressed curve points, the 32-byte
//! cipher block and the ciphertext envelope.

use serde::{Deserialize, Serialize};
use serde_with::serde_as;

// =========================
// WIRE CONSTANTS
// =========================

/// Version byte of the current ciphertext envelope.
pub const VERSION_ID: u8 = 0x03;

/// Size of a cipher block, of σ and of every derived key.
pub const BLOCK_SIZE: usize = 32;

/// Compressed G1 point size.
pub const G1_COMPRESSED_SIZE: usize = 48;

/// Compressed G2 point size.
pub const G2_COMPRESSED_SIZE: usize = 96;

/// Bytes preceding the first c3 block: version, c1 and c2.
pub const ENVELOPE_HEADER_SIZE: usize = 1 + G2_COMPRESSED_SIZE + BLOCK_SIZE;

// =========================
// CRYPTOGRAPHIC PRIMITIVES
// =========================

/// A single 32-byte cipher block.
pub type Block = [u8; BLOCK_SIZE];

/// Compressed G1 point on BLS12-381 (48 bytes)
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct G1Point(#[serde_as(as = "[_; 48]")] pub [u8; G1_COMPRESSED_SIZE]);

impl Default for G1Point {
    fn default() -> Self {
        Self([0u8; G1_COMPRESSED_SIZE])
    }
}

/// Compressed G2 point on BLS12-381 (96 bytes)
#[serde_as]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct G2Point(#[serde_as(as = "[_; 96]")] pub [u8; G2_COMPRESSED_SIZE]);

impl Default for G2Point {
    fn default() -> Self {
        Self([0u8; G2_COMPRESSED_SIZE])
    }
}

impl G2Point {
    /// Copy a compressed G2 point out of a slice of exactly 96 bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let array: [u8; G2_COMPRESSED_SIZE] = bytes.try_into().ok()?;
        Some(Self(array))
    }
}

// =========================
// CIPHERTEXT ENVELOPE
// =========================

/// Shutter ciphertext envelope.
///
/// Laid out on the wire as `version ‖ c1 ‖ c2 ‖ c3` with no length prefixes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedMessage {
    /// Envelope version, [`VERSION_ID`] for everything this crate produces
    pub version_id: u8,

    /// Commitment to the encryption scalar: c1 = r·G2
    pub c1: G2Point,

    /// Blinding value masked with the pairing-derived key
    pub c2: Block,

    /// Padded plaintext, masked block by block
    pub c3: Vec<Block>,
}

impl EncryptedMessage {
    /// Number of c3 blocks.
    pub fn block_count(&self) -> usize {
        self.c3.len()
    }

    /// Length of the envelope once encoded.
    pub fn encoded_len(&self) -> usize {
        ENVELOPE_HEADER_SIZE + self.c3.len() * BLOCK_SIZE
    }
}

// =========================
// HEX BOUNDARY
// =========================

/// Decode a hex string, with or without a `0x` prefix.
///
/// Odd-length input is rejected: a missing nibble has no single byte reading
/// that every encoder agrees on.
pub fn decode_hex(input: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let digits = input
        .strip_prefix("0x")
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input);
    hex::decode(digits)
}

/// Encode bytes as a lowercase `0x`-prefixed hex string.
pub fn encode_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_hex_prefix_and_odd_length() {
        assert_eq!(decode_hex("0xabcd").unwrap(), vec![0xab, 0xcd]);
        assert_eq!(decode_hex("abcd").unwrap(), vec![0xab, 0xcd]);
        assert_eq!(decode_hex("0x1ab"), Err(hex::FromHexError::OddLength));
        assert_eq!(decode_hex("0x").unwrap(), Vec::<u8>::new());
        assert!(decode_hex("0xzz").is_err());
    }

    #[test]
    fn test_encode_hex() {
        assert_eq!(encode_hex(&[0x03, 0xff]), "0x03ff");
        assert_eq!(encode_hex(&[]), "0x");
    }

    #[test]
    fn test_envelope_lengths() {
        let message = EncryptedMessage {
            version_id: VERSION_ID,
            c1: G2Point::default(),
            c2: [0u8; BLOCK_SIZE],
            c3: vec![[1u8; BLOCK_SIZE]; 3],
        };

        assert_eq!(message.block_count(), 3);
        assert_eq!(message.encoded_len(), 129 + 3 * 32);
    }

    #[test]
    fn test_g2_point_from_slice() {
        assert!(G2Point::from_slice(&[7u8; 96]).is_some());
        assert!(G2Point::from_slice(&[7u8; 95]).is_none());
    }

    #[test]
    fn test_envelope_json_serialization() {
        let message = EncryptedMessage {
            version_id: VERSION_ID,
            c1: G2Point([42u8; 96]),
            c2: [9u8; BLOCK_SIZE],
            c3: vec![[5u8; BLOCK_SIZE]],
        };
        let encoded = serde_json::to_string(&message).unwrap();
        let decoded: EncryptedMessage = serde_json::from_str(&encoded).unwrap();
        assert_eq!(message, decoded);
    }
}
