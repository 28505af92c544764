//! Scheme constants for Shutter v01.
//!
//! These values are part of the wire format. Changing any of them breaks
//! compatibility with every other implementation of the scheme.

pub use shutter_types::{
    BLOCK_SIZE, ENVELOPE_HEADER_SIZE, G1_COMPRESSED_SIZE, G2_COMPRESSED_SIZE, VERSION_ID,
};

/// Domain separation tag for hashing identities to G1.
pub const IDENTITY_DST: &[u8] = b"SHUTTER_V01_BLS12381G1_XMD:SHA-256_SSWU_RO_";

/// Prefix for identity preimages before hashing to G1.
pub const IDENTITY_TAG: u8 = 0x01;

/// Prefix for hashing a GT element into a session key.
pub const SESSION_KEY_TAG: u8 = 0x02;

/// Prefix for deriving the encryption scalar r from σ and the message.
pub const SCALAR_TAG: u8 = 0x03;

/// Prefix for deriving per-block keys from σ.
pub const BLOCK_KEY_TAG: u8 = 0x04;

/// Order of the BLS12-381 prime-order subgroups, big-endian.
pub const GROUP_ORDER: [u8; 32] = [
    0x73, 0xed, 0xa7, 0x53, 0x29, 0x9d, 0x7d, 0x48, 0x33, 0x39, 0xd8, 0x08, 0x09, 0xa1, 0xd8, 0x05,
    0x53, 0xbd, 0xa4, 0x02, 0xff, 0xfe, 0x5b, 0xfe, 0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x01,
];

/// Bit length used for scalar multiplication. The group order is below 2^255.
pub const SCALAR_BITS: usize = 255;

/// Uncompressed G1 point size.
pub const G1_UNCOMPRESSED_SIZE: usize = 96;

/// Uncompressed G2 point size.
pub const G2_UNCOMPRESSED_SIZE: usize = 192;

/// Big-endian serialization size of a GT element (12 Fp coordinates).
pub const GT_SIZE: usize = 48 * 12;
