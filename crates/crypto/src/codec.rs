//! Wire encoding of [`EncryptedMessage`].
//!
//! ```text
//! offset  len    field
//! 0       1      version (0x03)
//! 1       96     c1, compressed G2
//! 97      32     c2
//! 129     32*n   c3
//! ```
//!
//! There are no length prefixes; segment boundaries follow from the fixed
//! sizes and the total length.

use shutter_types::{decode_hex, encode_hex, Block, EncryptedMessage, G2Point};

use crate::constants::{BLOCK_SIZE, ENVELOPE_HEADER_SIZE, G2_COMPRESSED_SIZE, VERSION_ID};
use crate::error::{Result, ShutterError};

const C1_OFFSET: usize = 1;
const C2_OFFSET: usize = C1_OFFSET + G2_COMPRESSED_SIZE;

/// Encode an envelope to bytes.
pub fn encode(message: &EncryptedMessage) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(message.encoded_len());
    bytes.push(message.version_id);
    bytes.extend_from_slice(&message.c1.0);
    bytes.extend_from_slice(&message.c2);
    for block in &message.c3 {
        bytes.extend_from_slice(block);
    }
    bytes
}

/// Decode an envelope from bytes.
///
/// The version byte is checked before anything else. c1 is only sliced here;
/// it is parsed as a curve point when the envelope is decrypted.
pub fn decode(bytes: &[u8]) -> Result<EncryptedMessage> {
    let version = *bytes
        .first()
        .ok_or_else(|| ShutterError::Deserialization("empty ciphertext".into()))?;
    if version != VERSION_ID {
        return Err(ShutterError::UnsupportedVersion(version));
    }

    if bytes.len() < ENVELOPE_HEADER_SIZE {
        return Err(ShutterError::Deserialization(format!(
            "ciphertext of {} bytes is shorter than the {ENVELOPE_HEADER_SIZE}-byte header",
            bytes.len()
        )));
    }

    let c1 = G2Point::from_slice(&bytes[C1_OFFSET..C2_OFFSET])
        .ok_or_else(|| ShutterError::Deserialization("c1 segment".into()))?;

    let mut c2 = [0u8; BLOCK_SIZE];
    c2.copy_from_slice(&bytes[C2_OFFSET..ENVELOPE_HEADER_SIZE]);

    let tail = &bytes[ENVELOPE_HEADER_SIZE..];
    if tail.len() % BLOCK_SIZE != 0 {
        return Err(ShutterError::LengthMismatch {
            expected: tail.len().next_multiple_of(BLOCK_SIZE),
            got: tail.len(),
        });
    }
    let c3: Vec<Block> = tail
        .chunks_exact(BLOCK_SIZE)
        .map(|chunk| {
            let mut block = [0u8; BLOCK_SIZE];
            block.copy_from_slice(chunk);
            block
        })
        .collect();

    Ok(EncryptedMessage {
        version_id: version,
        c1,
        c2,
        c3,
    })
}

/// Encode an envelope as `0x`-prefixed hex.
pub fn encode_to_hex(message: &EncryptedMessage) -> String {
    encode_hex(&encode(message))
}

/// Decode an envelope from hex, with or without the `0x` prefix.
pub fn decode_from_hex(input: &str) -> Result<EncryptedMessage> {
    decode(&decode_hex(input)?)
}
