//! Padding and the XOR block cipher keyed by σ.
//!
//! The plaintext is padded to a whole number of 32-byte blocks and block `i`
//! is masked with `keccak256(0x04 ‖ σ ‖ be(i))`, where `be(i)` is the
//! big-endian encoding of `i` with leading zero bytes stripped (at least one
//! byte is always kept).

use shutter_types::{Block, BLOCK_SIZE};

use crate::error::{Result, ShutterError};
use crate::hash::hash_block_key;

/// Pad `plaintext` and split it into blocks.
///
/// Appends `p = 32 - len % 32` bytes of value `p`, so an exact multiple of
/// the block size still gains a full block of `0x20`.
pub fn pad_and_split(plaintext: &[u8]) -> Vec<Block> {
    let padding = BLOCK_SIZE - plaintext.len() % BLOCK_SIZE;
    let mut padded = Vec::with_capacity(plaintext.len() + padding);
    padded.extend_from_slice(plaintext);
    padded.resize(plaintext.len() + padding, padding as u8);

    padded
        .chunks_exact(BLOCK_SIZE)
        .map(|chunk| {
            let mut block = [0u8; BLOCK_SIZE];
            block.copy_from_slice(chunk);
            block
        })
        .collect()
}

/// Strip the padding trailer.
///
/// Only the final byte is inspected; the other padding bytes are not checked
/// against it.
pub fn unpad(bytes: &[u8]) -> Result<&[u8]> {
    let padding = *bytes.last().ok_or(ShutterError::EmptyPlaintext)?;
    if padding == 0 || padding as usize > BLOCK_SIZE || padding as usize > bytes.len() {
        return Err(ShutterError::InvalidPadding(padding));
    }
    Ok(&bytes[..bytes.len() - padding as usize])
}

/// XOR two blocks.
///
/// Both operands are whole blocks, so lengths always agree; variable-length
/// input is checked where it becomes a block (see
/// [`crate::ibe::sigma_from_slice`] and [`crate::codec::decode`]).
pub fn xor_block(x: &Block, y: &Block) -> Block {
    let mut out = [0u8; BLOCK_SIZE];
    for (o, (a, b)) in out.iter_mut().zip(x.iter().zip(y)) {
        *o = a ^ b;
    }
    out
}

/// Key for block `index`.
pub fn block_key(sigma: &Block, index: u32) -> Block {
    let be = index.to_be_bytes();
    let skip = be.iter().take(3).take_while(|byte| **byte == 0).count();

    let mut preimage = Vec::with_capacity(BLOCK_SIZE + be.len());
    preimage.extend_from_slice(sigma);
    preimage.extend_from_slice(&be[skip..]);
    hash_block_key(&preimage)
}

/// Keys for blocks `0..n`.
pub fn compute_block_keys(sigma: &Block, n: usize) -> Vec<Block> {
    // Block indices are 32-bit on the wire.
    (0..n).map(|i| block_key(sigma, i as u32)).collect()
}

/// Mask each block with its key. Used for both directions.
pub fn apply_keystream(blocks: &[Block], sigma: &Block) -> Vec<Block> {
    compute_block_keys(sigma, blocks.len())
        .iter()
        .zip(blocks)
        .map(|(key, block)| xor_block(key, block))
        .collect()
}

/// c3: padded plaintext blocks masked with the block keys.
pub fn compute_c3(blocks: &[Block], sigma: &Block) -> Vec<Block> {
    apply_keystream(blocks, sigma)
}

/// Inverse of [`compute_c3`] followed by [`unpad`].
pub fn decrypt_blocks(c3: &[Block], sigma: &Block) -> Result<Vec<u8>> {
    let padded: Vec<u8> = apply_keystream(c3, sigma).concat();
    Ok(unpad(&padded)?.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha3::{Digest, Keccak256};

    fn expected_key(sigma: &Block, suffix: &[u8]) -> Block {
        let mut hasher = Keccak256::new();
        hasher.update([0x04]);
        hasher.update(sigma);
        hasher.update(suffix);
        hasher.finalize().into()
    }

    #[test]
    fn test_pad_unpad_boundaries() {
        for len in [0usize, 1, 31, 32, 33, 64] {
            let message: Vec<u8> = (0..len).map(|i| i as u8).collect();
            let blocks = pad_and_split(&message);

            assert_eq!(blocks.len(), len / 32 + 1, "len {len}");
            let flat = blocks.concat();
            assert_eq!(unpad(&flat).unwrap(), message.as_slice(), "len {len}");
        }
    }

    #[test]
    fn test_full_padding_block_on_exact_multiple() {
        let blocks = pad_and_split(&[0xab; 32]);
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[1], [0x20; 32]);

        let empty = pad_and_split(&[]);
        assert_eq!(empty, vec![[0x20; 32]]);
    }

    #[test]
    fn test_unpad_rejects_invalid_lengths() {
        assert!(matches!(unpad(&[]), Err(ShutterError::EmptyPlaintext)));
        assert!(matches!(
            unpad(&[1, 2, 0]),
            Err(ShutterError::InvalidPadding(0))
        ));
        assert!(matches!(
            unpad(&[33u8; 64]),
            Err(ShutterError::InvalidPadding(33))
        ));
        assert!(matches!(
            unpad(&[1, 5]),
            Err(ShutterError::InvalidPadding(5))
        ));
    }

    #[test]
    fn test_unpad_ignores_padding_contents() {
        let mut bytes = vec![0x61, 0x62, 0xff, 0xee, 0x03];
        assert_eq!(unpad(&bytes).unwrap(), &[0x61, 0x62]);

        bytes = vec![0x02; 2];
        assert_eq!(unpad(&bytes).unwrap(), &[] as &[u8]);
    }

    #[test]
    fn test_xor_block() {
        let mut x = [0xf0u8; 32];
        x[31] = 0x0f;
        let y = [0xffu8; 32];

        let out = xor_block(&x, &y);
        assert_eq!(out[0], 0x0f);
        assert_eq!(out[31], 0xf0);
        assert_eq!(xor_block(&out, &y), x);
    }

    #[test]
    fn test_block_key_minimal_encoding() {
        let sigma = [0x42u8; 32];
        let keys = compute_block_keys(&sigma, 257);

        assert_eq!(keys.len(), 257);
        assert_eq!(keys[0], expected_key(&sigma, &[0x00]));
        assert_eq!(keys[1], expected_key(&sigma, &[0x01]));
        assert_eq!(keys[255], expected_key(&sigma, &[0xff]));
        assert_eq!(keys[256], expected_key(&sigma, &[0x01, 0x00]));
    }

    #[test]
    fn test_block_key_wide_indices() {
        let sigma = [7u8; 32];
        assert_eq!(
            block_key(&sigma, 0x0001_0000),
            expected_key(&sigma, &[0x01, 0x00, 0x00])
        );
        assert_eq!(
            block_key(&sigma, 0x0100_0000),
            expected_key(&sigma, &[0x01, 0x00, 0x00, 0x00])
        );
    }

    #[test]
    fn test_c3_roundtrip() {
        let sigma = [9u8; 32];
        let message = b"a message that spans more than one block of output";
        let c3 = compute_c3(&pad_and_split(message), &sigma);

        assert_eq!(c3.len(), 2);
        assert_eq!(decrypt_blocks(&c3, &sigma).unwrap(), message.to_vec());
    }

    #[test]
    fn test_decrypt_empty_c3_fails() {
        assert!(decrypt_blocks(&[], &[0u8; 32]).unwrap_err().is_padding());
    }
}
