//! Domain-separated Keccak-256 hashes used by the scheme.
//!
//! Every hash input starts with a one-byte tag so that no output is valid in
//! two roles:
//! - `0x01`: identity preimage (hashed to G1, see [`crate::ibe::compute_identity`])
//! - `0x02`: GT element to session key ([`hash_gt`])
//! - `0x03`: σ and message to encryption scalar ([`hash_to_scalar`])
//! - `0x04`: σ and block index to block key ([`hash_block_key`])

use sha3::{Digest, Keccak256};

use crate::constants::{BLOCK_KEY_TAG, SCALAR_TAG, SESSION_KEY_TAG};
use crate::curve::{Gt, Scalar};
use shutter_types::Block;

fn keccak_tagged(tag: u8, parts: &[&[u8]]) -> Block {
    let mut hasher = Keccak256::new();
    hasher.update([tag]);
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().into()
}

/// H2: session key from a Miller loop output.
///
/// Applies the final exponentiation, serializes the result big-endian and
/// hashes it under tag `0x02`.
pub fn hash_gt(element: &Gt) -> Block {
    keccak_tagged(SESSION_KEY_TAG, &[element.final_exp().to_bendian().as_slice()])
}

/// H3: encryption scalar `keccak256(0x03 ‖ σ ‖ message) mod q`.
pub fn hash_to_scalar(sigma: &Block, message: &[u8]) -> Scalar {
    let digest = keccak_tagged(SCALAR_TAG, &[sigma.as_slice(), message]);
    Scalar::from_bytes_be(&digest)
}

/// H4: block key `keccak256(0x04 ‖ preimage)`.
pub fn hash_block_key(preimage: &[u8]) -> Block {
    keccak_tagged(BLOCK_KEY_TAG, &[preimage])
}
