//! Shutter identity-based encryption over BLS12-381.
//!
//! A Boneh-Franklin variant with Fujisaki-Okamoto style derandomization: the
//! encryption scalar is derived from the caller's blinding value σ and the
//! message, so encryption is deterministic for fixed inputs.
//!
//! # Encryption
//!
//! To encrypt a message `m` to identity preimage `id` under eon key `EK`:
//! 1. Compute identity Q = H_1(0x01 ‖ id) ∈ G1
//! 2. Derive r = H_3(σ ‖ m) mod q
//! 3. Compute c1 = r·G2
//! 4. Compute c2 = σ ⊕ H_2(e(Q, EK)^r)
//! 5. Compute c3 = pad(m) ⊕ (H_4(σ ‖ 0), H_4(σ ‖ 1), ...)
//!
//! # Decryption
//!
//! Given the epoch secret key S = s·Q (the threshold signature on the identity):
//! 1. Recover σ = c2 ⊕ H_2(e(S, c1)), since e(s·Q, r·G2) = e(Q, EK)^r
//! 2. Unmask c3 with the block keys of σ and strip the padding

use std::fmt;

use tracing::debug;

use shutter_types::{decode_hex, Block, EncryptedMessage, G1Point, G2Point};

use crate::backend;
use crate::block::{compute_c3, decrypt_blocks, pad_and_split, xor_block};
use crate::constants::{BLOCK_SIZE, IDENTITY_DST, IDENTITY_TAG, VERSION_ID};
use crate::curve::{G1Affine, G2Affine, G2Projective, Gt, Scalar};
use crate::error::{Result, ShutterError};
use crate::hash::{hash_gt, hash_to_scalar};

/// Identity point Q = H_1(0x01 ‖ preimage).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Identity(G1Affine);

impl Identity {
    pub fn point(&self) -> &G1Affine {
        &self.0
    }

    /// Compressed form of the identity point.
    pub fn to_g1_point(&self) -> G1Point {
        G1Point(self.0.to_compressed())
    }
}

/// Parameters for Shutter encryption.
#[derive(Clone, Debug)]
pub struct EonParams {
    /// Eon public key in G2
    pub eon_key: G2Affine,
}

impl EonParams {
    /// Create params from a compressed or uncompressed G2 point.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let eon_key = G2Affine::from_bytes(bytes)?;
        Ok(Self { eon_key })
    }

    /// Create params from a hex-encoded eon key.
    pub fn from_hex(input: &str) -> Result<Self> {
        Self::from_bytes(&decode_hex(input)?)
    }

    /// Create params from G2Point type.
    pub fn from_g2_point(point: &G2Point) -> Result<Self> {
        Self::from_bytes(&point.0)
    }
}

/// Epoch secret key S ∈ G1, released once the epoch is over.
#[derive(Clone)]
pub struct EpochSecretKey(G1Affine);

impl EpochSecretKey {
    /// Parse a compressed (48-byte) or uncompressed (96-byte) key.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Ok(Self(G1Affine::from_bytes(bytes)?))
    }

    pub fn from_hex(input: &str) -> Result<Self> {
        Self::from_bytes(&decode_hex(input)?)
    }

    pub fn from_g1_point(point: &G1Point) -> Result<Self> {
        Self::from_bytes(&point.0)
    }
}

impl fmt::Debug for EpochSecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EpochSecretKey(<redacted>)")
    }
}

/// Interpret `bytes` as a blinding value σ.
///
/// This is the length guard for the σ ⊕ key XOR: anything other than a
/// whole block fails with [`ShutterError::LengthMismatch`].
pub fn sigma_from_slice(bytes: &[u8]) -> Result<Block> {
    bytes.try_into().map_err(|_| ShutterError::LengthMismatch {
        expected: BLOCK_SIZE,
        got: bytes.len(),
    })
}

/// Hash an identity preimage to G1.
pub fn compute_identity(preimage: &[u8]) -> Identity {
    let mut message = Vec::with_capacity(preimage.len() + 1);
    message.push(IDENTITY_TAG);
    message.extend_from_slice(preimage);
    Identity(G1Affine::hash_to_curve(&message, IDENTITY_DST))
}

/// Deserialize an eon public key.
pub fn compute_eon_key(bytes: &[u8]) -> Result<EonParams> {
    EonParams::from_bytes(bytes)
}

/// Encryption scalar r = keccak256(0x03 ‖ σ ‖ m) mod q.
pub fn compute_r(sigma: &Block, message: &[u8]) -> Scalar {
    hash_to_scalar(sigma, message)
}

/// c1 = r·G2, compressed.
pub fn compute_c1(r: &Scalar) -> G2Point {
    G2Point(G2Projective::mul_generator(r).to_compressed())
}

/// c2 = σ ⊕ H_2(e(Q, EK)^r).
pub fn compute_c2(sigma: &Block, r: &Scalar, identity: &Identity, params: &EonParams) -> Block {
    let shared = Gt::miller_loop(&identity.0, &params.eon_key).pow(r);
    xor_block(sigma, &hash_gt(&shared))
}

/// Encrypt `message` to `identity`.
///
/// # Arguments
/// * `params` - Shutter parameters holding the eon public key
/// * `identity` - Identity point from [`compute_identity`]
/// * `message` - Plaintext of any length
/// * `sigma` - Uniformly random blinding value chosen by the caller
///
/// # Returns
/// The ciphertext envelope; identical inputs give identical envelopes
pub fn encrypt(
    params: &EonParams,
    identity: &Identity,
    message: &[u8],
    sigma: &Block,
) -> Result<EncryptedMessage> {
    backend::ensure_ready()?;

    let r = compute_r(sigma, message);
    let c1 = compute_c1(&r);
    let c2 = compute_c2(sigma, &r, identity, params);
    let c3 = compute_c3(&pad_and_split(message), sigma);

    debug!(
        message_len = message.len(),
        blocks = c3.len(),
        "Encrypted message"
    );

    Ok(EncryptedMessage {
        version_id: VERSION_ID,
        c1,
        c2,
        c3,
    })
}

/// Recover σ from an envelope: σ = c2 ⊕ H_2(e(S, c1)).
pub fn recover_sigma(message: &EncryptedMessage, key: &EpochSecretKey) -> Result<Block> {
    let c1 = G2Affine::from_bytes(&message.c1.0)?;
    let shared = Gt::miller_loop(&key.0, &c1);
    Ok(xor_block(&message.c2, &hash_gt(&shared)))
}

/// Decrypt an envelope with the epoch secret key for its identity.
///
/// A wrong key is not detected as such: it yields either garbage or, more
/// often, a padding error.
pub fn decrypt(message: &EncryptedMessage, key: &EpochSecretKey) -> Result<Vec<u8>> {
    backend::ensure_ready()?;

    if message.version_id != VERSION_ID {
        return Err(ShutterError::UnsupportedVersion(message.version_id));
    }

    let sigma = recover_sigma(message, key)?;
    let plaintext = decrypt_blocks(&message.c3, &sigma)?;

    debug!(
        blocks = message.block_count(),
        plaintext_len = plaintext.len(),
        "Decrypted message"
    );

    Ok(plaintext)
}
