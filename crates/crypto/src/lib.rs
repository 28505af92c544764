//! Shutter v01 identity-based encryption over BLS12-381.
//!
//! This crate encrypts short messages so that they can only be decrypted once
//! the epoch secret key for a given identity is released, typically by a
//! threshold of keypers.
//!
//! # Overview
//!
//! 1. **Identity**: the identity preimage is hashed to a G1 point Q.
//!
//! 2. **Session key**: the caller's random σ and the message determine the
//!    scalar r. The ciphertext commits to r in G2 (c1) and masks σ with a key
//!    derived from e(Q, EK)^r (c2).
//!
//! 3. **Block cipher**: the padded message is masked block by block with keys
//!    derived from σ (c3).
//!
//! 4. **Envelope**: `version ‖ c1 ‖ c2 ‖ c3`, see [`codec`].
//!
//! Decryption with the epoch secret key S = s·Q recovers the same session key
//! through e(S, c1), then σ, then the message.

pub mod api;
pub mod backend;
pub mod block;
pub mod codec;
pub mod constants;
pub mod curve;
pub mod error;
pub mod hash;
pub mod ibe;

pub use api::{decrypt as decrypt_hex, encrypt_data};
pub use codec::{decode, decode_from_hex, encode, encode_to_hex};
pub use error::{Result, ShutterError};
pub use ibe::{compute_identity, decrypt, encrypt, EonParams, EpochSecretKey, Identity};
