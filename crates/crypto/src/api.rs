//! Hex-string entry points.
//!
//! Inputs and outputs are `0x`-prefixed hex strings. Both operations wait on
//! the backend readiness gate before touching any curve state.

use shutter_types::{decode_hex, encode_hex};

use crate::backend;
use crate::codec::{decode, encode_to_hex};
use crate::error::Result;
use crate::ibe::{self, compute_identity, sigma_from_slice, EonParams, EpochSecretKey};

/// Encrypt `message_hex` to `identity_preimage_hex` under `eon_key_hex`.
///
/// Returns the encoded envelope as `0x`-prefixed hex.
pub async fn encrypt_data(
    message_hex: &str,
    identity_preimage_hex: &str,
    eon_key_hex: &str,
    sigma_hex: &str,
) -> Result<String> {
    backend::ready().await?;

    let message = decode_hex(message_hex)?;
    let identity = compute_identity(&decode_hex(identity_preimage_hex)?);
    let params = EonParams::from_hex(eon_key_hex)?;
    let sigma = sigma_from_slice(&decode_hex(sigma_hex)?)?;

    let encrypted = ibe::encrypt(&params, &identity, &message, &sigma)?;
    Ok(encode_to_hex(&encrypted))
}

/// Decrypt an encoded envelope with a hex-encoded epoch secret key.
///
/// Returns the plaintext as `0x`-prefixed hex.
pub async fn decrypt(ciphertext_hex: &str, epoch_secret_key_hex: &str) -> Result<String> {
    backend::ready().await?;

    let encrypted = decode(&decode_hex(ciphertext_hex)?)?;
    let key = EpochSecretKey::from_hex(epoch_secret_key_hex)?;

    let plaintext = ibe::decrypt(&encrypted, &key)?;
    Ok(encode_hex(&plaintext))
}

/// Identity point for a hex-encoded preimage, as compressed hex.
pub async fn compute_identity_hex(identity_preimage_hex: &str) -> Result<String> {
    backend::ready().await?;
    let identity = compute_identity(&decode_hex(identity_preimage_hex)?);
    Ok(encode_hex(&identity.to_g1_point().0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::G2Affine;
    use crate::error::ShutterError;

    fn eon_key_hex() -> String {
        encode_hex(&G2Affine::generator().to_compressed())
    }

    #[tokio::test]
    async fn test_encrypt_data_rejects_bad_hex() {
        let sigma = format!("0x{}", "11".repeat(32));
        let result = encrypt_data("0xzz", "0x01", &eon_key_hex(), &sigma).await;
        assert!(matches!(result, Err(ShutterError::InvalidHex(_))));
    }

    #[tokio::test]
    async fn test_encrypt_data_rejects_odd_length_hex() {
        let sigma = format!("0x{}", "11".repeat(32));
        let result = encrypt_data("0x123", "0x01", &eon_key_hex(), &sigma).await;
        assert!(matches!(result, Err(ShutterError::InvalidHex(_))));

        let result = encrypt_data("0x0123", "0x1", &eon_key_hex(), &sigma).await;
        assert!(matches!(result, Err(ShutterError::InvalidHex(_))));
    }

    #[tokio::test]
    async fn test_encrypt_data_rejects_short_sigma() {
        let result = encrypt_data("0x01", "0x01", &eon_key_hex(), "0x1122").await;
        assert!(matches!(
            result,
            Err(ShutterError::LengthMismatch {
                expected: 32,
                got: 2
            })
        ));
    }

    #[tokio::test]
    async fn test_decrypt_rejects_unknown_version() {
        let ciphertext = format!("0x04{}", "00".repeat(160));
        let key = format!("0x{}", "00".repeat(48));
        let result = decrypt(&ciphertext, &key).await;
        assert!(matches!(result, Err(ShutterError::UnsupportedVersion(0x04))));
    }

    #[tokio::test]
    async fn test_compute_identity_hex() {
        let a = compute_identity_hex("0xb77b16a748604c8c").await.unwrap();
        let b = compute_identity_hex("b77b16a748604c8c").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 2 + 96);
    }
}
