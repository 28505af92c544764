//! End-to-end integration tests for Shutter encryption.
//!
//! These tests exercise the full lifecycle across crates:
//! 1. Eon key setup (a single BLS secret stands in for the keyper DKG)
//! 2. Encryption through the hex entry points
//! 3. Epoch secret key release (a BLS signature on the tagged identity)
//! 4. Decryption and envelope handling

#![cfg(test)]

use anyhow::Result;
use blst::min_sig::SecretKey;
use rand::rngs::OsRng;
use rand::RngCore;
use sha3::{Digest, Keccak256};

use shutter_crypto::{
    api, block, codec,
    constants::{IDENTITY_DST, IDENTITY_TAG},
    curve::{G1Affine, G2Affine, Gt},
    ibe::{compute_c1, compute_r, sigma_from_slice},
    compute_identity, EonParams, EpochSecretKey, ShutterError,
};
use shutter_types::{decode_hex, encode_hex, VERSION_ID};

/// Identity preimage used by the reference encryption test.
const REFERENCE_IDENTITY_PREIMAGE: &str =
    "0xb77b16a748604c8c37a882a8f739cc8fdb51d0ba6b1dd9d6a0e3a87db8a5ce7f97d8c4809abe1787273c1c2c90ba8928";

/// Eon key used by the reference encryption test.
const REFERENCE_EON_KEY: &str = "0xadc82882285a02537b519d3145a751120962888d7ca71130c5bb1a5044dcdf78111f64e5fec59aa4f7e499d397854e5b169b5e452f2c30d546f5dadddaa5fd002b344338d74bb6dbc50281018c770f438443326f4dd621e82d10e42539b898f7";

/// A keyper set collapsed into one secret.
struct Keyper {
    sk: SecretKey,
}

impl Keyper {
    fn generate() -> Self {
        let mut ikm = [0u8; 32];
        OsRng.fill_bytes(&mut ikm);
        Self {
            sk: SecretKey::key_gen(&ikm, &[]).expect("valid ikm"),
        }
    }

    fn eon_key_hex(&self) -> String {
        encode_hex(&self.sk.sk_to_pk().to_bytes())
    }

    /// Epoch secret key s·H_1(0x01 ‖ preimage).
    fn epoch_secret_key_hex(&self, preimage: &[u8]) -> String {
        let mut message = vec![IDENTITY_TAG];
        message.extend_from_slice(preimage);
        encode_hex(&self.sk.sign(&message, IDENTITY_DST, &[]).to_bytes())
    }
}

fn random_sigma_hex() -> String {
    let mut sigma = [0u8; 32];
    OsRng.fill_bytes(&mut sigma);
    encode_hex(&sigma)
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Encrypt then decrypt `message` through the hex entry points.
async fn roundtrip(keyper: &Keyper, preimage: &[u8], message: &[u8]) -> Result<Vec<u8>> {
    let ciphertext = api::encrypt_data(
        &encode_hex(message),
        &encode_hex(preimage),
        &keyper.eon_key_hex(),
        &random_sigma_hex(),
    )
    .await?;

    let plaintext = api::decrypt(&ciphertext, &keyper.epoch_secret_key_hex(preimage)).await?;
    Ok(decode_hex(&plaintext)?)
}

#[tokio::test]
async fn test_full_encryption_flow() -> Result<()> {
    init_tracing();

    let keyper = Keyper::generate();
    let preimage = b"eon 4 / epoch 1337";

    let messages: [&[u8]; 7] = [
        b"",
        b"h",
        b"hide this message",
        &[0x5a; 32],
        &[0xa5; 33],
        &[0x01; 64],
        &[0x77; 1000],
    ];
    for message in messages {
        assert_eq!(roundtrip(&keyper, preimage, message).await?, message);
    }

    Ok(())
}

#[tokio::test]
async fn test_epoch_key_matches_eon_key() -> Result<()> {
    let keyper = Keyper::generate();
    let preimage = b"epoch 9";

    let identity = compute_identity(preimage);
    let eon = EonParams::from_hex(&keyper.eon_key_hex())?;
    let epoch_key = G1Affine::from_bytes(&decode_hex(&keyper.epoch_secret_key_hex(preimage))?)?;

    // e(s·Q, G2) == e(Q, s·G2)
    assert_eq!(
        Gt::pairing(&epoch_key, &G2Affine::generator()),
        Gt::pairing(identity.point(), &eon.eon_key)
    );
    Ok(())
}

#[tokio::test]
async fn test_key_for_other_identity_does_not_decrypt() -> Result<()> {
    let keyper = Keyper::generate();
    let message = b"sealed until epoch 10";

    let ciphertext = api::encrypt_data(
        &encode_hex(message),
        &encode_hex(b"epoch 10"),
        &keyper.eon_key_hex(),
        &random_sigma_hex(),
    )
    .await?;

    let other_key = keyper.epoch_secret_key_hex(b"epoch 11");
    match api::decrypt(&ciphertext, &other_key).await {
        Ok(plaintext) => assert_ne!(decode_hex(&plaintext)?, message.to_vec()),
        Err(err) => assert!(err.is_padding()),
    }
    Ok(())
}

#[tokio::test]
async fn test_reference_inputs_envelope() -> Result<()> {
    let message = b"hide this message";
    let sigma_hex = format!("0x{}", "42".repeat(32));

    let ciphertext_hex = api::encrypt_data(
        &encode_hex(message),
        REFERENCE_IDENTITY_PREIMAGE,
        REFERENCE_EON_KEY,
        &sigma_hex,
    )
    .await?;

    // Deterministic for fixed inputs.
    let again = api::encrypt_data(
        &encode_hex(message),
        REFERENCE_IDENTITY_PREIMAGE,
        REFERENCE_EON_KEY,
        &sigma_hex,
    )
    .await?;
    assert_eq!(ciphertext_hex, again);

    let bytes = decode_hex(&ciphertext_hex)?;
    assert_eq!(bytes.len(), 129 + 32);
    assert_eq!(bytes[0], VERSION_ID);

    let envelope = codec::decode(&bytes)?;
    let sigma = sigma_from_slice(&decode_hex(&sigma_hex)?)?;

    let r = compute_r(&sigma, message);
    assert_eq!(envelope.c1, compute_c1(&r));

    // c2 = σ ⊕ H_2(e(r·Q, EK)), with r·Q taken as a BLS signature under r so
    // the exponent is applied in G1 instead of GT.
    let r_key = SecretKey::from_bytes(&r.to_bytes_be()).expect("r is a valid secret key");
    let mut tagged_preimage = vec![IDENTITY_TAG];
    tagged_preimage.extend_from_slice(&decode_hex(REFERENCE_IDENTITY_PREIMAGE)?);
    let r_identity_sig = r_key.sign(&tagged_preimage, IDENTITY_DST, &[]);
    let r_identity = G1Affine::from_bytes(&r_identity_sig.to_bytes())?;
    let eon_key = EonParams::from_hex(REFERENCE_EON_KEY)?.eon_key;

    let mut hasher = Keccak256::new();
    hasher.update([0x02]);
    hasher.update(Gt::pairing(&r_identity, &eon_key).to_bendian());
    let session_key: [u8; 32] = hasher.finalize().into();
    let expected_c2: Vec<u8> = sigma.iter().zip(session_key).map(|(s, k)| s ^ k).collect();
    assert_eq!(envelope.c2.to_vec(), expected_c2);

    // c3 unmasks to the padded message under σ alone.
    let padded = block::apply_keystream(&envelope.c3, &sigma).concat();
    assert_eq!(&padded[..message.len()], message);
    assert!(padded[message.len()..].iter().all(|b| *b == 15));

    Ok(())
}

#[tokio::test]
async fn test_block_keys_follow_minimal_index_encoding() -> Result<()> {
    let keyper = Keyper::generate();
    let preimage = b"long message epoch";
    let message = vec![0xee; 257 * 32 - 1];
    let sigma_hex = random_sigma_hex();

    let ciphertext = api::encrypt_data(
        &encode_hex(&message),
        &encode_hex(preimage),
        &keyper.eon_key_hex(),
        &sigma_hex,
    )
    .await?;
    let envelope = codec::decode_from_hex(&ciphertext)?;
    assert_eq!(envelope.block_count(), 257);

    let sigma = decode_hex(&sigma_hex)?;
    let expected_block = |suffix: &[u8], plain: [u8; 32]| -> [u8; 32] {
        let mut hasher = Keccak256::new();
        hasher.update([0x04]);
        hasher.update(&sigma);
        hasher.update(suffix);
        let key: [u8; 32] = hasher.finalize().into();
        block::xor_block(&key, &plain)
    };

    let mut last_plain = [0xee; 32];
    last_plain[31] = 0x01;
    assert_eq!(envelope.c3[255], expected_block(&[0xff], [0xee; 32]));
    assert_eq!(envelope.c3[256], expected_block(&[0x01, 0x00], last_plain));

    Ok(())
}

#[tokio::test]
async fn test_tampered_envelopes() -> Result<()> {
    let keyper = Keyper::generate();
    let preimage = b"epoch 12";
    let key = keyper.epoch_secret_key_hex(preimage);

    let ciphertext = api::encrypt_data(
        "0x68656c6c6f",
        &encode_hex(preimage),
        &keyper.eon_key_hex(),
        &random_sigma_hex(),
    )
    .await?;
    let bytes = decode_hex(&ciphertext)?;

    let mut wrong_version = bytes.clone();
    wrong_version[0] = 0x02;
    assert!(matches!(
        api::decrypt(&encode_hex(&wrong_version), &key).await,
        Err(ShutterError::UnsupportedVersion(0x02))
    ));

    let ragged = &bytes[..bytes.len() - 1];
    assert!(matches!(
        api::decrypt(&encode_hex(ragged), &key).await,
        Err(ShutterError::LengthMismatch { .. })
    ));

    let header_only = &bytes[..129];
    assert!(api::decrypt(&encode_hex(header_only), &key)
        .await
        .unwrap_err()
        .is_padding());

    let truncated = &bytes[..100];
    assert!(api::decrypt(&encode_hex(truncated), &key)
        .await
        .unwrap_err()
        .is_deserialization());

    Ok(())
}

#[tokio::test]
async fn test_invalid_keys_are_rejected() {
    let sigma = random_sigma_hex();

    let bad_eon_key = format!("0x{}", "00".repeat(95));
    assert!(api::encrypt_data("0x01", "0x01", &bad_eon_key, &sigma)
        .await
        .unwrap_err()
        .is_deserialization());

    assert!(EpochSecretKey::from_hex("0x1234")
        .unwrap_err()
        .is_deserialization());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_operations() -> Result<()> {
    let keyper = std::sync::Arc::new(Keyper::generate());

    let handles: Vec<_> = (0..16u8)
        .map(|i| {
            let keyper = keyper.clone();
            tokio::spawn(async move {
                let preimage = [i; 8];
                let message = vec![i; i as usize * 5];
                let plaintext = roundtrip(&keyper, &preimage, &message).await?;
                anyhow::ensure!(plaintext == message, "roundtrip {i} mismatch");
                Ok::<_, anyhow::Error>(())
            })
        })
        .collect();

    for handle in handles {
        handle.await??;
    }
    Ok(())
}
