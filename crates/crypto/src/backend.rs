//! Process-wide readiness gate for the pairing backend.
//!
//! The first caller runs a one-time self-check of the BLST pairing (a
//! bilinearity check on the generators); concurrent async callers suspend on
//! the same [`OnceCell`] until it completes. Once open, the gate never closes.

use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::curve::{G1Affine, G2Affine, G2Projective, Gt, Scalar};
use crate::error::{Result, ShutterError};

static GATE: OnceCell<()> = OnceCell::const_new();

fn self_check() -> Result<()> {
    let g1 = G1Affine::generator();
    let g2 = G2Affine::generator();
    let base = Gt::pairing(&g1, &g2);

    if base.is_one() || !base.in_group() {
        return Err(ShutterError::Initialization(
            "pairing of the generators is degenerate".into(),
        ));
    }

    let mut three = [0u8; 32];
    three[31] = 3;
    let three = Scalar::from_bytes_be(&three);
    let lhs = Gt::pairing(&g1, &G2Projective::mul_generator(&three).to_affine());
    if lhs != base.pow(&three) {
        return Err(ShutterError::Initialization("pairing is not bilinear".into()));
    }

    Ok(())
}

/// Wait for the backend to be ready, initializing it on first use.
pub async fn ready() -> Result<()> {
    if GATE.initialized() {
        return Ok(());
    }

    debug!("Waiting for pairing backend to initialize");
    GATE.get_or_try_init(|| async {
        self_check()?;
        info!("Pairing backend initialized");
        Ok::<_, ShutterError>(())
    })
    .await?;
    Ok(())
}

/// Synchronous variant of [`ready`] for callers outside an async runtime.
///
/// Never suspends: if another caller is mid-initialization, this one runs the
/// self-check itself and the first to finish opens the gate.
pub fn ensure_ready() -> Result<()> {
    if GATE.initialized() {
        return Ok(());
    }

    self_check()?;
    if GATE.set(()).is_ok() {
        info!("Pairing backend initialized");
    }
    Ok(())
}

/// Whether the gate has already opened.
pub fn is_initialized() -> bool {
    GATE.initialized()
}
