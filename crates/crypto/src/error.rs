//! Error types for Shutter encryption and decryption.

use thiserror::Error;

/// Errors that can occur while encrypting or decrypting.
#[derive(Debug, Error)]
pub enum ShutterError {
    #[error("Unsupported envelope version: {0:#04x}")]
    UnsupportedVersion(u8),

    #[error("Invalid G1 point encoding: {0}")]
    InvalidG1Point(String),

    #[error("Invalid G2 point encoding: {0}")]
    InvalidG2Point(String),

    #[error("Deserialization failed: {0}")]
    Deserialization(String),

    #[error("Length mismatch: expected {expected} bytes, got {got}")]
    LengthMismatch { expected: usize, got: usize },

    #[error("Invalid padding length: {0}")]
    InvalidPadding(u8),

    #[error("Nothing to unpad")]
    EmptyPlaintext,

    #[error("Pairing backend failed to initialize: {0}")]
    Initialization(String),

    #[error("Invalid hex input: {0}")]
    InvalidHex(String),
}

impl ShutterError {
    /// Whether this error comes from malformed point, scalar or envelope bytes.
    pub fn is_deserialization(&self) -> bool {
        matches!(
            self,
            Self::InvalidG1Point(_) | Self::InvalidG2Point(_) | Self::Deserialization(_)
        )
    }

    /// Whether this error comes from a bad padding trailer.
    pub fn is_padding(&self) -> bool {
        matches!(self, Self::InvalidPadding(_) | Self::EmptyPlaintext)
    }
}

impl From<hex::FromHexError> for ShutterError {
    fn from(err: hex::FromHexError) -> Self {
        Self::InvalidHex(err.to_string())
    }
}

/// Result alias used throughout this crate.
pub type Result<T> = std::result::Result<T, ShutterError>;
