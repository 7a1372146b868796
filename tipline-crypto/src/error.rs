//! Error types for the encryption engine.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur in cryptographic operations.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Master secret shorter than the configured minimum.
    /// Fatal at startup: no engine is constructed from a weak secret.
    #[error("master secret too short: need at least {min} bytes, got {actual}")]
    WeakSecret { min: usize, actual: usize },

    /// Key derivation failed.
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// Encryption failed.
    #[error("encryption failed: {0}")]
    Encryption(String),

    /// Decryption failed (wrong key or tampered data).
    #[error("decryption failed: {0}")]
    Decryption(String),

    /// A ciphertext triple with a missing or malformed member.
    /// Contained identically to a decryption failure.
    #[error("malformed ciphertext triple: {0}")]
    MalformedField(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
