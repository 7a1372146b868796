//! Error types for the store layer.

use thiserror::Error;
use tipline_types::ReportId;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
///
/// Per-field decrypt failures are NOT errors at this level; they are
/// contained inside the projection (see `FieldOutcome::Unavailable`).
#[derive(Debug, Error)]
pub enum StoreError {
    /// Crypto failure outside the per-field containment boundary.
    #[error("crypto error: {0}")]
    Crypto(#[from] tipline_crypto::CryptoError),

    /// Report not found.
    #[error("report not found: {0}")]
    NotFound(ReportId),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Backend storage failure.
    #[error("backend error: {0}")]
    Backend(String),
}
