//! Key derivation and secret handling.
//!
//! Derives per-operation encryption keys from the master secret using
//! PBKDF2-HMAC-SHA256 with a random salt per field per write.

use crate::error::{CryptoError, CryptoResult};
use rand::RngCore;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of encryption keys in bytes (256 bits).
pub const KEY_SIZE: usize = 32;

/// Size of derivation salts in bytes.
pub const SALT_SIZE: usize = 16;

/// Minimum master secret length in bytes. Shorter secrets are rejected
/// at construction, before any report traffic is served.
pub const MIN_SECRET_LEN: usize = 16;

/// The master secret, validated once at process start.
///
/// Zeroized on drop. Never logged; `Debug` redacts the contents.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct MasterSecret {
    bytes: Vec<u8>,
}

impl MasterSecret {
    /// Validates and wraps the externally supplied secret.
    ///
    /// Returns [`CryptoError::WeakSecret`] when the secret is shorter than
    /// [`MIN_SECRET_LEN`] bytes.
    pub fn new(secret: impl Into<Vec<u8>>) -> CryptoResult<Self> {
        let bytes = secret.into();
        if bytes.len() < MIN_SECRET_LEN {
            return Err(CryptoError::WeakSecret {
                min: MIN_SECRET_LEN,
                actual: bytes.len(),
            });
        }
        Ok(Self { bytes })
    }

    /// Returns the secret bytes for key derivation.
    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for MasterSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterSecret")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// A derived encryption key with automatic zeroization on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    bytes: [u8; KEY_SIZE],
}

impl DerivedKey {
    /// Creates a derived key from raw bytes.
    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self { bytes }
    }

    /// Returns the key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.bytes
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Salt for key derivation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Salt {
    bytes: [u8; SALT_SIZE],
}

impl Salt {
    /// Generates a random salt from the OS CSPRNG.
    pub fn random() -> Self {
        let mut bytes = [0u8; SALT_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut bytes);
        Self { bytes }
    }

    /// Creates a salt from raw bytes.
    pub fn from_bytes(bytes: [u8; SALT_SIZE]) -> Self {
        Self { bytes }
    }

    /// Creates a salt from a stored byte slice.
    ///
    /// Returns [`CryptoError::MalformedField`] when the slice is not
    /// exactly [`SALT_SIZE`] bytes.
    pub fn from_slice(slice: &[u8]) -> CryptoResult<Self> {
        let bytes: [u8; SALT_SIZE] = slice.try_into().map_err(|_| {
            CryptoError::MalformedField(format!(
                "salt must be {SALT_SIZE} bytes, got {}",
                slice.len()
            ))
        })?;
        Ok(Self { bytes })
    }

    /// Returns the salt bytes.
    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.bytes
    }
}

/// Key derivation parameters.
#[derive(Clone, Debug)]
pub struct KdfParams {
    /// PBKDF2 iteration count.
    pub iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        // Matches the deployed reference configuration. Derivation happens
        // once per field per operation, so the count bounds per-request cost.
        Self { iterations: 1000 }
    }
}

/// Derives a 256-bit encryption key from the master secret and a salt
/// using PBKDF2-HMAC-SHA256.
///
/// Deterministic in (secret, salt, iterations); safe to call concurrently.
pub fn derive_key(
    secret: &MasterSecret,
    salt: &Salt,
    params: &KdfParams,
) -> CryptoResult<DerivedKey> {
    if params.iterations == 0 {
        return Err(CryptoError::KeyDerivation(
            "iteration count must be non-zero".to_string(),
        ));
    }

    let mut key_bytes = [0u8; KEY_SIZE];
    pbkdf2::pbkdf2_hmac::<Sha256>(
        secret.as_bytes(),
        salt.as_bytes(),
        params.iterations,
        &mut key_bytes,
    );

    Ok(DerivedKey::from_bytes(key_bytes))
}
