//! Field-level encryption engine for Tipline.
//!
//! Sensitive report attributes (free-text message, geolocation, reporter
//! contact, admin notes) are encrypted individually before they reach the
//! shared document store. Each field gets its own derived key (master
//! secret + fresh random salt, PBKDF2-HMAC-SHA256) and a fresh IV, and is
//! persisted as a self-contained {ciphertext, iv, salt} triple.
//!
//! Layering:
//! - [`key`] — master secret validation, salts, PBKDF2 key derivation
//! - [`cipher`] — ChaCha20-Poly1305 authenticated encryption
//! - [`field`] — the field codec and the [`FieldCipher`] engine
//!
//! Document-level concerns (which fields are sensitive, per-field failure
//! containment, the `is_encrypted` latch) live in `tipline-store`.

pub mod cipher;
mod error;
pub mod field;
pub mod key;

pub use cipher::{CipherText, IV_SIZE, TAG_SIZE, decrypt, encrypt};
pub use error::{CryptoError, CryptoResult};
pub use field::{EncryptedField, FieldCipher, FieldValue};
pub use key::{
    DerivedKey, KEY_SIZE, KdfParams, MIN_SECRET_LEN, MasterSecret, SALT_SIZE, Salt, derive_key,
};
