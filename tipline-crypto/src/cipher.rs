//! Authenticated encryption using ChaCha20-Poly1305.
//!
//! The observed legacy scheme used an unauthenticated block mode, so
//! tampering decrypted to garbage instead of failing. An AEAD mode makes
//! corruption and wrong-key decryption fail deterministically, which the
//! field-containment layer depends on.

use crate::error::{CryptoError, CryptoResult};
use crate::key::DerivedKey;
use chacha20poly1305::{
    ChaCha20Poly1305, Nonce,
    aead::{Aead, KeyInit},
};
use rand::RngCore;

/// Size of the IV (nonce) in bytes (96 bits for ChaCha20-Poly1305).
pub const IV_SIZE: usize = 12;

/// Size of the authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// Output of a single encryption: the fresh IV and the ciphertext
/// (which includes the auth tag).
#[derive(Clone, Debug)]
pub struct CipherText {
    pub iv: [u8; IV_SIZE],
    pub bytes: Vec<u8>,
}

/// Encrypts plaintext under `key` with a fresh random IV.
///
/// The IV comes from the OS CSPRNG on every call; two encryptions of the
/// same plaintext never share an IV.
pub fn encrypt(key: &DerivedKey, plaintext: &[u8]) -> CryptoResult<CipherText> {
    let cipher = ChaCha20Poly1305::new(key.as_bytes().into());

    let mut iv = [0u8; IV_SIZE];
    rand::rngs::OsRng.fill_bytes(&mut iv);
    let nonce = Nonce::from_slice(&iv);

    let bytes = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| CryptoError::Encryption(e.to_string()))?;

    Ok(CipherText { iv, bytes })
}

/// Decrypts ciphertext under `key` and the IV it was encrypted with.
///
/// Fails with [`CryptoError::Decryption`] on a wrong key or any tampering
/// with the ciphertext, and with [`CryptoError::MalformedField`] when the
/// IV has the wrong length.
pub fn decrypt(key: &DerivedKey, iv: &[u8], ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
    if iv.len() != IV_SIZE {
        return Err(CryptoError::MalformedField(format!(
            "iv must be {IV_SIZE} bytes, got {}",
            iv.len()
        )));
    }
    if ciphertext.len() < TAG_SIZE {
        return Err(CryptoError::MalformedField(format!(
            "ciphertext shorter than auth tag ({} bytes)",
            ciphertext.len()
        )));
    }

    let cipher = ChaCha20Poly1305::new(key.as_bytes().into());
    let nonce = Nonce::from_slice(iv);

    cipher.decrypt(nonce, ciphertext).map_err(|_| {
        CryptoError::Decryption("decryption failed (wrong key or tampered data)".to_string())
    })
}
