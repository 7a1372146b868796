//! Per-field envelope encryption.
//!
//! Each sensitive field is encrypted under its own key, derived from the
//! master secret and a fresh random salt, with a fresh IV. The resulting
//! ciphertext triple {ciphertext, iv, salt} is self-contained: the salt
//! stored with the field is all the engine needs (besides the master
//! secret) to decrypt it later.

use crate::cipher;
use crate::error::{CryptoError, CryptoResult};
use crate::key::{KdfParams, MasterSecret, Salt, derive_key};
use serde::{Deserialize, Serialize};
use serde_json::Value;

mod b64 {
    use base64::{Engine, engine::general_purpose::STANDARD};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

/// A persisted ciphertext triple.
///
/// All three members are required: a triple missing any of them does not
/// deserialize and is treated as corrupt, never coerced. Bytes serialize
/// as base64 strings so the triple survives any JSON-preserving store.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EncryptedField {
    #[serde(with = "b64")]
    pub ciphertext: Vec<u8>,
    #[serde(with = "b64")]
    pub iv: Vec<u8>,
    #[serde(with = "b64")]
    pub salt: Vec<u8>,
}

impl EncryptedField {
    /// Serializes the triple to a JSON value for embedding in a document.
    pub fn to_value(&self) -> CryptoResult<Value> {
        Ok(serde_json::to_value(self)?)
    }

    /// Reads a triple back out of a document value.
    ///
    /// A missing member, a non-base64 member, or a non-object value all
    /// yield [`CryptoError::MalformedField`].
    pub fn from_value(value: &Value) -> CryptoResult<Self> {
        serde_json::from_value(value.clone())
            .map_err(|e| CryptoError::MalformedField(e.to_string()))
    }
}

/// A decrypted field value.
///
/// The triple records nothing about the original type; [`FieldCipher::decode_field`]
/// recovers `Structured` only when the plaintext parses as a JSON object
/// or array, otherwise the value is `Text`.
#[derive(Clone, Debug, PartialEq)]
pub enum FieldValue {
    Text(String),
    Structured(Value),
}

impl FieldValue {
    /// Returns the text content, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Structured(_) => None,
        }
    }

    /// Returns the structured content, if this is a structured value.
    pub fn as_structured(&self) -> Option<&Value> {
        match self {
            Self::Text(_) => None,
            Self::Structured(v) => Some(v),
        }
    }

    /// Canonical plaintext bytes: raw UTF-8 for text, compact JSON for
    /// structured values.
    fn to_bytes(&self) -> CryptoResult<Vec<u8>> {
        match self {
            Self::Text(s) => Ok(s.as_bytes().to_vec()),
            Self::Structured(v) => Ok(serde_json::to_vec(v)?),
        }
    }

    fn from_plaintext(bytes: Vec<u8>) -> CryptoResult<Self> {
        let text = String::from_utf8(bytes)
            .map_err(|e| CryptoError::Decryption(format!("invalid UTF-8: {e}")))?;
        if let Ok(value) = serde_json::from_str::<Value>(&text) {
            if value.is_object() || value.is_array() {
                return Ok(Self::Structured(value));
            }
        }
        Ok(Self::Text(text))
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// The per-field encryption engine.
///
/// Owns the validated master secret and derivation parameters. All
/// operations are pure functions of their inputs plus fresh randomness;
/// a single instance is shared by reference across threads.
#[derive(Clone, Debug)]
pub struct FieldCipher {
    secret: MasterSecret,
    params: KdfParams,
}

impl FieldCipher {
    /// Creates an engine with default derivation parameters.
    pub fn new(secret: MasterSecret) -> Self {
        Self::with_params(secret, KdfParams::default())
    }

    /// Creates an engine with explicit derivation parameters.
    pub fn with_params(secret: MasterSecret, params: KdfParams) -> Self {
        Self { secret, params }
    }

    /// Encrypts a field value into a self-contained ciphertext triple.
    ///
    /// A fresh salt and IV are drawn per call, so encoding the same value
    /// twice yields two different triples.
    pub fn encode_field(&self, value: &FieldValue) -> CryptoResult<EncryptedField> {
        let salt = Salt::random();
        let key = derive_key(&self.secret, &salt, &self.params)?;
        let plaintext = value.to_bytes()?;
        let sealed = cipher::encrypt(&key, &plaintext)?;

        Ok(EncryptedField {
            ciphertext: sealed.bytes,
            iv: sealed.iv.to_vec(),
            salt: salt.as_bytes().to_vec(),
        })
    }

    /// Decrypts a ciphertext triple back into a field value.
    ///
    /// Propagates [`CryptoError::Decryption`] and
    /// [`CryptoError::MalformedField`] unchanged; containment is the
    /// caller's decision.
    pub fn decode_field(&self, field: &EncryptedField) -> CryptoResult<FieldValue> {
        let salt = Salt::from_slice(&field.salt)?;
        let key = derive_key(&self.secret, &salt, &self.params)?;
        let plaintext = cipher::decrypt(&key, &field.iv, &field.ciphertext)?;
        FieldValue::from_plaintext(plaintext)
    }
}
