//! Field-independent document transforms.
//!
//! `encrypt_fields` replaces plaintext sensitive attributes with their
//! ciphertext triples; `decrypt_fields` produces a best-effort plaintext
//! projection. Both are field-independent: one field's failure never
//! stops processing of the others. That containment is what keeps a
//! single corrupt attribute from making an entire historical report
//! unreadable.

use crate::schema::{FieldKind, SensitiveField};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tipline_crypto::{EncryptedField, FieldCipher, FieldValue};
use tipline_types::ReportId;
use tracing::{error, warn};

/// Outcome of encrypting one document's sensitive fields.
#[derive(Debug, Clone, Default)]
pub struct EncryptSummary {
    /// Fields replaced with ciphertext triples.
    pub encrypted: Vec<String>,
    /// Fields that failed to encrypt. Their plaintext was removed from
    /// the document rather than persisted unprotected.
    pub failed: Vec<String>,
}

impl EncryptSummary {
    /// True when at least one field was encrypted.
    pub fn any_encrypted(&self) -> bool {
        !self.encrypted.is_empty()
    }
}

/// The tagged per-field result of a plaintext projection.
///
/// `Unavailable` marks "present but unrecoverable" — distinct from a
/// field that is simply absent (which never enters the projection).
#[derive(Debug, Clone, PartialEq)]
pub enum FieldOutcome {
    /// Successfully decrypted.
    Decrypted(FieldValue),
    /// Ciphertext present but unrecoverable (corrupt, tampered, or a
    /// malformed triple). Callers must render this as "content
    /// unavailable", never as user content.
    Unavailable,
}

impl FieldOutcome {
    /// The decrypted value, if available.
    pub fn value(&self) -> Option<&FieldValue> {
        match self {
            Self::Decrypted(v) => Some(v),
            Self::Unavailable => None,
        }
    }

    /// True when decryption failed.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Unavailable)
    }
}

/// The ephemeral plaintext projection of one report.
///
/// Produced only by the read path and attached to the in-memory record;
/// never persisted, never written back into the ciphertext fields.
#[derive(Debug, Clone, Default)]
pub struct Projection {
    fields: BTreeMap<String, FieldOutcome>,
}

impl Projection {
    /// An empty projection (for records with nothing encrypted).
    pub fn empty() -> Self {
        Self::default()
    }

    /// The outcome for one field, or `None` when the field was absent
    /// from the stored document.
    pub fn get(&self, name: &str) -> Option<&FieldOutcome> {
        self.fields.get(name)
    }

    /// Shorthand: the decrypted text of a field, if available.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name)?.value()?.as_text()
    }

    /// Shorthand: the decrypted structured value of a field, if available.
    pub fn structured(&self, name: &str) -> Option<&Value> {
        self.get(name)?.value()?.as_structured()
    }

    /// True when the field was present but failed to decrypt.
    pub fn is_unavailable(&self, name: &str) -> bool {
        self.get(name).is_some_and(FieldOutcome::is_unavailable)
    }

    /// Number of fields in the projection.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when no sensitive fields were present.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over (field name, outcome) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldOutcome)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub(crate) fn insert(&mut self, name: String, outcome: FieldOutcome) {
        self.fields.insert(name, outcome);
    }
}

fn plaintext_value(field: &SensitiveField, value: &Value) -> FieldValue {
    match (field.kind(), value) {
        (FieldKind::Text, Value::String(s)) => FieldValue::Text(s.clone()),
        // A structured field, or a text field holding a non-string value:
        // serialize the JSON as-is.
        _ => FieldValue::Structured(value.clone()),
    }
}

fn skip_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Encrypts every declared sensitive field that carries a plaintext value
/// in `data`, replacing it with a `{name}_encrypted` ciphertext triple
/// and removing the plaintext key.
///
/// Absent and empty fields are left untouched. Already-encrypted entries
/// without a fresh plaintext assignment are not re-encrypted.
pub fn encrypt_fields(
    cipher: &FieldCipher,
    id: ReportId,
    data: &mut Map<String, Value>,
    fields: &[SensitiveField],
) -> EncryptSummary {
    let mut summary = EncryptSummary::default();

    for field in fields {
        let Some(value) = data.get(field.name()) else {
            continue;
        };
        if skip_empty(value) {
            continue;
        }

        let plaintext = plaintext_value(field, value);
        match cipher
            .encode_field(&plaintext)
            .and_then(|e| e.to_value())
        {
            Ok(triple) => {
                data.insert(field.encrypted_key(), triple);
                data.remove(field.name());
                summary.encrypted.push(field.name().to_string());
            }
            Err(err) => {
                // Plaintext must never reach the store; drop the value.
                data.remove(field.name());
                error!(report = %id, field = field.name(), error = %err,
                    "failed to encrypt field, dropping plaintext");
                summary.failed.push(field.name().to_string());
            }
        }
    }

    summary
}

/// Decrypts every ciphertext triple present in `data` into a plaintext
/// projection, best-effort.
///
/// A field that fails to decrypt — wrong key, tampered bytes, or a
/// malformed triple — is marked [`FieldOutcome::Unavailable`] and logged
/// with the report id and field name (never the ciphertext or key); the
/// remaining fields are unaffected. This function does not fail.
pub fn decrypt_fields(
    cipher: &FieldCipher,
    id: ReportId,
    data: &Map<String, Value>,
    fields: &[SensitiveField],
) -> Projection {
    let mut projection = Projection::empty();

    for field in fields {
        let Some(raw) = data.get(&field.encrypted_key()) else {
            continue;
        };

        let outcome = match EncryptedField::from_value(raw)
            .and_then(|triple| cipher.decode_field(&triple))
        {
            Ok(value) => FieldOutcome::Decrypted(value),
            Err(err) => {
                warn!(report = %id, field = field.name(), error = %err,
                    "failed to decrypt field, marking unavailable");
                FieldOutcome::Unavailable
            }
        };

        projection.insert(field.name().to_string(), outcome);
    }

    projection
}
