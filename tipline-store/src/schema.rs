//! Sensitive-field descriptors.
//!
//! The set of fields to protect is declared explicitly, each with the
//! value kind the caller stores there. The transform consumes these
//! descriptors instead of reflecting over document keys.

/// The value kind a sensitive field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text (report message, contact info, notes).
    Text,
    /// Structured JSON (geolocation, tag lists).
    Structured,
}

/// Declares one sensitive field by name and kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensitiveField {
    name: String,
    kind: FieldKind,
}

impl SensitiveField {
    /// Shorthand for a text field.
    pub fn text(name: &str) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Text,
        }
    }

    /// Shorthand for a structured field.
    pub fn structured(name: &str) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Structured,
        }
    }

    /// The plaintext key in the document.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The declared value kind.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// The key the ciphertext triple is persisted under.
    pub fn encrypted_key(&self) -> String {
        format!("{}_encrypted", self.name)
    }
}

/// The platform's default sensitive-field set for reports.
pub fn report_fields() -> Vec<SensitiveField> {
    vec![
        SensitiveField::text("message"),
        SensitiveField::structured("location"),
        SensitiveField::text("reporter_contact"),
        SensitiveField::text("admin_notes"),
    ]
}
