//! The persisted report record.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tipline_types::ReportId;

/// A report as it lives in the document store.
///
/// `data` holds the document payload. Sensitive attributes appear in it
/// either as plaintext keys (freshly assigned, not yet saved) or as
/// `{name}_encrypted` ciphertext triples (persisted form) — never both
/// after a save.
///
/// `is_encrypted` is a one-way latch: set the first time any sensitive
/// field is encrypted and never unset for the lifetime of the report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredReport {
    pub id: ReportId,
    pub data: Map<String, Value>,
    pub is_encrypted: bool,
    pub created_at: i64,
    pub modified_at: i64,
}

impl StoredReport {
    /// Creates a new, not-yet-persisted report from a plaintext payload.
    pub fn new(data: Map<String, Value>) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        Self {
            id: ReportId::new(),
            data,
            is_encrypted: false,
            created_at: now,
            modified_at: now,
        }
    }

    /// Assigns a plaintext value to a field. The next save re-encrypts it
    /// with a fresh salt and IV, even if the value is unchanged.
    pub fn set_field(&mut self, name: &str, value: Value) {
        self.data.insert(name.to_string(), value);
    }

    /// Returns a field value from the payload.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }
}
