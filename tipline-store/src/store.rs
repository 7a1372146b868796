//! Lifecycle middleware around the document store.
//!
//! `ReportStore` wraps any [`DocumentStore`] backend and applies the
//! field transforms on the way through: plaintext sensitive attributes
//! are encrypted before `put`, and stored ciphertext is projected into
//! ephemeral plaintext after `get`. The rest of the application never
//! touches the engine directly.

use crate::error::{StoreError, StoreResult};
use crate::report::StoredReport;
use crate::schema::{SensitiveField, report_fields};
use crate::transform::{EncryptSummary, Projection, decrypt_fields, encrypt_fields};
use std::collections::BTreeMap;
use tipline_crypto::FieldCipher;
use tipline_types::ReportId;

/// The external document-store collaborator.
///
/// The engine assumes the backend preserves exactly the fields it writes
/// (no coercion of the base64 triple members).
pub trait DocumentStore: Send + Sync {
    /// Persists a report, replacing any prior version.
    fn put(&mut self, report: StoredReport) -> StoreResult<()>;

    /// Fetches a report by id.
    fn get(&self, id: ReportId) -> StoreResult<Option<StoredReport>>;

    /// Deletes a report. Returns whether it existed.
    fn delete(&mut self, id: ReportId) -> StoreResult<bool>;

    /// Lists all reports in id (creation) order.
    fn list(&self) -> StoreResult<Vec<StoredReport>>;
}

/// In-memory backend for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    reports: BTreeMap<ReportId, StoredReport>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DocumentStore for MemoryStore {
    fn put(&mut self, report: StoredReport) -> StoreResult<()> {
        self.reports.insert(report.id, report);
        Ok(())
    }

    fn get(&self, id: ReportId) -> StoreResult<Option<StoredReport>> {
        Ok(self.reports.get(&id).cloned())
    }

    fn delete(&mut self, id: ReportId) -> StoreResult<bool> {
        Ok(self.reports.remove(&id).is_some())
    }

    fn list(&self) -> StoreResult<Vec<StoredReport>> {
        Ok(self.reports.values().cloned().collect())
    }
}

/// A report as returned by the read path: the persisted record plus its
/// ephemeral plaintext projection. The projection lives only on this
/// in-memory value and is never written back to the store.
#[derive(Debug, Clone)]
pub struct LoadedReport {
    pub report: StoredReport,
    pub plaintext: Projection,
}

/// Write/read middleware tying the field engine to a backend.
pub struct ReportStore<S: DocumentStore> {
    backend: S,
    cipher: FieldCipher,
    fields: Vec<SensitiveField>,
}

impl<S: DocumentStore> ReportStore<S> {
    /// Creates a store protecting the platform's default report fields.
    pub fn new(backend: S, cipher: FieldCipher) -> Self {
        Self::with_fields(backend, cipher, report_fields())
    }

    /// Creates a store with an explicit sensitive-field set.
    pub fn with_fields(backend: S, cipher: FieldCipher, fields: Vec<SensitiveField>) -> Self {
        Self {
            backend,
            cipher,
            fields,
        }
    }

    /// Persists a report, encrypting any freshly assigned plaintext
    /// sensitive fields in place first.
    ///
    /// The caller's record is mutated to the ciphertext form, so plaintext
    /// survives nowhere once this returns. `is_encrypted` latches to true
    /// as soon as any field has ever been encrypted; a save touching zero
    /// sensitive fields leaves it at its prior value.
    pub fn save(&mut self, report: &mut StoredReport) -> StoreResult<EncryptSummary> {
        let summary = encrypt_fields(&self.cipher, report.id, &mut report.data, &self.fields);
        if summary.any_encrypted() {
            report.is_encrypted = true;
        }
        report.modified_at = chrono::Utc::now().timestamp_millis();
        self.backend.put(report.clone())?;
        Ok(summary)
    }

    /// Loads a report and, when encrypted, attaches its plaintext
    /// projection. The stored ciphertext is returned untouched.
    pub fn load(&self, id: ReportId) -> StoreResult<Option<LoadedReport>> {
        let Some(report) = self.backend.get(id)? else {
            return Ok(None);
        };
        Ok(Some(self.project(report)))
    }

    /// Loads a report, failing when it does not exist.
    pub fn load_required(&self, id: ReportId) -> StoreResult<LoadedReport> {
        self.load(id)?.ok_or(StoreError::NotFound(id))
    }

    /// Loads every report. One undecryptable field — or record — never
    /// aborts the batch; affected fields are simply unavailable in their
    /// projections.
    pub fn load_all(&self) -> StoreResult<Vec<LoadedReport>> {
        let reports = self.backend.list()?;
        Ok(reports.into_iter().map(|r| self.project(r)).collect())
    }

    /// Deletes a report. Returns whether it existed.
    pub fn delete(&mut self, id: ReportId) -> StoreResult<bool> {
        self.backend.delete(id)
    }

    /// Read-only access to the backend (inspection, migration tooling).
    pub fn backend(&self) -> &S {
        &self.backend
    }

    fn project(&self, report: StoredReport) -> LoadedReport {
        let plaintext = if report.is_encrypted {
            decrypt_fields(&self.cipher, report.id, &report.data, &self.fields)
        } else {
            Projection::empty()
        };
        LoadedReport { report, plaintext }
    }
}
