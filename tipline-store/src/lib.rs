//! Encrypted report store middleware for Tipline.
//!
//! Sits between the application and the document store and makes
//! field-level encryption transparent:
//!
//! - Write path: [`ReportStore::save`] encrypts every freshly assigned
//!   sensitive attribute into a `{name}_encrypted` ciphertext triple and
//!   latches the report's `is_encrypted` flag.
//! - Read path: [`ReportStore::load`] projects stored ciphertext into an
//!   ephemeral [`Projection`] of plaintext values, per field and
//!   best-effort — a corrupt field becomes [`FieldOutcome::Unavailable`]
//!   while its siblings decrypt normally.
//!
//! Which attributes are sensitive is declared up front via
//! [`SensitiveField`] descriptors; [`report_fields`] is the platform
//! default (message, location, reporter contact, admin notes).

mod error;
mod report;
mod schema;
mod store;
mod transform;

pub use error::{StoreError, StoreResult};
pub use report::StoredReport;
pub use schema::{FieldKind, SensitiveField, report_fields};
pub use store::{DocumentStore, LoadedReport, MemoryStore, ReportStore};
pub use transform::{EncryptSummary, FieldOutcome, Projection, decrypt_fields, encrypt_fields};
