//! Core type definitions for Tipline.
//!
//! This crate defines the fundamental, domain-agnostic types shared by the
//! encryption engine and the report store:
//! - Report identifiers (UUID v7)
//!
//! Domain-specific types (report payloads, sensitive-field descriptors,
//! ciphertext shapes) belong to their respective crates, not here.

mod ids;

pub use ids::ReportId;
