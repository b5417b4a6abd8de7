//! Ledger domain model.
//!
//! # Responsibility
//! - Define canonical data structures used by store and analytics.
//!
//! # Invariants
//! - Every record is identified by a stable `RecordId`.
//! - Records are never edited after creation; only created or deleted.

pub mod category;
pub mod record;
