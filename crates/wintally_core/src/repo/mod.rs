//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the storage contract used by the ledger store.
//! - Isolate SQLite and JSON encoding details from service orchestration.
//!
//! # Invariants
//! - Repository writes must enforce `Record::validate()` before persistence.
//! - Repository reads surface corrupt data as `RepoError::InvalidData`.

pub mod ledger_repo;
