//! Ledger store use-case service.
//!
//! # Responsibility
//! - Own the canonical record collection and category registry.
//! - Expose create/list/delete and persist after every mutation.
//! - Hand immutable views to the analytics layer.
//!
//! # Invariants
//! - Record ids are unique for the lifetime of the collection.
//! - Malformed amounts are rejected before a `Record` exists.
//! - The category registry only grows.
//! - A failed write leaves in-memory state unchanged.
//! - Corrupt persisted blobs degrade to defaults instead of failing load.
//! - Every loaded record's category is present in the registry.

use crate::model::category::CategorySet;
use crate::model::record::{NewRecord, Record, RecordId, RecordValidationError};
use crate::repo::ledger_repo::{LedgerRepository, RepoError, CATEGORIES_KEY, RECORDS_KEY};
use crate::stats::dashboard::{history_order, DashboardSnapshot};
use chrono::NaiveDate;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for ledger use-cases.
#[derive(Debug)]
pub enum LedgerError {
    /// Input was rejected at the creation boundary.
    Validation(RecordValidationError),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for LedgerError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "invalid record: {err}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for LedgerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
        }
    }
}

impl From<RecordValidationError> for LedgerError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for LedgerError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Repo(other),
        }
    }
}

/// In-memory ledger state mirrored to a repository.
pub struct LedgerService<R: LedgerRepository> {
    repo: R,
    records: Vec<Record>,
    categories: CategorySet,
}

impl<R: LedgerRepository> LedgerService<R> {
    /// Loads persisted state, falling back to defaults per blob.
    ///
    /// A missing or unreadable blob yields an empty collection or the
    /// default category set; the failure is logged, not returned.
    /// Individual invalid or repeated entries are dropped and logged, and
    /// every loaded record's category is registered.
    pub fn load(repo: R) -> Self {
        let records = match repo.load_records() {
            Ok(Some(loaded)) => {
                for skipped in &loaded.skipped {
                    warn!(
                        "event=ledger_load module=service status=degraded key={} index={} reason={}",
                        RECORDS_KEY, skipped.index, skipped.reason
                    );
                }
                loaded.records
            }
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(
                    "event=ledger_load module=service status=degraded key={} error={}",
                    RECORDS_KEY, err
                );
                Vec::new()
            }
        };
        let mut categories = match repo.load_categories() {
            Ok(categories) => categories.unwrap_or_default(),
            Err(err) => {
                warn!(
                    "event=ledger_load module=service status=degraded key={} error={}",
                    CATEGORIES_KEY, err
                );
                CategorySet::default()
            }
        };
        for record in &records {
            categories.insert(record.category.as_str());
        }

        info!(
            "event=ledger_load module=service status=ok records={} categories={}",
            records.len(),
            categories.len()
        );

        Self {
            repo,
            records,
            categories,
        }
    }

    /// Appends a new record with a fresh id and registers its category.
    ///
    /// # Errors
    /// - `Validation` when the pending record breaks record invariants.
    /// - `Repo` when persistence fails; state is left untouched.
    pub fn create(&mut self, new_record: NewRecord) -> Result<Record, LedgerError> {
        let record = Record::from_new(new_record);
        record.validate()?;

        let mut records = self.records.clone();
        records.push(record.clone());
        let mut categories = self.categories.clone();
        let category_added = categories.insert(record.category.as_str());

        self.repo.save_snapshot(&records, &categories)?;
        self.records = records;
        self.categories = categories;

        info!(
            "event=record_create module=service status=ok records={} category_added={}",
            self.records.len(),
            category_added
        );
        Ok(record)
    }

    /// Creation boundary for raw user input.
    ///
    /// Non-numeric or non-finite amount text is rejected and no record is
    /// produced.
    pub fn create_from_input(
        &mut self,
        amount_text: &str,
        date: NaiveDate,
        category: &str,
        note: Option<String>,
    ) -> Result<Record, LedgerError> {
        let pending = NewRecord::parse(amount_text, date, category, note).map_err(|err| {
            warn!(
                "event=record_create module=service status=rejected error_code=invalid_input error={}",
                err
            );
            err
        })?;
        self.create(pending)
    }

    /// Removes the record with `id`.
    ///
    /// Returns `Ok(false)` without writing when no such record exists.
    pub fn delete(&mut self, id: RecordId) -> Result<bool, LedgerError> {
        let Some(index) = self.records.iter().position(|record| record.id == id) else {
            return Ok(false);
        };

        let mut records = self.records.clone();
        records.remove(index);
        self.repo.save_snapshot(&records, &self.categories)?;
        self.records = records;

        info!(
            "event=record_delete module=service status=ok records={}",
            self.records.len()
        );
        Ok(true)
    }

    /// Full current collection in insertion order.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Looks up one record by id.
    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Records ordered for history display (newest date first).
    pub fn history(&self) -> Vec<&Record> {
        history_order(&self.records)
    }

    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    /// Re-derives every dashboard view from the current collection.
    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot::from_records(&self.records)
    }
}
