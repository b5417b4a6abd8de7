//! Ledger repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist the record collection and the category registry as JSON blobs.
//! - Keep SQL and wire encoding inside the persistence boundary.
//!
//! # Invariants
//! - Write paths validate every record before persisting.
//! - Records and categories are written together in one transaction.
//! - A records blob that is not a JSON array is rejected as a whole.
//! - Inside a readable array, invalid entries and repeated ids are skipped
//!   one by one; the first occurrence of an id wins.

use crate::db::DbError;
use crate::model::category::CategorySet;
use crate::model::record::{Record, RecordId, RecordValidationError};
use rusqlite::{params, Connection, OptionalExtension};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Blob key holding the JSON record array.
pub const RECORDS_KEY: &str = "records_v1";
/// Blob key holding the JSON category label array.
pub const CATEGORIES_KEY: &str = "categories_v1";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for ledger persistence.
#[derive(Debug)]
pub enum RepoError {
    Validation(RecordValidationError),
    Db(DbError),
    InvalidData { key: &'static str, message: String },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidData { key, message } => {
                write!(f, "invalid persisted ledger data in `{key}`: {message}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            Self::InvalidData { .. } => None,
        }
    }
}

impl From<RecordValidationError> for RepoError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// One persisted entry left out of a load.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedRecord {
    /// Position in the stored array.
    pub index: usize,
    pub reason: String,
}

/// Result of decoding the records blob.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordsLoad {
    /// Valid records with unique ids, in stored order.
    pub records: Vec<Record>,
    pub skipped: Vec<SkippedRecord>,
}

/// Storage contract for the ledger store.
pub trait LedgerRepository {
    /// Loads the record collection; `None` when nothing was saved yet.
    fn load_records(&self) -> RepoResult<Option<RecordsLoad>>;
    /// Loads the category registry; `None` when nothing was saved yet.
    fn load_categories(&self) -> RepoResult<Option<CategorySet>>;
    /// Replaces both blobs atomically.
    fn save_snapshot(&mut self, records: &[Record], categories: &CategorySet) -> RepoResult<()>;
}

/// SQLite-backed ledger repository over the `ledger_blobs` table.
pub struct SqliteLedgerRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteLedgerRepository<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    fn read_blob(&self, key: &'static str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM ledger_blobs WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }
}

impl LedgerRepository for SqliteLedgerRepository<'_> {
    fn load_records(&self) -> RepoResult<Option<RecordsLoad>> {
        match self.read_blob(RECORDS_KEY)? {
            Some(json) => decode_records(&json).map(Some),
            None => Ok(None),
        }
    }

    fn load_categories(&self) -> RepoResult<Option<CategorySet>> {
        match self.read_blob(CATEGORIES_KEY)? {
            Some(json) => decode_blob(CATEGORIES_KEY, &json).map(Some),
            None => Ok(None),
        }
    }

    fn save_snapshot(&mut self, records: &[Record], categories: &CategorySet) -> RepoResult<()> {
        for record in records {
            record.validate()?;
        }
        let records_json = encode_blob(RECORDS_KEY, records)?;
        let categories_json = encode_blob(CATEGORIES_KEY, categories)?;

        let tx = self.conn.transaction()?;
        for (key, value) in [(RECORDS_KEY, records_json), (CATEGORIES_KEY, categories_json)] {
            tx.execute(
                "INSERT INTO ledger_blobs (key, value, updated_at)
                 VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at;",
                params![key, value],
            )?;
        }
        tx.commit()?;

        Ok(())
    }
}

fn decode_records(json: &str) -> RepoResult<RecordsLoad> {
    let entries: Vec<serde_json::Value> = decode_blob(RECORDS_KEY, json)?;
    let mut seen: HashSet<RecordId> = HashSet::with_capacity(entries.len());
    let mut load = RecordsLoad::default();

    for (index, entry) in entries.into_iter().enumerate() {
        match serde_json::from_value::<Record>(entry) {
            Ok(record) if seen.insert(record.id) => load.records.push(record),
            Ok(record) => load.skipped.push(SkippedRecord {
                index,
                reason: format!("duplicate id {}", record.id),
            }),
            Err(err) => load.skipped.push(SkippedRecord {
                index,
                reason: err.to_string(),
            }),
        }
    }

    Ok(load)
}

fn decode_blob<T: serde::de::DeserializeOwned>(key: &'static str, json: &str) -> RepoResult<T> {
    serde_json::from_str(json).map_err(|err| RepoError::InvalidData {
        key,
        message: err.to_string(),
    })
}

fn encode_blob<T: serde::Serialize + ?Sized>(key: &'static str, value: &T) -> RepoResult<String> {
    serde_json::to_string(value).map_err(|err| RepoError::InvalidData {
        key,
        message: err.to_string(),
    })
}
