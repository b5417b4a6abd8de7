//! Ledger database bootstrap.
//!
//! A ledger lives in one SQLite file (or an in-memory connection in tests).
//! Opening it always brings the schema up to `migrations::latest_version()`;
//! a file written by a newer binary is refused instead of being reinterpreted.

use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failures while opening or upgrading a ledger database.
#[derive(Debug)]
pub enum DbError {
    /// Parent directory of the ledger file could not be created.
    Io(std::io::Error),
    Sqlite(rusqlite::Error),
    /// One upgrade step failed; earlier steps stay committed.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// The file carries a schema this binary does not know.
    SchemaTooNew { found: u32, supported: u32 },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "ledger path is not usable: {err}"),
            Self::Sqlite(err) => write!(f, "sqlite error: {err}"),
            Self::Migration { version, source } => {
                write!(f, "ledger schema upgrade to v{version} failed: {source}")
            }
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "ledger schema v{found} was written by a newer wintally (this build reads up to v{supported})"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<std::io::Error> for DbError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Schema version recorded in the file header (`PRAGMA user_version`).
pub fn schema_version(conn: &Connection) -> DbResult<u32> {
    Ok(conn.pragma_query_value(None, "user_version", |row| row.get(0))?)
}
