//! Ledger schema upgrades.
//!
//! Each step runs in its own transaction together with the
//! `user_version` bump, so an interrupted upgrade resumes at the first
//! step that did not commit.
//!
//! - v1: `ledger_blobs` key/value table.
//! - v2: rename blobs saved under the browser-era storage keys.

use crate::db::{schema_version, DbError, DbResult};
use log::{info, warn};
use rusqlite::{params, Connection, Transaction};

type StepFn = fn(&Transaction<'_>) -> rusqlite::Result<()>;

struct Step {
    version: u32,
    name: &'static str,
    run: StepFn,
}

const STEPS: &[Step] = &[
    Step {
        version: 1,
        name: "create_ledger_blobs",
        run: create_ledger_blobs,
    },
    Step {
        version: 2,
        name: "rename_legacy_keys",
        run: rename_legacy_keys,
    },
];

/// Blob keys used before the ledger moved into SQLite, with their
/// current names. Pinned here so later key changes never rewrite history.
const LEGACY_KEYS: &[(&str, &str)] = &[
    ("cutting_edge_results_records_v1", "records_v1"),
    ("cutting_edge_results_categories_v1", "categories_v1"),
];

/// Highest schema version this build can read and write.
pub fn latest_version() -> u32 {
    STEPS.last().map_or(0, |step| step.version)
}

/// Brings `conn` up to `latest_version()`.
///
/// # Errors
/// - `SchemaTooNew` when the file is ahead of this build.
/// - `Migration` naming the first step that failed.
pub fn apply_migrations(conn: &mut Connection) -> DbResult<()> {
    let found = schema_version(conn)?;
    let supported = latest_version();
    if found > supported {
        return Err(DbError::SchemaTooNew { found, supported });
    }

    for step in STEPS.iter().filter(|step| step.version > found) {
        run_step(conn, step).map_err(|source| {
            warn!(
                "event=db_migrate module=db status=error version={} step={} error={}",
                step.version, step.name, source
            );
            DbError::Migration {
                version: step.version,
                source,
            }
        })?;
        info!(
            "event=db_migrate module=db status=ok version={} step={}",
            step.version, step.name
        );
    }
    Ok(())
}

fn run_step(conn: &mut Connection, step: &Step) -> rusqlite::Result<()> {
    let tx = conn.transaction()?;
    (step.run)(&tx)?;
    tx.pragma_update(None, "user_version", step.version)?;
    tx.commit()
}

fn create_ledger_blobs(tx: &Transaction<'_>) -> rusqlite::Result<()> {
    tx.execute_batch(include_str!("0001_init.sql"))
}

fn rename_legacy_keys(tx: &Transaction<'_>) -> rusqlite::Result<()> {
    for (legacy, current) in LEGACY_KEYS {
        // A blob already saved under the current key wins; the legacy row stays.
        let renamed = tx.execute(
            "UPDATE OR IGNORE ledger_blobs SET key = ?2 WHERE key = ?1;",
            params![legacy, current],
        )?;
        if renamed > 0 {
            info!(
                "event=db_migrate module=db status=renamed from_key={} to_key={}",
                legacy, current
            );
        }
    }
    Ok(())
}
