//! Core domain logic for the wintally game ledger.
//! This crate is the single source of truth for ledger invariants.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod stats;

pub use logging::{default_log_level, init_logging, logging_status, LoggingConfig, LoggingError};
pub use model::category::{CategorySet, DEFAULT_CATEGORIES};
pub use model::record::{parse_amount, NewRecord, Record, RecordId, RecordValidationError};
pub use repo::ledger_repo::{
    LedgerRepository, RecordsLoad, RepoError, RepoResult, SkippedRecord, SqliteLedgerRepository,
};
pub use service::ledger_service::{LedgerError, LedgerService};
pub use stats::aggregate::{
    category_ranking, category_totals, cumulative_series, magnitude_axis_domain,
    most_significant_category, total_balance, win_count, win_rate, CategoryMagnitude,
    CategoryTotals, CumulativePoint, AXIS_HEADROOM, EMPTY_AXIS_DOMAIN,
};
pub use stats::dashboard::{format_signed_amount, history_order, AmountTone, DashboardSnapshot};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
