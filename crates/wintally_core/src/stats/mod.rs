//! Ledger analytics.
//!
//! # Responsibility
//! - Turn a record collection into summary figures and chart-ready series.
//! - Stay stateless: callers pass the full collection on every call.

pub mod aggregate;
pub mod dashboard;
