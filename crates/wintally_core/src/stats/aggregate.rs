//! Aggregations over a full record collection.
//!
//! # Responsibility
//! - Derive balance, win rate, per-category totals and chart series.
//!
//! # Invariants
//! - Every function is pure and total over validated records.
//! - Inputs are never mutated; each call re-derives from scratch.
//! - `sum(category_totals) == total_balance` up to float summation order.

use crate::model::record::Record;
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::Serialize;

/// Headroom applied to the largest category magnitude on the chart axis.
pub const AXIS_HEADROOM: f64 = 1.05;

/// Axis domain used when there are no categories to plot.
pub const EMPTY_AXIS_DOMAIN: (f64, f64) = (0.0, 100.0);

/// Net value per category, ordered by first appearance in the input.
pub type CategoryTotals = IndexMap<String, f64>;

/// One bar of the category ranking chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryMagnitude {
    pub label: String,
    /// Signed net total, used for labels and gain/loss tone.
    pub net_value: f64,
    /// `|net_value|`, used for bar length and ordering.
    pub magnitude: f64,
}

/// One point of the balance-over-time trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CumulativePoint {
    pub date: NaiveDate,
    /// Running sum of amounts up to and including this record.
    pub value: f64,
}

/// Sum of all amounts; `0.0` for an empty collection.
pub fn total_balance(records: &[Record]) -> f64 {
    records.iter().map(|record| record.amount).sum()
}

/// Number of records with a strictly positive amount.
pub fn win_count(records: &[Record]) -> usize {
    records.iter().filter(|record| record.is_win()).count()
}

/// Percentage of winning records, rounded to one decimal place.
///
/// Zero-amount records count toward the total but not as wins. Returns
/// `0.0` for an empty collection.
pub fn win_rate(records: &[Record]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let percent = win_count(records) as f64 / records.len() as f64 * 100.0;
    (percent * 10.0).round() / 10.0
}

/// Groups records by category and sums their amounts.
///
/// Only categories that occur in `records` are present.
pub fn category_totals(records: &[Record]) -> CategoryTotals {
    let mut totals = CategoryTotals::new();
    for record in records {
        *totals.entry(record.category.clone()).or_insert(0.0) += record.amount;
    }
    totals
}

/// Ranks categories by magnitude, largest first.
///
/// The sort is stable, so equal magnitudes keep first-appearance order.
pub fn category_ranking(totals: &CategoryTotals) -> Vec<CategoryMagnitude> {
    let mut ranking: Vec<CategoryMagnitude> = totals
        .iter()
        .map(|(label, net_value)| CategoryMagnitude {
            label: label.clone(),
            net_value: *net_value,
            magnitude: net_value.abs(),
        })
        .collect();
    ranking.sort_by(|left, right| right.magnitude.total_cmp(&left.magnitude));
    ranking
}

/// Axis domain for magnitude bars: `[0, max * AXIS_HEADROOM]`.
pub fn magnitude_axis_domain(ranking: &[CategoryMagnitude]) -> (f64, f64) {
    ranking
        .iter()
        .map(|entry| entry.magnitude)
        .reduce(f64::max)
        .map_or(EMPTY_AXIS_DOMAIN, |max| (0.0, max * AXIS_HEADROOM))
}

/// Label of the largest-magnitude category, `None` when there is none.
pub fn most_significant_category(ranking: &[CategoryMagnitude]) -> Option<&str> {
    ranking.first().map(|entry| entry.label.as_str())
}

/// Running balance ordered by date ascending.
///
/// Same-date records keep their relative input order.
pub fn cumulative_series(records: &[Record]) -> Vec<CumulativePoint> {
    let mut ordered: Vec<&Record> = records.iter().collect();
    ordered.sort_by_key(|record| record.date);

    let mut running = 0.0;
    ordered
        .into_iter()
        .map(|record| {
            running += record.amount;
            CumulativePoint {
                date: record.date,
                value: running,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::record::{NewRecord, Record};

    fn record(amount: f64, date: &str, category: &str) -> Record {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap();
        Record::from_new(NewRecord::new(amount, date, category, None).unwrap())
    }

    #[test]
    fn empty_collection_yields_identities() {
        assert_eq!(total_balance(&[]), 0.0);
        assert_eq!(win_rate(&[]), 0.0);
        assert!(category_totals(&[]).is_empty());
        assert!(cumulative_series(&[]).is_empty());
        assert_eq!(magnitude_axis_domain(&[]), EMPTY_AXIS_DOMAIN);
        assert_eq!(most_significant_category(&[]), None);
    }

    #[test]
    fn win_rate_rounds_to_one_decimal() {
        let records = vec![
            record(10.0, "2024-01-01", "A"),
            record(-5.0, "2024-01-02", "A"),
            record(0.0, "2024-01-03", "A"),
        ];
        assert_eq!(win_rate(&records), 33.3);
    }

    #[test]
    fn ranking_ties_keep_first_appearance_order() {
        let records = vec![
            record(-30.0, "2024-01-01", "B"),
            record(30.0, "2024-01-02", "A"),
            record(50.0, "2024-01-03", "C"),
        ];
        let ranking = category_ranking(&category_totals(&records));
        let labels: Vec<&str> = ranking.iter().map(|entry| entry.label.as_str()).collect();
        assert_eq!(labels, vec!["C", "B", "A"]);
        assert_eq!(ranking[1].net_value, -30.0);
        assert_eq!(ranking[1].magnitude, 30.0);
    }

    #[test]
    fn axis_domain_adds_headroom_over_largest_magnitude() {
        let records = vec![record(-200.0, "2024-01-01", "A"), record(100.0, "2024-01-01", "B")];
        let ranking = category_ranking(&category_totals(&records));
        let (low, high) = magnitude_axis_domain(&ranking);
        assert_eq!(low, 0.0);
        assert!((high - 210.0).abs() < 1e-9);
    }

    #[test]
    fn cumulative_series_is_stable_for_same_date() {
        let records = vec![
            record(5.0, "2024-02-01", "A"),
            record(1.0, "2024-01-01", "A"),
            record(-3.0, "2024-02-01", "B"),
        ];
        let values: Vec<f64> = cumulative_series(&records)
            .iter()
            .map(|point| point.value)
            .collect();
        assert_eq!(values, vec![1.0, 6.0, 3.0]);
    }
}
