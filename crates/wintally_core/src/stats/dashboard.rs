//! Dashboard/history projections built on the aggregations.
//!
//! # Responsibility
//! - Bundle every derived view into one serializable snapshot.
//! - Provide display helpers shared by history and dashboard renderers.

use crate::model::record::Record;
use crate::stats::aggregate::{
    category_ranking, category_totals, cumulative_series, magnitude_axis_domain,
    most_significant_category, total_balance, win_count, win_rate, CategoryMagnitude,
    CategoryTotals, CumulativePoint,
};
use serde::Serialize;

const MAX_FRACTION_DIGITS: usize = 3;

/// Every derived view over one record collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub record_count: usize,
    pub win_count: usize,
    pub loss_count: usize,
    pub total_balance: f64,
    pub win_rate: f64,
    pub category_totals: CategoryTotals,
    pub category_ranking: Vec<CategoryMagnitude>,
    pub axis_domain: (f64, f64),
    pub cumulative: Vec<CumulativePoint>,
    pub top_category: Option<String>,
}

impl DashboardSnapshot {
    /// Derives the full snapshot from scratch.
    pub fn from_records(records: &[Record]) -> Self {
        let totals = category_totals(records);
        let ranking = category_ranking(&totals);
        let top_category = most_significant_category(&ranking).map(str::to_string);

        Self {
            record_count: records.len(),
            win_count: win_count(records),
            loss_count: records.iter().filter(|record| record.amount < 0.0).count(),
            total_balance: total_balance(records),
            win_rate: win_rate(records),
            axis_domain: magnitude_axis_domain(&ranking),
            cumulative: cumulative_series(records),
            category_totals: totals,
            category_ranking: ranking,
            top_category,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }
}

/// Color tone for a signed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountTone {
    Gain,
    Loss,
}

impl AmountTone {
    /// Zero renders with the gain tone.
    pub fn of(amount: f64) -> Self {
        if amount >= 0.0 {
            Self::Gain
        } else {
            Self::Loss
        }
    }
}

/// Records ordered for the history table: newest date first, stable.
pub fn history_order(records: &[Record]) -> Vec<&Record> {
    let mut ordered: Vec<&Record> = records.iter().collect();
    ordered.sort_by(|left, right| right.date.cmp(&left.date));
    ordered
}

/// Formats a signed value with thousands separators and an explicit `+`.
///
/// `1000.0 -> "+1,000"`, `-1234.5 -> "-1,234.5"`, `0.0 -> "+0"`.
pub fn format_signed_amount(amount: f64) -> String {
    let fixed = format!("{:.*}", MAX_FRACTION_DIGITS, amount.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');
    // Sign follows the displayed digits, so tiny losses never print as `-0`.
    let rounds_to_zero = fraction.is_empty() && integer.bytes().all(|digit| digit == b'0');
    let sign = if amount >= 0.0 || rounds_to_zero { "+" } else { "-" };

    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (index, digit) in integer.chars().enumerate() {
        if index > 0 && (integer.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    if fraction.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{fraction}")
    }
}

#[cfg(test)]
mod tests {
    use super::{format_signed_amount, AmountTone};

    #[test]
    fn format_signed_amount_groups_thousands() {
        assert_eq!(format_signed_amount(1000.0), "+1,000");
        assert_eq!(format_signed_amount(-1234.5), "-1,234.5");
        assert_eq!(format_signed_amount(0.0), "+0");
        assert_eq!(format_signed_amount(999.0), "+999");
        assert_eq!(format_signed_amount(1234567.891), "+1,234,567.891");
        assert_eq!(format_signed_amount(-0.1), "-0.1");
    }

    #[test]
    fn format_signed_amount_never_prints_negative_zero() {
        assert_eq!(format_signed_amount(-0.0001), "+0");
        assert_eq!(format_signed_amount(-0.0), "+0");
        assert_eq!(format_signed_amount(-0.002), "-0.002");
        assert_eq!(format_signed_amount(0.0004), "+0");
    }

    #[test]
    fn tone_treats_zero_as_gain() {
        assert_eq!(AmountTone::of(0.0), AmountTone::Gain);
        assert_eq!(AmountTone::of(-0.5), AmountTone::Loss);
    }
}
