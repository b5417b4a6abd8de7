//! Ledger record domain model.
//!
//! # Responsibility
//! - Define the canonical gain/loss entry shared by dashboard and history.
//! - Guard the creation boundary against malformed amounts.
//!
//! # Invariants
//! - `id` is stable and never reused for another record.
//! - `amount` is always finite; NaN/inf never enter a collection.
//! - `category` is never blank.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one ledger record.
pub type RecordId = Uuid;

/// Validation failures for record construction and persisted payloads.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordValidationError {
    /// Record id must never be nil.
    NilId,
    /// Amount text did not parse into a finite number.
    InvalidAmount(String),
    /// Amount value is NaN or infinite.
    NonFiniteAmount(f64),
    /// Category label is empty after trimming.
    EmptyCategory,
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "record id must not be nil"),
            Self::InvalidAmount(raw) => write!(f, "amount `{raw}` is not a finite number"),
            Self::NonFiniteAmount(value) => write!(f, "amount must be finite, got {value}"),
            Self::EmptyCategory => write!(f, "category must not be empty"),
        }
    }
}

impl Error for RecordValidationError {}

/// One logged gain/loss entry.
///
/// Positive `amount` is a gain, negative a loss, zero a non-winning outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RecordWire")]
pub struct Record {
    pub id: RecordId,
    pub amount: f64,
    /// Calendar day of the session; not unique, not tied to insertion order.
    pub date: NaiveDate,
    /// Serialized as `type` to stay compatible with existing ledger blobs.
    #[serde(rename = "type")]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Unvalidated wire shape; converted through `Record::validate`.
#[derive(Deserialize)]
struct RecordWire {
    id: RecordId,
    amount: f64,
    date: NaiveDate,
    #[serde(rename = "type")]
    category: String,
    #[serde(default)]
    note: Option<String>,
}

impl TryFrom<RecordWire> for Record {
    type Error = RecordValidationError;

    fn try_from(value: RecordWire) -> Result<Self, Self::Error> {
        let record = Self {
            id: value.id,
            amount: value.amount,
            date: value.date,
            category: value.category,
            note: normalize_note(value.note),
        };
        record.validate()?;
        Ok(record)
    }
}

impl Record {
    /// Materializes a pending record with a freshly generated id.
    pub fn from_new(new_record: NewRecord) -> Self {
        Self::with_id(Uuid::new_v4(), new_record)
    }

    /// Materializes a pending record with a caller-provided id.
    ///
    /// Used by import paths and tests where identity already exists.
    pub fn with_id(id: RecordId, new_record: NewRecord) -> Self {
        Self {
            id,
            amount: new_record.amount,
            date: new_record.date,
            category: new_record.category,
            note: new_record.note,
        }
    }

    /// Validates record invariants.
    ///
    /// # Errors
    /// - `NilId` when `id` is the nil UUID.
    /// - `NonFiniteAmount` when `amount` is NaN or infinite.
    /// - `EmptyCategory` when `category` is blank.
    pub fn validate(&self) -> Result<(), RecordValidationError> {
        if self.id.is_nil() {
            return Err(RecordValidationError::NilId);
        }
        if !self.amount.is_finite() {
            return Err(RecordValidationError::NonFiniteAmount(self.amount));
        }
        if self.category.trim().is_empty() {
            return Err(RecordValidationError::EmptyCategory);
        }
        Ok(())
    }

    /// Strictly positive amounts count as wins.
    pub fn is_win(&self) -> bool {
        self.amount > 0.0
    }
}

/// Record input before an id is assigned.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    pub amount: f64,
    pub date: NaiveDate,
    pub category: String,
    pub note: Option<String>,
}

impl NewRecord {
    /// Builds a pending record, trimming the category and dropping blank notes.
    ///
    /// # Errors
    /// - `NonFiniteAmount` when `amount` is NaN or infinite.
    /// - `EmptyCategory` when `category` is blank.
    pub fn new(
        amount: f64,
        date: NaiveDate,
        category: impl Into<String>,
        note: Option<String>,
    ) -> Result<Self, RecordValidationError> {
        if !amount.is_finite() {
            return Err(RecordValidationError::NonFiniteAmount(amount));
        }
        let category = category.into().trim().to_string();
        if category.is_empty() {
            return Err(RecordValidationError::EmptyCategory);
        }
        Ok(Self {
            amount,
            date,
            category,
            note: normalize_note(note),
        })
    }

    /// Builds a pending record from raw amount text.
    pub fn parse(
        amount_text: &str,
        date: NaiveDate,
        category: impl Into<String>,
        note: Option<String>,
    ) -> Result<Self, RecordValidationError> {
        let amount = parse_amount(amount_text)?;
        Self::new(amount, date, category, note)
    }
}

/// Parses user-entered amount text into a finite signed value.
///
/// Accepts an optional leading sign and surrounding whitespace. Rejects
/// empty input, trailing garbage, and `NaN`/`inf` spellings.
pub fn parse_amount(raw: &str) -> Result<f64, RecordValidationError> {
    let trimmed = raw.trim();
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(RecordValidationError::InvalidAmount(trimmed.to_string())),
    }
}

fn normalize_note(note: Option<String>) -> Option<String> {
    note.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::{parse_amount, NewRecord, RecordValidationError};
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    #[test]
    fn parse_amount_accepts_signed_and_padded_values() {
        assert_eq!(parse_amount(" -500 ").unwrap(), -500.0);
        assert_eq!(parse_amount("+12.5").unwrap(), 12.5);
        assert_eq!(parse_amount("0").unwrap(), 0.0);
    }

    #[test]
    fn parse_amount_rejects_non_numeric_and_non_finite() {
        for raw in ["", "abc", "12abc", "NaN", "inf", "-infinity"] {
            let err = parse_amount(raw).unwrap_err();
            assert!(
                matches!(err, RecordValidationError::InvalidAmount(_)),
                "`{raw}` should be rejected"
            );
        }
    }

    #[test]
    fn new_record_trims_category_and_drops_blank_note() {
        let pending = NewRecord::new(10.0, day(), "  德州 ", Some("   ".to_string())).unwrap();
        assert_eq!(pending.category, "德州");
        assert_eq!(pending.note, None);
    }

    #[test]
    fn new_record_rejects_blank_category() {
        let err = NewRecord::new(10.0, day(), "   ", None).unwrap_err();
        assert_eq!(err, RecordValidationError::EmptyCategory);
    }
}
