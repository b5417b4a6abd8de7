//! Known-category registry.
//!
//! # Invariants
//! - Labels are unique and keep their registration order.
//! - The set only grows; removing the last record of a category keeps it.

use serde::{Deserialize, Serialize};

/// Labels seeded into a fresh ledger.
pub const DEFAULT_CATEGORIES: &[&str] = &["麻将", "德州"];

/// Ordered, deduplicated set of category labels offered for new records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct CategorySet {
    labels: Vec<String>,
}

impl Default for CategorySet {
    fn default() -> Self {
        Self::from_labels(DEFAULT_CATEGORIES.iter().copied())
    }
}

impl From<Vec<String>> for CategorySet {
    fn from(value: Vec<String>) -> Self {
        Self::from_labels(value)
    }
}

impl From<CategorySet> for Vec<String> {
    fn from(value: CategorySet) -> Self {
        value.labels
    }
}

impl CategorySet {
    /// Builds a set from labels, dropping blanks and duplicates.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set = Self { labels: Vec::new() };
        for label in labels {
            set.insert(label);
        }
        set
    }

    /// Registers a label. Returns `true` when the set grew.
    pub fn insert(&mut self, label: impl Into<String>) -> bool {
        let label = label.into().trim().to_string();
        if label.is_empty() || self.contains(&label) {
            return false;
        }
        self.labels.push(label);
        true
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|known| known == label.trim())
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::{CategorySet, DEFAULT_CATEGORIES};

    #[test]
    fn default_set_is_seeded() {
        let set = CategorySet::default();
        assert_eq!(set.len(), DEFAULT_CATEGORIES.len());
        assert!(set.contains("麻将"));
    }

    #[test]
    fn insert_grows_only_for_unseen_labels() {
        let mut set = CategorySet::default();
        assert!(set.insert("桥牌"));
        assert!(!set.insert("桥牌"));
        assert!(!set.insert(" 麻将 "));
        assert!(!set.insert("  "));
        assert_eq!(set.len(), DEFAULT_CATEGORIES.len() + 1);
        assert_eq!(set.iter().last(), Some("桥牌"));
    }

    #[test]
    fn serializes_as_plain_label_array() {
        let set = CategorySet::from_labels(["a", "b", "a"]);
        let json = serde_json::to_string(&set).unwrap();
        assert_eq!(json, r#"["a","b"]"#);
    }

    #[test]
    fn iter_yields_labels_in_registration_order() {
        let mut set = CategorySet::from_labels(["z", "a"]);
        set.insert("m");
        let labels: Vec<&str> = set.iter().collect();
        assert_eq!(labels, vec!["z", "a", "m"]);
    }
}
