//! Academic batch identifiers.
//!
//! Batches are labelled by the institute (e.g. `2024-25`), so unlike the
//! typed UUID IDs they wrap a free-form string.

use serde::{Deserialize, Serialize};

/// Reserved label selecting every batch at once.
pub const ALL_BATCHES: &str = "all";

/// Identifier of an academic batch.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(String);

impl BatchId {
    /// Creates a batch ID from its label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Returns the batch label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this is the reserved all-batches label.
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.0.eq_ignore_ascii_case(ALL_BATCHES)
    }
}

impl std::fmt::Display for BatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BatchId {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_label_is_case_insensitive() {
        assert!(BatchId::new("all").is_all());
        assert!(BatchId::new("ALL").is_all());
        assert!(!BatchId::new("2024-25").is_all());
    }

    #[test]
    fn test_display_round_trips_label() {
        assert_eq!(BatchId::from("2023-24").to_string(), "2023-24");
    }
}
