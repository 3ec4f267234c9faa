//! Filters for reading the audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::types::{AuditAction, AuditEntry, EntityType};
use crate::narration::NarrationFormatter;
use crate::scope::BatchScope;

/// Filter for audit trail queries.
///
/// An empty query matches every entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditQuery {
    /// Batch scope.
    #[serde(default)]
    pub scope: BatchScope,
    /// Only entries about this kind of record.
    pub entity_type: Option<EntityType>,
    /// Only entries about this record.
    pub entity_id: Option<Uuid>,
    /// Only these actions; empty means any action.
    #[serde(default)]
    pub actions: Vec<AuditAction>,
    /// Inclusive lower bound on the timestamp.
    pub from: Option<DateTime<Utc>>,
    /// Inclusive upper bound on the timestamp.
    pub to: Option<DateTime<Utc>>,
    /// Case-insensitive text matched against entity name, action, and label.
    pub search: Option<String>,
}

impl AuditQuery {
    /// Creates a query matching everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Restricts to one batch scope.
    #[must_use]
    pub fn in_scope(mut self, scope: BatchScope) -> Self {
        self.scope = scope;
        self
    }

    /// Restricts to a single record.
    #[must_use]
    pub fn for_entity(mut self, entity_id: Uuid) -> Self {
        self.entity_id = Some(entity_id);
        self
    }

    /// Restricts to one kind of record.
    #[must_use]
    pub fn of_type(mut self, entity_type: EntityType) -> Self {
        self.entity_type = Some(entity_type);
        self
    }

    /// Adds an action to the accepted set.
    #[must_use]
    pub fn with_action(mut self, action: AuditAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Restricts to an inclusive time window.
    #[must_use]
    pub fn between(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.from = Some(from);
        self.to = Some(to);
        self
    }

    /// Adds a free-text search term.
    #[must_use]
    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    /// Returns true if the entry passes every criterion.
    #[must_use]
    pub fn matches(&self, entry: &AuditEntry) -> bool {
        self.scope.contains(entry.batch_id.as_ref())
            && self.entity_type.is_none_or(|t| t == entry.entity_type)
            && self.entity_id.is_none_or(|id| id == entry.entity_id)
            && (self.actions.is_empty() || self.actions.contains(&entry.action))
            && self.from.is_none_or(|from| entry.timestamp >= from)
            && self.to.is_none_or(|to| entry.timestamp <= to)
            && self.matches_search(entry)
    }

    fn matches_search(&self, entry: &AuditEntry) -> bool {
        let Some(term) = self.search.as_deref().map(str::trim).filter(|t| !t.is_empty()) else {
            return true;
        };
        let term = term.to_lowercase();
        let label = NarrationFormatter::classify(entry.action).label;

        entry.entity_name.to_lowercase().contains(&term)
            || entry.action.as_str().to_lowercase().contains(&term)
            || label.to_lowercase().contains(&term)
    }
}
