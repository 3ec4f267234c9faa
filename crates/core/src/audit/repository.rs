//! Audit trail persistence seam.

use std::sync::RwLock;

use uuid::Uuid;

use super::error::AuditError;
use super::query::AuditQuery;
use super::types::AuditEntry;

/// Repository trait for audit trail persistence.
///
/// The trail is append-only: there is deliberately no update or delete.
/// Implemented by the storage layer; [`InMemoryAuditRepository`] backs tests
/// and snapshot replays.
pub trait AuditRepository: Send + Sync {
    /// Appends an entry to the trail.
    fn append(&self, entry: AuditEntry) -> Result<(), AuditError>;

    /// Returns matching entries in append order.
    fn query(&self, query: &AuditQuery) -> Result<Vec<AuditEntry>, AuditError>;

    /// Returns every entry recorded against one record.
    fn entity_history(&self, entity_id: Uuid) -> Result<Vec<AuditEntry>, AuditError> {
        self.query(&AuditQuery::new().for_entity(entity_id))
    }
}

impl<R: AuditRepository + ?Sized> AuditRepository for std::sync::Arc<R> {
    fn append(&self, entry: AuditEntry) -> Result<(), AuditError> {
        (**self).append(entry)
    }

    fn query(&self, query: &AuditQuery) -> Result<Vec<AuditEntry>, AuditError> {
        (**self).query(query)
    }
}

/// Audit trail held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryAuditRepository {
    entries: RwLock<Vec<AuditEntry>>,
}

impl InMemoryAuditRepository {
    /// Creates an empty trail.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a trail pre-loaded from a storage snapshot.
    #[must_use]
    pub fn from_entries(entries: Vec<AuditEntry>) -> Self {
        Self {
            entries: RwLock::new(entries),
        }
    }

    /// Number of entries recorded.
    pub fn len(&self) -> Result<usize, AuditError> {
        Ok(self.read()?.len())
    }

    /// Returns true if nothing has been recorded.
    pub fn is_empty(&self) -> Result<bool, AuditError> {
        Ok(self.read()?.is_empty())
    }

    /// Returns a copy of the whole trail.
    pub fn snapshot(&self) -> Result<Vec<AuditEntry>, AuditError> {
        Ok(self.read()?.clone())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<AuditEntry>>, AuditError> {
        self.entries
            .read()
            .map_err(|_| AuditError::Storage("audit trail lock poisoned".to_string()))
    }
}

impl AuditRepository for InMemoryAuditRepository {
    fn append(&self, entry: AuditEntry) -> Result<(), AuditError> {
        self.entries
            .write()
            .map_err(|_| AuditError::Storage("audit trail lock poisoned".to_string()))?
            .push(entry);
        Ok(())
    }

    fn query(&self, query: &AuditQuery) -> Result<Vec<AuditEntry>, AuditError> {
        Ok(self
            .read()?
            .iter()
            .filter(|e| query.matches(e))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::types::{AuditAction, EntityType};
    use chrono::Utc;
    use institute_shared::types::AuditEntryId;

    fn entry(entity_id: Uuid, action: AuditAction) -> AuditEntry {
        AuditEntry {
            id: AuditEntryId::new(),
            action,
            entity_type: EntityType::Student,
            entity_id,
            entity_name: "Ravi Kumar".to_string(),
            details: Default::default(),
            amount: None,
            timestamp: Utc::now(),
            batch_id: None,
        }
    }

    #[test]
    fn test_append_preserves_order() {
        let repo = InMemoryAuditRepository::new();
        let student = Uuid::new_v4();
        repo.append(entry(student, AuditAction::Create)).unwrap();
        repo.append(entry(Uuid::new_v4(), AuditAction::Create)).unwrap();
        repo.append(entry(student, AuditAction::Update)).unwrap();

        assert_eq!(repo.len().unwrap(), 3);
        let history = repo.entity_history(student).unwrap();
        let actions: Vec<_> = history.iter().map(|e| e.action).collect();
        assert_eq!(actions, vec![AuditAction::Create, AuditAction::Update]);
    }

    #[test]
    fn test_query_returns_copies() {
        let repo = InMemoryAuditRepository::from_entries(vec![entry(
            Uuid::new_v4(),
            AuditAction::Delete,
        )]);
        let mut copy = repo.query(&AuditQuery::new()).unwrap();
        copy[0].entity_name = "tampered".to_string();
        assert_eq!(repo.snapshot().unwrap()[0].entity_name, "Ravi Kumar");
    }
}
