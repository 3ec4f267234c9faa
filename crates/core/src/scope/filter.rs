//! Batch scope filter.

use std::collections::BTreeSet;
use std::fmt;

use institute_shared::config::{ScopeConfig, ScopeFallback};
use institute_shared::types::{BatchId, StudentId};
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::error::ScopeError;
use crate::audit::{AuditEntry, EntityType, details};
use crate::records::{BatchLookup, Payment, Placement, Student};

/// Which batches a view covers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BatchScope {
    /// Every batch; the identity filter.
    #[default]
    All,
    /// A single batch.
    Batch(BatchId),
}

impl BatchScope {
    /// Scope covering a single batch label (`"all"` still means every batch).
    #[must_use]
    pub fn batch(label: &str) -> Self {
        Self::from(label.to_string())
    }

    /// Returns true if a record carrying `batch` falls inside the scope.
    #[must_use]
    pub fn contains(&self, batch: Option<&BatchId>) -> bool {
        match self {
            Self::All => true,
            Self::Batch(wanted) => batch == Some(wanted),
        }
    }
}

impl From<String> for BatchScope {
    fn from(label: String) -> Self {
        let id = BatchId::new(label.trim());
        if id.is_all() { Self::All } else { Self::Batch(id) }
    }
}

impl From<BatchScope> for String {
    fn from(scope: BatchScope) -> Self {
        scope.to_string()
    }
}

impl fmt::Display for BatchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str(institute_shared::types::batch::ALL_BATCHES),
            Self::Batch(id) => write!(f, "{id}"),
        }
    }
}

/// Where a record's batch comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchRef<'a> {
    /// The record carries its own batch (or none).
    Direct(Option<&'a BatchId>),
    /// The record inherits its student's batch.
    Student(StudentId),
}

/// A record that can be narrowed to a batch.
pub trait BatchScoped {
    /// Returns where this record's batch comes from.
    fn batch_ref(&self) -> BatchRef<'_>;
}

impl BatchScoped for Student {
    fn batch_ref(&self) -> BatchRef<'_> {
        BatchRef::Direct(Some(&self.batch_id))
    }
}

impl BatchScoped for Payment {
    fn batch_ref(&self) -> BatchRef<'_> {
        match &self.batch_id {
            Some(batch) => BatchRef::Direct(Some(batch)),
            None => BatchRef::Student(self.student_id),
        }
    }
}

impl BatchScoped for Placement {
    fn batch_ref(&self) -> BatchRef<'_> {
        BatchRef::Student(self.student_id)
    }
}

impl BatchScoped for AuditEntry {
    fn batch_ref(&self) -> BatchRef<'_> {
        if let Some(batch) = &self.batch_id {
            return BatchRef::Direct(Some(batch));
        }
        // Unstamped entries follow the student they concern, if any.
        let student = match details::student_id(&self.details) {
            Ok(Some(id)) => Some(id),
            _ if self.entity_type == EntityType::Student => {
                Some(StudentId::from_uuid(self.entity_id))
            }
            _ => None,
        };
        student.map_or(BatchRef::Direct(None), BatchRef::Student)
    }
}

/// Narrows record collections to one academic batch.
pub struct BatchScopeFilter<L: BatchLookup> {
    known_batches: BTreeSet<BatchId>,
    fallback: ScopeFallback,
    students: L,
}

impl<L: BatchLookup> BatchScopeFilter<L> {
    /// Creates a filter that accepts any batch label.
    #[must_use]
    pub fn new(students: L) -> Self {
        Self {
            known_batches: BTreeSet::new(),
            fallback: ScopeFallback::default(),
            students,
        }
    }

    /// Creates a filter from configuration.
    #[must_use]
    pub fn from_config(config: &ScopeConfig, students: L) -> Self {
        Self::new(students)
            .with_known_batches(config.known_batches.iter().map(|b| BatchId::new(b.as_str())))
            .with_fallback(config.fallback)
    }

    /// Sets the reference batch set; an empty set accepts any label.
    #[must_use]
    pub fn with_known_batches(mut self, batches: impl IntoIterator<Item = BatchId>) -> Self {
        self.known_batches = batches.into_iter().collect();
        self
    }

    /// Sets what [`Self::scope`] returns for an unknown batch.
    #[must_use]
    pub fn with_fallback(mut self, fallback: ScopeFallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Validates a batch label against the reference set.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::UnknownBatch`] for a label outside the reference set.
    pub fn resolve(&self, label: &str) -> Result<BatchScope, ScopeError> {
        let scope = BatchScope::batch(label);
        match &scope {
            BatchScope::Batch(id)
                if !self.known_batches.is_empty() && !self.known_batches.contains(id) =>
            {
                Err(ScopeError::UnknownBatch(id.to_string()))
            }
            _ => Ok(scope),
        }
    }

    /// Returns the records belonging to `scope`, in their original order.
    #[must_use]
    pub fn apply<T: BatchScoped + Clone>(&self, items: &[T], scope: &BatchScope) -> Vec<T> {
        items
            .iter()
            .filter(|item| self.belongs(*item, scope))
            .cloned()
            .collect()
    }

    /// Narrows `items` to the batch labelled `label`.
    ///
    /// # Errors
    ///
    /// Returns [`ScopeError::UnknownBatch`] for a label outside the reference set.
    pub fn try_scope<T: BatchScoped + Clone>(
        &self,
        items: &[T],
        label: &str,
    ) -> Result<Vec<T>, ScopeError> {
        let scope = self.resolve(label)?;
        Ok(self.apply(items, &scope))
    }

    /// Narrows `items` to the batch labelled `label`.
    ///
    /// An unknown label is logged and answered with the configured fallback
    /// (everything, or nothing) rather than a partial subset.
    #[must_use]
    pub fn scope<T: BatchScoped + Clone>(&self, items: &[T], label: &str) -> Vec<T> {
        match self.try_scope(items, label) {
            Ok(scoped) => scoped,
            Err(err) => {
                warn!(
                    batch = label,
                    fallback = ?self.fallback,
                    error = %err,
                    "Batch scope mismatch"
                );
                match self.fallback {
                    ScopeFallback::Unfiltered => items.to_vec(),
                    ScopeFallback::Empty => Vec::new(),
                }
            }
        }
    }

    /// Returns true if `item` falls inside `scope`.
    #[must_use]
    pub fn belongs<T: BatchScoped>(&self, item: &T, scope: &BatchScope) -> bool {
        if matches!(scope, BatchScope::All) {
            return true;
        }
        match item.batch_ref() {
            BatchRef::Direct(batch) => scope.contains(batch),
            BatchRef::Student(student) => scope.contains(self.students.batch_of(student).as_ref()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{PaymentStatus, StudentDirectory};
    use chrono::NaiveDate;
    use institute_shared::types::{PaymentId, PlacementId};
    use rust_decimal_macros::dec;

    fn student(first: &str, batch: &str) -> Student {
        Student {
            id: StudentId::new(),
            first_name: first.to_string(),
            last_name: "Test".to_string(),
            batch_id: BatchId::new(batch),
        }
    }

    fn payment(student_id: StudentId, batch: Option<&str>) -> Payment {
        Payment {
            id: PaymentId::new(),
            student_id,
            amount: dec!(1000),
            payment_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            status: PaymentStatus::Completed,
            receipt_number: "RCT-2024-0001".to_string(),
            payment_method: None,
            bank_account: None,
            cheque_number: None,
            remarks: None,
            batch_id: batch.map(BatchId::new),
        }
    }

    fn fixture() -> (Vec<Student>, StudentDirectory) {
        let students = vec![student("Asha", "2023-24"), student("Ravi", "2024-25")];
        let directory = students.iter().cloned().collect();
        (students, directory)
    }

    #[test]
    fn test_all_is_identity() {
        let (students, directory) = fixture();
        let filter = BatchScopeFilter::new(&directory);
        assert_eq!(filter.scope(&students, "all"), students);
        assert_eq!(filter.scope(&students, "ALL"), students);
    }

    #[test]
    fn test_students_filtered_directly() {
        let (students, directory) = fixture();
        let filter = BatchScopeFilter::new(&directory);
        let scoped = filter.scope(&students, "2024-25");
        assert_eq!(scoped.len(), 1);
        assert_eq!(scoped[0].first_name, "Ravi");
    }

    #[test]
    fn test_payments_use_student_batch_when_unset() {
        let (students, directory) = fixture();
        let filter = BatchScopeFilter::new(&directory);
        let payments = vec![
            payment(students[0].id, None),
            payment(students[1].id, None),
            payment(students[0].id, Some("2024-25")),
        ];

        let scoped = filter.scope(&payments, "2024-25");
        assert_eq!(scoped.len(), 2);
        assert_eq!(scoped[0].student_id, students[1].id);
        assert_eq!(scoped[1].batch_id, Some(BatchId::new("2024-25")));
    }

    #[test]
    fn test_placements_follow_student() {
        let (students, directory) = fixture();
        let filter = BatchScopeFilter::new(&directory);
        let placements = vec![Placement {
            id: PlacementId::new(),
            student_id: students[0].id,
            country: "Germany".to_string(),
            total_cost: dec!(100000),
            installments: vec![],
        }];
        assert_eq!(filter.scope(&placements, "2023-24").len(), 1);
        assert!(filter.scope(&placements, "2024-25").is_empty());
    }

    #[test]
    fn test_unknown_batch_errors_and_falls_back() {
        let (students, directory) = fixture();
        let strict = BatchScopeFilter::new(&directory)
            .with_known_batches([BatchId::new("2023-24"), BatchId::new("2024-25")]);

        assert!(matches!(
            strict.try_scope(&students, "2019-20"),
            Err(ScopeError::UnknownBatch(ref b)) if b == "2019-20"
        ));
        assert!(strict.scope(&students, "2019-20").is_empty());

        let lenient = strict.with_fallback(ScopeFallback::Unfiltered);
        assert_eq!(lenient.scope(&students, "2019-20").len(), 2);
        assert!(lenient.resolve("all").is_ok());
    }

    #[test]
    fn test_from_config() {
        let (students, directory) = fixture();
        let config = ScopeConfig {
            known_batches: vec!["2023-24".to_string()],
            fallback: ScopeFallback::Unfiltered,
        };
        let filter = BatchScopeFilter::from_config(&config, &directory);
        assert_eq!(filter.scope(&students, "2024-25").len(), 2);
        assert_eq!(filter.scope(&students, "2023-24").len(), 1);
    }

    fn audit_entry(
        entity_type: EntityType,
        entity_id: uuid::Uuid,
        batch: Option<&str>,
    ) -> AuditEntry {
        AuditEntry {
            id: institute_shared::types::AuditEntryId::new(),
            action: crate::audit::AuditAction::Payment,
            entity_type,
            entity_id,
            entity_name: "Asha Test".to_string(),
            details: crate::audit::AuditDetails::new(),
            amount: Some(dec!(1000)),
            timestamp: chrono::Utc::now(),
            batch_id: batch.map(BatchId::new),
        }
    }

    #[test]
    fn test_unstamped_audit_entries_follow_student() {
        let (students, directory) = fixture();
        let filter = BatchScopeFilter::new(&directory);

        let mut via_detail = audit_entry(EntityType::Payment, uuid::Uuid::new_v4(), None);
        via_detail.details.insert(
            details::STUDENT_ID.to_string(),
            serde_json::json!(students[1].id.to_string()),
        );
        let entries = vec![
            audit_entry(EntityType::Payment, uuid::Uuid::new_v4(), Some("2023-24")),
            via_detail,
            audit_entry(EntityType::Student, students[1].id.into_inner(), None),
            audit_entry(EntityType::Payment, uuid::Uuid::new_v4(), None),
        ];

        let scoped = filter.scope(&entries, "2024-25");
        assert_eq!(scoped.len(), 2);
        assert!(scoped.iter().all(|e| e.batch_id.is_none()));
        assert_eq!(filter.scope(&entries, "2023-24").len(), 1);

        let empty = StudentDirectory::new();
        assert!(BatchScopeFilter::new(&empty).scope(&entries, "2024-25").is_empty());
    }

    #[test]
    fn test_scope_serializes_as_label() {
        assert_eq!(serde_json::to_string(&BatchScope::All).unwrap(), "\"all\"");
        let scope: BatchScope = serde_json::from_str("\"2024-25\"").unwrap();
        assert_eq!(scope, BatchScope::Batch(BatchId::new("2024-25")));
    }
}
