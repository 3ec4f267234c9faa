//! Audit event recorder.

use std::sync::Arc;

use institute_shared::types::{AuditEntryId, BatchId, StudentId};
use tracing::{debug, warn};
use uuid::Uuid;

use super::details::{self, AuditDetails};
use super::error::AuditError;
use super::repository::AuditRepository;
use super::types::{AuditAction, AuditEntry, EntityType};
use crate::clock::{Clock, SystemClock};
use crate::records::BatchLookup;

/// Appends one structured entry to the audit trail per domain mutation.
///
/// The recorder never touches the record it describes. A successful call
/// means the mutation is considered to have happened; nothing reconciles the
/// trail against the record store afterwards.
pub struct AuditRecorder<R: AuditRepository, B: BatchLookup, C: Clock = SystemClock> {
    repo: Arc<R>,
    students: B,
    clock: C,
}

impl<R: AuditRepository, B: BatchLookup> AuditRecorder<R, B, SystemClock> {
    /// Creates a recorder stamping entries with wall-clock time.
    #[must_use]
    pub fn new(repo: Arc<R>, students: B) -> Self {
        Self::with_clock(repo, students, SystemClock)
    }
}

impl<R: AuditRepository, B: BatchLookup, C: Clock> AuditRecorder<R, B, C> {
    /// Creates a recorder with an explicit time source.
    #[must_use]
    pub fn with_clock(repo: Arc<R>, students: B, clock: C) -> Self {
        Self {
            repo,
            students,
            clock,
        }
    }

    /// Returns the underlying repository.
    #[must_use]
    pub fn repository(&self) -> &Arc<R> {
        &self.repo
    }

    /// Returns the recorder's time source.
    #[must_use]
    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Records a mutation and appends it to the trail.
    ///
    /// `amount` is taken from `details.amount` when present. `batch_id` is the
    /// batch of `details.studentId` (or of the student itself, for student
    /// records) at this instant, and is not re-evaluated later.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the details carry a malformed or negative
    /// amount, a malformed student ID, or the entity ID is nil. Nothing is
    /// appended in that case.
    pub fn record(
        &self,
        action: AuditAction,
        entity_type: EntityType,
        entity_id: Uuid,
        details: AuditDetails,
        entity_name: impl Into<String>,
    ) -> Result<AuditEntry, AuditError> {
        let entry = self.build_entry(action, entity_type, entity_id, details, entity_name.into())?;
        self.repo.append(entry.clone())?;

        debug!(
            entry_id = %entry.id,
            action = %entry.action,
            entity_type = %entry.entity_type,
            entity_id = %entry.entity_id,
            amount = ?entry.amount,
            batch_id = ?entry.batch_id,
            "Audit entry recorded"
        );
        Ok(entry)
    }

    /// Records a mutation whose action and entity type arrive as strings.
    ///
    /// # Errors
    ///
    /// Returns [`AuditError::UnknownAction`] or [`AuditError::UnknownEntityType`]
    /// for names outside the taxonomy, plus everything [`Self::record`] rejects.
    pub fn record_named(
        &self,
        action: &str,
        entity_type: &str,
        entity_id: Uuid,
        details: AuditDetails,
        entity_name: impl Into<String>,
    ) -> Result<AuditEntry, AuditError> {
        let action = action.parse::<AuditAction>()?;
        let entity_type = entity_type.parse::<EntityType>()?;
        self.record(action, entity_type, entity_id, details, entity_name)
    }

    fn build_entry(
        &self,
        action: AuditAction,
        entity_type: EntityType,
        entity_id: Uuid,
        details: AuditDetails,
        entity_name: String,
    ) -> Result<AuditEntry, AuditError> {
        if entity_id.is_nil() {
            return Err(AuditError::MissingEntity);
        }

        let amount = details::amount(&details)?;
        let batch_id = self.infer_batch(entity_type, entity_id, &details)?;

        Ok(AuditEntry {
            id: AuditEntryId::new(),
            action,
            entity_type,
            entity_id,
            entity_name,
            details,
            amount,
            timestamp: self.clock.now(),
            batch_id,
        })
    }

    fn infer_batch(
        &self,
        entity_type: EntityType,
        entity_id: Uuid,
        details: &AuditDetails,
    ) -> Result<Option<BatchId>, AuditError> {
        let student = match details::student_id(details)? {
            Some(id) => Some(id),
            None if entity_type == EntityType::Student => Some(StudentId::from_uuid(entity_id)),
            None => None,
        };

        let Some(student) = student else {
            return Ok(None);
        };

        let batch = self.students.batch_of(student);
        if batch.is_none() {
            warn!(student_id = %student, "Student not found while inferring audit batch");
        }
        Ok(batch)
    }
}
