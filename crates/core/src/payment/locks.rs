//! Per-student serialization of payment writes.

use std::sync::{Arc, Mutex, PoisonError};

use dashmap::DashMap;
use institute_shared::types::StudentId;

/// One mutex per student.
///
/// Check-then-act sequences for the same student run one at a time; writes
/// for different students never wait on each other.
#[derive(Debug, Default)]
pub struct StudentLocks {
    locks: DashMap<StudentId, Arc<Mutex<()>>>,
}

impl StudentLocks {
    /// Creates an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` while holding the student's lock.
    pub fn with_lock<T>(&self, student_id: StudentId, f: impl FnOnce() -> T) -> T {
        // Clone the handle out so the map shard is released before blocking.
        let lock = Arc::clone(&self.locks.entry(student_id).or_default());
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        f()
    }

    /// Number of students that have taken a lock.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Returns true if no lock was ever taken.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
