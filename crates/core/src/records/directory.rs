//! Student-to-batch resolution.

use std::collections::HashMap;
use std::sync::Arc;

use institute_shared::types::{BatchId, StudentId};

use super::types::Student;

/// Resolves the batch a student belongs to.
pub trait BatchLookup: Send + Sync {
    /// Returns the student's current batch, if the student is known.
    fn batch_of(&self, student_id: StudentId) -> Option<BatchId>;
}

impl<T: BatchLookup + ?Sized> BatchLookup for &T {
    fn batch_of(&self, student_id: StudentId) -> Option<BatchId> {
        (**self).batch_of(student_id)
    }
}

impl<T: BatchLookup + ?Sized> BatchLookup for Arc<T> {
    fn batch_of(&self, student_id: StudentId) -> Option<BatchId> {
        (**self).batch_of(student_id)
    }
}

/// In-memory student index built from a storage snapshot.
#[derive(Debug, Clone, Default)]
pub struct StudentDirectory {
    students: HashMap<StudentId, Student>,
}

impl StudentDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a student.
    pub fn insert(&mut self, student: Student) {
        self.students.insert(student.id, student);
    }

    /// Looks up a student.
    #[must_use]
    pub fn get(&self, student_id: StudentId) -> Option<&Student> {
        self.students.get(&student_id)
    }

    /// Returns the student's display label.
    #[must_use]
    pub fn name_of(&self, student_id: StudentId) -> Option<String> {
        self.get(student_id).map(Student::display_name)
    }

    /// Number of students indexed.
    #[must_use]
    pub fn len(&self) -> usize {
        self.students.len()
    }

    /// Returns true if no students are indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }
}

impl FromIterator<Student> for StudentDirectory {
    fn from_iter<I: IntoIterator<Item = Student>>(iter: I) -> Self {
        Self {
            students: iter.into_iter().map(|s| (s.id, s)).collect(),
        }
    }
}

impl BatchLookup for StudentDirectory {
    fn batch_of(&self, student_id: StudentId) -> Option<BatchId> {
        self.students.get(&student_id).map(|s| s.batch_id.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_of_reflects_current_batch() {
        let id = StudentId::new();
        let mut directory: StudentDirectory = [Student {
            id,
            first_name: "Ravi".to_string(),
            last_name: "Kumar".to_string(),
            batch_id: BatchId::new("2023-24"),
        }]
        .into_iter()
        .collect();

        assert_eq!(directory.batch_of(id), Some(BatchId::new("2023-24")));
        assert_eq!(directory.name_of(id).as_deref(), Some("Ravi Kumar"));

        let mut moved = directory.get(id).cloned().unwrap();
        moved.batch_id = BatchId::new("2024-25");
        directory.insert(moved);
        assert_eq!(directory.batch_of(id), Some(BatchId::new("2024-25")));
    }

    #[test]
    fn test_unknown_student_has_no_batch() {
        let directory = StudentDirectory::new();
        assert!(directory.is_empty());
        assert_eq!(directory.batch_of(StudentId::new()), None);
    }
}
