//! Payment persistence seam.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use institute_shared::types::{PaymentId, StudentId};

use super::error::PaymentError;
use super::guard::DuplicatePaymentGuard;
use crate::records::{Payment, PaymentStatus};

/// Repository trait for payment persistence.
///
/// Implementations must enforce uniqueness of committed payments on
/// student + amount + day inside `insert`, atomically with the write. The
/// service-level guard is only a pre-check.
pub trait PaymentStore: Send + Sync {
    /// Returns every payment.
    fn list(&self) -> Result<Vec<Payment>, PaymentError>;

    /// Returns one student's payments.
    fn list_for_student(&self, student_id: StudentId) -> Result<Vec<Payment>, PaymentError> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|p| p.student_id == student_id)
            .collect())
    }

    /// Finds a payment by ID.
    fn find(&self, id: PaymentId) -> Result<Option<Payment>, PaymentError>;

    /// Hands out the next receipt sequence number; never repeats.
    fn next_sequence(&self) -> Result<u64, PaymentError>;

    /// Stores a new payment.
    ///
    /// Returns [`PaymentError::Duplicate`] if a committed payment with the
    /// same student, amount, and day already exists.
    fn insert(&self, payment: Payment) -> Result<Payment, PaymentError>;

    /// Replaces an existing payment. Edits are not checked for duplicates.
    fn update(&self, payment: Payment) -> Result<Payment, PaymentError>;
}

impl<S: PaymentStore + ?Sized> PaymentStore for std::sync::Arc<S> {
    fn list(&self) -> Result<Vec<Payment>, PaymentError> {
        (**self).list()
    }

    fn list_for_student(&self, student_id: StudentId) -> Result<Vec<Payment>, PaymentError> {
        (**self).list_for_student(student_id)
    }

    fn find(&self, id: PaymentId) -> Result<Option<Payment>, PaymentError> {
        (**self).find(id)
    }

    fn next_sequence(&self) -> Result<u64, PaymentError> {
        (**self).next_sequence()
    }

    fn insert(&self, payment: Payment) -> Result<Payment, PaymentError> {
        (**self).insert(payment)
    }

    fn update(&self, payment: Payment) -> Result<Payment, PaymentError> {
        (**self).update(payment)
    }
}

/// Payment store held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryPaymentStore {
    payments: Mutex<Vec<Payment>>,
    sequence: AtomicU64,
}

impl InMemoryPaymentStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-loaded from a snapshot.
    ///
    /// The receipt sequence continues after the snapshot's payment count.
    #[must_use]
    pub fn from_payments(payments: Vec<Payment>) -> Self {
        let count = u64::try_from(payments.len()).unwrap_or(u64::MAX);
        Self {
            payments: Mutex::new(payments),
            sequence: AtomicU64::new(count),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<Payment>>, PaymentError> {
        self.payments
            .lock()
            .map_err(|_| PaymentError::Storage("payment store lock poisoned".to_string()))
    }
}

impl PaymentStore for InMemoryPaymentStore {
    fn list(&self) -> Result<Vec<Payment>, PaymentError> {
        Ok(self.lock()?.clone())
    }

    fn find(&self, id: PaymentId) -> Result<Option<Payment>, PaymentError> {
        Ok(self.lock()?.iter().find(|p| p.id == id).cloned())
    }

    fn next_sequence(&self) -> Result<u64, PaymentError> {
        Ok(self.sequence.fetch_add(1, Ordering::SeqCst) + 1)
    }

    fn insert(&self, payment: Payment) -> Result<Payment, PaymentError> {
        let mut payments = self.lock()?;
        if payment.status == PaymentStatus::Completed {
            DuplicatePaymentGuard::ensure_unique(
                &payments,
                payment.student_id,
                payment.amount,
                payment.payment_date,
            )?;
        }
        payments.push(payment.clone());
        Ok(payment)
    }

    fn update(&self, payment: Payment) -> Result<Payment, PaymentError> {
        let mut payments = self.lock()?;
        let slot = payments
            .iter_mut()
            .find(|p| p.id == payment.id)
            .ok_or(PaymentError::PaymentNotFound(payment.id))?;
        *slot = payment.clone();
        Ok(payment)
    }
}
