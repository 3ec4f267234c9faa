//! Payment workflow: guard, number, store, audit.

use std::sync::Arc;

use chrono::Datelike;
use institute_shared::config::ReceiptConfig;
use institute_shared::types::{PaymentId, StudentId};
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{error, info};
use uuid::Uuid;

use super::error::PaymentError;
use super::guard::DuplicatePaymentGuard;
use super::locks::StudentLocks;
use super::receipt::ReceiptNumber;
use super::store::PaymentStore;
use crate::audit::details::{self, AuditDetails};
use crate::audit::{AuditAction, AuditEntry, AuditRecorder, AuditRepository, EntityType};
use crate::clock::{Clock, SystemClock};
use crate::narration::{Direction, NarrationFormatter};
use crate::records::{BatchLookup, Installment, NewPayment, Payment, Placement};

/// A balance-reducing event: refund, scholarship, discount, adjustment, or
/// a payment made to a placement company.
#[derive(Debug, Clone)]
pub struct DebitRequest {
    /// One of the debit actions.
    pub action: AuditAction,
    /// Student the debit relates to.
    pub student_id: StudentId,
    /// Display label of the student.
    pub student_name: String,
    /// Amount debited (must be positive).
    pub amount: Decimal,
    /// Placement the debit is made against, if any.
    pub placement_id: Option<Uuid>,
    /// Payment method.
    pub payment_method: Option<String>,
    /// Bank account the money left from.
    pub bank_account: Option<String>,
    /// Reason for the debit.
    pub reason: Option<String>,
}

/// Orchestrates payment mutations so each one lands in the store and the
/// audit trail together.
pub struct PaymentService<S, R, B, C = SystemClock>
where
    S: PaymentStore,
    R: AuditRepository,
    B: BatchLookup,
    C: Clock,
{
    store: Arc<S>,
    recorder: AuditRecorder<R, B, C>,
    locks: StudentLocks,
    receipt_prefix: String,
}

impl<S, R, B, C> PaymentService<S, R, B, C>
where
    S: PaymentStore,
    R: AuditRepository,
    B: BatchLookup,
    C: Clock,
{
    /// Creates a payment service.
    #[must_use]
    pub fn new(store: Arc<S>, recorder: AuditRecorder<R, B, C>, receipt: &ReceiptConfig) -> Self {
        Self {
            store,
            recorder,
            locks: StudentLocks::new(),
            receipt_prefix: receipt.prefix.clone(),
        }
    }

    /// Returns the payment store.
    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Returns the audit recorder.
    #[must_use]
    pub fn recorder(&self) -> &AuditRecorder<R, B, C> {
        &self.recorder
    }

    /// Creates a new fee payment.
    ///
    /// Runs the duplicate pre-check, assigns a receipt number, stores the
    /// payment, and records a `PAYMENT` audit entry. The whole sequence is
    /// serialized per student.
    ///
    /// # Errors
    ///
    /// - [`PaymentError::NonPositiveAmount`] if the amount is zero or negative
    /// - [`PaymentError::Duplicate`] if a committed payment matches
    /// - storage and audit failures
    pub fn create_payment(&self, input: NewPayment) -> Result<Payment, PaymentError> {
        Self::ensure_positive(input.amount)?;

        self.locks.with_lock(input.student_id, || -> Result<Payment, PaymentError> {
            let existing = self.store.list_for_student(input.student_id)?;
            DuplicatePaymentGuard::ensure_unique(
                &existing,
                input.student_id,
                input.amount,
                input.payment_date,
            )?;

            let sequence = self.store.next_sequence()?;
            let year = self.recorder.clock().now().year();
            let receipt_number = ReceiptNumber::format(&self.receipt_prefix, year, sequence);

            let payment = self.store.insert(Payment {
                id: PaymentId::new(),
                student_id: input.student_id,
                amount: input.amount,
                payment_date: input.payment_date,
                status: input.status,
                receipt_number,
                payment_method: input.payment_method,
                bank_account: input.bank_account,
                cheque_number: input.cheque_number,
                remarks: input.remarks,
                batch_id: None,
            })?;

            self.audit(
                AuditAction::Payment,
                EntityType::Payment,
                payment.id.into_inner(),
                Self::payment_details(&payment),
                input.student_name,
            )?;

            info!(
                payment_id = %payment.id,
                student_id = %payment.student_id,
                amount = %payment.amount,
                receipt_number = %payment.receipt_number,
                "Payment recorded"
            );
            Ok(payment)
        })
    }

    /// Edits an existing payment and records an `UPDATE` audit entry.
    ///
    /// Edits are exempt from the duplicate guard.
    ///
    /// # Errors
    ///
    /// - [`PaymentError::NonPositiveAmount`] if the amount is zero or negative
    /// - [`PaymentError::PaymentNotFound`] if the payment does not exist
    /// - storage and audit failures
    pub fn update_payment(
        &self,
        payment: Payment,
        student_name: impl Into<String>,
    ) -> Result<Payment, PaymentError> {
        Self::ensure_positive(payment.amount)?;

        let payment = self.store.update(payment)?;
        self.audit(
            AuditAction::Update,
            EntityType::Payment,
            payment.id.into_inner(),
            Self::payment_details(&payment),
            student_name,
        )?;

        info!(payment_id = %payment.id, amount = %payment.amount, "Payment updated");
        Ok(payment)
    }

    /// Adds an installment to a placement and records a
    /// `PLACEMENT_PAYMENT` audit entry.
    ///
    /// The placement is only changed once the entry is recorded.
    ///
    /// # Errors
    ///
    /// - [`PaymentError::NonPositiveAmount`] if the amount is zero or negative
    /// - [`PaymentError::ExceedsOutstanding`] if the placement owes less
    /// - audit failures
    pub fn record_installment(
        &self,
        placement: &mut Placement,
        installment: Installment,
        student_name: impl Into<String>,
    ) -> Result<AuditEntry, PaymentError> {
        Self::ensure_positive(installment.amount)?;

        let outstanding = placement.outstanding();
        if installment.amount > outstanding {
            return Err(PaymentError::ExceedsOutstanding {
                outstanding,
                requested: installment.amount,
            });
        }

        let mut details = AuditDetails::new();
        insert_text(&mut details, details::AMOUNT, Some(installment.amount.to_string()));
        insert_text(&mut details, details::STUDENT_ID, Some(placement.student_id.to_string()));
        insert_text(&mut details, details::PAYMENT_DATE, Some(installment.paid_on.to_string()));
        insert_text(&mut details, details::PAYMENT_METHOD, installment.payment_method.clone());
        insert_text(&mut details, details::BANK_ACCOUNT, installment.bank_account.clone());
        insert_text(&mut details, details::REMARKS, installment.remarks.clone());

        let entry = self.audit(
            AuditAction::PlacementPayment,
            EntityType::Placement,
            placement.id.into_inner(),
            details,
            student_name,
        )?;

        info!(
            placement_id = %placement.id,
            amount = %installment.amount,
            outstanding = %(outstanding - installment.amount),
            "Placement installment recorded"
        );
        placement.installments.push(installment);
        Ok(entry)
    }

    /// Changes a placement's agreed cost and records an `UPDATE` audit entry.
    ///
    /// # Errors
    ///
    /// - [`PaymentError::NonPositiveAmount`] if the cost is zero or negative
    /// - audit failures
    pub fn update_placement_cost(
        &self,
        placement: &mut Placement,
        total_cost: Decimal,
        student_name: impl Into<String>,
    ) -> Result<AuditEntry, PaymentError> {
        Self::ensure_positive(total_cost)?;

        let mut details = AuditDetails::new();
        insert_text(&mut details, details::STUDENT_ID, Some(placement.student_id.to_string()));
        insert_text(&mut details, details::TOTAL_COST, Some(total_cost.to_string()));

        let entry = self.audit(
            AuditAction::Update,
            EntityType::Placement,
            placement.id.into_inner(),
            details,
            student_name,
        )?;
        placement.total_cost = total_cost;
        Ok(entry)
    }

    /// Records a balance-reducing event.
    ///
    /// The entry is filed against the placement when one is given, otherwise
    /// against the student.
    ///
    /// # Errors
    ///
    /// - [`PaymentError::NotADebit`] if the action is not a debit
    /// - [`PaymentError::NonPositiveAmount`] if the amount is zero or negative
    /// - audit failures
    pub fn record_debit(&self, request: DebitRequest) -> Result<AuditEntry, PaymentError> {
        if NarrationFormatter::classify(request.action).direction != Direction::Debit {
            return Err(PaymentError::NotADebit(request.action));
        }
        Self::ensure_positive(request.amount)?;

        let (entity_type, entity_id) = match request.placement_id {
            Some(id) => (EntityType::Placement, id),
            None => (EntityType::Student, request.student_id.into_inner()),
        };

        let mut details = AuditDetails::new();
        insert_text(&mut details, details::AMOUNT, Some(request.amount.to_string()));
        insert_text(&mut details, details::STUDENT_ID, Some(request.student_id.to_string()));
        insert_text(&mut details, details::PAYMENT_METHOD, request.payment_method);
        insert_text(&mut details, details::BANK_ACCOUNT, request.bank_account);
        insert_text(&mut details, details::REASON, request.reason);

        let entry = self.audit(
            request.action,
            entity_type,
            entity_id,
            details,
            request.student_name,
        )?;
        info!(
            action = %entry.action,
            student_id = %request.student_id,
            amount = %request.amount,
            "Debit recorded"
        );
        Ok(entry)
    }

    fn audit(
        &self,
        action: AuditAction,
        entity_type: EntityType,
        entity_id: Uuid,
        details: AuditDetails,
        entity_name: impl Into<String>,
    ) -> Result<AuditEntry, PaymentError> {
        self.recorder
            .record(action, entity_type, entity_id, details, entity_name)
            .map_err(|err| {
                error!(
                    action = %action,
                    entity_id = %entity_id,
                    error = %err,
                    "Audit entry not recorded"
                );
                PaymentError::from(err)
            })
    }

    fn ensure_positive(amount: Decimal) -> Result<(), PaymentError> {
        if amount <= Decimal::ZERO {
            return Err(PaymentError::NonPositiveAmount(amount));
        }
        Ok(())
    }

    fn payment_details(payment: &Payment) -> AuditDetails {
        let mut details = AuditDetails::new();
        insert_text(&mut details, details::AMOUNT, Some(payment.amount.to_string()));
        insert_text(&mut details, details::STUDENT_ID, Some(payment.student_id.to_string()));
        insert_text(&mut details, details::RECEIPT_NUMBER, Some(payment.receipt_number.clone()));
        insert_text(&mut details, details::PAYMENT_DATE, Some(payment.payment_date.to_string()));
        insert_text(&mut details, details::PAYMENT_METHOD, payment.payment_method.clone());
        insert_text(&mut details, details::BANK_ACCOUNT, payment.bank_account.clone());
        insert_text(&mut details, details::CHEQUE_NUMBER, payment.cheque_number.clone());
        insert_text(&mut details, details::REMARKS, payment.remarks.clone());
        details
    }
}

fn insert_text(details: &mut AuditDetails, key: &str, value: Option<String>) {
    if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
        details.insert(key.to_string(), Value::String(value));
    }
}
