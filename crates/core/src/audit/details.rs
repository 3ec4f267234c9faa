//! Free-form attribute maps attached to audit entries.
//!
//! The map is ordered so that serialized entries (and everything derived
//! from them) are byte-for-byte reproducible.

use std::collections::BTreeMap;
use std::str::FromStr;

use institute_shared::types::StudentId;
use rust_decimal::Decimal;
use serde_json::Value;

use super::error::AuditError;

/// Attribute map captured alongside an audit entry.
pub type AuditDetails = BTreeMap<String, Value>;

/// Amount moved by the mutation.
pub const AMOUNT: &str = "amount";
/// Student the mutation relates to; drives batch inference.
pub const STUDENT_ID: &str = "studentId";
/// Payment method (`cash`, `upi`, `card`, `bank_transfer`, `cheque`).
pub const PAYMENT_METHOD: &str = "paymentMethod";
/// Receiving bank account.
pub const BANK_ACCOUNT: &str = "bankAccount";
/// Cheque number.
pub const CHEQUE_NUMBER: &str = "chequeNumber";
/// Operator remarks.
pub const REMARKS: &str = "remarks";
/// Reason given for refunds and adjustments.
pub const REASON: &str = "reason";
/// Receipt (voucher) number.
pub const RECEIPT_NUMBER: &str = "receiptNumber";
/// Calendar day of the underlying payment.
pub const PAYMENT_DATE: &str = "paymentDate";
/// Agreed placement cost after an edit.
pub const TOTAL_COST: &str = "totalCost";

/// Returns a non-blank string attribute.
#[must_use]
pub fn text<'a>(details: &'a AuditDetails, key: &str) -> Option<&'a str> {
    match details.get(key)? {
        Value::String(s) => Some(s.trim()).filter(|s| !s.is_empty()),
        _ => None,
    }
}

/// Reads the `amount` attribute.
///
/// Accepts JSON numbers and numeric strings; `null` counts as absent.
pub fn amount(details: &AuditDetails) -> Result<Option<Decimal>, AuditError> {
    let raw = match details.get(AMOUNT) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) if s.trim().is_empty() => return Ok(None),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => return Err(AuditError::InvalidAmount(other.to_string())),
    };

    let parsed = Decimal::from_str(&raw)
        .or_else(|_| Decimal::from_scientific(&raw))
        .map_err(|_| AuditError::InvalidAmount(raw.clone()))?;

    if parsed.is_sign_negative() && !parsed.is_zero() {
        return Err(AuditError::NegativeAmount(raw));
    }
    Ok(Some(parsed))
}

/// Reads the `studentId` attribute.
pub fn student_id(details: &AuditDetails) -> Result<Option<StudentId>, AuditError> {
    match text(details, STUDENT_ID) {
        None => Ok(None),
        Some(raw) => StudentId::from_str(raw)
            .map(Some)
            .map_err(|_| AuditError::InvalidStudentId(raw.to_string())),
    }
}
