//! Snapshot loading.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;

/// Reads a JSON array snapshot from disk.
pub fn load_snapshot<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_snapshot(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

/// Parses a JSON array snapshot.
pub fn parse_snapshot<T: DeserializeOwned>(raw: &str) -> Result<Vec<T>> {
    Ok(serde_json::from_str(raw)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use institute_core::AuditEntry;
    use institute_core::records::{Payment, PaymentStatus};
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_audit_snapshot() {
        let raw = r#"[{
            "id": "0190a5b2-7c3e-7000-8000-000000000001",
            "action": "PAYMENT",
            "entityType": "PAYMENT",
            "entityId": "0190a5b2-7c3e-7000-8000-0000000000aa",
            "entityName": "Asha Rao",
            "details": {"amount": "5000", "paymentMethod": "cash"},
            "amount": "5000",
            "timestamp": "2024-06-01T10:00:00Z",
            "batchId": "2024-25"
        }]"#;

        let entries: Vec<AuditEntry> = parse_snapshot(raw).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].amount, Some(dec!(5000)));
        assert_eq!(entries[0].entity_name, "Asha Rao");
    }

    #[test]
    fn test_parse_payment_snapshot_with_defaults() {
        let raw = r#"[{
            "id": "0190a5b2-7c3e-7000-8000-000000000002",
            "studentId": "0190a5b2-7c3e-7000-8000-000000000003",
            "amount": "2500.50",
            "paymentDate": "2024-06-01",
            "status": "completed",
            "receiptNumber": "RCT-2024-0001"
        }]"#;

        let payments: Vec<Payment> = parse_snapshot(raw).unwrap();
        assert_eq!(payments[0].status, PaymentStatus::Completed);
        assert_eq!(payments[0].amount, dec!(2500.50));
        assert!(payments[0].payment_method.is_none());
    }

    #[test]
    fn test_malformed_snapshot_is_an_error() {
        assert!(parse_snapshot::<Payment>("{not json").is_err());
        assert!(load_snapshot::<Payment>(Path::new("/nonexistent/payments.json")).is_err());
    }
}
