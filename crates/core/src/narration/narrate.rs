//! Narration templates.

use super::NarrationFormatter;
use crate::audit::details::{self, AuditDetails};
use crate::audit::{AuditAction, AuditEntry};

/// Payment methods for which the receiving bank account is shown.
const BANK_METHODS: [&str; 4] = ["upi", "card", "bank_transfer", "cheque"];

impl NarrationFormatter {
    /// Composes the "Particulars" sentence for an entry.
    #[must_use]
    pub fn narrate(entry: &AuditEntry) -> String {
        let name = match entry.entity_name.trim() {
            "" => "Unknown",
            name => name,
        };
        let via = Self::via_clause(&entry.details);
        let entity = entry.entity_type.display_name();

        let base = match entry.action {
            AuditAction::Payment => format!("Fee received from {name}{via}"),
            AuditAction::PlacementPayment => {
                format!("Placement installment received from {name}{via}")
            }
            AuditAction::CompanyPaymentDebit => format!("Company payment made for {name}{via}"),
            AuditAction::Refund => format!("Refund issued to {name}{via}"),
            AuditAction::Adjustment => format!("Adjustment posted for {name}"),
            AuditAction::Scholarship => format!("Scholarship granted to {name}"),
            AuditAction::Discount => format!("Discount allowed to {name}"),
            AuditAction::Create => format!("{entity} record created for {name}"),
            AuditAction::Update => format!("{entity} record updated for {name}"),
            AuditAction::Delete => format!("{entity} record removed for {name}"),
        };

        format!("{base} - {}", Self::remarks(entry))
    }

    /// Returns the entry's remarks, falling back to a per-action default.
    #[must_use]
    pub fn remarks(entry: &AuditEntry) -> String {
        details::text(&entry.details, details::REMARKS)
            .or_else(|| details::text(&entry.details, details::REASON))
            .unwrap_or(match entry.action {
                AuditAction::Payment => "Fee payment",
                AuditAction::PlacementPayment => "Placement installment",
                AuditAction::CompanyPaymentDebit => "Payment to placement company",
                AuditAction::Refund => "Refund issued",
                AuditAction::Adjustment => "Manual adjustment",
                AuditAction::Scholarship => "Scholarship awarded",
                AuditAction::Discount => "Fee discount",
                AuditAction::Create => "Record created",
                AuditAction::Update => "Record updated",
                AuditAction::Delete => "Record deleted",
            })
            .to_string()
    }

    /// Returns the "Method/Bank" cell, e.g. `UPI / HDFC 0042`.
    #[must_use]
    pub fn method_display(details: &AuditDetails) -> Option<String> {
        let method = details::text(details, details::PAYMENT_METHOD)?;
        let mut out = Self::method_label(method);
        if let Some(cheque) = Self::cheque_number(method, details) {
            out.push_str(&format!(" No. {cheque}"));
        }
        if let Some(bank) = Self::bank_account(method, details) {
            out.push_str(&format!(" / {bank}"));
        }
        Some(out)
    }

    /// Returns the voucher (receipt) number, if one was captured.
    #[must_use]
    pub fn voucher(entry: &AuditEntry) -> Option<&str> {
        details::text(&entry.details, details::RECEIPT_NUMBER)
    }

    /// Display label for a payment method code.
    #[must_use]
    pub fn method_label(method: &str) -> String {
        match method.trim().to_ascii_lowercase().as_str() {
            "cash" => "Cash".to_string(),
            "upi" => "UPI".to_string(),
            "card" => "Card".to_string(),
            "bank_transfer" => "Bank Transfer".to_string(),
            "cheque" => "Cheque".to_string(),
            other => other
                .split(['_', ' '])
                .filter(|w| !w.is_empty())
                .map(|w| {
                    let mut chars = w.chars();
                    chars.next().map_or_else(String::new, |first| {
                        first.to_uppercase().chain(chars).collect()
                    })
                })
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    fn via_clause(details: &AuditDetails) -> String {
        let Some(method) = details::text(details, details::PAYMENT_METHOD) else {
            return String::new();
        };
        let mut out = format!(" via {}", Self::method_label(method));
        if let Some(cheque) = Self::cheque_number(method, details) {
            out.push_str(&format!(" No. {cheque}"));
        }
        if let Some(bank) = Self::bank_account(method, details) {
            out.push_str(&format!(" ({bank})"));
        }
        out
    }

    fn bank_account<'a>(method: &str, details: &'a AuditDetails) -> Option<&'a str> {
        let method = method.trim().to_ascii_lowercase();
        if BANK_METHODS.contains(&method.as_str()) {
            details::text(details, details::BANK_ACCOUNT)
        } else {
            None
        }
    }

    fn cheque_number<'a>(method: &str, details: &'a AuditDetails) -> Option<&'a str> {
        if method.trim().eq_ignore_ascii_case("cheque") {
            details::text(details, details::CHEQUE_NUMBER)
        } else {
            None
        }
    }
}
