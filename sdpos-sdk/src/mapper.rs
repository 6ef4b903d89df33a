//! Conversion from partner transactions to the dashboard shape.
//!
//! Everything here is pure: no I/O, no clock, no randomness.

use rust_decimal::Decimal;

use crate::objects::transactions::{
    NormalizedTransaction, PaymentMethod, RawTransaction, TransactionStatus,
};

/// Amounts at or above this value are taken to be paise.
pub const PAISE_THRESHOLD: Decimal = Decimal::ONE_THOUSAND;

pub const CURRENCY: &str = "INR";

/// Map a partner transaction to the dashboard shape.
pub fn normalize_transaction(raw: &RawTransaction) -> NormalizedTransaction {
    let description = raw.card_brand.as_ref().map(|brand| {
        format!("{} {}", raw.card_type.as_deref().unwrap_or(""), brand)
            .trim()
            .to_string()
    });

    NormalizedTransaction {
        id: raw.id.clone(),
        transaction_id: raw.gateway_txn_id.clone(),
        external_ref: raw.external_ref.clone().unwrap_or_default(),
        amount: amount_in_rupees(raw.amount),
        currency: CURRENCY.to_string(),
        status: map_status(
            raw.status.as_deref().unwrap_or_default(),
            raw.settlement_status.as_deref(),
        ),
        payment_method: map_payment_mode(raw.payment_mode.as_deref().unwrap_or_default()),
        merchant_name: raw
            .retailer_name
            .clone()
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| format!("Terminal {}", raw.terminal_id)),
        terminal_id: raw.terminal_id.clone(),
        timestamp: raw
            .txn_time
            .clone()
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| raw.created_at.clone()),
        reference_number: raw
            .rrn
            .clone()
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| raw.gateway_txn_id.clone()),
        card_brand: raw.card_brand.clone(),
        card_type: raw.card_type.clone(),
        settlement_status: raw.settlement_status.clone(),
        device_serial: raw.device_serial.clone(),
        retailer_code: raw.retailer_code.clone(),
        retailer_name: raw.retailer_name.clone(),
        description,
    }
}

/// Map a partner status (case-insensitive) to the dashboard status.
///
/// `AUTHORIZED` is pending unless the settlement already went through.
/// Values containing `SUCCESS` or `COMPLETED` are outside the documented
/// vocabulary but have been seen, and count as success. Anything else
/// unrecognised is pending.
pub fn map_status(status: &str, settlement_status: Option<&str>) -> TransactionStatus {
    let status = status.to_ascii_uppercase();
    if status.contains("SUCCESS") || status.contains("COMPLETED") {
        return TransactionStatus::Success;
    }
    match status.as_str() {
        "AUTHORIZED"
            if settlement_status.is_some_and(|s| s.eq_ignore_ascii_case("SETTLED")) =>
        {
            TransactionStatus::Success
        }
        "AUTHORIZED" => TransactionStatus::Pending,
        "CAPTURED" => TransactionStatus::Success,
        "FAILED" | "VOIDED" => TransactionStatus::Failed,
        "REFUNDED" => TransactionStatus::Refunded,
        _ => TransactionStatus::Pending,
    }
}

pub fn map_payment_mode(payment_mode: &str) -> PaymentMethod {
    match payment_mode {
        "CARD" => PaymentMethod::Card,
        "UPI" => PaymentMethod::Upi,
        "NFC" => PaymentMethod::Nfc,
        _ => PaymentMethod::Other,
    }
}

/// Convert a partner amount to rupees.
///
/// Historical partner data mixes paise and rupees in the same field. Values
/// at or above [`PAISE_THRESHOLD`] are treated as paise, smaller values as
/// rupees. This is a heuristic kept for compatibility with existing data:
/// it misreads a genuine sub-₹10 paise amount and any rupee amount of 1000
/// or more. Do not change it without confirming the partner's unit.
pub fn amount_in_rupees(amount: Decimal) -> Decimal {
    if amount >= PAISE_THRESHOLD {
        amount / Decimal::ONE_HUNDRED
    } else {
        amount
    }
}
