//! POS transaction types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::non_empty;

const DEFAULT_PAGE: u32 = 1;
const DEFAULT_PAGE_SIZE: u32 = 50;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// A transaction exactly as the partner returns it.
///
/// `status` and `payment_mode` stay as strings: the partner's vocabulary is
/// not fully pinned down and the mapper must handle values outside the
/// documented enums. Either may be null or absent on older records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTransaction {
    pub id: String,
    #[serde(rename = "razorpay_txn_id")]
    pub gateway_txn_id: String,
    #[serde(default)]
    pub external_ref: Option<String>,
    pub terminal_id: String,
    /// Paise or rupees depending on the record; see [`crate::mapper::amount_in_rupees`].
    pub amount: Decimal,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub rrn: Option<String>,
    #[serde(default)]
    pub card_brand: Option<String>,
    #[serde(default)]
    pub card_type: Option<String>,
    #[serde(default)]
    pub payment_mode: Option<String>,
    #[serde(default)]
    pub settlement_status: Option<String>,
    #[serde(default)]
    pub device_serial: Option<String>,
    #[serde(default)]
    pub txn_time: Option<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub retailer_code: Option<String>,
    #[serde(default)]
    pub retailer_name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionPagination {
    pub page: u32,
    pub page_size: u32,
    pub total_records: u64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Aggregates over the whole filtered range, not just the returned page.
///
/// Monetary totals arrive in paise. The rupee strings are kept when the
/// partner sends them and computed otherwise, so callers always get both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransactionSummary {
    pub total_transactions: u64,
    pub total_amount_paisa: i64,
    pub total_amount_rupees: Option<String>,
    pub authorized_count: u64,
    pub captured_count: u64,
    pub failed_count: u64,
    pub refunded_count: u64,
    pub captured_amount_paisa: i64,
    pub captured_amount_rupees: Option<String>,
    pub terminal_count: u64,
}

impl TransactionSummary {
    /// Populate missing rupee strings from the paise totals.
    pub fn fill_rupee_strings(&mut self) {
        if self.total_amount_rupees.is_none() {
            self.total_amount_rupees = Some(rupee_string(self.total_amount_paisa));
        }
        if self.captured_amount_rupees.is_none() {
            self.captured_amount_rupees = Some(rupee_string(self.captured_amount_paisa));
        }
    }

    pub fn total_amount(&self) -> Decimal {
        paise_to_rupees(self.total_amount_paisa)
    }

    pub fn captured_amount(&self) -> Decimal {
        paise_to_rupees(self.captured_amount_paisa)
    }
}

/// `POST /api/partner/pos-transactions` response envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionsResponse {
    pub success: bool,
    pub data: Vec<RawTransaction>,
    pub pagination: TransactionPagination,
    #[serde(default)]
    pub summary: TransactionSummary,
}

impl TransactionsResponse {
    /// The page's records in dashboard shape.
    pub fn normalized(&self) -> Vec<NormalizedTransaction> {
        self.data
            .iter()
            .map(crate::mapper::normalize_transaction)
            .collect()
    }
}

/// Convert an exact paise amount to rupees.
pub fn paise_to_rupees(paise: i64) -> Decimal {
    Decimal::new(paise, 2)
}

/// Render paise as a two-decimal rupee string, e.g. `123450` → `"1234.50"`.
pub fn rupee_string(paise: i64) -> String {
    paise_to_rupees(paise).to_string()
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// Filters for the transaction listing. Both dates are required by the
/// partner; everything else is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionQuery {
    pub date_from: OffsetDateTime,
    pub date_to: OffsetDateTime,
    pub status: Option<String>,
    pub terminal_id: Option<String>,
    pub payment_mode: Option<String>,
    pub settlement_status: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl TransactionQuery {
    pub fn new(date_from: OffsetDateTime, date_to: OffsetDateTime) -> Self {
        Self {
            date_from,
            date_to,
            status: None,
            terminal_id: None,
            payment_mode: None,
            settlement_status: None,
            page: None,
            page_size: None,
        }
    }

    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    pub fn terminal_id(mut self, terminal_id: impl Into<String>) -> Self {
        self.terminal_id = Some(terminal_id.into());
        self
    }

    pub fn payment_mode(mut self, payment_mode: impl Into<String>) -> Self {
        self.payment_mode = Some(payment_mode.into());
        self
    }

    pub fn settlement_status(mut self, settlement_status: impl Into<String>) -> Self {
        self.settlement_status = Some(settlement_status.into());
        self
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = Some(page_size);
        self
    }

    /// Build the wire body, applying pagination defaults and turning empty
    /// filters into explicit nulls.
    pub fn into_request(self) -> TransactionsRequest {
        TransactionsRequest {
            date_from: self.date_from,
            date_to: self.date_to,
            status: non_empty(self.status),
            terminal_id: non_empty(self.terminal_id),
            payment_mode: non_empty(self.payment_mode),
            settlement_status: non_empty(self.settlement_status),
            page: self.page.filter(|p| *p > 0).unwrap_or(DEFAULT_PAGE),
            page_size: self
                .page_size
                .filter(|p| *p > 0)
                .unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }
}

/// Wire body for the transaction listing. Every key is always serialized;
/// unset filters go out as `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionsRequest {
    #[serde(with = "time::serde::rfc3339")]
    pub date_from: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub date_to: OffsetDateTime,
    pub status: Option<String>,
    pub terminal_id: Option<String>,
    pub payment_mode: Option<String>,
    pub settlement_status: Option<String>,
    pub page: u32,
    pub page_size: u32,
}

// ---------------------------------------------------------------------------
// Dashboard shape
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Success,
    Failed,
    Pending,
    Refunded,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Card,
    Upi,
    Nfc,
    Other,
}

/// The transaction shape consumed by the dashboard.
///
/// `amount` is always in rupees.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedTransaction {
    pub id: String,
    pub transaction_id: String,
    pub external_ref: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    pub currency: String,
    pub status: TransactionStatus,
    pub payment_method: PaymentMethod,
    pub merchant_name: String,
    pub terminal_id: String,
    pub timestamp: String,
    pub reference_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub settlement_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_serial: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retailer_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retailer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
