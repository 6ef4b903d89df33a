use axum::{Json, extract::Query, extract::State, response::IntoResponse};
use rust_decimal::Decimal;
use sdpos_sdk::objects::transactions::{
    NormalizedTransaction, TransactionPagination, TransactionQuery, TransactionSummary,
};
use serde::{Deserialize, Serialize};

use super::ApiError;
use super::vocabulary::{partner_payment_mode, partner_status, range_end, range_start};
use crate::state::AppState;

const DEFAULT_PAGE_SIZE: u32 = 50;

/// Dashboard query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub status: Option<String>,
    pub payment_method: Option<String>,
    pub terminal_id: Option<String>,
    pub search: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

/// Partner summary in dashboard terms.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_amount: Decimal,
    pub total_amount_rupees: String,
    pub total_transactions: u64,
    pub success_count: u64,
    pub failed_count: u64,
    pub refunded_count: u64,
    pub authorized_count: u64,
    pub captured_amount_rupees: String,
    pub terminal_count: u64,
}

impl From<&TransactionSummary> for DashboardSummary {
    fn from(s: &TransactionSummary) -> Self {
        let mut s = s.clone();
        s.fill_rupee_strings();
        Self {
            total_amount: s.total_amount(),
            total_amount_rupees: s.total_amount_rupees.unwrap_or_default(),
            total_transactions: s.total_transactions,
            success_count: s.captured_count,
            failed_count: s.failed_count,
            refunded_count: s.refunded_count,
            authorized_count: s.authorized_count,
            captured_amount_rupees: s.captured_amount_rupees.unwrap_or_default(),
            terminal_count: s.terminal_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TransactionsPage {
    pub success: bool,
    pub data: Vec<NormalizedTransaction>,
    pub pagination: TransactionPagination,
    pub summary: DashboardSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// `GET /transactions`: normalized transactions for a date range.
///
/// Without both dates no partner call is made and an empty page is
/// returned. `search` filters the fetched page locally; the partner has no
/// text search.
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(params): Query<TransactionsParams>,
) -> Result<impl IntoResponse, ApiError> {
    let (Some(start), Some(end)) = (params.start_date.as_deref(), params.end_date.as_deref())
    else {
        return Ok(Json(empty_page()));
    };

    let mut query = TransactionQuery::new(range_start(start)?, range_end(end)?);
    query.status = params
        .status
        .as_deref()
        .and_then(partner_status)
        .map(str::to_string);
    query.payment_mode = params
        .payment_method
        .as_deref()
        .and_then(partner_payment_mode)
        .map(str::to_string);
    query.terminal_id = params.terminal_id;
    query.page = params.page;
    query.page_size = params.page_size;

    let resp = state.partner.fetch_transactions(query).await?;

    let mut data = resp.normalized();
    if let Some(needle) = params.search.filter(|s| !s.is_empty()) {
        let needle = needle.to_lowercase();
        data.retain(|txn| matches_search(txn, &needle));
    }

    Ok(Json(TransactionsPage {
        success: true,
        data,
        pagination: resp.pagination,
        summary: DashboardSummary::from(&resp.summary),
        message: None,
    }))
}

fn empty_page() -> TransactionsPage {
    TransactionsPage {
        success: true,
        data: Vec::new(),
        pagination: TransactionPagination {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
            ..Default::default()
        },
        summary: DashboardSummary::from(&TransactionSummary::default()),
        message: Some("Please provide date range (startDate and endDate)"),
    }
}

/// Case-insensitive substring match; `needle` must already be lowercase.
fn matches_search(txn: &NormalizedTransaction, needle: &str) -> bool {
    [
        Some(txn.transaction_id.as_str()),
        Some(txn.reference_number.as_str()),
        Some(txn.terminal_id.as_str()),
        Some(txn.merchant_name.as_str()),
        Some(txn.external_ref.as_str()),
        txn.retailer_code.as_deref(),
        txn.retailer_name.as_deref(),
    ]
    .into_iter()
    .flatten()
    .any(|field| field.to_lowercase().contains(needle))
}
