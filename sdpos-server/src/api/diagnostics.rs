//! Partner connectivity self-test.

use axum::{Json, extract::State, response::IntoResponse};
use sdpos_sdk::client::PartnerClient;
use sdpos_sdk::objects::machines::MachineQuery;
use sdpos_sdk::objects::transactions::TransactionQuery;
use serde::Serialize;
use serde_json::{Value, json};
use time::{Duration, OffsetDateTime};

use crate::state::AppState;

/// Sample values shipped in `.env` templates; treated as unset.
const PLACEHOLDER_KEY: &str = "pk_live_YOUR_API_KEY_HERE";
const PLACEHOLDER_SECRET: &str = "sk_live_YOUR_API_SECRET_HERE";

#[derive(Debug, Serialize)]
pub struct CredentialChecks {
    pub api_url: String,
    pub api_key_configured: bool,
    pub api_secret_configured: bool,
    pub api_key_prefix: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

impl CheckResult {
    fn passed(detail: Value) -> Self {
        Self {
            passed: true,
            error: None,
            detail: Some(detail),
        }
    }

    fn failed(error: impl ToString) -> Self {
        Self {
            passed: false,
            error: Some(error.to_string()),
            detail: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SelfTestResults {
    pub health_check: CheckResult,
    pub transactions: CheckResult,
    pub machines: CheckResult,
}

#[derive(Debug, Serialize)]
pub struct SelfTestReport {
    pub success: bool,
    pub message: &'static str,
    pub checks: CredentialChecks,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<SelfTestResults>,
}

/// `GET /test`: report credential status, then probe health, the last
/// seven days of transactions, and the machine list.
///
/// Always answers 200; failures are reported per check.
pub async fn self_test(State(state): State<AppState>) -> impl IntoResponse {
    let creds = state.partner.credentials();
    let checks = CredentialChecks {
        api_url: creds.api_base_url.to_string(),
        api_key_configured: !creds.api_key.is_empty() && creds.api_key != PLACEHOLDER_KEY,
        api_secret_configured: !creds.api_secret.is_empty()
            && creds.api_secret != PLACEHOLDER_SECRET,
        api_key_prefix: creds.key_prefix(),
    };

    if !checks.api_key_configured || !checks.api_secret_configured {
        return Json(SelfTestReport {
            success: false,
            message: "API credentials not configured",
            checks,
            results: None,
        });
    }

    let results = run_checks(&state.partner, OffsetDateTime::now_utc()).await;
    let success =
        results.health_check.passed && results.transactions.passed && results.machines.passed;

    Json(SelfTestReport {
        success,
        message: if success {
            "All API integrations are working"
        } else {
            "Some API checks failed"
        },
        checks,
        results: Some(results),
    })
}

async fn run_checks(partner: &PartnerClient, now: OffsetDateTime) -> SelfTestResults {
    let health_check = match partner.health_check().await {
        Ok(health) => CheckResult::passed(json!(health)),
        Err(e) => CheckResult::failed(e),
    };

    let query = TransactionQuery::new(now - Duration::days(7), now).page_size(5);
    let transactions = match partner.fetch_transactions(query).await {
        Ok(resp) => CheckResult::passed(json!({
            "total_records": resp.pagination.total_records,
            "sample_count": resp.data.len(),
            "summary": resp.summary,
        })),
        Err(e) => CheckResult::failed(e),
    };

    let machines_query = MachineQuery {
        page: Some(1),
        limit: Some(5),
        ..Default::default()
    };
    let machines = match partner.fetch_machines(&machines_query).await {
        Ok(resp) => CheckResult::passed(json!({
            "total_machines": resp.pagination.total,
            "sample": resp.data.iter().map(|m| json!({
                "terminal_id": m.terminal_id,
                "machine_model": m.machine_model,
                "status": m.status,
                "retailer_name": m.retailer_name,
            })).collect::<Vec<_>>(),
        })),
        Err(e) => CheckResult::failed(e),
    };

    SelfTestResults {
        health_check,
        transactions,
        machines,
    }
}
