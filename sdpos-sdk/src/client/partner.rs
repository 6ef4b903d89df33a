//! Partner API client (dashboard backend → partner).
//!
//! Every authenticated request is signed with
//! `HMAC-SHA256("{body}{timestamp}", api_secret)`; see
//! [`crate::signature`].

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use url::Url;

use super::transport::{HttpMethod, HttpTransport, ReqwestTransport, TransportRequest, TransportResponse};
use super::ClientError;
use crate::config::PartnerCredentials;
use crate::objects::export::{ExportJobResponse, ExportRequest, ExportStatusResponse};
use crate::objects::health::HealthResponse;
use crate::objects::machines::{MachineQuery, MachinesResponse};
use crate::objects::transactions::{TransactionQuery, TransactionsResponse};
use crate::signature::{API_KEY_HEADER, SIGNATURE_HEADER, SignedRequest, TIMESTAMP_HEADER};

pub const HEALTH_PATH: &str = "/pos-health";
pub const TRANSACTIONS_PATH: &str = "/api/partner/pos-transactions";
pub const MACHINES_PATH: &str = "/api/partner/pos-machines";
pub const EXPORT_PATH: &str = "/api/partner/pos-transactions/export";
pub const EXPORT_STATUS_PATH: &str = "/api/partner/export-status";

/// Typed HTTP client for the partner **POS API**.
///
/// Stateless: each call builds its own timestamp and signature, so clones
/// can be used concurrently.
#[derive(Clone)]
pub struct PartnerClient {
    transport: Arc<dyn HttpTransport>,
    credentials: PartnerCredentials,
}

impl std::fmt::Debug for PartnerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PartnerClient")
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl PartnerClient {
    /// Create a new `PartnerClient` backed by a default `reqwest::Client`.
    pub fn new(credentials: &PartnerCredentials) -> Self {
        Self {
            transport: Arc::new(ReqwestTransport::default()),
            credentials: credentials.clone(),
        }
    }

    /// Replace the default `reqwest::Client` with a custom one (e.g. to
    /// configure timeouts or a proxy).
    pub fn with_http_client(self, client: reqwest::Client) -> Self {
        self.with_transport(Arc::new(ReqwestTransport::new(client)))
    }

    /// Replace the transport entirely.
    pub fn with_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = transport;
        self
    }

    pub fn credentials(&self) -> &PartnerCredentials {
        &self.credentials
    }

    /// `GET /pos-health` – unauthenticated connectivity probe.
    pub async fn health_check(&self) -> Result<HealthResponse, ClientError> {
        let url = self.endpoint_url(HEALTH_PATH)?;
        let resp = self
            .transport
            .send(TransportRequest {
                method: HttpMethod::Get,
                url,
                headers: Vec::new(),
                body: None,
            })
            .await?;

        if !resp.is_success() {
            tracing::warn!(status = resp.status, "partner health check failed");
            return Err(ClientError::HealthCheck {
                status: resp.status,
            });
        }
        Ok(serde_json::from_slice(&resp.body)?)
    }

    /// `POST /api/partner/pos-transactions` – list transactions in a date
    /// range.
    pub async fn fetch_transactions(
        &self,
        query: TransactionQuery,
    ) -> Result<TransactionsResponse, ClientError> {
        let body = query.into_request();
        let value = self
            .send_signed(HttpMethod::Post, TRANSACTIONS_PATH, Some(&body))
            .await?;

        let mut resp: TransactionsResponse = serde_json::from_value(value)?;
        resp.summary.fill_rupee_strings();
        Ok(resp)
    }

    /// `GET /api/partner/pos-machines` – list machines assigned to the
    /// partner account.
    pub async fn fetch_machines(&self, query: &MachineQuery) -> Result<MachinesResponse, ClientError> {
        let path = format!("{MACHINES_PATH}?{}", query.to_query_string());
        let value = self.send_signed::<()>(HttpMethod::Get, &path, None).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// `POST /api/partner/pos-transactions/export` – queue an export job.
    pub async fn create_export(
        &self,
        request: &ExportRequest,
    ) -> Result<ExportJobResponse, ClientError> {
        let value = self
            .send_signed(HttpMethod::Post, EXPORT_PATH, Some(request))
            .await?;
        let resp: ExportJobResponse = serde_json::from_value(value)?;
        tracing::info!(
            job_id = %resp.data.job_id,
            status = ?resp.data.status,
            remaining = ?resp.data.remaining_exports_today,
            "export job created"
        );
        Ok(resp)
    }

    /// `GET /api/partner/export-status/{job_id}` – fetch the current state
    /// of an export job.
    pub async fn export_status(&self, job_id: &str) -> Result<ExportStatusResponse, ClientError> {
        let path = format!("{EXPORT_STATUS_PATH}/{}", urlencoding::encode(job_id));
        let value = self.send_signed::<()>(HttpMethod::Get, &path, None).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Sign and send a request, returning the parsed JSON body as-is.
    ///
    /// The body is serialized once; that exact string is both signed and
    /// transmitted. Bodiless requests sign the empty string.
    pub async fn send_signed<B: Serialize + ?Sized>(
        &self,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
    ) -> Result<Value, ClientError> {
        if !self.credentials.is_configured() {
            return Err(ClientError::NotConfigured);
        }

        let url = self.endpoint_url(path)?;
        let json = body.map(serde_json::to_string).transpose()?;
        let has_body = json.is_some();

        let SignedRequest {
            timestamp,
            body,
            signature,
        } = SignedRequest::new(
            json.unwrap_or_default(),
            self.credentials.api_secret.as_bytes(),
        );

        let request = TransportRequest {
            method,
            url,
            headers: vec![
                ("Content-Type", "application/json".to_string()),
                (API_KEY_HEADER, self.credentials.api_key.clone()),
                (SIGNATURE_HEADER, signature),
                (TIMESTAMP_HEADER, timestamp),
            ],
            body: has_body.then_some(body),
        };

        let resp = self.transport.send(request).await?;
        tracing::debug!(%method, path, status = resp.status, "partner request completed");

        if !resp.is_success() {
            let message = error_message(&resp);
            tracing::warn!(%method, path, status = resp.status, %message, "partner request failed");
            return Err(ClientError::Api {
                status: resp.status,
                message,
            });
        }

        Ok(serde_json::from_slice(&resp.body)?)
    }

    /// Base URL (without trailing slash) followed by `path`.
    fn endpoint_url(&self, path: &str) -> Result<Url, ClientError> {
        let base = self.credentials.api_base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }
}

/// Pull `error.message` out of a partner error body, falling back to
/// `"{status} {status_text}"`.
fn error_message(resp: &TransportResponse) -> String {
    serde_json::from_slice::<Value>(&resp.body)
        .ok()
        .and_then(|v| {
            v.get("error")?
                .get("message")?
                .as_str()
                .filter(|m| !m.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("{} {}", resp.status, resp.status_text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::testing::{ScriptedTransport, json_response, text_response};
    use crate::objects::export::{ExportFormat, ExportStatus};
    use crate::objects::transactions::TransactionStatus;
    use crate::signature;
    use time::macros::datetime;

    const SECRET: &str = "sk_test_secret";

    fn credentials(key: &str, secret: &str) -> PartnerCredentials {
        PartnerCredentials::new(
            Url::parse("https://partner.example.com/").unwrap(),
            key,
            secret,
        )
    }

    fn client_with(transport: &Arc<ScriptedTransport>) -> PartnerClient {
        PartnerClient::new(&credentials("pk_test_key", SECRET)).with_transport(transport.clone())
    }

    fn query() -> TransactionQuery {
        TransactionQuery::new(
            datetime!(2025-01-01 00:00:00 UTC),
            datetime!(2025-01-07 23:59:59.999 UTC),
        )
    }

    fn transactions_body() -> Value {
        serde_json::json!({
            "success": true,
            "data": [{
                "id": "b3c1",
                "razorpay_txn_id": "pay_123",
                "terminal_id": "T123",
                "amount": 1500,
                "status": "AUTHORIZED",
                "settlement_status": "SETTLED",
                "payment_mode": "UPI",
                "txn_time": "2025-01-02T10:00:00Z",
                "created_at": "2025-01-02T10:00:00Z"
            }],
            "pagination": {
                "page": 1, "page_size": 50, "total_records": 1,
                "total_pages": 1, "has_next": false, "has_prev": false
            },
            "summary": {
                "total_transactions": 1,
                "total_amount_paisa": 1500,
                "authorized_count": 1,
                "captured_count": 0,
                "failed_count": 0,
                "refunded_count": 0,
                "captured_amount_paisa": 0,
                "terminal_count": 1
            }
        })
    }

    #[tokio::test]
    async fn test_missing_secret_fails_before_network() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let client = PartnerClient::new(&credentials("pk_test_key", ""))
            .with_transport(transport.clone());

        assert!(matches!(
            client.fetch_transactions(query()).await,
            Err(ClientError::NotConfigured)
        ));
        assert!(matches!(
            client.fetch_machines(&MachineQuery::default()).await,
            Err(ClientError::NotConfigured)
        ));
        assert!(matches!(
            client.export_status("job_1").await,
            Err(ClientError::NotConfigured)
        ));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let client = PartnerClient::new(&credentials("", SECRET)).with_transport(transport.clone());
        let request = ExportRequest::new(
            ExportFormat::Csv,
            datetime!(2025-01-01 00:00:00 UTC),
            datetime!(2025-01-02 00:00:00 UTC),
        );
        assert!(matches!(
            client.create_export(&request).await,
            Err(ClientError::NotConfigured)
        ));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_signature_covers_transmitted_body() {
        let transport = Arc::new(ScriptedTransport::new(vec![json_response(
            200,
            transactions_body(),
        )]));
        let client = client_with(&transport);

        client
            .fetch_transactions(query().status("CAPTURED"))
            .await
            .unwrap();

        let sent = transport.request(0);
        assert_eq!(sent.method, HttpMethod::Post);
        assert_eq!(
            sent.url.as_str(),
            "https://partner.example.com/api/partner/pos-transactions"
        );
        assert_eq!(sent.header("x-api-key"), Some("pk_test_key"));
        assert_eq!(sent.header("content-type"), Some("application/json"));

        let body = sent.body.as_deref().unwrap();
        let timestamp = sent.header("x-timestamp").unwrap();
        let sig = sent.header("x-signature").unwrap();
        assert_eq!(sig, signature::sign(SECRET.as_bytes(), body, timestamp));
        assert!(signature::verify(SECRET.as_bytes(), body, timestamp, sig).is_ok());
        assert!(signature::check_timestamp(timestamp, signature::now_millis()).is_ok());

        let sent_json: Value = serde_json::from_str(body).unwrap();
        assert_eq!(sent_json["status"], "CAPTURED");
        assert_eq!(sent_json["terminal_id"], Value::Null);
        assert_eq!(sent_json["page_size"], 50);
    }

    #[tokio::test]
    async fn test_get_signs_timestamp_only() {
        let transport = Arc::new(ScriptedTransport::new(vec![json_response(
            200,
            serde_json::json!({
                "success": true,
                "data": [],
                "pagination": {
                    "page": 2, "limit": 5, "total": 0, "total_pages": 0,
                    "has_next_page": false, "has_prev_page": true
                }
            }),
        )]));
        let client = client_with(&transport);

        let resp = client
            .fetch_machines(&MachineQuery {
                page: Some(2),
                limit: Some(5),
                search: Some("kiosk 4".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(resp.data.is_empty());

        let sent = transport.request(0);
        assert_eq!(sent.method, HttpMethod::Get);
        assert_eq!(sent.body, None);
        assert_eq!(
            sent.url.as_str(),
            "https://partner.example.com/api/partner/pos-machines?page=2&limit=5&search=kiosk+4"
        );
        let timestamp = sent.header("x-timestamp").unwrap();
        assert_eq!(
            sent.header("x-signature").unwrap(),
            signature::sign(SECRET.as_bytes(), "", timestamp)
        );
    }

    #[tokio::test]
    async fn test_transactions_envelope_and_summary() {
        let transport = Arc::new(ScriptedTransport::new(vec![json_response(
            200,
            transactions_body(),
        )]));
        let resp = client_with(&transport)
            .fetch_transactions(query())
            .await
            .unwrap();

        assert_eq!(resp.pagination.total_records, 1);
        assert_eq!(resp.summary.total_amount_rupees.as_deref(), Some("15.00"));
        assert_eq!(resp.summary.captured_amount_rupees.as_deref(), Some("0.00"));

        let normalized = resp.normalized();
        assert_eq!(normalized[0].status, TransactionStatus::Success);
        assert_eq!(normalized[0].merchant_name, "Terminal T123");
    }

    #[tokio::test]
    async fn test_api_error_message_from_envelope() {
        let transport = Arc::new(ScriptedTransport::new(vec![json_response(
            500,
            serde_json::json!({"error": {"message": "terminal suspended"}}),
        )]));
        let err = client_with(&transport)
            .fetch_transactions(query())
            .await
            .unwrap_err();

        match err {
            ClientError::Api { status, message } => {
                assert_eq!(status, 500);
                assert_eq!(message, "terminal suspended");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_api_error_generic_message() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            text_response(500, "<html>upstream down</html>"),
            json_response(403, serde_json::json!({"error": "forbidden"})),
        ]));
        let client = client_with(&transport);

        let err = client.export_status("job_1").await.unwrap_err();
        assert!(matches!(
            &err,
            ClientError::Api { message, .. } if message == "500 Internal Server Error"
        ));
        assert_eq!(err.to_string(), "API request failed: 500 Internal Server Error");

        let err = client.export_status("job_1").await.unwrap_err();
        assert!(matches!(
            err,
            ClientError::Api { status: 403, message } if message == "403 Forbidden"
        ));
    }

    #[tokio::test]
    async fn test_transport_error_is_distinct() {
        let transport = Arc::new(ScriptedTransport::new(vec![]));
        let err = client_with(&transport)
            .fetch_machines(&MachineQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
        assert_eq!(transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_health_check_needs_no_credentials() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            json_response(200, serde_json::json!({"status": "ok", "service": "pos"})),
            text_response(503, ""),
        ]));
        let client = PartnerClient::new(&credentials("", "")).with_transport(transport.clone());

        let health = client.health_check().await.unwrap();
        assert_eq!(health.status, "ok");
        let sent = transport.request(0);
        assert_eq!(sent.url.as_str(), "https://partner.example.com/pos-health");
        assert!(sent.headers.is_empty());

        assert!(matches!(
            client.health_check().await,
            Err(ClientError::HealthCheck { status: 503 })
        ));
    }

    #[tokio::test]
    async fn test_export_create_and_status_paths() {
        let transport = Arc::new(ScriptedTransport::new(vec![
            json_response(
                202,
                serde_json::json!({"success": true, "data": {
                    "message": "Export queued",
                    "job_id": "job/42",
                    "format": "pdf",
                    "status": "QUEUED",
                    "remaining_exports_today": 9
                }}),
            ),
            json_response(
                200,
                serde_json::json!({"success": true, "data": {"job": {
                    "id": "job/42", "status": "PROCESSING", "format": "pdf",
                    "file_url": null, "created_at": "2025-01-01T00:00:00Z",
                    "completed_at": null
                }}}),
            ),
        ]));
        let client = client_with(&transport);

        let request = ExportRequest::new(
            ExportFormat::Pdf,
            datetime!(2025-01-01 00:00:00 UTC),
            datetime!(2025-01-31 23:59:59 UTC),
        );
        let created = client.create_export(&request).await.unwrap();
        assert_eq!(created.data.status, ExportStatus::Queued);
        assert_eq!(created.data.remaining_exports_today, Some(9));
        assert_eq!(
            transport.request(0).url.path(),
            "/api/partner/pos-transactions/export"
        );

        let status = client.export_status(&created.data.job_id).await.unwrap();
        assert_eq!(status.data.job.status, ExportStatus::Processing);
        assert_eq!(
            transport.request(1).url.path(),
            "/api/partner/export-status/job%2F42"
        );
    }

    #[tokio::test]
    async fn test_base_url_path_prefix_is_kept() {
        let transport = Arc::new(ScriptedTransport::new(vec![json_response(
            200,
            serde_json::json!({"status": "ok"}),
        )]));
        let creds = PartnerCredentials::new(
            Url::parse("https://gateway.example.com/sds").unwrap(),
            "",
            "",
        );
        PartnerClient::new(&creds)
            .with_transport(transport.clone())
            .health_check()
            .await
            .unwrap();
        assert_eq!(
            transport.request(0).url.as_str(),
            "https://gateway.example.com/sds/pos-health"
        );
    }
}
