//! Router test helpers: a recording fake partner and request shortcuts.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use bytes::Bytes;
use sdpos_sdk::client::{
    HttpTransport, PartnerClient, TransportError, TransportRequest, TransportResponse,
};
use sdpos_sdk::config::PartnerCredentials;
use tower::ServiceExt;
use url::Url;

use crate::state::AppState;

/// Answers with scripted `(status, json)` pairs in order, recording every
/// request. Refuses the connection once the script runs out.
pub(crate) struct FakePartner {
    responses: Mutex<VecDeque<(u16, serde_json::Value)>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl FakePartner {
    pub(crate) fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn request(&self, index: usize) -> TransportRequest {
        self.requests.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl HttpTransport for FakePartner {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        let (status, body) = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| TransportError::new("connection refused"))?;
        Ok(TransportResponse {
            status,
            status_text: StatusCode::from_u16(status)
                .ok()
                .and_then(|s| s.canonical_reason())
                .unwrap_or_default()
                .to_string(),
            body: Bytes::from(body.to_string()),
        })
    }
}

pub(crate) fn test_state(
    configured: bool,
    responses: Vec<(u16, serde_json::Value)>,
) -> (AppState, Arc<FakePartner>) {
    let fake = Arc::new(FakePartner {
        responses: Mutex::new(responses.into()),
        requests: Mutex::new(Vec::new()),
    });
    let (key, secret) = if configured {
        ("pk_test_dashboard", "sk_test_dashboard")
    } else {
        ("", "")
    };
    let credentials = PartnerCredentials::new(
        Url::parse("https://partner.example.com").unwrap(),
        key,
        secret,
    );
    let partner = PartnerClient::new(&credentials).with_transport(fake.clone());
    (AppState::new(partner), fake)
}

pub(crate) async fn get(router: Router, uri: &str) -> Response {
    router
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub(crate) async fn post_json(router: Router, uri: &str, json: serde_json::Value) -> Response {
    router
        .oneshot(
            Request::post(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub(crate) async fn body_json(resp: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}
