//! In-memory transport for unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;

use super::transport::{HttpTransport, TransportError, TransportRequest, TransportResponse};

/// Replays canned responses in order and records every request. Once the
/// script is exhausted it returns the `repeat` response if set, otherwise a
/// transport error.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<TransportResponse>>,
    repeat: Option<TransportResponse>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new(responses: Vec<TransportResponse>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            ..Default::default()
        }
    }

    pub(crate) fn repeating(response: TransportResponse) -> Self {
        Self {
            repeat: Some(response),
            ..Default::default()
        }
    }

    pub(crate) fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub(crate) fn request(&self, index: usize) -> TransportRequest {
        self.requests.lock().unwrap()[index].clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        let next = self.responses.lock().unwrap().pop_front();
        next.or_else(|| self.repeat.clone())
            .ok_or_else(|| TransportError::new("connection refused"))
    }
}

pub(crate) fn text_response(status: u16, body: &str) -> TransportResponse {
    TransportResponse {
        status,
        status_text: reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|s| s.canonical_reason())
            .unwrap_or_default()
            .to_string(),
        body: Bytes::from(body.to_string()),
    }
}

pub(crate) fn json_response(status: u16, body: serde_json::Value) -> TransportResponse {
    text_response(status, &body.to_string())
}
