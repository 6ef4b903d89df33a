//! Dashboard POS API handlers.
//!
//! These endpoints are called by the admin dashboard frontend. They translate
//! dashboard vocabulary into partner vocabulary, call the partner through the
//! signed client, and reshape the results.
//!
//! # Endpoints
//!
//! - `GET  /transactions` – normalized transactions for a date range
//! - `GET  /machines`     – assigned POS machines
//! - `POST /export`       – queue an export job (202 Accepted)
//! - `GET  /export`       – export job status (`?jobId=`)
//! - `GET  /test`         – partner connectivity self-test

use axum::{
    Json, Router,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use sdpos_sdk::client::ClientError;
use serde::Serialize;

use crate::state::AppState;

mod diagnostics;
mod export;
mod machines;
#[cfg(test)]
mod test_support;
mod transactions;
mod vocabulary;

/// Build the dashboard POS router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(transactions::list_transactions))
        .route("/machines", get(machines::list_machines))
        .route(
            "/export",
            get(export::export_status).post(export::create_export),
        )
        .route("/test", get(diagnostics::self_test))
}

// ---------------------------------------------------------------------------
// Shared error type
// ---------------------------------------------------------------------------

/// Errors that can occur in dashboard API handlers.
#[derive(Debug)]
pub(crate) enum ApiError {
    /// The dashboard sent an incomplete or malformed request.
    BadRequest(String),
    /// The partner answered but reported `success: false`.
    Upstream(&'static str),
    /// The partner client failed.
    Partner(ClientError),
}

impl From<ClientError> for ApiError {
    fn from(err: ClientError) -> Self {
        Self::Partner(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    kind: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, kind, error) = match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, "bad_request", message),
            ApiError::Upstream(message) => {
                tracing::error!(reason = message, "Partner reported failure");
                (StatusCode::BAD_GATEWAY, "partner_error", message.to_string())
            }
            ApiError::Partner(e) => {
                let (status, kind) = match &e {
                    ClientError::NotConfigured => (StatusCode::SERVICE_UNAVAILABLE, "not_configured"),
                    ClientError::Transport(_) => (StatusCode::BAD_GATEWAY, "unreachable"),
                    ClientError::Api { .. } => (StatusCode::BAD_GATEWAY, "partner_error"),
                    ClientError::HealthCheck { .. } => {
                        (StatusCode::BAD_GATEWAY, "health_check_failed")
                    }
                    ClientError::Json(_) => (StatusCode::BAD_GATEWAY, "invalid_response"),
                    ClientError::Url(_) => {
                        (StatusCode::INTERNAL_SERVER_ERROR, "invalid_configuration")
                    }
                };
                tracing::error!(error = %e, kind, "Partner API call failed");
                (status, kind, e.to_string())
            }
        };

        (
            status,
            Json(ErrorBody {
                success: false,
                error,
                kind,
            }),
        )
            .into_response()
    }
}
