//! HTTP client for the partner API.
//!
//! Gated behind the `client` cargo feature so downstream crates that only
//! need the shared types and the mapper do not pull in `reqwest`.

mod export_poller;
mod partner;
#[cfg(test)]
pub(crate) mod testing;
mod transport;

pub use export_poller::{ExportPollError, ExportPoller, PollSettings};
pub use partner::{
    EXPORT_PATH, EXPORT_STATUS_PATH, HEALTH_PATH, MACHINES_PATH, PartnerClient,
    TRANSACTIONS_PATH,
};
pub use transport::{
    HttpMethod, HttpTransport, ReqwestTransport, TransportError, TransportRequest,
    TransportResponse,
};

/// Errors produced by [`PartnerClient`].
///
/// `NotConfigured`, `Transport` and `Api` are kept apart so callers can tell
/// "not set up", "could not reach the partner" and "the partner refused".
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// API key or secret is empty. Raised before any network call.
    #[error(
        "API credentials not configured. Please set SAME_DAY_SOLUTIONS_API_KEY and SAME_DAY_SOLUTIONS_API_SECRET environment variables."
    )]
    NotConfigured,

    /// The partner could not be reached.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The partner returned a non-2xx status.
    #[error("API request failed: {message}")]
    Api { status: u16, message: String },

    /// The unauthenticated health probe returned a non-2xx status.
    #[error("Health check failed: {status}")]
    HealthCheck { status: u16 },

    /// Response body could not be deserialized.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The base URL could not be joined with the endpoint path.
    #[error("invalid url: {0}")]
    Url(#[from] url::ParseError),
}
