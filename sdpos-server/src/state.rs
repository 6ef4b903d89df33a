//! Application state shared across all request handlers.

use sdpos_sdk::client::PartnerClient;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (the client's transport is
/// behind an Arc).
#[derive(Clone, Debug)]
pub struct AppState {
    /// Signed client for the partner API.
    pub partner: PartnerClient,
}

impl AppState {
    /// Create a new AppState around a configured partner client.
    pub fn new(partner: PartnerClient) -> Self {
        Self { partner }
    }
}
