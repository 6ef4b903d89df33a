use axum::{Json, extract::Query, extract::State, response::IntoResponse};
use sdpos_sdk::objects::machines::MachineQuery;

use super::ApiError;
use crate::state::AppState;

/// `GET /machines`: assigned POS machines, passed through unchanged.
pub async fn list_machines(
    State(state): State<AppState>,
    Query(query): Query<MachineQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let resp = state.partner.fetch_machines(&query).await?;
    if !resp.success {
        return Err(ApiError::Upstream("Failed to fetch POS machines"));
    }
    Ok(Json(resp))
}
