use axum::{
    Json,
    extract::{Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use sdpos_sdk::objects::export::{ExportFormat, ExportRequest, UnknownExportFormat};
use serde::Deserialize;

use super::ApiError;
use super::vocabulary::{partner_status, range_end, range_start};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateExportBody {
    pub format: Option<String>,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub status: Option<String>,
    pub terminal_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExportStatusParams {
    #[serde(rename = "jobId")]
    pub job_id: Option<String>,
}

/// `POST /export`: queue an export job.
///
/// Answers `202 Accepted` with the partner envelope; the dashboard polls
/// `GET /export?jobId=` afterwards.
pub async fn create_export(
    State(state): State<AppState>,
    payload: Result<Json<CreateExportBody>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    let (Some(format), Some(date_from), Some(date_to)) = (
        body.format.filter(|s| !s.is_empty()),
        body.date_from.filter(|s| !s.is_empty()),
        body.date_to.filter(|s| !s.is_empty()),
    ) else {
        return Err(ApiError::BadRequest(
            "format, date_from, and date_to are required".to_string(),
        ));
    };

    let format: ExportFormat = format
        .parse()
        .map_err(|e: UnknownExportFormat| ApiError::BadRequest(e.to_string()))?;

    let request = ExportRequest::new(format, range_start(&date_from)?, range_end(&date_to)?)
        .status(
            body.status
                .as_deref()
                .and_then(partner_status)
                .map(str::to_string),
        )
        .terminal_id(body.terminal_id);

    let resp = state.partner.create_export(&request).await?;
    Ok((StatusCode::ACCEPTED, Json(resp)))
}

/// `GET /export?jobId=`: current status of an export job.
pub async fn export_status(
    State(state): State<AppState>,
    Query(params): Query<ExportStatusParams>,
) -> Result<impl IntoResponse, ApiError> {
    let job_id = params
        .job_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("jobId is required".to_string()))?;

    let resp = state.partner.export_status(&job_id).await?;
    Ok(Json(resp))
}
