//! Export job types.
//!
//! An export job is created with a signed `POST`, then mutated only by the
//! partner. The client observes it by polling; `COMPLETED` and `FAILED` are
//! terminal.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::non_empty;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Excel,
    Pdf,
    Zip,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported export format: {0}")]
pub struct UnknownExportFormat(pub String);

impl FromStr for ExportFormat {
    type Err = UnknownExportFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(ExportFormat::Csv),
            "excel" => Ok(ExportFormat::Excel),
            "pdf" => Ok(ExportFormat::Pdf),
            "zip" => Ok(ExportFormat::Zip),
            _ => Err(UnknownExportFormat(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExportStatus {
    Queued,
    Processing,
    Completed,
    Failed,
}

/// `POST /api/partner/pos-transactions/export` body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRequest {
    pub format: ExportFormat,
    #[serde(with = "time::serde::rfc3339")]
    pub date_from: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub date_to: OffsetDateTime,
    pub status: Option<String>,
    pub terminal_id: Option<String>,
}

impl ExportRequest {
    pub fn new(format: ExportFormat, date_from: OffsetDateTime, date_to: OffsetDateTime) -> Self {
        Self {
            format,
            date_from,
            date_to,
            status: None,
            terminal_id: None,
        }
    }

    pub fn status(mut self, status: Option<String>) -> Self {
        self.status = non_empty(status);
        self
    }

    pub fn terminal_id(mut self, terminal_id: Option<String>) -> Self {
        self.terminal_id = non_empty(terminal_id);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportJobCreated {
    #[serde(default)]
    pub message: Option<String>,
    pub job_id: String,
    pub format: ExportFormat,
    pub status: ExportStatus,
    #[serde(default)]
    pub remaining_exports_today: Option<u32>,
}

/// Export creation envelope. The partner answers with `202 Accepted`; that
/// is the normal path, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportJobResponse {
    pub success: bool,
    pub data: ExportJobCreated,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportJob {
    pub id: String,
    pub status: ExportStatus,
    pub format: ExportFormat,
    #[serde(default)]
    pub file_url: Option<String>,
    #[serde(default)]
    pub file_size_bytes: Option<u64>,
    #[serde(default)]
    pub record_count: Option<u64>,
    pub created_at: String,
    #[serde(default)]
    pub completed_at: Option<String>,
    #[serde(default)]
    pub expires_at: Option<String>,
}

/// What a poller should do after observing a job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Still `QUEUED` or `PROCESSING`.
    InProgress(ExportStatus),
    /// `COMPLETED` with a downloadable file.
    Ready { file_url: String },
    /// `FAILED`.
    Failed,
    /// `COMPLETED` but no file URL. Not retryable.
    MissingFile,
}

impl ExportJob {
    pub fn outcome(&self) -> ExportOutcome {
        match self.status {
            ExportStatus::Failed => ExportOutcome::Failed,
            ExportStatus::Completed => match non_empty(self.file_url.clone()) {
                Some(file_url) => ExportOutcome::Ready { file_url },
                None => ExportOutcome::MissingFile,
            },
            status @ (ExportStatus::Queued | ExportStatus::Processing) => {
                ExportOutcome::InProgress(status)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportStatusData {
    pub job: ExportJob,
}

/// `GET /api/partner/export-status/{job_id}` response envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportStatusResponse {
    pub success: bool,
    pub data: ExportStatusData,
}
