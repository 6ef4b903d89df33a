//! Bounded polling of export jobs.
//!
//! The partner never pushes export results; the caller polls
//! `export-status` until the job reaches a terminal state. The loop here
//! stops on `COMPLETED` with a file, on `FAILED`, on `COMPLETED` without a
//! file, on the first client error, or when the timeout elapses.

use std::time::Duration;

use tracing::{debug, info, warn};

use super::{ClientError, PartnerClient};
use crate::objects::export::{ExportJob, ExportJobResponse, ExportOutcome, ExportRequest};

/// Default interval between status polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
/// Default ceiling on the whole poll.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            timeout: DEFAULT_POLL_TIMEOUT,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExportPollError {
    #[error("export job {job_id} failed")]
    Failed { job_id: String },

    /// The partner reported `COMPLETED` without a file URL.
    #[error("export job {job_id} completed but no file URL was provided")]
    MissingFile { job_id: String },

    #[error("export job {job_id} did not finish within {timeout:?}")]
    TimedOut { job_id: String, timeout: Duration },

    #[error(transparent)]
    Client(#[from] ClientError),
}

/// Drives the export status protocol for one client.
#[derive(Debug, Clone)]
pub struct ExportPoller<'a> {
    client: &'a PartnerClient,
    settings: PollSettings,
}

impl<'a> ExportPoller<'a> {
    pub fn new(client: &'a PartnerClient, settings: PollSettings) -> Self {
        Self { client, settings }
    }

    /// Create an export job and wait for it to finish.
    pub async fn create_and_wait(
        &self,
        request: &ExportRequest,
    ) -> Result<(ExportJobResponse, ExportJob), ExportPollError> {
        let created = self.client.create_export(request).await?;
        let job = self.wait(&created.data.job_id).await?;
        Ok((created, job))
    }

    /// Poll `job_id` until it is ready, failed, anomalous, or timed out.
    ///
    /// The first poll is immediate; later polls are spaced by
    /// `settings.interval`. Returns the completed job, whose `file_url` is
    /// guaranteed to be set.
    pub async fn wait(&self, job_id: &str) -> Result<ExportJob, ExportPollError> {
        match tokio::time::timeout(self.settings.timeout, self.poll_until_terminal(job_id)).await
        {
            Ok(result) => result,
            Err(_) => {
                warn!(job_id, timeout = ?self.settings.timeout, "export poll timed out");
                Err(ExportPollError::TimedOut {
                    job_id: job_id.to_string(),
                    timeout: self.settings.timeout,
                })
            }
        }
    }

    async fn poll_until_terminal(&self, job_id: &str) -> Result<ExportJob, ExportPollError> {
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let job = self.client.export_status(job_id).await?.data.job;

            match job.outcome() {
                ExportOutcome::Ready { file_url } => {
                    info!(job_id, attempt, %file_url, "export job completed");
                    return Ok(job);
                }
                ExportOutcome::Failed => {
                    warn!(job_id, attempt, "export job failed");
                    return Err(ExportPollError::Failed {
                        job_id: job_id.to_string(),
                    });
                }
                ExportOutcome::MissingFile => {
                    warn!(job_id, attempt, "export job completed without a file url");
                    return Err(ExportPollError::MissingFile {
                        job_id: job_id.to_string(),
                    });
                }
                ExportOutcome::InProgress(status) => {
                    debug!(job_id, attempt, ?status, "export job still running");
                    tokio::time::sleep(self.settings.interval).await;
                }
            }
        }
    }
}
