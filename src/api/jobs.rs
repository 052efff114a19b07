//
//  ebay-sdk
//  api/jobs.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Asynchronous bulk jobs and the poller that waits for them.
//!
//! A job is created by one call, then its status is read repeatedly until
//! it reaches [`JobStatus::Completed`], [`JobStatus::Aborted`] or
//! [`JobStatus::Failed`]. [`JobPoller`] waits a fixed interval between
//! reads and gives up after `max_attempts`.

use std::fmt;
use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::common::{SdkError, SdkResult};
use crate::util::format_duration;

/// Status of a bulk job.
///
/// Wire values are normalized: `Created` and `Scheduled` are
/// [`Pending`](Self::Pending), `InProcess` is [`InProgress`](Self::InProgress).
/// Anything unrecognized is kept as [`Other`](Self::Other) and treated as
/// non-terminal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    Pending,
    InProgress,
    Completed,
    Aborted,
    Failed,
    Other(String),
}

impl JobStatus {
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "Created" | "Scheduled" | "Pending" => Self::Pending,
            "InProcess" | "InProgress" => Self::InProgress,
            "Completed" => Self::Completed,
            "Aborted" => Self::Aborted,
            "Failed" => Self::Failed,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns `true` for `Completed`, `Aborted` and `Failed`.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Aborted | Self::Failed)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "InProgress",
            Self::Completed => "Completed",
            Self::Aborted => "Aborted",
            Self::Failed => "Failed",
            Self::Other(value) => value,
        }
    }
}

impl From<String> for JobStatus {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bulk job as last reported by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    pub job_id: String,
    pub file_reference_id: Option<String>,
    pub status: JobStatus,
}

impl JobHandle {
    pub fn new(job_id: impl Into<String>, status: JobStatus) -> Self {
        Self {
            job_id: job_id.into(),
            file_reference_id: None,
            status,
        }
    }

    pub fn with_file_reference_id(mut self, id: impl Into<String>) -> Self {
        self.file_reference_id = Some(id.into());
        self
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

/// Polls a job's status at a fixed interval until it is terminal.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use ebay_sdk::api::{JobHandle, JobPoller, JobStatus, SdkResult};
///
/// # async fn run() -> SdkResult<()> {
/// let poller = JobPoller::new(Duration::from_secs(5), 120);
/// let job = poller
///     .poll_until_terminal("5000012345", || async {
///         SdkResult::Ok(JobHandle::new("5000012345", JobStatus::Completed))
///     })
///     .await?;
/// assert!(job.is_terminal());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobPoller {
    interval: Duration,
    max_attempts: u32,
}

impl Default for JobPoller {
    fn default() -> Self {
        Self::new(Duration::from_secs(5), 120)
    }
}

impl JobPoller {
    /// Creates a poller reading at most `max_attempts` statuses (at least
    /// one), `interval` apart.
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts: max_attempts.max(1),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Calls `status` until it reports a terminal job.
    ///
    /// The first read happens immediately; later reads wait `interval`.
    /// Errors from `status` are returned as-is without further attempts.
    ///
    /// # Errors
    ///
    /// [`SdkError::PollLimitExceeded`] if the job is still not terminal
    /// after `max_attempts` reads.
    pub async fn poll_until_terminal<F, Fut>(&self, job_id: &str, mut status: F) -> SdkResult<JobHandle>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = SdkResult<JobHandle>>,
    {
        for attempt in 1..=self.max_attempts {
            let job = status().await?;
            debug!(job_id, attempt, status = %job.status, "Polled job status");

            if job.is_terminal() {
                info!(job_id, status = %job.status, attempts = attempt, "Job finished");
                return Ok(job);
            }

            if attempt < self.max_attempts {
                tokio::time::sleep(self.interval).await;
            }
        }

        let waited = self.interval * self.max_attempts.saturating_sub(1);
        warn!(job_id, waited = %format_duration(waited), "Job still running, giving up");
        Err(SdkError::PollLimitExceeded {
            job_id: job_id.to_string(),
            attempts: self.max_attempts,
        })
    }
}
