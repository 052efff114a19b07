//
//  ebay-sdk
//  api/legacy/bulk_data.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Bulk Data Exchange API.
//!
//! Jobs are created here, their files moved through
//! [`file_transfer`](super::file_transfer), and their progress followed
//! with [`BulkDataService::wait_for_job`].
//!
//! # Upload workflow
//!
//! | Step | Call |
//! |------|------|
//! | 1 | [`create_upload_job`](BulkDataService::create_upload_job) returns `jobId` and `fileReferenceId` |
//! | 2 | `FileTransferService::upload_file` sends the data file |
//! | 3 | [`start_upload_job`](BulkDataService::start_upload_job) queues processing |
//! | 4 | [`wait_for_job`](BulkDataService::wait_for_job) until `Completed` |
//! | 5 | `FileTransferService::download_file` fetches the response file |

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::client::ServiceClient;
use crate::api::codec::OperationSpec;
use crate::api::common::{Response, SdkError, SdkResult};
use crate::api::jobs::{JobHandle, JobPoller, JobStatus};
use crate::util::unique_id;

pub const CREATE_UPLOAD_JOB: OperationSpec =
    OperationSpec::xml("createUploadJob").with_required(&["uploadJobType", "UUID"]);
pub const START_UPLOAD_JOB: OperationSpec =
    OperationSpec::xml("startUploadJob").with_required(&["jobId"]);
pub const START_DOWNLOAD_JOB: OperationSpec =
    OperationSpec::xml("startDownloadJob").with_required(&["downloadJobType", "UUID"]);
pub const GET_JOB_STATUS: OperationSpec =
    OperationSpec::xml("getJobStatus").with_required(&["jobId"]);
pub const GET_JOBS: OperationSpec = OperationSpec::xml("getJobs");
pub const ABORT_JOB: OperationSpec = OperationSpec::xml("abortJob").with_required(&["jobId"]);

/// Request for `createUploadJob`.
///
/// `UUID` makes the call idempotent; [`new`](Self::new) generates one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUploadJobRequest {
    pub upload_job_type: String,
    #[serde(rename = "UUID")]
    pub uuid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
}

impl CreateUploadJobRequest {
    /// A new upload job of `job_type`, e.g. `AddFixedPriceItem`.
    pub fn new(job_type: impl Into<String>) -> Self {
        Self {
            upload_job_type: job_type.into(),
            uuid: unique_id(),
            file_type: None,
        }
    }

    pub fn with_file_type(mut self, file_type: impl Into<String>) -> Self {
        self.file_type = Some(file_type.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUploadJobResponse {
    pub job_id: Option<String>,
    pub file_reference_id: Option<String>,
}

/// Request naming a single job; used by `startUploadJob`, `getJobStatus`
/// and `abortJob`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobIdRequest {
    pub job_id: String,
}

impl JobIdRequest {
    pub fn new(job_id: impl Into<String>) -> Self {
        Self {
            job_id: job_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveInventoryReportFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_listing_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_price_item_details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadRequestFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_inventory_report_filter: Option<ActiveInventoryReportFilter>,
}

/// Request for `startDownloadJob`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StartDownloadJobRequest {
    pub download_job_type: String,
    #[serde(rename = "UUID")]
    pub uuid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_request_filter: Option<DownloadRequestFilter>,
}

impl StartDownloadJobRequest {
    /// A new download job of `job_type`, e.g. `ActiveInventoryReport`.
    pub fn new(job_type: impl Into<String>) -> Self {
        Self {
            download_job_type: job_type.into(),
            uuid: unique_id(),
            download_request_filter: None,
        }
    }

    pub fn with_filter(mut self, filter: DownloadRequestFilter) -> Self {
        self.download_request_filter = Some(filter);
        self
    }
}

/// Responses that only carry the job id (or nothing at all).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAck {
    pub job_id: Option<String>,
}

/// One job as reported by `getJobStatus` and `getJobs`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobProfile {
    pub job_id: String,
    pub job_type: Option<String>,
    pub job_status: JobStatus,
    pub percent_complete: Option<f64>,
    pub creation_time: Option<DateTime<Utc>>,
    pub completion_time: Option<DateTime<Utc>>,
    /// Id of the output file, once the job has produced one.
    pub file_reference_id: Option<String>,
    pub input_file_reference_id: Option<String>,
}

impl JobProfile {
    pub fn handle(&self) -> JobHandle {
        let handle = JobHandle::new(self.job_id.clone(), self.job_status.clone());
        match &self.file_reference_id {
            Some(id) => handle.with_file_reference_id(id.clone()),
            None => handle,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobProfilesResponse {
    pub job_profile: Option<Vec<JobProfile>>,
}

impl JobProfilesResponse {
    pub fn profiles(&self) -> &[JobProfile] {
        self.job_profile.as_deref().unwrap_or_default()
    }
}

/// Request for `getJobs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetJobsRequest {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub job_type: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub job_status: Vec<String>,
}

/// Typed access to the Bulk Data Exchange operations.
#[derive(Clone)]
pub struct BulkDataService {
    client: ServiceClient,
}

impl BulkDataService {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ServiceClient {
        &self.client
    }

    pub async fn create_upload_job(
        &self,
        request: &CreateUploadJobRequest,
    ) -> SdkResult<Response<CreateUploadJobResponse>> {
        self.client.call(&CREATE_UPLOAD_JOB, request).await
    }

    pub async fn start_upload_job(&self, job_id: &str) -> SdkResult<Response<JobAck>> {
        self.client
            .call(&START_UPLOAD_JOB, &JobIdRequest::new(job_id))
            .await
    }

    pub async fn start_download_job(
        &self,
        request: &StartDownloadJobRequest,
    ) -> SdkResult<Response<JobAck>> {
        self.client.call(&START_DOWNLOAD_JOB, request).await
    }

    pub async fn job_status(&self, job_id: &str) -> SdkResult<Response<JobProfilesResponse>> {
        self.client
            .call(&GET_JOB_STATUS, &JobIdRequest::new(job_id))
            .await
    }

    pub async fn jobs(&self, request: &GetJobsRequest) -> SdkResult<Response<JobProfilesResponse>> {
        self.client.call(&GET_JOBS, request).await
    }

    pub async fn abort_job(&self, job_id: &str) -> SdkResult<Response<JobAck>> {
        self.client.call(&ABORT_JOB, &JobIdRequest::new(job_id)).await
    }

    /// Reads `job_id`'s status once and turns it into a [`JobHandle`].
    ///
    /// # Errors
    ///
    /// [`SdkError::Rejected`] if the service answered with errors, or
    /// [`SdkError::Protocol`] if the response named no such job.
    pub async fn job_handle(&self, job_id: &str) -> SdkResult<JobHandle> {
        let payload = self
            .job_status(job_id)
            .await?
            .into_payload(GET_JOB_STATUS.name)?;

        payload
            .profiles()
            .iter()
            .find(|p| p.job_id == job_id)
            .or_else(|| payload.profiles().first())
            .map(JobProfile::handle)
            .ok_or_else(|| {
                SdkError::Protocol(format!("getJobStatus returned no profile for job {}", job_id))
            })
    }

    /// Polls `job_id` with `poller` until it completes, aborts or fails.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use ebay_sdk::api::legacy::bulk_data::{BulkDataService, StartDownloadJobRequest};
    /// use ebay_sdk::api::{JobPoller, JobStatus, ServiceClient};
    ///
    /// # async fn run(client: ServiceClient) -> ebay_sdk::api::SdkResult<()> {
    /// let bulk = BulkDataService::new(client);
    /// let started = bulk
    ///     .start_download_job(&StartDownloadJobRequest::new("ActiveInventoryReport"))
    ///     .await?
    ///     .into_payload("startDownloadJob")?;
    ///
    /// let job_id = started.job_id.unwrap_or_default();
    /// let job = bulk.wait_for_job(&JobPoller::default(), &job_id).await?;
    /// if job.status == JobStatus::Completed {
    ///     println!("report ready: {:?}", job.file_reference_id);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn wait_for_job(&self, poller: &JobPoller, job_id: &str) -> SdkResult<JobHandle> {
        poller
            .poll_until_terminal(job_id, move || self.job_handle(job_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::{client_for, ScriptedTransport};
    use crate::api::wire::{WireRequest, WireResponse};
    use crate::auth::Credentials;
    use crate::config::ApiFamily;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    const NS: &str = "http://www.ebay.com/marketplace/services";

    fn operation(request: &WireRequest) -> String {
        request
            .header("X-EBAY-SOA-OPERATION-NAME")
            .unwrap_or_default()
            .to_string()
    }

    fn status_xml(status: &str, file_reference_id: Option<&str>) -> String {
        let file = file_reference_id
            .map(|id| format!("<fileReferenceId>{}</fileReferenceId>", id))
            .unwrap_or_default();
        format!(
            r#"<getJobStatusResponse xmlns="{NS}">
  <ack>Success</ack>
  <jobProfile>
    <jobId>5000012345</jobId>
    <jobType>ActiveInventoryReport</jobType>
    <jobStatus>{status}</jobStatus>
    <creationTime>2024-03-01T10:00:00.000Z</creationTime>
    {file}
  </jobProfile>
</getJobStatusResponse>"#
        )
    }

    fn bulk(transport: Arc<ScriptedTransport>) -> BulkDataService {
        BulkDataService::new(client_for(
            ApiFamily::BulkDataExchange,
            Credentials::UserToken("AgAAAA**user".into()),
            transport,
        ))
    }

    #[tokio::test]
    async fn test_create_upload_job_sends_uuid() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            Ok(WireResponse::new(
                200,
                format!(
                    "<createUploadJobResponse xmlns=\"{NS}\"><ack>Success</ack>\
                     <jobId>5000000001</jobId><fileReferenceId>6000000001</fileReferenceId>\
                     </createUploadJobResponse>"
                ),
            ))
        }));
        let service = bulk(transport.clone());

        let request = CreateUploadJobRequest::new("AddFixedPriceItem").with_file_type("XML");
        let response = service.create_upload_job(&request).await.unwrap();
        let payload = response.payload().unwrap();
        assert_eq!(payload.job_id.as_deref(), Some("5000000001"));
        assert_eq!(payload.file_reference_id.as_deref(), Some("6000000001"));

        let sent = &transport.requests()[0];
        let body = sent.body_text().unwrap();
        assert!(body.contains("<uploadJobType>AddFixedPriceItem</uploadJobType>"));
        assert!(body.contains(&format!("<UUID>{}</UUID>", request.uuid)));
        assert_eq!(sent.header("X-EBAY-SOA-SECURITY-TOKEN"), Some("AgAAAA**user"));
        assert_eq!(sent.header("X-EBAY-SOA-SERVICE-NAME"), Some("BulkDataExchangeService"));
    }

    #[test]
    fn test_each_job_request_gets_a_fresh_uuid() {
        let a = CreateUploadJobRequest::new("ReviseFixedPriceItem");
        let b = CreateUploadJobRequest::new("ReviseFixedPriceItem");
        assert_ne!(a.uuid, b.uuid);
    }

    #[tokio::test]
    async fn test_wait_for_job_until_completed() {
        let reads = Arc::new(AtomicUsize::new(0));
        let counter = reads.clone();
        let transport = Arc::new(ScriptedTransport::new(move |request| {
            assert_eq!(operation(request), "getJobStatus");
            let body = match counter.fetch_add(1, Ordering::SeqCst) {
                0 => status_xml("Scheduled", None),
                1 => status_xml("InProcess", None),
                _ => status_xml("Completed", Some("6000000099")),
            };
            Ok(WireResponse::new(200, body))
        }));
        let service = bulk(transport.clone());

        let poller = JobPoller::new(Duration::from_millis(1), 10);
        let job = service.wait_for_job(&poller, "5000012345").await.unwrap();

        assert_eq!(job.status, JobStatus::Completed);
        assert_eq!(job.file_reference_id.as_deref(), Some("6000000099"));
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_wait_for_job_gives_up() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            Ok(WireResponse::new(200, status_xml("InProcess", None)))
        }));
        let service = bulk(transport.clone());

        let err = service
            .wait_for_job(&JobPoller::new(Duration::from_millis(1), 4), "5000012345")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SdkError::PollLimitExceeded { ref job_id, attempts: 4 } if job_id == "5000012345"
        ));
        assert_eq!(transport.calls(), 4);
    }

    #[tokio::test]
    async fn test_wait_for_job_stops_on_rejection() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            Ok(WireResponse::new(
                200,
                r#"<getJobStatusResponse>
  <ack>Failure</ack>
  <errorMessage><error><errorId>2</errorId><severity>Error</severity><message>Invalid job id</message></error></errorMessage>
</getJobStatusResponse>"#,
            ))
        }));
        let service = bulk(transport.clone());

        let err = service
            .wait_for_job(&JobPoller::new(Duration::from_millis(1), 10), "0")
            .await
            .unwrap_err();

        match err {
            SdkError::Rejected { operation, errors } => {
                assert_eq!(operation, "getJobStatus");
                assert_eq!(errors[0].message, "Invalid job id");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_jobs_without_profiles() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            Ok(WireResponse::new(200, "<getJobsResponse><ack>Success</ack></getJobsResponse>"))
        }));
        let service = bulk(transport);

        let response = service.jobs(&GetJobsRequest::default()).await.unwrap();
        let payload = response.payload().unwrap();
        assert!(payload.job_profile.is_none());
        assert!(payload.profiles().is_empty());
    }

    #[tokio::test]
    async fn test_abort_job() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            Ok(WireResponse::new(200, "<abortJobResponse><ack>Success</ack></abortJobResponse>"))
        }));
        let service = bulk(transport.clone());

        let response = service.abort_job("5000012345").await.unwrap();
        assert!(response.is_success());
        assert_eq!(operation(&transport.requests()[0]), "abortJob");
        assert!(transport.requests()[0]
            .body_text()
            .unwrap()
            .contains("<jobId>5000012345</jobId>"));
    }
}
