//
//  ebay-sdk
//  api/legacy/file_transfer.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! File Transfer API.
//!
//! Moves bulk job files as XOP attachments. The XML document only holds
//! an `<xop:Include>` reference; the bytes travel in their own MIME part.

use serde::{Deserialize, Serialize};

use crate::api::client::ServiceClient;
use crate::api::codec::{OperationSpec, XopInclude};
use crate::api::common::{Response, SdkResult};
use crate::api::wire::Attachment;

pub const UPLOAD_FILE: OperationSpec = OperationSpec::xml("uploadFile")
    .with_required(&["taskReferenceId", "fileReferenceId"]);
pub const DOWNLOAD_FILE: OperationSpec = OperationSpec::xml("downloadFile")
    .with_required(&["taskReferenceId", "fileReferenceId"]);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileAttachment {
    #[serde(rename = "Size")]
    pub size: u64,
    #[serde(rename = "Data")]
    pub data: XopInclude,
}

/// Request for `uploadFile`. `taskReferenceId` is the bulk job id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadFileRequest {
    pub task_reference_id: String,
    pub file_reference_id: String,
    pub file_format: String,
    pub file_attachment: FileAttachment,
}

impl UploadFileRequest {
    /// Describes `attachment` for upload; the file format defaults to `gzip`.
    pub fn new(
        job_id: impl Into<String>,
        file_reference_id: impl Into<String>,
        attachment: &Attachment,
    ) -> Self {
        Self {
            task_reference_id: job_id.into(),
            file_reference_id: file_reference_id.into(),
            file_format: "gzip".to_string(),
            file_attachment: FileAttachment {
                size: attachment.data.len() as u64,
                data: XopInclude::default(),
            },
        }
    }
}

/// Request for `downloadFile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DownloadFileRequest {
    pub task_reference_id: String,
    pub file_reference_id: String,
}

impl DownloadFileRequest {
    pub fn new(job_id: impl Into<String>, file_reference_id: impl Into<String>) -> Self {
        Self {
            task_reference_id: job_id.into(),
            file_reference_id: file_reference_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FileAttachmentInfo {
    #[serde(rename = "Size")]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileTransferResponse {
    pub file_attachment: Option<FileAttachmentInfo>,
}

/// Typed access to the File Transfer operations.
#[derive(Clone)]
pub struct FileTransferService {
    client: ServiceClient,
}

impl FileTransferService {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ServiceClient {
        &self.client
    }

    /// Uploads `attachment` as the input file of job `job_id`.
    pub async fn upload_file(
        &self,
        job_id: &str,
        file_reference_id: &str,
        attachment: &Attachment,
    ) -> SdkResult<Response<FileTransferResponse>> {
        let request = UploadFileRequest::new(job_id, file_reference_id, attachment);
        self.client
            .call_with_attachment(&UPLOAD_FILE, &request, attachment)
            .await
    }

    /// Downloads a job file. The bytes are in [`Response::attachment`].
    pub async fn download_file(
        &self,
        job_id: &str,
        file_reference_id: &str,
    ) -> SdkResult<Response<FileTransferResponse>> {
        self.client
            .call(&DOWNLOAD_FILE, &DownloadFileRequest::new(job_id, file_reference_id))
            .await
    }
}
