//
//  ebay-sdk
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! This module provides the engine every API family runs on, plus typed
//! operations for the families the SDK models.
//!
//! ## Supported Families
//!
//! - **XML, API-call dialect**: Trading, Shopping
//! - **XML, SOA dialect**: Finding, Business Policies, Bulk Data Exchange, File Transfer
//! - **REST/JSON**: Browse, Inventory
//!
//! ## Architecture
//!
//! A call flows through the same stages for every family:
//!
//! | Stage | Type | Responsibility |
//! |-------|------|----------------|
//! | Dispatch | [`ServiceClient`] | Validates, resolves credentials, runs the stages below |
//! | Encode / decode | [`Codec`] | Family wire format, headers, error entries |
//! | Transport | [`Transport`] | Sends a [`WireRequest`], returns a [`WireResponse`] |
//!
//! On top of the dispatcher sit three drivers:
//!
//! - [`Paginator`]: walks a paged operation, sequentially or concurrently
//! - [`BatchExecutor`]: runs keyed calls with bounded parallelism
//! - [`JobPoller`]: waits for a bulk job to reach a terminal status
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ebay_sdk::api::legacy::trading::TradingService;
//! use ebay_sdk::api::ServiceClient;
//! use ebay_sdk::auth::{AppCredentials, CredentialProvider, Credentials};
//! use ebay_sdk::config::{ApiFamily, EndpointConfig, Environment};
//!
//! # async fn run() -> ebay_sdk::api::SdkResult<()> {
//! let credentials = CredentialProvider::new(Credentials::UserToken("AgAAAA**...".into()))
//!     .with_app_identity(AppCredentials::new("MyApp-PRD", "PRD-cert").with_dev_id("dev-id"));
//!
//! let client = ServiceClient::builder(EndpointConfig::new(ApiFamily::Trading, Environment::Production))
//!     .credentials(Arc::new(credentials))
//!     .build()?;
//!
//! let response = TradingService::new(client).official_time().await?;
//! println!("{:?}", response.payload().and_then(|p| p.timestamp));
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! A call that produced a well-formed response returns `Ok`, even when the
//! API rejected the request; the reasons are in [`Response::errors`].
//! [`SdkError`] is reserved for calls that could not complete:
//!
//! - `Validation`: the request was rejected before any I/O
//! - `AuthRequired` / `Auth`: missing credentials or a failed refresh
//! - `Network` / `Timeout`: the transport failed
//! - `Protocol`: the response could not be decoded
//! - `Runtime`: a task panicked or no runtime was available

/// Types shared by every family.
///
/// Includes:
/// - [`SdkError`]: Call failures
/// - [`Response`]: Status, payload and ordered error entries
/// - [`PaginationState`]: Normalized paging state
pub mod common;

/// Wire-level request and response values.
pub(crate) mod wire;

/// The transport seam and its `reqwest` implementation.
pub(crate) mod transport;

/// Per-family encoders and decoders.
pub(crate) mod codec;

/// The dispatcher.
pub(crate) mod client;

pub(crate) mod batch;
pub(crate) mod jobs;
pub(crate) mod pager;

/// XML families (Trading, Shopping, Finding, Business Policies, Bulk Data, File Transfer).
pub mod legacy;

/// REST/JSON families (Browse, Inventory).
pub mod rest;

#[cfg(test)]
mod mock;

pub use batch::BatchExecutor;
pub use client::{PendingCall, ServiceClient, ServiceClientBuilder};
pub use codec::{
    codec_for, Codec, Decoded, OperationSpec, RawPayload, RestCodec, XmlCodec, XmlDialect,
    XopInclude, ATTACHMENT_HREF,
};
pub use common::{
    Ack, ErrorCategory, ErrorEntry, PagedRequest, PagedResponse, PaginationState, Response,
    SdkError, SdkResult, Severity,
};
pub use jobs::{JobHandle, JobPoller, JobStatus};
pub use pager::{Page, Paginator, DEFAULT_MAX_PAGES};
pub use transport::{HttpTransport, Transport, TransportConfig};
pub use wire::{Attachment, HttpMethod, WireBody, WireRequest, WireResponse};
