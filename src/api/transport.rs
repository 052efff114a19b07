//
//  ebay-sdk
//  api/transport.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Transport
//!
//! This module provides the [`Transport`] seam between the operation
//! dispatcher and the network, and the default reqwest-backed
//! implementation, [`HttpTransport`].
//!
//! ## Features
//!
//! - Pluggable: any type implementing [`Transport`] can be injected into a
//!   [`ServiceClient`](crate::api::ServiceClient), including test doubles
//! - TLS only by default; plain `http://` must be explicitly allowed
//! - Request and connect timeouts
//! - Custom User-Agent header
//!
//! No retries are performed. A failed send is reported exactly once.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Method};
use tracing::debug;

use crate::api::common::{SdkError, SdkResult};
use crate::api::wire::{HttpMethod, WireRequest, WireResponse};

/// Sends an encoded request and returns the raw response.
///
/// Implementations must only fail for conditions that prevent a response
/// from existing: connection and DNS failures, timeouts, or an HTTP
/// exchange that could not be read. Any status code, including 4xx and
/// 5xx, is a successful send.
///
/// # Example
///
/// ```rust
/// use async_trait::async_trait;
/// use ebay_sdk::api::{SdkResult, Transport, WireRequest, WireResponse};
///
/// struct Canned;
///
/// #[async_trait]
/// impl Transport for Canned {
///     async fn send(&self, _request: WireRequest) -> SdkResult<WireResponse> {
///         Ok(WireResponse::new(200, r#"{"itemId":"v1|1|0"}"#))
///     }
/// }
/// ```
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs one HTTP exchange.
    async fn send(&self, request: WireRequest) -> SdkResult<WireResponse>;
}

/// Settings for [`HttpTransport`].
///
/// # Fields
///
/// * `timeout` - Total time allowed for one request, including the body
/// * `connect_timeout` - Time allowed to establish a connection
/// * `user_agent` - Value of the `User-Agent` header
/// * `allow_insecure` - Permit `http://` URLs (local test servers only)
#[derive(Debug, Clone)]
pub struct TransportConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
    pub allow_insecure: bool,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            connect_timeout: Duration::from_secs(10),
            user_agent: format!("{}/{}", crate::APP_NAME, crate::VERSION),
            allow_insecure: false,
        }
    }
}

/// The default [`Transport`], backed by a shared `reqwest::Client`.
///
/// The client keeps a connection pool, so one `HttpTransport` should be
/// shared (behind an `Arc`) by every service client of an application.
///
/// # Example
///
/// ```rust,no_run
/// use std::time::Duration;
/// use ebay_sdk::api::{HttpTransport, TransportConfig};
///
/// let transport = HttpTransport::with_config(TransportConfig {
///     timeout: Duration::from_secs(30),
///     ..TransportConfig::default()
/// })?;
/// # Ok::<(), ebay_sdk::api::SdkError>(())
/// ```
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http: Client,
    config: TransportConfig,
}

impl HttpTransport {
    /// Creates a transport with the default settings.
    pub fn new() -> SdkResult<Self> {
        Self::with_config(TransportConfig::default())
    }

    /// Creates a transport with explicit settings.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Runtime`] if the TLS backend could not be
    /// initialised.
    pub fn with_config(config: TransportConfig) -> SdkResult<Self> {
        let http = Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .https_only(!config.allow_insecure)
            .build()
            .map_err(|e| SdkError::Runtime(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Returns the settings this transport was built with.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    fn map_error(&self, err: reqwest::Error) -> SdkError {
        if err.is_timeout() {
            SdkError::Timeout(self.config.timeout)
        } else if err.is_builder() {
            SdkError::Validation(err.to_string())
        } else if err.is_decode() {
            SdkError::Protocol(err.to_string())
        } else {
            SdkError::Network(err.to_string())
        }
    }
}

fn to_reqwest(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: WireRequest) -> SdkResult<WireResponse> {
        if request.url.scheme() != "https" && !self.config.allow_insecure {
            return Err(SdkError::Validation(format!(
                "Refusing to send over {}: only https endpoints are allowed",
                request.url.scheme()
            )));
        }

        debug!(method = %request.method, url = %request.url, "Sending request");

        let mut builder = self
            .http
            .request(to_reqwest(request.method), request.url.clone());

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            builder = builder
                .header(CONTENT_TYPE, body.content_type)
                .body(body.bytes);
        }

        let response = builder.send().await.map_err(|e| self.map_error(e))?;
        let status = response.status().as_u16();

        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();

        let body = response
            .bytes()
            .await
            .map_err(|e| self.map_error(e))?
            .to_vec();

        debug!(status, bytes = body.len(), "Received response");

        Ok(WireResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::wire::WireBody;
    use url::Url;

    fn insecure() -> HttpTransport {
        HttpTransport::with_config(TransportConfig {
            allow_insecure: true,
            ..TransportConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_send_returns_status_headers_and_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/ws/api.dll")
            .match_header("x-ebay-api-call-name", "GeteBayOfficialTime")
            .match_header("content-type", "text/xml")
            .match_body("<GeteBayOfficialTimeRequest/>")
            .with_status(200)
            .with_header("content-type", "text/xml")
            .with_body("<GeteBayOfficialTimeResponse/>")
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/ws/api.dll", server.url())).unwrap();
        let request = WireRequest::new(HttpMethod::Post, url)
            .header_pair("X-EBAY-API-CALL-NAME", "GeteBayOfficialTime")
            .with_body(WireBody::new("text/xml", "<GeteBayOfficialTimeRequest/>"));

        let response = insecure().send(request).await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, 200);
        assert_eq!(response.content_type(), Some("text/xml"));
        assert_eq!(response.body, b"<GeteBayOfficialTimeResponse/>");
    }

    #[tokio::test]
    async fn test_error_status_is_not_a_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/buy/browse/v1/item/1")
            .with_status(404)
            .with_body(r#"{"errors":[]}"#)
            .create_async()
            .await;

        let url = Url::parse(&format!("{}/buy/browse/v1/item/1", server.url())).unwrap();
        let response = insecure()
            .send(WireRequest::new(HttpMethod::Get, url))
            .await
            .unwrap();

        assert_eq!(response.status, 404);
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn test_plain_http_is_rejected_by_default() {
        let transport = HttpTransport::new().unwrap();
        let url = Url::parse("http://api.ebay.com/ws/api.dll").unwrap();

        let err = transport
            .send(WireRequest::new(HttpMethod::Get, url))
            .await
            .unwrap_err();

        assert!(matches!(err, SdkError::Validation(_)));
    }

    #[tokio::test]
    async fn test_connection_refused_is_network_error() {
        let url = Url::parse("http://127.0.0.1:1/unreachable").unwrap();
        let err = insecure()
            .send(WireRequest::new(HttpMethod::Get, url))
            .await
            .unwrap_err();

        assert!(matches!(err, SdkError::Network(_) | SdkError::Timeout(_)));
    }

    #[test]
    fn test_default_user_agent() {
        let config = TransportConfig::default();
        assert!(config.user_agent.starts_with("ebay-sdk/"));
        assert!(!config.allow_insecure);
    }
}
