//
//  ebay-sdk
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Operation Dispatcher
//!
//! [`ServiceClient`] binds one API family's endpoint, codec, credentials and
//! transport, and runs every operation through the same pipeline:
//!
//! ```text
//! serialize → validate → resolve auth → encode → send → decode
//! ```
//!
//! ## Calling Styles
//!
//! | Method | Blocks | Returns |
//! |--------|--------|---------|
//! | [`call`](ServiceClient::call) | awaits | `SdkResult<Response<T>>` |
//! | [`spawn_call`](ServiceClient::spawn_call) | no | [`PendingCall`] |
//! | [`call_blocking`](ServiceClient::call_blocking) | the current thread | `SdkResult<Response<T>>` |
//!
//! All three share one async core. A response carrying error entries is
//! returned as a value, never raised; only auth, network, protocol and
//! validation problems fail the call.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::codec::{codec_for, Codec, OperationSpec};
use super::common::{Response, SdkError, SdkResult};
use super::transport::{HttpTransport, Transport};
use super::wire::Attachment;
use crate::auth::{AuthContext, CredentialProvider};
use crate::config::EndpointConfig;

struct Inner {
    endpoint: EndpointConfig,
    codec: Arc<dyn Codec>,
    credentials: Arc<CredentialProvider>,
    transport: Arc<dyn Transport>,
}

/// Dispatcher for the operations of one API family.
///
/// Cloning is cheap; clones share the credential provider (and so its
/// token state) and the transport.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use ebay_sdk::api::{OperationSpec, ServiceClient};
/// use ebay_sdk::auth::{CredentialProvider, Credentials};
/// use ebay_sdk::config::{ApiFamily, EndpointConfig, Environment};
///
/// # async fn run() -> ebay_sdk::api::SdkResult<()> {
/// let client = ServiceClient::builder(EndpointConfig::new(ApiFamily::Trading, Environment::Sandbox))
///     .credentials(Arc::new(CredentialProvider::new(Credentials::UserToken("AgAAAA...".into()))))
///     .build()?;
///
/// let response = client
///     .call::<_, serde_json::Value>(&OperationSpec::xml("GeteBayOfficialTime"), &serde_json::json!({}))
///     .await?;
///
/// if response.has_errors() {
///     for error in response.blocking_errors() {
///         eprintln!("{}", error.message);
///     }
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ServiceClient {
    inner: Arc<Inner>,
}

impl ServiceClient {
    /// Starts building a client for `endpoint`.
    pub fn builder(endpoint: EndpointConfig) -> ServiceClientBuilder {
        ServiceClientBuilder {
            endpoint,
            credentials: None,
            transport: None,
            codec: None,
        }
    }

    /// Creates a client with the codec matching the endpoint's protocol.
    pub fn new(
        endpoint: EndpointConfig,
        credentials: Arc<CredentialProvider>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let codec = codec_for(endpoint.protocol());
        Self {
            inner: Arc::new(Inner {
                endpoint,
                codec,
                credentials,
                transport,
            }),
        }
    }

    pub fn endpoint(&self) -> &EndpointConfig {
        &self.inner.endpoint
    }

    pub fn credentials(&self) -> &Arc<CredentialProvider> {
        &self.inner.credentials
    }

    /// Calls `operation` with `request` and waits for the response.
    ///
    /// # Errors
    ///
    /// - [`SdkError::Validation`] before any I/O when the request does not
    ///   serialize to a structure or lacks a required field
    /// - [`SdkError::AuthRequired`] / [`SdkError::Auth`] from the credential provider
    /// - [`SdkError::Network`] / [`SdkError::Timeout`] from the transport
    /// - [`SdkError::Protocol`] when the response cannot be decoded
    pub async fn call<Req, Resp>(
        &self,
        operation: &OperationSpec,
        request: &Req,
    ) -> SdkResult<Response<Resp>>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let value = to_request_value(operation, request)?;
        self.inner.execute(operation, value, None).await
    }

    /// Like [`call`](Self::call), sending `attachment` alongside the request.
    pub async fn call_with_attachment<Req, Resp>(
        &self,
        operation: &OperationSpec,
        request: &Req,
        attachment: &Attachment,
    ) -> SdkResult<Response<Resp>>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let value = to_request_value(operation, request)?;
        self.inner.execute(operation, value, Some(attachment)).await
    }

    /// Starts `operation` on the tokio runtime and returns at once.
    ///
    /// The request is serialized before this returns, so the caller may
    /// reuse or modify it immediately. Must be called from within a tokio
    /// runtime; otherwise the returned call resolves to
    /// [`SdkError::Runtime`].
    pub fn spawn_call<Req, Resp>(&self, operation: &OperationSpec, request: &Req) -> PendingCall<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned + Send + 'static,
    {
        let value = match to_request_value(operation, request) {
            Ok(value) => value,
            Err(e) => return PendingCall::failed(e),
        };

        let handle = match tokio::runtime::Handle::try_current() {
            Ok(handle) => handle,
            Err(e) => return PendingCall::failed(SdkError::Runtime(e.to_string())),
        };

        let inner = self.inner.clone();
        let operation = *operation;
        PendingCall {
            state: PendingState::Running(
                handle.spawn(async move { inner.execute(&operation, value, None).await }),
            ),
        }
    }

    /// Calls `operation` on a private current-thread runtime, blocking the
    /// calling thread until the response arrives.
    ///
    /// # Errors
    ///
    /// Fails with [`SdkError::Runtime`] when called from inside a tokio
    /// runtime; use [`call`](Self::call) there.
    pub fn call_blocking<Req, Resp>(
        &self,
        operation: &OperationSpec,
        request: &Req,
    ) -> SdkResult<Response<Resp>>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(SdkError::Runtime(
                "call_blocking cannot run inside an async runtime; await call() instead".to_string(),
            ));
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| SdkError::Runtime(e.to_string()))?;

        runtime.block_on(self.call(operation, request))
    }
}

impl Inner {
    async fn execute<Resp: DeserializeOwned>(
        &self,
        operation: &OperationSpec,
        request: Value,
        attachment: Option<&Attachment>,
    ) -> SdkResult<Response<Resp>> {
        operation.validate(&request)?;

        debug!(
            family = %self.endpoint.family,
            operation = operation.name,
            "Dispatching operation"
        );

        let auth = self
            .credentials
            .resolve(AuthContext::new(self.endpoint.protocol()))
            .await?;

        let wire = self
            .codec
            .encode(operation, &self.endpoint, &auth, &request, attachment)?;
        let raw = self.transport.send(wire).await?;
        let decoded = self.codec.decode(operation, raw)?;
        let response = decoded.into_response::<Resp>(operation.name)?;

        if response.has_errors() {
            info!(
                operation = operation.name,
                status = response.status,
                errors = response.blocking_errors().count(),
                "Operation returned errors"
            );
        } else {
            debug!(operation = operation.name, status = response.status, "Operation succeeded");
        }

        Ok(response)
    }
}

fn to_request_value<Req: Serialize + ?Sized>(
    operation: &OperationSpec,
    request: &Req,
) -> SdkResult<Value> {
    serde_json::to_value(request).map_err(|e| {
        SdkError::Validation(format!("Could not serialize {} request: {}", operation.name, e))
    })
}

/// Builder for [`ServiceClient`].
pub struct ServiceClientBuilder {
    endpoint: EndpointConfig,
    credentials: Option<Arc<CredentialProvider>>,
    transport: Option<Arc<dyn Transport>>,
    codec: Option<Arc<dyn Codec>>,
}

impl ServiceClientBuilder {
    /// Shares `credentials` with this client. Defaults to an anonymous
    /// provider.
    pub fn credentials(mut self, credentials: Arc<CredentialProvider>) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Uses `transport` instead of a default [`HttpTransport`].
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Overrides the codec chosen from the endpoint's protocol.
    pub fn codec(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codec = Some(codec);
        self
    }

    /// Builds the client.
    ///
    /// # Errors
    ///
    /// Fails with [`SdkError::Runtime`] only if no transport was given and
    /// the default HTTP client cannot be constructed.
    pub fn build(self) -> SdkResult<ServiceClient> {
        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new()?),
        };
        let codec = self
            .codec
            .unwrap_or_else(|| codec_for(self.endpoint.protocol()));
        let credentials = self
            .credentials
            .unwrap_or_else(|| Arc::new(CredentialProvider::anonymous()));

        Ok(ServiceClient {
            inner: Arc::new(Inner {
                endpoint: self.endpoint,
                codec,
                credentials,
                transport,
            }),
        })
    }
}

enum PendingState<T> {
    Running(JoinHandle<SdkResult<Response<T>>>),
    Failed(Option<SdkError>),
}

/// A call started with [`ServiceClient::spawn_call`].
///
/// Await it to get the response. Dropping it does not cancel the call;
/// use [`abort`](Self::abort) for that.
pub struct PendingCall<T> {
    state: PendingState<T>,
}

impl<T> PendingCall<T> {
    fn failed(err: SdkError) -> Self {
        Self {
            state: PendingState::Failed(Some(err)),
        }
    }

    /// Cancels the call if it is still running.
    pub fn abort(&self) {
        if let PendingState::Running(handle) = &self.state {
            handle.abort();
        }
    }

    pub fn is_finished(&self) -> bool {
        match &self.state {
            PendingState::Running(handle) => handle.is_finished(),
            PendingState::Failed(_) => true,
        }
    }
}

impl<T> Future for PendingCall<T> {
    type Output = SdkResult<Response<T>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match &mut self.get_mut().state {
            PendingState::Running(handle) => match Pin::new(handle).poll(cx) {
                Poll::Ready(Ok(result)) => Poll::Ready(result),
                Poll::Ready(Err(e)) if e.is_cancelled() => {
                    Poll::Ready(Err(SdkError::Runtime("call was cancelled".to_string())))
                }
                Poll::Ready(Err(e)) => Poll::Ready(Err(SdkError::Runtime(e.to_string()))),
                Poll::Pending => Poll::Pending,
            },
            PendingState::Failed(err) => Poll::Ready(Err(err
                .take()
                .unwrap_or_else(|| SdkError::Runtime("call polled after completion".to_string())))),
        }
    }
}
