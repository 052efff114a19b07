//
//  ebay-sdk
//  api/mock.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! In-process [`Transport`] double for tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use super::client::ServiceClient;
use super::common::SdkResult;
use super::transport::Transport;
use super::wire::{WireRequest, WireResponse};
use crate::auth::{AppCredentials, CredentialProvider, Credentials};
use crate::config::{ApiFamily, EndpointConfig, Environment};

type Handler = dyn Fn(&WireRequest) -> SdkResult<WireResponse> + Send + Sync;

/// Answers every request with a closure and records what was sent.
pub struct ScriptedTransport {
    handler: Box<Handler>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    requests: Mutex<Vec<WireRequest>>,
}

impl ScriptedTransport {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&WireRequest) -> SdkResult<WireResponse> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            delay: None,
            calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Holds each request for `delay` before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of requests that were being answered at once.
    pub fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<WireRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn send(&self, request: WireRequest) -> SdkResult<WireResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);

        self.requests.lock().unwrap().push(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let result = (self.handler)(&request);
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// A sandbox client for `family` answering through `transport`.
pub fn client_for(
    family: ApiFamily,
    credentials: Credentials,
    transport: Arc<ScriptedTransport>,
) -> ServiceClient {
    let provider = CredentialProvider::new(credentials)
        .with_app_identity(AppCredentials::new("TestApp-SBX", "SBX-cert").with_dev_id("dev-1"));
    ServiceClient::new(
        EndpointConfig::new(family, Environment::Sandbox),
        Arc::new(provider),
        transport,
    )
}
