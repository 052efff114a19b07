//
//  ebay-sdk
//  api/pager.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Pagination Driver
//!
//! [`Paginator`] fetches page 1, reads the page count from it, and then
//! fetches pages `2..=min(total_pages, max_pages)`.
//!
//! - Every page request is built fresh from the template with
//!   [`PagedRequest::with_page`]; the template itself is never mutated.
//! - Pages come back in page order whether they were fetched one at a time
//!   or concurrently.
//! - If page 1 fails (transport error, or a response with error entries),
//!   only page 1 is returned.
//! - [`stream`](Paginator::stream) is lazy and can be called again to run
//!   the whole sequence afresh.
//!
//! ## Example
//!
//! ```rust,no_run
//! use ebay_sdk::api::legacy::finding::{self, FindItemsByKeywordsRequest, FindItemsResponse};
//! use ebay_sdk::api::{Paginator, ServiceClient};
//!
//! # async fn run(client: ServiceClient) {
//! let request = FindItemsByKeywordsRequest::new("vintage camera").with_entries_per_page(50);
//! let pages = Paginator::new(client, finding::FIND_ITEMS_BY_KEYWORDS, request)
//!     .max_pages(5)
//!     .concurrent(3)
//!     .collect::<FindItemsResponse>()
//!     .await;
//!
//! for page in pages {
//!     println!("page {}: ok = {}", page.number, page.result.is_ok());
//! }
//! # }
//! ```

use futures::stream::{self, Stream, StreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::batch::BatchExecutor;
use super::client::ServiceClient;
use super::codec::OperationSpec;
use super::common::{PagedRequest, PagedResponse, Response, SdkResult};

/// Default ceiling on the number of pages fetched.
pub const DEFAULT_MAX_PAGES: u32 = 100;

/// One fetched page.
#[derive(Debug)]
pub struct Page<T> {
    /// 1-based page number.
    pub number: u32,
    pub result: SdkResult<Response<T>>,
}

/// Drives a paged operation across pages.
#[derive(Clone)]
pub struct Paginator<Req> {
    client: ServiceClient,
    operation: OperationSpec,
    template: Req,
    max_pages: u32,
    concurrency: usize,
}

impl<Req> Paginator<Req>
where
    Req: PagedRequest + Serialize + Send + Sync + 'static,
{
    /// Creates a sequential paginator fetching at most
    /// [`DEFAULT_MAX_PAGES`] pages.
    pub fn new(client: ServiceClient, operation: OperationSpec, template: Req) -> Self {
        Self {
            client,
            operation,
            template,
            max_pages: DEFAULT_MAX_PAGES,
            concurrency: 1,
        }
    }

    /// Caps the number of pages fetched. Zero is treated as one.
    pub fn max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    /// Fetches pages after the first up to `concurrency` at a time.
    pub fn concurrent(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    /// Returns the pages as a lazy stream in page order.
    pub fn stream<Resp>(&self) -> impl Stream<Item = Page<Resp>> + '_
    where
        Resp: DeserializeOwned + PagedResponse + Send + 'static,
    {
        stream::once(self.first_page::<Resp>()).flat_map(move |(first, limit)| {
            let rest = stream::iter(2..=limit)
                .map(move |number| self.fetch::<Resp>(number))
                .buffered(self.concurrency);
            stream::once(async move { first }).chain(rest)
        })
    }

    /// Fetches every page and returns them in page order.
    ///
    /// With a concurrency above one, pages after the first run on a
    /// [`BatchExecutor`].
    pub async fn collect<Resp>(&self) -> Vec<Page<Resp>>
    where
        Resp: DeserializeOwned + PagedResponse + Send + 'static,
    {
        if self.concurrency <= 1 {
            return self.stream::<Resp>().collect().await;
        }

        let (first, limit) = self.first_page::<Resp>().await;
        let mut pages = vec![first];

        let tasks = (2..=limit).map(|number| {
            let client = self.client.clone();
            let operation = self.operation;
            let request = self.template.with_page(number);
            (number, move || async move { client.call::<_, Resp>(&operation, &request).await })
        });

        let results = BatchExecutor::new(self.concurrency).run_bounded(tasks).await;
        pages.extend(
            results
                .into_iter()
                .map(|(number, result)| Page { number, result }),
        );
        pages
    }

    async fn first_page<Resp>(&self) -> (Page<Resp>, u32)
    where
        Resp: DeserializeOwned + PagedResponse,
    {
        let first = self.fetch::<Resp>(1).await;

        let limit = match &first.result {
            Ok(response) if response.is_success() => response
                .payload()
                .and_then(PagedResponse::pagination)
                .map(|state| state.page_limit(self.max_pages))
                .unwrap_or(1),
            _ => 1,
        };

        debug!(
            operation = self.operation.name,
            pages = limit,
            max_pages = self.max_pages,
            "Planned pagination"
        );

        (first, limit)
    }

    async fn fetch<Resp: DeserializeOwned>(&self, number: u32) -> Page<Resp> {
        let request = self.template.with_page(number);
        debug!(operation = self.operation.name, page = number, "Fetching page");
        Page {
            number,
            result: self.client.call(&self.operation, &request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::common::{PaginationState, SdkError};
    use crate::api::mock::ScriptedTransport;
    use crate::api::wire::{HttpMethod, WireResponse};
    use crate::auth::{CredentialProvider, Credentials, OAuthToken};
    use crate::config::{ApiFamily, EndpointConfig, Environment};
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    const LIST: OperationSpec =
        OperationSpec::rest("listOffers", HttpMethod::Get, "/offer").with_query(&["page", "size"]);

    #[derive(Debug, Clone, Serialize)]
    struct ListRequest {
        page: u32,
        size: u32,
    }

    impl PagedRequest for ListRequest {
        fn with_page(&self, page: u32) -> Self {
            Self {
                page,
                ..self.clone()
            }
        }
    }

    #[derive(Debug, Deserialize)]
    struct ListResponse {
        page: u32,
        size: u32,
        total: u64,
    }

    impl PagedResponse for ListResponse {
        fn pagination(&self) -> Option<PaginationState> {
            let mut state = PaginationState::new(self.page, self.size);
            state.total_entries = Some(self.total);
            state.total_pages = Some(self.total.div_ceil(u64::from(self.size)) as u32);
            Some(state)
        }
    }

    fn page_from(request: &crate::api::wire::WireRequest) -> u32 {
        request
            .url
            .query_pairs()
            .find(|(k, _)| k == "page")
            .and_then(|(_, v)| v.parse().ok())
            .unwrap_or(0)
    }

    fn paged_transport(total: u64, fail_page: Option<u32>) -> Arc<ScriptedTransport> {
        Arc::new(
            ScriptedTransport::new(move |request| {
                let page = page_from(request);
                if Some(page) == fail_page {
                    return Ok(WireResponse::new(
                        500,
                        r#"{"errors":[{"errorId":2003,"message":"Internal error"}]}"#,
                    ));
                }
                Ok(WireResponse::new(
                    200,
                    json!({ "page": page, "size": 10, "total": total }).to_string(),
                ))
            })
            .with_delay(Duration::from_millis(2)),
        )
    }

    fn client(transport: Arc<ScriptedTransport>) -> ServiceClient {
        ServiceClient::builder(EndpointConfig::new(ApiFamily::Inventory, Environment::Sandbox))
            .credentials(Arc::new(CredentialProvider::new(Credentials::OAuth(
                OAuthToken::new("token"),
            ))))
            .transport(transport)
            .build()
            .unwrap()
    }

    fn numbers<T>(pages: &[Page<T>]) -> Vec<u32> {
        pages.iter().map(|p| p.number).collect()
    }

    #[tokio::test]
    async fn test_first_page_reports_totals() {
        let transport = paged_transport(25, None);
        let response = client(transport)
            .call::<_, ListResponse>(&LIST, &ListRequest { page: 1, size: 10 })
            .await
            .unwrap();

        let state = response.payload().unwrap().pagination().unwrap();
        assert_eq!(state.page_number, 1);
        assert_eq!(state.total_pages, Some(3));
        assert!(state.total_entries.unwrap() > 20);
    }

    #[tokio::test]
    async fn test_sequential_yields_every_page_once() {
        let transport = paged_transport(25, None);
        let pager = Paginator::new(client(transport.clone()), LIST, ListRequest { page: 7, size: 10 })
            .max_pages(20);

        let pages = pager.collect::<ListResponse>().await;
        assert_eq!(numbers(&pages), vec![1, 2, 3]);
        for page in &pages {
            let payload = page.result.as_ref().unwrap().payload().unwrap();
            assert_eq!(payload.page, page.number);
        }
        assert_eq!(transport.calls(), 3);
        assert_eq!(transport.peak_in_flight(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_preserves_page_order() {
        let transport = paged_transport(95, None);
        let pager = Paginator::new(client(transport.clone()), LIST, ListRequest { page: 1, size: 10 })
            .max_pages(20)
            .concurrent(4);

        let pages = pager.collect::<ListResponse>().await;
        assert_eq!(numbers(&pages), (1..=10).collect::<Vec<_>>());
        assert!(transport.peak_in_flight() <= 4);

        let streamed: Vec<Page<ListResponse>> = pager.stream().collect().await;
        assert_eq!(numbers(&streamed), (1..=10).collect::<Vec<_>>());
        assert_eq!(transport.calls(), 20);
    }

    #[tokio::test]
    async fn test_max_pages_caps_the_run() {
        let transport = paged_transport(1_000, None);
        let pager = Paginator::new(client(transport.clone()), LIST, ListRequest { page: 1, size: 10 })
            .max_pages(4)
            .concurrent(2);

        let pages = pager.collect::<ListResponse>().await;
        assert_eq!(numbers(&pages), vec![1, 2, 3, 4]);
        assert_eq!(transport.calls(), 4);
    }

    #[tokio::test]
    async fn test_failed_first_page_stops() {
        let transport = paged_transport(25, Some(1));
        let pager = Paginator::new(client(transport.clone()), LIST, ListRequest { page: 1, size: 10 })
            .concurrent(3);

        let pages = pager.collect::<ListResponse>().await;
        assert_eq!(numbers(&pages), vec![1]);
        assert!(!pages[0].result.as_ref().unwrap().is_success());
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn test_later_page_failure_is_kept_in_place() {
        let transport = paged_transport(35, Some(3));
        let pager = Paginator::new(client(transport), LIST, ListRequest { page: 1, size: 10 });

        let pages: Vec<Page<ListResponse>> = pager.stream().collect().await;
        assert_eq!(numbers(&pages), vec![1, 2, 3, 4]);
        assert!(pages[2].result.as_ref().unwrap().has_errors());
        assert!(pages[3].result.as_ref().unwrap().is_success());
    }

    #[tokio::test]
    async fn test_transport_failure_on_first_page() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            Err(SdkError::Timeout(Duration::from_secs(60)))
        }));
        let pager = Paginator::new(client(transport), LIST, ListRequest { page: 1, size: 10 });

        let pages = pager.collect::<ListResponse>().await;
        assert_eq!(pages.len(), 1);
        assert!(matches!(pages[0].result, Err(SdkError::Timeout(_))));
    }
}
