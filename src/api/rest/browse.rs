//
//  ebay-sdk
//  api/rest/browse.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Browse API.
//!
//! Search results are paged by `offset` and `limit`; [`SearchRequest`]
//! maps page numbers onto offsets so the [`Paginator`] can drive it.
//!
//! # Example
//!
//! ```rust,no_run
//! use ebay_sdk::api::rest::browse::{BrowseService, SearchRequest, SearchResponse};
//! use ebay_sdk::api::ServiceClient;
//!
//! # async fn run(client: ServiceClient) {
//! let browse = BrowseService::new(client);
//! let pages = browse
//!     .search_pages(SearchRequest::new("Harry Potter").with_sort("-price").with_limit(10))
//!     .max_pages(3)
//!     .collect::<SearchResponse>()
//!     .await;
//!
//! for page in pages {
//!     if let Ok(response) = page.result {
//!         for item in response.payload().map(|p| p.items()).unwrap_or_default() {
//!             println!("({}) {}", item.item_id, item.title.as_deref().unwrap_or_default());
//!         }
//!     }
//! }
//! # }
//! ```

use serde::{Deserialize, Serialize};

use super::Amount;
use crate::api::client::ServiceClient;
use crate::api::codec::OperationSpec;
use crate::api::common::{PagedRequest, PagedResponse, PaginationState, Response, SdkResult};
use crate::api::pager::Paginator;
use crate::api::wire::HttpMethod;

/// Page size used when a search does not set `limit`.
pub const DEFAULT_LIMIT: u32 = 50;

pub const SEARCH: OperationSpec =
    OperationSpec::rest("search", HttpMethod::Get, "/item_summary/search").with_query(&[
        "q",
        "category_ids",
        "filter",
        "sort",
        "limit",
        "offset",
        "fieldgroups",
    ]);
pub const GET_ITEM: OperationSpec =
    OperationSpec::rest("getItem", HttpMethod::Get, "/item/{item_id}").with_query(&["fieldgroups"]);

/// Request for `search`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_ids: Option<String>,
    /// Filters such as `price:[10..50],priceCurrency:USD`; one per entry.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filter: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fieldgroups: Option<String>,
}

impl SearchRequest {
    pub fn new(q: impl Into<String>) -> Self {
        Self {
            q: Some(q.into()),
            ..Self::default()
        }
    }

    pub fn in_category(category_ids: impl Into<String>) -> Self {
        Self {
            category_ids: Some(category_ids.into()),
            ..Self::default()
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter.push(filter.into());
        self
    }

    pub fn with_sort(mut self, sort: impl Into<String>) -> Self {
        self.sort = Some(sort.into());
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }
}

impl PagedRequest for SearchRequest {
    fn with_page(&self, page: u32) -> Self {
        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        Self {
            limit: Some(limit),
            offset: Some(PaginationState::offset_for(page, limit)),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seller {
    pub username: Option<String>,
    pub feedback_percentage: Option<String>,
    pub feedback_score: Option<u64>,
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSummary {
    pub item_id: String,
    pub title: Option<String>,
    pub price: Option<Amount>,
    pub condition: Option<String>,
    pub item_web_url: Option<String>,
    pub seller: Option<Seller>,
}

/// Response of `search`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub href: Option<String>,
    pub total: Option<u64>,
    pub limit: Option<u32>,
    pub offset: Option<u64>,
    pub next: Option<String>,
    pub item_summaries: Option<Vec<ItemSummary>>,
}

impl SearchResponse {
    /// The returned items; empty when the API left the list out.
    pub fn items(&self) -> &[ItemSummary] {
        self.item_summaries.as_deref().unwrap_or_default()
    }
}

impl PagedResponse for SearchResponse {
    fn pagination(&self) -> Option<PaginationState> {
        let limit = self.limit?;
        Some(PaginationState::from_offset(
            self.offset.unwrap_or(0),
            limit,
            self.total,
        ))
    }
}

/// Request for `getItem`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetItemRequest {
    pub item_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fieldgroups: Option<String>,
}

impl GetItemRequest {
    pub fn new(item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            fieldgroups: None,
        }
    }
}

/// Response of `getItem`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub item_id: String,
    pub title: Option<String>,
    pub short_description: Option<String>,
    pub price: Option<Amount>,
    pub condition: Option<String>,
    pub brand: Option<String>,
    pub category_path: Option<String>,
    pub seller: Option<Seller>,
}

/// Typed access to the Browse operations.
#[derive(Clone)]
pub struct BrowseService {
    client: ServiceClient,
}

impl BrowseService {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ServiceClient {
        &self.client
    }

    pub async fn search(&self, request: &SearchRequest) -> SdkResult<Response<SearchResponse>> {
        self.client.call(&SEARCH, request).await
    }

    /// Pages through `search`; collect as [`SearchResponse`].
    pub fn search_pages(&self, request: SearchRequest) -> Paginator<SearchRequest> {
        Paginator::new(self.client.clone(), SEARCH, request)
    }

    pub async fn item(&self, request: &GetItemRequest) -> SdkResult<Response<Item>> {
        self.client.call(&GET_ITEM, request).await
    }
}
