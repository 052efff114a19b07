//
//  ebay-sdk
//  api/legacy/finding.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Finding API types and operations.
//!
//! Item search over the SOA XML dialect. Element names are lowerCamelCase
//! and results are paged with `paginationInput` / `paginationOutput`.
//!
//! # Example
//!
//! ```rust,no_run
//! use ebay_sdk::api::legacy::finding::{FindItemsByKeywordsRequest, FindingService, ItemFilter};
//! use ebay_sdk::api::ServiceClient;
//!
//! # async fn run(client: ServiceClient) -> ebay_sdk::api::SdkResult<()> {
//! let finding = FindingService::new(client);
//! let request = FindItemsByKeywordsRequest::new("Harry Potter")
//!     .with_filter(ItemFilter::new("Condition", ["New"]))
//!     .with_entries_per_page(10);
//!
//! let response = finding.find_items_by_keywords(&request).await?;
//! for item in response.payload().map(|r| r.items()).unwrap_or_default() {
//!     println!("({}) {}", item.item_id, item.title.as_deref().unwrap_or_default());
//! }
//! # Ok(())
//! # }
//! ```

use serde::{Deserialize, Serialize};

use crate::api::client::ServiceClient;
use crate::api::codec::OperationSpec;
use crate::api::common::{PagedRequest, PagedResponse, PaginationState, Response, SdkResult};
use crate::api::pager::Paginator;

pub const FIND_ITEMS_BY_KEYWORDS: OperationSpec =
    OperationSpec::xml("findItemsByKeywords").with_required(&["keywords"]);
pub const FIND_ITEMS_ADVANCED: OperationSpec = OperationSpec::xml("findItemsAdvanced");
pub const FIND_ITEMS_BY_PRODUCT: OperationSpec =
    OperationSpec::xml("findItemsByProduct").with_required(&["productId"]);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries_per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationOutput {
    pub page_number: Option<u32>,
    pub entries_per_page: Option<u32>,
    pub total_pages: Option<u32>,
    pub total_entries: Option<u64>,
}

/// A search filter; repeated values become repeated `<value>` elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemFilter {
    pub name: String,
    pub value: Vec<String>,
}

impl ItemFilter {
    pub fn new<I, S>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            value: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// A product identifier such as `<productId type="ReferenceID">53039031</productId>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductId {
    #[serde(rename = "@type")]
    pub id_type: String,
    #[serde(rename = "$text")]
    pub value: String,
}

/// Request for `findItemsByKeywords`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindItemsByKeywordsRequest {
    pub keywords: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub item_filter: Vec<ItemFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination_input: Option<PaginationInput>,
}

impl FindItemsByKeywordsRequest {
    pub fn new(keywords: impl Into<String>) -> Self {
        Self {
            keywords: keywords.into(),
            item_filter: Vec::new(),
            sort_order: None,
            pagination_input: None,
        }
    }

    pub fn with_filter(mut self, filter: ItemFilter) -> Self {
        self.item_filter.push(filter);
        self
    }

    pub fn with_sort_order(mut self, sort_order: impl Into<String>) -> Self {
        self.sort_order = Some(sort_order.into());
        self
    }

    pub fn with_entries_per_page(mut self, entries: u32) -> Self {
        let mut input = self.pagination_input.unwrap_or_default();
        input.entries_per_page = Some(entries);
        self.pagination_input = Some(input);
        self
    }
}

impl PagedRequest for FindItemsByKeywordsRequest {
    fn with_page(&self, page: u32) -> Self {
        let mut next = self.clone();
        let mut input = next.pagination_input.unwrap_or_default();
        input.page_number = Some(page);
        next.pagination_input = Some(input);
        next
    }
}

/// Request for `findItemsAdvanced`: keywords and/or a category.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindItemsAdvancedRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub category_id: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub item_filter: Vec<ItemFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination_input: Option<PaginationInput>,
}

impl PagedRequest for FindItemsAdvancedRequest {
    fn with_page(&self, page: u32) -> Self {
        let mut next = self.clone();
        let mut input = next.pagination_input.unwrap_or_default();
        input.page_number = Some(page);
        next.pagination_input = Some(input);
        next
    }
}

/// Request for `findItemsByProduct`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FindItemsByProductRequest {
    pub product_id: ProductId,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub item_filter: Vec<ItemFilter>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination_input: Option<PaginationInput>,
}

impl FindItemsByProductRequest {
    pub fn reference_id(id: impl Into<String>) -> Self {
        Self {
            product_id: ProductId {
                id_type: "ReferenceID".to_string(),
                value: id.into(),
            },
            item_filter: Vec::new(),
            pagination_input: None,
        }
    }
}

/// A price in the Finding dialect (`currencyId`, not `currencyID`).
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Price {
    #[serde(rename = "@currencyId")]
    pub currency_id: String,
    #[serde(rename = "$text")]
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellingStatus {
    pub current_price: Option<Price>,
    pub selling_state: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchItem {
    pub item_id: String,
    pub title: Option<String>,
    pub view_item_url: Option<String>,
    pub selling_status: Option<SellingStatus>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchResult {
    #[serde(rename = "@count")]
    pub count: Option<u32>,
    #[serde(default)]
    pub item: Vec<SearchItem>,
}

/// Response of every `findItems*` operation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindItemsResponse {
    pub search_result: Option<SearchResult>,
    pub pagination_output: Option<PaginationOutput>,
    pub item_search_url: Option<String>,
}

impl FindItemsResponse {
    /// The returned items; empty when the search result is absent.
    pub fn items(&self) -> &[SearchItem] {
        self.search_result
            .as_ref()
            .map(|r| r.item.as_slice())
            .unwrap_or_default()
    }
}

impl PagedResponse for FindItemsResponse {
    fn pagination(&self) -> Option<PaginationState> {
        let output = self.pagination_output?;
        let mut state = PaginationState::new(
            output.page_number.unwrap_or(1),
            output.entries_per_page.unwrap_or(0),
        );
        state.total_pages = output.total_pages;
        state.total_entries = output.total_entries;
        Some(state)
    }
}

/// Typed access to the Finding operations.
#[derive(Clone)]
pub struct FindingService {
    client: ServiceClient,
}

impl FindingService {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ServiceClient {
        &self.client
    }

    pub async fn find_items_by_keywords(
        &self,
        request: &FindItemsByKeywordsRequest,
    ) -> SdkResult<Response<FindItemsResponse>> {
        self.client.call(&FIND_ITEMS_BY_KEYWORDS, request).await
    }

    pub async fn find_items_advanced(
        &self,
        request: &FindItemsAdvancedRequest,
    ) -> SdkResult<Response<FindItemsResponse>> {
        self.client.call(&FIND_ITEMS_ADVANCED, request).await
    }

    pub async fn find_items_by_product(
        &self,
        request: &FindItemsByProductRequest,
    ) -> SdkResult<Response<FindItemsResponse>> {
        self.client.call(&FIND_ITEMS_BY_PRODUCT, request).await
    }

    /// Pages through `findItemsByKeywords`; collect as [`FindItemsResponse`].
    pub fn keyword_pages(
        &self,
        request: FindItemsByKeywordsRequest,
    ) -> Paginator<FindItemsByKeywordsRequest> {
        Paginator::new(self.client.clone(), FIND_ITEMS_BY_KEYWORDS, request)
    }

    /// Pages through `findItemsAdvanced`; collect as [`FindItemsResponse`].
    pub fn advanced_pages(&self, request: FindItemsAdvancedRequest) -> Paginator<FindItemsAdvancedRequest> {
        Paginator::new(self.client.clone(), FIND_ITEMS_ADVANCED, request)
    }
}
