//
//  ebay-sdk
//  api/legacy/shopping.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Shopping API types and operations.
//!
//! Public, read-only item lookups. Calls are usually made with app
//! credentials only; the app id goes in `X-EBAY-API-APP-ID`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::trading::ItemSpecifics;
use super::Amount;
use crate::api::batch::BatchExecutor;
use crate::api::client::ServiceClient;
use crate::api::codec::OperationSpec;
use crate::api::common::{Response, SdkResult};

pub const GET_EBAY_TIME: OperationSpec = OperationSpec::xml("GeteBayTime");
pub const GET_SINGLE_ITEM: OperationSpec =
    OperationSpec::xml("GetSingleItem").with_required(&["ItemID"]);

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetEbayTimeRequest {}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EbayTimeResponse {
    #[serde(rename = "Timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Request for `GetSingleItem`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetSingleItemRequest {
    #[serde(rename = "ItemID")]
    pub item_id: String,
    /// Comma-separated extra sections, e.g. `ItemSpecifics,Variations`.
    #[serde(rename = "IncludeSelector", skip_serializing_if = "Option::is_none")]
    pub include_selector: Option<String>,
}

impl GetSingleItemRequest {
    pub fn new(item_id: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            include_selector: None,
        }
    }

    pub fn include(mut self, selector: impl Into<String>) -> Self {
        self.include_selector = Some(selector.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct VariationSellingStatus {
    #[serde(rename = "QuantitySold")]
    pub quantity_sold: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Variation {
    #[serde(rename = "SKU")]
    pub sku: Option<String>,
    pub start_price: Option<Amount>,
    pub quantity: Option<u32>,
    pub selling_status: Option<VariationSellingStatus>,
    pub variation_specifics: Option<ItemSpecifics>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Variations {
    #[serde(rename = "Variation", default)]
    pub variation: Vec<Variation>,
}

/// An item as returned by the Shopping API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SimpleItem {
    #[serde(rename = "ItemID")]
    pub item_id: String,
    pub title: Option<String>,
    pub listing_status: Option<String>,
    pub current_price: Option<Amount>,
    pub quantity: Option<u32>,
    pub quantity_sold: Option<u32>,
    pub item_specifics: Option<ItemSpecifics>,
    pub variations: Option<Variations>,
    pub item_compatibility_count: Option<u32>,
}

impl SimpleItem {
    /// Units still available, when both counts are known.
    pub fn quantity_available(&self) -> Option<u32> {
        Some(self.quantity?.saturating_sub(self.quantity_sold?))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GetSingleItemResponse {
    #[serde(rename = "Item")]
    pub item: Option<SimpleItem>,
}

/// Typed access to the Shopping operations.
#[derive(Clone)]
pub struct ShoppingService {
    client: ServiceClient,
}

impl ShoppingService {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ServiceClient {
        &self.client
    }

    pub async fn ebay_time(&self) -> SdkResult<Response<EbayTimeResponse>> {
        self.client
            .call(&GET_EBAY_TIME, &GetEbayTimeRequest::default())
            .await
    }

    pub async fn single_item(
        &self,
        request: &GetSingleItemRequest,
    ) -> SdkResult<Response<GetSingleItemResponse>> {
        self.client.call(&GET_SINGLE_ITEM, request).await
    }

    /// Looks up several items through `executor`, keyed by item id.
    ///
    /// Each lookup gets its own request; one failed lookup does not stop
    /// the others.
    pub async fn single_items<I, S>(
        &self,
        item_ids: I,
        selector: Option<&str>,
        executor: &BatchExecutor,
    ) -> BTreeMap<String, SdkResult<Response<GetSingleItemResponse>>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tasks = item_ids.into_iter().map(|id| {
            let id: String = id.into();
            let mut request = GetSingleItemRequest::new(id.clone());
            request.include_selector = selector.map(str::to_string);
            let client = self.client.clone();
            (id, move || async move {
                client.call(&GET_SINGLE_ITEM, &request).await
            })
        });

        executor.run_bounded(tasks).await
    }
}
