//
//  ebay-sdk
//  api/rest/inventory.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Inventory API.
//!
//! Inventory items are keyed by seller-defined SKU. Creating or replacing
//! an item answers `204 No Content`, so its [`Response`] has no payload;
//! check [`Response::is_success`] instead.
//!
//! # Example
//!
//! ```rust,no_run
//! use ebay_sdk::api::rest::inventory::{InventoryItem, InventoryService, Product};
//! use ebay_sdk::api::ServiceClient;
//!
//! # async fn run(client: ServiceClient) -> ebay_sdk::api::SdkResult<()> {
//! let inventory = InventoryService::new(client);
//! let item = InventoryItem::new("NEW_OTHER", 50).with_product(
//!     Product::new("GoPro Hero4 Helmet Cam")
//!         .with_aspect("Brand", ["GoPro"])
//!         .with_aspect("Optical Zoom", ["10x", "8x", "4x"]),
//! );
//!
//! let response = inventory.create_or_replace_item("123", &item).await?;
//! if !response.is_success() {
//!     for error in response.blocking_errors() {
//!         eprintln!("{}", error);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::Acknowledged;
use crate::api::client::ServiceClient;
use crate::api::codec::OperationSpec;
use crate::api::common::{PagedRequest, PagedResponse, PaginationState, Response, SdkResult};
use crate::api::pager::Paginator;
use crate::api::wire::HttpMethod;

pub const GET_INVENTORY_ITEM: OperationSpec =
    OperationSpec::rest("getInventoryItem", HttpMethod::Get, "/inventory_item/{sku}");
pub const GET_INVENTORY_ITEMS: OperationSpec =
    OperationSpec::rest("getInventoryItems", HttpMethod::Get, "/inventory_item")
        .with_query(&["limit", "offset"]);
pub const CREATE_OR_REPLACE_INVENTORY_ITEM: OperationSpec = OperationSpec::rest(
    "createOrReplaceInventoryItem",
    HttpMethod::Put,
    "/inventory_item/{sku}",
)
.with_required(&["condition"]);
pub const DELETE_INVENTORY_ITEM: OperationSpec =
    OperationSpec::rest("deleteInventoryItem", HttpMethod::Delete, "/inventory_item/{sku}");

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipToLocationAvailability {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ship_to_location_availability: Option<ShipToLocationAvailability>,
}

/// Product details of an inventory item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Item specifics, name to values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspects: Option<BTreeMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_urls: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mpn: Option<String>,
}

impl Product {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_aspect<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aspects
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_urls.get_or_insert_with(Vec::new).push(url.into());
        self
    }
}

/// An inventory item without its SKU, which travels in the path.
///
/// `condition` takes the API's condition enum, e.g. `NEW`, `NEW_OTHER` or
/// `USED_EXCELLENT`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<Availability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

impl InventoryItem {
    pub fn new(condition: impl Into<String>, quantity: u32) -> Self {
        Self {
            condition: Some(condition.into()),
            availability: Some(Availability {
                ship_to_location_availability: Some(ShipToLocationAvailability {
                    quantity: Some(quantity),
                }),
            }),
            ..Self::default()
        }
    }

    pub fn with_product(mut self, product: Product) -> Self {
        self.product = Some(product);
        self
    }

    /// Quantity available to ship, if reported.
    pub fn quantity(&self) -> Option<u32> {
        self.availability?.ship_to_location_availability?.quantity
    }
}

/// An inventory item as the API returns it, SKU included.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoredInventoryItem {
    pub sku: String,
    #[serde(flatten)]
    pub item: InventoryItem,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
struct SkuRequest<'a> {
    sku: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
struct PutItemRequest<'a> {
    sku: &'a str,
    #[serde(flatten)]
    item: &'a InventoryItem,
}

/// Request for `getInventoryItems`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ListItemsRequest {
    pub limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

impl ListItemsRequest {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit,
            offset: None,
        }
    }
}

impl PagedRequest for ListItemsRequest {
    fn with_page(&self, page: u32) -> Self {
        Self {
            limit: self.limit,
            offset: Some(PaginationState::offset_for(page, self.limit)),
        }
    }
}

/// Response of `getInventoryItems`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItems {
    pub total: Option<u64>,
    pub limit: Option<u32>,
    pub offset: Option<u64>,
    pub inventory_items: Option<Vec<StoredInventoryItem>>,
}

impl PagedResponse for InventoryItems {
    fn pagination(&self) -> Option<PaginationState> {
        let limit = self.limit?;
        Some(PaginationState::from_offset(
            self.offset.unwrap_or(0),
            limit,
            self.total,
        ))
    }
}

/// Typed access to the Inventory operations.
#[derive(Clone)]
pub struct InventoryService {
    client: ServiceClient,
}

impl InventoryService {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ServiceClient {
        &self.client
    }

    pub async fn item(&self, sku: &str) -> SdkResult<Response<StoredInventoryItem>> {
        self.client
            .call(&GET_INVENTORY_ITEM, &SkuRequest { sku })
            .await
    }

    pub async fn items(&self, request: &ListItemsRequest) -> SdkResult<Response<InventoryItems>> {
        self.client.call(&GET_INVENTORY_ITEMS, request).await
    }

    /// Pages through `getInventoryItems`; collect as [`InventoryItems`].
    pub fn item_pages(&self, request: ListItemsRequest) -> Paginator<ListItemsRequest> {
        Paginator::new(self.client.clone(), GET_INVENTORY_ITEMS, request)
    }

    pub async fn create_or_replace_item(
        &self,
        sku: &str,
        item: &InventoryItem,
    ) -> SdkResult<Response<Acknowledged>> {
        self.client
            .call(&CREATE_OR_REPLACE_INVENTORY_ITEM, &PutItemRequest { sku, item })
            .await
    }

    pub async fn delete_item(&self, sku: &str) -> SdkResult<Response<Acknowledged>> {
        self.client
            .call(&DELETE_INVENTORY_ITEM, &SkuRequest { sku })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::common::SdkError;
    use crate::api::mock::ScriptedTransport;
    use crate::api::wire::WireResponse;
    use crate::auth::{CredentialProvider, Credentials, OAuthToken};
    use crate::config::{ApiFamily, EndpointConfig, Environment};
    use serde_json::{json, Value};
    use std::sync::Arc;

    fn inventory(transport: Arc<ScriptedTransport>) -> InventoryService {
        let endpoint =
            EndpointConfig::new(ApiFamily::Inventory, Environment::Sandbox).with_locale("en-US");
        let client = ServiceClient::builder(endpoint)
            .credentials(Arc::new(CredentialProvider::new(Credentials::OAuth(
                OAuthToken::new("v^1.1#user"),
            ))))
            .transport(transport)
            .build()
            .unwrap();
        InventoryService::new(client)
    }

    fn gopro() -> InventoryItem {
        InventoryItem::new("NEW_OTHER", 50).with_product(
            Product::new("GoPro Hero4 Helmet Cam")
                .with_description("New GoPro Hero4 Helmet Cam. Unopened box.")
                .with_aspect("Brand", ["GoPro"])
                .with_aspect("Optical Zoom", ["10x", "8x", "4x"])
                .with_image_url("http://i.ebayimg.com/images/i/182196556219-0-1/s-l1000.jpg"),
        )
    }

    #[tokio::test]
    async fn test_create_or_replace_puts_json_body() {
        let transport = Arc::new(ScriptedTransport::new(|_| Ok(WireResponse::new(204, ""))));
        let service = inventory(transport.clone());

        let response = service.create_or_replace_item("GP/123", &gopro()).await.unwrap();
        assert_eq!(response.status, 204);
        assert!(response.is_success());
        assert!(response.payload().is_none());

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, HttpMethod::Put);
        assert_eq!(sent.url.path(), "/sell/inventory/v1/inventory_item/GP%2F123");
        assert_eq!(sent.header("Content-Language"), Some("en-US"));

        let body: Value = serde_json::from_str(sent.body_text().unwrap()).unwrap();
        assert!(body.get("sku").is_none());
        assert_eq!(body["condition"], "NEW_OTHER");
        assert_eq!(body["availability"]["shipToLocationAvailability"]["quantity"], 50);
        assert_eq!(body["product"]["aspects"]["Optical Zoom"], json!(["10x", "8x", "4x"]));
        assert!(body["product"].get("brand").is_none());
    }

    #[tokio::test]
    async fn test_create_requires_condition() {
        let transport = Arc::new(ScriptedTransport::new(|_| Ok(WireResponse::new(204, ""))));
        let service = inventory(transport.clone());

        let err = service
            .create_or_replace_item("123", &InventoryItem::default())
            .await
            .unwrap_err();
        assert!(matches!(err, SdkError::Validation(ref m) if m.contains("condition")));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_get_item() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            Ok(WireResponse::new(
                200,
                json!({
                    "sku": "123",
                    "condition": "NEW_OTHER",
                    "availability": { "shipToLocationAvailability": { "quantity": 50 } },
                    "product": {
                        "title": "GoPro Hero4 Helmet Cam",
                        "aspects": { "Brand": ["GoPro"] }
                    }
                })
                .to_string(),
            )
            .with_header("Content-Type", "application/json"))
        }));
        let service = inventory(transport.clone());

        let response = service.item("123").await.unwrap();
        let stored = response.payload().unwrap();
        assert_eq!(stored.sku, "123");
        assert_eq!(stored.item.quantity(), Some(50));
        let product = stored.item.product.as_ref().unwrap();
        assert_eq!(product.aspects.as_ref().unwrap()["Brand"], vec!["GoPro"]);
        assert!(product.image_urls.is_none());

        let sent = &transport.requests()[0];
        assert_eq!(sent.method, HttpMethod::Get);
        assert!(sent.body.is_none());
        assert_eq!(sent.url.query(), None);
    }

    #[tokio::test]
    async fn test_delete_missing_item() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            Ok(WireResponse::new(
                404,
                json!({ "errors": [{
                    "errorId": 25702,
                    "domain": "API_INVENTORY",
                    "message": "The SKU 123 is not available in the system.",
                    "longMessage": "The SKU 123 is not available in the system."
                }]})
                .to_string(),
            ))
        }));
        let service = inventory(transport.clone());

        let response = service.delete_item("123").await.unwrap();
        assert!(!response.is_success());
        assert_eq!(response.errors[0].code.as_deref(), Some("25702"));
        assert_eq!(transport.requests()[0].method, HttpMethod::Delete);
    }

    #[tokio::test]
    async fn test_item_pages() {
        let transport = Arc::new(ScriptedTransport::new(|request| {
            let offset: u64 = request
                .url
                .query_pairs()
                .find(|(k, _)| k == "offset")
                .and_then(|(_, v)| v.parse().ok())
                .unwrap_or(0);
            Ok(WireResponse::new(
                200,
                json!({
                    "total": 5,
                    "limit": 2,
                    "offset": offset,
                    "inventoryItems": [{ "sku": format!("sku-{}", offset) }]
                })
                .to_string(),
            ))
        }));
        let service = inventory(transport.clone());

        let pages = service
            .item_pages(ListItemsRequest::with_limit(2))
            .collect::<InventoryItems>()
            .await;

        let skus: Vec<String> = pages
            .iter()
            .map(|p| {
                let items = p.result.as_ref().unwrap().payload().unwrap();
                items.inventory_items.as_ref().unwrap()[0].sku.clone()
            })
            .collect();
        assert_eq!(skus, vec!["sku-0", "sku-2", "sku-4"]);
    }
}
