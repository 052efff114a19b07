//
//  ebay-sdk
//  api/legacy/trading.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Trading API types and operations.
//!
//! The Trading API is the API-call XML family used to list, revise and end
//! items and to read account data such as feedback. Element names are
//! PascalCase; a legacy auth token travels inside the request body as
//! `<RequesterCredentials><eBayAuthToken>`.
//!
//! # Example
//!
//! ```rust,no_run
//! use ebay_sdk::api::legacy::trading::{
//!     AddFixedPriceItemRequest, Category, ListingItem, TradingService,
//! };
//! use ebay_sdk::api::legacy::Amount;
//! use ebay_sdk::api::ServiceClient;
//!
//! # async fn run(client: ServiceClient) -> ebay_sdk::api::SdkResult<()> {
//! let trading = TradingService::new(client);
//!
//! let item = ListingItem::new("GoPro Hero4 Helmet Cam", Category::new("31388"), Amount::new("USD", 99.95))
//!     .with_quantity(5)
//!     .with_specific("Brand", ["GoPro"]);
//!
//! let response = trading
//!     .add_fixed_price_item(&AddFixedPriceItemRequest { item })
//!     .await?;
//!
//! match response.payload() {
//!     Some(added) if response.is_success() => println!("Listed {:?}", added.item_id),
//!     _ => response.blocking_errors().for_each(|e| eprintln!("{}", e.message)),
//! }
//! # Ok(())
//! # }
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Amount;
use crate::api::client::ServiceClient;
use crate::api::codec::OperationSpec;
use crate::api::common::{PagedRequest, PagedResponse, PaginationState, Response, SdkResult};
use crate::api::pager::Paginator;

pub const GET_OFFICIAL_TIME: OperationSpec = OperationSpec::xml("GeteBayOfficialTime");
pub const GET_FEEDBACK: OperationSpec = OperationSpec::xml("GetFeedback");
pub const ADD_FIXED_PRICE_ITEM: OperationSpec =
    OperationSpec::xml("AddFixedPriceItem").with_required(&["Item"]);
pub const REVISE_FIXED_PRICE_ITEM: OperationSpec =
    OperationSpec::xml("ReviseFixedPriceItem").with_required(&["Item"]);
pub const END_ITEM: OperationSpec =
    OperationSpec::xml("EndItem").with_required(&["ItemID", "EndingReason"]);

/// Request for `GeteBayOfficialTime`; it has no fields.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GetOfficialTimeRequest {}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct OfficialTimeResponse {
    #[serde(rename = "Timestamp")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Page selection for Trading calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Pagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entries_per_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PaginationResult {
    pub total_number_of_pages: Option<u32>,
    pub total_number_of_entries: Option<u64>,
}

/// Request for `GetFeedback`.
///
/// Leaving `user_id` unset reads the feedback of the token's owner.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GetFeedbackRequest {
    #[serde(rename = "UserID", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "DetailLevel", skip_serializing_if = "Option::is_none")]
    pub detail_level: Option<String>,
    #[serde(rename = "Pagination", skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl GetFeedbackRequest {
    pub fn for_user(user_id: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id.into()),
            detail_level: Some("ReturnAll".to_string()),
            pagination: None,
        }
    }

    pub fn with_entries_per_page(mut self, entries: u32) -> Self {
        let mut pagination = self.pagination.unwrap_or_default();
        pagination.entries_per_page = Some(entries);
        self.pagination = Some(pagination);
        self
    }
}

impl PagedRequest for GetFeedbackRequest {
    fn with_page(&self, page: u32) -> Self {
        let mut next = self.clone();
        let mut pagination = next.pagination.unwrap_or_default();
        pagination.page_number = Some(page);
        next.pagination = Some(pagination);
        next
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FeedbackDetail {
    pub commenting_user: Option<String>,
    pub comment_text: Option<String>,
    pub comment_type: Option<String>,
    #[serde(rename = "ItemID")]
    pub item_id: Option<String>,
    pub comment_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FeedbackDetailArray {
    #[serde(rename = "FeedbackDetail", default)]
    pub feedback_detail: Vec<FeedbackDetail>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct GetFeedbackResponse {
    pub feedback_detail_array: Option<FeedbackDetailArray>,
    pub feedback_score: Option<i64>,
    pub page_number: Option<u32>,
    pub entries_per_page: Option<u32>,
    pub pagination_result: Option<PaginationResult>,
}

impl PagedResponse for GetFeedbackResponse {
    fn pagination(&self) -> Option<PaginationState> {
        let result = self.pagination_result?;
        let mut state =
            PaginationState::new(self.page_number.unwrap_or(1), self.entries_per_page.unwrap_or(0));
        state.total_pages = result.total_number_of_pages;
        state.total_entries = result.total_number_of_entries;
        Some(state)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "CategoryID")]
    pub category_id: String,
}

impl Category {
    pub fn new(category_id: impl Into<String>) -> Self {
        Self {
            category_id: category_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NameValueList {
    pub name: String,
    #[serde(default)]
    pub value: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ItemSpecifics {
    #[serde(rename = "NameValueList", default)]
    pub name_value_list: Vec<NameValueList>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PictureDetails {
    #[serde(rename = "PictureURL", default)]
    pub picture_url: Vec<String>,
}

/// A fixed-price listing.
///
/// Only the common listing fields are modelled; unset fields are omitted
/// from the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListingItem {
    #[serde(rename = "ItemID", skip_serializing_if = "Option::is_none", default)]
    pub item_id: Option<String>,
    #[serde(rename = "SKU", skip_serializing_if = "Option::is_none", default)]
    pub sku: Option<String>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    pub primary_category: Category,
    pub start_price: Amount,
    pub quantity: u32,
    #[serde(rename = "ConditionID", skip_serializing_if = "Option::is_none", default)]
    pub condition_id: Option<u32>,
    pub country: String,
    pub currency: String,
    pub dispatch_time_max: u32,
    pub listing_duration: String,
    pub listing_type: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub picture_details: Option<PictureDetails>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub item_specifics: Option<ItemSpecifics>,
}

impl ListingItem {
    /// A US fixed-price, good-'til-cancelled listing of one unit.
    pub fn new(title: impl Into<String>, category: Category, price: Amount) -> Self {
        Self {
            item_id: None,
            sku: None,
            title: title.into(),
            description: None,
            primary_category: category,
            currency: price.currency_id.clone(),
            start_price: price,
            quantity: 1,
            condition_id: None,
            country: "US".to_string(),
            dispatch_time_max: 3,
            listing_duration: "GTC".to_string(),
            listing_type: "FixedPriceItem".to_string(),
            location: None,
            picture_details: None,
            item_specifics: None,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    /// Adds an item specific such as `Brand: GoPro`.
    pub fn with_specific<I, S>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.item_specifics
            .get_or_insert_with(ItemSpecifics::default)
            .name_value_list
            .push(NameValueList {
                name: name.into(),
                value: values.into_iter().map(Into::into).collect(),
            });
        self
    }

    pub fn with_picture(mut self, url: impl Into<String>) -> Self {
        self.picture_details
            .get_or_insert_with(PictureDetails::default)
            .picture_url
            .push(url.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddFixedPriceItemRequest {
    #[serde(rename = "Item")]
    pub item: ListingItem,
}

/// Request for `ReviseFixedPriceItem`; `item.item_id` selects the listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviseFixedPriceItemRequest {
    #[serde(rename = "Item")]
    pub item: ListingItem,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Fee {
    pub name: String,
    pub fee: Amount,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Fees {
    #[serde(rename = "Fee", default)]
    pub fee: Vec<Fee>,
}

/// Response of `AddFixedPriceItem` and `ReviseFixedPriceItem`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ListingResponse {
    #[serde(rename = "ItemID")]
    pub item_id: Option<String>,
    #[serde(rename = "SKU")]
    pub sku: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub fees: Option<Fees>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EndItemRequest {
    #[serde(rename = "ItemID")]
    pub item_id: String,
    /// An `EndReasonCodeType` value such as `NotAvailable`.
    #[serde(rename = "EndingReason")]
    pub ending_reason: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EndItemResponse {
    #[serde(rename = "EndTime")]
    pub end_time: Option<DateTime<Utc>>,
}

/// Typed access to the Trading operations.
#[derive(Clone)]
pub struct TradingService {
    client: ServiceClient,
}

impl TradingService {
    /// Wraps a client whose endpoint is the Trading API.
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ServiceClient {
        &self.client
    }

    pub async fn official_time(&self) -> SdkResult<Response<OfficialTimeResponse>> {
        self.client
            .call(&GET_OFFICIAL_TIME, &GetOfficialTimeRequest::default())
            .await
    }

    pub async fn feedback(
        &self,
        request: &GetFeedbackRequest,
    ) -> SdkResult<Response<GetFeedbackResponse>> {
        self.client.call(&GET_FEEDBACK, request).await
    }

    /// Pages through `GetFeedback`; collect as [`GetFeedbackResponse`].
    pub fn feedback_pages(&self, request: GetFeedbackRequest) -> Paginator<GetFeedbackRequest> {
        Paginator::new(self.client.clone(), GET_FEEDBACK, request)
    }

    pub async fn add_fixed_price_item(
        &self,
        request: &AddFixedPriceItemRequest,
    ) -> SdkResult<Response<ListingResponse>> {
        self.client.call(&ADD_FIXED_PRICE_ITEM, request).await
    }

    pub async fn revise_fixed_price_item(
        &self,
        request: &ReviseFixedPriceItemRequest,
    ) -> SdkResult<Response<ListingResponse>> {
        self.client.call(&REVISE_FIXED_PRICE_ITEM, request).await
    }

    pub async fn end_item(&self, request: &EndItemRequest) -> SdkResult<Response<EndItemResponse>> {
        self.client.call(&END_ITEM, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::common::{Ack, Severity};
    use crate::api::mock::{client_for, ScriptedTransport};
    use crate::api::wire::WireResponse;
    use crate::auth::Credentials;
    use crate::config::ApiFamily;
    use std::sync::Arc;

    fn trading(transport: Arc<ScriptedTransport>) -> TradingService {
        TradingService::new(client_for(
            ApiFamily::Trading,
            Credentials::UserToken("AgAAAA**token".into()),
            transport,
        ))
    }

    fn feedback_page(page: u32) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<GetFeedbackResponse xmlns="urn:ebay:apis:eBLBaseComponents">
  <Timestamp>2026-01-12T10:00:00.000Z</Timestamp>
  <Ack>Success</Ack>
  <FeedbackDetailArray>
    <FeedbackDetail>
      <CommentingUser>buyer_{page}a</CommentingUser>
      <CommentText>Fast shipping</CommentText>
      <CommentType>Positive</CommentType>
      <ItemID>110{page}</ItemID>
    </FeedbackDetail>
    <FeedbackDetail>
      <CommentingUser>buyer_{page}b</CommentingUser>
      <CommentType>Neutral</CommentType>
    </FeedbackDetail>
  </FeedbackDetailArray>
  <FeedbackScore>412</FeedbackScore>
  <PaginationResult>
    <TotalNumberOfPages>3</TotalNumberOfPages>
    <TotalNumberOfEntries>26</TotalNumberOfEntries>
  </PaginationResult>
  <EntriesPerPage>10</EntriesPerPage>
  <PageNumber>{page}</PageNumber>
</GetFeedbackResponse>"#
        )
    }

    fn page_of(body: &str) -> u32 {
        body.split("<PageNumber>")
            .nth(1)
            .and_then(|rest| rest.split('<').next())
            .and_then(|n| n.parse().ok())
            .unwrap_or(1)
    }

    #[tokio::test]
    async fn test_feedback_page_and_token_in_body() {
        let transport = Arc::new(ScriptedTransport::new(|request| {
            let body = request.body_text().unwrap_or_default();
            Ok(WireResponse::new(200, feedback_page(page_of(body))).with_header("Content-Type", "text/xml"))
        }));
        let service = trading(transport.clone());

        let response = service
            .feedback(&GetFeedbackRequest::for_user("seller_1").with_page(1))
            .await
            .unwrap();

        assert_eq!(response.ack, Some(Ack::Success));
        let payload = response.payload().unwrap();
        let details = &payload.feedback_detail_array.as_ref().unwrap().feedback_detail;
        assert_eq!(details.len(), 2);
        assert_eq!(details[0].item_id.as_deref(), Some("1101"));
        assert_eq!(details[1].comment_text, None);

        let state = payload.pagination().unwrap();
        assert_eq!(state.page_number, 1);
        assert_eq!(state.total_pages, Some(3));
        assert_eq!(state.total_entries, Some(26));

        let sent = &transport.requests()[0];
        let body = sent.body_text().unwrap();
        assert!(body.contains("<RequesterCredentials><eBayAuthToken>AgAAAA**token</eBayAuthToken></RequesterCredentials>"));
        assert!(body.contains("<UserID>seller_1</UserID>"));
        assert_eq!(sent.header("X-EBAY-API-CALL-NAME"), Some("GetFeedback"));
    }

    #[tokio::test]
    async fn test_feedback_pages_visits_each_page_once() {
        let transport = Arc::new(ScriptedTransport::new(|request| {
            let body = request.body_text().unwrap_or_default();
            Ok(WireResponse::new(200, feedback_page(page_of(body))))
        }));
        let service = trading(transport.clone());

        let pages = service
            .feedback_pages(GetFeedbackRequest::for_user("seller_1").with_entries_per_page(10))
            .max_pages(20)
            .concurrent(2)
            .collect::<GetFeedbackResponse>()
            .await;

        let numbers: Vec<u32> = pages.iter().map(|p| p.number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        for page in &pages {
            let payload = page.result.as_ref().unwrap().payload().unwrap();
            assert_eq!(payload.page_number, Some(page.number));
        }
        assert_eq!(transport.calls(), 3);
    }

    #[tokio::test]
    async fn test_absent_feedback_list_is_none() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            Ok(WireResponse::new(
                200,
                "<GetFeedbackResponse><Ack>Success</Ack><FeedbackScore>0</FeedbackScore></GetFeedbackResponse>",
            ))
        }));

        let response = trading(transport)
            .feedback(&GetFeedbackRequest::default())
            .await
            .unwrap();
        let payload = response.payload().unwrap();
        assert!(payload.feedback_detail_array.is_none());
        assert_eq!(payload.feedback_score, Some(0));
    }

    #[tokio::test]
    async fn test_add_item_with_warning_and_error() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            Ok(WireResponse::new(
                200,
                r#"<AddFixedPriceItemResponse xmlns="urn:ebay:apis:eBLBaseComponents">
  <Ack>Failure</Ack>
  <Errors>
    <ShortMessage>Invalid category.</ShortMessage>
    <LongMessage>The category selected is not a leaf category.</LongMessage>
    <ErrorCode>87</ErrorCode>
    <SeverityCode>Error</SeverityCode>
  </Errors>
  <Errors>
    <ShortMessage>Funds not available.</ShortMessage>
    <ErrorCode>21917</ErrorCode>
    <SeverityCode>Warning</SeverityCode>
  </Errors>
</AddFixedPriceItemResponse>"#,
            ))
        }));

        let item = ListingItem::new("Helmet cam", Category::new("1"), Amount::new("USD", 99.95))
            .with_specific("Brand", ["GoPro"])
            .with_specific("Optical Zoom", ["10x", "8x"]);

        let response = trading(transport.clone())
            .add_fixed_price_item(&AddFixedPriceItemRequest { item })
            .await
            .unwrap();

        assert!(!response.is_success());
        let severities: Vec<Severity> = response.errors.iter().map(|e| e.severity).collect();
        assert_eq!(severities, vec![Severity::Error, Severity::Warning]);
        assert_eq!(response.errors[0].code.as_deref(), Some("87"));

        let body = transport.requests()[0].body_text().unwrap().to_string();
        assert!(body.contains(r#"<StartPrice currencyID="USD">99.95</StartPrice>"#));
        assert!(body.contains("<Value>10x</Value><Value>8x</Value>"));
        assert!(!body.contains("<Description>"));
    }

    #[tokio::test]
    async fn test_end_item_requires_fields_before_sending() {
        let transport = Arc::new(ScriptedTransport::new(|_| Ok(WireResponse::new(200, ""))));
        let service = trading(transport.clone());

        let err = service
            .client()
            .call::<_, EndItemResponse>(&END_ITEM, &serde_json::json!({ "ItemID": "1" }))
            .await
            .unwrap_err();
        assert!(matches!(err, crate::api::common::SdkError::Validation(_)));
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_official_time() {
        let transport = Arc::new(ScriptedTransport::new(|_| {
            Ok(WireResponse::new(
                200,
                "<GeteBayOfficialTimeResponse><Timestamp>2026-01-12T10:00:00.000Z</Timestamp><Ack>Success</Ack></GeteBayOfficialTimeResponse>",
            ))
        }));

        let response = trading(transport).official_time().await.unwrap();
        let timestamp = response.payload().unwrap().timestamp.unwrap();
        assert_eq!(timestamp.to_rfc3339(), "2026-01-12T10:00:00+00:00");
    }
}
