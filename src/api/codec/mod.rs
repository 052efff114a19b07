//
//  ebay-sdk
//  api/codec/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Request Codecs
//!
//! A codec turns a request value into a [`WireRequest`] for one wire
//! protocol, and turns the [`WireResponse`] back into status, `Ack`, error
//! entries and a raw payload. Typed conversion of that payload happens in
//! [`Decoded::into_response`], so codecs stay object-safe and one codec
//! instance serves every operation of a family.
//!
//! ## Codecs
//!
//! | Codec | Families | Errors read from |
//! |-------|----------|------------------|
//! | [`XmlCodec`] (API call) | Trading, Shopping | `Ack`, `Errors` |
//! | [`XmlCodec`] (SOA) | Finding, Business Policies, Bulk Data, File Transfer | `ack`, `errorMessage.error` |
//! | [`RestCodec`] | Browse, Inventory | HTTP status, `errors`, `warnings` |
//!
//! ## Request values
//!
//! Requests are serialized with serde into a JSON object before encoding.
//! `None` fields (or explicit nulls) are omitted, arrays become repeated
//! elements or parameters in order, keys starting with `@` become XML
//! attributes and a `$text` key becomes an element's text content.

mod multipart;
mod rest;
mod xml;

pub use multipart::*;
pub use rest::*;
pub use xml::*;

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::api::common::{Ack, ErrorEntry, Response, SdkError, SdkResult, Severity};
use crate::api::wire::{Attachment, HttpMethod, WireRequest, WireResponse};
use crate::auth::AuthHeaders;
use crate::config::{EndpointConfig, Protocol};
use crate::util::truncate;

/// Static description of one remote operation.
///
/// XML operations only need a name. REST operations also carry the HTTP
/// method, a path template with `{field}` placeholders, the fields sent as
/// query parameters and the fields that must be present.
///
/// # Example
///
/// ```rust
/// use ebay_sdk::api::{HttpMethod, OperationSpec};
///
/// const GET_ITEM: OperationSpec =
///     OperationSpec::rest("getItem", HttpMethod::Get, "/item/{item_id}")
///         .with_query(&["fieldgroups"]);
///
/// assert_eq!(GET_ITEM.path_params(), vec!["item_id"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperationSpec {
    pub name: &'static str,
    pub method: HttpMethod,
    pub path: &'static str,
    pub query: &'static [&'static str],
    pub required: &'static [&'static str],
}

impl OperationSpec {
    /// An XML operation (always a POST to the family endpoint).
    pub const fn xml(name: &'static str) -> Self {
        Self {
            name,
            method: HttpMethod::Post,
            path: "",
            query: &[],
            required: &[],
        }
    }

    /// A REST operation.
    pub const fn rest(name: &'static str, method: HttpMethod, path: &'static str) -> Self {
        Self {
            name,
            method,
            path,
            query: &[],
            required: &[],
        }
    }

    pub const fn with_query(mut self, query: &'static [&'static str]) -> Self {
        self.query = query;
        self
    }

    pub const fn with_required(mut self, required: &'static [&'static str]) -> Self {
        self.required = required;
        self
    }

    /// Names of the `{field}` placeholders in the path template, in order.
    pub fn path_params(&self) -> Vec<&'static str> {
        let mut params = Vec::new();
        let mut rest = self.path;
        while let Some(start) = rest.find('{') {
            let after = &rest[start + 1..];
            match after.find('}') {
                Some(end) => {
                    params.push(&after[..end]);
                    rest = &after[end + 1..];
                }
                None => break,
            }
        }
        params
    }

    /// Fails with [`SdkError::Validation`] if a required or path field is
    /// missing or null.
    pub fn validate(&self, request: &Value) -> SdkResult<()> {
        let missing: Vec<&str> = self
            .required
            .iter()
            .copied()
            .chain(self.path_params())
            .filter(|field| request.get(*field).map(Value::is_null).unwrap_or(true))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(SdkError::Validation(format!(
                "{} is missing required field(s): {}",
                self.name,
                missing.join(", ")
            )))
        }
    }
}

/// Payload of a decoded response, before typed conversion.
#[derive(Debug, Clone, PartialEq)]
pub enum RawPayload {
    /// The XML document (the root part, for multipart responses).
    Xml(String),
    Json(Value),
    Empty,
}

/// A response after protocol-level decoding.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    pub status: u16,
    pub ack: Option<Ack>,
    pub errors: Vec<ErrorEntry>,
    pub payload: RawPayload,
    pub attachment: Option<Attachment>,
}

impl Decoded {
    fn is_failure(&self) -> bool {
        !(200..300).contains(&self.status)
            || self.ack == Some(Ack::Failure)
            || self.errors.iter().any(ErrorEntry::is_error)
    }

    /// Converts the raw payload into `T`.
    ///
    /// # Errors
    ///
    /// On a successful response, a payload that does not match `T` is a
    /// [`SdkError::Protocol`]. On a failed response it simply leaves the
    /// payload empty, so the error entries can still be inspected.
    pub fn into_response<T: DeserializeOwned>(self, operation: &str) -> SdkResult<Response<T>> {
        let failed = self.is_failure();

        let decoded: Option<Result<T, String>> = match self.payload {
            RawPayload::Empty => None,
            RawPayload::Xml(text) => Some(quick_xml::de::from_str(&text).map_err(|e| e.to_string())),
            RawPayload::Json(value) => Some(serde_json::from_value(value).map_err(|e| e.to_string())),
        };

        let payload = match decoded {
            None => None,
            Some(Ok(value)) => Some(value),
            Some(Err(_)) if failed => None,
            Some(Err(e)) => {
                return Err(SdkError::Protocol(format!(
                    "Could not decode {} response: {}",
                    operation, e
                )))
            }
        };

        Ok(Response {
            status: self.status,
            ack: self.ack,
            payload,
            errors: self.errors,
            attachment: self.attachment,
        })
    }
}

/// Encodes requests and decodes responses for one wire protocol.
pub trait Codec: Send + Sync {
    /// Builds the wire request for `operation`.
    ///
    /// # Parameters
    ///
    /// * `operation` - The operation being called
    /// * `endpoint` - Where the family lives and its identifiers
    /// * `auth` - Resolved authentication
    /// * `request` - The request serialized as a JSON object
    /// * `attachment` - Binary data to send alongside, if any
    fn encode(
        &self,
        operation: &OperationSpec,
        endpoint: &EndpointConfig,
        auth: &AuthHeaders,
        request: &Value,
        attachment: Option<&Attachment>,
    ) -> SdkResult<WireRequest>;

    /// Reads status, outcome, error entries and payload from `response`.
    fn decode(&self, operation: &OperationSpec, response: WireResponse) -> SdkResult<Decoded>;
}

/// Returns the codec for `protocol`.
pub fn codec_for(protocol: Protocol) -> Arc<dyn Codec> {
    match protocol {
        Protocol::XmlApiCall => Arc::new(XmlCodec::new(XmlDialect::ApiCall)),
        Protocol::XmlSoa => Arc::new(XmlCodec::new(XmlDialect::Soa)),
        Protocol::Rest => Arc::new(RestCodec::new()),
    }
}

/// Renders a scalar JSON value as text; `None` for null, arrays and objects.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// The entry reported for a non-2xx response whose body carried none.
pub(crate) fn http_status_entry(status: u16, body: &[u8]) -> ErrorEntry {
    let snippet = String::from_utf8_lossy(body);
    let snippet = snippet.trim();
    ErrorEntry {
        code: Some(status.to_string()),
        message: format!("HTTP {}", status),
        long_message: if snippet.is_empty() {
            None
        } else {
            Some(truncate(snippet, 200))
        },
        severity: Severity::Error,
        domain: Some("HTTP".to_string()),
    }
}

/// Fails unless a 2xx response's content type matches one of `expected`.
///
/// A missing header is accepted.
pub(crate) fn check_content_type(response: &WireResponse, expected: &[&str]) -> SdkResult<()> {
    if !response.is_success() || response.body.is_empty() {
        return Ok(());
    }
    match response.content_type() {
        Some(ct) if !expected.iter().any(|e| ct.to_ascii_lowercase().contains(e)) => {
            Err(SdkError::Protocol(format!("Unexpected content type '{}'", ct)))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Item {
        id: String,
    }

    const GET_ITEM: OperationSpec =
        OperationSpec::rest("getItem", HttpMethod::Get, "/item/{item_id}/group/{group}")
            .with_required(&["marketplace"]);

    #[test]
    fn test_path_params() {
        assert_eq!(GET_ITEM.path_params(), vec!["item_id", "group"]);
        assert!(OperationSpec::xml("GetFeedback").path_params().is_empty());
    }

    #[test]
    fn test_validate_reports_all_missing_fields() {
        let err = GET_ITEM
            .validate(&json!({ "item_id": "1", "group": null }))
            .unwrap_err();
        match err {
            SdkError::Validation(message) => {
                assert!(message.contains("marketplace"));
                assert!(message.contains("group"));
                assert!(!message.contains("item_id"));
            }
            other => panic!("unexpected: {:?}", other),
        }

        GET_ITEM
            .validate(&json!({ "item_id": "1", "group": "g", "marketplace": "EBAY_US" }))
            .unwrap();
    }

    #[test]
    fn test_success_with_bad_payload_is_protocol_error() {
        let decoded = Decoded {
            status: 200,
            ack: None,
            errors: Vec::new(),
            payload: RawPayload::Json(json!({ "unexpected": true })),
            attachment: None,
        };
        assert!(matches!(
            decoded.into_response::<Item>("getItem"),
            Err(SdkError::Protocol(_))
        ));
    }

    #[test]
    fn test_failure_with_bad_payload_keeps_errors() {
        let decoded = Decoded {
            status: 404,
            ack: None,
            errors: vec![ErrorEntry::new(Severity::Error, "not found")],
            payload: RawPayload::Json(json!({ "errors": [] })),
            attachment: None,
        };
        let response = decoded.into_response::<Item>("getItem").unwrap();
        assert!(response.payload.is_none());
        assert_eq!(response.errors.len(), 1);
    }

    #[test]
    fn test_empty_payload_is_none() {
        let decoded = Decoded {
            status: 204,
            ack: None,
            errors: Vec::new(),
            payload: RawPayload::Empty,
            attachment: None,
        };
        let response = decoded.into_response::<Item>("createOrReplace").unwrap();
        assert!(response.is_success());
        assert!(response.payload.is_none());
    }

    #[test]
    fn test_http_status_entry_truncates_body() {
        let body = "x".repeat(500);
        let entry = http_status_entry(502, body.as_bytes());
        assert_eq!(entry.code.as_deref(), Some("502"));
        assert!(entry.long_message.unwrap().chars().count() <= 200);
    }

    #[test]
    fn test_check_content_type() {
        let html = WireResponse::new(200, "<html/>").with_header("Content-Type", "text/html");
        assert!(check_content_type(&html, &["xml"]).is_err());

        let xml = WireResponse::new(200, "<a/>").with_header("Content-Type", "text/xml;charset=utf-8");
        assert!(check_content_type(&xml, &["xml"]).is_ok());

        let error_page = WireResponse::new(503, "<html/>").with_header("Content-Type", "text/html");
        assert!(check_content_type(&error_page, &["json"]).is_ok());
    }
}
