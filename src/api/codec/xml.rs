//
//  ebay-sdk
//  api/codec/xml.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! XML codec for the Trading, Shopping and SOA families.
//!
//! Requests are written as `<{Operation}Request xmlns="...">` documents.
//! The API-call dialect embeds a legacy token as
//! `<RequesterCredentials><eBayAuthToken>`; both dialects carry everything
//! else in `X-EBAY-API-*` or `X-EBAY-SOA-*` headers.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::multipart::{build_related, is_multipart, parse_related};
use super::{check_content_type, http_status_entry, scalar_text, Codec, Decoded, OperationSpec, RawPayload};
use crate::api::common::{Ack, ErrorEntry, SdkError, SdkResult, Severity};
use crate::api::wire::{Attachment, WireBody, WireRequest, WireResponse};
use crate::auth::{AuthHeaders, AuthScheme};
use crate::config::{ApiFamily, EndpointConfig};

/// Which XML header and error layout a family uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlDialect {
    /// Trading and Shopping.
    ApiCall,
    /// Finding, Business Policies, Bulk Data Exchange, File Transfer.
    Soa,
}

/// Codec for the XML families.
#[derive(Debug, Clone, Copy)]
pub struct XmlCodec {
    dialect: XmlDialect,
}

impl XmlCodec {
    pub fn new(dialect: XmlDialect) -> Self {
        Self { dialect }
    }

    pub fn dialect(&self) -> XmlDialect {
        self.dialect
    }

    fn headers(
        &self,
        operation: &OperationSpec,
        endpoint: &EndpointConfig,
        auth: &AuthHeaders,
    ) -> Vec<(String, String)> {
        let mut headers: Vec<(String, String)> = Vec::new();
        let mut push = |name: &str, value: &str| headers.push((name.to_string(), value.to_string()));

        match (self.dialect, endpoint.family) {
            (XmlDialect::ApiCall, ApiFamily::Shopping) => {
                push("X-EBAY-API-CALL-NAME", operation.name);
                push("X-EBAY-API-VERSION", &endpoint.api_version);
                push("X-EBAY-API-SITE-ID", &endpoint.site_id.to_string());
                push("X-EBAY-API-REQUEST-ENCODING", "xml");
                if let Some(app_id) = auth.app_id() {
                    push("X-EBAY-API-APP-ID", app_id);
                }
            }
            (XmlDialect::ApiCall, _) => {
                push("X-EBAY-API-COMPATIBILITY-LEVEL", &endpoint.api_version);
                push("X-EBAY-API-CALL-NAME", operation.name);
                push("X-EBAY-API-SITEID", &endpoint.site_id.to_string());
                if let Some(app) = &auth.app {
                    push("X-EBAY-API-APP-NAME", &app.app_id);
                    push("X-EBAY-API-CERT-NAME", &app.cert_id);
                    if let Some(dev_id) = &app.dev_id {
                        push("X-EBAY-API-DEV-NAME", dev_id);
                    }
                }
            }
            (XmlDialect::Soa, family) => {
                push("X-EBAY-SOA-OPERATION-NAME", operation.name);
                push("X-EBAY-SOA-SERVICE-VERSION", &endpoint.api_version);
                push("X-EBAY-SOA-GLOBAL-ID", &endpoint.global_id);
                push("X-EBAY-SOA-REQUEST-DATA-FORMAT", "XML");
                push("X-EBAY-SOA-RESPONSE-DATA-FORMAT", "XML");
                if let Some(service) = family.service_name() {
                    push("X-EBAY-SOA-SERVICE-NAME", service);
                }
                if let Some(app_id) = auth.app_id() {
                    push("X-EBAY-SOA-SECURITY-APPNAME", app_id);
                }
            }
        }

        match (&auth.scheme, self.dialect) {
            (AuthScheme::Bearer(token), XmlDialect::ApiCall) => {
                push("X-EBAY-API-IAF-TOKEN", token)
            }
            (AuthScheme::Bearer(token), XmlDialect::Soa) => {
                push("X-EBAY-SOA-SECURITY-IAFTOKEN", token)
            }
            (AuthScheme::LegacyToken(token), XmlDialect::Soa) => {
                push("X-EBAY-SOA-SECURITY-TOKEN", token)
            }
            // API-call legacy tokens travel in the body.
            (AuthScheme::LegacyToken(_), XmlDialect::ApiCall) | (AuthScheme::AppOnly, _) => {}
        }

        headers
    }

    fn document(
        &self,
        operation: &OperationSpec,
        endpoint: &EndpointConfig,
        auth: &AuthHeaders,
        request: &Value,
    ) -> SdkResult<Vec<u8>> {
        let empty = Map::new();
        let fields = match request {
            Value::Object(map) => map,
            Value::Null => &empty,
            other => {
                return Err(SdkError::Validation(format!(
                    "{} request must be a structure, got {}",
                    operation.name,
                    kind(other)
                )))
            }
        };

        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))
            .map_err(encode_error)?;

        let root = format!("{}Request", operation.name);
        let mut start = BytesStart::new(root.as_str());
        if let Some(ns) = endpoint.family.namespace() {
            start.push_attribute(("xmlns", ns));
        }
        push_attributes(&mut start, fields);
        writer.write_event(Event::Start(start)).map_err(encode_error)?;

        if let (XmlDialect::ApiCall, AuthScheme::LegacyToken(token)) = (self.dialect, &auth.scheme) {
            let credentials = serde_json::json!({ "eBayAuthToken": token });
            write_value(&mut writer, "RequesterCredentials", &credentials)?;
        }

        write_children(&mut writer, fields)?;

        writer
            .write_event(Event::End(BytesEnd::new(root.as_str())))
            .map_err(encode_error)?;

        Ok(writer.into_inner())
    }

    fn read_envelope(&self, text: &str) -> Result<(Option<Ack>, Vec<ErrorEntry>), String> {
        match self.dialect {
            XmlDialect::ApiCall => {
                let envelope: ApiCallEnvelope =
                    quick_xml::de::from_str(text).map_err(|e| e.to_string())?;
                let ack = envelope.ack.as_deref().and_then(Ack::parse);
                let errors = envelope.errors.into_iter().map(ErrorEntry::from).collect();
                Ok((ack, errors))
            }
            XmlDialect::Soa => {
                let envelope: SoaEnvelope =
                    quick_xml::de::from_str(text).map_err(|e| e.to_string())?;
                let ack = envelope.ack.as_deref().and_then(Ack::parse);
                let errors = envelope
                    .error_message
                    .map(|m| m.error)
                    .unwrap_or_default()
                    .into_iter()
                    .map(ErrorEntry::from)
                    .collect();
                Ok((ack, errors))
            }
        }
    }
}

impl Codec for XmlCodec {
    fn encode(
        &self,
        operation: &OperationSpec,
        endpoint: &EndpointConfig,
        auth: &AuthHeaders,
        request: &Value,
        attachment: Option<&Attachment>,
    ) -> SdkResult<WireRequest> {
        let document = self.document(operation, endpoint, auth, request)?;

        let body = match attachment {
            None => WireBody::new("text/xml", document),
            Some(_) if self.dialect == XmlDialect::ApiCall => {
                return Err(SdkError::Validation(format!(
                    "{} does not accept attachments",
                    endpoint.family
                )))
            }
            Some(attachment) => build_related(&document, attachment),
        };

        let mut wire = WireRequest::new(operation.method, endpoint.base_url.clone()).with_body(body);
        wire.headers = self.headers(operation, endpoint, auth);
        Ok(wire)
    }

    fn decode(&self, _operation: &OperationSpec, response: WireResponse) -> SdkResult<Decoded> {
        check_content_type(&response, &["xml", "multipart"])?;

        let status = response.status;
        let success = response.is_success();

        let (xml_bytes, attachment) = match response.content_type() {
            Some(ct) if is_multipart(ct) => {
                let parts = parse_related(ct, &response.body)?;
                (parts.root, parts.attachment)
            }
            _ => (response.body, None),
        };

        let text = match String::from_utf8(xml_bytes) {
            Ok(text) => text,
            Err(_) if success => {
                return Err(SdkError::Protocol("Response body is not valid UTF-8".to_string()))
            }
            Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
        };

        if text.trim().is_empty() {
            let errors = if success {
                Vec::new()
            } else {
                vec![http_status_entry(status, &[])]
            };
            return Ok(Decoded {
                status,
                ack: None,
                errors,
                payload: RawPayload::Empty,
                attachment,
            });
        }

        let (ack, mut errors) = match self.read_envelope(&text) {
            Ok(parsed) => parsed,
            Err(e) if success => {
                return Err(SdkError::Protocol(format!("Malformed XML response: {}", e)))
            }
            Err(_) => (None, Vec::new()),
        };

        if !success && errors.is_empty() {
            errors.push(http_status_entry(status, text.as_bytes()));
        }

        Ok(Decoded {
            status,
            ack,
            errors,
            payload: RawPayload::Xml(text),
            attachment,
        })
    }
}

fn encode_error(err: impl std::fmt::Display) -> SdkError {
    SdkError::Validation(format!("Could not encode XML request: {}", err))
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a structure",
    }
}

fn is_text_key(key: &str) -> bool {
    key == "$text" || key == "$value"
}

fn push_attributes(start: &mut BytesStart<'_>, fields: &Map<String, Value>) {
    for (key, value) in fields {
        if let Some(name) = key.strip_prefix('@') {
            if let Some(text) = scalar_text(value) {
                start.push_attribute((name, text.as_str()));
            }
        }
    }
}

fn write_children(writer: &mut Writer<Vec<u8>>, fields: &Map<String, Value>) -> SdkResult<()> {
    for (key, value) in fields {
        if key.starts_with('@') {
            continue;
        }
        if is_text_key(key) {
            if let Some(text) = scalar_text(value) {
                writer
                    .write_event(Event::Text(BytesText::new(&text)))
                    .map_err(encode_error)?;
            }
            continue;
        }
        write_value(writer, key, value)?;
    }
    Ok(())
}

/// Writes `value` as element(s) named `name`.
///
/// Nulls are skipped, arrays repeat the element once per item and
/// structures without any content become empty elements.
fn write_value(writer: &mut Writer<Vec<u8>>, name: &str, value: &Value) -> SdkResult<()> {
    match value {
        Value::Null => Ok(()),
        Value::Array(items) => {
            for item in items {
                write_value(writer, name, item)?;
            }
            Ok(())
        }
        Value::Object(fields) => {
            let mut start = BytesStart::new(name);
            push_attributes(&mut start, fields);

            let has_content = fields
                .iter()
                .any(|(k, v)| !k.starts_with('@') && !v.is_null());
            if !has_content {
                return writer.write_event(Event::Empty(start)).map_err(encode_error);
            }

            writer.write_event(Event::Start(start)).map_err(encode_error)?;
            write_children(writer, fields)?;
            writer
                .write_event(Event::End(BytesEnd::new(name)))
                .map_err(encode_error)
        }
        scalar => {
            let text = scalar_text(scalar).unwrap_or_default();
            writer
                .write_event(Event::Start(BytesStart::new(name)))
                .map_err(encode_error)?;
            writer
                .write_event(Event::Text(BytesText::new(&text)))
                .map_err(encode_error)?;
            writer
                .write_event(Event::End(BytesEnd::new(name)))
                .map_err(encode_error)
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ApiCallEnvelope {
    #[serde(rename = "Ack", default)]
    ack: Option<String>,
    #[serde(rename = "Errors", default)]
    errors: Vec<ApiCallError>,
}

#[derive(Debug, Deserialize)]
struct ApiCallError {
    #[serde(rename = "ShortMessage", default)]
    short_message: Option<String>,
    #[serde(rename = "LongMessage", default)]
    long_message: Option<String>,
    #[serde(rename = "ErrorCode", default)]
    error_code: Option<String>,
    #[serde(rename = "SeverityCode", default)]
    severity_code: Option<String>,
}

impl From<ApiCallError> for ErrorEntry {
    fn from(e: ApiCallError) -> Self {
        let severity = e
            .severity_code
            .as_deref()
            .map(Severity::parse)
            .unwrap_or(Severity::Error);
        ErrorEntry {
            code: e.error_code,
            message: e
                .short_message
                .clone()
                .or_else(|| e.long_message.clone())
                .unwrap_or_default(),
            long_message: e.long_message,
            severity,
            domain: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SoaEnvelope {
    #[serde(default)]
    ack: Option<String>,
    #[serde(rename = "errorMessage", default)]
    error_message: Option<SoaErrorMessage>,
}

#[derive(Debug, Default, Deserialize)]
struct SoaErrorMessage {
    #[serde(default)]
    error: Vec<SoaError>,
}

#[derive(Debug, Deserialize)]
struct SoaError {
    #[serde(rename = "errorId", default)]
    error_id: Option<String>,
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    severity: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl From<SoaError> for ErrorEntry {
    fn from(e: SoaError) -> Self {
        ErrorEntry {
            code: e.error_id,
            message: e.message.unwrap_or_default(),
            long_message: None,
            severity: e
                .severity
                .as_deref()
                .map(Severity::parse)
                .unwrap_or(Severity::Error),
            domain: e.domain,
        }
    }
}
