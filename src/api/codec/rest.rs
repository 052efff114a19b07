//
//  ebay-sdk
//  api/codec/rest.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! JSON codec for the REST families.
//!
//! Request fields are split three ways: `{field}` placeholders in the path
//! template, fields listed in [`OperationSpec::query`], and the remainder,
//! which becomes the JSON body of POST, PUT and PATCH requests.

use serde::Deserialize;
use serde_json::{Map, Value};

use super::{check_content_type, http_status_entry, scalar_text, Codec, Decoded, OperationSpec, RawPayload};
use crate::api::common::{ErrorEntry, SdkError, SdkResult, Severity};
use crate::api::wire::{Attachment, WireBody, WireRequest, WireResponse};
use crate::auth::{AuthHeaders, AuthScheme};
use crate::config::EndpointConfig;

/// Codec for the REST families.
#[derive(Debug, Clone, Copy, Default)]
pub struct RestCodec;

impl RestCodec {
    pub fn new() -> Self {
        Self
    }

    fn url(
        &self,
        operation: &OperationSpec,
        endpoint: &EndpointConfig,
        fields: &mut Map<String, Value>,
    ) -> SdkResult<url::Url> {
        let mut path = operation.path.to_string();
        for param in operation.path_params() {
            let value = fields
                .shift_remove(param)
                .as_ref()
                .and_then(scalar_text)
                .ok_or_else(|| {
                    SdkError::Validation(format!(
                        "{} path parameter '{}' must be a non-null scalar",
                        operation.name, param
                    ))
                })?;
            path = path.replace(&format!("{{{}}}", param), &urlencoding::encode(&value));
        }

        let raw = format!("{}{}", endpoint.base_url.as_str().trim_end_matches('/'), path);
        let mut url = url::Url::parse(&raw)
            .map_err(|e| SdkError::Validation(format!("Invalid request URL '{}': {}", raw, e)))?;

        let mut pairs: Vec<(&str, String)> = Vec::new();
        for name in operation.query {
            match fields.shift_remove(*name) {
                None | Some(Value::Null) => {}
                Some(Value::Array(items)) => {
                    for item in &items {
                        let text = scalar_text(item).ok_or_else(|| nested_query(operation, name))?;
                        pairs.push((name, text));
                    }
                }
                Some(value) => {
                    let text = scalar_text(&value).ok_or_else(|| nested_query(operation, name))?;
                    pairs.push((name, text));
                }
            }
        }

        if !pairs.is_empty() {
            let mut query = url.query_pairs_mut();
            for (name, value) in &pairs {
                query.append_pair(name, value);
            }
        }

        Ok(url)
    }
}

/// Drops `null` members and array items at every depth.
fn prune_nulls(fields: &mut Map<String, Value>) {
    fields.retain(|_, value| !value.is_null());
    for value in fields.values_mut() {
        prune_value(value);
    }
}

fn prune_value(value: &mut Value) {
    match value {
        Value::Object(map) => prune_nulls(map),
        Value::Array(items) => {
            items.retain(|item| !item.is_null());
            items.iter_mut().for_each(prune_value);
        }
        _ => {}
    }
}

fn nested_query(operation: &OperationSpec, name: &str) -> SdkError {
    SdkError::Validation(format!(
        "{} query parameter '{}' must be a scalar or a list of scalars",
        operation.name, name
    ))
}

impl Codec for RestCodec {
    fn encode(
        &self,
        operation: &OperationSpec,
        endpoint: &EndpointConfig,
        auth: &AuthHeaders,
        request: &Value,
        attachment: Option<&Attachment>,
    ) -> SdkResult<WireRequest> {
        if attachment.is_some() {
            return Err(SdkError::Validation(format!(
                "{} does not accept attachments",
                endpoint.family
            )));
        }

        let token = match &auth.scheme {
            AuthScheme::Bearer(token) => token,
            _ => {
                return Err(SdkError::Auth(format!(
                    "{} requires an OAuth bearer token",
                    endpoint.family
                )))
            }
        };

        let mut fields = match request {
            Value::Object(map) => map.clone(),
            Value::Null => Map::new(),
            _ => {
                return Err(SdkError::Validation(format!(
                    "{} request must be a structure",
                    operation.name
                )))
            }
        };
        prune_nulls(&mut fields);

        let url = self.url(operation, endpoint, &mut fields)?;

        let mut wire = WireRequest::new(operation.method, url)
            .header_pair("Authorization", format!("Bearer {}", token))
            .header_pair("Accept", "application/json")
            .header_pair("X-EBAY-C-MARKETPLACE-ID", endpoint.marketplace_id.clone());

        if let Some(locale) = &endpoint.locale {
            wire = wire
                .header_pair("Accept-Language", locale.clone())
                .header_pair("Content-Language", locale.clone());
        }

        if operation.method.has_body() {
            if !fields.is_empty() {
                let json = serde_json::to_vec(&Value::Object(fields)).map_err(|e| {
                    SdkError::Validation(format!("Could not encode {}: {}", operation.name, e))
                })?;
                wire = wire.with_body(WireBody::new("application/json", json));
            }
        } else if !fields.is_empty() {
            let names: Vec<&str> = fields.keys().map(String::as_str).collect();
            return Err(SdkError::Validation(format!(
                "{} ({}) cannot send field(s) {} in a body",
                operation.name,
                operation.method,
                names.join(", ")
            )));
        }

        Ok(wire)
    }

    fn decode(&self, _operation: &OperationSpec, response: WireResponse) -> SdkResult<Decoded> {
        check_content_type(&response, &["json"])?;

        let status = response.status;
        let success = response.is_success();

        if response.body.iter().all(u8::is_ascii_whitespace) {
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
                attachment: None,
            });
        }

        let value: Value = match serde_json::from_slice(&response.body) {
            Ok(value) => value,
            Err(e) if success => {
                return Err(SdkError::Protocol(format!("Malformed JSON response: {}", e)))
            }
            Err(_) => {
                return Ok(Decoded {
                    status,
                    ack: None,
                    errors: vec![http_status_entry(status, &response.body)],
                    payload: RawPayload::Empty,
                    attachment: None,
                })
            }
        };

        let mut errors = entries(&value, "errors", Severity::Error);
        errors.extend(entries(&value, "warnings", Severity::Warning));

        if !success && !errors.iter().any(ErrorEntry::is_error) {
            errors.insert(0, http_status_entry(status, &response.body));
        }

        Ok(Decoded {
            status,
            ack: None,
            errors,
            payload: RawPayload::Json(value),
            attachment: None,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestError {
    #[serde(default)]
    error_id: Option<Value>,
    #[serde(default)]
    domain: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    long_message: Option<String>,
}

fn entries(body: &Value, key: &str, severity: Severity) -> Vec<ErrorEntry> {
    let Some(items) = body.get(key).and_then(Value::as_array) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| serde_json::from_value::<RestError>(item.clone()).ok())
        .map(|e| ErrorEntry {
            code: e.error_id.as_ref().and_then(scalar_text),
            message: e
                .message
                .clone()
                .or_else(|| e.long_message.clone())
                .unwrap_or_default(),
            long_message: e.long_message,
            severity,
            domain: e.domain,
        })
        .collect()
}
