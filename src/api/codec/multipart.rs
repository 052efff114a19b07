//
//  ebay-sdk
//  api/codec/multipart.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! XOP `multipart/related` bodies used by the File Transfer service.
//!
//! The root part is the XML document; the second part is the binary
//! attachment, referenced from the XML with an `xop:Include` element whose
//! `href` is [`ATTACHMENT_HREF`].

use serde::Serialize;

use crate::api::common::{SdkError, SdkResult};
use crate::api::wire::{Attachment, WireBody};
use crate::util::unique_id;

/// Content id of the attachment part.
pub const ATTACHMENT_CONTENT_ID: &str = "attachment.bin@ebay-sdk";

/// `href` pointing the XML document at the attachment part.
pub const ATTACHMENT_HREF: &str = "cid:attachment.bin@ebay-sdk";

const ROOT_CONTENT_ID: &str = "root.message@ebay-sdk";
const XOP_NAMESPACE: &str = "http://www.w3.org/2004/08/xop/include";

/// The `<xop:Include>` element placed where the binary data belongs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct XopInclude {
    #[serde(rename = "xop:Include")]
    include: XopIncludeAttrs,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
struct XopIncludeAttrs {
    #[serde(rename = "@xmlns:xop")]
    namespace: &'static str,
    #[serde(rename = "@href")]
    href: &'static str,
}

impl Default for XopInclude {
    fn default() -> Self {
        Self {
            include: XopIncludeAttrs {
                namespace: XOP_NAMESPACE,
                href: ATTACHMENT_HREF,
            },
        }
    }
}

/// Parts of a decoded `multipart/related` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedParts {
    pub root: Vec<u8>,
    pub attachment: Option<Attachment>,
}

/// Returns `true` for `multipart/related` content types.
pub fn is_multipart(content_type: &str) -> bool {
    content_type
        .trim_start()
        .to_ascii_lowercase()
        .starts_with("multipart/related")
}

/// Builds an XOP body with `document` as the root part and `attachment`
/// as the binary part.
pub fn build_related(document: &[u8], attachment: &Attachment) -> WireBody {
    let boundary = format!("MIMEBoundary_{}", unique_id());
    let mut body = Vec::with_capacity(document.len() + attachment.data.len() + 512);

    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(
        b"Content-Type: application/xop+xml; charset=UTF-8; type=\"text/xml\"\r\n",
    );
    body.extend_from_slice(b"Content-Transfer-Encoding: binary\r\n");
    body.extend_from_slice(format!("Content-ID: <{}>\r\n\r\n", ROOT_CONTENT_ID).as_bytes());
    body.extend_from_slice(document);
    body.extend_from_slice(b"\r\n");

    body.extend_from_slice(format!("--{}\r\n", boundary).as_bytes());
    body.extend_from_slice(format!("Content-Type: {}\r\n", attachment.content_type).as_bytes());
    body.extend_from_slice(b"Content-Transfer-Encoding: binary\r\n");
    body.extend_from_slice(format!("Content-ID: <{}>\r\n\r\n", ATTACHMENT_CONTENT_ID).as_bytes());
    body.extend_from_slice(&attachment.data);
    body.extend_from_slice(b"\r\n");

    body.extend_from_slice(format!("--{}--\r\n", boundary).as_bytes());

    let content_type = format!(
        "multipart/related; type=\"application/xop+xml\"; boundary=\"{}\"; start=\"<{}>\"; start-info=\"text/xml\"",
        boundary, ROOT_CONTENT_ID
    );

    WireBody::new(content_type, body)
}

/// Splits a `multipart/related` body into its XML root and attachment.
///
/// The root is the part named by the `start` parameter, or the first part
/// when `start` is absent. The first other part becomes the attachment.
pub fn parse_related(content_type: &str, body: &[u8]) -> SdkResult<RelatedParts> {
    let boundary = content_type_param(content_type, "boundary").ok_or_else(|| {
        SdkError::Protocol("multipart response has no boundary".to_string())
    })?;
    let start = content_type_param(content_type, "start");

    let delimiter = format!("--{}", boundary);
    let mut parts: Vec<Part> = Vec::new();

    for chunk in split(body, delimiter.as_bytes()).into_iter().skip(1) {
        if chunk.starts_with(b"--") {
            break;
        }
        let chunk = chunk.strip_prefix(b"\r\n").unwrap_or(chunk);
        let chunk = chunk.strip_suffix(b"\r\n").unwrap_or(chunk);
        parts.push(Part::parse(chunk)?);
    }

    if parts.is_empty() {
        return Err(SdkError::Protocol("multipart response has no parts".to_string()));
    }

    let root_index = start
        .as_deref()
        .and_then(|id| parts.iter().position(|p| p.content_id.as_deref() == Some(strip_angles(id))))
        .unwrap_or(0);

    let root = parts.remove(root_index);
    let attachment = parts.into_iter().next().map(|p| {
        Attachment::new(
            p.content_type
                .unwrap_or_else(|| "application/octet-stream".to_string()),
            p.body,
        )
    });

    Ok(RelatedParts {
        root: root.body,
        attachment,
    })
}

struct Part {
    content_type: Option<String>,
    content_id: Option<String>,
    body: Vec<u8>,
}

impl Part {
    fn parse(raw: &[u8]) -> SdkResult<Self> {
        let split_at = find(raw, b"\r\n\r\n")
            .ok_or_else(|| SdkError::Protocol("multipart part has no header block".to_string()))?;
        let head = String::from_utf8_lossy(&raw[..split_at]);

        let mut content_type = None;
        let mut content_id = None;
        for line in head.lines() {
            if let Some((name, value)) = line.split_once(':') {
                let value = value.trim().to_string();
                if name.trim().eq_ignore_ascii_case("content-type") {
                    content_type = Some(value);
                } else if name.trim().eq_ignore_ascii_case("content-id") {
                    content_id = Some(strip_angles(&value).to_string());
                }
            }
        }

        Ok(Self {
            content_type,
            content_id,
            body: raw[split_at + 4..].to_vec(),
        })
    }
}

fn strip_angles(value: &str) -> &str {
    value.trim().trim_start_matches('<').trim_end_matches('>')
}

fn content_type_param(content_type: &str, name: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        if key.trim().eq_ignore_ascii_case(name) {
            Some(value.trim().trim_matches('"').to_string())
        } else {
            None
        }
    })
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn split<'a>(haystack: &'a [u8], delimiter: &[u8]) -> Vec<&'a [u8]> {
    let mut pieces = Vec::new();
    let mut rest = haystack;
    while let Some(pos) = find(rest, delimiter) {
        pieces.push(&rest[..pos]);
        rest = &rest[pos + delimiter.len()..];
    }
    pieces.push(rest);
    pieces
}
