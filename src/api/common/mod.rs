//
//  ebay-sdk
//  api/common/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Common API Types for the XML and REST API families
//!
//! This module provides the types shared by every API family: the failure
//! type returned when a call could not be completed, the error entries a
//! well-formed response may carry, and the [`Response`] wrapper itself.
//!
//! # Overview
//!
//! | Type | Purpose |
//! |------|---------|
//! | [`SdkError`] | A call could not be completed (auth, network, protocol, validation) |
//! | [`ErrorEntry`] | One error or warning reported *inside* a well-formed response |
//! | [`Severity`] | Whether an entry is blocking (`Error`) or informational (`Warning`) |
//! | [`Ack`] | The legacy `Ack` outcome field |
//! | [`Response`] | Status, typed payload, ordered error entries, optional attachment |
//!
//! # Failures vs. error entries
//!
//! An API that answers "no" is not a failure of the call. A Finding request
//! with an invalid category still produces a [`Response`]; its
//! [`errors`](Response::errors) list says what went wrong. Only conditions
//! that prevent a usable response from existing at all are returned as
//! [`SdkError`].
//!
//! ```rust
//! use ebay_sdk::api::common::{ErrorEntry, Response, Severity};
//!
//! let response: Response<()> = Response {
//!     status: 200,
//!     ack: None,
//!     payload: None,
//!     errors: vec![ErrorEntry::new(Severity::Warning, "Dropped an unknown filter")],
//!     attachment: None,
//! };
//!
//! assert!(response.is_success());
//! assert_eq!(response.warnings().count(), 1);
//! ```

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::api::wire::Attachment;

mod pagination;

pub use pagination::*;

/// Classification of an [`SdkError`].
///
/// The variants mirror the failure taxonomy callers reason about: whether
/// credentials, the network, the wire format or the request itself was at
/// fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Missing, invalid or expired credentials, or a failed token refresh.
    Auth,
    /// Connection, DNS or timeout failures.
    Network,
    /// Malformed response body or unexpected content type.
    Protocol,
    /// The request failed local checks before being sent.
    Validation,
    /// A well-formed response reported blocking errors.
    Api,
    /// The async runtime failed to run a task.
    Runtime,
}

/// Unified failure type for every operation in the SDK.
///
/// `SdkError` is returned when a call *could not be completed as designed*.
/// Well-formed responses that carry error entries are not failures and
/// never produce an `SdkError` from the dispatcher.
///
/// # Variants
///
/// | Variant | Category | Raised by |
/// |---------|----------|-----------|
/// | `AuthRequired` | Auth | Credential provider with nothing configured |
/// | `Auth` | Auth | Rejected credentials, failed refresh |
/// | `Network` | Network | Transport |
/// | `Timeout` | Network | Transport |
/// | `Protocol` | Protocol | Codec, transport |
/// | `Validation` | Validation | Codec, before any I/O |
/// | `Rejected` | Api | Convenience helpers that need a payload to continue |
/// | `PollLimitExceeded` | Runtime | Job poller |
/// | `Runtime` | Runtime | Batch executor, blocking wrapper |
#[derive(Error, Debug)]
pub enum SdkError {
    /// No credential variant was configured for a call that needs one.
    #[error("Authentication required")]
    AuthRequired,

    /// Credentials were present but unusable.
    ///
    /// # Parameters
    ///
    /// - `0` - Why the credentials could not be used
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// A network-level error occurred during the request.
    ///
    /// Covers connection failures, DNS resolution errors and failures while
    /// reading the response body.
    #[error("Network error: {0}")]
    Network(String),

    /// The request did not complete within the configured timeout.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// The response could not be understood.
    #[error("Protocol error: {0}")]
    Protocol(String),

    /// The request failed local shape checks and was never sent.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// An operation whose payload is needed to continue a workflow reported
    /// blocking errors.
    #[error("{operation} was rejected: {}", summarize(errors))]
    Rejected {
        /// Name of the rejected operation
        operation: String,
        /// The entries reported by the API
        errors: Vec<ErrorEntry>,
    },

    /// A job never reached a terminal status within the attempt ceiling.
    #[error("Job {job_id} did not finish after {attempts} status checks")]
    PollLimitExceeded {
        /// The polled job
        job_id: String,
        /// Number of status calls made
        attempts: u32,
    },

    /// A spawned task or runtime failed.
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl SdkError {
    /// Returns the taxonomy bucket this failure belongs to.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AuthRequired | Self::Auth(_) => ErrorCategory::Auth,
            Self::Network(_) | Self::Timeout(_) => ErrorCategory::Network,
            Self::Protocol(_) => ErrorCategory::Protocol,
            Self::Validation(_) => ErrorCategory::Validation,
            Self::Rejected { .. } => ErrorCategory::Api,
            Self::PollLimitExceeded { .. } | Self::Runtime(_) => ErrorCategory::Runtime,
        }
    }
}

fn summarize(errors: &[ErrorEntry]) -> String {
    let messages: Vec<&str> = errors
        .iter()
        .filter(|e| e.severity == Severity::Error)
        .map(|e| e.message.as_str())
        .collect();

    if messages.is_empty() {
        "no error details".to_string()
    } else {
        messages.join("; ")
    }
}

/// Result alias used across the SDK.
pub type SdkResult<T> = std::result::Result<T, SdkError>;

/// Whether an [`ErrorEntry`] blocks the operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// The operation did not fully succeed.
    Error,
    /// Informational; may coexist with a successful payload.
    Warning,
}

impl Severity {
    /// Parses the severity strings used across the XML families.
    ///
    /// Anything other than a case-insensitive `"Warning"` is treated as
    /// blocking, so unknown severities never hide a failure.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("warning") {
            Self::Warning
        } else {
            Self::Error
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "Error"),
            Self::Warning => write!(f, "Warning"),
        }
    }
}

/// One error or warning reported by a well-formed response.
///
/// Entries are produced only by the response codecs and are read-only to
/// callers. The fields normalize the different layouts used by each family:
///
/// | Field | Trading/Shopping | SOA families | REST families |
/// |-------|------------------|--------------|---------------|
/// | `code` | `ErrorCode` | `errorId` | `errorId` |
/// | `message` | `ShortMessage` | `message` | `message` |
/// | `long_message` | `LongMessage` | - | `longMessage` |
/// | `severity` | `SeverityCode` | `severity` | `errors`/`warnings` array |
/// | `domain` | - | `domain` | `domain` |
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// Error identifier or code, if the API supplied one.
    pub code: Option<String>,
    /// Short, human-readable message.
    pub message: String,
    /// Longer explanation, if supplied.
    pub long_message: Option<String>,
    /// Whether this entry blocks the operation.
    pub severity: Severity,
    /// Error domain (e.g. `API_BROWSE`), if supplied.
    pub domain: Option<String>,
}

impl ErrorEntry {
    /// Creates an entry with only a severity and message.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
            long_message: None,
            severity,
            domain: None,
        }
    }

    /// Returns `true` if the entry blocks the operation.
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for ErrorEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.code {
            Some(code) => write!(f, "{} {}: {}", self.severity, code, self.message),
            None => write!(f, "{}: {}", self.severity, self.message),
        }
    }
}

/// The `Ack` outcome reported by the XML families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ack {
    /// The call succeeded.
    Success,
    /// The call succeeded with warnings.
    Warning,
    /// The call failed.
    Failure,
    /// Some of the work succeeded.
    PartialFailure,
}

impl Ack {
    /// Parses an `Ack`/`ack` value, returning `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Success" => Some(Self::Success),
            "Warning" => Some(Self::Warning),
            "Failure" => Some(Self::Failure),
            "PartialFailure" => Some(Self::PartialFailure),
            _ => None,
        }
    }
}

/// A decoded response from any API family.
///
/// # Fields
///
/// | Field | Meaning |
/// |-------|---------|
/// | `status` | HTTP status code |
/// | `ack` | Legacy `Ack` field (XML families only) |
/// | `payload` | The typed body, if one could be decoded |
/// | `errors` | Error and warning entries, in document order |
/// | `attachment` | Binary attachment (File Transfer downloads) |
///
/// # Absent payload vs. absent fields
///
/// `payload` is `None` when the response carried no decodable body, which
/// happens for failed calls and for `204 No Content`. Optional collections
/// *inside* a payload are `Option` fields: `None` means the API omitted
/// the collection, `Some(vec![])` means it returned zero items. Check
/// [`is_success`](Self::is_success) before trusting either.
#[derive(Debug, Clone, PartialEq)]
pub struct Response<T> {
    /// HTTP status code.
    pub status: u16,
    /// Legacy `Ack` value, if the family reports one.
    pub ack: Option<Ack>,
    /// Decoded payload, if any.
    pub payload: Option<T>,
    /// Error and warning entries in the order the API reported them.
    pub errors: Vec<ErrorEntry>,
    /// Binary attachment carried by the response.
    pub attachment: Option<Attachment>,
}

impl<T> Response<T> {
    /// Returns `true` if at least one entry has severity `Error`.
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(ErrorEntry::is_error)
    }

    /// Returns `true` if the call fully succeeded.
    ///
    /// A response succeeded when its status is 2xx, its `Ack` (if any) is
    /// not `Failure`, and it carries no severity `Error` entries. Warnings
    /// do not affect the outcome.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
            && self.ack != Some(Ack::Failure)
            && !self.has_errors()
    }

    /// Iterates over the entries with severity `Error`.
    ///
    /// The [`errors`](Self::errors) field holds warnings too; use
    /// [`warnings`](Self::warnings) for the rest.
    pub fn blocking_errors(&self) -> impl Iterator<Item = &ErrorEntry> {
        self.errors.iter().filter(|e| e.severity == Severity::Error)
    }

    /// Iterates over the informational entries.
    pub fn warnings(&self) -> impl Iterator<Item = &ErrorEntry> {
        self.errors.iter().filter(|e| e.severity == Severity::Warning)
    }

    /// Borrows the payload, if present.
    pub fn payload(&self) -> Option<&T> {
        self.payload.as_ref()
    }

    /// Converts into the payload, turning a failed response into
    /// [`SdkError::Rejected`].
    ///
    /// Useful for workflows that cannot continue without the payload (such
    /// as reading a job id before polling it).
    pub fn into_payload(self, operation: &str) -> SdkResult<T> {
        if !self.is_success() {
            return Err(SdkError::Rejected {
                operation: operation.to_string(),
                errors: self.errors,
            });
        }
        self.payload
            .ok_or_else(|| SdkError::Protocol(format!("{} returned no payload", operation)))
    }

    /// Maps the payload while keeping status and entries.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Response<U> {
        Response {
            status: self.status,
            ack: self.ack,
            payload: self.payload.map(f),
            errors: self.errors,
            attachment: self.attachment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, ack: Option<Ack>, errors: Vec<ErrorEntry>) -> Response<u32> {
        Response {
            status,
            ack,
            payload: Some(7),
            errors,
            attachment: None,
        }
    }

    #[test]
    fn test_error_and_warning_mix_is_failure() {
        let r = response(
            200,
            Some(Ack::Warning),
            vec![
                ErrorEntry::new(Severity::Error, "bad category"),
                ErrorEntry::new(Severity::Warning, "slow down"),
            ],
        );

        assert!(r.has_errors());
        assert!(!r.is_success());
        assert_eq!(r.errors[0].severity, Severity::Error);
        assert_eq!(r.errors[1].severity, Severity::Warning);
        assert_eq!(r.blocking_errors().count(), 1);
        assert_eq!(r.warnings().count(), 1);
    }

    #[test]
    fn test_blocking_errors_and_warnings_partition_entries() {
        let r = response(
            200,
            Some(Ack::Warning),
            vec![
                ErrorEntry::new(Severity::Warning, "first"),
                ErrorEntry::new(Severity::Error, "second"),
                ErrorEntry::new(Severity::Warning, "third"),
            ],
        );

        assert_eq!(
            r.blocking_errors().count() + r.warnings().count(),
            r.errors.len()
        );
        let messages: Vec<_> = r.blocking_errors().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["second"]);
    }

    #[test]
    fn test_warning_only_is_success() {
        let r = response(200, Some(Ack::Warning), vec![ErrorEntry::new(Severity::Warning, "w")]);
        assert!(r.is_success());
    }

    #[test]
    fn test_failure_ack_without_entries_is_failure() {
        let r = response(200, Some(Ack::Failure), Vec::new());
        assert!(!r.is_success());
    }

    #[test]
    fn test_non_2xx_is_failure() {
        assert!(!response(404, None, Vec::new()).is_success());
    }

    #[test]
    fn test_into_payload_rejects_failures() {
        let r = response(200, Some(Ack::Failure), vec![ErrorEntry::new(Severity::Error, "nope")]);
        match r.into_payload("getJobStatus") {
            Err(SdkError::Rejected { operation, errors }) => {
                assert_eq!(operation, "getJobStatus");
                assert_eq!(errors.len(), 1);
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_severity_parse() {
        assert_eq!(Severity::parse("Warning"), Severity::Warning);
        assert_eq!(Severity::parse(" warning "), Severity::Warning);
        assert_eq!(Severity::parse("Error"), Severity::Error);
        assert_eq!(Severity::parse("Fatal"), Severity::Error);
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(SdkError::AuthRequired.category(), ErrorCategory::Auth);
        assert_eq!(
            SdkError::Timeout(Duration::from_secs(1)).category(),
            ErrorCategory::Network
        );
        assert_eq!(
            SdkError::Validation("x".into()).category(),
            ErrorCategory::Validation
        );
    }
}
