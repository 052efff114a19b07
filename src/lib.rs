//
//  ebay-sdk
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # eBay SDK
//!
//! A typed client engine for eBay's XML and REST web-service APIs.
//!
//! ## Overview
//!
//! Every API family, whether it speaks the legacy XML dialects or modern
//! REST/JSON, goes through one dispatcher: a typed request is validated,
//! authenticated, encoded for its family, sent, and decoded into a typed
//! [`Response`](api::Response) carrying the API's error and warning
//! entries in order.
//!
//! ## Features
//!
//! - **Multi-Protocol**: API-call XML (Trading, Shopping), SOA XML (Finding,
//!   Business Policies, Bulk Data Exchange, File Transfer) and REST/JSON
//!   (Browse, Inventory)
//! - **Pluggable Authentication**: app keys, legacy Auth'n'Auth tokens and
//!   OAuth user tokens with single-flight refresh
//! - **Pagination**: page-numbered and offset APIs behind one driver,
//!   sequential or concurrent
//! - **Bounded Batches**: keyed concurrent calls with a parallelism ceiling
//! - **Bulk Jobs**: file upload and download with XOP attachments, and a
//!   job status poller
//!
//! ## Module Structure
//!
//! - [`api`]: Dispatcher, codecs, transport, drivers and family operations
//! - [`auth`]: Credentials, OAuth client and token storage
//! - [`config`]: Endpoints, environments and the configuration file
//! - [`logging`]: Opt-in `tracing` subscriber
//! - [`util`]: Small shared helpers
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ebay_sdk::api::legacy::finding::{FindItemsByKeywordsRequest, FindingService};
//! use ebay_sdk::api::ServiceClient;
//! use ebay_sdk::auth::CredentialProvider;
//! use ebay_sdk::config::{ApiFamily, Config, Environment};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let credentials = config
//!     .credentials(Environment::Production)
//!     .map(CredentialProvider::new)
//!     .unwrap_or_else(CredentialProvider::anonymous);
//!
//! let client = ServiceClient::builder(config.endpoint(ApiFamily::Finding, Environment::Production))
//!     .credentials(Arc::new(credentials))
//!     .build()?;
//!
//! let response = FindingService::new(client)
//!     .find_items_by_keywords(&FindItemsByKeywordsRequest::new("Harry Potter"))
//!     .await?;
//! for error in response.blocking_errors() {
//!     eprintln!("{}", error);
//! }
//! # Ok(())
//! # }
//! ```

/// Client engine and API families.
///
/// Holds the dispatcher, the per-protocol codecs, the transport seam, the
/// pagination, batch and job drivers, and typed operations for each family.
pub mod api;

/// Authentication and credential management.
///
/// Handles:
/// - App keys, legacy user tokens and OAuth user tokens
/// - Application tokens via the client-credentials grant
/// - Token refresh and secure storage via the system keychain
pub mod auth;

/// Configuration file and endpoint management.
///
/// Stored in platform-specific locations:
/// - Linux: `~/.config/ebay-sdk/config.toml`
/// - macOS: `~/Library/Application Support/ebay-sdk/config.toml`
/// - Windows: `%APPDATA%\ebay-sdk\config\config.toml`
pub mod config;

/// Opt-in log output.
pub mod logging;

/// Utility functions and helpers.
pub mod util;

/// Re-export of the configuration struct.
pub use config::Config;

/// Library name, used for the keychain service and configuration paths.
pub const APP_NAME: &str = "ebay-sdk";

/// Library version, derived from Cargo.toml at compile time.
///
/// # Example
///
/// ```rust
/// use ebay_sdk::VERSION;
///
/// println!("ebay-sdk {}", VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
