//
//  ebay-sdk
//  config/endpoints.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Endpoint Configuration Module
//!
//! This module knows where each API family lives and which wire protocol it
//! speaks. An [`EndpointConfig`] is built once per service client and is
//! immutable afterwards.
//!
//! ## Known Families
//!
//! | Family | Protocol | Production base URL |
//! |--------|----------|---------------------|
//! | Trading | XML (API call) | `https://api.ebay.com/ws/api.dll` |
//! | Shopping | XML (API call) | `https://open.api.ebay.com/shopping` |
//! | Finding | XML (SOA) | `https://svcs.ebay.com/services/search/FindingService/v1` |
//! | Business Policies | XML (SOA) | `https://svcs.ebay.com/services/selling/v1/SellerProfilesManagementService` |
//! | Bulk Data Exchange | XML (SOA) | `https://webservices.ebay.com/BulkDataExchangeService` |
//! | File Transfer | XML (SOA) | `https://storage.ebay.com/FileTransferService` |
//! | Browse | REST | `https://api.ebay.com/buy/browse/v1` |
//! | Inventory | REST | `https://api.ebay.com/sell/inventory/v1` |
//! | OAuth | Form/JSON | `https://api.ebay.com/identity/v1/oauth2/token` |
//!
//! Sandbox URLs follow the same shape under the `sandbox` host names.
//!
//! ## Usage
//!
//! ```rust
//! use ebay_sdk::config::{ApiFamily, EndpointConfig, Environment};
//!
//! let endpoint = EndpointConfig::new(ApiFamily::Finding, Environment::Sandbox)
//!     .with_global_id("EBAY-GB");
//!
//! assert_eq!(
//!     endpoint.base_url.as_str(),
//!     "https://svcs.sandbox.ebay.com/services/search/FindingService/v1"
//! );
//! assert_eq!(endpoint.global_id, "EBAY-GB");
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::api::common::{SdkError, SdkResult};

/// Production or sandbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Sandbox,
}

impl Environment {
    pub const ALL: [Environment; 2] = [Self::Production, Self::Sandbox];

    /// Returns `true` for the sandbox environment.
    pub fn is_sandbox(self) -> bool {
        matches!(self, Self::Sandbox)
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Production => write!(f, "production"),
            Self::Sandbox => write!(f, "sandbox"),
        }
    }
}

impl FromStr for Environment {
    type Err = SdkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "sandbox" => Ok(Self::Sandbox),
            other => Err(SdkError::Validation(format!(
                "Unknown environment '{}'",
                other
            ))),
        }
    }
}

/// Wire protocol spoken by an API family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Protocol {
    /// XML body with `X-EBAY-API-*` headers; errors in `Errors`.
    XmlApiCall,
    /// XML body with `X-EBAY-SOA-*` headers; errors in `errorMessage.error`.
    XmlSoa,
    /// JSON over REST; outcome signalled by the HTTP status.
    Rest,
}

impl Protocol {
    /// Returns `true` for both XML dialects.
    pub fn is_xml(self) -> bool {
        !matches!(self, Self::Rest)
    }
}

/// A group of operations sharing one wire protocol and base endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiFamily {
    Trading,
    Shopping,
    Finding,
    BusinessPolicies,
    BulkDataExchange,
    FileTransfer,
    Browse,
    Inventory,
    OAuth,
}

impl ApiFamily {
    /// Every known family.
    pub const ALL: [ApiFamily; 9] = [
        Self::Trading,
        Self::Shopping,
        Self::Finding,
        Self::BusinessPolicies,
        Self::BulkDataExchange,
        Self::FileTransfer,
        Self::Browse,
        Self::Inventory,
        Self::OAuth,
    ];

    /// The wire protocol of this family.
    pub fn protocol(self) -> Protocol {
        match self {
            Self::Trading | Self::Shopping => Protocol::XmlApiCall,
            Self::Finding | Self::BusinessPolicies | Self::BulkDataExchange | Self::FileTransfer => {
                Protocol::XmlSoa
            }
            Self::Browse | Self::Inventory | Self::OAuth => Protocol::Rest,
        }
    }

    /// The base URL of this family in `env`.
    pub fn base_url(self, env: Environment) -> &'static str {
        use Environment::{Production as P, Sandbox as S};

        match (self, env) {
            (Self::Trading, P) => "https://api.ebay.com/ws/api.dll",
            (Self::Trading, S) => "https://api.sandbox.ebay.com/ws/api.dll",
            (Self::Shopping, P) => "https://open.api.ebay.com/shopping",
            (Self::Shopping, S) => "https://open.api.sandbox.ebay.com/shopping",
            (Self::Finding, P) => "https://svcs.ebay.com/services/search/FindingService/v1",
            (Self::Finding, S) => "https://svcs.sandbox.ebay.com/services/search/FindingService/v1",
            (Self::BusinessPolicies, P) => {
                "https://svcs.ebay.com/services/selling/v1/SellerProfilesManagementService"
            }
            (Self::BusinessPolicies, S) => {
                "https://svcs.sandbox.ebay.com/services/selling/v1/SellerProfilesManagementService"
            }
            (Self::BulkDataExchange, P) => "https://webservices.ebay.com/BulkDataExchangeService",
            (Self::BulkDataExchange, S) => {
                "https://webservices.sandbox.ebay.com/BulkDataExchangeService"
            }
            (Self::FileTransfer, P) => "https://storage.ebay.com/FileTransferService",
            (Self::FileTransfer, S) => "https://storage.sandbox.ebay.com/FileTransferService",
            (Self::Browse, P) => "https://api.ebay.com/buy/browse/v1",
            (Self::Browse, S) => "https://api.sandbox.ebay.com/buy/browse/v1",
            (Self::Inventory, P) => "https://api.ebay.com/sell/inventory/v1",
            (Self::Inventory, S) => "https://api.sandbox.ebay.com/sell/inventory/v1",
            (Self::OAuth, P) => "https://api.ebay.com/identity/v1/oauth2/token",
            (Self::OAuth, S) => "https://api.sandbox.ebay.com/identity/v1/oauth2/token",
        }
    }

    /// Default API version sent with every request of this family.
    ///
    /// REST families carry their version in the path, so the value is
    /// informational only.
    pub fn default_version(self) -> &'static str {
        match self {
            Self::Trading => "1349",
            Self::Shopping => "1199",
            Self::Finding => "1.13.0",
            Self::BusinessPolicies => "1.0.0",
            Self::BulkDataExchange => "1.5.0",
            Self::FileTransfer => "1.1.0",
            Self::Browse | Self::Inventory | Self::OAuth => "v1",
        }
    }

    /// XML namespace of request and response documents.
    pub fn namespace(self) -> Option<&'static str> {
        match self {
            Self::Trading | Self::Shopping => Some("urn:ebay:apis:eBLBaseComponents"),
            Self::Finding => Some("http://www.ebay.com/marketplace/search/v1/services"),
            Self::BusinessPolicies => Some("http://www.ebay.com/marketplace/selling/v1/services"),
            Self::BulkDataExchange | Self::FileTransfer => {
                Some("http://www.ebay.com/marketplace/services")
            }
            Self::Browse | Self::Inventory | Self::OAuth => None,
        }
    }

    /// SOA service name sent in `X-EBAY-SOA-SERVICE-NAME`.
    pub fn service_name(self) -> Option<&'static str> {
        match self {
            Self::Finding => Some("FindingService"),
            Self::BusinessPolicies => Some("SellerProfilesManagementService"),
            Self::BulkDataExchange => Some("BulkDataExchangeService"),
            Self::FileTransfer => Some("FileTransferService"),
            _ => None,
        }
    }
}

impl fmt::Display for ApiFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Trading => "Trading",
            Self::Shopping => "Shopping",
            Self::Finding => "Finding",
            Self::BusinessPolicies => "BusinessPolicies",
            Self::BulkDataExchange => "BulkDataExchange",
            Self::FileTransfer => "FileTransfer",
            Self::Browse => "Browse",
            Self::Inventory => "Inventory",
            Self::OAuth => "OAuth",
        };
        f.write_str(name)
    }
}

/// Returns the OAuth consent page for `env`.
pub fn consent_base_url(env: Environment) -> &'static str {
    match env {
        Environment::Production => "https://auth.ebay.com/oauth2/authorize",
        Environment::Sandbox => "https://auth.sandbox.ebay.com/oauth2/authorize",
    }
}

/// Where and how one API family is called.
///
/// # Fields
///
/// | Field | Used by | Default |
/// |-------|---------|---------|
/// | `base_url` | All | [`ApiFamily::base_url`] |
/// | `api_version` | XML families | [`ApiFamily::default_version`] |
/// | `site_id` | Trading, Shopping | `0` (US) |
/// | `global_id` | SOA families | `EBAY-US` |
/// | `marketplace_id` | REST families | `EBAY_US` |
/// | `locale` | REST families | none |
///
/// # Example
///
/// ```rust
/// use ebay_sdk::config::{ApiFamily, EndpointConfig, Environment};
///
/// let trading = EndpointConfig::new(ApiFamily::Trading, Environment::Production)
///     .with_site_id(3)
///     .with_api_version("967");
///
/// assert_eq!(trading.site_id, 3);
/// assert_eq!(trading.api_version, "967");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointConfig {
    pub family: ApiFamily,
    pub environment: Environment,
    pub base_url: Url,
    pub api_version: String,
    pub site_id: u32,
    pub global_id: String,
    pub marketplace_id: String,
    pub locale: Option<String>,
}

impl EndpointConfig {
    /// Creates the configuration for a known family and environment.
    pub fn new(family: ApiFamily, environment: Environment) -> Self {
        Self {
            family,
            environment,
            base_url: BASE_URLS[&(family, environment)].clone(),
            api_version: family.default_version().to_string(),
            site_id: 0,
            global_id: "EBAY-US".to_string(),
            marketplace_id: "EBAY_US".to_string(),
            locale: None,
        }
    }

    /// Points the family at another base URL (used for local test servers).
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Validation`] if `url` cannot be parsed.
    pub fn with_base_url(mut self, url: &str) -> SdkResult<Self> {
        self.base_url = Url::parse(url)
            .map_err(|e| SdkError::Validation(format!("Invalid base URL '{}': {}", url, e)))?;
        Ok(self)
    }

    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    pub fn with_site_id(mut self, site_id: u32) -> Self {
        self.site_id = site_id;
        self
    }

    pub fn with_global_id(mut self, global_id: impl Into<String>) -> Self {
        self.global_id = global_id.into();
        self
    }

    pub fn with_marketplace_id(mut self, marketplace_id: impl Into<String>) -> Self {
        self.marketplace_id = marketplace_id.into();
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    /// Shorthand for `self.family.protocol()`.
    pub fn protocol(&self) -> Protocol {
        self.family.protocol()
    }
}

/// Parsed [`ApiFamily::base_url`] table, one entry per family and environment.
static BASE_URLS: LazyLock<HashMap<(ApiFamily, Environment), Url>> = LazyLock::new(|| {
    let mut urls = HashMap::new();
    for family in ApiFamily::ALL {
        for env in Environment::ALL {
            let url = Url::parse(family.base_url(env)).expect("built-in base URL");
            urls.insert((family, env), url);
        }
    }
    urls
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_base_urls_parse_and_use_https() {
        for family in ApiFamily::ALL {
            for env in Environment::ALL {
                let url = Url::parse(family.base_url(env)).unwrap();
                assert_eq!(url.scheme(), "https", "{} {}", family, env);
                assert_eq!(
                    url.host_str().unwrap().contains("sandbox"),
                    env.is_sandbox(),
                    "{} {}",
                    family,
                    env
                );
            }
        }
    }

    #[test]
    fn test_every_endpoint_resolves_its_base_url() {
        assert_eq!(BASE_URLS.len(), ApiFamily::ALL.len() * Environment::ALL.len());
        for family in ApiFamily::ALL {
            for env in Environment::ALL {
                let endpoint = EndpointConfig::new(family, env);
                assert_eq!(endpoint.base_url.as_str(), family.base_url(env), "{} {}", family, env);
            }
        }
    }

    #[test]
    fn test_protocols() {
        assert_eq!(ApiFamily::Trading.protocol(), Protocol::XmlApiCall);
        assert_eq!(ApiFamily::Finding.protocol(), Protocol::XmlSoa);
        assert_eq!(ApiFamily::Browse.protocol(), Protocol::Rest);
        assert!(Protocol::XmlSoa.is_xml());
        assert!(!Protocol::Rest.is_xml());
    }

    #[test]
    fn test_soa_families_have_service_names() {
        for family in ApiFamily::ALL {
            assert_eq!(
                family.service_name().is_some(),
                family.protocol() == Protocol::XmlSoa,
                "{}",
                family
            );
        }
    }

    #[test]
    fn test_with_base_url() {
        let endpoint = EndpointConfig::new(ApiFamily::Browse, Environment::Production)
            .with_base_url("http://127.0.0.1:1234/buy/browse/v1")
            .unwrap();
        assert_eq!(endpoint.base_url.port(), Some(1234));

        let err = EndpointConfig::new(ApiFamily::Browse, Environment::Production)
            .with_base_url("not a url")
            .unwrap_err();
        assert!(matches!(err, SdkError::Validation(_)));
    }

    #[test]
    fn test_environment_from_str() {
        assert_eq!("sandbox".parse::<Environment>().unwrap(), Environment::Sandbox);
        assert_eq!("PROD".parse::<Environment>().unwrap(), Environment::Production);
        assert!("staging".parse::<Environment>().is_err());
    }
}
