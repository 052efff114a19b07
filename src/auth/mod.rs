//
//  ebay-sdk
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! This module provides credential management for every API family: the
//! credential variants an application can configure, the provider that
//! turns them into request headers, the OAuth 2.0 token client, and
//! secure token storage.
//!
//! ## Supported Credentials
//!
//! - **App credentials**: app id and cert id. XML families accept the app
//!   id alone; REST families receive an application token minted with the
//!   client-credentials grant.
//! - **User token**: a legacy Auth'n'Auth token, embedded in the XML body
//!   or sent as a SOA security header.
//! - **OAuth token**: a user access token with optional refresh token and
//!   expiry, refreshed on demand.
//!
//! ## Module Structure
//!
//! - [`provider`]: [`CredentialProvider`] with single-flight refresh
//! - [`oauth`]: [`OAuthClient`] for the token endpoint and consent URL
//! - [`keyring`]: [`TokenStore`] implementations for persisting tokens
//!
//! ## Example
//!
//! ```rust,no_run
//! use ebay_sdk::auth::{CredentialProvider, Credentials, OAuthToken};
//!
//! let provider = CredentialProvider::new(Credentials::OAuth(OAuthToken::new("v^1.1#i^1...")));
//! ```

mod keyring;
mod oauth;
mod provider;

pub use keyring::*;
pub use oauth::*;
pub use provider::*;

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::config::Protocol;

/// Application keys issued by the developer program.
///
/// # Fields
///
/// * `app_id` - Client id (`X-EBAY-API-APP-NAME`, `X-EBAY-SOA-SECURITY-APPNAME`)
/// * `cert_id` - Client secret
/// * `dev_id` - Developer id, required by the Trading API only
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppCredentials {
    pub app_id: String,
    pub cert_id: String,
    #[serde(default)]
    pub dev_id: Option<String>,
}

impl AppCredentials {
    pub fn new(app_id: impl Into<String>, cert_id: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            cert_id: cert_id.into(),
            dev_id: None,
        }
    }

    pub fn with_dev_id(mut self, dev_id: impl Into<String>) -> Self {
        self.dev_id = Some(dev_id.into());
        self
    }
}

impl fmt::Debug for AppCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppCredentials")
            .field("app_id", &self.app_id)
            .field("cert_id", &"<redacted>")
            .field("dev_id", &self.dev_id)
            .finish()
    }
}

/// An OAuth access token with optional refresh token and expiry.
///
/// Tokens without an expiry are treated as never expiring.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthToken {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
}

impl OAuthToken {
    /// Creates a token with no refresh token and no expiry.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            expires_at: None,
        }
    }

    pub fn with_refresh_token(mut self, refresh_token: impl Into<String>) -> Self {
        self.refresh_token = Some(refresh_token.into());
        self
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// Returns `true` if the token expires within `skew` from now.
    ///
    /// # Example
    ///
    /// ```rust
    /// use chrono::{Duration, Utc};
    /// use ebay_sdk::auth::OAuthToken;
    ///
    /// let token = OAuthToken::new("t").with_expiry(Utc::now() + Duration::seconds(30));
    ///
    /// assert!(!token.is_expired(Duration::zero()));
    /// assert!(token.is_expired(Duration::seconds(60)));
    /// ```
    pub fn is_expired(&self, skew: Duration) -> bool {
        match self.expires_at {
            Some(exp) => exp <= Utc::now() + skew,
            None => false,
        }
    }

    /// Returns `true` if a refresh token is available.
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.is_some()
    }
}

impl fmt::Debug for OAuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuthToken")
            .field("access_token", &"<redacted>")
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// The credential configured for a service client.
///
/// Exactly one variant is active per client; the type makes mixing them
/// impossible.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Application keys only.
    App(AppCredentials),
    /// Legacy Auth'n'Auth user token.
    UserToken(String),
    /// OAuth user token, refreshable.
    OAuth(OAuthToken),
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::App(app) => f.debug_tuple("App").field(app).finish(),
            Self::UserToken(_) => f.debug_tuple("UserToken").field(&"<redacted>").finish(),
            Self::OAuth(token) => f.debug_tuple("OAuth").field(token).finish(),
        }
    }
}

/// How a request authenticates.
#[derive(Clone, PartialEq, Eq)]
pub enum AuthScheme {
    /// OAuth access token (user or application).
    Bearer(String),
    /// Legacy Auth'n'Auth token.
    LegacyToken(String),
    /// No token; the app id header is the only identification.
    AppOnly,
}

impl fmt::Debug for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bearer(_) => write!(f, "Bearer(<redacted>)"),
            Self::LegacyToken(_) => write!(f, "LegacyToken(<redacted>)"),
            Self::AppOnly => write!(f, "AppOnly"),
        }
    }
}

/// Resolved authentication for one request.
///
/// Codecs turn this into the family's header and envelope shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    pub scheme: AuthScheme,
    /// App identity, sent by the XML families alongside any token.
    pub app: Option<AppCredentials>,
}

impl AuthHeaders {
    /// Returns the bearer token, if the scheme is `Bearer`.
    pub fn bearer(&self) -> Option<&str> {
        match &self.scheme {
            AuthScheme::Bearer(token) => Some(token),
            _ => None,
        }
    }

    /// Returns the legacy token, if the scheme is `LegacyToken`.
    pub fn legacy_token(&self) -> Option<&str> {
        match &self.scheme {
            AuthScheme::LegacyToken(token) => Some(token),
            _ => None,
        }
    }

    pub fn app_id(&self) -> Option<&str> {
        self.app.as_ref().map(|a| a.app_id.as_str())
    }
}

/// What the provider needs to know about the request being authenticated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub protocol: Protocol,
}

impl AuthContext {
    pub fn new(protocol: Protocol) -> Self {
        Self { protocol }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_without_expiry_never_expires() {
        let token = OAuthToken::new("t");
        assert!(!token.is_expired(Duration::days(365)));
        assert!(!token.can_refresh());
    }

    #[test]
    fn test_expired_token() {
        let token = OAuthToken::new("t")
            .with_refresh_token("r")
            .with_expiry(Utc::now() - Duration::seconds(1));
        assert!(token.is_expired(Duration::zero()));
        assert!(token.can_refresh());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let creds = Credentials::OAuth(OAuthToken::new("secret-access").with_refresh_token("secret-refresh"));
        let rendered = format!("{:?}", creds);
        assert!(!rendered.contains("secret-access"));
        assert!(!rendered.contains("secret-refresh"));

        let app = AppCredentials::new("MyApp", "secret-cert");
        assert!(!format!("{:?}", app).contains("secret-cert"));

        let headers = AuthHeaders {
            scheme: AuthScheme::LegacyToken("AgAAAA".into()),
            app: None,
        };
        assert!(!format!("{:?}", headers).contains("AgAAAA"));
    }

    #[test]
    fn test_auth_headers_accessors() {
        let headers = AuthHeaders {
            scheme: AuthScheme::Bearer("b".into()),
            app: Some(AppCredentials::new("MyApp", "c")),
        };
        assert_eq!(headers.bearer(), Some("b"));
        assert_eq!(headers.legacy_token(), None);
        assert_eq!(headers.app_id(), Some("MyApp"));
    }
}
