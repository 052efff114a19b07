//
//  ebay-sdk
//  auth/oauth.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # OAuth 2.0 Token Client
//!
//! This module talks to the identity service's token endpoint and builds
//! the user consent URL.
//!
//! ## Grants
//!
//! 1. **Client credentials**: [`OAuthClient::app_token`] mints an
//!    application token for public REST data (Browse).
//! 2. **Authorization code**: send the user to
//!    [`OAuthClient::consent_url`]; the RuName redirect delivers a `code`,
//!    which [`OAuthClient::user_token`] exchanges for an access token and
//!    a refresh token.
//! 3. **Refresh token**: [`OAuthClient::refresh_user_token`] obtains a new
//!    access token for an existing grant.
//!
//! Every grant is a form POST authenticated with HTTP Basic
//! (`app_id:cert_id`). A non-2xx answer is returned as a
//! [`TokenResponse`] carrying `error` and `error_description`; only a body
//! that is not token JSON at all is a failure.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ebay_sdk::api::HttpTransport;
//! use ebay_sdk::auth::{AppCredentials, OAuthClient, OAuthConfig};
//! use ebay_sdk::config::Environment;
//!
//! # async fn example() -> Result<(), ebay_sdk::api::SdkError> {
//! let config = OAuthConfig::new(AppCredentials::new("MyApp-SBX", "SBX-cert"), Environment::Sandbox);
//! let client = OAuthClient::new(config, Arc::new(HttpTransport::new()?));
//!
//! let response = client.app_token(&[]).await?;
//! if let Some(error) = &response.error {
//!     eprintln!("{}: {}", error, response.error_description.as_deref().unwrap_or(""));
//! } else {
//!     println!("Token valid for {}s", response.expires_in.unwrap_or(0));
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{Duration, Utc};
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{AppCredentials, OAuthToken, TokenSource};
use crate::api::common::{SdkError, SdkResult};
use crate::api::transport::Transport;
use crate::api::wire::{HttpMethod, WireBody, WireRequest};
use crate::config::{consent_base_url, ApiFamily, Environment};

/// Scope granting access to public data.
pub const DEFAULT_SCOPE: &str = "https://api.ebay.com/oauth/api_scope";

/// Application settings for the OAuth grants.
///
/// # Fields
///
/// * `app` - App id (client id) and cert id (client secret)
/// * `ru_name` - Redirect URL name, required for the authorization-code grant
/// * `scopes` - Scopes requested when a call passes none
/// * `environment` - Selects the production or sandbox identity service
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub app: AppCredentials,
    pub ru_name: Option<String>,
    pub scopes: Vec<String>,
    pub environment: Environment,
}

impl OAuthConfig {
    pub fn new(app: AppCredentials, environment: Environment) -> Self {
        Self {
            app,
            ru_name: None,
            scopes: vec![DEFAULT_SCOPE.to_string()],
            environment,
        }
    }

    pub fn with_ru_name(mut self, ru_name: impl Into<String>) -> Self {
        self.ru_name = Some(ru_name.into());
        self
    }

    pub fn with_scopes<I, S>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.scopes = scopes.into_iter().map(Into::into).collect();
        self
    }
}

/// The token endpoint's answer to any grant.
///
/// Successful grants fill `access_token`, `token_type` and `expires_in`
/// (plus the refresh fields for the authorization-code grant). Rejected
/// grants fill `error` and `error_description`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub struct TokenResponse {
    /// HTTP status of the token endpoint response.
    #[serde(skip)]
    pub status_code: u16,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub refresh_token_expires_in: Option<i64>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
}

impl TokenResponse {
    /// Returns `true` for a 2xx answer carrying an access token.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code) && self.error.is_none() && self.access_token.is_some()
    }

    /// Converts a successful grant into an [`OAuthToken`].
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Auth`] with the endpoint's error description
    /// when the grant was rejected.
    pub fn into_token(self) -> SdkResult<OAuthToken> {
        if !self.is_success() {
            let reason = match (&self.error, &self.error_description) {
                (Some(e), Some(d)) => format!("{}: {}", e, d),
                (Some(e), None) => e.clone(),
                _ => format!("token endpoint returned HTTP {}", self.status_code),
            };
            return Err(SdkError::Auth(reason));
        }

        let expires_at = self
            .expires_in
            .map(|secs| Utc::now() + Duration::seconds(secs));

        Ok(OAuthToken {
            access_token: self.access_token.unwrap_or_default(),
            refresh_token: self.refresh_token,
            expires_at,
        })
    }
}

/// Client for the OAuth token endpoint.
pub struct OAuthClient {
    config: OAuthConfig,
    token_url: Url,
    transport: Arc<dyn Transport>,
}

impl OAuthClient {
    /// Creates a client for the environment named in `config`.
    pub fn new(config: OAuthConfig, transport: Arc<dyn Transport>) -> Self {
        let env = config.environment;
        let endpoint = crate::config::EndpointConfig::new(ApiFamily::OAuth, env);

        Self {
            config,
            token_url: endpoint.base_url,
            transport,
        }
    }

    /// Points the client at another token endpoint (used for local test servers).
    pub fn with_token_url(mut self, url: &str) -> SdkResult<Self> {
        self.token_url = Url::parse(url)
            .map_err(|e| SdkError::Validation(format!("Invalid token URL '{}': {}", url, e)))?;
        Ok(self)
    }

    pub fn config(&self) -> &OAuthConfig {
        &self.config
    }

    /// Mints an application token (client-credentials grant).
    ///
    /// # Parameters
    ///
    /// * `scopes` - Scopes to request; empty means the configured scopes
    pub async fn app_token(&self, scopes: &[&str]) -> SdkResult<TokenResponse> {
        let scope = self.scope_param(scopes);
        self.grant(&[("grant_type", "client_credentials"), ("scope", &scope)])
            .await
    }

    /// Builds the URL that asks the user to grant access.
    ///
    /// # Parameters
    ///
    /// * `state` - Opaque value echoed back on the redirect
    /// * `scopes` - Scopes to request; empty means the configured scopes
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Validation`] if no RuName is configured.
    pub fn consent_url(&self, state: Option<&str>, scopes: &[&str]) -> SdkResult<Url> {
        let ru_name = self.ru_name()?;
        let base = consent_base_url(self.config.environment);
        let mut url = Url::parse(base)
            .map_err(|e| SdkError::Validation(format!("Invalid consent URL '{}': {}", base, e)))?;
        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("client_id", &self.config.app.app_id)
                .append_pair("redirect_uri", ru_name)
                .append_pair("response_type", "code")
                .append_pair("scope", &self.scope_param(scopes));
            if let Some(state) = state {
                query.append_pair("state", state);
            }
        }
        Ok(url)
    }

    /// Exchanges an authorization code for a user token.
    pub async fn user_token(&self, code: &str) -> SdkResult<TokenResponse> {
        let ru_name = self.ru_name()?.to_string();
        self.grant(&[
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", &ru_name),
        ])
        .await
    }

    /// Exchanges a refresh token for a new user access token.
    pub async fn refresh_user_token(
        &self,
        refresh_token: &str,
        scopes: &[&str],
    ) -> SdkResult<TokenResponse> {
        let scope = self.scope_param(scopes);
        self.grant(&[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("scope", &scope),
        ])
        .await
    }

    fn ru_name(&self) -> SdkResult<&str> {
        self.config
            .ru_name
            .as_deref()
            .ok_or_else(|| SdkError::Validation("A RuName is required for user consent".to_string()))
    }

    fn scope_param(&self, scopes: &[&str]) -> String {
        if scopes.is_empty() {
            self.config.scopes.join(" ")
        } else {
            scopes.join(" ")
        }
    }

    async fn grant(&self, params: &[(&str, &str)]) -> SdkResult<TokenResponse> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(params.iter())
            .finish();

        let basic = STANDARD.encode(format!(
            "{}:{}",
            self.config.app.app_id, self.config.app.cert_id
        ));

        let request = WireRequest::new(HttpMethod::Post, self.token_url.clone())
            .header_pair("Authorization", format!("Basic {}", basic))
            .header_pair("Accept", "application/json")
            .with_body(WireBody::new("application/x-www-form-urlencoded", body));

        let grant_type = params
            .iter()
            .find(|(k, _)| *k == "grant_type")
            .map(|(_, v)| *v)
            .unwrap_or("unknown");
        debug!(grant_type, "Requesting OAuth token");

        let response = self.transport.send(request).await?;

        let mut token: TokenResponse = serde_json::from_slice(&response.body).map_err(|e| {
            SdkError::Protocol(format!(
                "Token endpoint returned HTTP {} with an unreadable body: {}",
                response.status, e
            ))
        })?;
        token.status_code = response.status;

        debug!(status = token.status_code, success = token.is_success(), "Token endpoint answered");
        Ok(token)
    }
}

#[async_trait]
impl TokenSource for OAuthClient {
    async fn refresh_user_token(&self, refresh_token: &str) -> SdkResult<OAuthToken> {
        OAuthClient::refresh_user_token(self, refresh_token, &[])
            .await?
            .into_token()
    }

    async fn mint_app_token(&self) -> SdkResult<OAuthToken> {
        self.app_token(&[]).await?.into_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::{HttpTransport, TransportConfig};
    use mockito::Matcher;

    fn app() -> AppCredentials {
        AppCredentials::new("MyApp-SBX", "SBX-cert")
    }

    fn client(server: &mockito::ServerGuard, config: OAuthConfig) -> OAuthClient {
        let transport = HttpTransport::with_config(TransportConfig {
            allow_insecure: true,
            ..TransportConfig::default()
        })
        .unwrap();
        OAuthClient::new(config, Arc::new(transport))
            .with_token_url(&format!("{}/identity/v1/oauth2/token", server.url()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_app_token_uses_basic_auth_and_client_credentials() {
        let mut server = mockito::Server::new_async().await;
        let expected_auth = format!("Basic {}", STANDARD.encode("MyApp-SBX:SBX-cert"));
        let mock = server
            .mock("POST", "/identity/v1/oauth2/token")
            .match_header("authorization", expected_auth.as_str())
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "client_credentials".into()),
                Matcher::UrlEncoded("scope".into(), DEFAULT_SCOPE.into()),
            ]))
            .with_status(200)
            .with_body(r#"{"access_token":"v^1.1#app","token_type":"Application Access Token","expires_in":7200}"#)
            .create_async()
            .await;

        let client = client(&server, OAuthConfig::new(app(), Environment::Sandbox));
        let response = client.app_token(&[]).await.unwrap();

        mock.assert_async().await;
        assert!(response.is_success());
        assert_eq!(response.status_code, 200);
        assert_eq!(response.expires_in, Some(7200));

        let token = response.into_token().unwrap();
        assert_eq!(token.access_token, "v^1.1#app");
        assert!(token.expires_at.is_some());
    }

    #[tokio::test]
    async fn test_rejected_grant_is_a_value() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/identity/v1/oauth2/token")
            .with_status(400)
            .with_body(r#"{"error":"invalid_grant","error_description":"the provided authorization grant is invalid"}"#)
            .create_async()
            .await;

        let client = client(&server, OAuthConfig::new(app(), Environment::Sandbox));
        let response = client.refresh_user_token("stale", &[]).await.unwrap();

        assert!(!response.is_success());
        assert_eq!(response.status_code, 400);
        assert_eq!(response.error.as_deref(), Some("invalid_grant"));

        let err = response.into_token().unwrap_err();
        assert!(matches!(err, SdkError::Auth(m) if m.contains("invalid_grant")));
    }

    #[tokio::test]
    async fn test_unreadable_body_is_protocol_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/identity/v1/oauth2/token")
            .with_status(502)
            .with_body("<html>Bad Gateway</html>")
            .create_async()
            .await;

        let client = client(&server, OAuthConfig::new(app(), Environment::Sandbox));
        let err = client.app_token(&[]).await.unwrap_err();
        assert!(matches!(err, SdkError::Protocol(_)));
    }

    #[tokio::test]
    async fn test_user_token_sends_code_and_ru_name() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/identity/v1/oauth2/token")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("grant_type".into(), "authorization_code".into()),
                Matcher::UrlEncoded("code".into(), "v^1.1#code".into()),
                Matcher::UrlEncoded("redirect_uri".into(), "My_Name-MyApp-SBX".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"access_token":"a","token_type":"User Access Token","expires_in":7200,"refresh_token":"r","refresh_token_expires_in":47304000}"#)
            .create_async()
            .await;

        let config = OAuthConfig::new(app(), Environment::Sandbox).with_ru_name("My_Name-MyApp-SBX");
        let response = client(&server, config).user_token("v^1.1#code").await.unwrap();

        mock.assert_async().await;
        assert_eq!(response.refresh_token.as_deref(), Some("r"));
        assert_eq!(response.refresh_token_expires_in, Some(47_304_000));
    }

    #[test]
    fn test_consent_url() {
        let config = OAuthConfig::new(app(), Environment::Sandbox)
            .with_ru_name("My_Name-MyApp-SBX")
            .with_scopes([DEFAULT_SCOPE, "https://api.ebay.com/oauth/api_scope/sell.inventory"]);
        let client = OAuthClient::new(config, Arc::new(HttpTransport::new().unwrap()));

        let url = client.consent_url(Some("xyz"), &[]).unwrap();
        assert_eq!(url.host_str(), Some("auth.sandbox.ebay.com"));

        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert!(pairs.contains(&("client_id".into(), "MyApp-SBX".into())));
        assert!(pairs.contains(&("redirect_uri".into(), "My_Name-MyApp-SBX".into())));
        assert!(pairs.contains(&("response_type".into(), "code".into())));
        assert!(pairs.contains(&("state".into(), "xyz".into())));
        assert!(pairs
            .iter()
            .any(|(k, v)| k == "scope" && v.ends_with("sell.inventory")));
    }

    #[test]
    fn test_consent_url_for_each_environment() {
        for (env, host) in [
            (Environment::Production, "auth.ebay.com"),
            (Environment::Sandbox, "auth.sandbox.ebay.com"),
        ] {
            let config = OAuthConfig::new(app(), env).with_ru_name("My_Name-MyApp");
            let client = OAuthClient::new(config, Arc::new(HttpTransport::new().unwrap()));

            let url = client.consent_url(None, &[]).unwrap();
            assert_eq!(url.host_str(), Some(host));
            assert_eq!(url.path(), "/oauth2/authorize");
        }
    }

    #[test]
    fn test_consent_url_requires_ru_name() {
        let client = OAuthClient::new(
            OAuthConfig::new(app(), Environment::Production),
            Arc::new(HttpTransport::new().unwrap()),
        );
        assert!(matches!(
            client.consent_url(None, &[]),
            Err(SdkError::Validation(_))
        ));
    }
}
