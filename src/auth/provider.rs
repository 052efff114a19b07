//
//  ebay-sdk
//  auth/provider.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Credential Provider
//!
//! [`CredentialProvider`] resolves the authentication for each request. One
//! provider is shared by every call made through a service client, so its
//! token state is guarded:
//!
//! 1. **Fast path**: a read lock on the current token. A fresh token is
//!    returned without any coordination.
//! 2. **Slow path**: callers that see an expired (or missing) token queue
//!    on a refresh gate. The first one through refreshes; the rest find a
//!    fresh token when they re-check under the gate and return it.
//!
//! At most one refresh is in flight per provider, and every waiter
//! observes the token that refresh produced.
//!
//! ## Resolution Rules
//!
//! | Credentials | XML families | REST families |
//! |-------------|--------------|---------------|
//! | `App` | app id only | minted application token |
//! | `UserToken` | legacy token | `Auth` error |
//! | `OAuth` | bearer (IAF) token | bearer token |
//! | none | `AuthRequired` | `AuthRequired` |

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

use super::{AppCredentials, AuthContext, AuthHeaders, AuthScheme, Credentials, OAuthToken, TokenStore};
use crate::api::common::{SdkError, SdkResult};

/// Issues new OAuth tokens for a [`CredentialProvider`].
///
/// [`OAuthClient`](super::OAuthClient) is the production implementation.
#[async_trait]
pub trait TokenSource: Send + Sync {
    /// Exchanges a refresh token for a new user access token.
    async fn refresh_user_token(&self, refresh_token: &str) -> SdkResult<OAuthToken>;

    /// Mints an application token with the client-credentials grant.
    async fn mint_app_token(&self) -> SdkResult<OAuthToken>;
}

/// Resolves [`AuthHeaders`] for requests, refreshing OAuth tokens on demand.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use ebay_sdk::auth::{
///     AppCredentials, CredentialProvider, Credentials, OAuthClient, OAuthConfig, OAuthToken,
/// };
/// use ebay_sdk::api::HttpTransport;
/// use ebay_sdk::config::Environment;
///
/// let app = AppCredentials::new("MyApp-PRD", "PRD-cert");
/// let oauth = OAuthClient::new(
///     OAuthConfig::new(app.clone(), Environment::Production),
///     Arc::new(HttpTransport::new()?),
/// );
///
/// let token = OAuthToken::new("v^1.1#...").with_refresh_token("v^1.1#r...");
/// let provider = CredentialProvider::new(Credentials::OAuth(token))
///     .with_app_identity(app)
///     .with_token_source(Arc::new(oauth));
/// # Ok::<(), ebay_sdk::api::SdkError>(())
/// ```
pub struct CredentialProvider {
    credentials: Option<Credentials>,
    app_identity: Option<AppCredentials>,
    token: RwLock<Option<OAuthToken>>,
    refresh_gate: Mutex<()>,
    source: Option<Arc<dyn TokenSource>>,
    store: Option<(Arc<dyn TokenStore>, String)>,
    skew: Duration,
}

impl CredentialProvider {
    /// Creates a provider for `credentials`.
    pub fn new(credentials: Credentials) -> Self {
        let (token, app_identity) = match &credentials {
            Credentials::OAuth(token) => (Some(token.clone()), None),
            Credentials::App(app) => (None, Some(app.clone())),
            Credentials::UserToken(_) => (None, None),
        };

        Self {
            credentials: Some(credentials),
            app_identity,
            token: RwLock::new(token),
            refresh_gate: Mutex::new(()),
            source: None,
            store: None,
            skew: Duration::seconds(60),
        }
    }

    /// Creates a provider with no credentials; every resolve fails with
    /// [`SdkError::AuthRequired`].
    pub fn anonymous() -> Self {
        Self {
            credentials: None,
            app_identity: None,
            token: RwLock::new(None),
            refresh_gate: Mutex::new(()),
            source: None,
            store: None,
            skew: Duration::seconds(60),
        }
    }

    /// Sends the app identity alongside user tokens on XML families.
    pub fn with_app_identity(mut self, app: AppCredentials) -> Self {
        self.app_identity = Some(app);
        self
    }

    /// Sets where refreshed and minted tokens come from.
    pub fn with_token_source(mut self, source: Arc<dyn TokenSource>) -> Self {
        self.source = Some(source);
        self
    }

    /// Persists refreshed user tokens to `store` under `key`.
    pub fn with_store(mut self, store: Arc<dyn TokenStore>, key: impl Into<String>) -> Self {
        self.store = Some((store, key.into()));
        self
    }

    /// Treats tokens expiring within `skew` as already expired.
    pub fn with_expiry_skew(mut self, skew: Duration) -> Self {
        self.skew = skew;
        self
    }

    /// Returns the configured credentials.
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Returns a copy of the current OAuth token (user or application).
    pub async fn current_token(&self) -> Option<OAuthToken> {
        self.token.read().await.clone()
    }

    /// Resolves the authentication for one request.
    ///
    /// # Errors
    ///
    /// - [`SdkError::AuthRequired`] when no credentials are configured
    /// - [`SdkError::Auth`] when the credentials cannot serve `context`, or
    ///   a required refresh fails
    pub async fn resolve(&self, context: AuthContext) -> SdkResult<AuthHeaders> {
        let credentials = self.credentials.as_ref().ok_or(SdkError::AuthRequired)?;
        let is_xml = context.protocol.is_xml();

        let scheme = match credentials {
            Credentials::App(_) if is_xml => AuthScheme::AppOnly,
            Credentials::App(_) => AuthScheme::Bearer(self.fresh_token().await?),
            Credentials::UserToken(token) if is_xml => AuthScheme::LegacyToken(token.clone()),
            Credentials::UserToken(_) => {
                return Err(SdkError::Auth(
                    "REST APIs require an OAuth token; a legacy user token was configured"
                        .to_string(),
                ))
            }
            Credentials::OAuth(_) => AuthScheme::Bearer(self.fresh_token().await?),
        };

        Ok(AuthHeaders {
            scheme,
            app: self.app_identity.clone(),
        })
    }

    async fn fresh_token(&self) -> SdkResult<String> {
        if let Some(token) = self.token.read().await.as_ref() {
            if !token.is_expired(self.skew) {
                return Ok(token.access_token.clone());
            }
        }

        let _gate = self.refresh_gate.lock().await;

        // Another caller may have refreshed while this one waited.
        let current = self.token.read().await.clone();
        if let Some(token) = &current {
            if !token.is_expired(self.skew) {
                debug!("Token refreshed by a concurrent caller");
                return Ok(token.access_token.clone());
            }
        }

        let source = self.source.as_ref().ok_or_else(|| {
            SdkError::Auth("Token expired and no token source is configured".to_string())
        })?;

        let refreshed = match self.credentials.as_ref() {
            Some(Credentials::App(_)) => {
                info!("Minting application token");
                source.mint_app_token().await.map_err(as_auth_error)?
            }
            _ => {
                let refresh_token = current
                    .as_ref()
                    .and_then(|t| t.refresh_token.clone())
                    .ok_or_else(|| {
                        SdkError::Auth("OAuth token expired and cannot be refreshed".to_string())
                    })?;

                info!("Refreshing OAuth user token");
                let mut token = source
                    .refresh_user_token(&refresh_token)
                    .await
                    .map_err(as_auth_error)?;
                if token.refresh_token.is_none() {
                    token.refresh_token = Some(refresh_token);
                }
                self.persist(&token);
                token
            }
        };

        let access_token = refreshed.access_token.clone();
        *self.token.write().await = Some(refreshed);
        Ok(access_token)
    }

    fn persist(&self, token: &OAuthToken) {
        if let Some((store, key)) = &self.store {
            if let Err(e) = store.store_token(key, token) {
                warn!("Failed to persist refreshed token: {}", e);
            }
        }
    }
}

fn as_auth_error(err: SdkError) -> SdkError {
    match err {
        SdkError::Auth(_) | SdkError::AuthRequired => err,
        other => SdkError::Auth(format!("Token refresh failed: {}", other)),
    }
}
