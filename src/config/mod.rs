//
//  ebay-sdk
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! This module provides configuration management for the SDK: the TOML
//! file holding defaults and per-environment credential profiles, and the
//! endpoint table describing every API family.
//!
//! ## Overview
//!
//! - **Defaults**: timeouts, batch concurrency, job polling, site and
//!   marketplace identifiers, API version overrides
//! - **Profiles**: one `[sandbox]` and one `[production]` table holding app
//!   credentials, the RuName and any user tokens
//! - **Endpoints**: base URLs and protocols per [`ApiFamily`]
//!
//! Nothing here reads environment variables. Applications that prefer
//! another source can build [`Config`] values directly.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/ebay-sdk/config.toml`
//! - **macOS**: `~/Library/Application Support/ebay-sdk/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\ebay-sdk\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! [defaults]
//! timeout_secs = 60
//! concurrency = 4
//! poll_interval_secs = 5
//! poll_max_attempts = 120
//! site_id = 0
//! global_id = "EBAY-US"
//! marketplace_id = "EBAY_US"
//!
//! [defaults.api_versions]
//! Trading = "967"
//!
//! [sandbox]
//! app_id = "MyApp-SBX-1234"
//! cert_id = "SBX-cert"
//! dev_id = "dev-id"
//! ru_name = "My_Name-MyApp-SBX-abc"
//! auth_token = "AgAAAA..."
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ebay_sdk::config::{ApiFamily, Config, Environment};
//!
//! let config = Config::load()?;
//! let endpoint = config.endpoint(ApiFamily::Trading, Environment::Sandbox);
//! let credentials = config.credentials(Environment::Sandbox);
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! ## Submodules
//!
//! - [`file`]: Low-level configuration file I/O operations
//! - [`endpoints`]: API families, environments and endpoint configuration

mod endpoints;
mod file;

pub use endpoints::*;
pub use file::*;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::api::{BatchExecutor, JobPoller, TransportConfig};
use crate::auth::{AppCredentials, Credentials, OAuthToken};

/// Global configuration container.
///
/// # Fields
///
/// * `defaults` - Settings shared by every service client
/// * `sandbox` - Credential profile for the sandbox environment
/// * `production` - Credential profile for the production environment
///
/// # Examples
///
/// ```rust
/// use ebay_sdk::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.defaults.concurrency, 4);
/// assert!(config.sandbox.is_none());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub sandbox: Option<ProfileConfig>,

    #[serde(default)]
    pub production: Option<ProfileConfig>,
}

/// Settings shared by every service client.
///
/// # Default Values
///
/// | Field | Default |
/// |-------|---------|
/// | `timeout_secs` | `60` |
/// | `connect_timeout_secs` | `10` |
/// | `concurrency` | `4` |
/// | `poll_interval_secs` | `5` |
/// | `poll_max_attempts` | `120` |
/// | `site_id` | `0` (US) |
/// | `global_id` | `"EBAY-US"` |
/// | `marketplace_id` | `"EBAY_US"` |
/// | `locale` | none |
/// | `api_versions` | empty (family defaults apply) |
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DefaultsConfig {
    /// Total time allowed for one HTTP exchange.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Time allowed to establish a connection.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Maximum in-flight requests for batches and concurrent pagination.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    /// Delay between job status checks.
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Status checks made before a job is reported as stuck.
    #[serde(default = "default_poll_max_attempts")]
    pub poll_max_attempts: u32,

    /// Trading/Shopping site id.
    #[serde(default)]
    pub site_id: u32,

    /// SOA global id.
    #[serde(default = "default_global_id")]
    pub global_id: String,

    /// REST marketplace id.
    #[serde(default = "default_marketplace_id")]
    pub marketplace_id: String,

    /// REST `Content-Language`/`Accept-Language` value.
    #[serde(default)]
    pub locale: Option<String>,

    /// API version overrides keyed by family name (e.g. `Trading`).
    #[serde(default)]
    pub api_versions: BTreeMap<String, String>,
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_concurrency() -> usize {
    4
}

fn default_poll_interval_secs() -> u64 {
    5
}

fn default_poll_max_attempts() -> u32 {
    120
}

fn default_global_id() -> String {
    "EBAY-US".to_string()
}

fn default_marketplace_id() -> String {
    "EBAY_US".to_string()
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
            concurrency: default_concurrency(),
            poll_interval_secs: default_poll_interval_secs(),
            poll_max_attempts: default_poll_max_attempts(),
            site_id: 0,
            global_id: default_global_id(),
            marketplace_id: default_marketplace_id(),
            locale: None,
            api_versions: BTreeMap::new(),
        }
    }
}

/// Credentials and identifiers for one environment.
///
/// Every field is optional; [`credentials`](Self::credentials) decides
/// which credential variant the profile yields.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ProfileConfig {
    #[serde(default)]
    pub app_id: Option<String>,

    #[serde(default)]
    pub cert_id: Option<String>,

    #[serde(default)]
    pub dev_id: Option<String>,

    /// Redirect URL name registered for the application.
    #[serde(default)]
    pub ru_name: Option<String>,

    /// Legacy Auth'n'Auth token.
    #[serde(default)]
    pub auth_token: Option<String>,

    #[serde(default)]
    pub oauth_user_token: Option<String>,

    #[serde(default)]
    pub oauth_refresh_token: Option<String>,

    #[serde(default)]
    pub oauth_expires_at: Option<DateTime<Utc>>,
}

impl ProfileConfig {
    /// Returns the app credentials if both `app_id` and `cert_id` are set.
    pub fn app_credentials(&self) -> Option<AppCredentials> {
        match (&self.app_id, &self.cert_id) {
            (Some(app_id), Some(cert_id)) => {
                let mut creds = AppCredentials::new(app_id.clone(), cert_id.clone());
                creds.dev_id = self.dev_id.clone();
                Some(creds)
            }
            _ => None,
        }
    }

    /// Picks the credential variant for this profile.
    ///
    /// # Returns
    ///
    /// In order of preference:
    /// 1. `Credentials::OAuth` when an OAuth user token is stored
    /// 2. `Credentials::UserToken` when a legacy auth token is stored
    /// 3. `Credentials::App` when app credentials are complete
    /// 4. `None` otherwise
    pub fn credentials(&self) -> Option<Credentials> {
        if let Some(access_token) = &self.oauth_user_token {
            return Some(Credentials::OAuth(OAuthToken {
                access_token: access_token.clone(),
                refresh_token: self.oauth_refresh_token.clone(),
                expires_at: self.oauth_expires_at,
            }));
        }
        if let Some(token) = &self.auth_token {
            return Some(Credentials::UserToken(token.clone()));
        }
        self.app_credentials().map(Credentials::App)
    }
}

impl Config {
    /// Loads the configuration from the default location.
    ///
    /// A missing file yields [`Config::default`].
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        Self::load_from(&path)
    }

    /// Loads the configuration from `path`, or the default if it is absent.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !config_exists(path) {
            return Ok(Self::default());
        }
        let content = read_config_file(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Saves the configuration to the default location.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        self.save_to(&path)
    }

    /// Saves the configuration to `path`.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        write_config_file(path, &content)
    }

    /// Returns the default configuration file path.
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("", "", crate::APP_NAME)
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Returns the profile for `env`, if configured.
    pub fn profile(&self, env: Environment) -> Option<&ProfileConfig> {
        match env {
            Environment::Production => self.production.as_ref(),
            Environment::Sandbox => self.sandbox.as_ref(),
        }
    }

    /// Returns a mutable profile for `env`, creating an empty one if needed.
    pub fn profile_mut(&mut self, env: Environment) -> &mut ProfileConfig {
        match env {
            Environment::Production => self.production.get_or_insert_with(Default::default),
            Environment::Sandbox => self.sandbox.get_or_insert_with(Default::default),
        }
    }

    /// Shorthand for `self.profile(env).and_then(ProfileConfig::credentials)`.
    pub fn credentials(&self, env: Environment) -> Option<Credentials> {
        self.profile(env).and_then(ProfileConfig::credentials)
    }

    /// Builds the endpoint for `family` in `env` with the configured defaults.
    pub fn endpoint(&self, family: ApiFamily, env: Environment) -> EndpointConfig {
        let d = &self.defaults;
        let mut endpoint = EndpointConfig::new(family, env)
            .with_site_id(d.site_id)
            .with_global_id(d.global_id.clone())
            .with_marketplace_id(d.marketplace_id.clone());

        if let Some(locale) = &d.locale {
            endpoint = endpoint.with_locale(locale.clone());
        }

        let family_name = family.to_string();
        if let Some((_, version)) = d
            .api_versions
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(&family_name))
        {
            endpoint = endpoint.with_api_version(version.clone());
        }

        endpoint
    }

    /// Transport settings derived from the defaults.
    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            timeout: Duration::from_secs(self.defaults.timeout_secs),
            connect_timeout: Duration::from_secs(self.defaults.connect_timeout_secs),
            ..TransportConfig::default()
        }
    }

    /// Batch executor bounded by `defaults.concurrency`.
    pub fn batch_executor(&self) -> BatchExecutor {
        BatchExecutor::new(self.defaults.concurrency)
    }

    /// Job poller derived from the defaults.
    pub fn job_poller(&self) -> JobPoller {
        JobPoller::new(
            Duration::from_secs(self.defaults.poll_interval_secs),
            self.defaults.poll_max_attempts,
        )
    }
}
