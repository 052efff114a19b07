//
//  ebay-sdk
//  auth/keyring.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Secure Token Storage Module
//!
//! This module persists OAuth tokens between runs so a refreshed token is
//! not lost when the process exits.
//!
//! ## Platform Support
//!
//! [`KeyringStore`] uses the platform-native secret store:
//!
//! - **macOS**: Keychain Services
//! - **Linux**: Secret Service API (GNOME Keyring, KWallet)
//! - **Windows**: Windows Credential Manager
//!
//! [`MemoryTokenStore`] keeps values in process memory, for tests and for
//! headless hosts without a secret service.
//!
//! ## Storage Model
//!
//! - **Service**: `ebay-sdk`
//! - **Key**: chosen by the application (e.g. `sandbox:user`)
//! - **Value**: the token serialized as JSON
//!
//! ## Example
//!
//! ```rust,no_run
//! use ebay_sdk::auth::{KeyringStore, OAuthToken, TokenStore};
//!
//! fn remember(token: &OAuthToken) -> anyhow::Result<()> {
//!     let store = KeyringStore::new();
//!     store.store_token("sandbox:user", token)?;
//!
//!     if let Some(saved) = store.load_token("sandbox:user")? {
//!         assert_eq!(&saved, token);
//!     }
//!     Ok(())
//! }
//! ```

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Context, Result};
use keyring::Entry;

use super::OAuthToken;

const SERVICE_NAME: &str = "ebay-sdk";

/// A key-value store for secrets.
///
/// Implementations must be usable from several tasks at once.
pub trait TokenStore: Send + Sync {
    /// Stores `value` under `key`, replacing any previous value.
    fn store(&self, key: &str, value: &str) -> Result<()>;

    /// Returns the value stored under `key`, or `None`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Deletes the value under `key`. Deleting a missing key succeeds.
    fn delete(&self, key: &str) -> Result<()>;

    /// Stores an OAuth token as JSON.
    fn store_token(&self, key: &str, token: &OAuthToken) -> Result<()> {
        let json = serde_json::to_string(token)?;
        self.store(key, &json)
    }

    /// Loads an OAuth token stored with [`store_token`](Self::store_token).
    fn load_token(&self, key: &str) -> Result<Option<OAuthToken>> {
        match self.get(key)? {
            Some(json) => {
                let token = serde_json::from_str(&json)
                    .with_context(|| format!("Stored token '{}' is not valid JSON", key))?;
                Ok(Some(token))
            }
            None => Ok(None),
        }
    }
}

/// Token storage in the platform keyring.
pub struct KeyringStore {
    service: String,
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyringStore {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    /// Uses a custom keyring service name.
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }
}

impl TokenStore for KeyringStore {
    fn store(&self, key: &str, value: &str) -> Result<()> {
        let entry = Entry::new(&self.service, key)?;
        entry.set_password(value)?;
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        let entry = Entry::new(&self.service, key)?;
        match entry.get_password() {
            Ok(password) => Ok(Some(password)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&self, key: &str) -> Result<()> {
        let entry = Entry::new(&self.service, key)?;
        match entry.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-memory token storage.
#[derive(Default)]
pub struct MemoryTokenStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>> {
        self.values
            .lock()
            .map_err(|_| anyhow::anyhow!("Token store lock poisoned"))
    }
}

impl TokenStore for MemoryTokenStore {
    fn store(&self, key: &str, value: &str) -> Result<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
