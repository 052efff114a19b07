//
//  ebay-sdk
//  api/rest/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! REST/JSON API families.
//!
//! Request structs name their fields exactly as the API does: fields that
//! appear as `{placeholders}` in an operation's path go into the URL,
//! fields listed as query parameters go into the query string, and
//! everything else is the JSON body.
//!
//! - [`browse`] - Item search and item details (Buy APIs)
//! - [`inventory`] - Seller inventory items (Sell APIs)

pub mod browse;
pub mod inventory;

use serde::{Deserialize, Serialize};

/// A monetary amount as the REST APIs report it; `value` is a decimal string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    pub value: String,
    pub currency: String,
}

impl Amount {
    pub fn new(value: impl Into<String>, currency: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            currency: currency.into(),
        }
    }

    /// The value as a number, if it parses.
    pub fn as_f64(&self) -> Option<f64> {
        self.value.parse().ok()
    }
}

/// Payload of operations that answer with no content (or only warnings).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Acknowledged {}
