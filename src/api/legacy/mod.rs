//
//  ebay-sdk
//  api/legacy/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! XML API families.
//!
//! Each submodule holds the [`OperationSpec`](crate::api::OperationSpec)
//! constants for its family, typed requests and responses for the
//! operations the SDK covers, and a thin service wrapper over
//! [`ServiceClient`](crate::api::ServiceClient).
//!
//! - [`trading`] - Listing management and account data (API-call dialect)
//! - [`shopping`] - Public item lookups (API-call dialect)
//! - [`finding`] - Item search (SOA dialect)
//! - [`business_policies`] - Seller payment, return and shipping profiles (SOA)
//! - [`bulk_data`] - Bulk Data Exchange jobs (SOA)
//! - [`file_transfer`] - Upload and download of bulk job files (SOA, XOP)
//!
//! Response fields that the service may leave out are `Option`s, so an
//! absent list (`None`) stays distinguishable from an empty one.
//!
//! Any operation not modelled here can still be called through
//! [`ServiceClient::call`](crate::api::ServiceClient::call) with an
//! `OperationSpec::xml(name)` and caller-defined types.

pub mod bulk_data;
pub mod business_policies;
pub mod file_transfer;
pub mod finding;
pub mod shopping;
pub mod trading;

use serde::{Deserialize, Serialize};

/// A monetary amount in the API-call dialect, e.g.
/// `<StartPrice currencyID="USD">19.99</StartPrice>`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Amount {
    #[serde(rename = "@currencyID")]
    pub currency_id: String,
    #[serde(rename = "$text")]
    pub value: f64,
}

impl Amount {
    pub fn new(currency_id: impl Into<String>, value: f64) -> Self {
        Self {
            currency_id: currency_id.into(),
            value,
        }
    }
}
