//
//  ebay-sdk
//  api/legacy/business_policies.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Business Policies Management API.
//!
//! Reads the seller's payment, return and shipping profiles. Each list is
//! reported separately and any of them may be left out of the response.

use serde::{Deserialize, Serialize};

use crate::api::client::ServiceClient;
use crate::api::codec::OperationSpec;
use crate::api::common::{Response, SdkResult};

pub const GET_SELLER_PROFILES: OperationSpec = OperationSpec::xml("getSellerProfiles");

/// Request for `getSellerProfiles`; every filter is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSellerProfilesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_id: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub profile_id: Vec<u64>,
}

impl GetSellerProfilesRequest {
    /// Only profiles of `profile_type` (`PAYMENT`, `RETURN_POLICY` or `SHIPPING`).
    pub fn of_type(profile_type: impl Into<String>) -> Self {
        Self {
            profile_type: Some(profile_type.into()),
            ..Self::default()
        }
    }
}

/// Fields shared by every profile kind.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerProfile {
    pub profile_id: u64,
    pub profile_name: Option<String>,
    pub profile_type: Option<String>,
    pub profile_desc: Option<String>,
    pub site_id: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PaymentProfileList {
    #[serde(rename = "PaymentProfile", default)]
    pub profiles: Vec<SellerProfile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReturnPolicyProfileList {
    #[serde(rename = "ReturnPolicyProfile", default)]
    pub profiles: Vec<SellerProfile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ShippingPolicyProfileList {
    #[serde(rename = "ShippingPolicyProfile", default)]
    pub profiles: Vec<SellerProfile>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetSellerProfilesResponse {
    pub payment_profile_list: Option<PaymentProfileList>,
    pub return_policy_profile_list: Option<ReturnPolicyProfileList>,
    #[serde(rename = "shippingPolicyProfile")]
    pub shipping_policy_profile_list: Option<ShippingPolicyProfileList>,
}

impl GetSellerProfilesResponse {
    /// All profiles of every kind, payment first.
    pub fn all_profiles(&self) -> impl Iterator<Item = &SellerProfile> {
        let payment = self.payment_profile_list.iter().flat_map(|l| l.profiles.iter());
        let returns = self.return_policy_profile_list.iter().flat_map(|l| l.profiles.iter());
        let shipping = self.shipping_policy_profile_list.iter().flat_map(|l| l.profiles.iter());
        payment.chain(returns).chain(shipping)
    }
}

/// Typed access to the Business Policies operations.
#[derive(Clone)]
pub struct BusinessPoliciesService {
    client: ServiceClient,
}

impl BusinessPoliciesService {
    pub fn new(client: ServiceClient) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &ServiceClient {
        &self.client
    }

    pub async fn seller_profiles(
        &self,
        request: &GetSellerProfilesRequest,
    ) -> SdkResult<Response<GetSellerProfilesResponse>> {
        self.client.call(&GET_SELLER_PROFILES, request).await
    }
}
