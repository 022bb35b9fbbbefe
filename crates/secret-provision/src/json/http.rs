// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Matter Labs

//! Common types for the secret-provisioning http JSON API

use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// The get-secret request data
#[derive(Debug, Serialize, Deserialize)]
pub struct GetSecretRequest {
    /// The name of the secret to fetch
    pub name: String,
}

impl GetSecretRequest {
    /// The get-secret URL
    pub const URL: &'static str = "/v1/secret/get";
}

/// The get-secret response data
#[derive(Debug, Serialize, Deserialize)]
pub struct GetSecretResponse {
    /// The encoded secret; empty when the service releases nothing
    pub secret: Zeroizing<String>,
}
