// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Matter Labs

//! JSON types of the secret-provisioning API

pub mod http;
