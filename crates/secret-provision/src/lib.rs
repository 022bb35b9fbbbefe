// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Matter Labs

//! Client for fetching secrets from an attested secret-provisioning service.
//!
//! The service only releases a secret over a transport whose trust was
//! established by remote attestation, not by a conventional CA. This crate
//! covers the client half: building the attested channel from an opaque
//! [`credential::Credential`], requesting a named secret, decoding the wire
//! encoding of the reply and delivering the raw bytes to a file or a caller
//! buffer. The attestation verification itself lives behind the
//! [`credential::CredentialProvider`] seam.

#![deny(missing_docs)]
#![deny(clippy::all)]

pub mod client;
pub mod codec;
pub mod credential;
pub mod deliver;
pub mod error;
pub mod json;
pub mod log;
pub mod provision;
