// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Matter Labs

//! The public entry surface: one-shot secret fetches with stable result codes
//!
//! Each call is a single attempt: establish the credential, open the channel,
//! request the secret, decode, deliver. There is no retry loop and nothing is
//! cached between calls; every call re-establishes trust.

use crate::client::ProvisionConnection;
use crate::credential::CredentialProvider;
use crate::deliver;
use crate::error::{ProvisionError, ResultCode};
use std::path::Path;
use tracing::error;

/// The facade orchestrating credential setup, request, decode and delivery.
///
/// Constructed with the opaque credential provider; internal components are
/// not reachable through it.
pub struct SecretProvisioner<P> {
    provider: P,
}

impl<P: CredentialProvider> SecretProvisioner<P> {
    /// Create a provisioner fetching its credentials from `provider`.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    fn connect(
        &self,
        server: &str,
        config_json: &str,
        name: &str,
    ) -> Result<ProvisionConnection, ProvisionError> {
        if name.is_empty() {
            return Err(ProvisionError::InvalidParam("empty secret name"));
        }
        let credential = self
            .provider
            .attested_credential(config_json)
            .map_err(|e| {
                error!("establishing attested credential: {e:#}");
                // indistinguishable from a service decline, like any other
                // transport-trust failure
                ProvisionError::NoSecret
            })?;
        Ok(ProvisionConnection::new(&credential, server.to_string()))
    }

    /// Fetch the secret called `name` and write it to `path`.
    ///
    /// Fallible variant of [`Self::get_secret_to_file`] carrying the failure
    /// detail.
    pub async fn fetch_secret_to_file(
        &self,
        server: &str,
        config_json: &str,
        name: &str,
        path: &Path,
    ) -> Result<(), ProvisionError> {
        let conn = self.connect(server, config_json, name)?;
        deliver::deliver_to_file(&conn, name, path).await
    }

    /// Fetch the secret called `name` into `buffer`.
    ///
    /// Fallible variant of [`Self::get_secret_to_buffer`] carrying the
    /// failure detail.
    pub async fn fetch_secret_to_buffer(
        &self,
        server: &str,
        config_json: &str,
        name: &str,
        buffer: &mut [u8],
        written: &mut usize,
    ) -> Result<(), ProvisionError> {
        let conn = self.connect(server, config_json, name)?;
        deliver::deliver_to_buffer(&conn, name, buffer, written).await
    }

    /// Fetch the secret called `name` and write it to `path`.
    ///
    /// A file exists at `path` afterwards if and only if the result is
    /// [`ResultCode::Success`].
    pub async fn get_secret_to_file(
        &self,
        server: &str,
        config_json: &str,
        name: &str,
        path: &Path,
    ) -> ResultCode {
        match self
            .fetch_secret_to_file(server, config_json, name, path)
            .await
        {
            Ok(()) => ResultCode::Success,
            Err(e) => {
                error!("fetching secret `{name}` to file: {e}");
                e.code()
            }
        }
    }

    /// Fetch the secret called `name` into `buffer`, recording the number of
    /// bytes written in `written`.
    ///
    /// On any result other than [`ResultCode::Success`] neither `buffer` nor
    /// `written` is modified.
    pub async fn get_secret_to_buffer(
        &self,
        server: &str,
        config_json: &str,
        name: &str,
        buffer: &mut [u8],
        written: &mut usize,
    ) -> ResultCode {
        match self
            .fetch_secret_to_buffer(server, config_json, name, buffer, written)
            .await
        {
            Ok(()) => ResultCode::Success,
            Err(e) => {
                error!("fetching secret `{name}` to buffer: {e}");
                e.code()
            }
        }
    }
}
