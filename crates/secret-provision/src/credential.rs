// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Matter Labs

//! Opaque transport credentials and the attested-credential seam

use anyhow::Result;
use rustls::client::danger::ServerCertVerifier;
use rustls::ClientConfig;
use std::sync::Arc;
use std::time::Duration;

/// An opaque transport identity for one connection to the provisioning
/// service.
///
/// How the peer gets trusted is entirely the business of whoever built the
/// contained TLS configuration; an attestation-verifying provider plugs its
/// verifier in via [`Credential::from_verifier`].
#[derive(Clone)]
pub struct Credential {
    tls_config: Arc<ClientConfig>,
    deadline: Option<Duration>,
}

impl Credential {
    /// Create a credential from a prebuilt TLS client configuration.
    pub fn from_tls_config(tls_config: Arc<ClientConfig>) -> Self {
        Self {
            tls_config,
            deadline: None,
        }
    }

    /// Create a credential whose peer trust is decided by `verifier`.
    ///
    /// This is the seam an attestation-verifying provider plugs into: the
    /// verifier checks the peer's attestation evidence instead of a CA chain.
    pub fn from_verifier(verifier: Arc<dyn ServerCertVerifier>) -> Self {
        let tls_config = ClientConfig::builder()
            .dangerous()
            .with_custom_certificate_verifier(verifier)
            .with_no_client_auth();
        Self::from_tls_config(Arc::new(tls_config))
    }

    /// Create a credential trusting the standard CA roots.
    ///
    /// This carries no attestation guarantee and is meant for development
    /// against a conventionally-certified service.
    pub fn from_webpki_roots() -> Result<Self> {
        let mut root_store = rustls::RootCertStore::empty();
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        let tls_config = ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth();
        Ok(Self::from_tls_config(Arc::new(tls_config)))
    }

    /// Attach a per-request deadline to the credential.
    ///
    /// The secret-retrieval layer itself defines no timeout; any deadline
    /// rides on the credential the caller supplies.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// The TLS client configuration backing this credential.
    pub fn tls_config(&self) -> Arc<ClientConfig> {
        self.tls_config.clone()
    }

    /// The deadline attached to this credential, if any.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }
}

/// The `make_attested_credential(config) -> Credential` seam.
///
/// `config_json` is the policy document of the provider; this crate passes
/// it through uninterpreted.
pub trait CredentialProvider {
    /// Produce a transport credential for the policy in `config_json`.
    fn attested_credential(&self, config_json: &str) -> Result<Credential>;
}

/// Development provider backed by the standard CA roots.
///
/// Ignores the policy document. Attestation-verifying providers live outside
/// this crate and implement [`CredentialProvider`] themselves.
#[derive(Debug, Default)]
pub struct WebPkiProvider {
    /// deadline to attach to every credential this provider hands out
    pub deadline: Option<Duration>,
}

impl CredentialProvider for WebPkiProvider {
    fn attested_credential(&self, _config_json: &str) -> Result<Credential> {
        let credential = Credential::from_webpki_roots()?;
        Ok(match self.deadline {
            Some(deadline) => credential.with_deadline(deadline),
            None => credential,
        })
    }
}
