// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Matter Labs

//! Transport for the named-secret request

use crate::credential::Credential;
use crate::json::http::{GetSecretRequest, GetSecretResponse};
use actix_web::http::header;
use async_trait::async_trait;
use awc::{error::StatusCode, Client, Connector};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};
use zeroize::Zeroizing;

const DEFAULT_DEADLINE: Duration = Duration::from_secs(60);

/// Error returned when requesting a secret over the transport.
///
/// Stringified where the underlying error type is not `Send`.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    /// The request never made it to the service.
    #[error("sending the secret request: {0}")]
    SendRequest(String),
    /// The service replied with a non-OK status.
    #[error("secret request failed with status {status}: {message}")]
    Status {
        /// HTTP status of the reply
        status: StatusCode,
        /// body of the reply, if it was readable
        message: String,
    },
    /// The reply body could not be parsed.
    #[error("malformed secret reply: {0}")]
    Payload(String),
}

const _: () = {
    fn assert_send<T: Send>() {}
    let _ = assert_send::<ChannelError>;
};

/// Capability to send one named-secret request and await the encoded reply.
///
/// The production implementation is [`ProvisionConnection`]; tests substitute
/// their own.
#[async_trait(?Send)]
pub trait SecretTransport {
    /// Send a request for the secret called `name` and return the encoded
    /// secret from the reply.
    async fn send_secret_request(&self, name: &str) -> Result<Zeroizing<String>, ChannelError>;
}

/// Request the named secret, collapsing every failure into an empty reply.
///
/// A transport failure and a service that declines to release the secret are
/// deliberately indistinguishable downstream; the failure detail is logged
/// here and surfaced only through [`SecretTransport::send_secret_request`].
pub async fn get_secret<T>(transport: &T, name: &str) -> Zeroizing<String>
where
    T: SecretTransport + ?Sized,
{
    match transport.send_secret_request(name).await {
        Ok(secret) => secret,
        Err(e) => {
            error!("getting secret `{name}`: {e}");
            Zeroizing::new(String::new())
        }
    }
}

/// A connection to the secret-provisioning service over a credentialed
/// transport.
pub struct ProvisionConnection {
    server: String,
    client: Client,
}

impl ProvisionConnection {
    /// Create a new connection to the provisioning service.
    ///
    /// The TLS trust of the connection is whatever the [`Credential`]
    /// encodes; this layer adds no verification of its own.
    pub fn new(credential: &Credential, server: String) -> Self {
        let client = Client::builder()
            .add_default_header((header::USER_AGENT, "secret-provision/1.0"))
            // a "connector" wraps the stream into an encrypted connection
            .connector(Connector::new().rustls_0_23(credential.tls_config()))
            .timeout(credential.deadline().unwrap_or(DEFAULT_DEADLINE))
            .finish();

        Self { server, client }
    }

    /// Create a new connection from a preconfigured client.
    ///
    /// # Safety
    /// This function is unsafe, because the client carries no attested
    /// credential and the peer is not verified.
    pub unsafe fn new_from_client_without_attestation(server: String, client: Client) -> Self {
        Self { server, client }
    }

    /// Get a reference to the agent, which can be used to make requests to
    /// the service.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Get a reference to the server URL
    pub fn server(&self) -> &str {
        &self.server
    }
}

#[async_trait(?Send)]
impl SecretTransport for ProvisionConnection {
    async fn send_secret_request(&self, name: &str) -> Result<Zeroizing<String>, ChannelError> {
        let request = GetSecretRequest {
            name: name.to_string(),
        };

        let url = format!("{server}{path}", server = self.server, path = GetSecretRequest::URL);
        debug!("requesting secret `{name}` via {url}");

        let mut response = self
            .client
            .post(url)
            .send_json(&request)
            .await
            .map_err(|e| ChannelError::SendRequest(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<Value>()
                .await
                .map(|v| v.to_string())
                .unwrap_or_default();
            return Err(ChannelError::Status { status, message });
        }

        let reply: GetSecretResponse = response
            .json()
            .await
            .map_err(|e| ChannelError::Payload(e.to_string()))?;

        debug!("got a reply for secret `{name}`");

        Ok(reply.secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_test::traced_test;

    struct FailingTransport;

    #[async_trait(?Send)]
    impl SecretTransport for FailingTransport {
        async fn send_secret_request(
            &self,
            _name: &str,
        ) -> Result<Zeroizing<String>, ChannelError> {
            Err(ChannelError::SendRequest("connection refused".to_string()))
        }
    }

    #[traced_test]
    #[tokio::test]
    async fn transport_failure_collapses_to_empty() {
        let secret = get_secret(&FailingTransport, "disk_key").await;
        assert!(secret.is_empty());
        assert!(logs_contain("disk_key"));
        assert!(logs_contain("connection refused"));
    }
}
