// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Matter Labs

//! Fetch a named secret from an attested secret-provisioning service into a file

#![deny(missing_docs)]
#![deny(clippy::all)]

use anyhow::{bail, Context, Result};
use clap::Parser;
use secret_provision::{
    client::ProvisionConnection,
    credential::WebPkiProvider,
    deliver,
    error::ResultCode,
    log::{setup_logging, LogLevelParser},
    provision::SecretProvisioner,
};
use std::{path::PathBuf, time::Duration};
use tracing::{level_filters::LevelFilter, warn};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Arguments {
    /// turn on test mode (plain client, no TLS, no attestation)
    #[arg(long, hide = true)]
    test: bool,
    /// URL of the secret-provisioning server
    #[arg(long, env = "SECRET_SERVER", required = true)]
    server: String,
    /// path to the policy document handed to the credential provider
    #[arg(long, env = "SECRET_CONFIG")]
    config: Option<PathBuf>,
    /// name of the secret to fetch
    #[arg(long, required = true)]
    name: String,
    /// file to write the secret to
    #[arg(long, required = true)]
    output: PathBuf,
    /// request deadline in seconds
    #[arg(long, default_value = "60")]
    timeout: u64,
    /// Log level for the log output.
    #[clap(long, default_value_t = LevelFilter::WARN, value_parser = LogLevelParser)]
    log_level: LevelFilter,
}

#[actix_web::main]
async fn main() -> Result<()> {
    let args = Arguments::parse();
    setup_logging(&args.log_level)?;

    if args.test {
        warn!("TEST MODE");
        let client = awc::Client::builder()
            .add_default_header((actix_web::http::header::USER_AGENT, "secret-provision/1.0"))
            .finish();
        // SAFETY: TEST MODE
        let conn = unsafe {
            ProvisionConnection::new_from_client_without_attestation(args.server.clone(), client)
        };
        deliver::deliver_to_file(&conn, &args.name, &args.output)
            .await
            .context("fetching the secret")?;
        return Ok(());
    }

    let config_json = match &args.config {
        Some(path) => std::fs::read_to_string(path).context("reading the policy document")?,
        None => String::new(),
    };

    let provisioner = SecretProvisioner::new(WebPkiProvider {
        deadline: Some(Duration::from_secs(args.timeout)),
    });

    let code = provisioner
        .get_secret_to_file(&args.server, &config_json, &args.name, &args.output)
        .await;
    if code != ResultCode::Success {
        bail!("fetching secret `{}` failed: {code:?} ({})", args.name, i32::from(code));
    }

    Ok(())
}
