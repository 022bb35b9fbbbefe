// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Matter Labs

use mockito::{Matcher, Server};
use secret_provision::client::{ChannelError, ProvisionConnection, SecretTransport};
use secret_provision::credential::WebPkiProvider;
use secret_provision::error::ResultCode;
use secret_provision::json::http::GetSecretRequest;
use secret_provision::provision::SecretProvisioner;
use serde_json::json;
use std::path::PathBuf;
use tracing_test::traced_test;

fn test_connection(server_url: &str) -> ProvisionConnection {
    let client = awc::Client::builder()
        .add_default_header((actix_web::http::header::USER_AGENT, "secret-provision/1.0"))
        .finish();
    // SAFETY: talking to a local mock, nothing to attest
    unsafe { ProvisionConnection::new_from_client_without_attestation(server_url.to_string(), client) }
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("{name}-{}", std::process::id()))
}

#[actix_web::test]
async fn transport_carries_name_and_reply() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", GetSecretRequest::URL)
        .match_body(Matcher::Json(json!({"name": "image_key"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"secret":"c2VjcmV0AA=="}"#)
        .create_async()
        .await;

    let conn = test_connection(&server.url());
    let reply = conn.send_secret_request("image_key").await.unwrap();
    assert_eq!(&*reply, "c2VjcmV0AA==");
}

#[actix_web::test]
async fn non_ok_status_surfaces_as_channel_error() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", GetSecretRequest::URL)
        .with_status(403)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"policy denied"}"#)
        .create_async()
        .await;

    let conn = test_connection(&server.url());
    let err = conn.send_secret_request("image_key").await.unwrap_err();
    match err {
        ChannelError::Status { status, message } => {
            assert_eq!(status.as_u16(), 403);
            assert!(message.contains("policy denied"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[traced_test]
#[actix_web::test]
async fn decline_is_logged_exactly_once() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", GetSecretRequest::URL)
        .with_status(403)
        .with_header("content-type", "application/json")
        .with_body(r#"{"error":"policy denied"}"#)
        .create_async()
        .await;

    let conn = test_connection(&server.url());
    let secret = secret_provision::client::get_secret(&conn, "image_key").await;
    assert!(secret.is_empty());

    // the collapse point owns the diagnostic, nothing below it logs too
    logs_assert(|lines: &[&str]| {
        match lines
            .iter()
            .filter(|line| line.contains("ERROR") && line.contains("image_key"))
            .count()
        {
            1 => Ok(()),
            n => Err(format!("expected one error record, got {n}")),
        }
    });
}

#[actix_web::test]
async fn secret_lands_in_the_file_identically_on_refetch() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", GetSecretRequest::URL)
        .match_body(Matcher::Json(json!({"name": "fs_key"})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"secret":"c2VjcmV0AA=="}"#)
        .expect(2)
        .create_async()
        .await;

    let provisioner = SecretProvisioner::new(WebPkiProvider::default());
    let path = temp_path("tee-secret-fetch-file");

    let code = provisioner
        .get_secret_to_file(&server.url(), "{}", "fs_key", &path)
        .await;
    assert_eq!(code, ResultCode::Success);
    assert_eq!(std::fs::read(&path).unwrap(), b"secret");

    let code = provisioner
        .get_secret_to_file(&server.url(), "{}", "fs_key", &path)
        .await;
    assert_eq!(code, ResultCode::Success);
    assert_eq!(std::fs::read(&path).unwrap(), b"secret");

    std::fs::remove_file(&path).unwrap();
}

#[actix_web::test]
async fn empty_secret_creates_no_file() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", GetSecretRequest::URL)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"secret":""}"#)
        .create_async()
        .await;

    let provisioner = SecretProvisioner::new(WebPkiProvider::default());
    let path = temp_path("tee-secret-fetch-empty");

    let code = provisioner
        .get_secret_to_file(&server.url(), "{}", "fs_key", &path)
        .await;
    assert_eq!(code, ResultCode::NoSecret);
    assert!(!path.exists());
}

#[actix_web::test]
async fn rpc_failure_and_decline_are_the_same_code() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", GetSecretRequest::URL)
        .with_status(500)
        .create_async()
        .await;

    let provisioner = SecretProvisioner::new(WebPkiProvider::default());
    let mut buffer = [0u8; 16];
    let mut written = 0;

    let code = provisioner
        .get_secret_to_buffer(&server.url(), "{}", "fs_key", &mut buffer, &mut written)
        .await;
    assert_eq!(code, ResultCode::NoSecret);
    assert_eq!(buffer, [0u8; 16]);
    assert_eq!(written, 0);
}

#[actix_web::test]
async fn secret_lands_in_the_buffer() {
    let mut server = Server::new_async().await;
    let _m = server
        .mock("POST", GetSecretRequest::URL)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"secret":"c2VjcmV0AA=="}"#)
        .create_async()
        .await;

    let provisioner = SecretProvisioner::new(WebPkiProvider::default());
    let mut buffer = [0u8; 16];
    let mut written = 0;

    let code = provisioner
        .get_secret_to_buffer(&server.url(), "{}", "fs_key", &mut buffer, &mut written)
        .await;
    assert_eq!(code, ResultCode::Success);
    assert_eq!(written, 6);
    assert_eq!(&buffer[..written], b"secret");
}

#[actix_web::test]
async fn undersized_buffer_is_reported_and_untouched() {
    let mut server = Server::new_async().await;
    // base64("0123456789\0"): 10 payload bytes after the terminator trim
    let _m = server
        .mock("POST", GetSecretRequest::URL)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"secret":"MDEyMzQ1Njc4OQA="}"#)
        .create_async()
        .await;

    let provisioner = SecretProvisioner::new(WebPkiProvider::default());
    let mut buffer = [0x5au8; 5];
    let mut written = 777;

    let code = provisioner
        .get_secret_to_buffer(&server.url(), "{}", "fs_key", &mut buffer, &mut written)
        .await;
    assert_eq!(code, ResultCode::BufferTooSmall);
    assert_eq!(buffer, [0x5au8; 5]);
    assert_eq!(written, 777);
}
