// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Matter Labs

//! Delivery of a decoded secret to a file or a caller buffer

use crate::client::{self, SecretTransport};
use crate::codec;
use crate::error::ProvisionError;
use std::fs;
use std::path::Path;
use tracing::debug;

/// The producing service appends one terminator byte to every payload before
/// encoding; it is trimmed from whatever is delivered.
const TERMINATOR_LEN: usize = 1;

fn payload(decoded: &[u8]) -> Result<&[u8], ProvisionError> {
    match decoded.len().checked_sub(TERMINATOR_LEN) {
        Some(n) => Ok(&decoded[..n]),
        None => Err(ProvisionError::EmptySecret),
    }
}

/// Fetch the named secret and write the decoded bytes to `path`.
///
/// The file is created or truncated only after the secret was retrieved and
/// decoded; on any failure no file is touched.
pub async fn deliver_to_file<T>(
    transport: &T,
    name: &str,
    path: &Path,
) -> Result<(), ProvisionError>
where
    T: SecretTransport + ?Sized,
{
    let encoded = client::get_secret(transport, name).await;
    if encoded.is_empty() {
        return Err(ProvisionError::NoSecret);
    }

    let decoded = codec::decode(&encoded, usize::MAX)?;
    let payload = payload(&decoded)?;

    fs::write(path, payload)?;
    debug!(
        "wrote {len} bytes of secret `{name}` to {path}",
        len = payload.len(),
        path = path.display()
    );
    Ok(())
}

/// Fetch the named secret and copy the decoded bytes into `buffer`.
///
/// The decoded length is computed from the encoded reply and checked against
/// the buffer before anything is decoded or copied; on failure neither
/// `buffer` nor `written` is touched. On success `written` holds the exact
/// number of bytes copied.
pub async fn deliver_to_buffer<T>(
    transport: &T,
    name: &str,
    buffer: &mut [u8],
    written: &mut usize,
) -> Result<(), ProvisionError>
where
    T: SecretTransport + ?Sized,
{
    let encoded = client::get_secret(transport, name).await;
    if encoded.is_empty() {
        return Err(ProvisionError::NoSecret);
    }

    let total = codec::decoded_length(&encoded)?;
    let needed = total
        .checked_sub(TERMINATOR_LEN)
        .ok_or(ProvisionError::EmptySecret)?;
    if needed > buffer.len() {
        return Err(ProvisionError::BufferTooSmall {
            needed,
            capacity: buffer.len(),
        });
    }

    // filler in the encoded reply makes the actual decode output shorter
    // than `needed`, so the copy length comes from the decoded bytes
    let decoded = codec::decode(&encoded, total)?;
    let payload = payload(&decoded)?;
    buffer[..payload.len()].copy_from_slice(payload);
    *written = payload.len();

    debug!(
        "delivered {len} bytes of secret `{name}` to the caller buffer",
        len = payload.len()
    );
    Ok(())
}
