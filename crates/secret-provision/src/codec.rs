// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Matter Labs

//! Decoder for the textual wire encoding of secret material
//!
//! The provisioning service transmits secrets base64-encoded, with `=`
//! padding. The decoder here is deliberately lenient for wire compatibility
//! with the producing service: bytes outside the alphabet are skipped as
//! filler instead of rejected, and `=` decodes as zero bits inside its group.

use zeroize::Zeroizing;

/// Error returned by the wire decoder.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The encoded input is empty, or shorter than its own padding.
    #[error("empty or malformed encoded input")]
    InvalidInput,
    /// The decoded secret does not fit the destination.
    #[error("decoded length {needed} exceeds destination capacity {capacity}")]
    BufferTooSmall {
        /// bytes the decoded secret occupies
        needed: usize,
        /// bytes the destination can hold
        capacity: usize,
    },
    /// The decode buffer could not be allocated.
    #[error("allocating the decode buffer")]
    Alloc(#[from] std::collections::TryReserveError),
}

const fn build_decode_table() -> [i8; 256] {
    let mut table = [-1i8; 256];
    let mut i = 0;
    while i < 26 {
        table[(b'A' + i) as usize] = i as i8;
        table[(b'a' + i) as usize] = (26 + i) as i8;
        i += 1;
    }
    let mut i = 0;
    while i < 10 {
        table[(b'0' + i) as usize] = (52 + i) as i8;
        i += 1;
    }
    table[b'+' as usize] = 62;
    table[b'/' as usize] = 63;
    // `=` carries zero bits but still completes its group
    table[b'=' as usize] = 0;
    table
}

static DECODE_TABLE: [i8; 256] = build_decode_table();

/// Number of raw bytes an encoded string decodes to, computed from its
/// length and trailing padding alone, without decoding anything.
pub fn decoded_length(encoded: &str) -> Result<usize, CodecError> {
    if encoded.is_empty() {
        return Err(CodecError::InvalidInput);
    }
    let bytes = encoded.as_bytes();
    let padding = if bytes.ends_with(b"==") {
        2
    } else if bytes.ends_with(b"=") {
        1
    } else {
        0
    };
    (bytes.len() * 3 / 4)
        .checked_sub(padding)
        .ok_or(CodecError::InvalidInput)
}

/// Decode an encoded secret into raw bytes.
///
/// Fails with [`CodecError::BufferTooSmall`] before allocating anything if
/// the decoded length exceeds `capacity`. The returned buffer holds at most
/// [`decoded_length`] bytes (filler in the input reduces the actual count)
/// and is wiped on drop.
pub fn decode(encoded: &str, capacity: usize) -> Result<Zeroizing<Vec<u8>>, CodecError> {
    let needed = decoded_length(encoded)?;
    if needed > capacity {
        return Err(CodecError::BufferTooSmall { needed, capacity });
    }

    // full groups emit up to `needed + 2` bytes before the final truncate
    let mut buf = Vec::new();
    buf.try_reserve_exact(needed + 2)?;
    let mut out = Zeroizing::new(buf);

    let mut group = [0u8; 4];
    let mut filled = 0;
    for &b in encoded.as_bytes() {
        let v = DECODE_TABLE[b as usize];
        if v < 0 {
            // filler, skipped rather than rejected
            continue;
        }
        group[filled] = v as u8;
        filled += 1;
        if filled == 4 {
            out.push(group[0] << 2 | group[1] >> 4);
            out.push(group[1] << 4 | group[2] >> 2);
            out.push(group[2] << 6 | group[3]);
            filled = 0;
        }
    }

    out.truncate(needed);
    Ok(out)
}
