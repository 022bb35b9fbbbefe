// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Matter Labs

//! Error taxonomy and the stable result codes of the public entry points

use crate::codec::CodecError;

/// Stable, caller-visible result of every public secret-provisioning
/// operation. The numeric values are part of the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ResultCode {
    /// secret decoded and delivered
    Success = 0,
    /// decode produced zero length unexpectedly, or delivery I/O failed
    GeneralError = -1,
    /// malformed input to an internal step
    InvalidParam = -2,
    /// allocation or buffer construction failure
    BufferError = -3,
    /// service returned no secret (declined or transport failure)
    NoSecret = -4,
    /// destination buffer insufficient for the decoded secret
    BufferTooSmall = -5,
}

impl From<ResultCode> for i32 {
    fn from(code: ResultCode) -> i32 {
        code as i32
    }
}

/// Error returned by the fallible `fetch_secret_*` variants of the entry
/// points. Every variant maps onto exactly one [`ResultCode`].
#[derive(Debug, thiserror::Error)]
pub enum ProvisionError {
    /// A caller-supplied parameter was rejected before any request was made.
    #[error("invalid parameter: {0}")]
    InvalidParam(&'static str),
    /// The service declined to release the secret, or the transport failed.
    /// The two are deliberately indistinguishable at this level.
    #[error("service released no secret")]
    NoSecret,
    /// The encoded reply decodes to zero bytes.
    #[error("decoded secret has zero length")]
    EmptySecret,
    /// The decode buffer could not be allocated.
    #[error("allocating the decode buffer")]
    BufferAlloc(#[source] std::collections::TryReserveError),
    /// The decoded secret does not fit the destination.
    #[error("decoded length {needed} exceeds destination capacity {capacity}")]
    BufferTooSmall {
        /// bytes the decoded secret occupies
        needed: usize,
        /// bytes the destination can hold
        capacity: usize,
    },
    /// Writing the decoded secret to its destination file failed.
    #[error("writing the secret to its destination")]
    Io(#[from] std::io::Error),
}

impl ProvisionError {
    /// The stable result code this error maps to.
    pub fn code(&self) -> ResultCode {
        match self {
            ProvisionError::InvalidParam(_) => ResultCode::InvalidParam,
            ProvisionError::NoSecret => ResultCode::NoSecret,
            ProvisionError::EmptySecret => ResultCode::GeneralError,
            ProvisionError::BufferAlloc(_) => ResultCode::BufferError,
            ProvisionError::BufferTooSmall { .. } => ResultCode::BufferTooSmall,
            ProvisionError::Io(_) => ResultCode::GeneralError,
        }
    }
}

impl From<CodecError> for ProvisionError {
    fn from(err: CodecError) -> Self {
        match err {
            CodecError::InvalidInput => ProvisionError::InvalidParam("encoded secret"),
            CodecError::BufferTooSmall { needed, capacity } => {
                ProvisionError::BufferTooSmall { needed, capacity }
            }
            CodecError::Alloc(e) => ProvisionError::BufferAlloc(e),
        }
    }
}
