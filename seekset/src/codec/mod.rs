//! Opaque cursor codecs.
//!
//! A cursor is the ordered tuple of sort-key values for one row, serialized
//! into a URL-safe opaque token. The default [`BinaryCodec`] uses a
//! versioned, length-prefixed binary layout; the alternate [`JsonCodec`]
//! produces tagged JSON for hosts that want inspectable tokens. Both wrap
//! their payload in unpadded base64url, so tokens survive query strings and
//! headers without further escaping.
//!
//! Callers must treat tokens as opaque: the wire layout is an internal
//! choice, not a contract.
//!
//! # Security
//!
//! Cursor tokens arrive from untrusted clients. Decoding enforces a hard
//! byte ceiling and a value-count ceiling before any allocation scales with
//! input, and only the closed [`Value`] tag set is ever materialized -
//! unknown tags are rejected, never interned. Tokens are encoded, not
//! encrypted: do not put sensitive data in sort keys, and validate decoded
//! values against expected ranges if tampering matters.

mod binary;
mod json;

pub use binary::BinaryCodec;
pub use json::JsonCodec;

use std::fmt;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use thiserror::Error;

use crate::value::Value;

/// Maximum encoded token length in bytes accepted by `decode`.
///
/// Oversized tokens are rejected before base64 decoding to bound the work
/// an adversarial client can cause.
pub const MAX_CURSOR_BYTES: usize = 8 * 1024;

/// Maximum number of values a decoded cursor may carry.
pub const MAX_CURSOR_VALUES: usize = 64;

/// The two-function cursor codec contract.
///
/// `decode(encode(values)) == values` must hold for every value list a
/// strategy can produce; beyond that, implementations are free to pick any
/// wire layout. Codecs are selected per [`Paginator`](crate::Paginator) or
/// per call.
pub trait CursorCodec: fmt::Debug + Send + Sync {
    /// Serialize an ordered value list into an opaque token.
    fn encode(&self, values: &[Value]) -> String;

    /// Parse an opaque token back into its ordered value list.
    fn decode(&self, token: &str) -> Result<Vec<Value>, DecodeError>;
}

/// Errors from decoding an opaque cursor token.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum DecodeError {
    /// The token is not valid URL-safe base64.
    #[error("cursor token is not valid base64url")]
    InvalidEncoding,
    /// The decoded payload is not a well-formed value list.
    #[error("cursor payload is malformed")]
    InvalidPayload,
    /// The token exceeds [`MAX_CURSOR_BYTES`].
    #[error("cursor token exceeds the {}-byte limit", MAX_CURSOR_BYTES)]
    TooLarge,
    /// The payload carries more than [`MAX_CURSOR_VALUES`] values.
    #[error("cursor carries more than {} values", MAX_CURSOR_VALUES)]
    TooManyValues,
}

/// Wrap a serialized payload in unpadded base64url.
pub(crate) fn wrap_token(payload: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(payload)
}

/// Unwrap a base64url token, enforcing the byte ceiling first.
pub(crate) fn unwrap_token(token: &str) -> Result<Vec<u8>, DecodeError> {
    if token.len() > MAX_CURSOR_BYTES {
        return Err(DecodeError::TooLarge);
    }
    URL_SAFE_NO_PAD
        .decode(token)
        .map_err(|_| DecodeError::InvalidEncoding)
}
