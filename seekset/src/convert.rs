//! Per-kind value conversion applied around the cursor codec.
//!
//! Converters shrink cursor tokens by swapping a value for a more compact
//! portable form before encoding and restoring it after decoding. The
//! default for every kind is identity; registration is opt-in per
//! [`ValueKind`].

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;
use time::OffsetDateTime;

use crate::value::{Value, ValueKind};

/// A reversible transformation applied to one kind of sort-key value.
///
/// `from_portable` must be the exact inverse of `to_portable`:
/// `from_portable(to_portable(v)) == v` for every value of the registered
/// kind. Pagination relies on this - the restored value feeds straight
/// into the seek predicate.
pub trait ValueConverter: fmt::Debug + Send + Sync {
    /// Transform a raw value into its portable form (applied before
    /// encoding).
    fn to_portable(&self, value: Value) -> Value;

    /// Restore a portable value (applied after decoding).
    fn from_portable(&self, value: Value) -> Result<Value, ConversionError>;
}

/// A portable value that cannot be converted back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot restore a {expected:?} value from a portable {actual:?}")]
#[non_exhaustive]
pub struct ConversionError {
    /// The kind the converter restores.
    pub expected: ValueKind,
    /// The kind the portable value actually had.
    pub actual: ValueKind,
}

/// Converter registry keyed by [`ValueKind`], with an identity default.
///
/// Lookup consults the sort column's declared kind first and falls back to
/// the value's runtime kind when the column declares none. A converter
/// that changes the wire kind (such as [`TimestampMicros`], which encodes
/// timestamps as integers) therefore only round-trips for columns that
/// declare their kind - the decoded integer alone cannot name the
/// converter that produced it.
#[derive(Debug, Default)]
pub struct ConverterRegistry {
    by_kind: BTreeMap<ValueKind, Box<dyn ValueConverter>>,
}

impl ConverterRegistry {
    /// Create an empty registry: every kind passes through unchanged.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a converter for one kind, replacing any previous one.
    pub fn register(&mut self, kind: ValueKind, converter: impl ValueConverter + 'static) {
        self.by_kind.insert(kind, Box::new(converter));
    }

    /// The converter registered for a kind, if any.
    #[must_use]
    pub fn get(&self, kind: ValueKind) -> Option<&dyn ValueConverter> {
        self.by_kind.get(&kind).map(AsRef::as_ref)
    }

    /// Apply the outbound conversion for a column.
    pub(crate) fn to_portable(&self, declared: Option<ValueKind>, value: Value) -> Value {
        let kind = declared.unwrap_or_else(|| value.kind());
        match self.by_kind.get(&kind) {
            Some(converter) => converter.to_portable(value),
            None => value,
        }
    }

    /// Apply the inbound conversion for a column.
    pub(crate) fn from_portable(
        &self,
        declared: Option<ValueKind>,
        value: Value,
    ) -> Result<Value, ConversionError> {
        let kind = declared.unwrap_or_else(|| value.kind());
        match self.by_kind.get(&kind) {
            Some(converter) => converter.from_portable(value),
            None => Ok(value),
        }
    }
}

/// Built-in converter: timestamps as epoch microseconds.
///
/// Cuts a timestamp from 16 wire bytes down to 8 (and to a short integer
/// in JSON tokens). Sub-microsecond precision is truncated, so register
/// this only when sort keys carry at most microsecond precision -
/// otherwise the round-trip is no longer exact.
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampMicros;

impl ValueConverter for TimestampMicros {
    fn to_portable(&self, value: Value) -> Value {
        match value {
            Value::Timestamp(ts) => {
                Value::Int((ts.unix_timestamp_nanos() / 1_000) as i64)
            },
            other => other,
        }
    }

    fn from_portable(&self, value: Value) -> Result<Value, ConversionError> {
        match value {
            Value::Int(micros) => OffsetDateTime::from_unix_timestamp_nanos(
                i128::from(micros) * 1_000,
            )
            .map(Value::Timestamp)
            .map_err(|_| ConversionError {
                expected: ValueKind::Timestamp,
                actual: ValueKind::Int,
            }),
            other => Err(ConversionError {
                expected: ValueKind::Timestamp,
                actual: other.kind(),
            }),
        }
    }
}
