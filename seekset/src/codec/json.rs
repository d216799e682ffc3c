//! Alternate JSON cursor codec.

use miniserde::json::{self, Array, Number, Value as JsonValue};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::value::Value;

use super::{CursorCodec, DecodeError, MAX_CURSOR_VALUES, unwrap_token, wrap_token};

/// Wire format version carried as the first array element.
const FORMAT_VERSION: u64 = 1;

/// JSON cursor codec for hosts that prefer inspectable tokens.
///
/// The payload is `[1, [value, ...]]` where each value is a `[tag, body]`
/// pair: `["null"]`, `["bool", true]`, `["int", 42]`, `["float", 1.5]`,
/// `["str", "..."]`, `["bytes", "<base64url>"]`, `["ts", "<unix-nanos>"]`,
/// `["uuid", "<hyphenated>"]`. The tag set is closed; anything else is
/// rejected at decode time. The JSON text is then base64url-wrapped like
/// every other cursor token.
///
/// Non-finite floats are not representable in JSON and do not survive this
/// codec; use [`BinaryCodec`](super::BinaryCodec) if sort keys can carry
/// them.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct JsonCodec;

impl JsonCodec {
    /// Create the codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CursorCodec for JsonCodec {
    /// # Panics
    ///
    /// Panics if `values` holds more than [`MAX_CURSOR_VALUES`] entries,
    /// mirroring the binary codec's contract.
    fn encode(&self, values: &[Value]) -> String {
        assert!(
            values.len() <= MAX_CURSOR_VALUES,
            "cursor carries {} values, more than the {MAX_CURSOR_VALUES} ceiling",
            values.len()
        );
        let mut items = Array::new();
        for value in values {
            items.push(to_json(value));
        }
        let mut envelope = Array::new();
        envelope.push(JsonValue::Number(Number::U64(FORMAT_VERSION)));
        envelope.push(JsonValue::Array(items));
        wrap_token(json::to_string(&JsonValue::Array(envelope)).as_bytes())
    }

    fn decode(&self, token: &str) -> Result<Vec<Value>, DecodeError> {
        let bytes = unwrap_token(token)?;
        let text = std::str::from_utf8(&bytes).map_err(|_| DecodeError::InvalidPayload)?;
        let envelope: JsonValue =
            json::from_str(text).map_err(|_| DecodeError::InvalidPayload)?;

        let parts = match &envelope {
            JsonValue::Array(parts) if parts.len() == 2 => parts,
            _ => return Err(DecodeError::InvalidPayload),
        };
        match parts.first() {
            Some(JsonValue::Number(Number::U64(FORMAT_VERSION))) => {},
            _ => return Err(DecodeError::InvalidPayload),
        }
        let items = match parts.get(1) {
            Some(JsonValue::Array(items)) => items,
            _ => return Err(DecodeError::InvalidPayload),
        };
        if items.len() > MAX_CURSOR_VALUES {
            return Err(DecodeError::TooManyValues);
        }

        items.iter().map(from_json).collect()
    }
}

fn to_json(value: &Value) -> JsonValue {
    let mut pair = Array::new();
    match value {
        Value::Null => pair.push(JsonValue::String("null".into())),
        Value::Bool(b) => {
            pair.push(JsonValue::String("bool".into()));
            pair.push(JsonValue::Bool(*b));
        },
        Value::Int(i) => {
            pair.push(JsonValue::String("int".into()));
            pair.push(JsonValue::Number(Number::I64(*i)));
        },
        Value::Float(f) => {
            pair.push(JsonValue::String("float".into()));
            pair.push(JsonValue::Number(Number::F64(*f)));
        },
        Value::String(s) => {
            pair.push(JsonValue::String("str".into()));
            pair.push(JsonValue::String(s.clone()));
        },
        Value::Bytes(b) => {
            pair.push(JsonValue::String("bytes".into()));
            pair.push(JsonValue::String(wrap_token(b)));
        },
        Value::Timestamp(ts) => {
            pair.push(JsonValue::String("ts".into()));
            pair.push(JsonValue::String(ts.unix_timestamp_nanos().to_string()));
        },
        Value::Uuid(u) => {
            pair.push(JsonValue::String("uuid".into()));
            pair.push(JsonValue::String(u.to_string()));
        },
    }
    JsonValue::Array(pair)
}

fn from_json(item: &JsonValue) -> Result<Value, DecodeError> {
    let pair = match item {
        JsonValue::Array(pair) if !pair.is_empty() && pair.len() <= 2 => pair,
        _ => return Err(DecodeError::InvalidPayload),
    };
    let tag = match pair.first() {
        Some(JsonValue::String(tag)) => tag.as_str(),
        _ => return Err(DecodeError::InvalidPayload),
    };
    let body = pair.get(1);

    match (tag, body) {
        ("null", None) => Ok(Value::Null),
        ("bool", Some(JsonValue::Bool(b))) => Ok(Value::Bool(*b)),
        ("int", Some(JsonValue::Number(n))) => match n {
            Number::I64(i) => Ok(Value::Int(*i)),
            Number::U64(u) => i64::try_from(*u)
                .map(Value::Int)
                .map_err(|_| DecodeError::InvalidPayload),
            Number::F64(_) => Err(DecodeError::InvalidPayload),
        },
        ("float", Some(JsonValue::Number(n))) => match n {
            Number::F64(f) => Ok(Value::Float(*f)),
            // "1e3"-style inputs parse as integers; accept them as floats
            Number::I64(i) => Ok(Value::Float(*i as f64)),
            Number::U64(u) => Ok(Value::Float(*u as f64)),
        },
        ("str", Some(JsonValue::String(s))) => Ok(Value::String(s.clone())),
        ("bytes", Some(JsonValue::String(s))) => unwrap_token(s)
            .map(Value::Bytes)
            .map_err(|_| DecodeError::InvalidPayload),
        ("ts", Some(JsonValue::String(s))) => {
            let nanos: i128 = s.parse().map_err(|_| DecodeError::InvalidPayload)?;
            OffsetDateTime::from_unix_timestamp_nanos(nanos)
                .map(Value::Timestamp)
                .map_err(|_| DecodeError::InvalidPayload)
        },
        ("uuid", Some(JsonValue::String(s))) => Uuid::parse_str(s)
            .map(Value::Uuid)
            .map_err(|_| DecodeError::InvalidPayload),
        // Unknown tags are refused, never interned.
        _ => Err(DecodeError::InvalidPayload),
    }
}
