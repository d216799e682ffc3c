//! Default binary cursor codec: versioned, length-prefixed typed values.

use time::OffsetDateTime;
use uuid::Uuid;

use crate::value::Value;

use super::{CursorCodec, DecodeError, MAX_CURSOR_VALUES, unwrap_token, wrap_token};

/// Wire format version. Bump when the layout changes; decode refuses
/// versions it does not know.
const FORMAT_VERSION: u8 = 1;

const TAG_NULL: u8 = 0;
const TAG_BOOL: u8 = 1;
const TAG_INT: u8 = 2;
const TAG_FLOAT: u8 = 3;
const TAG_STRING: u8 = 4;
const TAG_BYTES: u8 = 5;
const TAG_TIMESTAMP: u8 = 6;
const TAG_UUID: u8 = 7;

/// The default cursor codec.
///
/// Layout (before base64url wrapping):
///
/// ```text
/// version: u8 | count: u8 | count x (tag: u8, payload)
/// ```
///
/// Fixed-width payloads are little-endian; strings and byte blobs carry a
/// `u32` length prefix. Timestamps are stored as unix nanoseconds (`i128`),
/// so encoding is lossless - pair the codec with
/// [`TimestampMicros`](crate::TimestampMicros) when compact tokens matter
/// more than sub-microsecond precision.
#[derive(Debug, Clone, Copy, Default)]
#[non_exhaustive]
pub struct BinaryCodec;

impl BinaryCodec {
    /// Create the codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CursorCodec for BinaryCodec {
    /// # Panics
    ///
    /// Panics if `values` holds more than [`MAX_CURSOR_VALUES`] entries.
    /// Strategy registration enforces the same ceiling, so the paginator
    /// never trips this.
    fn encode(&self, values: &[Value]) -> String {
        assert!(
            values.len() <= MAX_CURSOR_VALUES,
            "cursor carries {} values, more than the {MAX_CURSOR_VALUES} ceiling",
            values.len()
        );
        let mut buf = Vec::with_capacity(2 + values.len() * 17);
        buf.push(FORMAT_VERSION);
        buf.push(values.len() as u8);
        for value in values {
            write_value(&mut buf, value);
        }
        wrap_token(&buf)
    }

    fn decode(&self, token: &str) -> Result<Vec<Value>, DecodeError> {
        let bytes = unwrap_token(token)?;
        let mut reader = Reader::new(&bytes);

        if reader.u8()? != FORMAT_VERSION {
            return Err(DecodeError::InvalidPayload);
        }
        let count = reader.u8()? as usize;
        if count > MAX_CURSOR_VALUES {
            return Err(DecodeError::TooManyValues);
        }

        let mut values = Vec::with_capacity(count);
        for _ in 0..count {
            values.push(read_value(&mut reader)?);
        }
        if !reader.is_empty() {
            // Trailing bytes mean the count lied about the payload shape.
            return Err(DecodeError::InvalidPayload);
        }
        Ok(values)
    }
}

fn write_value(buf: &mut Vec<u8>, value: &Value) {
    match value {
        Value::Null => buf.push(TAG_NULL),
        Value::Bool(b) => {
            buf.push(TAG_BOOL);
            buf.push(u8::from(*b));
        },
        Value::Int(i) => {
            buf.push(TAG_INT);
            buf.extend_from_slice(&i.to_le_bytes());
        },
        Value::Float(f) => {
            buf.push(TAG_FLOAT);
            buf.extend_from_slice(&f.to_le_bytes());
        },
        Value::String(s) => {
            buf.push(TAG_STRING);
            write_blob(buf, s.as_bytes());
        },
        Value::Bytes(b) => {
            buf.push(TAG_BYTES);
            write_blob(buf, b);
        },
        Value::Timestamp(ts) => {
            buf.push(TAG_TIMESTAMP);
            buf.extend_from_slice(&ts.unix_timestamp_nanos().to_le_bytes());
        },
        Value::Uuid(u) => {
            buf.push(TAG_UUID);
            buf.extend_from_slice(u.as_bytes());
        },
    }
}

fn write_blob(buf: &mut Vec<u8>, blob: &[u8]) {
    // Sort keys are small; the u32 prefix is a fixed-layout choice.
    buf.extend_from_slice(&(blob.len() as u32).to_le_bytes());
    buf.extend_from_slice(blob);
}

fn read_value(reader: &mut Reader<'_>) -> Result<Value, DecodeError> {
    match reader.u8()? {
        TAG_NULL => Ok(Value::Null),
        TAG_BOOL => match reader.u8()? {
            0 => Ok(Value::Bool(false)),
            1 => Ok(Value::Bool(true)),
            _ => Err(DecodeError::InvalidPayload),
        },
        TAG_INT => Ok(Value::Int(i64::from_le_bytes(reader.array()?))),
        TAG_FLOAT => Ok(Value::Float(f64::from_le_bytes(reader.array()?))),
        TAG_STRING => {
            let blob = reader.blob()?;
            String::from_utf8(blob.to_vec())
                .map(Value::String)
                .map_err(|_| DecodeError::InvalidPayload)
        },
        TAG_BYTES => Ok(Value::Bytes(reader.blob()?.to_vec())),
        TAG_TIMESTAMP => {
            let nanos = i128::from_le_bytes(reader.array()?);
            OffsetDateTime::from_unix_timestamp_nanos(nanos)
                .map(Value::Timestamp)
                .map_err(|_| DecodeError::InvalidPayload)
        },
        TAG_UUID => Ok(Value::Uuid(Uuid::from_bytes(reader.array()?))),
        // Unknown tags are refused outright - untrusted bytes never
        // materialize shapes this crate does not define.
        _ => Err(DecodeError::InvalidPayload),
    }
}

/// Bounds-checked cursor over the decoded payload.
struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    const fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    fn u8(&mut self) -> Result<u8, DecodeError> {
        let (first, rest) = self.buf.split_first().ok_or(DecodeError::InvalidPayload)?;
        self.buf = rest;
        Ok(*first)
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if len > self.buf.len() {
            return Err(DecodeError::InvalidPayload);
        }
        let (head, rest) = self.buf.split_at(len);
        self.buf = rest;
        Ok(head)
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let slice = self.take(N)?;
        slice.try_into().map_err(|_| DecodeError::InvalidPayload)
    }

    fn blob(&mut self) -> Result<&'a [u8], DecodeError> {
        let len = u32::from_le_bytes(self.array()?) as usize;
        self.take(len)
    }

    const fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
