//! RESP reply values and parsing/encoding.
//!
//! RESP2 defines the following value types:
//! - Simple String: `+OK\r\n`
//! - Error: `-ERR message\r\n`
//! - Integer: `:1000\r\n`
//! - Bulk String: `$6\r\nfoobar\r\n`
//! - Null Bulk String: `$-1\r\n`
//! - Array: `*2\r\n$3\r\nfoo\r\n$3\r\nbar\r\n`
//!
//! RESP3 adds:
//! - Null: `_\r\n`
//! - Boolean: `#t\r\n` or `#f\r\n`
//! - Double: `,3.14159\r\n`
//! - Big Number: `(12345678901234567890\r\n`
//! - Bulk Error: `!<len>\r\n<error>\r\n`
//! - Verbatim String: `=<len>\r\ntxt:<data>\r\n`
//! - Map: `%<len>\r\n<key><val>...`
//! - Set: `~<len>\r\n<elem>...`
//! - Push: `><len>\r\n<elem>...`
//! - Attribute: `|<len>\r\n<attrs>...<value>`
//!
//! The parser always understands both revisions. Which kinds a caller accepts
//! for a given result type is decided above this layer.

use std::fmt;

use bytes::{BufMut, Bytes};

use crate::error::ParseError;

/// Default maximum number of elements in a single collection.
///
/// Replies such as `KEYS *` or a large `LRANGE` legitimately return big
/// arrays, so the client-side default is far above what a server would
/// accept from an untrusted peer.
pub const DEFAULT_MAX_COLLECTION_ELEMENTS: usize = 1 << 24;

/// Default maximum size of a bulk string in bytes (512MB, the server's own
/// `proto-max-bulk-len` default).
pub const DEFAULT_MAX_BULK_STRING_LEN: usize = 512 * 1024 * 1024;

/// Default maximum nesting depth for aggregate replies.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Default maximum total items across all collections in a single parse.
///
/// Caps the cumulative `Vec::with_capacity` budget of nested aggregates.
pub const DEFAULT_MAX_TOTAL_ITEMS: usize = 1 << 26;

/// Configuration options for RESP reply parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Maximum number of elements in a single collection.
    pub max_collection_elements: usize,
    /// Maximum size of a bulk string in bytes.
    pub max_bulk_string_len: usize,
    /// Maximum nesting depth for recursive structures.
    pub max_depth: usize,
    /// Maximum total items across all collections in a single parse.
    pub max_total_items: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ParseOptions {
    /// Create new parse options with default values.
    pub const fn new() -> Self {
        Self {
            max_collection_elements: DEFAULT_MAX_COLLECTION_ELEMENTS,
            max_bulk_string_len: DEFAULT_MAX_BULK_STRING_LEN,
            max_depth: DEFAULT_MAX_DEPTH,
            max_total_items: DEFAULT_MAX_TOTAL_ITEMS,
        }
    }

    /// Set the maximum collection element count.
    pub const fn max_collection_elements(mut self, count: usize) -> Self {
        self.max_collection_elements = count;
        self
    }

    /// Set the maximum bulk string length.
    pub const fn max_bulk_string_len(mut self, len: usize) -> Self {
        self.max_bulk_string_len = len;
        self
    }

    /// Set the maximum nesting depth.
    pub const fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the maximum total items across all collections.
    pub const fn max_total_items(mut self, count: usize) -> Self {
        self.max_total_items = count;
        self
    }
}

/// The type tag of a [`Value`].
///
/// `Display` renders the upper-case label used in decode error messages,
/// e.g. `expect INTEGER reply, but got STRING reply`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReplyKind {
    Error,
    Status,
    Integer,
    String,
    Nil,
    Array,
    Boolean,
    Double,
    BigNumber,
    BulkError,
    Verbatim,
    Map,
    Set,
    Push,
    Attribute,
}

impl ReplyKind {
    /// Upper-case label of this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            ReplyKind::Error => "ERROR",
            ReplyKind::Status => "STATUS",
            ReplyKind::Integer => "INTEGER",
            ReplyKind::String => "STRING",
            ReplyKind::Nil => "NIL",
            ReplyKind::Array => "ARRAY",
            ReplyKind::Boolean => "BOOLEAN",
            ReplyKind::Double => "DOUBLE",
            ReplyKind::BigNumber => "BIGNUM",
            ReplyKind::BulkError => "BULK ERROR",
            ReplyKind::Verbatim => "VERBATIM",
            ReplyKind::Map => "MAP",
            ReplyKind::Set => "SET",
            ReplyKind::Push => "PUSH",
            ReplyKind::Attribute => "ATTRIBUTE",
        }
    }
}

impl fmt::Display for ReplyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single RESP reply.
///
/// String payloads are [`Bytes`], so cloning a reply tree only bumps
/// reference counts. The tree is freed when its last owner is dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Simple string (status line): `+OK\r\n`
    SimpleString(Bytes),
    /// Error: `-ERR message\r\n`
    Error(Bytes),
    /// Integer: `:1000\r\n`
    Integer(i64),
    /// Bulk string: `$6\r\nfoobar\r\n`
    BulkString(Bytes),
    /// Null value.
    /// RESP2: `$-1\r\n` or `*-1\r\n`
    /// RESP3: `_\r\n`
    Null,
    /// Array: `*2\r\n...`
    Array(Vec<Value>),
    /// Boolean: `#t\r\n` or `#f\r\n`
    Boolean(bool),
    /// Double-precision floating point: `,3.14159\r\n`
    Double(f64),
    /// Big number, stored as its raw decimal text: `(12345678901234567890\r\n`
    BigNumber(Bytes),
    /// Bulk error: `!<len>\r\n<error>\r\n`
    BulkError(Bytes),
    /// Verbatim string: `=<len>\r\ntxt:<data>\r\n`
    VerbatimString {
        /// 3-byte format identifier (e.g., b"txt", b"mkd")
        format: [u8; 3],
        data: Bytes,
    },
    /// Map: `%<len>\r\n<key><val>...`
    Map(Vec<(Value, Value)>),
    /// Set: `~<len>\r\n<elem>...`
    Set(Vec<Value>),
    /// Push message (server-initiated): `><len>\r\n<elem>...`
    Push(Vec<Value>),
    /// Attribute (metadata attached to the next value): `|<len>\r\n<attrs>...<value>`
    Attribute {
        attrs: Vec<(Value, Value)>,
        value: Box<Value>,
    },
}

impl Value {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a simple string value.
    #[inline]
    pub fn simple_string(s: impl AsRef<[u8]>) -> Self {
        Value::SimpleString(Bytes::copy_from_slice(s.as_ref()))
    }

    /// Create an error value.
    #[inline]
    pub fn error(msg: impl AsRef<[u8]>) -> Self {
        Value::Error(Bytes::copy_from_slice(msg.as_ref()))
    }

    /// Create a bulk string value.
    #[inline]
    pub fn bulk_string(data: impl AsRef<[u8]>) -> Self {
        Value::BulkString(Bytes::copy_from_slice(data.as_ref()))
    }

    /// Create an array of bulk strings.
    pub fn bulk_array<I, T>(items: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        Value::Array(items.into_iter().map(Value::bulk_string).collect())
    }

    /// Create a verbatim string value.
    #[inline]
    pub fn verbatim_string(format: [u8; 3], data: impl AsRef<[u8]>) -> Self {
        Value::VerbatimString {
            format,
            data: Bytes::copy_from_slice(data.as_ref()),
        }
    }

    // ========================================================================
    // Type checks
    // ========================================================================

    /// Returns the type tag of this value.
    pub fn kind(&self) -> ReplyKind {
        match self {
            Value::SimpleString(_) => ReplyKind::Status,
            Value::Error(_) => ReplyKind::Error,
            Value::Integer(_) => ReplyKind::Integer,
            Value::BulkString(_) => ReplyKind::String,
            Value::Null => ReplyKind::Nil,
            Value::Array(_) => ReplyKind::Array,
            Value::Boolean(_) => ReplyKind::Boolean,
            Value::Double(_) => ReplyKind::Double,
            Value::BigNumber(_) => ReplyKind::BigNumber,
            Value::BulkError(_) => ReplyKind::BulkError,
            Value::VerbatimString { .. } => ReplyKind::Verbatim,
            Value::Map(_) => ReplyKind::Map,
            Value::Set(_) => ReplyKind::Set,
            Value::Push(_) => ReplyKind::Push,
            Value::Attribute { .. } => ReplyKind::Attribute,
        }
    }

    /// Returns true if this is a null value.
    #[inline]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true if this is an error reply (simple or bulk).
    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, Value::Error(_) | Value::BulkError(_))
    }

    /// Returns true for array-shaped values (array, map, set, push).
    #[inline]
    pub fn is_aggregate(&self) -> bool {
        matches!(
            self,
            Value::Array(_) | Value::Map(_) | Value::Set(_) | Value::Push(_)
        )
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Returns the payload of a string-like value (status, bulk, verbatim).
    #[inline]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::SimpleString(s) | Value::BulkString(s) => Some(s),
            Value::VerbatimString { data, .. } => Some(data),
            _ => None,
        }
    }

    /// Returns the message of an error reply (simple or bulk).
    #[inline]
    pub fn error_message(&self) -> Option<&[u8]> {
        match self {
            Value::Error(msg) | Value::BulkError(msg) => Some(msg),
            _ => None,
        }
    }

    /// Returns the value as an integer.
    #[inline]
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the elements of an array.
    #[inline]
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(arr) => Some(arr),
            _ => None,
        }
    }

    /// Returns the elements of an array, set or push message.
    #[inline]
    pub fn elements(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) | Value::Set(items) | Value::Push(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the entries of a map.
    #[inline]
    pub fn as_map(&self) -> Option<&[(Value, Value)]> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    /// Strips any attribute wrappers, returning the value they annotate.
    pub fn without_attributes(&self) -> &Value {
        let mut value = self;
        while let Value::Attribute { value: inner, .. } = value {
            value = inner;
        }
        value
    }

    // ========================================================================
    // Parsing
    // ========================================================================

    /// Parse a reply from a byte buffer.
    ///
    /// Returns the parsed value and the number of bytes consumed.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::Incomplete` if more data is needed to complete parsing.
    /// Returns other errors for malformed data.
    #[inline]
    pub fn parse(data: &[u8]) -> Result<(Self, usize), ParseError> {
        Self::parse_with_options(data, &ParseOptions::default())
    }

    /// Parse a reply from a byte buffer with custom limits.
    pub fn parse_with_options(
        data: &[u8],
        options: &ParseOptions,
    ) -> Result<(Self, usize), ParseError> {
        Self::parse_bytes_with_options(Bytes::copy_from_slice(data), options)
    }

    /// Parse a reply zero-copy from a `Bytes` buffer.
    ///
    /// String payloads are `Bytes::slice()` references into the input.
    #[inline]
    pub fn parse_bytes(data: Bytes) -> Result<(Self, usize), ParseError> {
        Self::parse_bytes_with_options(data, &ParseOptions::default())
    }

    /// Parse a reply zero-copy from a `Bytes` buffer with custom limits.
    pub fn parse_bytes_with_options(
        data: Bytes,
        options: &ParseOptions,
    ) -> Result<(Self, usize), ParseError> {
        let mut parser = Parser {
            data: &data,
            options,
            total_items: 0,
        };
        parser.value(0, 0)
    }

    // ========================================================================
    // Encoding
    // ========================================================================

    /// Append the wire encoding of this value to `buf`.
    ///
    /// `Null` is written in its RESP2 form (`$-1\r\n`).
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        match self {
            Value::SimpleString(s) => line(buf, b'+', s),
            Value::Error(msg) => line(buf, b'-', msg),
            Value::Integer(n) => line(buf, b':', itoa::Buffer::new().format(*n).as_bytes()),
            Value::BulkString(data) => blob(buf, b'$', data),
            Value::Null => buf.put_slice(b"$-1\r\n"),
            Value::Array(items) => {
                header(buf, b'*', items.len());
                items.iter().for_each(|v| v.encode(buf));
            }
            Value::Boolean(b) => buf.put_slice(if *b { b"#t\r\n" } else { b"#f\r\n" }),
            Value::Double(d) => line(buf, b',', format_double(&mut ryu::Buffer::new(), *d)),
            Value::BigNumber(n) => line(buf, b'(', n),
            Value::BulkError(msg) => blob(buf, b'!', msg),
            Value::VerbatimString { format, data } => {
                header(buf, b'=', data.len() + 4);
                buf.put_slice(format);
                buf.put_u8(b':');
                buf.put_slice(data);
                buf.put_slice(b"\r\n");
            }
            Value::Map(entries) => encode_entries(buf, b'%', entries),
            Value::Set(items) => {
                header(buf, b'~', items.len());
                items.iter().for_each(|v| v.encode(buf));
            }
            Value::Push(items) => {
                header(buf, b'>', items.len());
                items.iter().for_each(|v| v.encode(buf));
            }
            Value::Attribute { attrs, value } => {
                encode_entries(buf, b'|', attrs);
                value.encode(buf);
            }
        }
    }

    /// Calculate the encoded length of this value.
    pub fn encoded_len(&self) -> usize {
        let digits = |n: usize| itoa::Buffer::new().format(n).len();
        match self {
            Value::SimpleString(s) | Value::Error(s) | Value::BigNumber(s) => 1 + s.len() + 2,
            Value::Integer(n) => 1 + itoa::Buffer::new().format(*n).len() + 2,
            Value::BulkString(data) | Value::BulkError(data) => {
                1 + digits(data.len()) + 2 + data.len() + 2
            }
            Value::Null => 5,
            Value::Boolean(_) => 4,
            Value::Double(d) => 1 + format_double(&mut ryu::Buffer::new(), *d).len() + 2,
            Value::VerbatimString { data, .. } => {
                let total = data.len() + 4;
                1 + digits(total) + 2 + total + 2
            }
            Value::Array(items) | Value::Set(items) | Value::Push(items) => {
                1 + digits(items.len()) + 2 + items.iter().map(Value::encoded_len).sum::<usize>()
            }
            Value::Map(entries) => 1 + digits(entries.len()) + 2 + entries_len(entries),
            Value::Attribute { attrs, value } => {
                1 + digits(attrs.len()) + 2 + entries_len(attrs) + value.encoded_len()
            }
        }
    }

    /// Append a RESP3 null (`_\r\n`).
    #[inline]
    pub fn encode_resp3_null<B: BufMut>(buf: &mut B) {
        buf.put_slice(b"_\r\n");
    }
}

// ============================================================================
// Parser
// ============================================================================

struct Parser<'a> {
    data: &'a Bytes,
    options: &'a ParseOptions,
    total_items: usize,
}

impl Parser<'_> {
    /// Parse one value starting at `pos`; returns it with the offset after it.
    fn value(&mut self, pos: usize, depth: usize) -> Result<(Value, usize), ParseError> {
        let prefix = *self.data.get(pos).ok_or(ParseError::Incomplete)?;
        let body = pos + 1;
        match prefix {
            b'+' => {
                let end = self.line_end(body)?;
                Ok((Value::SimpleString(self.data.slice(body..end)), end + 2))
            }
            b'-' => {
                let end = self.line_end(body)?;
                Ok((Value::Error(self.data.slice(body..end)), end + 2))
            }
            b':' => {
                let (n, next) = self.integer_line(body)?;
                Ok((Value::Integer(n), next))
            }
            b'$' => {
                let (payload, next) = self.blob(body)?;
                Ok((payload.map_or(Value::Null, Value::BulkString), next))
            }
            b'*' => {
                let (len, next) = self.integer_line(body)?;
                if len < 0 {
                    return Ok((Value::Null, next));
                }
                let (items, next) = self.elements(next, len, depth)?;
                Ok((Value::Array(items), next))
            }
            b'_' => {
                let end = self.line_end(body)?;
                if end != body {
                    return Err(ParseError::Protocol("unexpected data after null".into()));
                }
                Ok((Value::Null, end + 2))
            }
            b'#' => {
                let end = self.line_end(body)?;
                match &self.data[body..end] {
                    b"t" => Ok((Value::Boolean(true), end + 2)),
                    b"f" => Ok((Value::Boolean(false), end + 2)),
                    _ => Err(ParseError::InvalidBoolean),
                }
            }
            b',' => {
                let end = self.line_end(body)?;
                let text = std::str::from_utf8(&self.data[body..end])
                    .map_err(|e| ParseError::InvalidDouble(e.to_string()))?;
                let d = text
                    .parse::<f64>()
                    .map_err(|_| ParseError::InvalidDouble(text.to_string()))?;
                Ok((Value::Double(d), end + 2))
            }
            b'(' => {
                let end = self.line_end(body)?;
                Ok((Value::BigNumber(self.data.slice(body..end)), end + 2))
            }
            b'!' => match self.blob(body)? {
                (Some(msg), next) => Ok((Value::BulkError(msg), next)),
                (None, _) => Err(ParseError::Protocol("null bulk error".into())),
            },
            b'=' => {
                let (payload, next) = self.blob(body)?;
                let payload = payload.ok_or(ParseError::InvalidVerbatimFormat)?;
                if payload.len() < 4 || payload[3] != b':' {
                    return Err(ParseError::InvalidVerbatimFormat);
                }
                let format = [payload[0], payload[1], payload[2]];
                let data = payload.slice(4..);
                Ok((Value::VerbatimString { format, data }, next))
            }
            b'%' => {
                let (len, next) = self.integer_line(body)?;
                let (entries, next) = self.entries(next, len, depth)?;
                Ok((Value::Map(entries), next))
            }
            b'~' => {
                let (len, next) = self.integer_line(body)?;
                let (items, next) = self.elements(next, len, depth)?;
                Ok((Value::Set(items), next))
            }
            b'>' => {
                let (len, next) = self.integer_line(body)?;
                let (items, next) = self.elements(next, len, depth)?;
                Ok((Value::Push(items), next))
            }
            b'|' => {
                let (len, next) = self.integer_line(body)?;
                let (attrs, next) = self.entries(next, len, depth)?;
                let (value, next) = self.value(next, depth + 1)?;
                Ok((
                    Value::Attribute {
                        attrs,
                        value: Box::new(value),
                    },
                    next,
                ))
            }
            other => Err(ParseError::InvalidPrefix(other)),
        }
    }

    /// Index of the `\r` terminating the line that starts at `start`.
    fn line_end(&self, start: usize) -> Result<usize, ParseError> {
        let rest = self.data.get(start..).ok_or(ParseError::Incomplete)?;
        let cr = memchr::memchr(b'\r', rest).ok_or(ParseError::Incomplete)?;
        match rest.get(cr + 1) {
            Some(b'\n') => Ok(start + cr),
            Some(_) => Err(ParseError::Protocol("CR not followed by LF".into())),
            None => Err(ParseError::Incomplete),
        }
    }

    fn integer_line(&self, start: usize) -> Result<(i64, usize), ParseError> {
        let end = self.line_end(start)?;
        let text = std::str::from_utf8(&self.data[start..end])
            .map_err(|e| ParseError::InvalidInteger(e.to_string()))?;
        let n = text
            .parse::<i64>()
            .map_err(|e| ParseError::InvalidInteger(format!("{text:?}: {e}")))?;
        Ok((n, end + 2))
    }

    /// Length-prefixed payload; `None` for a negative length.
    fn blob(&self, start: usize) -> Result<(Option<Bytes>, usize), ParseError> {
        let (len, data_start) = self.integer_line(start)?;
        if len < 0 {
            return Ok((None, data_start));
        }
        let len = len as usize;
        if len > self.options.max_bulk_string_len {
            return Err(ParseError::BulkStringTooLong {
                len,
                max: self.options.max_bulk_string_len,
            });
        }
        let data_end = data_start
            .checked_add(len)
            .ok_or_else(|| ParseError::InvalidInteger("length overflow".into()))?;
        let total_end = data_end + 2;
        if self.data.len() < total_end {
            return Err(ParseError::Incomplete);
        }
        if &self.data[data_end..total_end] != b"\r\n" {
            return Err(ParseError::Protocol("missing trailing CRLF".into()));
        }
        Ok((Some(self.data.slice(data_start..data_end)), total_end))
    }

    /// Validate an aggregate header against depth and size budgets.
    fn reserve(&mut self, len: i64, per_entry: usize, depth: usize) -> Result<usize, ParseError> {
        if depth >= self.options.max_depth {
            return Err(ParseError::NestingTooDeep(depth));
        }
        let len = usize::try_from(len)
            .map_err(|_| ParseError::InvalidInteger(format!("negative length {len}")))?;
        if len > self.options.max_collection_elements {
            return Err(ParseError::CollectionTooLarge(len));
        }
        self.total_items = len
            .checked_mul(per_entry)
            .and_then(|n| n.checked_add(self.total_items))
            .ok_or(ParseError::CollectionTooLarge(usize::MAX))?;
        if self.total_items > self.options.max_total_items {
            return Err(ParseError::CollectionTooLarge(self.total_items));
        }
        Ok(len)
    }

    fn elements(
        &mut self,
        mut pos: usize,
        len: i64,
        depth: usize,
    ) -> Result<(Vec<Value>, usize), ParseError> {
        let len = self.reserve(len, 1, depth)?;
        let mut items = Vec::with_capacity(len.min(1024));
        for _ in 0..len {
            let (value, next) = self.value(pos, depth + 1)?;
            items.push(value);
            pos = next;
        }
        Ok((items, pos))
    }

    fn entries(
        &mut self,
        mut pos: usize,
        len: i64,
        depth: usize,
    ) -> Result<(Vec<(Value, Value)>, usize), ParseError> {
        let len = self.reserve(len, 2, depth)?;
        let mut entries = Vec::with_capacity(len.min(1024));
        for _ in 0..len {
            let (key, next) = self.value(pos, depth + 1)?;
            let (value, next) = self.value(next, depth + 1)?;
            entries.push((key, value));
            pos = next;
        }
        Ok((entries, pos))
    }
}

// ============================================================================
// Encoding helpers
// ============================================================================

fn header<B: BufMut>(buf: &mut B, prefix: u8, len: usize) {
    buf.put_u8(prefix);
    buf.put_slice(itoa::Buffer::new().format(len).as_bytes());
    buf.put_slice(b"\r\n");
}

fn line<B: BufMut>(buf: &mut B, prefix: u8, content: &[u8]) {
    buf.put_u8(prefix);
    buf.put_slice(content);
    buf.put_slice(b"\r\n");
}

fn blob<B: BufMut>(buf: &mut B, prefix: u8, data: &[u8]) {
    header(buf, prefix, data.len());
    buf.put_slice(data);
    buf.put_slice(b"\r\n");
}

fn encode_entries<B: BufMut>(buf: &mut B, prefix: u8, entries: &[(Value, Value)]) {
    header(buf, prefix, entries.len());
    for (k, v) in entries {
        k.encode(buf);
        v.encode(buf);
    }
}

fn entries_len(entries: &[(Value, Value)]) -> usize {
    entries
        .iter()
        .map(|(k, v)| k.encoded_len() + v.encoded_len())
        .sum()
}

/// RESP3 spells non-finite doubles `inf`, `-inf` and `nan`.
fn format_double(buf: &mut ryu::Buffer, d: f64) -> &[u8] {
    if d.is_nan() {
        b"nan"
    } else if d.is_infinite() {
        if d > 0.0 { b"inf" } else { b"-inf" }
    } else {
        buf.format_finite(d).as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_all(data: &[u8]) -> Value {
        let (value, consumed) = Value::parse(data).unwrap();
        assert_eq!(consumed, data.len());
        value
    }

    #[test]
    fn test_parse_simple_string() {
        assert_eq!(parse_all(b"+OK\r\n"), Value::simple_string("OK"));
    }

    #[test]
    fn test_parse_error() {
        let value = parse_all(b"-ERR unknown command\r\n");
        assert!(value.is_error());
        assert_eq!(value.error_message(), Some(&b"ERR unknown command"[..]));
    }

    #[test]
    fn test_parse_integer() {
        assert_eq!(parse_all(b":-42\r\n"), Value::Integer(-42));
        assert!(matches!(
            Value::parse(b":abc\r\n"),
            Err(ParseError::InvalidInteger(_))
        ));
    }

    #[test]
    fn test_parse_bulk_string_and_nulls() {
        assert_eq!(parse_all(b"$6\r\nfoobar\r\n"), Value::bulk_string("foobar"));
        assert_eq!(parse_all(b"$0\r\n\r\n"), Value::bulk_string(""));
        assert_eq!(parse_all(b"$-1\r\n"), Value::Null);
        assert_eq!(parse_all(b"*-1\r\n"), Value::Null);
        assert_eq!(parse_all(b"_\r\n"), Value::Null);
    }

    #[test]
    fn test_parse_binary_bulk_string() {
        let value = parse_all(b"$4\r\n\x00\r\n\xff\r\n");
        assert_eq!(value.as_bytes(), Some(&b"\x00\r\n\xff"[..]));
    }

    #[test]
    fn test_parse_nested_array() {
        let value = parse_all(b"*2\r\n*2\r\n$1\r\na\r\n:1\r\n$-1\r\n");
        assert_eq!(
            value,
            Value::Array(vec![
                Value::Array(vec![Value::bulk_string("a"), Value::Integer(1)]),
                Value::Null,
            ])
        );
        assert_eq!(value.kind(), ReplyKind::Array);
    }

    #[test]
    fn test_parse_incomplete() {
        let inputs: [&[u8]; 6] = [
            b"",
            b"+OK",
            b"+OK\r",
            b"$6\r\nfoo",
            b"*2\r\n$1\r\na\r\n",
            b"%1\r\n+k\r\n",
        ];
        for input in inputs {
            assert_eq!(Value::parse(input), Err(ParseError::Incomplete), "{input:?}");
        }
    }

    #[test]
    fn test_parse_invalid_prefix() {
        assert_eq!(Value::parse(b"?x\r\n"), Err(ParseError::InvalidPrefix(b'?')));
    }

    #[test]
    fn test_parse_bulk_string_missing_crlf() {
        assert!(matches!(
            Value::parse(b"$3\r\nfooXX"),
            Err(ParseError::Protocol(_))
        ));
    }

    #[test]
    fn test_parse_resp3_scalars() {
        assert_eq!(parse_all(b"#t\r\n"), Value::Boolean(true));
        assert_eq!(parse_all(b"#f\r\n"), Value::Boolean(false));
        assert_eq!(Value::parse(b"#x\r\n"), Err(ParseError::InvalidBoolean));
        assert_eq!(parse_all(b",3.25\r\n"), Value::Double(3.25));
        assert_eq!(parse_all(b",-inf\r\n"), Value::Double(f64::NEG_INFINITY));
        assert!(matches!(
            Value::parse(b",abc\r\n"),
            Err(ParseError::InvalidDouble(_))
        ));
        assert_eq!(
            parse_all(b"(3492890328409238509324850943850943825024385\r\n").kind(),
            ReplyKind::BigNumber
        );
        assert_eq!(
            parse_all(b"!9\r\nERR oops!\r\n"),
            Value::BulkError(Bytes::from_static(b"ERR oops!"))
        );
    }

    #[test]
    fn test_parse_verbatim_string() {
        let value = parse_all(b"=15\r\ntxt:Some string\r\n");
        assert_eq!(value, Value::verbatim_string(*b"txt", "Some string"));
        assert_eq!(value.as_bytes(), Some(&b"Some string"[..]));
        assert_eq!(
            Value::parse(b"=3\r\ntxt\r\n"),
            Err(ParseError::InvalidVerbatimFormat)
        );
    }

    #[test]
    fn test_parse_map_set_push() {
        let map = parse_all(b"%2\r\n+first\r\n:1\r\n+second\r\n:2\r\n");
        assert_eq!(
            map.as_map().unwrap(),
            &[
                (Value::simple_string("first"), Value::Integer(1)),
                (Value::simple_string("second"), Value::Integer(2)),
            ]
        );
        let set = parse_all(b"~2\r\n+a\r\n+b\r\n");
        assert_eq!(set.elements().unwrap().len(), 2);
        let push = parse_all(b">3\r\n$7\r\nmessage\r\n$2\r\nch\r\n$2\r\nhi\r\n");
        assert_eq!(push.kind(), ReplyKind::Push);
        assert!(push.is_aggregate());
    }

    #[test]
    fn test_parse_attribute() {
        let value = parse_all(b"|1\r\n+ttl\r\n:3600\r\n:7\r\n");
        assert_eq!(value.kind(), ReplyKind::Attribute);
        assert_eq!(value.without_attributes(), &Value::Integer(7));
    }

    #[test]
    fn test_parse_bytes_zero_copy() {
        let data = Bytes::from_static(b"$5\r\nhello\r\n+tail\r\n");
        let (value, consumed) = Value::parse_bytes(data.clone()).unwrap();
        assert_eq!(consumed, 11);
        let (tail, _) = Value::parse_bytes(data.slice(consumed..)).unwrap();
        assert_eq!(value.as_bytes(), Some(&b"hello"[..]));
        assert_eq!(tail, Value::simple_string("tail"));
    }

    #[test]
    fn test_limits() {
        let options = ParseOptions::new()
            .max_collection_elements(2)
            .max_bulk_string_len(3)
            .max_depth(2)
            .max_total_items(3);
        assert_eq!(
            Value::parse_with_options(b"*3\r\n:1\r\n:2\r\n:3\r\n", &options),
            Err(ParseError::CollectionTooLarge(3))
        );
        assert_eq!(
            Value::parse_with_options(b"$4\r\nabcd\r\n", &options),
            Err(ParseError::BulkStringTooLong { len: 4, max: 3 })
        );
        assert_eq!(
            Value::parse_with_options(b"*1\r\n*1\r\n*1\r\n:1\r\n", &options),
            Err(ParseError::NestingTooDeep(2))
        );
        assert_eq!(
            Value::parse_with_options(b"*2\r\n*2\r\n:1\r\n:2\r\n:3\r\n", &options),
            Err(ParseError::CollectionTooLarge(4))
        );
    }

    #[test]
    fn test_encode_matches_wire_and_len() {
        let value = Value::Array(vec![
            Value::simple_string("OK"),
            Value::error("ERR x"),
            Value::Integer(-7),
            Value::bulk_string("foo"),
            Value::Null,
            Value::Boolean(true),
            Value::Double(1.5),
            Value::Double(f64::INFINITY),
            Value::BigNumber(Bytes::from_static(b"123456789012345678901")),
            Value::BulkError(Bytes::from_static(b"ERR y")),
            Value::verbatim_string(*b"txt", "hi"),
            Value::Map(vec![(Value::bulk_string("k"), Value::Integer(1))]),
            Value::Set(vec![Value::Integer(2)]),
            Value::Push(vec![Value::bulk_string("p")]),
            Value::Attribute {
                attrs: vec![(Value::simple_string("a"), Value::Integer(0))],
                value: Box::new(Value::Integer(9)),
            },
        ]);
        let mut buf = Vec::new();
        value.encode(&mut buf);
        assert_eq!(buf.len(), value.encoded_len());
        assert_eq!(parse_all(&buf), value);
    }

    #[test]
    fn test_encode_simple_forms() {
        let mut buf = Vec::new();
        Value::bulk_string("foobar").encode(&mut buf);
        assert_eq!(buf, b"$6\r\nfoobar\r\n");

        buf.clear();
        Value::Null.encode(&mut buf);
        Value::encode_resp3_null(&mut buf);
        assert_eq!(buf, b"$-1\r\n_\r\n");
    }

    #[test]
    fn test_reply_kind_labels() {
        assert_eq!(Value::bulk_string("x").kind().to_string(), "STRING");
        assert_eq!(Value::simple_string("x").kind().to_string(), "STATUS");
        assert_eq!(Value::Null.kind().to_string(), "NIL");
        assert_eq!(Value::Integer(1).kind().to_string(), "INTEGER");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_parse_never_panics(data in proptest::collection::vec(any::<u8>(), 0..256)) {
                let _ = Value::parse(&data);
            }

            #[test]
            fn prop_bulk_string_roundtrip(data in proptest::collection::vec(any::<u8>(), 0..128)) {
                let value = Value::bulk_string(&data);
                let mut buf = Vec::new();
                value.encode(&mut buf);
                let (parsed, consumed) = Value::parse(&buf).unwrap();
                prop_assert_eq!(consumed, buf.len());
                prop_assert_eq!(parsed, value);
            }
        }
    }
}
