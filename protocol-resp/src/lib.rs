//! RESP2/RESP3 wire layer for key-value store clients.
//!
//! This crate owns the bytes-level half of the protocol:
//!
//! - **Values**: the in-memory reply tree ([`Value`]) with its type tag
//!   ([`ReplyKind`]), parsed from and encoded to the wire.
//! - **Requests**: multi-bulk command framing ([`Request`], [`encode_command`]).
//!
//! Typed decoding of replies and typed argument encoding live in `resp-codec`.
//!
//! RESP3 kinds are always recognised by the parser:
//!   - Boolean (`#t`/`#f`)
//!   - Double (`,3.14159`)
//!   - BigNumber (`(12345678901234567890`)
//!   - BulkError (`!<len>\r\n<error>`)
//!   - VerbatimString (`=<len>\r\ntxt:<data>`)
//!   - Map (`%<len>\r\n<key><val>...`)
//!   - Set (`~<len>\r\n<elem>...`)
//!   - Push (`><len>\r\n<elem>...`)
//!   - Attribute (`|<len>\r\n<attrs>...<value>`)
//!   - Null (`_\r\n`)
//!
//! # Example
//!
//! ```
//! use protocol_resp::{Request, Value};
//!
//! // Frame a GET command
//! let wire = Request::cmd("GET").arg("mykey").to_bytes();
//! assert_eq!(&wire[..], b"*2\r\n$3\r\nGET\r\n$5\r\nmykey\r\n");
//!
//! // Parse the reply
//! let (value, consumed) = Value::parse(b"$5\r\nhello\r\n").unwrap();
//! assert_eq!(consumed, 11);
//! assert_eq!(value.as_bytes(), Some(&b"hello"[..]));
//! ```

mod error;
mod request;
mod value;

pub use error::ParseError;
pub use request::{Request, encode_command};
pub use value::{
    DEFAULT_MAX_BULK_STRING_LEN, DEFAULT_MAX_COLLECTION_ELEMENTS, DEFAULT_MAX_DEPTH,
    DEFAULT_MAX_TOTAL_ITEMS, ParseOptions, ReplyKind, Value,
};
