//! Typed request encoding and reply decoding for RESP key-value stores.
//!
//! Built on the wire layer in [`protocol_resp`]:
//!
//! - **Encoding**: typed arguments ([`ToArgs`]) assembled into a [`Command`],
//!   which checks every argument's declared element count before framing.
//! - **Decoding**: [`FromReply`] turns a reply tree into scalars, containers
//!   or domain records ([`types`]), honouring the negotiated [`Protocol`].
//! - **Issuing**: [`Issue`] pairs the two over any [`Transport`], returning a
//!   [`Response`] synchronously or handing it to a callback.
//!
//! # Example
//!
//! ```
//! use resp_codec::{Decoder, Protocol, Config, cmd};
//! use resp_codec::types::ScanPage;
//! use bytes::Bytes;
//!
//! let wire = cmd!("SCAN", 0u64, "COUNT", 10u64).to_bytes().unwrap();
//! assert!(wire.starts_with(b"*4\r\n$4\r\nSCAN\r\n"));
//!
//! let decoder = Decoder::new(Config::new().protocol(Protocol::Resp2));
//! let reply = Bytes::from_static(b"*2\r\n$2\r\n12\r\n*2\r\n$1\r\na\r\n$1\r\nb\r\n");
//! let (page, _): (ScanPage<Vec<String>>, usize) = decoder.decode_frame(reply).unwrap();
//! assert_eq!(page.cursor, 12);
//! assert_eq!(page.items, ["a", "b"]);
//! ```

pub mod commands;
mod config;
pub mod decode;
mod encode;
mod error;
mod handler;
mod issue;
mod response;
pub mod types;

pub use commands::{KeyCommands, ScanCommands, StreamCommands};
pub use config::{Config, Protocol};
pub use decode::{Decoder, Either, FromReply, OneOf3, decode};
pub use encode::{Command, ToArgs, encode};
pub use error::Error;
pub use handler::{Callback, ReplyHandler};
pub use issue::{Issue, Pipeline, Transport};
pub use response::Response;

pub use protocol_resp::{ParseError, ParseOptions, ReplyKind, Value};
