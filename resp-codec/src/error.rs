use std::io;

use protocol_resp::{ReplyKind, Value};

/// Errors produced while encoding requests or decoding replies.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The server answered with an error reply. Carries the server's text.
    #[error("{0}")]
    Server(String),

    /// The reply kind does not match the requested result type.
    #[error("expect {expected} reply, but got {actual} reply")]
    Type {
        expected: &'static str,
        actual: ReplyKind,
    },

    /// The reply kind matched but its shape or content is invalid for the
    /// requested result type.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// The reply bytes could not be parsed.
    #[error("parse error: {0}")]
    Parse(#[from] protocol_resp::ParseError),

    /// The connection was closed before a reply was received.
    #[error("connection closed")]
    ConnectionClosed,

    /// I/O error reported by the transport.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Mismatch between the expected result type and `reply`.
    ///
    /// Error replies are reported as [`Error::Server`] with their own text,
    /// so a failed command never surfaces as a type error.
    pub fn mismatch(expected: &'static str, reply: &Value) -> Self {
        match reply.error_message() {
            Some(msg) => Error::Server(String::from_utf8_lossy(msg).into_owned()),
            None => Error::Type {
                expected,
                actual: reply.kind(),
            },
        }
    }

    pub(crate) fn protocol(msg: impl Into<String>) -> Self {
        Error::Protocol(msg.into())
    }

    /// Returns true for failures to turn a reply into the requested type
    /// (type, protocol and parse errors).
    #[inline]
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            Error::Type { .. } | Error::Protocol(_) | Error::Parse(_)
        )
    }

    /// Returns true if the server answered with an error reply.
    #[inline]
    pub fn is_server(&self) -> bool {
        matches!(self, Error::Server(_))
    }
}
