use protocol_resp::Value;

use crate::config::Protocol;
use crate::decode::{FromReply, decode};
use crate::error::Error;

/// The outcome of one command.
///
/// A failed response carries the error text and `T::default()` as its value;
/// the raw reply is kept whenever one arrived.
#[derive(Debug, Clone, PartialEq)]
pub struct Response<T> {
    ok: bool,
    value: T,
    raw: Option<Value>,
    error: Option<String>,
}

impl<T> Response<T> {
    pub fn success(value: T, raw: Value) -> Self {
        Self {
            ok: true,
            value,
            raw: Some(raw),
            error: None,
        }
    }

    pub fn failure(raw: Option<Value>, error: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            ok: false,
            value: T::default(),
            raw,
            error: Some(error.into()),
        }
    }

    #[inline]
    pub fn is_ok(&self) -> bool {
        self.ok
    }

    #[inline]
    pub fn value(&self) -> &T {
        &self.value
    }

    pub fn into_value(self) -> T {
        self.value
    }

    /// The decoded value, or `None` if the command failed.
    pub fn ok(self) -> Option<T> {
        self.ok.then_some(self.value)
    }

    #[inline]
    pub fn raw(&self) -> Option<&Value> {
        self.raw.as_ref()
    }

    pub fn into_raw(self) -> Option<Value> {
        self.raw
    }

    #[inline]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

fn server_error(reply: &Value) -> Option<String> {
    reply
        .without_attributes()
        .error_message()
        .map(|msg| String::from_utf8_lossy(msg).into_owned())
}

impl<T: FromReply + Default> Response<T> {
    /// Decode `reply` for a caller waiting on the result.
    ///
    /// An error reply becomes a failed response; a reply that does not
    /// decode as `T` is returned as `Err`.
    pub fn from_reply(reply: Value, protocol: Protocol) -> Result<Self, Error> {
        if let Some(error) = server_error(&reply) {
            return Ok(Self::failure(Some(reply), error));
        }
        let value = decode(&reply, protocol)?;
        Ok(Self::success(value, reply))
    }

    /// Decode `reply` for a callback. Never fails: decode errors become a
    /// failed response as well.
    pub fn settle(reply: Value, protocol: Protocol) -> Self {
        if let Some(error) = server_error(&reply) {
            return Self::failure(Some(reply), error);
        }
        match decode(&reply, protocol) {
            Ok(value) => Self::success(value, reply),
            Err(err) => {
                tracing::debug!(kind = %reply.kind(), error = %err, "reply decode failed");
                Self::failure(Some(reply), err.to_string())
            }
        }
    }
}
