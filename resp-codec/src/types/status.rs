use std::fmt;

use bytes::Bytes;
use protocol_resp::Value;

use crate::config::Protocol;
use crate::decode::FromReply;
use crate::encode::ToArgs;
use crate::error::Error;

/// A status line reply such as `+OK` or `+QUEUED`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Status {
    pub text: String,
}

impl Status {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Returns true if the status is exactly `OK`.
    #[inline]
    pub fn is_ok(&self) -> bool {
        self.text == "OK"
    }
}

impl From<Status> for bool {
    fn from(status: Status) -> bool {
        status.is_ok()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl FromReply for Status {
    fn from_reply(reply: &Value, _protocol: Protocol) -> Result<Self, Error> {
        match reply {
            Value::SimpleString(s) => Ok(Status {
                text: String::from_utf8_lossy(s).into_owned(),
            }),
            Value::Null => Err(Error::protocol("null reply where a status is required")),
            other => Err(Error::mismatch("STATUS", other)),
        }
    }
}

impl ToArgs for Status {
    fn arg_count(&self) -> usize {
        1
    }

    fn write_args(&self, out: &mut Vec<Bytes>) {
        out.push(Bytes::copy_from_slice(self.text.as_bytes()));
    }
}
