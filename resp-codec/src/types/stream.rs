//! Stream identifiers and entries (`XADD`, `XRANGE`, `XREAD`).

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use protocol_resp::Value;

use crate::config::Protocol;
use crate::decode::{FromReply, fixed_array, text, utf8};
use crate::encode::ToArgs;
use crate::error::Error;

/// A stream entry id, `<timestamp>-<sequence>`.
///
/// Ids order by timestamp, then sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StreamId {
    pub timestamp: i64,
    pub sequence: i64,
}

impl StreamId {
    pub const fn new(timestamp: i64, sequence: i64) -> Self {
        Self {
            timestamp,
            sequence,
        }
    }
}

impl FromStr for StreamId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (timestamp, sequence) = s
            .split_once('-')
            .ok_or_else(|| Error::protocol(format!("invalid stream id {s:?}: missing '-'")))?;
        let half = |part: &str| {
            part.parse::<i64>()
                .map_err(|_| Error::protocol(format!("invalid stream id {s:?}")))
        };
        Ok(StreamId {
            timestamp: half(timestamp)?,
            sequence: half(sequence)?,
        })
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.timestamp, self.sequence)
    }
}

impl FromReply for StreamId {
    fn from_reply(reply: &Value, protocol: Protocol) -> Result<Self, Error> {
        utf8(text(reply, protocol)?)?.parse()
    }
}

impl ToArgs for StreamId {
    fn arg_count(&self) -> usize {
        1
    }

    fn write_args(&self, out: &mut Vec<Bytes>) {
        out.push(Bytes::from(self.to_string()));
    }
}

/// One stream entry: its id and field/value pairs in wire order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamEntry {
    pub id: StreamId,
    pub fields: Vec<(String, String)>,
}

impl StreamEntry {
    /// The value of the first field named `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }
}

impl FromReply for StreamEntry {
    fn from_reply(reply: &Value, protocol: Protocol) -> Result<Self, Error> {
        let items = fixed_array(reply, 2, "a stream entry")?;
        let id = StreamId::from_reply(&items[0], protocol)?;
        // Entries deleted while still referenced by a consumer group carry a
        // nil field array.
        let fields = match &items[1] {
            Value::Null => Vec::new(),
            fields => Vec::<(String, String)>::from_reply(fields, protocol)?,
        };
        Ok(StreamEntry { id, fields })
    }
}

impl ToArgs for StreamEntry {
    fn arg_count(&self) -> usize {
        1 + 2 * self.fields.len()
    }

    fn write_args(&self, out: &mut Vec<Bytes>) {
        self.id.write_args(out);
        for (field, value) in &self.fields {
            out.push(Bytes::copy_from_slice(field.as_bytes()));
            out.push(Bytes::copy_from_slice(value.as_bytes()));
        }
    }
}
