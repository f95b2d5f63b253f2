use bytes::Bytes;
use protocol_resp::Value;

use super::FromReply;
use crate::config::Protocol;
use crate::error::Error;

/// The text payload of a string-like reply.
///
/// Accepts status and bulk strings, plus verbatim strings and big numbers
/// under RESP3. A RESP2 array read as text is the `PONG` a subscribed
/// connection answers to `PING` with.
pub(crate) fn text(reply: &Value, protocol: Protocol) -> Result<Bytes, Error> {
    match reply {
        Value::SimpleString(s) | Value::BulkString(s) => Ok(s.clone()),
        Value::VerbatimString { data, .. } if protocol.is_resp3() => Ok(data.clone()),
        Value::BigNumber(n) if protocol.is_resp3() => Ok(n.clone()),
        Value::Array(_) if !protocol.is_resp3() => Ok(Bytes::from_static(b"PONG")),
        Value::Null => Err(Error::protocol("null reply where a string is required")),
        other => Err(Error::mismatch("STRING", other)),
    }
}

pub(crate) fn utf8(bytes: Bytes) -> Result<String, Error> {
    String::from_utf8(bytes.into()).map_err(|e| {
        Error::protocol(format!("invalid UTF-8 in string reply: {}", e.utf8_error()))
    })
}

impl FromReply for Value {
    #[inline]
    fn from_reply(reply: &Value, _protocol: Protocol) -> Result<Self, Error> {
        Ok(reply.clone())
    }
}

impl FromReply for Bytes {
    #[inline]
    fn from_reply(reply: &Value, protocol: Protocol) -> Result<Self, Error> {
        text(reply, protocol)
    }
}

impl FromReply for String {
    fn from_reply(reply: &Value, protocol: Protocol) -> Result<Self, Error> {
        utf8(text(reply, protocol)?)
    }
}

macro_rules! integer_from_reply {
    ($($t:ty),+) => {$(
        impl FromReply for $t {
            fn from_reply(reply: &Value, _protocol: Protocol) -> Result<Self, Error> {
                match reply {
                    Value::Integer(n) => <$t>::try_from(*n).map_err(|_| {
                        Error::protocol(format!(
                            "integer reply {n} out of range for {}",
                            stringify!($t)
                        ))
                    }),
                    other => Err(Error::mismatch("INTEGER", other)),
                }
            }
        }
    )+};
}

integer_from_reply!(i64, i32, i16, isize, u64, u32, u16, usize);

fn parse_double(text: &[u8]) -> Result<f64, Error> {
    let s = std::str::from_utf8(text)
        .map_err(|_| Error::protocol("not a number: invalid UTF-8"))?
        .trim();
    let d: f64 = s
        .parse()
        .map_err(|_| Error::protocol(format!("not a number: {s:?}")))?;
    if d.is_infinite() && !is_infinity(s) {
        return Err(Error::protocol(format!("out of range: {s:?}")));
    }
    Ok(d)
}

fn is_infinity(s: &str) -> bool {
    let s = s.trim_start_matches(['+', '-']);
    s.eq_ignore_ascii_case("inf") || s.eq_ignore_ascii_case("infinity")
}

impl FromReply for f64 {
    fn from_reply(reply: &Value, protocol: Protocol) -> Result<Self, Error> {
        match reply {
            Value::Double(d) if protocol.is_resp3() => Ok(*d),
            Value::Integer(n) if protocol.is_resp3() => Ok(*n as f64),
            other => parse_double(&text(other, protocol)?),
        }
    }
}

impl FromReply for f32 {
    fn from_reply(reply: &Value, protocol: Protocol) -> Result<Self, Error> {
        let d = f64::from_reply(reply, protocol)?;
        if d.is_finite() && d.abs() > f32::MAX as f64 {
            return Err(Error::protocol(format!("out of range for f32: {d}")));
        }
        Ok(d as f32)
    }
}

impl FromReply for bool {
    fn from_reply(reply: &Value, protocol: Protocol) -> Result<Self, Error> {
        match reply {
            Value::Null => Ok(false),
            Value::Boolean(b) if protocol.is_resp3() => Ok(*b),
            Value::Integer(0) => Ok(false),
            Value::Integer(1) => Ok(true),
            Value::Integer(n) => Err(Error::protocol(format!("invalid bool reply: {n}"))),
            other if protocol.is_resp3() => Err(Error::mismatch("BOOLEAN", other)),
            other => Err(Error::mismatch("INTEGER", other)),
        }
    }
}
