//! Reply decoding.
//!
//! [`FromReply`] maps a requested result type to the function that turns a
//! wire [`Value`] into it. The catalogue of implementations is closed:
//! scalars, containers, the one-of types [`Either`] and [`OneOf3`], and the
//! domain records in [`crate::types`]. A new result shape means a new
//! `FromReply` impl.

mod composite;
mod scalar;

pub use composite::{Either, OneOf3};

use bytes::Bytes;
use protocol_resp::Value;

use crate::config::{Config, Protocol};
use crate::error::Error;

/// A result type that can be decoded from a reply.
pub trait FromReply: Sized {
    /// Decode a single reply.
    fn from_reply(reply: &Value, protocol: Protocol) -> Result<Self, Error>;

    /// Decode the elements of an array reply into a sequence.
    ///
    /// Sequence and map containers call this rather than `from_reply` per
    /// element, which lets pair-shaped types consume flat
    /// `[k1, v1, k2, v2, ...]` arrays two elements at a time.
    fn from_reply_items(items: &[Value], protocol: Protocol) -> Result<Vec<Self>, Error> {
        items
            .iter()
            .map(|item| Self::from_reply(item, protocol))
            .collect()
    }

    /// Decode RESP3 map entries into a sequence.
    ///
    /// By default the map is flattened to `k1, v1, k2, v2, ...`.
    fn from_map_entries(
        entries: &[(Value, Value)],
        protocol: Protocol,
    ) -> Result<Vec<Self>, Error> {
        let mut out = Vec::with_capacity(entries.len() * 2);
        for (key, value) in entries {
            out.push(Self::from_reply(key, protocol)?);
            out.push(Self::from_reply(value, protocol)?);
        }
        Ok(out)
    }
}

/// Decode `reply` as `T`, skipping any RESP3 attribute wrapper first.
#[inline]
pub fn decode<T: FromReply>(reply: &Value, protocol: Protocol) -> Result<T, Error> {
    T::from_reply(reply.without_attributes(), protocol)
}

/// Decodes replies according to a [`Config`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    config: Config,
}

impl Decoder {
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn protocol(&self) -> Protocol {
        self.config.protocol
    }

    /// Decode an already parsed reply.
    #[inline]
    pub fn decode<T: FromReply>(&self, reply: &Value) -> Result<T, Error> {
        decode(reply, self.config.protocol)
    }

    /// Parse one framed reply from `data` and decode it.
    ///
    /// Returns the value and the number of bytes consumed. A partial frame
    /// yields `Error::Parse(ParseError::Incomplete)`.
    pub fn decode_frame<T: FromReply>(&self, data: Bytes) -> Result<(T, usize), Error> {
        let (reply, consumed) = Value::parse_bytes_with_options(data, &self.config.parse)?;
        tracing::trace!(kind = %reply.kind(), consumed, "parsed reply frame");
        Ok((self.decode(&reply)?, consumed))
    }
}

/// Split `items` into key/value pairs.
///
/// The array is treated as flat when its first element exists and is not
/// itself an aggregate; `pair` then sees adjacent elements. Otherwise every
/// element is handed to `nested` as an already paired value.
pub(crate) fn pairs<T>(
    items: &[Value],
    mut pair: impl FnMut(&Value, &Value) -> Result<T, Error>,
    mut nested: impl FnMut(&Value) -> Result<T, Error>,
) -> Result<Vec<T>, Error> {
    match items.first() {
        Some(first) if !first.is_aggregate() => {
            if items.len() % 2 != 0 {
                return Err(Error::protocol(format!(
                    "flat key/value array has odd length {}",
                    items.len()
                )));
            }
            items
                .chunks_exact(2)
                .map(|kv| pair(&kv[0], &kv[1]))
                .collect()
        }
        _ => items.iter().map(&mut nested).collect(),
    }
}

/// The elements of an array reply of exactly `len` elements.
pub(crate) fn fixed_array<'a>(
    reply: &'a Value,
    len: usize,
    what: &str,
) -> Result<&'a [Value], Error> {
    let items = reply
        .as_array()
        .ok_or_else(|| Error::mismatch("ARRAY", reply))?;
    if items.len() != len {
        return Err(Error::protocol(format!(
            "expect {len} elements for {what}, but got {}",
            items.len()
        )));
    }
    Ok(items)
}

pub(crate) use scalar::{text, utf8};
