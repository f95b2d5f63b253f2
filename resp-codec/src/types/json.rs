//! Loosely typed JSON-like values decoded from arbitrary replies.

use bytes::Bytes;
use protocol_resp::Value;

use crate::config::Protocol;
use crate::decode::{FromReply, utf8};
use crate::encode::ToArgs;
use crate::error::Error;

/// A JSON-like view of a reply.
///
/// String replies spelling `true`, `false` or `null` become the matching
/// JSON literal. An array is read as an object when it has an even length
/// and every even-indexed element is a string, so `[]` is an empty object;
/// otherwise it is read as an array. Status and verbatim strings count as
/// strings here, as they carry the same text a bulk string would.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum JsonValue {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<JsonValue>),
    /// Members in reply order.
    Object(Vec<(String, JsonValue)>),
}

impl JsonValue {
    /// Parse JSON document text, e.g. the payload of `JSON.GET`.
    pub fn from_json_str(s: &str) -> Result<Self, Error> {
        serde_json::from_str::<serde_json::Value>(s)
            .map(JsonValue::from)
            .map_err(|e| Error::protocol(format!("invalid JSON document: {e}")))
    }

    /// Serialize as compact JSON text.
    pub fn to_json_string(&self) -> String {
        serde_json::Value::from(self.clone()).to_string()
    }

    pub fn is_null(&self) -> bool {
        matches!(self, JsonValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            JsonValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            JsonValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            JsonValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[JsonValue]> {
        match self {
            JsonValue::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Look up an object member by name.
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        match self {
            JsonValue::Object(members) => members.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    fn sniff(text: String) -> Self {
        match text.as_str() {
            "true" => JsonValue::Bool(true),
            "false" => JsonValue::Bool(false),
            "null" => JsonValue::Null,
            _ => JsonValue::String(text),
        }
    }
}

fn is_string(reply: &Value) -> bool {
    matches!(
        reply,
        Value::SimpleString(_) | Value::BulkString(_) | Value::VerbatimString { .. }
    )
}

fn key(reply: &Value) -> Result<String, Error> {
    match reply.as_bytes() {
        Some(bytes) => utf8(Bytes::copy_from_slice(bytes)),
        None => Err(Error::mismatch("STRING", reply)),
    }
}

impl FromReply for JsonValue {
    fn from_reply(reply: &Value, protocol: Protocol) -> Result<Self, Error> {
        let value = match reply {
            Value::Null => JsonValue::Null,
            Value::Boolean(b) => JsonValue::Bool(*b),
            Value::Integer(n) => JsonValue::Number(*n as f64),
            Value::Double(d) => JsonValue::Number(*d),
            Value::BigNumber(n) => {
                let n = std::str::from_utf8(n)
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| Error::protocol("not a number: invalid big number"))?;
                JsonValue::Number(n)
            }
            Value::SimpleString(s) | Value::BulkString(s) => JsonValue::sniff(utf8(s.clone())?),
            Value::VerbatimString { data, .. } => JsonValue::sniff(utf8(data.clone())?),
            Value::Array(items) | Value::Push(items) => {
                let object = items.len() % 2 == 0
                    && items.iter().step_by(2).all(is_string);
                if object {
                    JsonValue::Object(
                        items
                            .chunks_exact(2)
                            .map(|kv| -> Result<_, Error> {
                                Ok((key(&kv[0])?, Self::from_reply(&kv[1], protocol)?))
                            })
                            .collect::<Result<_, Error>>()?,
                    )
                } else {
                    JsonValue::Array(Self::from_reply_items(items, protocol)?)
                }
            }
            Value::Set(items) => JsonValue::Array(Self::from_reply_items(items, protocol)?),
            Value::Map(entries) => JsonValue::Object(
                entries
                    .iter()
                    .map(|(k, v)| -> Result<_, Error> { Ok((key(k)?, Self::from_reply(v, protocol)?)) })
                    .collect::<Result<_, Error>>()?,
            ),
            Value::Attribute { value, .. } => Self::from_reply(value, protocol)?,
            other => return Err(Error::mismatch("JSON", other)),
        };
        Ok(value)
    }
}

impl From<JsonValue> for serde_json::Value {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => serde_json::Value::Null,
            JsonValue::Bool(b) => serde_json::Value::Bool(b),
            JsonValue::Number(n) if n.fract() == 0.0 && n.abs() < (1u64 << 53) as f64 => {
                serde_json::Value::from(n as i64)
            }
            JsonValue::Number(n) => serde_json::Number::from_f64(n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            JsonValue::String(s) => serde_json::Value::String(s),
            JsonValue::Array(items) => items.into_iter().map(serde_json::Value::from).collect(),
            JsonValue::Object(members) => serde_json::Value::Object(
                members
                    .into_iter()
                    .map(|(k, v)| (k, serde_json::Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<serde_json::Value> for JsonValue {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => JsonValue::Null,
            serde_json::Value::Bool(b) => JsonValue::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(JsonValue::Null, JsonValue::Number),
            serde_json::Value::String(s) => JsonValue::String(s),
            serde_json::Value::Array(items) => {
                JsonValue::Array(items.into_iter().map(JsonValue::from).collect())
            }
            serde_json::Value::Object(members) => JsonValue::Object(
                members
                    .into_iter()
                    .map(|(k, v)| (k, JsonValue::from(v)))
                    .collect(),
            ),
        }
    }
}

impl ToArgs for JsonValue {
    fn arg_count(&self) -> usize {
        1
    }

    fn write_args(&self, out: &mut Vec<Bytes>) {
        out.push(Bytes::from(self.to_json_string()));
    }
}
