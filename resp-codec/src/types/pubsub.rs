use protocol_resp::Value;

use crate::config::Protocol;
use crate::decode::FromReply;
use crate::error::Error;

/// A subscription confirmation such as `subscribe`, `unsubscribe` or
/// `psubscribe`, with the connection's remaining subscription count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Subscription {
    pub kind: String,
    /// Channel or pattern; `None` when unsubscribing from everything while
    /// holding no subscriptions.
    pub channel: Option<String>,
    pub count: i64,
}

impl FromReply for Subscription {
    fn from_reply(reply: &Value, protocol: Protocol) -> Result<Self, Error> {
        let items = match reply {
            Value::Array(items) => items,
            Value::Push(items) if protocol.is_resp3() => items,
            other => return Err(Error::mismatch("ARRAY", other)),
        };
        let [kind, channel, count] = items.as_slice() else {
            return Err(Error::protocol(format!(
                "expect 3 elements for a subscription, but got {}",
                items.len()
            )));
        };
        Ok(Subscription {
            kind: String::from_reply(kind, protocol)?,
            channel: Option::<String>::from_reply(channel, protocol)?,
            count: i64::from_reply(count, protocol)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;

    #[test]
    fn test_subscribe_array() {
        let reply = Value::Array(vec![
            Value::bulk_string("subscribe"),
            Value::bulk_string("news"),
            Value::Integer(1),
        ]);
        let sub: Subscription = decode(&reply, Protocol::Resp2).unwrap();
        assert_eq!(sub.kind, "subscribe");
        assert_eq!(sub.channel.as_deref(), Some("news"));
        assert_eq!(sub.count, 1);
    }

    #[test]
    fn test_unsubscribe_push_without_channel() {
        let reply = Value::Push(vec![
            Value::bulk_string("unsubscribe"),
            Value::Null,
            Value::Integer(0),
        ]);
        let sub: Subscription = decode(&reply, Protocol::Resp3).unwrap();
        assert_eq!(sub.channel, None);
        assert!(decode::<Subscription>(&reply, Protocol::Resp2).is_err());
    }

    #[test]
    fn test_wrong_count() {
        let reply = Value::bulk_array(["subscribe", "news"]);
        assert!(matches!(
            decode::<Subscription>(&reply, Protocol::Resp2),
            Err(Error::Protocol(_))
        ));
    }
}
