use protocol_resp::Value;

use crate::config::Protocol;
use crate::decode::{FromReply, decode};
use crate::error::Error;

/// The replies to a batch of commands, one per command in send order.
///
/// Decodes from an `EXEC` reply, or is built from the individual replies of
/// a [`Pipeline`](crate::Pipeline).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineResult {
    pub replies: Vec<Value>,
    /// False if any reply is nil or an error, or the transaction was aborted.
    pub all_succeeded: bool,
}

impl PipelineResult {
    pub fn from_replies(replies: Vec<Value>) -> Self {
        let all_succeeded = replies.iter().all(|r| !r.is_null() && !r.is_error());
        Self {
            replies,
            all_succeeded,
        }
    }

    pub fn len(&self) -> usize {
        self.replies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replies.is_empty()
    }

    /// Decode the reply at `index`.
    ///
    /// An error reply at that position surfaces as [`Error::Server`].
    pub fn get<T: FromReply>(&self, index: usize, protocol: Protocol) -> Result<T, Error> {
        let reply = self.replies.get(index).ok_or_else(|| {
            Error::protocol(format!(
                "pipeline reply index {index} out of range for {} replies",
                self.replies.len()
            ))
        })?;
        decode(reply, protocol)
    }

    /// Positions and texts of the error replies.
    pub fn errors(&self) -> impl Iterator<Item = (usize, String)> + '_ {
        self.replies.iter().enumerate().filter_map(|(i, reply)| {
            reply
                .error_message()
                .map(|msg| (i, String::from_utf8_lossy(msg).into_owned()))
        })
    }
}

impl FromReply for PipelineResult {
    fn from_reply(reply: &Value, _protocol: Protocol) -> Result<Self, Error> {
        match reply {
            Value::Array(items) => Ok(Self::from_replies(items.clone())),
            // EXEC after a failed WATCH
            Value::Null => Ok(PipelineResult::default()),
            other => Err(Error::mismatch("ARRAY", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_succeeded() {
        let reply = Value::Array(vec![Value::simple_string("OK"), Value::Integer(2)]);
        let result: PipelineResult = decode(&reply, Protocol::Resp2).unwrap();
        assert!(result.all_succeeded);
        assert_eq!(result.len(), 2);
        assert_eq!(result.get::<i64>(1, Protocol::Resp2).unwrap(), 2);
    }

    #[test]
    fn test_error_sub_reply() {
        let reply = Value::Array(vec![
            Value::simple_string("OK"),
            Value::error("WRONGTYPE Operation against a key holding the wrong kind of value"),
            Value::Integer(1),
        ]);
        let result: PipelineResult = decode(&reply, Protocol::Resp2).unwrap();
        assert!(!result.all_succeeded);
        assert_eq!(result.replies.len(), 3);
        assert!(result.get::<i64>(1, Protocol::Resp2).unwrap_err().is_server());
        let errors: Vec<_> = result.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].0, 1);
    }

    #[test]
    fn test_nil_sub_reply() {
        let result = PipelineResult::from_replies(vec![Value::Integer(1), Value::Null]);
        assert!(!result.all_succeeded);
    }

    #[test]
    fn test_aborted_transaction() {
        let result: PipelineResult = decode(&Value::Null, Protocol::Resp2).unwrap();
        assert!(!result.all_succeeded);
        assert!(result.is_empty());
    }

    #[test]
    fn test_index_out_of_range() {
        let result = PipelineResult::from_replies(vec![]);
        assert!(result.all_succeeded);
        assert!(matches!(
            result.get::<i64>(0, Protocol::Resp2),
            Err(Error::Protocol(_))
        ));
    }
}
