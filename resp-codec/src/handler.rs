//! One-shot reply handlers for callback-style issuing.

use std::marker::PhantomData;

use protocol_resp::Value;

use crate::config::Protocol;
use crate::decode::FromReply;
use crate::error::Error;
use crate::response::Response;

/// Consumes the reply to exactly one command.
///
/// Both methods take `self: Box<Self>`, so a handler runs at most once; a
/// transport that accepted a handler must call one of them exactly once.
pub trait ReplyHandler: Send {
    /// The reply arrived.
    fn handle(self: Box<Self>, reply: Value);

    /// No reply will arrive, e.g. the connection closed.
    fn fail(self: Box<Self>, error: Error);
}

/// Decodes the reply as `T` and passes a [`Response`] to a callback.
pub struct Callback<T, F> {
    protocol: Protocol,
    callback: F,
    _target: PhantomData<fn() -> T>,
}

impl<T, F> Callback<T, F>
where
    T: FromReply + Default,
    F: FnOnce(Response<T>) + Send,
{
    pub fn new(protocol: Protocol, callback: F) -> Self {
        Self {
            protocol,
            callback,
            _target: PhantomData,
        }
    }
}

impl<T, F> ReplyHandler for Callback<T, F>
where
    T: FromReply + Default,
    F: FnOnce(Response<T>) + Send,
{
    fn handle(self: Box<Self>, reply: Value) {
        let Callback {
            protocol, callback, ..
        } = *self;
        callback(Response::settle(reply, protocol))
    }

    fn fail(self: Box<Self>, error: Error) {
        tracing::debug!(%error, "reply handler failed without a reply");
        let callback = self.callback;
        callback(Response::failure(None, error.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder<T: Send + 'static>() -> (Arc<Mutex<Vec<T>>>, impl FnOnce(T) + Send + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |item| sink.lock().unwrap().push(item))
    }

    #[test]
    fn test_callback_decodes() {
        let (seen, callback) = recorder::<Response<i64>>();
        let handler: Box<dyn ReplyHandler> = Box::new(Callback::new(Protocol::Resp2, callback));
        handler.handle(Value::Integer(9));
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(*seen[0].value(), 9);
    }

    #[test]
    fn test_callback_decode_failure() {
        let (seen, callback) = recorder::<Response<i64>>();
        let handler: Box<dyn ReplyHandler> = Box::new(Callback::new(Protocol::Resp2, callback));
        handler.handle(Value::bulk_string("x"));
        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert!(!seen[0].is_ok());
        assert_eq!(*seen[0].value(), 0);
    }

    #[test]
    fn test_callback_transport_failure() {
        let (seen, callback) = recorder::<Response<String>>();
        let handler: Box<dyn ReplyHandler> = Box::new(Callback::new(Protocol::Resp2, callback));
        handler.fail(Error::ConnectionClosed);
        let seen = seen.lock().unwrap();
        assert_eq!(seen[0].error(), Some("connection closed"));
        assert!(seen[0].raw().is_none());
    }
}
