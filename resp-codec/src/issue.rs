//! The seam between typed commands and a connection.
//!
//! A [`Transport`] moves framed request bytes and hands back parsed replies.
//! [`Issue`] is implemented for every transport and adds the typed layer:
//! encode a [`Command`], decode the reply as the requested type, wrap it in a
//! [`Response`].

use bytes::{Bytes, BytesMut};
use protocol_resp::Value;

use crate::config::Protocol;
use crate::decode::FromReply;
use crate::encode::Command;
use crate::error::Error;
use crate::handler::{Callback, ReplyHandler};
use crate::response::Response;
use crate::types::PipelineResult;

/// A connection that can carry framed requests.
pub trait Transport {
    /// Protocol revision negotiated on this connection.
    fn protocol(&self) -> Protocol {
        Protocol::Resp2
    }

    /// Send one framed request and wait for its reply.
    fn round_trip(&mut self, request: Bytes) -> Result<Value, Error>;

    /// Send `count` framed requests in one write and wait for all replies,
    /// returned in send order.
    fn round_trip_batch(&mut self, requests: Bytes, count: usize) -> Result<Vec<Value>, Error>;

    /// Send one framed request and hand its reply to `handler` when it
    /// arrives.
    ///
    /// On `Ok` the transport owns the handler and must invoke it exactly
    /// once. On `Err` the handler is dropped without being invoked.
    fn submit(&mut self, request: Bytes, handler: Box<dyn ReplyHandler>) -> Result<(), Error>;
}

/// Typed command issuing, available on every [`Transport`].
pub trait Issue: Transport {
    /// Issue `command` and wait for a `T`.
    ///
    /// An error reply from the server is a failed [`Response`]. Encoding,
    /// transport and decode failures are returned as `Err`.
    fn issue<T: FromReply + Default>(&mut self, command: &Command) -> Result<Response<T>, Error> {
        let request = command.to_bytes()?;
        let reply = self.round_trip(request)?;
        tracing::trace!(
            command = %String::from_utf8_lossy(command.name()),
            kind = %reply.kind(),
            "dispatching reply"
        );
        Response::from_reply(reply, self.protocol())
    }

    /// Issue `command` and pass the decoded [`Response`] to `callback`.
    ///
    /// Once this returns `Ok`, `callback` is invoked exactly once, with a
    /// failed response if the reply does not decode as `T` or never arrives.
    fn issue_with<T, F>(&mut self, command: &Command, callback: F) -> Result<(), Error>
    where
        T: FromReply + Default + 'static,
        F: FnOnce(Response<T>) + Send + 'static,
    {
        let request = command.to_bytes()?;
        let handler = Callback::<T, F>::new(self.protocol(), callback);
        self.submit(request, Box::new(handler))
    }

    /// Send every queued command of `pipeline` in one batch.
    fn pipeline(&mut self, pipeline: &Pipeline) -> Result<PipelineResult, Error> {
        pipeline.execute(self)
    }
}

impl<X: Transport + ?Sized> Issue for X {}

/// A batch of commands sent in a single write.
///
/// ```
/// use resp_codec::{Pipeline, cmd};
///
/// let mut pipeline = Pipeline::new();
/// pipeline.add(&cmd!("INCR", "hits")).unwrap();
/// pipeline.add(&cmd!("GET", "hits")).unwrap();
/// assert_eq!(pipeline.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    buf: BytesMut,
    count: usize,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a command. A command that fails to encode is not queued.
    pub fn add(&mut self, command: &Command) -> Result<&mut Self, Error> {
        command.encode(&mut self.buf)?;
        self.count += 1;
        Ok(self)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Drop every queued command.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.count = 0;
    }

    /// Send the batch over `transport` and collect the replies.
    pub fn execute<X: Transport + ?Sized>(&self, transport: &mut X) -> Result<PipelineResult, Error> {
        if self.is_empty() {
            return Ok(PipelineResult::from_replies(Vec::new()));
        }
        tracing::trace!(commands = self.count, bytes = self.buf.len(), "sending pipeline");
        let replies = transport.round_trip_batch(Bytes::copy_from_slice(&self.buf), self.count)?;
        if replies.len() != self.count {
            return Err(Error::protocol(format!(
                "expect {} pipeline replies, but got {}",
                self.count,
                replies.len()
            )));
        }
        Ok(PipelineResult::from_replies(replies))
    }
}
