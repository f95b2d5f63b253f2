//! Issuing typed commands over an in-memory transport.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use resp_codec::types::{ScanPage, Status, StreamId};
use resp_codec::{
    Error, Issue, KeyCommands, Pipeline, Protocol, ReplyHandler, Response, ScanCommands,
    StreamCommands, Transport, Value, cmd,
};

/// Replies with canned wire bytes, in order, and records every request.
struct MockTransport {
    protocol: Protocol,
    replies: VecDeque<&'static [u8]>,
    sent: Vec<Bytes>,
    pending: Vec<Box<dyn ReplyHandler>>,
}

impl MockTransport {
    fn new(protocol: Protocol, replies: &[&'static [u8]]) -> Self {
        Self {
            protocol,
            replies: replies.iter().copied().collect(),
            sent: Vec::new(),
            pending: Vec::new(),
        }
    }

    fn next_reply(&mut self) -> Result<Value, Error> {
        let wire = self.replies.pop_front().ok_or(Error::ConnectionClosed)?;
        let (value, _) = Value::parse(wire)?;
        Ok(value)
    }

    /// Deliver queued replies to pending handlers; fail the rest.
    fn flush(&mut self) {
        for handler in std::mem::take(&mut self.pending) {
            match self.next_reply() {
                Ok(reply) => handler.handle(reply),
                Err(err) => handler.fail(err),
            }
        }
    }
}

impl Transport for MockTransport {
    fn protocol(&self) -> Protocol {
        self.protocol
    }

    fn round_trip(&mut self, request: Bytes) -> Result<Value, Error> {
        self.sent.push(request);
        self.next_reply()
    }

    fn round_trip_batch(&mut self, requests: Bytes, count: usize) -> Result<Vec<Value>, Error> {
        self.sent.push(requests);
        (0..count).map(|_| self.next_reply()).collect()
    }

    fn submit(&mut self, request: Bytes, handler: Box<dyn ReplyHandler>) -> Result<(), Error> {
        self.sent.push(request);
        self.pending.push(handler);
        Ok(())
    }
}

#[test]
fn test_issue_sync() {
    let mut conn = MockTransport::new(Protocol::Resp2, &[b":5\r\n"]);
    let resp: Response<i64> = conn.issue(&cmd!("INCRBY", "k", 5)).unwrap();
    assert!(resp.is_ok());
    assert_eq!(*resp.value(), 5);
    assert_eq!(
        &conn.sent[0][..],
        b"*3\r\n$6\r\nINCRBY\r\n$1\r\nk\r\n$1\r\n5\r\n"
    );
}

#[test]
fn test_issue_server_error_is_failed_response() {
    let mut conn = MockTransport::new(Protocol::Resp2, &[b"-ERR no such key\r\n"]);
    let resp: Response<String> = conn.issue(&cmd!("RENAME", "a", "b")).unwrap();
    assert!(!resp.is_ok());
    assert_eq!(resp.error(), Some("ERR no such key"));
    assert_eq!(resp.value(), "");
}

#[test]
fn test_issue_decode_error_is_err() {
    let mut conn = MockTransport::new(Protocol::Resp2, &[b"$3\r\nabc\r\n"]);
    let err = conn.issue::<i64>(&cmd!("GET", "k")).unwrap_err();
    assert!(err.is_decode());
}

#[test]
fn test_issue_transport_error() {
    let mut conn = MockTransport::new(Protocol::Resp2, &[]);
    let err = conn.issue::<i64>(&cmd!("GET", "k")).unwrap_err();
    assert!(matches!(err, Error::ConnectionClosed));
}

#[test]
fn test_issue_with_invokes_callback_once() {
    let mut conn = MockTransport::new(Protocol::Resp2, &[b"$2\r\nhi\r\n", b":1\r\n"]);
    let seen: Arc<Mutex<Vec<Response<String>>>> = Arc::default();

    let sink = seen.clone();
    conn.issue_with(&cmd!("GET", "a"), move |resp: Response<String>| {
        sink.lock().unwrap().push(resp)
    })
    .unwrap();
    // Second reply is an integer, which does not decode as a String.
    let sink = seen.clone();
    conn.issue_with(&cmd!("GET", "b"), move |resp: Response<String>| {
        sink.lock().unwrap().push(resp)
    })
    .unwrap();
    assert!(seen.lock().unwrap().is_empty());

    conn.flush();
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].value(), "hi");
    assert!(!seen[1].is_ok());
    assert_eq!(seen[1].value(), "");
    assert_eq!(seen[1].raw(), Some(&Value::Integer(1)));
}

#[test]
fn test_issue_with_connection_closed() {
    let mut conn = MockTransport::new(Protocol::Resp2, &[]);
    let seen: Arc<Mutex<Vec<Response<i64>>>> = Arc::default();
    let sink = seen.clone();
    conn.issue_with(&cmd!("PING"), move |resp: Response<i64>| {
        sink.lock().unwrap().push(resp)
    })
    .unwrap();
    conn.flush();
    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].error(), Some("connection closed"));
}

#[test]
fn test_pipeline() {
    let mut conn = MockTransport::new(
        Protocol::Resp2,
        &[b"+OK\r\n", b"-WRONGTYPE nope\r\n", b":3\r\n"],
    );
    let mut pipeline = Pipeline::new();
    pipeline.add(&cmd!("SET", "a", "1")).unwrap();
    pipeline.add(&cmd!("LPUSH", "a", "x")).unwrap();
    pipeline.add(&cmd!("INCR", "n")).unwrap();

    let result = conn.pipeline(&pipeline).unwrap();
    assert_eq!(conn.sent.len(), 1);
    assert!(!result.all_succeeded);
    assert_eq!(result.errors().count(), 1);
    assert_eq!(result.get::<i64>(2, Protocol::Resp2).unwrap(), 3);
}

#[test]
fn test_empty_pipeline_sends_nothing() {
    let mut conn = MockTransport::new(Protocol::Resp2, &[]);
    let result = Pipeline::new().execute(&mut conn).unwrap();
    assert!(result.is_empty());
    assert!(conn.sent.is_empty());
}

#[test]
fn test_key_commands() {
    let mut conn = MockTransport::new(
        Protocol::Resp2,
        &[b"+OK\r\n", b"$1\r\n1\r\n", b"$-1\r\n", b":1\r\n"],
    );
    let set = conn.set("a", 1i64).unwrap();
    assert!(set.value().is_ok());
    assert_eq!(
        conn.get("a").unwrap().into_value(),
        Some(Bytes::from_static(b"1"))
    );
    assert_eq!(conn.get("missing").unwrap().into_value(), None);
    assert!(*conn.exists("a").unwrap().value());
}

#[test]
fn test_stream_commands() {
    let mut conn = MockTransport::new(
        Protocol::Resp2,
        &[
            b"$15\r\n1700000000000-0\r\n",
            b"*1\r\n*2\r\n$15\r\n1700000000000-0\r\n*2\r\n$1\r\nf\r\n$1\r\nv\r\n",
        ],
    );
    let id = conn.xadd("s", None, [("f", "v")]).unwrap().into_value();
    assert_eq!(id, StreamId::new(1_700_000_000_000, 0));
    assert_eq!(
        &conn.sent[0][..],
        b"*5\r\n$4\r\nXADD\r\n$1\r\ns\r\n$1\r\n*\r\n$1\r\nf\r\n$1\r\nv\r\n"
    );

    let entries = conn.xrange("s", "-", "+", Some(10)).unwrap().into_value();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].get("f"), Some("v"));
}

#[test]
fn test_scan_commands() {
    let mut conn = MockTransport::new(
        Protocol::Resp2,
        &[b"*2\r\n$1\r\n0\r\n*2\r\n$1\r\na\r\n$1\r\nb\r\n"],
    );
    let page: ScanPage<Vec<String>> = conn
        .scan(0, Some("*"), None)
        .unwrap()
        .into_value();
    assert!(page.is_finished());
    assert_eq!(page.items, ["a", "b"]);
    assert_eq!(
        &conn.sent[0][..],
        b"*4\r\n$4\r\nSCAN\r\n$1\r\n0\r\n$5\r\nMATCH\r\n$1\r\n*\r\n"
    );
}

#[test]
fn test_resp3_transport() {
    let mut conn = MockTransport::new(Protocol::Resp3, &[b"#t\r\n", b",1.5\r\n", b"+OK\r\n"]);
    let flag: Response<bool> = conn.issue(&cmd!("SISMEMBER", "s", "m")).unwrap();
    assert!(*flag.value());
    let score: Response<f64> = conn.issue(&cmd!("ZSCORE", "z", "m")).unwrap();
    assert_eq!(*score.value(), 1.5);
    let status: Response<Status> = conn.issue(&cmd!("SET", "k", "v")).unwrap();
    assert!(bool::from(status.into_value()));
}
