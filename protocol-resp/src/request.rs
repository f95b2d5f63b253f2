//! Client-side request framing.
//!
//! A request is a RESP array of bulk strings: `*<N>\r\n` followed by N
//! `$<len>\r\n<bytes>\r\n` elements. Arguments are already rendered to bytes
//! at this layer; typed argument conversion lives in the codec above.

use bytes::{BufMut, Bytes, BytesMut};

/// A framed command: the command name followed by its arguments.
///
/// # Example
///
/// ```
/// use protocol_resp::Request;
///
/// let req = Request::cmd("INCRBY").arg("counter").arg("5");
/// let wire = req.to_bytes();
/// assert_eq!(&wire[..], b"*3\r\n$6\r\nINCRBY\r\n$7\r\ncounter\r\n$1\r\n5\r\n");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Request {
    args: Vec<Bytes>,
}

impl Request {
    /// Create a request from already rendered elements.
    #[inline]
    pub fn new(args: Vec<Bytes>) -> Self {
        Self { args }
    }

    /// Start a request with the given command name.
    #[inline]
    pub fn cmd(name: impl AsRef<[u8]>) -> Self {
        Self {
            args: vec![Bytes::copy_from_slice(name.as_ref())],
        }
    }

    /// Add an argument.
    #[inline]
    pub fn arg(mut self, arg: impl AsRef<[u8]>) -> Self {
        self.args.push(Bytes::copy_from_slice(arg.as_ref()));
        self
    }

    /// Add an argument without copying it.
    #[inline]
    pub fn push(&mut self, arg: Bytes) {
        self.args.push(arg);
    }

    /// The bulk elements of this request, name first.
    #[inline]
    pub fn args(&self) -> &[Bytes] {
        &self.args
    }

    /// Number of bulk elements, including the command name.
    #[inline]
    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// Returns true if the request has no elements at all.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Append the wire encoding of this request to `buf`.
    #[inline]
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        encode_command(buf, &self.args);
    }

    /// Encode into a freshly allocated, exactly sized buffer.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        self.encode(&mut buf);
        buf.freeze()
    }

    /// Calculate the encoded length of this request.
    pub fn encoded_len(&self) -> usize {
        let mut digits = itoa::Buffer::new();

        // Array header: *<count>\r\n
        let mut len = 1 + digits.format(self.args.len()).len() + 2;

        // Each argument: $<len>\r\n<data>\r\n
        for arg in &self.args {
            len += 1 + digits.format(arg.len()).len() + 2 + arg.len() + 2;
        }

        len
    }
}

/// Encode a command (array of bulk strings) into a buffer.
pub fn encode_command<B, A>(buf: &mut B, args: &[A])
where
    B: BufMut,
    A: AsRef<[u8]>,
{
    let mut digits = itoa::Buffer::new();

    buf.put_u8(b'*');
    buf.put_slice(digits.format(args.len()).as_bytes());
    buf.put_slice(b"\r\n");

    for arg in args {
        let arg = arg.as_ref();
        buf.put_u8(b'$');
        buf.put_slice(digits.format(arg.len()).as_bytes());
        buf.put_slice(b"\r\n");
        buf.put_slice(arg);
        buf.put_slice(b"\r\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_single() {
        assert_eq!(&Request::cmd("PING").to_bytes()[..], b"*1\r\n$4\r\nPING\r\n");
    }

    #[test]
    fn test_encode_custom() {
        let req = Request::cmd(b"INCR").arg(b"counter");
        assert_eq!(&req.to_bytes()[..], b"*2\r\n$4\r\nINCR\r\n$7\r\ncounter\r\n");
        assert_eq!(req.len(), 2);
    }

    #[test]
    fn test_encode_empty_and_binary_args() {
        let req = Request::cmd("SET").arg("k").arg(b"").arg(b"\r\n\x00");
        assert_eq!(
            &req.to_bytes()[..],
            b"*4\r\n$3\r\nSET\r\n$1\r\nk\r\n$0\r\n\r\n$3\r\n\r\n\x00\r\n"
        );
    }

    #[test]
    fn test_encoded_len() {
        let requests = vec![
            Request::cmd("PING"),
            Request::cmd("GET").arg("mykey"),
            Request::cmd("SET").arg(vec![b'k'; 1000]).arg(vec![b'v'; 10000]),
            Request::default(),
        ];

        for req in requests {
            let mut buf = Vec::new();
            req.encode(&mut buf);
            assert_eq!(req.encoded_len(), buf.len());
        }
    }

    #[test]
    fn test_push_without_copy() {
        let value = Bytes::from_static(b"payload");
        let mut req = Request::cmd("APPEND").arg("k");
        req.push(value.clone());
        assert_eq!(req.args()[2], value);
        assert!(!req.is_empty());
    }

    #[test]
    fn test_encode_command_appends() {
        let mut buf = b"prefix".to_vec();
        encode_command(&mut buf, &["GET", "k"]);
        assert_eq!(buf, b"prefix*2\r\n$3\r\nGET\r\n$1\r\nk\r\n");
    }
}
