//! Typed argument encoding.
//!
//! Every argument type knows how many bulk strings it renders to
//! ([`ToArgs::arg_count`]) and how to render them ([`ToArgs::write_args`]).
//! [`Command`] collects arguments as parts and checks both numbers agree
//! before anything reaches the wire.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

use bytes::{BufMut, Bytes, BytesMut};
use protocol_resp::Request;

use crate::error::Error;

/// A value that renders to zero or more bulk string arguments.
pub trait ToArgs {
    /// Number of bulk strings [`write_args`](ToArgs::write_args) appends.
    fn arg_count(&self) -> usize;

    /// Append this value's bulk strings to `out`.
    fn write_args(&self, out: &mut Vec<Bytes>);
}

impl<T: ToArgs + ?Sized> ToArgs for &T {
    #[inline]
    fn arg_count(&self) -> usize {
        (**self).arg_count()
    }

    #[inline]
    fn write_args(&self, out: &mut Vec<Bytes>) {
        (**self).write_args(out)
    }
}

// ── Scalars ─────────────────────────────────────────────────────────────

impl ToArgs for str {
    fn arg_count(&self) -> usize {
        1
    }

    fn write_args(&self, out: &mut Vec<Bytes>) {
        out.push(Bytes::copy_from_slice(self.as_bytes()));
    }
}

impl ToArgs for String {
    fn arg_count(&self) -> usize {
        1
    }

    fn write_args(&self, out: &mut Vec<Bytes>) {
        out.push(Bytes::copy_from_slice(self.as_bytes()));
    }
}

impl ToArgs for [u8] {
    fn arg_count(&self) -> usize {
        1
    }

    fn write_args(&self, out: &mut Vec<Bytes>) {
        out.push(Bytes::copy_from_slice(self));
    }
}

impl ToArgs for Bytes {
    fn arg_count(&self) -> usize {
        1
    }

    fn write_args(&self, out: &mut Vec<Bytes>) {
        out.push(self.clone());
    }
}

macro_rules! integer_to_args {
    ($($t:ty),+) => {$(
        impl ToArgs for $t {
            fn arg_count(&self) -> usize {
                1
            }

            fn write_args(&self, out: &mut Vec<Bytes>) {
                let mut digits = itoa::Buffer::new();
                out.push(Bytes::copy_from_slice(digits.format(*self).as_bytes()));
            }
        }
    )+};
}

integer_to_args!(i16, i32, i64, isize, u16, u32, u64, usize);

macro_rules! float_to_args {
    ($($t:ty),+) => {$(
        impl ToArgs for $t {
            fn arg_count(&self) -> usize {
                1
            }

            fn write_args(&self, out: &mut Vec<Bytes>) {
                if self.is_finite() {
                    let mut digits = ryu::Buffer::new();
                    out.push(Bytes::copy_from_slice(digits.format_finite(*self).as_bytes()));
                } else if self.is_nan() {
                    out.push(Bytes::from_static(b"nan"));
                } else if self.is_sign_positive() {
                    out.push(Bytes::from_static(b"+inf"));
                } else {
                    out.push(Bytes::from_static(b"-inf"));
                }
            }
        }
    )+};
}

float_to_args!(f32, f64);

// ── Optional, pairs and tuples ──────────────────────────────────────────

impl<T: ToArgs> ToArgs for Option<T> {
    fn arg_count(&self) -> usize {
        self.as_ref().map_or(0, ToArgs::arg_count)
    }

    fn write_args(&self, out: &mut Vec<Bytes>) {
        if let Some(value) = self {
            value.write_args(out);
        }
    }
}

macro_rules! tuple_to_args {
    ($($name:ident $idx:tt),+) => {
        impl<$($name: ToArgs),+> ToArgs for ($($name,)+) {
            fn arg_count(&self) -> usize {
                0 $(+ self.$idx.arg_count())+
            }

            fn write_args(&self, out: &mut Vec<Bytes>) {
                $(self.$idx.write_args(out);)+
            }
        }
    };
}

tuple_to_args!(A 0, B 1);
tuple_to_args!(A 0, B 1, C 2);
tuple_to_args!(A 0, B 1, C 2, D 3);
tuple_to_args!(A 0, B 1, C 2, D 3, E 4);
tuple_to_args!(A 0, B 1, C 2, D 3, E 4, F 5);

// ── Containers ──────────────────────────────────────────────────────────

/// Containers are homogeneous: the first item's count stands for every item.
fn container_count<'a, T, I>(mut items: I, len: usize) -> usize
where
    T: ToArgs + 'a,
    I: Iterator<Item = &'a T>,
{
    items.next().map_or(0, |first| first.arg_count() * len)
}

macro_rules! sequence_to_args {
    ($($container:ident),+) => {$(
        impl<T: ToArgs> ToArgs for $container<T> {
            fn arg_count(&self) -> usize {
                container_count(self.iter(), self.len())
            }

            fn write_args(&self, out: &mut Vec<Bytes>) {
                for item in self {
                    item.write_args(out);
                }
            }
        }
    )+};
}

sequence_to_args!(Vec, VecDeque, BTreeSet);

impl<T: ToArgs, S> ToArgs for HashSet<T, S> {
    fn arg_count(&self) -> usize {
        container_count(self.iter(), self.len())
    }

    fn write_args(&self, out: &mut Vec<Bytes>) {
        for item in self {
            item.write_args(out);
        }
    }
}

impl<T: ToArgs, const N: usize> ToArgs for [T; N] {
    fn arg_count(&self) -> usize {
        container_count(self.iter(), N)
    }

    fn write_args(&self, out: &mut Vec<Bytes>) {
        for item in self {
            item.write_args(out);
        }
    }
}

fn map_count<'a, K, V, I>(mut entries: I, len: usize) -> usize
where
    K: ToArgs + 'a,
    V: ToArgs + 'a,
    I: Iterator<Item = (&'a K, &'a V)>,
{
    entries
        .next()
        .map_or(0, |(k, v)| (k.arg_count() + v.arg_count()) * len)
}

impl<K: ToArgs, V: ToArgs, S> ToArgs for HashMap<K, V, S> {
    fn arg_count(&self) -> usize {
        map_count(self.iter(), self.len())
    }

    fn write_args(&self, out: &mut Vec<Bytes>) {
        for (k, v) in self {
            k.write_args(out);
            v.write_args(out);
        }
    }
}

impl<K: ToArgs, V: ToArgs> ToArgs for BTreeMap<K, V> {
    fn arg_count(&self) -> usize {
        map_count(self.iter(), self.len())
    }

    fn write_args(&self, out: &mut Vec<Bytes>) {
        for (k, v) in self {
            k.write_args(out);
            v.write_args(out);
        }
    }
}

// ── Command ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
struct Part {
    declared: usize,
    bulks: Vec<Bytes>,
}

/// A command being assembled from typed arguments.
///
/// # Example
///
/// ```
/// use resp_codec::Command;
///
/// let cmd = Command::new("ZADD").arg("board").arg([(1.5, "ada"), (2.0, "bob")]);
/// assert_eq!(cmd.arg_count(), 6);
/// assert_eq!(
///     &cmd.to_bytes().unwrap()[..],
///     &b"*6\r\n$4\r\nZADD\r\n$5\r\nboard\r\n$3\r\n1.5\r\n$3\r\nada\r\n$3\r\n2.0\r\n$3\r\nbob\r\n"[..]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Command {
    name: Bytes,
    parts: Vec<Part>,
}

impl Command {
    pub fn new(name: impl AsRef<[u8]>) -> Self {
        Self {
            name: Bytes::copy_from_slice(name.as_ref()),
            parts: Vec::new(),
        }
    }

    /// Append an argument.
    pub fn arg<T: ToArgs>(mut self, value: T) -> Self {
        self.push(&value);
        self
    }

    /// Append an argument in place.
    pub fn push<T: ToArgs + ?Sized>(&mut self, value: &T) {
        let declared = value.arg_count();
        let mut bulks = Vec::with_capacity(declared);
        value.write_args(&mut bulks);
        self.parts.push(Part { declared, bulks });
    }

    #[inline]
    pub fn name(&self) -> &[u8] {
        &self.name
    }

    /// Declared element count, including the command name.
    pub fn arg_count(&self) -> usize {
        1 + self.parts.iter().map(|part| part.declared).sum::<usize>()
    }

    /// Build the framed request, verifying every argument rendered exactly
    /// the number of bulk strings it declared.
    pub fn to_request(&self) -> Result<Request, Error> {
        let mut args = Vec::with_capacity(self.arg_count());
        args.push(self.name.clone());
        for (index, part) in self.parts.iter().enumerate() {
            if part.bulks.len() != part.declared {
                tracing::warn!(
                    command = %String::from_utf8_lossy(&self.name),
                    index,
                    declared = part.declared,
                    written = part.bulks.len(),
                    "argument count mismatch, refusing to encode"
                );
                return Err(Error::protocol(format!(
                    "argument {index} of {} declares {} elements but wrote {}",
                    String::from_utf8_lossy(&self.name),
                    part.declared,
                    part.bulks.len()
                )));
            }
            args.extend(part.bulks.iter().cloned());
        }
        Ok(Request::new(args))
    }

    /// Append the wire encoding to `buf`. Nothing is written on error.
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> Result<(), Error> {
        let request = self.to_request()?;
        tracing::trace!(
            command = %String::from_utf8_lossy(&self.name),
            elements = request.len(),
            "encoding command"
        );
        request.encode(buf);
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Bytes, Error> {
        let request = self.to_request()?;
        let mut buf = BytesMut::with_capacity(request.encoded_len());
        request.encode(&mut buf);
        Ok(buf.freeze())
    }
}

/// Encode `name` followed by a heterogeneous argument list.
pub fn encode<B: BufMut>(buf: &mut B, name: &str, args: &[&dyn ToArgs]) -> Result<(), Error> {
    let mut command = Command::new(name);
    for arg in args {
        command.push(*arg);
    }
    command.encode(buf)
}

/// Build a [`Command`] from a name and arguments.
///
/// ```
/// let cmd = resp_codec::cmd!("SET", "key", 42);
/// assert_eq!(&cmd.to_bytes().unwrap()[..], &b"*3\r\n$3\r\nSET\r\n$3\r\nkey\r\n$2\r\n42\r\n"[..]);
/// ```
#[macro_export]
macro_rules! cmd {
    ($name:expr $(, $arg:expr)* $(,)?) => {
        $crate::Command::new($name)$(.arg($arg))*
    };
}
