use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::hash::{BuildHasher, Hash};

use protocol_resp::Value;

use super::{FromReply, pairs};
use crate::config::Protocol;
use crate::error::Error;

// ── Optional ────────────────────────────────────────────────────────────

impl<T: FromReply> FromReply for Option<T> {
    fn from_reply(reply: &Value, protocol: Protocol) -> Result<Self, Error> {
        match reply {
            Value::Null => Ok(None),
            _ => T::from_reply(reply, protocol).map(Some),
        }
    }
}

// ── Pairs and tuples ────────────────────────────────────────────────────

impl<A: FromReply, B: FromReply> FromReply for (A, B) {
    fn from_reply(reply: &Value, protocol: Protocol) -> Result<Self, Error> {
        let items = reply
            .as_array()
            .ok_or_else(|| Error::mismatch("ARRAY", reply))?;
        match items {
            [a, b] => Ok((A::from_reply(a, protocol)?, B::from_reply(b, protocol)?)),
            // Some commands wrap a single pair in a one-element array.
            [inner] => Self::from_reply(inner, protocol),
            _ => Err(Error::protocol(format!(
                "expect 2 elements for a pair, but got {}",
                items.len()
            ))),
        }
    }

    fn from_reply_items(items: &[Value], protocol: Protocol) -> Result<Vec<Self>, Error> {
        pairs(
            items,
            |a, b| Ok((A::from_reply(a, protocol)?, B::from_reply(b, protocol)?)),
            |item| Self::from_reply(item, protocol),
        )
    }

    fn from_map_entries(
        entries: &[(Value, Value)],
        protocol: Protocol,
    ) -> Result<Vec<Self>, Error> {
        entries
            .iter()
            .map(|(a, b)| -> Result<_, Error> {
                Ok((A::from_reply(a, protocol)?, B::from_reply(b, protocol)?))
            })
            .collect()
    }
}

macro_rules! tuple_from_reply {
    ($len:expr => $($name:ident $var:ident),+) => {
        impl<$($name: FromReply),+> FromReply for ($($name,)+) {
            fn from_reply(reply: &Value, protocol: Protocol) -> Result<Self, Error> {
                let items = reply
                    .as_array()
                    .ok_or_else(|| Error::mismatch("ARRAY", reply))?;
                let [$($var),+] = items else {
                    return Err(Error::protocol(format!(
                        "expect {} elements for a tuple, but got {}",
                        $len,
                        items.len()
                    )));
                };
                Ok(($($name::from_reply($var, protocol)?,)+))
            }
        }
    };
}

tuple_from_reply!(3 => A a, B b, C c);
tuple_from_reply!(4 => A a, B b, C c, D d);
tuple_from_reply!(5 => A a, B b, C c, D d, E e);
tuple_from_reply!(6 => A a, B b, C c, D d, E e, F f);
tuple_from_reply!(7 => A a, B b, C c, D d, E e, F f, G g);
tuple_from_reply!(8 => A a, B b, C c, D d, E e, F f, G g, H h);

// ── Sequences ───────────────────────────────────────────────────────────

fn sequence<T: FromReply>(reply: &Value, protocol: Protocol) -> Result<Vec<T>, Error> {
    match reply {
        Value::Array(items) => T::from_reply_items(items, protocol),
        Value::Set(items) if protocol.is_resp3() => T::from_reply_items(items, protocol),
        Value::Map(entries) if protocol.is_resp3() => T::from_map_entries(entries, protocol),
        other => Err(Error::mismatch("ARRAY", other)),
    }
}

impl<T: FromReply> FromReply for Vec<T> {
    #[inline]
    fn from_reply(reply: &Value, protocol: Protocol) -> Result<Self, Error> {
        sequence(reply, protocol)
    }
}

impl<T: FromReply> FromReply for VecDeque<T> {
    fn from_reply(reply: &Value, protocol: Protocol) -> Result<Self, Error> {
        sequence(reply, protocol).map(VecDeque::from)
    }
}

impl<T, S> FromReply for HashSet<T, S>
where
    T: FromReply + Eq + Hash,
    S: BuildHasher + Default,
{
    fn from_reply(reply: &Value, protocol: Protocol) -> Result<Self, Error> {
        Ok(sequence::<T>(reply, protocol)?.into_iter().collect())
    }
}

impl<T: FromReply + Ord> FromReply for BTreeSet<T> {
    fn from_reply(reply: &Value, protocol: Protocol) -> Result<Self, Error> {
        Ok(sequence::<T>(reply, protocol)?.into_iter().collect())
    }
}

// ── Maps ────────────────────────────────────────────────────────────────

impl<K, V, S> FromReply for HashMap<K, V, S>
where
    K: FromReply + Eq + Hash,
    V: FromReply,
    S: BuildHasher + Default,
{
    fn from_reply(reply: &Value, protocol: Protocol) -> Result<Self, Error> {
        Ok(sequence::<(K, V)>(reply, protocol)?.into_iter().collect())
    }
}

impl<K: FromReply + Ord, V: FromReply> FromReply for BTreeMap<K, V> {
    fn from_reply(reply: &Value, protocol: Protocol) -> Result<Self, Error> {
        Ok(sequence::<(K, V)>(reply, protocol)?.into_iter().collect())
    }
}

// ── One-of ──────────────────────────────────────────────────────────────

macro_rules! one_of {
    (
        $(#[$meta:meta])*
        $name:ident { $first:ident($first_ty:ident) $(, $variant:ident($ty:ident))+ }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        pub enum $name<$first_ty, $($ty),+> {
            $first($first_ty),
            $($variant($ty)),+
        }

        impl<$first_ty: Default, $($ty),+> Default for $name<$first_ty, $($ty),+> {
            fn default() -> Self {
                $name::$first($first_ty::default())
            }
        }

        impl<$first_ty: FromReply, $($ty: FromReply),+> FromReply for $name<$first_ty, $($ty),+> {
            fn from_reply(reply: &Value, protocol: Protocol) -> Result<Self, Error> {
                match $first_ty::from_reply(reply, protocol) {
                    Ok(value) => return Ok($name::$first(value)),
                    Err(err) if err.is_decode() => {
                        tracing::debug!(alternative = stringify!($first), error = %err, "one-of alternative rejected");
                    }
                    Err(err) => return Err(err),
                }
                $(
                    match $ty::from_reply(reply, protocol) {
                        Ok(value) => return Ok($name::$variant(value)),
                        Err(err) if err.is_decode() => {
                            tracing::debug!(alternative = stringify!($variant), error = %err, "one-of alternative rejected");
                        }
                        Err(err) => return Err(err),
                    }
                )+
                Err(Error::mismatch(stringify!($name), reply))
            }
        }
    };
}

one_of! {
    /// A reply that is one of two shapes, tried left to right.
    ///
    /// Useful for commands whose reply shape depends on their options,
    /// e.g. `ZADD ... INCR` (score or nil) versus plain `ZADD` (count).
    Either { Left(L), Right(R) }
}

one_of! {
    /// A reply that is one of three shapes, tried in declaration order.
    OneOf3 { First(A), Second(B), Third(C) }
}
