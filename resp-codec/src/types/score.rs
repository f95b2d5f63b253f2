use bytes::Bytes;
use protocol_resp::Value;

use crate::config::Protocol;
use crate::decode::{FromReply, fixed_array, pairs};
use crate::encode::ToArgs;
use crate::error::Error;

/// A sorted set score (`ZSCORE`, `ZINCRBY`).
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Score {
    pub value: f64,
}

impl FromReply for Score {
    fn from_reply(reply: &Value, protocol: Protocol) -> Result<Self, Error> {
        Ok(Score {
            value: f64::from_reply(reply, protocol)?,
        })
    }
}

impl ToArgs for Score {
    fn arg_count(&self) -> usize {
        1
    }

    fn write_args(&self, out: &mut Vec<Bytes>) {
        self.value.write_args(out);
    }
}

/// A sorted set member with its score, as in `ZRANGE ... WITHSCORES`.
///
/// The wire order is `[member, score]`; encoding writes `score member`, the
/// order `ZADD` takes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoreMember {
    pub score: f64,
    pub member: String,
}

impl ScoreMember {
    pub fn new(score: f64, member: impl Into<String>) -> Self {
        Self {
            score,
            member: member.into(),
        }
    }

    fn from_parts(member: &Value, score: &Value, protocol: Protocol) -> Result<Self, Error> {
        Ok(ScoreMember {
            member: String::from_reply(member, protocol)?,
            score: f64::from_reply(score, protocol)?,
        })
    }
}

impl FromReply for ScoreMember {
    fn from_reply(reply: &Value, protocol: Protocol) -> Result<Self, Error> {
        let items = fixed_array(reply, 2, "a scored member")?;
        Self::from_parts(&items[0], &items[1], protocol)
    }

    fn from_reply_items(items: &[Value], protocol: Protocol) -> Result<Vec<Self>, Error> {
        pairs(
            items,
            |member, score| Self::from_parts(member, score, protocol),
            |item| Self::from_reply(item, protocol),
        )
    }

    fn from_map_entries(
        entries: &[(Value, Value)],
        protocol: Protocol,
    ) -> Result<Vec<Self>, Error> {
        entries
            .iter()
            .map(|(member, score)| Self::from_parts(member, score, protocol))
            .collect()
    }
}

impl ToArgs for ScoreMember {
    fn arg_count(&self) -> usize {
        2
    }

    fn write_args(&self, out: &mut Vec<Bytes>) {
        self.score.write_args(out);
        out.push(Bytes::copy_from_slice(self.member.as_bytes()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;

    #[test]
    fn test_score() {
        let score: Score = decode(&Value::bulk_string("1.5"), Protocol::Resp2).unwrap();
        assert_eq!(score.value, 1.5);
        let score: Option<Score> = decode(&Value::Null, Protocol::Resp2).unwrap();
        assert!(score.is_none());
    }

    #[test]
    fn test_score_members_flat() {
        let reply = Value::bulk_array(["a", "1", "b", "2.5"]);
        let got: Vec<ScoreMember> = decode(&reply, Protocol::Resp2).unwrap();
        assert_eq!(
            got,
            vec![ScoreMember::new(1.0, "a"), ScoreMember::new(2.5, "b")]
        );
    }

    #[test]
    fn test_score_members_nested_resp3() {
        let reply = Value::Array(vec![
            Value::Array(vec![Value::bulk_string("a"), Value::Double(1.0)]),
            Value::Array(vec![Value::bulk_string("b"), Value::Double(2.0)]),
        ]);
        let got: Vec<ScoreMember> = decode(&reply, Protocol::Resp3).unwrap();
        assert_eq!(got[1], ScoreMember::new(2.0, "b"));
    }

    #[test]
    fn test_score_member_args() {
        let mut out = Vec::new();
        ScoreMember::new(3.0, "m").write_args(&mut out);
        assert_eq!(out, vec![Bytes::from_static(b"3.0"), Bytes::from_static(b"m")]);
    }
}
