//! Typed command families.
//!
//! Each family is an extension trait written only against [`Issue`], so any
//! transport gets it for free. They are thin: build the command, name the
//! reply type.

use bytes::Bytes;

use crate::cmd;
use crate::encode::ToArgs;
use crate::error::Error;
use crate::issue::Issue;
use crate::response::Response;
use crate::types::{ScanPage, ScoreMember, Status, StreamEntry, StreamId};

// ── Keys and strings ────────────────────────────────────────────────────

pub trait KeyCommands: Issue {
    fn get<K: ToArgs>(&mut self, key: K) -> Result<Response<Option<Bytes>>, Error> {
        self.issue(&cmd!("GET", key))
    }

    fn set<K: ToArgs, V: ToArgs>(&mut self, key: K, value: V) -> Result<Response<Status>, Error> {
        self.issue(&cmd!("SET", key, value))
    }

    /// `SET key value EX seconds`
    fn set_ex<K: ToArgs, V: ToArgs>(
        &mut self,
        key: K,
        value: V,
        seconds: u64,
    ) -> Result<Response<Status>, Error> {
        self.issue(&cmd!("SET", key, value, "EX", seconds))
    }

    /// Number of keys removed.
    fn del<K: ToArgs>(&mut self, keys: K) -> Result<Response<i64>, Error> {
        self.issue(&cmd!("DEL", keys))
    }

    fn exists<K: ToArgs>(&mut self, key: K) -> Result<Response<bool>, Error> {
        self.issue(&cmd!("EXISTS", key))
    }

    fn incr_by<K: ToArgs>(&mut self, key: K, delta: i64) -> Result<Response<i64>, Error> {
        self.issue(&cmd!("INCRBY", key, delta))
    }

    /// Remaining time to live in seconds; -1 without expiry, -2 if missing.
    fn ttl<K: ToArgs>(&mut self, key: K) -> Result<Response<i64>, Error> {
        self.issue(&cmd!("TTL", key))
    }
}

impl<X: Issue + ?Sized> KeyCommands for X {}

// ── Streams ─────────────────────────────────────────────────────────────

pub trait StreamCommands: Issue {
    /// Append an entry. `None` lets the server assign the id.
    fn xadd<K: ToArgs, F: ToArgs>(
        &mut self,
        key: K,
        id: Option<StreamId>,
        fields: F,
    ) -> Result<Response<StreamId>, Error> {
        let command = match id {
            Some(id) => cmd!("XADD", key, id, fields),
            None => cmd!("XADD", key, "*", fields),
        };
        self.issue(&command)
    }

    fn xrange<K: ToArgs>(
        &mut self,
        key: K,
        start: &str,
        end: &str,
        count: Option<u64>,
    ) -> Result<Response<Vec<StreamEntry>>, Error> {
        let limit = count.map(|n| ("COUNT", n));
        self.issue(&cmd!("XRANGE", key, start, end, limit))
    }

    fn xlen<K: ToArgs>(&mut self, key: K) -> Result<Response<i64>, Error> {
        self.issue(&cmd!("XLEN", key))
    }
}

impl<X: Issue + ?Sized> StreamCommands for X {}

// ── Cursor iteration ────────────────────────────────────────────────────

pub trait ScanCommands: Issue {
    fn scan(
        &mut self,
        cursor: u64,
        pattern: Option<&str>,
        count: Option<u64>,
    ) -> Result<Response<ScanPage<Vec<String>>>, Error> {
        let pattern = pattern.map(|p| ("MATCH", p));
        let count = count.map(|n| ("COUNT", n));
        self.issue(&cmd!("SCAN", cursor, pattern, count))
    }

    fn hscan<K: ToArgs>(
        &mut self,
        key: K,
        cursor: u64,
    ) -> Result<Response<ScanPage<Vec<(String, String)>>>, Error> {
        self.issue(&cmd!("HSCAN", key, cursor))
    }

    fn zscan<K: ToArgs>(
        &mut self,
        key: K,
        cursor: u64,
    ) -> Result<Response<ScanPage<Vec<ScoreMember>>>, Error> {
        self.issue(&cmd!("ZSCAN", key, cursor))
    }
}

impl<X: Issue + ?Sized> ScanCommands for X {}
