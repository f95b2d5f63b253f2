//! `CLUSTER NODES` output.
//!
//! Each line describes one node:
//!
//! ```text
//! <id> <ip:port@cport[,hostname]> <flags> <master> <ping-sent> <pong-recv> <config-epoch> <link-state> <slot> <slot> ... <slot>
//! ```

use std::ops::RangeInclusive;
use std::str::FromStr;

use protocol_resp::Value;

use crate::config::Protocol;
use crate::decode::{FromReply, text, utf8};
use crate::error::Error;

/// One node from `CLUSTER NODES`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterNode {
    pub id: String,
    pub ip: String,
    pub port: u16,
    /// Cluster bus port, absent in output from servers before 4.0.
    pub bus_port: Option<u16>,
    pub hostname: Option<String>,
    pub flags: Vec<String>,
    /// Id of the master this node replicates, `None` for masters.
    pub master: Option<String>,
    pub ping_sent: u64,
    pub pong_received: u64,
    pub epoch: u64,
    pub link_state: String,
    /// Raw slot tokens: `"0-5460"`, `"42"`, or migration markers in brackets.
    pub slots: Vec<String>,
}

impl ClusterNode {
    pub fn has_flag(&self, flag: &str) -> bool {
        self.flags.iter().any(|f| f == flag)
    }

    pub fn is_master(&self) -> bool {
        self.has_flag("master")
    }

    pub fn is_myself(&self) -> bool {
        self.has_flag("myself")
    }

    /// Slot ranges served by this node.
    ///
    /// Single slots become one-element ranges. Migration markers such as
    /// `[93-<-<node id>]` are skipped.
    pub fn slot_ranges(&self) -> impl Iterator<Item = RangeInclusive<u16>> + '_ {
        self.slots.iter().filter_map(|token| {
            if token.starts_with('[') {
                return None;
            }
            match token.split_once('-') {
                Some((start, end)) => Some(start.parse().ok()?..=end.parse().ok()?),
                None => {
                    let slot = token.parse().ok()?;
                    Some(slot..=slot)
                }
            }
        })
    }

    /// Returns true if this node serves `slot`.
    pub fn owns_slot(&self, slot: u16) -> bool {
        self.slot_ranges().any(|range| range.contains(&slot))
    }
}

impl FromStr for ClusterNode {
    type Err = Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::protocol(format!("invalid cluster node line {line:?}"));

        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 8 {
            return Err(invalid());
        }

        // ip:port@cport[,hostname]
        let (address, hostname) = match fields[1].split_once(',') {
            Some((address, hostname)) => (address, Some(hostname)),
            None => (fields[1], None),
        };
        let (address, bus_port) = match address.split_once('@') {
            Some((address, bus)) => (address, Some(bus.parse().map_err(|_| invalid())?)),
            None => (address, None),
        };
        let (ip, port) = address.rsplit_once(':').ok_or_else(invalid)?;

        let number = |s: &str| s.parse::<u64>().map_err(|_| invalid());

        Ok(ClusterNode {
            id: fields[0].to_string(),
            ip: ip.to_string(),
            port: port.parse().map_err(|_| invalid())?,
            bus_port,
            hostname: hostname.filter(|h| !h.is_empty()).map(str::to_string),
            flags: fields[2].split(',').map(str::to_string).collect(),
            master: (fields[3] != "-").then(|| fields[3].to_string()),
            ping_sent: number(fields[4])?,
            pong_received: number(fields[5])?,
            epoch: number(fields[6])?,
            link_state: fields[7].to_string(),
            slots: fields[8..].iter().map(|s| s.to_string()).collect(),
        })
    }
}

impl FromReply for ClusterNode {
    fn from_reply(reply: &Value, protocol: Protocol) -> Result<Self, Error> {
        let blob = utf8(text(reply, protocol)?)?;
        blob.lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .ok_or_else(|| Error::protocol("empty cluster node reply"))?
            .parse()
    }
}

/// Every node listed in a `CLUSTER NODES` reply, in reply order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterNodes(pub Vec<ClusterNode>);

impl ClusterNodes {
    pub fn iter(&self) -> std::slice::Iter<'_, ClusterNode> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The node flagged `myself`, i.e. the one that answered.
    pub fn myself(&self) -> Option<&ClusterNode> {
        self.0.iter().find(|node| node.is_myself())
    }

    /// The master serving `slot`.
    pub fn master_for_slot(&self, slot: u16) -> Option<&ClusterNode> {
        self.0
            .iter()
            .find(|node| node.is_master() && node.owns_slot(slot))
    }

    pub fn into_inner(self) -> Vec<ClusterNode> {
        self.0
    }
}

impl FromReply for ClusterNodes {
    fn from_reply(reply: &Value, protocol: Protocol) -> Result<Self, Error> {
        let blob = utf8(text(reply, protocol)?)?;
        blob.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::parse)
            .collect::<Result<Vec<_>, _>>()
            .map(ClusterNodes)
    }
}
