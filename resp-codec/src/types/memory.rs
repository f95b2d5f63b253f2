use std::borrow::Cow;

use bytes::Bytes;
use protocol_resp::Value;

use crate::config::Protocol;
use crate::decode::{FromReply, text};
use crate::encode::ToArgs;
use crate::error::Error;

/// Memory usage counters from `MEMORY STATS` or the `memory` INFO section.
///
/// Counters missing from the reply, or that fail to parse, are left at zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemoryInfo {
    pub peak_allocated: u64,
    pub total_allocated: u64,
    pub startup_allocated: u64,
    pub replication_backlog: u64,
    pub clients_slaves: u64,
    pub clients_normal: u64,
    pub aof_buffer: u64,
    pub lua_caches: u64,
    pub overhead_total: u64,
    pub keys_count: u64,
    pub keys_bytes_per_key: u64,
    pub dataset_bytes: u64,
    pub dataset_percentage: f64,
    pub peak_percentage: f64,
    pub allocator_allocated: u64,
    pub allocator_resident: u64,
    pub fragmentation: f64,
}

impl MemoryInfo {
    fn counter_mut(&mut self, name: &str) -> Option<&mut u64> {
        let counter = match name {
            "peak.allocated" => &mut self.peak_allocated,
            "total.allocated" => &mut self.total_allocated,
            "startup.allocated" => &mut self.startup_allocated,
            "replication.backlog" => &mut self.replication_backlog,
            "clients.slaves" => &mut self.clients_slaves,
            "clients.normal" => &mut self.clients_normal,
            "aof.buffer" => &mut self.aof_buffer,
            "lua.caches" => &mut self.lua_caches,
            "overhead.total" => &mut self.overhead_total,
            "keys.count" => &mut self.keys_count,
            "keys.bytes-per-key" => &mut self.keys_bytes_per_key,
            "dataset.bytes" => &mut self.dataset_bytes,
            "allocator.allocated" => &mut self.allocator_allocated,
            "allocator.resident" => &mut self.allocator_resident,
            _ => return None,
        };
        Some(counter)
    }

    fn set(&mut self, name: &str, raw: &str) {
        match name {
            "dataset.percentage" => self.dataset_percentage = ratio(name, raw),
            "peak.percentage" => self.peak_percentage = ratio(name, raw),
            "fragmentation" => self.fragmentation = ratio(name, raw),
            _ => {
                if let Some(counter) = self.counter_mut(name) {
                    *counter = raw.trim().parse().unwrap_or_else(|_| {
                        tracing::debug!(counter = name, raw, "skipping unparsable memory counter");
                        0
                    });
                }
            }
        }
    }

    fn read_pairs<'a>(&mut self, entries: impl Iterator<Item = (&'a Value, &'a Value)>) {
        for (key, value) in entries {
            let Some(name) = key.as_bytes().and_then(|k| std::str::from_utf8(k).ok()) else {
                continue;
            };
            let raw: Cow<'_, str> = match value {
                Value::Integer(n) => Cow::Owned(n.to_string()),
                Value::Double(d) => Cow::Owned(d.to_string()),
                other => match other.as_bytes() {
                    Some(bytes) => String::from_utf8_lossy(bytes),
                    // Nested sections such as `db.0` carry no top-level counter.
                    None => continue,
                },
            };
            self.set(name, &raw);
        }
    }

    fn read_blob(&mut self, blob: &str) {
        for line in blob.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((name, raw)) = line.split_once(':') {
                self.set(info_name(name), raw);
            }
        }
    }
}

/// Map an `INFO memory` field onto its `MEMORY STATS` name. Names without an
/// INFO counterpart pass through unchanged.
fn info_name(name: &str) -> &str {
    match name {
        "used_memory" => "total.allocated",
        "used_memory_peak" => "peak.allocated",
        "used_memory_peak_perc" => "peak.percentage",
        "used_memory_startup" => "startup.allocated",
        "used_memory_overhead" => "overhead.total",
        "used_memory_dataset" => "dataset.bytes",
        "used_memory_dataset_perc" => "dataset.percentage",
        "used_memory_lua" | "used_memory_vm_eval" => "lua.caches",
        "mem_replication_backlog" => "replication.backlog",
        "mem_clients_slaves" => "clients.slaves",
        "mem_clients_normal" => "clients.normal",
        "mem_aof_buffer" => "aof.buffer",
        "mem_fragmentation_ratio" => "fragmentation",
        "allocator_allocated" => "allocator.allocated",
        "allocator_resident" => "allocator.resident",
        other => other,
    }
}

fn ratio(name: &str, raw: &str) -> f64 {
    let raw = raw.trim().trim_end_matches('%');
    raw.parse().unwrap_or_else(|_| {
        tracing::debug!(counter = name, raw, "skipping unparsable memory counter");
        0.0
    })
}

impl FromReply for MemoryInfo {
    fn from_reply(reply: &Value, protocol: Protocol) -> Result<Self, Error> {
        let mut info = MemoryInfo::default();
        match reply {
            Value::Array(items) => {
                info.read_pairs(items.chunks_exact(2).map(|kv| (&kv[0], &kv[1])));
            }
            Value::Map(entries) if protocol.is_resp3() => {
                info.read_pairs(entries.iter().map(|(k, v)| (k, v)));
            }
            other => {
                let blob = text(other, protocol)?;
                info.read_blob(&String::from_utf8_lossy(&blob));
            }
        }
        Ok(info)
    }
}

impl ToArgs for MemoryInfo {
    fn arg_count(&self) -> usize {
        0
    }

    fn write_args(&self, _out: &mut Vec<Bytes>) {}
}
