use protocol_resp::Value;

use crate::config::Protocol;
use crate::decode::{FromReply, fixed_array, text};
use crate::error::Error;

/// One page of a `SCAN`-family iteration.
///
/// The reply is `[cursor, data]`; `data` decodes as `T`, e.g. `Vec<String>`
/// for `SCAN`/`SSCAN` or `HashMap<String, String>` for `HSCAN`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanPage<T> {
    pub cursor: u64,
    pub items: T,
}

impl<T> ScanPage<T> {
    /// Returns true when the server reported cursor 0, ending the iteration.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.cursor == 0
    }
}

impl<T: FromReply> FromReply for ScanPage<T> {
    fn from_reply(reply: &Value, protocol: Protocol) -> Result<Self, Error> {
        let items = fixed_array(reply, 2, "a scan page")?;
        let raw = text(&items[0], protocol)?;
        if raw.is_empty() {
            return Err(Error::protocol("empty scan cursor"));
        }
        let cursor = std::str::from_utf8(&raw)
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .ok_or_else(|| {
                Error::protocol(format!(
                    "invalid scan cursor {:?}",
                    String::from_utf8_lossy(&raw)
                ))
            })?;
        Ok(ScanPage {
            cursor,
            items: T::from_reply(&items[1], protocol)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;
    use std::collections::HashMap;

    #[test]
    fn test_scan_page() {
        let reply = Value::Array(vec![
            Value::bulk_string("12"),
            Value::bulk_array(["a", "b"]),
        ]);
        let page: ScanPage<Vec<String>> = decode(&reply, Protocol::Resp2).unwrap();
        assert_eq!(page.cursor, 12);
        assert_eq!(page.items, ["a", "b"]);
        assert!(!page.is_finished());
    }

    #[test]
    fn test_scan_page_map_items() {
        let reply = Value::Array(vec![
            Value::bulk_string("0"),
            Value::bulk_array(["f1", "v1", "f2", "v2"]),
        ]);
        let page: ScanPage<HashMap<String, String>> = decode(&reply, Protocol::Resp2).unwrap();
        assert!(page.is_finished());
        assert_eq!(page.items["f2"], "v2");
    }

    #[test]
    fn test_scan_page_bad_cursor() {
        for cursor in ["", "abc", "-1"] {
            let reply = Value::Array(vec![Value::bulk_string(cursor), Value::Array(vec![])]);
            assert!(
                matches!(
                    decode::<ScanPage<Vec<String>>>(&reply, Protocol::Resp2),
                    Err(Error::Protocol(_))
                ),
                "cursor {cursor:?}"
            );
        }
    }
}
