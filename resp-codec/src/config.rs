//! Codec configuration.

use protocol_resp::ParseOptions;

/// Protocol revision negotiated on the connection (`HELLO 2` / `HELLO 3`).
///
/// Decoders accept extra reply kinds under RESP3, e.g. a native `Double` for
/// floating point results or a `Set` for sequences.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Protocol {
    #[default]
    Resp2,
    Resp3,
}

impl Protocol {
    #[inline]
    pub const fn is_resp3(self) -> bool {
        matches!(self, Protocol::Resp3)
    }
}

/// Codec configuration: protocol revision plus wire parsing limits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Config {
    /// Protocol revision used to interpret replies.
    pub protocol: Protocol,
    /// Limits applied when parsing raw reply bytes.
    pub parse: ParseOptions,
}

impl Config {
    /// RESP2 with default parse limits.
    pub const fn new() -> Self {
        Self {
            protocol: Protocol::Resp2,
            parse: ParseOptions::new(),
        }
    }

    /// Set the protocol revision.
    pub const fn protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Set the wire parsing limits.
    pub const fn parse_options(mut self, parse: ParseOptions) -> Self {
        self.parse = parse;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config, Config::new());
        assert_eq!(config.protocol, Protocol::Resp2);
        assert!(!config.protocol.is_resp3());
    }

    #[test]
    fn test_builder() {
        let config = Config::new()
            .protocol(Protocol::Resp3)
            .parse_options(ParseOptions::new().max_depth(4));
        assert!(config.protocol.is_resp3());
        assert_eq!(config.parse.max_depth, 4);
    }
}
