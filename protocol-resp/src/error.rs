//! Error types for RESP reply parsing.

/// Error type for RESP parsing operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// Need more data to complete parsing.
    /// This is not a fatal error - the caller should buffer more data and retry.
    #[error("incomplete data")]
    Incomplete,

    /// Invalid type prefix byte.
    #[error("invalid prefix byte: {0:#04x}")]
    InvalidPrefix(u8),

    /// Invalid integer format (values and length headers).
    #[error("invalid integer: {0}")]
    InvalidInteger(String),

    /// Protocol violation.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// Collection size exceeds maximum allowed limit.
    #[error("collection too large: {0} elements exceeds limit")]
    CollectionTooLarge(usize),

    /// Nesting depth exceeds maximum allowed limit.
    #[error("nesting too deep: depth {0} exceeds limit")]
    NestingTooDeep(usize),

    /// Bulk string exceeds maximum allowed size.
    #[error("bulk string too long: {len} bytes exceeds {max} byte limit")]
    BulkStringTooLong { len: usize, max: usize },

    /// Invalid floating point number.
    #[error("invalid double: {0}")]
    InvalidDouble(String),

    /// Invalid boolean value.
    #[error("invalid boolean: expected 't' or 'f'")]
    InvalidBoolean,

    /// Invalid verbatim string format.
    #[error("invalid verbatim string format")]
    InvalidVerbatimFormat,
}

impl ParseError {
    /// Returns true if this error indicates more data is needed.
    #[inline]
    pub fn is_incomplete(&self) -> bool {
        matches!(self, ParseError::Incomplete)
    }
}
