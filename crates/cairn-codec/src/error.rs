use thiserror::Error;

/// Errors produced while encoding or decoding values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// The input ended before the value was complete.
    #[error("unexpected end of input: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEof { needed: usize, remaining: usize },

    /// A string field did not hold valid UTF-8.
    #[error("invalid UTF-8 in string field: {0}")]
    InvalidUtf8(String),

    /// Bytes were left over after a top-level value was decoded.
    #[error("trailing bytes after value: consumed {consumed}, total {total}")]
    TrailingBytes { consumed: usize, total: usize },

    /// The value cannot be represented on the wire.
    #[error("unsupported value: {0}")]
    Unsupported(String),
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
