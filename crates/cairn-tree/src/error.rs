use cairn_codec::CodecError;

use crate::types::NodeType;

/// Errors from tree node handling.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    /// Node bytes did not decode.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),

    /// An undefined ID was dereferenced.
    #[error("undefined ID")]
    UndefinedId,

    /// The type tag names no known node type.
    #[error("unsupported tree node type {0}")]
    UnsupportedType(u8),

    /// No bytes to decode.
    #[error("truncated node data")]
    Truncated,

    /// A node of one type was found where another was required.
    #[error("expected {expected} node, found {actual}")]
    UnexpectedType { expected: NodeType, actual: NodeType },

    /// The node is not a file.
    #[error("{0} node is not a file")]
    NotAFile(NodeType),

    /// The object source or sink failed.
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Reading file content failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TreeError {
    /// Wrap an object source or sink error.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Box::new(err))
    }
}

/// Result alias for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
