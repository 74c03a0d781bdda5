use std::path::PathBuf;

use cairn_tree::TreeError;
use cairn_zone::ZoneError;

/// Errors from local traversal and updates.
#[derive(Debug, thiserror::Error)]
pub enum LocalError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("directory walk failed: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("tree error: {0}")]
    Tree(#[from] TreeError),

    #[error("zone error: {0}")]
    Zone(#[from] ZoneError),

    /// The configuration is unreadable or invalid.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The backup source is not a directory.
    #[error("source '{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),
}

/// Result alias for local operations.
pub type LocalResult<T> = Result<T, LocalError>;
