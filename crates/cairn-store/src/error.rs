/// Errors from persistence accessors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No value under `key` in `namespace`, or no such namespace.
    #[error("not found: {namespace}/{key}")]
    NotFound { namespace: String, key: String },

    /// The store root cannot be created or opened.
    #[error("invalid store root {path}: {reason}")]
    InvalidRoot { path: String, reason: String },

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn not_found(namespace: &str, key: &str) -> Self {
        Self::NotFound {
            namespace: namespace.to_string(),
            key: key.to_string(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
