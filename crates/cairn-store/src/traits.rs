use std::collections::HashMap;

use crate::error::StoreResult;

/// Namespaced key-value persistence.
///
/// Accessors hold opaque bytes: zones store encrypted objects, wrapped
/// secrets and root pointers here without the backend seeing plaintext.
///
/// - Namespaces are `/`-separated paths; keys are flat names inside one.
/// - `set` overwrites.
/// - Implementations are shared across threads and must be `Send + Sync`.
pub trait Accessor: Send + Sync {
    /// Whether `key` exists in `namespace`.
    fn exists(&self, namespace: &str, key: &str) -> StoreResult<bool>;

    /// Read a value.
    ///
    /// Returns `StoreError::NotFound` if the key or namespace is missing.
    fn get(&self, namespace: &str, key: &str) -> StoreResult<Vec<u8>>;

    /// Read every value directly inside `namespace`.
    ///
    /// Returns `StoreError::NotFound` if the namespace does not exist.
    fn get_all(&self, namespace: &str) -> StoreResult<HashMap<String, Vec<u8>>>;

    /// Write a value, creating the namespace if needed.
    fn set(&self, namespace: &str, key: &str, value: &[u8]) -> StoreResult<()>;
}
