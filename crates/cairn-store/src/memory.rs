use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::error::{StoreError, StoreResult};
use crate::traits::Accessor;

type Namespaces = HashMap<String, HashMap<String, Vec<u8>>>;

/// In-memory accessor.
///
/// Intended for tests and embedding. Values are cloned on read and write.
#[derive(Debug, Default)]
pub struct InMemoryAccessor {
    namespaces: RwLock<Namespaces>,
}

impl InMemoryAccessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of values across all namespaces.
    pub fn len(&self) -> usize {
        self.namespaces
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .map(HashMap::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sorted list of namespaces that hold at least one value.
    pub fn namespaces(&self) -> Vec<String> {
        let map = self.namespaces.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = map.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Accessor for InMemoryAccessor {
    fn exists(&self, namespace: &str, key: &str) -> StoreResult<bool> {
        let map = self.namespaces.read().unwrap_or_else(PoisonError::into_inner);
        Ok(map.get(namespace).is_some_and(|ns| ns.contains_key(key)))
    }

    fn get(&self, namespace: &str, key: &str) -> StoreResult<Vec<u8>> {
        let map = self.namespaces.read().unwrap_or_else(PoisonError::into_inner);
        map.get(namespace)
            .and_then(|ns| ns.get(key))
            .cloned()
            .ok_or_else(|| StoreError::not_found(namespace, key))
    }

    fn get_all(&self, namespace: &str) -> StoreResult<HashMap<String, Vec<u8>>> {
        let map = self.namespaces.read().unwrap_or_else(PoisonError::into_inner);
        map.get(namespace)
            .cloned()
            .ok_or_else(|| StoreError::not_found(namespace, ""))
    }

    fn set(&self, namespace: &str, key: &str, value: &[u8]) -> StoreResult<()> {
        let mut map = self.namespaces.write().unwrap_or_else(PoisonError::into_inner);
        map.entry(namespace.to_string())
            .or_default()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
