use std::collections::HashMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::Accessor;

/// Accessor backed by a directory tree.
///
/// A value lives at `{root}/{namespace}/{key}`. Writes go through a
/// temporary file in the target directory and are renamed into place, so a
/// reader never sees a partially written value.
#[derive(Debug, Clone)]
pub struct FilesystemAccessor {
    root: PathBuf,
}

impl FilesystemAccessor {
    /// Create a new store at `root`. Fails if `root` already exists.
    pub fn create(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref();
        if root.exists() {
            return Err(StoreError::InvalidRoot {
                path: root.display().to_string(),
                reason: "already exists".into(),
            });
        }
        fs::create_dir_all(root)?;
        debug!(root = %root.display(), "created filesystem store");
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    /// Open an existing store at `root`. Fails if `root` is not a directory.
    pub fn open(root: impl AsRef<Path>) -> StoreResult<Self> {
        let root = root.as_ref();
        if !root.is_dir() {
            return Err(StoreError::InvalidRoot {
                path: root.display().to_string(),
                reason: "not a directory".into(),
            });
        }
        Ok(Self {
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn namespace_dir(&self, namespace: &str) -> PathBuf {
        self.root.join(namespace)
    }

    fn value_path(&self, namespace: &str, key: &str) -> PathBuf {
        self.namespace_dir(namespace).join(key)
    }
}

fn not_found_or(err: io::Error, namespace: &str, key: &str) -> StoreError {
    if err.kind() == io::ErrorKind::NotFound {
        StoreError::not_found(namespace, key)
    } else {
        StoreError::Io(err)
    }
}

impl Accessor for FilesystemAccessor {
    fn exists(&self, namespace: &str, key: &str) -> StoreResult<bool> {
        Ok(self.value_path(namespace, key).is_file())
    }

    fn get(&self, namespace: &str, key: &str) -> StoreResult<Vec<u8>> {
        fs::read(self.value_path(namespace, key)).map_err(|e| not_found_or(e, namespace, key))
    }

    fn get_all(&self, namespace: &str) -> StoreResult<HashMap<String, Vec<u8>>> {
        let dir = self.namespace_dir(namespace);
        let entries = fs::read_dir(&dir).map_err(|e| not_found_or(e, namespace, ""))?;
        let mut values = HashMap::new();
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let Some(key) = entry.file_name().to_str().map(str::to_string) else {
                continue;
            };
            values.insert(key, fs::read(entry.path())?);
        }
        Ok(values)
    }

    fn set(&self, namespace: &str, key: &str, value: &[u8]) -> StoreResult<()> {
        let dir = self.namespace_dir(namespace);
        fs::create_dir_all(&dir)?;
        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(value)?;
        tmp.as_file().sync_all()?;
        tmp.persist(dir.join(key)).map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}
