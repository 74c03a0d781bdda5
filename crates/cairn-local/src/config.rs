use std::path::{Path, PathBuf};

use cairn_tree::CHUNK_SIZE;
use serde::{Deserialize, Serialize};

use crate::error::{LocalError, LocalResult};

/// What a traversal skips and how it splits large files.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraverseConfig {
    /// Entry names skipped wherever they appear.
    pub ignore_names: Vec<String>,
    /// Entry name suffixes skipped wherever they appear.
    pub ignore_suffixes: Vec<String>,
    /// Largest inlined file and the chunk size of larger files.
    pub chunk_size: usize,
}

impl Default for TraverseConfig {
    fn default() -> Self {
        Self {
            ignore_names: vec![".backup".into(), ".git".into(), ".DS_Store".into()],
            ignore_suffixes: vec!["~".into()],
            chunk_size: CHUNK_SIZE,
        }
    }
}

impl TraverseConfig {
    pub fn is_ignored(&self, name: &str) -> bool {
        self.ignore_names.iter().any(|n| n == name)
            || self.ignore_suffixes.iter().any(|s| name.ends_with(s.as_str()))
    }

    pub fn validate(&self) -> LocalResult<()> {
        if self.chunk_size == 0 {
            return Err(LocalError::Config("chunk_size must be positive".into()));
        }
        Ok(())
    }
}

/// A local backup source bound to a zone.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocalConfig {
    /// Zone name.
    pub zone: String,
    /// Directory to back up.
    pub source: PathBuf,
    pub traverse: TraverseConfig,
}

impl Default for LocalConfig {
    fn default() -> Self {
        Self {
            zone: "default".into(),
            source: PathBuf::from("."),
            traverse: TraverseConfig::default(),
        }
    }
}

impl LocalConfig {
    pub fn from_toml(input: &str) -> LocalResult<Self> {
        let config: Self = toml::from_str(input).map_err(|e| LocalError::Config(e.to_string()))?;
        config.traverse.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> LocalResult<Self> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }
}
