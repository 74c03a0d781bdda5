use cairn_codec::record;
use cairn_types::ContentId;

use crate::types::FileMode;

/// A named reference from a directory to a child node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub mode: FileMode,
    /// Modification time in Unix seconds.
    pub mod_time: i64,
    pub entry: ContentId,
}

record!(DirectoryEntry { name, mode, mod_time, entry });

/// A directory node. Entries keep insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Directory {
    pub entries: Vec<DirectoryEntry>,
}

record!(Directory { entries });

impl Directory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_entry(
        &mut self,
        name: impl Into<String>,
        mode: FileMode,
        mod_time: i64,
        entry: ContentId,
    ) {
        self.entries.push(DirectoryEntry {
            name: name.into(),
            mode,
            mod_time,
            entry,
        });
    }

    pub fn get(&self, name: &str) -> Option<&DirectoryEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
