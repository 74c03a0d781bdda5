use cairn_codec::record;
use cairn_types::ContentId;
use chrono::{DateTime, TimeZone, Utc};

use crate::types::FileSize;

/// A point-in-time record of a tree.
///
/// `parent` is the previous snapshot of the zone, or undefined for the
/// first one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Creation time in Unix nanoseconds.
    pub timestamp: i64,
    pub size: FileSize,
    pub root: ContentId,
    pub parent: ContentId,
}

record!(Snapshot { timestamp, size, root, parent });

impl Snapshot {
    pub fn new(timestamp: i64, size: FileSize, root: ContentId, parent: ContentId) -> Self {
        Self {
            timestamp,
            size,
            root,
            parent,
        }
    }

    pub fn created(&self) -> DateTime<Utc> {
        Utc.timestamp_nanos(self.timestamp)
    }
}

impl std::fmt::Display for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Snapshot {} ({})", self.root, self.size)
    }
}
