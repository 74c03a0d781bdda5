use cairn_tree::FileSize;
use cairn_types::ContentId;
use cairn_zone::{Zone, ZoneStats};
use tracing::info;

use crate::config::LocalConfig;
use crate::error::{LocalError, LocalResult};
use crate::traverse::traverse;

/// Outcome of one backup update.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateReport {
    /// ID of the traversed source tree.
    pub root: ContentId,
    /// The new snapshot, or `None` when the tree matched the head.
    pub snapshot: Option<ContentId>,
    pub stats: ZoneStats,
}

/// Back up `config.source` into `zone` and publish a snapshot if anything
/// changed.
pub fn update(zone: &mut Zone, config: &LocalConfig) -> LocalResult<UpdateReport> {
    if !config.source.is_dir() {
        return Err(LocalError::NotADirectory(config.source.clone()));
    }
    let root = traverse(&config.source, zone, &config.traverse)?
        .ok_or_else(|| LocalError::NotADirectory(config.source.clone()))?;

    let stats = zone.stats();
    if stats.written > 0 {
        info!(
            zone = zone.name(),
            written = stats.written,
            saved = stats.saved,
            percent = %format!("{:.0}", stats.saved_percent()),
            "stored new data"
        );
    }
    let snapshot = zone.commit(&root, FileSize(stats.written as i64))?;
    match &snapshot {
        Some(id) => info!(zone = zone.name(), root = %root, snapshot = %id, "snapshot created"),
        None => info!(zone = zone.name(), root = %root, "no changes"),
    }
    Ok(UpdateReport {
        root,
        snapshot,
        stats,
    })
}
