use std::fs::{self, Metadata};
use std::io::BufReader;
use std::path::Path;

use cairn_tree::{write_file_with, Directory, FileMode, Node, ObjectWriter};
use cairn_types::ContentId;
use chrono::{DateTime, Utc};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::config::TraverseConfig;
use crate::error::LocalResult;

/// Store the tree rooted at `path` into `writer`, bottom-up.
///
/// Returns the ID of the node for `path`, or `None` when `path` is skipped:
/// symlinks, devices, pipes and sockets, and names matched by the ignore
/// rules. Directory entries are recorded sorted by file name.
pub fn traverse<W: ObjectWriter + ?Sized>(
    path: &Path,
    writer: &mut W,
    config: &TraverseConfig,
) -> LocalResult<Option<ContentId>> {
    config.validate()?;
    visit(path, writer, config)
}

fn visit<W: ObjectWriter + ?Sized>(
    path: &Path,
    writer: &mut W,
    config: &TraverseConfig,
) -> LocalResult<Option<ContentId>> {
    let metadata = fs::symlink_metadata(path)?;
    let file_type = metadata.file_type();
    if !file_type.is_dir() && !file_type.is_file() {
        debug!(path = %path.display(), "skipping special file");
        return Ok(None);
    }
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        if config.is_ignored(name) {
            debug!(path = %path.display(), "skipping ignored entry");
            return Ok(None);
        }
    }

    if file_type.is_file() {
        let file = BufReader::new(fs::File::open(path)?);
        let id = write_file_with(writer, file, metadata.len(), config.chunk_size)?;
        return Ok(Some(id));
    }

    let mut dir = Directory::new();
    let entries = WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();
    for entry in entries {
        let entry = entry?;
        let Some(name) = entry.file_name().to_str().map(str::to_string) else {
            warn!(path = %entry.path().display(), "skipping entry with non UTF-8 name");
            continue;
        };
        let Some(id) = visit(entry.path(), writer, config)? else {
            continue;
        };
        let metadata = entry.metadata()?;
        debug!(id = %id, name = %name, dir = metadata.is_dir(), "stored entry");
        dir.add_entry(name, file_mode(&metadata), mod_time(&metadata), id);
    }
    Ok(Some(writer.write(&Node::from(dir).serialize()?)?))
}

#[cfg(unix)]
fn permissions(metadata: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    metadata.permissions().mode()
}

#[cfg(not(unix))]
fn permissions(metadata: &Metadata) -> u32 {
    match (metadata.is_dir(), metadata.permissions().readonly()) {
        (true, _) => 0o755,
        (false, true) => 0o444,
        (false, false) => 0o644,
    }
}

fn file_mode(metadata: &Metadata) -> FileMode {
    let perm = permissions(metadata);
    if metadata.is_dir() {
        FileMode::dir(perm)
    } else {
        FileMode::file(perm)
    }
}

/// Modification time in Unix seconds, 0 when the platform has none.
fn mod_time(metadata: &Metadata) -> i64 {
    metadata
        .modified()
        .map(|t| DateTime::<Utc>::from(t).timestamp())
        .unwrap_or(0)
}
