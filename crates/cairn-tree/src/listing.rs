use cairn_types::ContentId;
use chrono::{DateTime, Datelike, TimeZone, Utc};

use crate::error::TreeResult;
use crate::io::ObjectReader;
use crate::node::Node;

/// Column where entry metadata starts in verbose listings.
const NAME_COLUMN: usize = 40;

/// Render the tree under `id` as listing lines.
///
/// A snapshot prints a header and then its root tree; a directory prints
/// one line per entry with `|-- ` and `` `-- `` connectors, followed by
/// the entry's mode, modification time and ID.
pub fn render_tree<R: ObjectReader + ?Sized>(
    id: &ContentId,
    objects: &R,
) -> TreeResult<Vec<String>> {
    render_tree_at(id, objects, Utc::now())
}

/// [`render_tree`] relative to a fixed `now`, which picks the time format
/// for each entry (time of day this year, year otherwise).
pub fn render_tree_at<R: ObjectReader + ?Sized>(
    id: &ContentId,
    objects: &R,
    now: DateTime<Utc>,
) -> TreeResult<Vec<String>> {
    let mut lines = Vec::new();
    render(id, objects, now, "", &mut lines)?;
    Ok(lines)
}

fn nest(indent: &str, is_last: bool) -> String {
    if is_last {
        format!("{indent}    ")
    } else {
        format!("{indent}|   ")
    }
}

fn format_mod_time(secs: i64, now: DateTime<Utc>) -> String {
    match Utc.timestamp_opt(secs, 0).single() {
        Some(t) if t.year() != now.year() => t.format("%b %e  %Y").to_string(),
        Some(t) => t.format("%b %e %H:%M").to_string(),
        None => secs.to_string(),
    }
}

fn render<R: ObjectReader + ?Sized>(
    id: &ContentId,
    objects: &R,
    now: DateTime<Utc>,
    indent: &str,
    lines: &mut Vec<String>,
) -> TreeResult<()> {
    match Node::deserialize_by_id(id, objects)? {
        Node::Snapshot(snapshot) => {
            lines.push(format!("Snapshot {id}"));
            lines.push(format!("|-- Created: {}", snapshot.created()));
            lines.push(format!("|-- Parent : {}", snapshot.parent));
            lines.push(format!("`-- Root   : {}", snapshot.root));
            render(&snapshot.root, objects, now, &format!("{indent}    "), lines)
        }
        Node::Directory(dir) => {
            let count = dir.entries.len();
            for (idx, entry) in dir.entries.iter().enumerate() {
                let is_last = idx + 1 == count;
                let connector = if is_last { "`-- " } else { "|-- " };
                let prefix = format!("{indent}{connector}");
                let pad = NAME_COLUMN.saturating_sub(prefix.len() + entry.name.len());
                lines.push(format!(
                    "{prefix}{}{}\t{}\t{}\t{}",
                    entry.name,
                    " ".repeat(pad),
                    entry.mode,
                    format_mod_time(entry.mod_time, now),
                    entry.entry
                ));
                if entry.mode.is_dir() {
                    render(&entry.entry, objects, now, &nest(indent, is_last), lines)?;
                }
            }
            Ok(())
        }
        Node::SimpleFile(_) | Node::ChunkedFile(_) => Ok(()),
    }
}
