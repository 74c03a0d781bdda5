use cairn_types::ContentId;

use crate::error::TreeResult;
use crate::io::ObjectReader;
use crate::node::Node;
use crate::snapshot::Snapshot;

/// Walk the snapshot chain from `head`, newest first.
///
/// Follows `parent` links until an undefined parent. An undefined `head`
/// yields an empty history.
pub fn list_snapshots<R: ObjectReader + ?Sized>(
    head: &ContentId,
    objects: &R,
) -> TreeResult<Vec<(ContentId, Snapshot)>> {
    let mut history = Vec::new();
    let mut id = head.clone();
    while !id.is_undefined() {
        let snapshot = Node::deserialize_by_id(&id, objects)?.into_snapshot()?;
        let parent = snapshot.parent.clone();
        history.push((id, snapshot));
        id = parent;
    }
    Ok(history)
}
