use std::collections::HashSet;

use crate::index::TreeIndex;
use crate::node::NodeId;

/// Case-insensitive substring match of `query` against every indexed node's
/// title or url. An empty query matches nothing.
pub fn evaluate(query: &str, index: &TreeIndex) -> HashSet<NodeId> {
    let mut matches = HashSet::new();
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return matches;
    }
    for (id, node) in index.iter() {
        let title_hit = node.title.to_lowercase().contains(&needle);
        let url_hit = node
            .url
            .as_deref()
            .is_some_and(|url| url.to_lowercase().contains(&needle));
        if title_hit || url_hit {
            matches.insert(id.clone());
        }
    }
    matches
}

/// Add every ancestor of every match to `expanded` so the matches are
/// reachable in the projection. Idempotent; auto-expansion is never reverted
/// when the query later clears or changes.
pub fn expand_to_matches(
    index: &TreeIndex,
    matches: &HashSet<NodeId>,
    expanded: &mut HashSet<NodeId>,
) {
    for id in matches {
        let mut current = index.get(id).and_then(|node| node.parent_id.as_deref());
        while let Some(parent_id) = current {
            expanded.insert(parent_id.to_string());
            current = index.get(parent_id).and_then(|node| node.parent_id.as_deref());
        }
    }
}
