use std::collections::HashSet;

use crate::index::TreeIndex;
use crate::node::NodeId;

/// One renderable line derived from a node plus projection context.
/// Recomputed on every projection pass, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: NodeId,
    /// Nesting level below the top-level collection roots. The synthetic
    /// root contributes no depth.
    pub depth: usize,
    pub is_folder: bool,
    pub expanded: bool,
    pub is_match: bool,
}

/// Compute the full ordered row sequence for the current view.
///
/// Depth-first over the index, root excluded, children in stored order. While
/// a query is active a node is emitted only if it matches or has a matching
/// descendant, which keeps folders visible whenever anything inside them
/// matches. Children are traversed only below expanded, emitted nodes.
///
/// Pure in its four inputs; this is the single source of truth for what rows
/// exist, independent of which of them are materialized.
pub fn project(
    index: &TreeIndex,
    expanded: &HashSet<NodeId>,
    query_active: bool,
    matches: &HashSet<NodeId>,
) -> Vec<Row> {
    let mut rows = Vec::new();
    let Some(root_id) = index.root_id() else {
        return rows;
    };

    let mut stack: Vec<(&NodeId, usize)> = Vec::new();
    if expanded.contains(root_id) {
        if let Some(root) = index.get(root_id) {
            for child_id in root.child_ids.iter().rev() {
                stack.push((child_id, 0));
            }
        }
    }

    while let Some((id, depth)) = stack.pop() {
        let Some(node) = index.get(id) else {
            continue;
        };
        let is_match = matches.contains(id);
        if query_active && !is_match && !has_matching_descendant(index, id, matches) {
            continue;
        }
        let is_expanded = expanded.contains(id);
        rows.push(Row {
            id: id.clone(),
            depth,
            is_folder: node.is_folder,
            expanded: is_expanded,
            is_match,
        });
        if is_expanded {
            for child_id in node.child_ids.iter().rev() {
                stack.push((child_id, depth + 1));
            }
        }
    }
    rows
}

/// Subtree scan for at least one matching node strictly below `id`.
pub fn has_matching_descendant(
    index: &TreeIndex,
    id: &str,
    matches: &HashSet<NodeId>,
) -> bool {
    let Some(node) = index.get(id) else {
        return false;
    };
    let mut stack: Vec<&NodeId> = node.child_ids.iter().collect();
    while let Some(current) = stack.pop() {
        if matches.contains(current) {
            return true;
        }
        if let Some(child) = index.get(current) {
            stack.extend(child.child_ids.iter());
        }
    }
    false
}
