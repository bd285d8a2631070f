use std::collections::HashMap;

use crate::node::{Node, NodeId};

/// Flat record for one indexed node. Children are kept as ids so the index
/// never clones subtrees.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedNode {
    pub id: NodeId,
    pub title: String,
    pub url: Option<String>,
    pub parent_id: Option<NodeId>,
    pub index: usize,
    pub date_added: Option<u64>,
    pub is_folder: bool,
    pub child_ids: Vec<NodeId>,
}

/// Id-keyed lookup table over a tree snapshot.
///
/// Rebuilt wholesale after every load or mutation; there is no incremental
/// patching. All traversals use explicit stacks, so arbitrarily deep trees
/// cannot overflow the call stack.
#[derive(Debug, Clone, Default)]
pub struct TreeIndex {
    root_id: Option<NodeId>,
    nodes: HashMap<NodeId, IndexedNode>,
}

impl TreeIndex {
    /// Flatten `root` and everything reachable from it, root included.
    ///
    /// Parent links and sibling positions are derived from the traversal, so
    /// the index stays coherent even when a snapshot omits them.
    pub fn build(root: &Node) -> Self {
        let mut nodes = HashMap::new();
        let mut stack: Vec<(&Node, Option<NodeId>, usize)> = vec![(root, None, 0)];
        while let Some((node, parent_id, position)) = stack.pop() {
            let children = node.children.as_deref().unwrap_or_default();
            nodes.insert(
                node.id.clone(),
                IndexedNode {
                    id: node.id.clone(),
                    title: node.title.clone(),
                    url: node.url.clone(),
                    parent_id,
                    index: position,
                    date_added: node.date_added,
                    is_folder: node.is_folder(),
                    child_ids: children.iter().map(|child| child.id.clone()).collect(),
                },
            );
            for (child_position, child) in children.iter().enumerate() {
                stack.push((child, Some(node.id.clone()), child_position));
            }
        }
        TreeIndex {
            root_id: Some(root.id.clone()),
            nodes,
        }
    }

    pub fn root_id(&self) -> Option<&NodeId> {
        self.root_id.as_ref()
    }

    pub fn get(&self, id: &str) -> Option<&IndexedNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &IndexedNode)> {
        self.nodes.iter()
    }

    pub fn children_len(&self, id: &str) -> usize {
        self.get(id).map(|node| node.child_ids.len()).unwrap_or(0)
    }

    /// Whether `id` lies anywhere inside the subtree rooted at `ancestor_id`
    /// (exclusive: a node is not its own descendant).
    pub fn is_descendant(&self, ancestor_id: &str, id: &str) -> bool {
        let Some(ancestor) = self.get(ancestor_id) else {
            return false;
        };
        let mut stack: Vec<&NodeId> = ancestor.child_ids.iter().collect();
        while let Some(current) = stack.pop() {
            if current == id {
                return true;
            }
            if let Some(node) = self.get(current) {
                stack.extend(node.child_ids.iter());
            }
        }
        false
    }

    /// Ancestor titles of `id`, outermost first, skipping untitled ancestors
    /// (the synthetic root has no title). The node's own title is excluded.
    pub fn path(&self, id: &str) -> Vec<String> {
        let mut parts = Vec::new();
        let mut current = self.get(id).and_then(|node| node.parent_id.as_deref());
        while let Some(parent_id) = current {
            let Some(parent) = self.get(parent_id) else {
                break;
            };
            if !parent.title.is_empty() {
                parts.push(parent.title.clone());
            }
            current = parent.parent_id.as_deref();
        }
        parts.reverse();
        parts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder(id: &str, title: &str, children: Vec<Node>) -> Node {
        Node {
            id: id.into(),
            title: title.into(),
            url: None,
            parent_id: None,
            index: 0,
            date_added: None,
            children: Some(children),
        }
    }

    fn bookmark(id: &str, title: &str, url: &str) -> Node {
        Node {
            id: id.into(),
            title: title.into(),
            url: Some(url.into()),
            parent_id: None,
            index: 0,
            date_added: None,
            children: None,
        }
    }

    fn sample_tree() -> Node {
        folder(
            "0",
            "",
            vec![
                folder(
                    "1",
                    "Bar",
                    vec![
                        folder("10", "FolderX", vec![bookmark("100", "ItemA", "https://a.example/")]),
                        bookmark("11", "ItemB", "https://b.example/"),
                    ],
                ),
                folder("2", "Other", vec![]),
            ],
        )
    }

    #[test]
    fn build_indexes_every_reachable_node_including_root() {
        let index = TreeIndex::build(&sample_tree());
        assert_eq!(index.len(), 6);
        for id in ["0", "1", "2", "10", "11", "100"] {
            assert!(index.contains(id), "missing {id}");
        }
        assert_eq!(index.root_id().map(String::as_str), Some("0"));
    }

    #[test]
    fn tolerates_missing_children_field() {
        let index = TreeIndex::build(&bookmark("solo", "Solo", "https://s.example/"));
        assert_eq!(index.len(), 1);
        assert_eq!(index.children_len("solo"), 0);
    }

    #[test]
    fn child_ids_preserve_stored_order() {
        let index = TreeIndex::build(&sample_tree());
        assert_eq!(index.get("1").unwrap().child_ids, vec!["10", "11"]);
    }

    #[test]
    fn descendant_check_is_exclusive_and_deep() {
        let index = TreeIndex::build(&sample_tree());
        assert!(index.is_descendant("1", "100"));
        assert!(index.is_descendant("0", "11"));
        assert!(!index.is_descendant("1", "1"));
        assert!(!index.is_descendant("10", "11"));
        assert!(!index.is_descendant("100", "1"));
    }

    #[test]
    fn path_skips_untitled_root() {
        let index = TreeIndex::build(&sample_tree());
        assert_eq!(index.path("100"), vec!["Bar", "FolderX"]);
        assert_eq!(index.path("1"), Vec::<String>::new());
    }

    #[test]
    fn deep_chain_does_not_overflow() {
        let mut node = bookmark("leaf", "leaf", "https://deep.example/");
        for depth in 0..20_000 {
            node = folder(&format!("f{depth}"), "f", vec![node]);
        }
        let index = TreeIndex::build(&node);
        assert_eq!(index.len(), 20_001);
        assert!(index.is_descendant("f19999", "leaf"));
    }
}
