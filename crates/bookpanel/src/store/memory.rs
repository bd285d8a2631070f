use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::error::{PanelError, PanelResult};
use crate::node::{Destination, Node, NodeChanges, NodeId};
use crate::store::{BookmarkStore, StoreChange};

const CHANGE_CHANNEL_CAPACITY: usize = 16;

/// In-process implementation of the store contract.
///
/// Mirrors the browser store's observable behavior: a synthetic root with
/// top-level collection folders that cannot be edited or removed, moves
/// implemented as remove-then-insert with the index clamped to the new
/// sibling count, contiguous sibling reindexing after every structural edit,
/// and an untyped change broadcast. Backs hosts without a browser backend
/// and the test suite.
pub struct MemoryStore {
    tree: Mutex<Node>,
    changes: broadcast::Sender<StoreChange>,
}

impl MemoryStore {
    /// A store seeded like a fresh browser profile: root plus two empty
    /// top-level collections.
    pub fn new() -> Self {
        let root = Node {
            id: "0".into(),
            title: String::new(),
            url: None,
            parent_id: None,
            index: 0,
            date_added: None,
            children: Some(vec![
                empty_folder("1", "Bookmarks Bar"),
                empty_folder("2", "Other Bookmarks"),
            ]),
        };
        Self::with_tree(root)
    }

    /// A store over an arbitrary seed tree. Parent links, sibling indices
    /// and folder `children` fields are normalized so callers can build
    /// seeds by nesting literals.
    pub fn with_tree(mut root: Node) -> Self {
        root.parent_id = None;
        root.index = 0;
        normalize(&mut root);
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        MemoryStore {
            tree: Mutex::new(root),
            changes,
        }
    }

    fn notify(&self, change: StoreChange) {
        let _ = self.changes.send(change);
    }

    fn guard_structural(&self, tree: &Node, id: &str) -> PanelResult<()> {
        if id == tree.id {
            return Err(PanelError::Store("can't modify the root".into()));
        }
        let top_level = tree
            .children
            .as_deref()
            .unwrap_or_default()
            .iter()
            .any(|child| child.id == id);
        if top_level {
            return Err(PanelError::Store(
                "can't modify a top-level collection folder".into(),
            ));
        }
        Ok(())
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookmarkStore for MemoryStore {
    async fn get_tree(&self) -> PanelResult<Node> {
        Ok(self.tree.lock().clone())
    }

    async fn create(&self, parent_id: &str, title: &str, url: Option<&str>) -> PanelResult<Node> {
        let created = {
            let mut tree = self.tree.lock();
            let parent = find_mut(&mut tree, parent_id)
                .ok_or_else(|| PanelError::Store(format!("no such parent: {parent_id}")))?;
            if !parent.is_folder() {
                return Err(PanelError::Store(format!(
                    "parent is not a folder: {parent_id}"
                )));
            }
            let children = parent.children.get_or_insert_with(Vec::new);
            let node = Node {
                id: Uuid::new_v4().to_string(),
                title: title.to_string(),
                url: url.map(str::to_string),
                parent_id: Some(parent_id.to_string()),
                index: children.len(),
                date_added: Some(now_millis()),
                children: if url.is_none() { Some(Vec::new()) } else { None },
            };
            children.push(node.clone());
            node
        };
        self.notify(StoreChange::Created);
        Ok(created)
    }

    async fn update(&self, id: &str, changes: NodeChanges) -> PanelResult<()> {
        {
            let mut tree = self.tree.lock();
            self.guard_structural(&tree, id)?;
            let node = find_mut(&mut tree, id)
                .ok_or_else(|| PanelError::Store(format!("no such node: {id}")))?;
            if changes.url.is_some() && node.is_folder() {
                return Err(PanelError::Store("can't set a url on a folder".into()));
            }
            if let Some(title) = changes.title {
                node.title = title;
            }
            if let Some(url) = changes.url {
                node.url = Some(url);
            }
        }
        self.notify(StoreChange::Changed);
        Ok(())
    }

    async fn move_node(&self, id: &str, destination: Destination) -> PanelResult<()> {
        {
            let mut tree = self.tree.lock();
            self.guard_structural(&tree, id)?;

            let subject = find(&tree, id)
                .ok_or_else(|| PanelError::Store(format!("no such node: {id}")))?;
            if destination.parent_id == id || contains(subject, &destination.parent_id) {
                return Err(PanelError::Store(
                    "can't move a folder under its own subtree".into(),
                ));
            }
            {
                let new_parent = find(&tree, &destination.parent_id).ok_or_else(|| {
                    PanelError::Store(format!("no such parent: {}", destination.parent_id))
                })?;
                if !new_parent.is_folder() {
                    return Err(PanelError::Store(format!(
                        "destination is not a folder: {}",
                        destination.parent_id
                    )));
                }
            }

            // Remove first, then insert: later siblings of the source have
            // already shifted down by the time the insert applies.
            let mut detached = detach(&mut tree, id)
                .ok_or_else(|| PanelError::Store(format!("no such node: {id}")))?;
            detached.parent_id = Some(destination.parent_id.clone());
            let parent = find_mut(&mut tree, &destination.parent_id)
                .expect("destination parent checked above");
            let children = parent.children.get_or_insert_with(Vec::new);
            let slot = destination.index.min(children.len());
            children.insert(slot, detached);
            renumber(children);
        }
        self.notify(StoreChange::Moved);
        Ok(())
    }

    async fn remove(&self, id: &str) -> PanelResult<()> {
        {
            let mut tree = self.tree.lock();
            self.guard_structural(&tree, id)?;
            let node = find(&tree, id)
                .ok_or_else(|| PanelError::Store(format!("no such node: {id}")))?;
            if node.children.as_deref().is_some_and(|c| !c.is_empty()) {
                return Err(PanelError::Store("can't remove a non-empty folder".into()));
            }
            detach(&mut tree, id);
        }
        self.notify(StoreChange::Removed);
        Ok(())
    }

    async fn remove_tree(&self, id: &str) -> PanelResult<()> {
        {
            let mut tree = self.tree.lock();
            self.guard_structural(&tree, id)?;
            detach(&mut tree, id)
                .ok_or_else(|| PanelError::Store(format!("no such node: {id}")))?;
        }
        self.notify(StoreChange::Removed);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }
}

fn empty_folder(id: &str, title: &str) -> Node {
    Node {
        id: id.into(),
        title: title.into(),
        url: None,
        parent_id: None,
        index: 0,
        date_added: None,
        children: Some(Vec::new()),
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Fix up parent links, sibling indices and folder children fields below
/// `node`.
fn normalize(node: &mut Node) {
    if node.is_folder() && node.children.is_none() {
        node.children = Some(Vec::new());
    }
    let id: NodeId = node.id.clone();
    if let Some(children) = node.children.as_mut() {
        for (position, child) in children.iter_mut().enumerate() {
            child.parent_id = Some(id.clone());
            child.index = position;
            normalize(child);
        }
    }
}

fn find<'a>(node: &'a Node, id: &str) -> Option<&'a Node> {
    if node.id == id {
        return Some(node);
    }
    node.children
        .as_deref()
        .unwrap_or_default()
        .iter()
        .find_map(|child| find(child, id))
}

fn find_mut<'a>(node: &'a mut Node, id: &str) -> Option<&'a mut Node> {
    if node.id == id {
        return Some(node);
    }
    node.children
        .as_deref_mut()
        .unwrap_or_default()
        .iter_mut()
        .find_map(|child| find_mut(child, id))
}

fn contains(node: &Node, id: &str) -> bool {
    find(node, id).is_some()
}

/// Remove `id` from its parent, renumbering the remaining siblings.
fn detach(root: &mut Node, id: &str) -> Option<Node> {
    let parent = find_parent_mut(root, id)?;
    let children = parent.children.as_mut()?;
    let position = children.iter().position(|child| child.id == id)?;
    let detached = children.remove(position);
    renumber(children);
    Some(detached)
}

fn find_parent_mut<'a>(node: &'a mut Node, child_id: &str) -> Option<&'a mut Node> {
    let direct = node
        .children
        .as_deref()
        .unwrap_or_default()
        .iter()
        .any(|child| child.id == child_id);
    if direct {
        return Some(node);
    }
    node.children
        .as_deref_mut()
        .unwrap_or_default()
        .iter_mut()
        .find_map(|child| find_parent_mut(child, child_id))
}

fn renumber(children: &mut [Node]) {
    for (position, child) in children.iter_mut().enumerate() {
        child.index = position;
    }
}
