pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::error::PanelResult;
use crate::node::{Destination, Node, NodeChanges};

/// Untyped change signal from the store. Carries no payload guarantees
/// beyond "something changed"; every signal is cause for a full reload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    Created,
    Removed,
    Changed,
    Moved,
}

/// Contract of the external bookmark store. The store owns node identity,
/// ordering and content; callers never mutate a node in place.
#[async_trait]
pub trait BookmarkStore: Send + Sync {
    /// Fetch the complete tree rooted at the synthetic root.
    async fn get_tree(&self) -> PanelResult<Node>;

    /// Create a child of `parent_id`. `url` absent creates a folder.
    async fn create(&self, parent_id: &str, title: &str, url: Option<&str>) -> PanelResult<Node>;

    /// Update a node's editable fields.
    async fn update(&self, id: &str, changes: NodeChanges) -> PanelResult<()>;

    /// Reparent and/or reindex a node.
    async fn move_node(&self, id: &str, destination: Destination) -> PanelResult<()>;

    /// Remove a leaf or an empty folder.
    async fn remove(&self, id: &str) -> PanelResult<()>;

    /// Remove a node and its entire subtree.
    async fn remove_tree(&self, id: &str) -> PanelResult<()>;

    /// Subscribe to change notifications, including changes made through
    /// other surfaces.
    fn subscribe(&self) -> broadcast::Receiver<StoreChange>;
}

pub type SharedStore = Arc<dyn BookmarkStore>;
