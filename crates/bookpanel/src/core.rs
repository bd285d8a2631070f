
use std::ops::Range;
use std::time::{Duration, Instant};

use url::Url;

use crate::config::PanelConfig;
use crate::drag::{band_for_pointer, plan_drop, DragState, DropBand, DropHint};
use crate::error::{PanelError, PanelResult};
use crate::index::TreeIndex;
use crate::node::{Destination, NodeChanges, NodeId};
use crate::state::ViewState;
use crate::store::{SharedStore, StoreChange};
use crate::timer::DelaySlot;
use crate::view::search::{evaluate, expand_to_matches};
use crate::view::{project, visible_range, Row};

/// Emitted when a long press matures into a context-menu request.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextMenuRequest {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
}

#[derive(Debug)]
struct PendingPress {
    id: NodeId,
    x: f64,
    y: f64,
}

/// Primary facade for the panel engine.
///
/// Owns the derived projection state and orchestrates the flow: store
/// snapshot → index → projection → window, and gesture → mutation → store →
/// full resynchronization. All methods run on one logical thread; mutating
/// operations suspend the caller until the store round-trip completes.
pub struct Panel {
    store: SharedStore,
    config: PanelConfig,
    index: TreeIndex,
    state: ViewState,
    rows: Vec<Row>,
    search_slot: DelaySlot<String>,
    press_slot: DelaySlot<PendingPress>,
}

impl Panel {
    pub fn new(store: SharedStore) -> Self {
        Self::with_config(store, PanelConfig::default())
    }

    pub fn with_config(store: SharedStore, config: PanelConfig) -> Self {
        Panel {
            store,
            config,
            index: TreeIndex::default(),
            state: ViewState::default(),
            rows: Vec::new(),
            search_slot: DelaySlot::new(),
            press_slot: DelaySlot::new(),
        }
    }

    // ------------------------------------------------------------------
    // Loading & resynchronization
    // ------------------------------------------------------------------

    /// Fetch the complete tree and rebuild every derived structure.
    ///
    /// The synthetic root and the top-level collection folders are expanded
    /// so the panel opens showing the collections. View state referencing
    /// ids that vanished is pruned; a stale selection clears.
    pub async fn reload(&mut self) -> PanelResult<()> {
        let root = self.store.get_tree().await?;
        self.index = TreeIndex::build(&root);
        self.state.expanded.insert(root.id.clone());
        for child in root.children.as_deref().unwrap_or_default() {
            self.state.expanded.insert(child.id.clone());
        }
        self.state.retain_known(&self.index);
        self.refresh_projection();
        tracing::info!(nodes = self.index.len(), "bookmark tree loaded");
        Ok(())
    }

    /// Any store signal, regardless of kind, triggers a full reload. The
    /// last reload to complete wins; every reload fetches complete
    /// authoritative state.
    pub async fn handle_store_change(&mut self, _change: StoreChange) -> PanelResult<()> {
        self.reload().await
    }

    fn refresh_projection(&mut self) {
        self.rows = project(
            &self.index,
            &self.state.expanded,
            self.state.search_active(),
            &self.state.matches,
        );
    }

    // ------------------------------------------------------------------
    // Projection & windowing
    // ------------------------------------------------------------------

    /// The full ordered row sequence for the current view state.
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// The slice of the projection a scrolled viewport must materialize.
    pub fn visible_window(
        &self,
        scroll_offset: f64,
        viewport_height: f64,
        row_height: f64,
    ) -> (Range<usize>, &[Row]) {
        let range = visible_range(
            self.rows.len(),
            row_height,
            scroll_offset,
            viewport_height,
            self.config.overscan,
        );
        (range.clone(), &self.rows[range])
    }

    pub fn index(&self) -> &TreeIndex {
        &self.index
    }

    pub fn config(&self) -> &PanelConfig {
        &self.config
    }

    pub fn selected(&self) -> Option<&NodeId> {
        self.state.selected.as_ref()
    }

    pub fn drag_state(&self) -> &DragState {
        &self.state.drag
    }

    pub fn drop_hint(&self) -> Option<&DropHint> {
        self.state.drop_hint.as_ref()
    }

    pub fn query(&self) -> &str {
        &self.state.query
    }

    pub fn search_match_count(&self) -> usize {
        self.state.matches.len()
    }

    /// Top-level collection folders cannot be deleted or moved.
    pub fn is_special(&self, id: &str) -> bool {
        let Some(root_id) = self.index.root_id() else {
            return false;
        };
        self.index.get(id).and_then(|node| node.parent_id.as_deref()) == Some(root_id.as_str())
    }

    /// Where an "add" action should insert: the selected folder, the parent
    /// of a selected leaf, or the first top-level collection.
    pub fn target_folder_for_insert(&self) -> Option<NodeId> {
        if let Some(selected) = self.state.selected.as_deref() {
            if let Some(node) = self.index.get(selected) {
                if node.is_folder {
                    return Some(node.id.clone());
                }
                if let Some(parent_id) = node.parent_id.clone() {
                    return Some(parent_id);
                }
            }
        }
        let root = self.index.get(self.index.root_id()?)?;
        root.child_ids.first().cloned()
    }

    // ------------------------------------------------------------------
    // Row gestures
    // ------------------------------------------------------------------

    pub fn toggle_folder(&mut self, id: &str) {
        if !self.index.contains(id) {
            return;
        }
        if !self.state.expanded.remove(id) {
            self.state.expanded.insert(id.to_string());
        }
        self.refresh_projection();
    }

    /// Select a row; activating a folder also toggles it. An id that is no
    /// longer in the index clears the selection instead of raising.
    pub fn activate_row(&mut self, id: &str) {
        let Some(node) = self.index.get(id) else {
            self.state.selected = None;
            return;
        };
        let is_folder = node.is_folder;
        self.state.selected = Some(id.to_string());
        if is_folder {
            self.toggle_folder(id);
        }
    }

    // ------------------------------------------------------------------
    // Search (debounced)
    // ------------------------------------------------------------------

    /// Record a keystroke. Evaluation runs once the quiescence delay passes
    /// with no further input; a new keystroke replaces any pending one, so
    /// at most one evaluation is ever outstanding.
    pub fn set_search_input(&mut self, text: &str, now: Instant) {
        let deadline = now + Duration::from_millis(self.config.search_debounce_ms);
        self.search_slot.schedule(text.trim().to_string(), deadline);
    }

    /// Drop the query and match set immediately. Auto-expanded folders stay
    /// expanded.
    pub fn clear_search(&mut self) {
        self.search_slot.cancel();
        self.state.clear_search();
        self.refresh_projection();
    }

    /// Advance the panel's timers. Fires at most one due search evaluation
    /// and returns a context-menu request if a long press matured.
    pub fn tick(&mut self, now: Instant) -> Option<ContextMenuRequest> {
        if let Some(query) = self.search_slot.fire(now) {
            self.apply_search(query);
        }
        self.press_slot.fire(now).map(|press| ContextMenuRequest {
            id: press.id,
            x: press.x,
            y: press.y,
        })
    }

    fn apply_search(&mut self, query: String) {
        self.state.matches.clear();
        self.state.query = query;
        if self.state.search_active() {
            self.state.matches = evaluate(&self.state.query, &self.index);
            expand_to_matches(&self.index, &self.state.matches, &mut self.state.expanded);
            tracing::debug!(
                query = %self.state.query,
                matches = self.state.matches.len(),
                "search evaluated"
            );
        }
        self.refresh_projection();
    }

    // ------------------------------------------------------------------
    // Long press
    // ------------------------------------------------------------------

    /// Start the long-press timer for one row. Any subsequent move, release
    /// or cancel for the gesture cancels it, so it never fires after a drag
    /// begins.
    pub fn press(&mut self, id: &str, x: f64, y: f64, now: Instant) {
        let deadline = now + Duration::from_millis(self.config.long_press_ms);
        self.press_slot.schedule(
            PendingPress {
                id: id.to_string(),
                x,
                y,
            },
            deadline,
        );
    }

    pub fn press_moved(&mut self) {
        self.press_slot.cancel();
    }

    pub fn press_released(&mut self) {
        self.press_slot.cancel();
    }

    // ------------------------------------------------------------------
    // Drag & drop
    // ------------------------------------------------------------------

    pub fn drag_start(&mut self, id: &str) {
        self.press_slot.cancel();
        if !self.index.contains(id) {
            return;
        }
        self.state.drag = DragState::Dragging {
            source: id.to_string(),
        };
        self.state.drop_hint = None;
    }

    /// Update the hover band while the pointer moves over a target row.
    pub fn drag_over(&mut self, target_id: &str, pointer_y: f64, row_height: f64) {
        let Some(source) = self.state.drag.source().cloned() else {
            return;
        };
        let Some(target) = self.index.get(target_id) else {
            self.state.drop_hint = None;
            return;
        };
        let band = band_for_pointer(pointer_y, row_height, target.is_folder);
        self.state.drop_hint = Some(DropHint {
            target_id: target_id.to_string(),
            band,
        });
        self.state.drag = DragState::Hovering {
            source,
            target: target_id.to_string(),
            band,
        };
    }

    pub fn drag_leave(&mut self) {
        self.state.drop_hint = None;
        if let DragState::Hovering { source, .. } = self.state.drag.clone() {
            self.state.drag = DragState::Dragging { source };
        }
    }

    pub fn drag_cancel(&mut self) {
        self.state.reset_drag();
    }

    /// Complete the gesture: translate the drop into a single move request,
    /// submit it and resynchronize. No-op drops return quietly; a cycle is
    /// rejected before any store traffic.
    pub async fn drop_at(
        &mut self,
        target_id: &str,
        pointer_y: f64,
        row_height: f64,
    ) -> PanelResult<()> {
        let Some(source_id) = self.state.drag.source().cloned() else {
            self.state.reset_drag();
            return Ok(());
        };
        self.state.reset_drag();

        let Some(target) = self.index.get(target_id) else {
            return Ok(());
        };
        let band = band_for_pointer(pointer_y, row_height, target.is_folder);

        match plan_drop(&self.index, &source_id, target_id, band)? {
            Some(destination) => {
                if band == DropBand::Inside {
                    self.state.expanded.insert(target_id.to_string());
                }
                if let Err(err) = self.store.move_node(&source_id, destination).await {
                    tracing::warn!("move rejected by store: {err}");
                    return Err(err);
                }
                self.reload().await
            }
            None => {
                self.refresh_projection();
                Ok(())
            }
        }
    }

    // ------------------------------------------------------------------
    // Mutation gateway
    // ------------------------------------------------------------------
    // Every operation validates first, issues exactly one store call, and
    // resynchronizes on success. Nothing is applied speculatively, so a
    // failure leaves no local state to roll back.

    pub async fn rename(&mut self, id: &str, title: &str) -> PanelResult<()> {
        self.require_known(id)?;
        let title = title.trim();
        if title.is_empty() {
            return Err(PanelError::Validation("title is empty".into()));
        }
        self.store
            .update(
                id,
                NodeChanges {
                    title: Some(title.to_string()),
                    url: None,
                },
            )
            .await?;
        self.reload().await
    }

    pub async fn set_url(&mut self, id: &str, url: &str) -> PanelResult<()> {
        self.require_known(id)?;
        if self.index.get(id).is_some_and(|node| node.is_folder) {
            return Err(PanelError::Validation("a folder has no url".into()));
        }
        let url = normalize_url(url)?;
        self.store
            .update(
                id,
                NodeChanges {
                    title: None,
                    url: Some(url),
                },
            )
            .await?;
        self.reload().await
    }

    /// Create a bookmark under a folder. An empty title falls back to the
    /// normalized url. The parent is expanded and the new node selected.
    pub async fn create_bookmark(
        &mut self,
        parent_id: &str,
        title: &str,
        url: &str,
    ) -> PanelResult<NodeId> {
        self.require_folder(parent_id)?;
        let url = normalize_url(url)?;
        let title = title.trim();
        let title = if title.is_empty() { url.as_str() } else { title };
        let created = self.store.create(parent_id, title, Some(&url)).await?;
        self.finish_create(parent_id, created.id).await
    }

    pub async fn create_folder(&mut self, parent_id: &str, title: &str) -> PanelResult<NodeId> {
        self.require_folder(parent_id)?;
        let title = title.trim();
        if title.is_empty() {
            return Err(PanelError::Validation("folder name is empty".into()));
        }
        let created = self.store.create(parent_id, title, None).await?;
        self.finish_create(parent_id, created.id).await
    }

    async fn finish_create(&mut self, parent_id: &str, created_id: NodeId) -> PanelResult<NodeId> {
        self.state.expanded.insert(parent_id.to_string());
        self.reload().await?;
        if self.index.contains(&created_id) {
            self.state.selected = Some(created_id.clone());
        }
        Ok(created_id)
    }

    /// Delete a node; folders take their entire subtree with them. A
    /// selection pointing at the deleted node clears.
    pub async fn remove(&mut self, id: &str) -> PanelResult<()> {
        self.require_known(id)?;
        if self.is_special(id) {
            return Err(PanelError::Validation(
                "top-level collection folders can't be deleted".into(),
            ));
        }
        let is_folder = self.index.get(id).is_some_and(|node| node.is_folder);
        if self.state.selected.as_deref() == Some(id) {
            self.state.selected = None;
        }
        if is_folder {
            self.store.remove_tree(id).await?;
        } else {
            self.store.remove(id).await?;
        }
        self.reload().await
    }

    /// Swap the node one slot up among its siblings; a boundary is a no-op.
    pub async fn move_up(&mut self, id: &str) -> PanelResult<()> {
        self.require_known(id)?;
        let Some((parent_id, position)) = self.sibling_slot(id) else {
            return Ok(());
        };
        if position == 0 {
            return Ok(());
        }
        self.store
            .move_node(
                id,
                Destination {
                    parent_id,
                    index: position - 1,
                },
            )
            .await?;
        self.reload().await
    }

    /// Swap the node one slot down among its siblings; a boundary is a
    /// no-op. With remove-then-insert move semantics, inserting at
    /// `position + 1` after the removal lands exactly one slot later.
    pub async fn move_down(&mut self, id: &str) -> PanelResult<()> {
        self.require_known(id)?;
        let Some((parent_id, position)) = self.sibling_slot(id) else {
            return Ok(());
        };
        if position + 1 >= self.index.children_len(&parent_id) {
            return Ok(());
        }
        self.store
            .move_node(
                id,
                Destination {
                    parent_id,
                    index: position + 1,
                },
            )
            .await?;
        self.reload().await
    }

    fn sibling_slot(&self, id: &str) -> Option<(NodeId, usize)> {
        let node = self.index.get(id)?;
        Some((node.parent_id.clone()?, node.index))
    }

    fn require_known(&mut self, id: &str) -> PanelResult<()> {
        if self.index.contains(id) {
            return Ok(());
        }
        if self.state.selected.as_deref() == Some(id) {
            self.state.selected = None;
        }
        Err(PanelError::NotFound(id.to_string()))
    }

    fn require_folder(&mut self, id: &str) -> PanelResult<()> {
        self.require_known(id)?;
        if self.index.get(id).is_some_and(|node| node.is_folder) {
            Ok(())
        } else {
            Err(PanelError::Validation(format!("not a folder: {id}")))
        }
    }
}

/// Accept a url as typed, retrying with an `https://` prefix for bare
/// host-and-path input before rejecting.
fn normalize_url(raw: &str) -> PanelResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PanelError::Validation("url is empty".into()));
    }
    if let Ok(parsed) = Url::parse(trimmed) {
        return Ok(parsed.to_string());
    }
    Url::parse(&format!("https://{trimmed}"))
        .map(|parsed| parsed.to_string())
        .map_err(|_| PanelError::Validation(format!("invalid url: {trimmed}")))
}
