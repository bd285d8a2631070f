use std::collections::HashSet;

use crate::drag::{DragState, DropHint};
use crate::index::TreeIndex;
use crate::node::NodeId;

/// All derived, controller-local view state, passed explicitly instead of
/// living in ambient globals. The store owns node identity, order and
/// content; this struct owns only projection context.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    /// Folder ids the user has opened. Survives resynchronization by id.
    pub expanded: HashSet<NodeId>,
    pub selected: Option<NodeId>,
    /// Active search query; empty means no filtering.
    pub query: String,
    /// Ids matching the active query; ephemeral, discarded when it clears.
    pub matches: HashSet<NodeId>,
    pub drag: DragState,
    pub drop_hint: Option<DropHint>,
}

impl ViewState {
    pub fn search_active(&self) -> bool {
        !self.query.is_empty()
    }

    /// Drop state that references ids no longer present after a reload.
    pub fn retain_known(&mut self, index: &TreeIndex) {
        self.expanded.retain(|id| index.contains(id));
        self.matches.retain(|id| index.contains(id));
        if self
            .selected
            .as_deref()
            .is_some_and(|id| !index.contains(id))
        {
            self.selected = None;
        }
    }

    pub fn clear_search(&mut self) {
        self.query.clear();
        self.matches.clear();
    }

    pub fn reset_drag(&mut self) {
        self.drag = DragState::Idle;
        self.drop_hint = None;
    }
}
