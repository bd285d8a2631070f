//! Projection and mutation-planning engine for an externally-owned
//! bookmark tree.
//!
//! The store owns node identity, order and content. This crate derives
//! everything a side-panel view needs from tree snapshots:
//! - Flat id-keyed index with explicit-stack traversals
//! - Visibility projection over expansion and search state
//! - Virtual-scroll windowing with overscan
//! - Drag-and-drop planning with cycle and slot-correction rules
//! - A mutation gateway that validates, submits one store call and
//!   resynchronizes from authoritative state

pub mod config;
pub mod core;
pub mod drag;
pub mod error;
pub mod index;
pub mod node;
pub mod state;
pub mod store;
pub mod timer;
pub mod view;

pub use crate::config::PanelConfig;
pub use crate::core::{ContextMenuRequest, Panel};
pub use crate::drag::{band_for_pointer, plan_drop, DragState, DropBand, DropHint};
pub use crate::error::{PanelError, PanelResult};
pub use crate::index::{IndexedNode, TreeIndex};
pub use crate::node::{Destination, Node, NodeChanges, NodeId};
pub use crate::state::ViewState;
pub use crate::store::{memory::MemoryStore, BookmarkStore, SharedStore, StoreChange};
pub use crate::timer::DelaySlot;
pub use crate::view::{project, visible_range, Row};
