use crate::node::NodeId;

/// Unified error type for the bookpanel crate.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PanelError {
    /// The external store rejected a call. The operation is aborted and no
    /// local state was mutated.
    #[error("store error: {0}")]
    Store(String),

    /// Invalid input rejected before any store call was issued.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The drop target is a descendant of the dragged folder.
    #[error("cannot move a folder into its own subtree")]
    Cycle,

    /// An operation referenced an id that is no longer in the index.
    #[error("unknown node: {0}")]
    NotFound(NodeId),
}

/// Result type alias using [`PanelError`].
pub type PanelResult<T> = Result<T, PanelError>;
