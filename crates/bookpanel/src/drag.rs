use crate::error::{PanelError, PanelResult};
use crate::index::TreeIndex;
use crate::node::{Destination, NodeId};

/// Where a drop lands relative to the target row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropBand {
    Before,
    After,
    Inside,
}

/// Drag gesture state machine. `Hovering` carries the band shown as the
/// presentation drop hint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        source: NodeId,
    },
    Hovering {
        source: NodeId,
        target: NodeId,
        band: DropBand,
    },
}

impl DragState {
    pub fn source(&self) -> Option<&NodeId> {
        match self {
            DragState::Idle => None,
            DragState::Dragging { source } => Some(source),
            DragState::Hovering { source, .. } => Some(source),
        }
    }
}

/// Per-row decoration hint while a drag hovers over a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropHint {
    pub target_id: NodeId,
    pub band: DropBand,
}

/// Quantize the pointer's vertical offset within the target row into a band:
/// top quartile before, bottom quartile after, middle half inside. Only
/// folders accept `Inside`; the middle of a leaf row falls back to `After`.
pub fn band_for_pointer(pointer_y: f64, row_height: f64, target_is_folder: bool) -> DropBand {
    let height = if row_height.is_finite() {
        row_height.max(1.0)
    } else {
        1.0
    };
    if pointer_y < height * 0.25 {
        DropBand::Before
    } else if pointer_y > height * 0.75 {
        DropBand::After
    } else if target_is_folder {
        DropBand::Inside
    } else {
        DropBand::After
    }
}

/// Translate a drop gesture into a single move request.
///
/// Returns `Ok(None)` for silent no-ops (dropping onto itself, or a
/// destination equal to the source's current slot). Rejects with
/// [`PanelError::Cycle`] before any store traffic when an `Inside` drop
/// would move a folder into its own subtree.
pub fn plan_drop(
    index: &TreeIndex,
    source_id: &str,
    target_id: &str,
    band: DropBand,
) -> PanelResult<Option<Destination>> {
    if source_id == target_id {
        return Ok(None);
    }
    let source = index
        .get(source_id)
        .ok_or_else(|| PanelError::NotFound(source_id.to_string()))?;
    let target = index
        .get(target_id)
        .ok_or_else(|| PanelError::NotFound(target_id.to_string()))?;

    let mut destination = match band {
        DropBand::Inside if target.is_folder => {
            if source.is_folder && index.is_descendant(source_id, target_id) {
                return Err(PanelError::Cycle);
            }
            Destination {
                parent_id: target_id.to_string(),
                index: 0,
            }
        }
        _ => {
            // The synthetic root is never emitted as a row, so a target
            // without a parent cannot come from a real gesture.
            let Some(parent_id) = target.parent_id.clone() else {
                return Ok(None);
            };
            let index_in_parent = match band {
                DropBand::Before => target.index,
                _ => target.index + 1,
            };
            Destination {
                parent_id,
                index: index_in_parent,
            }
        }
    };

    // The store implements a move as remove-then-insert. Removing the source
    // shifts later siblings down one, so a forward move within the same
    // parent must pre-correct its index to land in the intended slot.
    let same_parent = source.parent_id.as_deref() == Some(destination.parent_id.as_str());
    if same_parent && source.index < destination.index {
        destination.index -= 1;
    }

    if same_parent && destination.index == source.index {
        return Ok(None);
    }
    Ok(Some(destination))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

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

    fn bookmark(id: &str, title: &str) -> Node {
        Node {
            id: id.into(),
            title: title.into(),
            url: Some(format!("https://{id}.example/")),
            parent_id: None,
            index: 0,
            date_added: None,
            children: None,
        }
    }

    fn sample_index() -> TreeIndex {
        TreeIndex::build(&folder(
            "0",
            "",
            vec![
                folder(
                    "p",
                    "P",
                    vec![bookmark("a", "A"), bookmark("b", "B"), bookmark("c", "C")],
                ),
                folder("q", "Q", vec![bookmark("qa", "QA")]),
                folder("deep", "Deep", vec![folder("inner", "Inner", vec![])]),
            ],
        ))
    }

    #[test]
    fn band_quartiles() {
        assert_eq!(band_for_pointer(0.0, 34.0, false), DropBand::Before);
        assert_eq!(band_for_pointer(8.0, 34.0, false), DropBand::Before);
        assert_eq!(band_for_pointer(17.0, 34.0, true), DropBand::Inside);
        assert_eq!(band_for_pointer(17.0, 34.0, false), DropBand::After);
        assert_eq!(band_for_pointer(30.0, 34.0, true), DropBand::After);
    }

    #[test]
    fn inside_drop_targets_first_child_slot() {
        let index = sample_index();
        let dest = plan_drop(&index, "a", "q", DropBand::Inside)
            .unwrap()
            .unwrap();
        assert_eq!(dest, Destination { parent_id: "q".into(), index: 0 });
    }

    #[test]
    fn before_and_after_use_target_slot() {
        let index = sample_index();
        let before = plan_drop(&index, "qa", "b", DropBand::Before)
            .unwrap()
            .unwrap();
        assert_eq!(before, Destination { parent_id: "p".into(), index: 1 });

        let after = plan_drop(&index, "qa", "b", DropBand::After)
            .unwrap()
            .unwrap();
        assert_eq!(after, Destination { parent_id: "p".into(), index: 2 });
    }

    #[test]
    fn cycle_guard_rejects_descendant_target() {
        let index = sample_index();
        let err = plan_drop(&index, "deep", "inner", DropBand::Inside).unwrap_err();
        assert_eq!(err, PanelError::Cycle);
    }

    #[test]
    fn inside_self_is_a_noop_not_a_cycle() {
        let index = sample_index();
        assert_eq!(plan_drop(&index, "deep", "deep", DropBand::Inside).unwrap(), None);
    }

    #[test]
    fn same_parent_forward_move_corrects_index() {
        // Siblings [a=0, b=1, c=2]; moving a after c (raw index 3) must
        // issue index 2.
        let index = sample_index();
        let dest = plan_drop(&index, "a", "c", DropBand::After)
            .unwrap()
            .unwrap();
        assert_eq!(dest, Destination { parent_id: "p".into(), index: 2 });
    }

    #[test]
    fn same_parent_backward_move_is_uncorrected() {
        let index = sample_index();
        let dest = plan_drop(&index, "c", "a", DropBand::Before)
            .unwrap()
            .unwrap();
        assert_eq!(dest, Destination { parent_id: "p".into(), index: 0 });
    }

    #[test]
    fn cross_parent_move_is_uncorrected() {
        // b sits at index 1 under p; dropping before qa (index 0 under q)
        // must issue {q, 0} untouched.
        let index = sample_index();
        let dest = plan_drop(&index, "b", "qa", DropBand::Before)
            .unwrap()
            .unwrap();
        assert_eq!(dest, Destination { parent_id: "q".into(), index: 0 });
    }

    #[test]
    fn destination_equal_to_current_slot_is_a_noop() {
        let index = sample_index();
        // After-a resolves to b's own slot once corrected.
        assert_eq!(plan_drop(&index, "b", "a", DropBand::After).unwrap(), None);
        // Before-b is a's own slot.
        assert_eq!(plan_drop(&index, "a", "b", DropBand::Before).unwrap(), None);
    }

    #[test]
    fn unknown_ids_are_reported() {
        let index = sample_index();
        assert!(matches!(
            plan_drop(&index, "ghost", "a", DropBand::Before),
            Err(PanelError::NotFound(id)) if id == "ghost"
        ));
        assert!(matches!(
            plan_drop(&index, "a", "ghost", DropBand::Before),
            Err(PanelError::NotFound(id)) if id == "ghost"
        ));
    }

    #[test]
    fn middle_band_on_leaf_falls_back_to_after_plan() {
        let index = sample_index();
        let band = band_for_pointer(17.0, 34.0, false);
        let dest = plan_drop(&index, "qa", "a", band).unwrap().unwrap();
        assert_eq!(dest, Destination { parent_id: "p".into(), index: 1 });
    }
}
