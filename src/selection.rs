//! Multi-select and visibility state over navigation node ids.
//!
//! Selection order matters: the first selected node is the *primary* node
//! that drives the base image and the context panel. Both sets are kept as
//! insertion-ordered lists so that rule never depends on hash ordering.

use crate::model::NodeId;

/// Selected and visible node ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected: Vec<NodeId>,
    visible: Vec<NodeId>,
}

impl SelectionState {
    /// Create an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a selection holding a single visible node.
    pub fn with_initial(id: impl Into<NodeId>) -> Self {
        let mut state = Self::new();
        state.select(id, false);
        state
    }

    /// Select a node.
    ///
    /// A non-additive select replaces both sets with `{id}`. An additive
    /// select toggles `id`: it is removed from both sets when already
    /// selected, otherwise appended to both.
    pub fn select(&mut self, id: impl Into<NodeId>, additive: bool) {
        let id = id.into();
        if !additive {
            log::debug!("Select '{}'", id);
            self.selected = vec![id.clone()];
            self.visible = vec![id];
            return;
        }

        if self.is_selected(&id) {
            log::debug!("Deselect '{}'", id);
            self.selected.retain(|s| *s != id);
            self.visible.retain(|v| *v != id);
        } else {
            log::debug!("Add '{}' to selection", id);
            self.selected.push(id.clone());
            if !self.is_visible(&id) {
                self.visible.push(id);
            }
        }
    }

    /// Flip visibility of a node without changing the selection.
    pub fn toggle_visibility(&mut self, id: &str) {
        if self.is_visible(id) {
            self.visible.retain(|v| v != id);
        } else {
            self.visible.push(id.to_string());
        }
        log::trace!("Visibility of '{}' is now {}", id, self.is_visible(id));
    }

    /// The first selected node.
    pub fn primary(&self) -> Option<&str> {
        self.selected.first().map(String::as_str)
    }

    /// Selected ids in selection order.
    pub fn selected(&self) -> &[NodeId] {
        &self.selected
    }

    /// Visible ids in the order they became visible.
    pub fn visible(&self) -> &[NodeId] {
        &self.visible
    }

    /// Whether a node is selected.
    pub fn is_selected(&self, id: &str) -> bool {
        self.selected.iter().any(|s| s == id)
    }

    /// Whether a node is visible.
    pub fn is_visible(&self, id: &str) -> bool {
        self.visible.iter().any(|v| v == id)
    }

    /// Number of selected nodes.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Clear both sets.
    pub fn clear(&mut self) {
        self.selected.clear();
        self.visible.clear();
    }
}
