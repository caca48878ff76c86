//! Derived view of the current selection for the context panel.

use crate::model::{NavigationNode, NodeKind, ParsedDrawingData, RevisionEntry, related_revisions};
use crate::selection::SelectionState;

/// One selected node as shown in the context panel.
#[derive(Debug, Clone)]
pub struct SelectedItem<'a> {
    /// The selected node
    pub node: &'a NavigationNode,
    /// Whether its overlay is visible
    pub visible: bool,
}

/// Summary of the primary selection.
#[derive(Debug, Clone)]
pub struct CurrentContext<'a> {
    /// The primary node
    pub node: &'a NavigationNode,
    /// Breadcrumb path
    pub path: &'a [String],
    /// Node kind
    pub kind: NodeKind,
    /// Revisions related to the primary node
    pub related_revisions: Vec<&'a RevisionEntry>,
    /// All selected nodes with their visibility
    pub selected: Vec<SelectedItem<'a>>,
}

impl CurrentContext<'_> {
    /// Number of related revisions.
    pub fn revision_count(&self) -> usize {
        self.related_revisions.len()
    }
}

/// Build the context summary. `None` when the primary id is missing or unknown.
pub fn current_context<'a>(
    data: &'a ParsedDrawingData,
    selection: &SelectionState,
) -> Option<CurrentContext<'a>> {
    let node = data.tree.get(selection.primary()?)?;
    let selected = selection
        .selected()
        .iter()
        .filter_map(|id| data.tree.get(id))
        .map(|node| SelectedItem {
            node,
            visible: selection.is_visible(&node.id),
        })
        .collect();

    Some(CurrentContext {
        node,
        path: &node.path,
        kind: node.kind(),
        related_revisions: related_revisions(node, &data.revisions),
        selected,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_metadata_json;

    const DOC: &str = r#"{"drawings": {"00": {"id": "00", "name": "Site", "image": "s.png",
        "parent": null, "disciplines": {"Arch": {"revisions": [
            {"version": "REV1", "image": "a1.png"}, {"version": "REV2", "image": "a2.png"}]}}}}}"#;

    #[test]
    fn test_context_for_primary() {
        let data = parse_metadata_json(DOC).unwrap();
        let mut selection = SelectionState::with_initial("discipline:00:Arch");
        selection.select("revision:00:Arch:REV1", true);
        selection.toggle_visibility("revision:00:Arch:REV1");

        let ctx = current_context(&data, &selection).unwrap();
        assert_eq!(ctx.kind, NodeKind::Discipline);
        assert_eq!(ctx.path, ["Site".to_string(), "Arch".to_string()]);
        assert_eq!(ctx.revision_count(), 2);
        assert_eq!(ctx.selected.len(), 2);
        assert!(ctx.selected[0].visible);
        assert!(!ctx.selected[1].visible);
    }

    #[test]
    fn test_no_context_without_selection() {
        let data = parse_metadata_json(DOC).unwrap();
        assert!(current_context(&data, &SelectionState::new()).is_none());
        let unknown = SelectionState::with_initial("drawing:zz");
        assert!(current_context(&data, &unknown).is_none());
    }
}
