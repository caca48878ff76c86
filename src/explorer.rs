//! Expansion state of the navigation tree panel.

use std::cmp::Ordering;
use std::collections::HashSet;

use crate::model::{NavigationNode, NavigationTree, NodeId};

/// Compare nodes for display: by kind, then by name.
pub fn display_order(a: &NavigationNode, b: &NavigationNode) -> Ordering {
    a.kind()
        .order()
        .cmp(&b.kind().order())
        .then_with(|| a.name.cmp(&b.name))
}

/// Children of a node sorted for display.
pub fn sorted_children<'a>(tree: &'a NavigationTree, id: &str) -> Vec<&'a NavigationNode> {
    let mut children: Vec<&NavigationNode> = tree.children(id).collect();
    children.sort_by(|a, b| display_order(a, b));
    children
}

/// A row of the flattened tree view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeRow {
    /// Node id
    pub id: NodeId,
    /// Nesting depth, 0 for the root
    pub depth: usize,
    /// Whether the node has children
    pub has_children: bool,
    /// Whether the node is expanded
    pub expanded: bool,
}

/// Which tree nodes are expanded.
#[derive(Debug, Clone, Default)]
pub struct ExplorerState {
    expanded: HashSet<NodeId>,
}

impl ExplorerState {
    /// Create with the root expanded.
    pub fn new(tree: &NavigationTree) -> Self {
        let mut expanded = HashSet::new();
        if !tree.root_id().is_empty() {
            expanded.insert(tree.root_id().to_string());
        }
        Self { expanded }
    }

    /// Whether a node is expanded.
    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Expand or collapse a node.
    pub fn set_expanded(&mut self, id: &str, expanded: bool) {
        if expanded {
            self.expanded.insert(id.to_string());
        } else {
            self.expanded.remove(id);
        }
    }

    /// Expand every ancestor of a node, and the node itself when it has children.
    pub fn reveal(&mut self, tree: &NavigationTree, id: &str) {
        for ancestor in tree.ancestors(id) {
            self.expanded.insert(ancestor.id.clone());
        }
        if tree.get(id).is_some_and(|n| !n.children.is_empty()) {
            self.expanded.insert(id.to_string());
        }
    }

    /// Handle a click on a node row: nodes with children toggle their expansion.
    pub fn click(&mut self, tree: &NavigationTree, id: &str) {
        if tree.get(id).is_some_and(|n| !n.children.is_empty()) {
            let expanded = self.is_expanded(id);
            self.set_expanded(id, !expanded);
        }
    }

    /// Flatten the tree into display rows, descending only into expanded nodes.
    ///
    /// Drawings that are not reachable from the root (dangling parents) are
    /// listed as additional top-level rows.
    pub fn visible_rows(&self, tree: &NavigationTree) -> Vec<TreeRow> {
        let mut rows = Vec::new();
        let mut seen = HashSet::new();
        let mut tops: Vec<&NavigationNode> = Vec::new();
        if let Some(root) = tree.root() {
            tops.push(root);
        }
        let mut orphans: Vec<&NavigationNode> = tree
            .iter()
            .filter(|n| n.parent_id.is_none() && n.id != tree.root_id())
            .collect();
        orphans.sort_by(|a, b| display_order(a, b));
        tops.extend(orphans);

        for top in tops {
            self.push_rows(tree, top, 0, &mut rows, &mut seen);
        }
        rows
    }

    fn push_rows<'a>(
        &self,
        tree: &'a NavigationTree,
        node: &'a NavigationNode,
        depth: usize,
        rows: &mut Vec<TreeRow>,
        seen: &mut HashSet<&'a str>,
    ) {
        if !seen.insert(node.id.as_str()) {
            return;
        }
        let expanded = self.is_expanded(&node.id);
        rows.push(TreeRow {
            id: node.id.clone(),
            depth,
            has_children: !node.children.is_empty(),
            expanded,
        });
        if expanded {
            for child in sorted_children(tree, &node.id) {
                self.push_rows(tree, child, depth + 1, rows, seen);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_metadata_json;

    const DOC: &str = r#"{"drawings": {
        "00": {"id": "00", "name": "Site", "image": "s.png", "parent": null},
        "02": {"id": "02", "name": "Zeta", "image": "z.png", "parent": "00",
            "disciplines": {"Struct": {"revisions": [{"version": "REV1", "image": "r.png"}]}}},
        "01": {"id": "01", "name": "Alpha", "image": "a.png", "parent": "00"}
    }}"#;

    fn tree() -> NavigationTree {
        parse_metadata_json(DOC).unwrap().tree
    }

    #[test]
    fn test_root_expanded_initially() {
        let tree = tree();
        let state = ExplorerState::new(&tree);
        let rows = state.visible_rows(&tree);
        let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["drawing:00", "drawing:01", "drawing:02"]);
        assert_eq!(rows[1].depth, 1);
    }

    #[test]
    fn test_reveal_expands_ancestors() {
        let tree = tree();
        let mut state = ExplorerState::new(&tree);
        state.reveal(&tree, "revision:02:Struct:REV1");
        assert!(state.is_expanded("drawing:02"));
        assert!(state.is_expanded("discipline:02:Struct"));
        let rows = state.visible_rows(&tree);
        assert_eq!(rows.last().unwrap().id, "revision:02:Struct:REV1");
        assert_eq!(rows.last().unwrap().depth, 3);
    }

    #[test]
    fn test_click_toggles_only_parents() {
        let tree = tree();
        let mut state = ExplorerState::new(&tree);
        state.click(&tree, "drawing:00");
        assert!(!state.is_expanded("drawing:00"));
        state.click(&tree, "drawing:01");
        assert!(!state.is_expanded("drawing:01"));
        assert_eq!(state.visible_rows(&tree).len(), 1);
    }
}
