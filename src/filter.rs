//! Search and discipline filtering over navigation nodes.

use std::collections::BTreeSet;

use crate::constants::FILTER_PAGE_SIZE;
use crate::explorer::display_order;
use crate::model::{NavigationNode, NavigationTree};

/// Search term, discipline filter and result paging.
#[derive(Debug, Clone)]
pub struct DrawingFilter {
    search_term: String,
    discipline: Option<String>,
    visible_count: usize,
}

impl Default for DrawingFilter {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            discipline: None,
            visible_count: FILTER_PAGE_SIZE,
        }
    }
}

impl DrawingFilter {
    /// Create an empty filter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current search term.
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Current discipline filter.
    pub fn discipline(&self) -> Option<&str> {
        self.discipline.as_deref()
    }

    /// Set the search term. Resets paging.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.visible_count = FILTER_PAGE_SIZE;
    }

    /// Set or clear the discipline filter. Resets paging.
    pub fn set_discipline(&mut self, discipline: Option<String>) {
        self.discipline = discipline;
        self.visible_count = FILTER_PAGE_SIZE;
    }

    /// Show another page of results.
    pub fn show_more(&mut self) {
        self.visible_count += FILTER_PAGE_SIZE;
    }

    /// Whether any criterion is active.
    pub fn is_active(&self) -> bool {
        !self.search_term.is_empty() || self.discipline.is_some()
    }

    /// Whether a node passes the search term and discipline filter.
    pub fn matches(&self, node: &NavigationNode) -> bool {
        let node_discipline = node.discipline();

        let mut matches = true;
        if !self.search_term.is_empty() {
            let term = self.search_term.to_lowercase();
            matches = node.name.to_lowercase().contains(&term)
                || node_discipline.is_some_and(|d| d.to_lowercase().contains(&term))
                || node.path.join(" ").to_lowercase().contains(&term);
        }
        if let Some(filter) = &self.discipline {
            matches = matches && node_discipline == Some(filter.as_str());
        }
        matches && !node.name.is_empty()
    }

    /// All matching nodes sorted by kind, then name.
    pub fn results<'a>(&self, tree: &'a NavigationTree) -> Vec<&'a NavigationNode> {
        let mut results: Vec<&NavigationNode> = tree.iter().filter(|n| self.matches(n)).collect();
        results.sort_by(|a, b| display_order(a, b));
        results
    }

    /// The current page of results.
    pub fn visible_results<'a>(&self, tree: &'a NavigationTree) -> Vec<&'a NavigationNode> {
        let mut results = self.results(tree);
        results.truncate(self.visible_count);
        results
    }

    /// Whether more results exist beyond the current page.
    pub fn has_more(&self, tree: &NavigationTree) -> bool {
        self.results(tree).len() > self.visible_count
    }

    /// Result count shown next to the search box.
    ///
    /// Without any criterion this is the total node count.
    pub fn result_count(&self, tree: &NavigationTree) -> usize {
        if self.is_active() {
            tree.iter().filter(|n| self.matches(n)).count()
        } else {
            tree.len()
        }
    }
}

/// Unique discipline names in the tree, sorted.
pub fn disciplines(tree: &NavigationTree) -> Vec<String> {
    tree.iter()
        .filter_map(|n| match n.kind() {
            crate::model::NodeKind::Discipline => n.discipline().map(str::to_string),
            _ => None,
        })
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeKind;
    use crate::parse::parse_metadata_json;

    fn tree() -> NavigationTree {
        let mut drawings = String::from(
            r#""00": {"id": "00", "name": "Site", "image": "s.png", "parent": null,
                "disciplines": {"Arch": {"revisions": [{"version": "REV1", "image": "a.png"}]},
                                "Fire": {}}}"#,
        );
        for i in 1..=12 {
            drawings.push_str(&format!(
                r#","{i:02}": {{"id": "{i:02}", "name": "Floor {i:02}", "image": "f.png", "parent": "00"}}"#
            ));
        }
        parse_metadata_json(&format!(r#"{{"drawings": {{{drawings}}}}}"#))
            .unwrap()
            .tree
    }

    #[test]
    fn test_no_criteria_counts_everything() {
        let tree = tree();
        let filter = DrawingFilter::new();
        assert_eq!(filter.result_count(&tree), tree.len());
    }

    #[test]
    fn test_search_is_case_insensitive_and_checks_path() {
        let tree = tree();
        let mut filter = DrawingFilter::new();
        filter.set_search_term("SITE");
        // Every node's path starts with "Site".
        assert_eq!(filter.result_count(&tree), tree.len());

        filter.set_search_term("floor 03");
        let results = filter.results(&tree);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "drawing:03");
    }

    #[test]
    fn test_discipline_filter_excludes_drawings() {
        let tree = tree();
        let mut filter = DrawingFilter::new();
        filter.set_discipline(Some("Arch".to_string()));
        let results = filter.results(&tree);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].kind(), NodeKind::Discipline);
        assert_eq!(results[1].kind(), NodeKind::Revision);
    }

    #[test]
    fn test_paging() {
        let tree = tree();
        let mut filter = DrawingFilter::new();
        filter.set_search_term("floor");
        assert_eq!(filter.visible_results(&tree).len(), 10);
        assert!(filter.has_more(&tree));
        filter.show_more();
        assert_eq!(filter.visible_results(&tree).len(), 12);
        assert!(!filter.has_more(&tree));

        filter.set_search_term("floor 1");
        assert_eq!(filter.visible_results(&tree).len(), 3);
    }

    #[test]
    fn test_disciplines_are_unique_and_sorted() {
        let tree = tree();
        assert_eq!(disciplines(&tree), vec!["Arch".to_string(), "Fire".to_string()]);
    }
}
