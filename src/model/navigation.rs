//! Navigation tree derived from a metadata document.

use std::collections::HashMap;

use super::metadata::{Polygon, Revision};
use super::transform::ImageTransform;

/// Identifier of a navigation node (`drawing:01`, `region:01:Arch:A`, ...).
pub type NodeId = String;

/// Kind of navigation node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeKind {
    /// A drawing (building, floor, site)
    Drawing,
    /// A discipline within a drawing
    Discipline,
    /// A region within a discipline
    Region,
    /// A revision of a discipline or region
    Revision,
}

impl NodeKind {
    /// Sort rank used by the explorer and search results.
    pub fn order(&self) -> u8 {
        match self {
            NodeKind::Drawing => 0,
            NodeKind::Discipline => 1,
            NodeKind::Region => 2,
            NodeKind::Revision => 3,
        }
    }

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Drawing => "Drawing",
            NodeKind::Discipline => "Discipline",
            NodeKind::Region => "Region",
            NodeKind::Revision => "Revision",
        }
    }
}

/// Kind-specific payload of a node.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeData {
    /// Drawing node
    Drawing {
        /// Drawing id
        drawing_id: String,
        /// Drawing image
        image: String,
    },
    /// Discipline node
    Discipline {
        /// Owning drawing id
        drawing_id: String,
        /// Discipline name
        discipline: String,
        /// Alignment of the discipline image
        image_transform: Option<ImageTransform>,
        /// Discipline image, if any
        image: Option<String>,
        /// Discipline outline
        polygon: Option<Polygon>,
    },
    /// Region node
    Region {
        /// Owning drawing id
        drawing_id: String,
        /// Discipline name
        discipline: String,
        /// Region id
        region_id: String,
        /// Region outline
        polygon: Option<Polygon>,
    },
    /// Revision node
    Revision {
        /// Owning drawing id
        drawing_id: String,
        /// Discipline name
        discipline: String,
        /// Region id when the revision belongs to a region
        region_id: Option<String>,
        /// Version label
        version: String,
        /// Full revision record
        revision: Revision,
        /// Revision image
        image: String,
        /// Alignment of the revision image
        image_transform: Option<ImageTransform>,
        /// Revision outline
        polygon: Option<Polygon>,
    },
}

/// A node of the navigation tree.
#[derive(Debug, Clone, PartialEq)]
pub struct NavigationNode {
    /// Node id
    pub id: NodeId,
    /// Display name
    pub name: String,
    /// Parent node id, `None` for top-level drawings
    pub parent_id: Option<NodeId>,
    /// Child node ids in document order
    pub children: Vec<NodeId>,
    /// Display path from the root drawing down to this node
    pub path: Vec<String>,
    /// Kind-specific payload
    pub data: NodeData,
}

impl NavigationNode {
    /// Kind of this node.
    pub fn kind(&self) -> NodeKind {
        match self.data {
            NodeData::Drawing { .. } => NodeKind::Drawing,
            NodeData::Discipline { .. } => NodeKind::Discipline,
            NodeData::Region { .. } => NodeKind::Region,
            NodeData::Revision { .. } => NodeKind::Revision,
        }
    }

    /// Drawing id this node belongs to.
    pub fn drawing_id(&self) -> &str {
        match &self.data {
            NodeData::Drawing { drawing_id, .. }
            | NodeData::Discipline { drawing_id, .. }
            | NodeData::Region { drawing_id, .. }
            | NodeData::Revision { drawing_id, .. } => drawing_id,
        }
    }

    /// Discipline name, `None` for drawing nodes.
    pub fn discipline(&self) -> Option<&str> {
        match &self.data {
            NodeData::Drawing { .. } => None,
            NodeData::Discipline { discipline, .. }
            | NodeData::Region { discipline, .. }
            | NodeData::Revision { discipline, .. } => Some(discipline),
        }
    }

    /// Region id for region nodes and region revisions.
    pub fn region_id(&self) -> Option<&str> {
        match &self.data {
            NodeData::Region { region_id, .. } => Some(region_id),
            NodeData::Revision { region_id, .. } => region_id.as_deref(),
            _ => None,
        }
    }

    /// Outline polygon attached to this node.
    pub fn polygon(&self) -> Option<&Polygon> {
        match &self.data {
            NodeData::Drawing { .. } => None,
            NodeData::Discipline { polygon, .. }
            | NodeData::Region { polygon, .. }
            | NodeData::Revision { polygon, .. } => polygon.as_ref(),
        }
    }

    /// The node's own image, if it has one.
    pub fn image(&self) -> Option<&str> {
        match &self.data {
            NodeData::Drawing { image, .. } | NodeData::Revision { image, .. } => Some(image),
            NodeData::Discipline { image, .. } => image.as_deref(),
            NodeData::Region { .. } => None,
        }
    }
}

/// Build a drawing node id.
pub fn drawing_node_id(drawing_id: &str) -> NodeId {
    format!("drawing:{drawing_id}")
}

/// Build a discipline node id.
pub fn discipline_node_id(drawing_id: &str, discipline: &str) -> NodeId {
    format!("discipline:{drawing_id}:{discipline}")
}

/// Build a region node id.
pub fn region_node_id(drawing_id: &str, discipline: &str, region_id: &str) -> NodeId {
    format!("region:{drawing_id}:{discipline}:{region_id}")
}

/// Build a revision node id.
pub fn revision_node_id(
    drawing_id: &str,
    discipline: &str,
    region_id: Option<&str>,
    version: &str,
) -> NodeId {
    match region_id {
        Some(region) => format!("revision:{drawing_id}:{discipline}:{region}:{version}"),
        None => format!("revision:{drawing_id}:{discipline}:{version}"),
    }
}

/// Immutable navigation tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NavigationTree {
    root_id: NodeId,
    nodes: HashMap<NodeId, NavigationNode>,
    order: Vec<NodeId>,
}

impl NavigationTree {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Insert a node and link it under its parent when the parent exists.
    ///
    /// Ids are unique; a second node with an existing id is dropped.
    pub(crate) fn insert(&mut self, node: NavigationNode) {
        if self.nodes.contains_key(&node.id) {
            log::warn!("Duplicate navigation node '{}' ignored", node.id);
            return;
        }
        if let Some(parent_id) = &node.parent_id {
            if let Some(parent) = self.nodes.get_mut(parent_id) {
                parent.children.push(node.id.clone());
            }
        }
        self.order.push(node.id.clone());
        self.nodes.insert(node.id.clone(), node);
    }

    pub(crate) fn set_root(&mut self, root_id: NodeId) {
        self.root_id = root_id;
    }

    /// Link an already inserted node under an already inserted parent.
    pub(crate) fn attach(&mut self, parent_id: &str, child_id: &str) -> bool {
        if !self.nodes.contains_key(parent_id) || parent_id == child_id {
            return false;
        }
        let Some(child) = self.nodes.get_mut(child_id) else {
            return false;
        };
        child.parent_id = Some(parent_id.to_string());
        if let Some(parent) = self.nodes.get_mut(parent_id) {
            parent.children.push(child_id.to_string());
        }
        true
    }

    /// Id of the root node. Empty when the document has no drawings.
    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    /// The root node.
    pub fn root(&self) -> Option<&NavigationNode> {
        self.nodes.get(&self.root_id)
    }

    /// Look up a node.
    pub fn get(&self, id: &str) -> Option<&NavigationNode> {
        self.nodes.get(id)
    }

    /// Whether a node exists.
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate nodes in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &NavigationNode> {
        self.order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Children of a node, in document order.
    pub fn children(&self, id: &str) -> impl Iterator<Item = &NavigationNode> {
        self.nodes
            .get(id)
            .into_iter()
            .flat_map(|n| n.children.iter())
            .filter_map(|c| self.nodes.get(c))
    }

    /// Parent of a node.
    pub fn parent(&self, id: &str) -> Option<&NavigationNode> {
        let parent_id = self.nodes.get(id)?.parent_id.as_ref()?;
        self.nodes.get(parent_id)
    }

    /// Ancestors of a node, nearest first. Stops at a missing parent or a cycle.
    pub fn ancestors(&self, id: &str) -> Vec<&NavigationNode> {
        let mut out: Vec<&NavigationNode> = Vec::new();
        let mut current = self.parent(id);
        while let Some(node) = current {
            if node.id == id || out.iter().any(|n| n.id == node.id) {
                break;
            }
            out.push(node);
            current = self.parent(&node.id);
        }
        out
    }

    /// The drawing node that owns a node (itself for drawing nodes).
    pub fn drawing_node_for(&self, id: &str) -> Option<&NavigationNode> {
        let node = self.nodes.get(id)?;
        match node.kind() {
            NodeKind::Drawing => Some(node),
            _ => self.nodes.get(&drawing_node_id(node.drawing_id())),
        }
    }

    /// Check parent/child links in both directions.
    ///
    /// Returns a description of every violation; an empty list means the tree
    /// is consistent.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        for node in self.iter() {
            if let Some(parent_id) = &node.parent_id {
                match self.nodes.get(parent_id) {
                    Some(parent) if !parent.children.contains(&node.id) => problems.push(format!(
                        "{} is not listed as a child of {}",
                        node.id, parent_id
                    )),
                    Some(_) => {}
                    None => problems.push(format!("{} has missing parent {}", node.id, parent_id)),
                }
            }
            for child_id in &node.children {
                match self.nodes.get(child_id) {
                    Some(child) if child.parent_id.as_deref() != Some(node.id.as_str()) => problems
                        .push(format!("{} lists {} which has another parent", node.id, child_id)),
                    Some(_) => {}
                    None => problems.push(format!("{} lists missing child {}", node.id, child_id)),
                }
            }
        }
        problems
    }
}

/// One revision in the flat revision index.
#[derive(Debug, Clone, PartialEq)]
pub struct RevisionEntry {
    /// Revision node id
    pub id: NodeId,
    /// Owning drawing id
    pub drawing_id: String,
    /// Owning drawing name
    pub drawing_name: String,
    /// Discipline name
    pub discipline: String,
    /// Region id when nested in a region
    pub region_id: Option<String>,
    /// Version label
    pub version: String,
    /// Full revision record
    pub revision: Revision,
    /// Revision image
    pub image: String,
    /// Anchor image this revision is overlaid on
    pub parent_image: Option<String>,
    /// Alignment of the revision image
    pub image_transform: Option<ImageTransform>,
    /// Revision outline
    pub polygon: Option<Polygon>,
    /// Display path
    pub path: Vec<String>,
}

/// Output of the metadata parser.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDrawingData {
    /// Navigation tree
    pub tree: NavigationTree,
    /// Flat revision index in document order
    pub revisions: Vec<RevisionEntry>,
}

impl ParsedDrawingData {
    /// Find a revision entry by node id.
    pub fn find_revision(&self, id: &str) -> Option<&RevisionEntry> {
        find_revision(&self.revisions, id)
    }
}

/// Find a revision entry by node id.
pub fn find_revision<'a>(revisions: &'a [RevisionEntry], id: &str) -> Option<&'a RevisionEntry> {
    revisions.iter().find(|entry| entry.id == id)
}

/// Revisions related to a node.
///
/// A drawing relates to all its revisions, a discipline to its own, a region
/// to the region's, and a revision only to itself.
pub fn related_revisions<'a>(
    node: &NavigationNode,
    revisions: &'a [RevisionEntry],
) -> Vec<&'a RevisionEntry> {
    revisions
        .iter()
        .filter(|entry| match &node.data {
            NodeData::Drawing { drawing_id, .. } => entry.drawing_id == *drawing_id,
            NodeData::Discipline {
                drawing_id,
                discipline,
                ..
            } => entry.drawing_id == *drawing_id && entry.discipline == *discipline,
            NodeData::Region {
                drawing_id,
                discipline,
                region_id,
                ..
            } => {
                entry.drawing_id == *drawing_id
                    && entry.discipline == *discipline
                    && entry.region_id.as_deref() == Some(region_id.as_str())
            }
            NodeData::Revision { .. } => entry.id == node.id,
        })
        .collect()
}
