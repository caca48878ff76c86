//! Data models for the drawing viewer.

mod metadata;
mod navigation;
mod ordered;
mod transform;

pub use metadata::{
    Discipline, DisciplineHistory, DisciplineInfo, Drawing, DrawingMetadata, Polygon, Position,
    ProjectInfo, Region, Revision,
};
pub use navigation::{
    NavigationNode, NavigationTree, NodeData, NodeId, NodeKind, ParsedDrawingData, RevisionEntry,
    discipline_node_id, drawing_node_id, find_revision, region_node_id, related_revisions,
    revision_node_id,
};
pub use ordered::OrderedMap;
pub use transform::{ImageTransform, Placement, PolygonTransform};
