//! Metadata to navigation tree conversion.
//!
//! [`parse_drawing_metadata`] is a pure function of the document: the same
//! input always yields the same node ids, child ordering and revision index.
//! Malformed hierarchy data degrades instead of failing. A drawing whose
//! parent is missing becomes its own path root, a parent link that would
//! close a cycle is dropped, and a document without an obvious root falls
//! back to its first drawing.

use std::collections::HashSet;

use crate::constants::ROOT_DRAWING_ID;
use crate::model::{
    Discipline, DisciplineHistory, Drawing, DrawingMetadata, NavigationNode, NavigationTree,
    NodeData, ParsedDrawingData, Revision, RevisionEntry, discipline_node_id, drawing_node_id,
    region_node_id, revision_node_id,
};

#[cfg(test)]
mod tests;

/// Parse a JSON metadata document.
pub fn parse_metadata_json(json: &str) -> crate::Result<ParsedDrawingData> {
    let metadata = DrawingMetadata::from_json(json)?;
    Ok(parse_drawing_metadata(&metadata))
}

/// Build the navigation tree and flat revision index for a document.
pub fn parse_drawing_metadata(metadata: &DrawingMetadata) -> ParsedDrawingData {
    let mut tree = NavigationTree::new();
    let mut revisions = Vec::new();

    for drawing in metadata.drawings.values() {
        tree.insert(NavigationNode {
            id: drawing_node_id(&drawing.id),
            name: drawing.name.clone(),
            parent_id: None,
            children: Vec::new(),
            path: drawing_path(metadata, drawing),
            data: NodeData::Drawing {
                drawing_id: drawing.id.clone(),
                image: drawing.image.clone(),
            },
        });
    }

    // Drawings are linked after all of them exist so a child listed before
    // its parent still ends up in the parent's children.
    for drawing in metadata.drawings.values() {
        let Some(parent) = parent_key(drawing) else {
            continue;
        };
        if metadata.drawings.get(parent).is_none() {
            log::warn!(
                "Drawing '{}' references missing parent '{}', treating it as a root",
                drawing.id,
                parent
            );
            continue;
        }
        let child_id = drawing_node_id(&drawing.id);
        let parent_id = drawing_node_id(parent);
        let closes_cycle =
            parent_id == child_id || tree.ancestors(&parent_id).iter().any(|n| n.id == child_id);
        if closes_cycle {
            log::warn!(
                "Drawing '{}' parent link to '{}' would form a cycle, ignoring it",
                drawing.id,
                parent
            );
            continue;
        }
        tree.attach(&parent_id, &child_id);
    }

    for drawing in metadata.drawings.values() {
        let Some(disciplines) = &drawing.disciplines else {
            continue;
        };
        let drawing_path = tree
            .get(&drawing_node_id(&drawing.id))
            .map(|n| n.path.clone())
            .unwrap_or_else(|| vec![drawing.name.clone()]);

        for (name, discipline) in disciplines.iter() {
            let Some(discipline) = discipline else {
                continue;
            };
            add_discipline(
                &mut tree,
                &mut revisions,
                drawing,
                &drawing_path,
                name,
                discipline,
            );
        }
    }

    if let Some(root) = find_root(metadata) {
        tree.set_root(drawing_node_id(&root.id));
    }

    log::debug!(
        "Parsed metadata '{}': {} nodes, {} revisions, root '{}'",
        metadata.project.name,
        tree.len(),
        revisions.len(),
        tree.root_id()
    );

    ParsedDrawingData { tree, revisions }
}

/// Parent id of a drawing, ignoring empty strings.
fn parent_key(drawing: &Drawing) -> Option<&str> {
    drawing.parent.as_deref().filter(|p| !p.is_empty())
}

/// Display path of a drawing: ancestor names from the top down to the drawing.
fn drawing_path(metadata: &DrawingMetadata, drawing: &Drawing) -> Vec<String> {
    let mut names = vec![drawing.name.clone()];
    let mut seen = HashSet::from([drawing.id.as_str()]);
    let mut current = drawing;

    while let Some(parent) = parent_key(current).and_then(|p| metadata.drawings.get(p)) {
        if !seen.insert(parent.id.as_str()) {
            break;
        }
        names.push(parent.name.clone());
        current = parent;
    }

    names.reverse();
    names
}

/// Root drawing: id `00`, else the first drawing without a parent, else the first drawing.
fn find_root(metadata: &DrawingMetadata) -> Option<&Drawing> {
    let drawings = || metadata.drawings.values();
    drawings()
        .find(|d| d.id == ROOT_DRAWING_ID)
        .or_else(|| drawings().find(|d| parent_key(d).is_none()))
        .or_else(|| drawings().next())
}

fn add_discipline(
    tree: &mut NavigationTree,
    revisions: &mut Vec<RevisionEntry>,
    drawing: &Drawing,
    drawing_path: &[String],
    name: &str,
    discipline: &Discipline,
) {
    let discipline_id = discipline_node_id(&drawing.id, name);
    let discipline_path = extend(drawing_path, name);

    tree.insert(NavigationNode {
        id: discipline_id.clone(),
        name: name.to_string(),
        parent_id: Some(drawing_node_id(&drawing.id)),
        children: Vec::new(),
        path: discipline_path.clone(),
        data: NodeData::Discipline {
            drawing_id: drawing.id.clone(),
            discipline: name.to_string(),
            image_transform: discipline.image_transform.clone(),
            image: discipline.image.clone(),
            polygon: discipline.polygon.clone(),
        },
    });

    let parent_image = discipline
        .image
        .clone()
        .unwrap_or_else(|| drawing.image.clone());
    let ctx = RevisionContext {
        drawing,
        discipline: name,
        parent_image: &parent_image,
    };

    match &discipline.history {
        DisciplineHistory::Regions(regions) => {
            for (region_id, region) in regions.iter() {
                let region_name = format!("Region {region_id}");
                let region_node = region_node_id(&drawing.id, name, region_id);
                let region_path = extend(&discipline_path, &region_name);

                tree.insert(NavigationNode {
                    id: region_node.clone(),
                    name: region_name,
                    parent_id: Some(discipline_id.clone()),
                    children: Vec::new(),
                    path: region_path.clone(),
                    data: NodeData::Region {
                        drawing_id: drawing.id.clone(),
                        discipline: name.to_string(),
                        region_id: region_id.to_string(),
                        polygon: Some(region.polygon.clone()),
                    },
                });

                for revision in &region.revisions {
                    ctx.add_revision(
                        tree,
                        revisions,
                        &region_node,
                        &region_path,
                        Some(region_id),
                        revision,
                    );
                }
            }
        }
        DisciplineHistory::Revisions(list) => {
            for revision in list {
                ctx.add_revision(
                    tree,
                    revisions,
                    &discipline_id,
                    &discipline_path,
                    None,
                    revision,
                );
            }
        }
        DisciplineHistory::None => {}
    }
}

struct RevisionContext<'a> {
    drawing: &'a Drawing,
    discipline: &'a str,
    parent_image: &'a str,
}

impl RevisionContext<'_> {
    fn add_revision(
        &self,
        tree: &mut NavigationTree,
        revisions: &mut Vec<RevisionEntry>,
        parent_id: &str,
        parent_path: &[String],
        region_id: Option<&str>,
        revision: &Revision,
    ) {
        let drawing_id = &self.drawing.id;
        let id = revision_node_id(drawing_id, self.discipline, region_id, &revision.version);
        let path = extend(parent_path, &revision.version);

        tree.insert(NavigationNode {
            id: id.clone(),
            name: revision.version.clone(),
            parent_id: Some(parent_id.to_string()),
            children: Vec::new(),
            path: path.clone(),
            data: NodeData::Revision {
                drawing_id: drawing_id.clone(),
                discipline: self.discipline.to_string(),
                region_id: region_id.map(str::to_string),
                version: revision.version.clone(),
                revision: revision.clone(),
                image: revision.image.clone(),
                image_transform: revision.image_transform.clone(),
                polygon: revision.polygon.clone(),
            },
        });

        revisions.push(RevisionEntry {
            id,
            drawing_id: drawing_id.clone(),
            drawing_name: self.drawing.name.clone(),
            discipline: self.discipline.to_string(),
            region_id: region_id.map(str::to_string),
            version: revision.version.clone(),
            revision: revision.clone(),
            image: revision.image.clone(),
            parent_image: Some(self.parent_image.to_string()),
            image_transform: revision.image_transform.clone(),
            polygon: revision.polygon.clone(),
            path,
        });
    }
}

fn extend(path: &[String], segment: &str) -> Vec<String> {
    let mut out = path.to_vec();
    out.push(segment.to_string());
    out
}
