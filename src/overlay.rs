//! Overlays derived from the current selection.
//!
//! A single selected node resolves to a base image plus an optional aligned
//! image overlay. Every selected non-drawing node also contributes an outline
//! polygon, colored by its position in the selection.

use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::error::Result;
use crate::model::{
    ImageTransform, NavigationNode, NodeData, ParsedDrawingData, Placement, drawing_node_id,
};
use crate::selection::SelectionState;
use crate::viewer::Size;

/// Stroke and fill of one overlay color slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayerColor {
    /// Outline color
    pub stroke: &'static str,
    /// Translucent fill
    pub fill: &'static str,
}

/// Overlay palette, assigned by selection order.
pub const LAYER_COLORS: [LayerColor; 5] = [
    LayerColor {
        stroke: "#ff0000",
        fill: "rgba(255, 0, 0, 0.1)",
    },
    LayerColor {
        stroke: "#0000ff",
        fill: "rgba(0, 0, 255, 0.1)",
    },
    LayerColor {
        stroke: "#008000",
        fill: "rgba(0, 128, 0, 0.1)",
    },
    LayerColor {
        stroke: "#ff8000",
        fill: "rgba(255, 128, 0, 0.1)",
    },
    LayerColor {
        stroke: "#800080",
        fill: "rgba(128, 0, 128, 0.1)",
    },
];

/// Palette entry for an overlay index.
pub fn layer_color(index: usize) -> LayerColor {
    LAYER_COLORS[index % LAYER_COLORS.len()]
}

/// An image drawn over the base image.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageOverlay<'a> {
    /// Overlay image file
    pub image: &'a str,
    /// Placement relative to the base image
    pub placement: Placement,
}

/// Images to show for the primary selection.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageLayers<'a> {
    /// Image that establishes the viewer's base size
    pub base_image: &'a str,
    /// Aligned overlay, present only when it differs from the base image
    pub overlay: Option<ImageOverlay<'a>>,
}

fn placement_of(transform: Option<&ImageTransform>) -> Placement {
    transform.map(ImageTransform::resolve).unwrap_or_default()
}

/// Resolve the base image and overlay for a node.
///
/// Revisions sit on their parent image, disciplines on their `relativeTo`
/// image or their own, and everything else on the owning drawing's image.
pub fn resolve_image_layers<'a>(
    data: &'a ParsedDrawingData,
    node_id: &str,
) -> Option<ImageLayers<'a>> {
    let node = data.tree.get(node_id)?;
    let drawing_image = || {
        data.tree
            .get(&drawing_node_id(node.drawing_id()))
            .and_then(NavigationNode::image)
    };

    let (base, overlay, transform) = if let Some(entry) = data.find_revision(node_id) {
        let base = entry.parent_image.as_deref().unwrap_or(&entry.image);
        (
            Some(base),
            Some(entry.image.as_str()),
            entry.image_transform.as_ref(),
        )
    } else {
        match &node.data {
            NodeData::Discipline {
                image,
                image_transform,
                ..
            } => {
                let base = image_transform
                    .as_ref()
                    .and_then(|t| t.relative_to.as_deref())
                    .or(image.as_deref())
                    .or_else(drawing_image);
                (base, image.as_deref(), image_transform.as_ref())
            }
            NodeData::Drawing { image, .. } => (Some(image.as_str()), None, None),
            _ => (drawing_image(), None, None),
        }
    };

    let base_image = base.filter(|b| !b.is_empty())?;
    let overlay = overlay
        .filter(|o| !o.is_empty() && *o != base_image)
        .map(|image| ImageOverlay {
            image,
            placement: placement_of(transform),
        });
    Some(ImageLayers {
        base_image,
        overlay,
    })
}

/// Outline of one selected node.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonOverlay<'a> {
    /// Node the outline belongs to
    pub node_id: &'a str,
    /// Legend label
    pub label: String,
    /// Outline vertices in base-image pixels
    pub points: Vec<(f32, f32)>,
    /// Position among the selection's overlays
    pub color_index: usize,
    /// Whether the node is currently visible
    pub visible: bool,
}

impl PolygonOverlay<'_> {
    /// Palette entry for this overlay.
    pub fn color(&self) -> LayerColor {
        layer_color(self.color_index)
    }
}

fn overlay_label(node: &NavigationNode) -> String {
    match &node.data {
        NodeData::Revision {
            discipline,
            version,
            ..
        } => format!("{} {}", discipline, version),
        _ => node.discipline().unwrap_or(&node.name).to_string(),
    }
}

/// Outline overlays for every selected non-drawing node, in selection order.
///
/// Color indices count all such nodes, so hiding one keeps the others'
/// colors stable.
pub fn polygon_overlays<'a>(
    data: &'a ParsedDrawingData,
    selection: &SelectionState,
) -> Vec<PolygonOverlay<'a>> {
    selection
        .selected()
        .iter()
        .filter_map(|id| data.tree.get(id))
        .filter(|node| !matches!(node.data, NodeData::Drawing { .. }))
        .enumerate()
        .map(|(color_index, node)| PolygonOverlay {
            node_id: &node.id,
            label: overlay_label(node),
            points: node
                .polygon()
                .map(|p| p.projected_points())
                .unwrap_or_default(),
            color_index,
            visible: selection.is_visible(&node.id),
        })
        .collect()
}

/// The overlays that should be drawn.
pub fn visible_overlays<'a>(
    data: &'a ParsedDrawingData,
    selection: &SelectionState,
) -> Vec<PolygonOverlay<'a>> {
    polygon_overlays(data, selection)
        .into_iter()
        .filter(|o| o.visible)
        .collect()
}

fn write<W: Write>(writer: &mut Writer<W>, event: Event<'_>) -> Result<()> {
    writer.write_event(event)?;
    Ok(())
}

fn format_points(points: &[(f32, f32)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{},{}", x, y))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render overlays as an SVG whose user space matches the base image.
///
/// Strokes use `non-scaling-stroke` so they stay the same width on screen
/// at any zoom. Overlays with fewer than three points are skipped.
pub fn render_overlays_svg(overlays: &[PolygonOverlay<'_>], base_size: Size) -> Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    let view_box = format!("0 0 {} {}", base_size.width, base_size.height);
    let width = base_size.width.to_string();
    let height = base_size.height.to_string();

    write(
        &mut writer,
        Event::Start(BytesStart::new("svg").with_attributes([
            ("xmlns", "http://www.w3.org/2000/svg"),
            ("viewBox", view_box.as_str()),
            ("width", width.as_str()),
            ("height", height.as_str()),
            ("preserveAspectRatio", "none"),
        ])),
    )?;

    for overlay in overlays.iter().filter(|o| o.points.len() >= 3) {
        let color = overlay.color();
        let points = format_points(&overlay.points);
        write(
            &mut writer,
            Event::Start(BytesStart::new("g").with_attributes([("data-node-id", overlay.node_id)])),
        )?;
        write(&mut writer, Event::Start(BytesStart::new("title")))?;
        write(&mut writer, Event::Text(BytesText::new(&overlay.label)))?;
        write(&mut writer, Event::End(BytesEnd::new("title")))?;
        write(
            &mut writer,
            Event::Empty(BytesStart::new("polygon").with_attributes([
                ("points", points.as_str()),
                ("fill", color.fill),
                ("stroke", color.stroke),
                ("stroke-width", "2"),
                ("vector-effect", "non-scaling-stroke"),
            ])),
        )?;
        write(&mut writer, Event::End(BytesEnd::new("g")))?;
    }

    write(&mut writer, Event::End(BytesEnd::new("svg")))?;
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}
