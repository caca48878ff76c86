//! Revision comparison: several revision images stacked with per-layer
//! opacity and visibility.

use std::collections::HashMap;

use image::RgbaImage;
use tiny_skia::Pixmap;

use crate::constants::{DEFAULT_LAYER_OPACITY, MIN_COMPARISON_REVISIONS};
use crate::error::{Result, ViewerError};
use crate::image_store::ImageStore;
use crate::markup::{draw_scaled, image_to_pixmap, pixmap_to_image};
use crate::model::{NodeId, ParsedDrawingData};
use crate::selection::SelectionState;
use crate::viewer::Size;

/// One stacked revision image.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonLayer<'a> {
    /// Revision node id
    pub revision_id: &'a str,
    /// Revision image file
    pub image: &'a str,
    /// Layer opacity in `[0, 1]`
    pub opacity: f32,
    /// Whether the layer is drawn
    pub visible: bool,
    /// Legend label
    pub label: String,
}

/// Selected revision ids that have a revision entry, in selection order.
pub fn comparison_candidates(data: &ParsedDrawingData, selection: &SelectionState) -> Vec<NodeId> {
    selection
        .selected()
        .iter()
        .filter(|id| data.find_revision(id).is_some())
        .cloned()
        .collect()
}

/// Comparison mode state.
#[derive(Debug, Clone, Default)]
pub struct ComparisonState {
    active: bool,
    revisions: Vec<NodeId>,
    opacities: HashMap<NodeId, f32>,
    visibility: HashMap<NodeId, bool>,
}

impl ComparisonState {
    /// Create an inactive comparison.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether comparison mode is on.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Revisions being compared, in layer order.
    pub fn revisions(&self) -> &[NodeId] {
        &self.revisions
    }

    /// Reset every layer to the default opacity and make it visible.
    pub fn initialize(&mut self, revision_ids: &[NodeId]) {
        self.revisions = revision_ids.to_vec();
        self.opacities = revision_ids
            .iter()
            .map(|id| (id.clone(), DEFAULT_LAYER_OPACITY))
            .collect();
        self.visibility = revision_ids.iter().map(|id| (id.clone(), true)).collect();
    }

    /// Turn comparison on for the selected revisions, or off if it is on.
    ///
    /// Turning it on needs at least two selected revisions. Returns the new
    /// state.
    pub fn toggle(&mut self, data: &ParsedDrawingData, selection: &SelectionState) -> Result<bool> {
        if self.active {
            self.active = false;
            log::info!("Comparison mode off");
            return Ok(false);
        }
        let candidates = comparison_candidates(data, selection);
        if candidates.len() < MIN_COMPARISON_REVISIONS {
            return Err(ViewerError::NotEnoughRevisions {
                required: MIN_COMPARISON_REVISIONS,
                found: candidates.len(),
            });
        }
        self.initialize(&candidates);
        self.active = true;
        log::info!("Comparison mode on with {} revisions", candidates.len());
        Ok(true)
    }

    /// Follow a selection change: the layer list tracks the selected
    /// revisions, and the mode turns off when fewer than two remain.
    pub fn sync_selection(&mut self, data: &ParsedDrawingData, selection: &SelectionState) {
        if !self.active {
            return;
        }
        let candidates = comparison_candidates(data, selection);
        if candidates.len() < MIN_COMPARISON_REVISIONS {
            self.active = false;
            log::info!("Comparison mode off: fewer than two revisions selected");
            return;
        }
        for id in &candidates {
            self.opacities
                .entry(id.clone())
                .or_insert(DEFAULT_LAYER_OPACITY);
            self.visibility.entry(id.clone()).or_insert(true);
        }
        self.revisions = candidates;
    }

    /// Opacity of a layer.
    pub fn opacity(&self, revision_id: &str) -> f32 {
        self.opacities
            .get(revision_id)
            .copied()
            .unwrap_or(DEFAULT_LAYER_OPACITY)
    }

    /// Set a layer's opacity, clamped to `[0, 1]`.
    pub fn set_opacity(&mut self, revision_id: &str, opacity: f32) {
        let opacity = if opacity.is_nan() {
            DEFAULT_LAYER_OPACITY
        } else {
            opacity.clamp(0.0, 1.0)
        };
        self.opacities.insert(revision_id.to_string(), opacity);
    }

    /// Whether a layer is drawn.
    pub fn is_visible(&self, revision_id: &str) -> bool {
        self.visibility.get(revision_id).copied().unwrap_or(true)
    }

    /// Show or hide a layer.
    pub fn toggle_visibility(&mut self, revision_id: &str) {
        let visible = !self.is_visible(revision_id);
        self.visibility.insert(revision_id.to_string(), visible);
    }

    /// Layers in stacking order, bottom first.
    pub fn layers<'a>(&self, data: &'a ParsedDrawingData) -> Vec<ComparisonLayer<'a>> {
        self.revisions
            .iter()
            .enumerate()
            .filter_map(|(index, id)| {
                let entry = data.find_revision(id)?;
                let label = if entry.drawing_name.is_empty() {
                    format!("Drawing {}", index + 1)
                } else {
                    format!("{} - {}", entry.drawing_name, entry.version)
                };
                Some(ComparisonLayer {
                    revision_id: &entry.id,
                    image: &entry.image,
                    opacity: self.opacity(id),
                    visible: self.is_visible(id),
                    label,
                })
            })
            .collect()
    }

    /// Natural size of the first layer's image, which sets the base size.
    pub fn base_size(&self, data: &ParsedDrawingData, store: &mut dyn ImageStore) -> Result<Size> {
        let first = self
            .layers(data)
            .into_iter()
            .next()
            .ok_or(ViewerError::NoBaseImage)?;
        store.natural_size(first.image)
    }

    /// Composite the visible layers at natural size, each with its opacity.
    pub fn render(
        &self,
        data: &ParsedDrawingData,
        store: &mut dyn ImageStore,
    ) -> Result<RgbaImage> {
        let size = self.base_size(data, store)?;
        let (width, height) = (size.width as u32, size.height as u32);
        let mut canvas =
            Pixmap::new(width, height).ok_or(ViewerError::SurfaceUnavailable { width, height })?;

        for layer in self.layers(data).iter().filter(|l| l.visible) {
            let image = store.load(layer.image)?;
            let pixmap = image_to_pixmap(&image)?;
            draw_scaled(&mut canvas, &pixmap, 1.0, 1.0, layer.opacity);
        }
        Ok(pixmap_to_image(&canvas))
    }
}
