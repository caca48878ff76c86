//! A viewing session over one parsed metadata document.
//!
//! The session owns every piece of mutable UI state and routes input
//! events to the viewer or the markup engine depending on the mode.

use std::path::PathBuf;

use image::RgbaImage;

use crate::comparison::{ComparisonLayer, ComparisonState};
use crate::config::ViewerConfig;
use crate::context::{CurrentContext, current_context};
use crate::error::{Result, ViewerError};
use crate::explorer::{ExplorerState, TreeRow};
use crate::filter::DrawingFilter;
use crate::image_store::ImageStore;
use crate::keybindings::KeyPress;
use crate::markup::{MarkupEngine, MarkupExport, export_png, load_font, save_export};
use crate::model::ParsedDrawingData;
use crate::overlay::{ImageLayers, PolygonOverlay, render_overlays_svg, resolve_image_layers};
use crate::selection::SelectionState;
use crate::viewer::{PointerButton, PointerInput, Size, ViewerState};

/// Load state of the current base image.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageStatus {
    /// Nothing to show
    Empty,
    /// Base image decoded
    Ready {
        /// Image file name
        name: String,
        /// Natural size
        size: Size,
    },
    /// Base image could not be loaded
    Failed {
        /// Image file name
        name: String,
        /// Failure description
        message: String,
    },
}

/// Interactive state for one document.
pub struct ViewerSession {
    config: ViewerConfig,
    data: ParsedDrawingData,
    selection: SelectionState,
    explorer: ExplorerState,
    filter: DrawingFilter,
    viewer: ViewerState,
    markup: MarkupEngine,
    comparison: ComparisonState,
    store: Box<dyn ImageStore>,
    container: Size,
    container_origin: (f32, f32),
    image_status: ImageStatus,
    markup_pointer: Option<i64>,
}

impl std::fmt::Debug for ViewerSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewerSession")
            .field("selection", &self.selection)
            .field("viewer", &self.viewer)
            .field("markup", &self.markup)
            .field("image_status", &self.image_status)
            .finish_non_exhaustive()
    }
}

impl ViewerSession {
    /// Start a session with the root drawing selected.
    pub fn new(data: ParsedDrawingData, store: Box<dyn ImageStore>, config: ViewerConfig) -> Self {
        let mut markup = MarkupEngine::new(&config.markup);
        if let Some(path) = &config.preferences.font_path {
            match std::fs::read(path)
                .map_err(ViewerError::from)
                .and_then(load_font)
            {
                Ok(font) => markup.set_font(font),
                Err(e) => log::warn!("Text tool font {} unavailable: {}", path.display(), e),
            }
        }

        let selection = if data.tree.root_id().is_empty() {
            SelectionState::new()
        } else {
            SelectionState::with_initial(data.tree.root_id())
        };
        let explorer = ExplorerState::new(&data.tree);
        let container = Size::new(
            config.viewer.default_base_width,
            config.viewer.default_base_height,
        );

        let mut session = Self {
            viewer: ViewerState::new(config.viewer),
            config,
            data,
            selection,
            explorer,
            filter: DrawingFilter::new(),
            markup,
            comparison: ComparisonState::new(),
            store,
            container,
            container_origin: (0.0, 0.0),
            image_status: ImageStatus::Empty,
            markup_pointer: None,
        };
        session.refresh_base_image();
        session
    }

    /// Parsed document.
    pub fn data(&self) -> &ParsedDrawingData {
        &self.data
    }

    /// Active configuration.
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Current selection.
    pub fn selection(&self) -> &SelectionState {
        &self.selection
    }

    /// Tree panel state.
    pub fn explorer(&self) -> &ExplorerState {
        &self.explorer
    }

    /// Search panel state.
    pub fn filter(&self) -> &DrawingFilter {
        &self.filter
    }

    /// Search panel state, for editing.
    pub fn filter_mut(&mut self) -> &mut DrawingFilter {
        &mut self.filter
    }

    /// Pan/zoom state.
    pub fn viewer(&self) -> &ViewerState {
        &self.viewer
    }

    /// Markup engine.
    pub fn markup(&self) -> &MarkupEngine {
        &self.markup
    }

    /// Markup engine, for tool/color/width changes and undo.
    pub fn markup_mut(&mut self) -> &mut MarkupEngine {
        &mut self.markup
    }

    /// Comparison state.
    pub fn comparison(&self) -> &ComparisonState {
        &self.comparison
    }

    /// Comparison state, for opacity and visibility changes.
    pub fn comparison_mut(&mut self) -> &mut ComparisonState {
        &mut self.comparison
    }

    /// Load state of the base image.
    pub fn image_status(&self) -> &ImageStatus {
        &self.image_status
    }

    /// Tree rows to display.
    pub fn tree_rows(&self) -> Vec<TreeRow> {
        self.explorer.visible_rows(&self.data.tree)
    }

    /// Toggle a tree row's expansion.
    pub fn click_tree_row(&mut self, id: &str) {
        self.explorer.click(&self.data.tree, id);
    }

    /// Select a node from the tree or the search results.
    pub fn select(&mut self, id: &str, additive: bool) -> Result<()> {
        if !self.data.tree.contains(id) {
            return Err(ViewerError::unknown_node(id));
        }
        self.selection.select(id, additive);
        self.explorer.reveal(&self.data.tree, id);
        self.comparison.sync_selection(&self.data, &self.selection);
        self.refresh_base_image();
        Ok(())
    }

    /// Show or hide a selected node's overlay.
    pub fn toggle_visibility(&mut self, id: &str) {
        self.selection.toggle_visibility(id);
    }

    /// Context panel summary.
    pub fn context(&self) -> Option<CurrentContext<'_>> {
        current_context(&self.data, &self.selection)
    }

    /// Base image and overlay for the primary selection.
    pub fn image_layers(&self) -> Option<ImageLayers<'_>> {
        resolve_image_layers(&self.data, self.selection.primary()?)
    }

    /// Outline overlays that are currently visible.
    pub fn overlays(&self) -> Vec<PolygonOverlay<'_>> {
        crate::overlay::visible_overlays(&self.data, &self.selection)
    }

    /// Visible outline overlays as SVG over the base image.
    pub fn overlay_svg(&self) -> Result<String> {
        render_overlays_svg(&self.overlays(), self.viewer.base_size())
    }

    /// Comparison layers in stacking order.
    pub fn comparison_layers(&self) -> Vec<ComparisonLayer<'_>> {
        self.comparison.layers(&self.data)
    }

    fn base_image_name(&self) -> Option<String> {
        if self.comparison.is_active() {
            return self
                .comparison
                .layers(&self.data)
                .first()
                .map(|l| l.image.to_string());
        }
        self.image_layers().map(|l| l.base_image.to_string())
    }

    /// Resolve and load the base image, updating the base size.
    ///
    /// A load failure is recorded in [`ViewerSession::image_status`]; the
    /// previous base size is kept.
    pub fn refresh_base_image(&mut self) {
        let Some(name) = self.base_image_name() else {
            self.image_status = ImageStatus::Empty;
            return;
        };
        if matches!(&self.image_status, ImageStatus::Ready { name: current, .. } if *current == name)
        {
            return;
        }
        match self.store.natural_size(&name) {
            Ok(size) => {
                self.viewer.set_base_size(size);
                if let Err(e) = self.sync_markup() {
                    log::warn!("Markup surface not resized: {}", e);
                }
                self.image_status = ImageStatus::Ready { name, size };
            }
            Err(e) => {
                log::warn!("Base image {} failed to load: {}", name, e);
                self.image_status = ImageStatus::Failed {
                    name,
                    message: e.to_string(),
                };
            }
        }
    }

    fn sync_markup(&mut self) -> Result<()> {
        self.markup
            .sync_size(self.viewer.base_size(), self.viewer.zoom())
    }

    /// Record the viewer container's size and screen position.
    pub fn set_container(&mut self, size: Size, origin: (f32, f32)) {
        self.container = size;
        self.container_origin = origin;
    }

    /// Zoom in one step about the container center.
    pub fn zoom_in(&mut self) -> Result<()> {
        self.viewer.zoom_in(self.container);
        self.sync_markup()
    }

    /// Zoom out one step about the container center.
    pub fn zoom_out(&mut self) -> Result<()> {
        self.viewer.zoom_out(self.container);
        self.sync_markup()
    }

    /// Zoom 1, no pan.
    pub fn reset_view(&mut self) -> Result<()> {
        self.viewer.reset();
        self.sync_markup()
    }

    /// Fit the base image into the container.
    pub fn fit_to_screen(&mut self) -> Result<()> {
        self.viewer.fit_to_screen(self.container);
        self.sync_markup()
    }

    /// Wheel zoom. Always consumes the event.
    pub fn wheel(&mut self, delta_y: f32) -> Result<bool> {
        let consumed = self.viewer.wheel(delta_y);
        self.sync_markup()?;
        Ok(consumed)
    }

    fn logical(&self, input: &PointerInput) -> (f32, f32) {
        self.viewer
            .screen_to_image((input.x, input.y), self.container_origin)
    }

    /// Pointer pressed. Returns `true` when the event was handled.
    ///
    /// In markup mode a plain primary press starts a gesture; shift+press
    /// pans like outside markup mode.
    pub fn pointer_down(&mut self, input: &PointerInput) -> Result<bool> {
        if self.markup.is_active() && !input.shift {
            if input.button != PointerButton::Primary || self.markup.is_drawing() {
                return Ok(false);
            }
            let point = self.logical(input);
            self.markup.pointer_down(point)?;
            self.markup_pointer = Some(input.pointer_id);
            return Ok(true);
        }
        Ok(self.viewer.pointer_down(input, self.markup.is_active()))
    }

    /// Whether an event belongs to another pointer than the one drawing.
    fn is_other_pointer(&self, input: &PointerInput) -> bool {
        self.markup_pointer
            .is_some_and(|id| id != input.pointer_id)
    }

    /// Pointer moved. Only the pointer that started a gesture continues it.
    pub fn pointer_move(&mut self, input: &PointerInput) -> bool {
        if self.markup.is_drawing() {
            if self.is_other_pointer(input) {
                return false;
            }
            let point = self.logical(input);
            return self.markup.pointer_move(point);
        }
        self.viewer.pointer_move(input)
    }

    /// Pointer released, cancelled or left the viewer.
    ///
    /// `text` is the string entered for the text tool.
    pub fn pointer_up(&mut self, input: &PointerInput, text: Option<&str>) -> Result<bool> {
        if self.markup.is_drawing() {
            if self.is_other_pointer(input) {
                return Ok(false);
            }
            self.markup_pointer = None;
            let point = self.logical(input);
            return self.markup.pointer_up(point, text);
        }
        Ok(self.viewer.pointer_up(input.pointer_id))
    }

    /// Keyboard shortcut. Returns `true` when it was consumed.
    pub fn key(&mut self, press: &KeyPress) -> bool {
        self.markup.handle_key(press)
    }

    /// Toggle markup mode. Returns the new state.
    pub fn toggle_markup(&mut self) -> Result<bool> {
        self.markup
            .toggle(self.viewer.base_size(), self.viewer.zoom())
    }

    /// Toggle comparison mode over the selected revisions.
    pub fn toggle_comparison(&mut self) -> Result<bool> {
        let active = self.comparison.toggle(&self.data, &self.selection)?;
        self.refresh_base_image();
        Ok(active)
    }

    /// Composite the comparison layers.
    pub fn render_comparison(&mut self) -> Result<RgbaImage> {
        self.comparison.render(&self.data, self.store.as_mut())
    }

    /// Merge the markup with the base image as PNG.
    pub fn export_markup(&mut self) -> Result<MarkupExport> {
        let surface = self.markup.surface().ok_or(ViewerError::MarkupInactive)?;
        let name = self.base_image_name().ok_or(ViewerError::NoBaseImage)?;
        let base = self.store.load(&name)?;
        export_png(&base, surface, self.viewer.base_size(), self.viewer.zoom())
    }

    /// Export the markup into the configured export directory.
    pub fn save_markup(&mut self) -> Result<PathBuf> {
        let export = self.export_markup()?;
        save_export(&self.config.preferences.export_dir, &export)
    }
}
