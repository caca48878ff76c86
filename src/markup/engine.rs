//! Markup engine: tool state, gestures and the snapshot history.
//!
//! Gesture points are given in logical (base-image) pixels. They are stamped
//! onto the surface at `logical * zoom` with widths scaled by `zoom`, so a
//! stroke keeps the same thickness relative to the drawing at any zoom.

use ab_glyph::FontArc;

use super::history::SnapshotHistory;
use super::surface::{MarkupSurface, StrokeStyle, surface_dimensions};
use super::text::draw_text;
use super::tool::{MarkupTool, Rgb};
use crate::config::MarkupSettings;
use crate::constants::{
    DEFAULT_MARKUP_COLOR, MAX_LINE_WIDTH, MIN_LINE_WIDTH, MIN_TEXT_SIZE, TEXT_SIZE_PER_LINE_WIDTH,
};
use crate::error::{Result, ViewerError};
use crate::keybindings::{KeyPress, MarkupShortcut, shortcut_for};
use crate::viewer::Size;

/// Raster markup layer over the drawing.
#[derive(Debug)]
pub struct MarkupEngine {
    active: bool,
    tool: MarkupTool,
    color: Rgb,
    line_width: f32,
    is_drawing: bool,
    draw_start: (f32, f32),
    last_point: (f32, f32),
    base_size: Size,
    zoom: f32,
    surface: Option<MarkupSurface>,
    history: SnapshotHistory,
    font: Option<FontArc>,
}

impl MarkupEngine {
    /// Create an inactive engine with the configured defaults.
    pub fn new(settings: &MarkupSettings) -> Self {
        let color = Rgb::from_hex(&settings.default_color)
            .or_else(|| Rgb::from_hex(DEFAULT_MARKUP_COLOR))
            .unwrap_or(Rgb::new(255, 0, 0));
        Self {
            active: false,
            tool: MarkupTool::default(),
            color,
            line_width: settings
                .default_line_width
                .clamp(MIN_LINE_WIDTH, MAX_LINE_WIDTH),
            is_drawing: false,
            draw_start: (0.0, 0.0),
            last_point: (0.0, 0.0),
            base_size: Size::new(1.0, 1.0),
            zoom: 1.0,
            surface: None,
            history: SnapshotHistory::with_limit(settings.history_limit),
            font: None,
        }
    }

    /// Whether markup mode is on.
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Current tool.
    pub fn tool(&self) -> MarkupTool {
        self.tool
    }

    /// Current color.
    pub fn color(&self) -> Rgb {
        self.color
    }

    /// Current logical line width.
    pub fn line_width(&self) -> f32 {
        self.line_width
    }

    /// Whether a gesture is in progress.
    pub fn is_drawing(&self) -> bool {
        self.is_drawing
    }

    /// Start point of the current gesture in logical pixels.
    pub fn draw_start(&self) -> (f32, f32) {
        self.draw_start
    }

    /// The markup surface while markup mode is on.
    pub fn surface(&self) -> Option<&MarkupSurface> {
        self.surface.as_ref()
    }

    /// Zoom the surface is currently scaled for.
    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    /// Base size the surface is currently scaled for.
    pub fn base_size(&self) -> Size {
        self.base_size
    }

    /// Snapshot history.
    pub fn history(&self) -> &SnapshotHistory {
        &self.history
    }

    /// Whether an undo step is available.
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether a redo step is available.
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Provide the font used by the text tool.
    pub fn set_font(&mut self, font: FontArc) {
        self.font = Some(font);
    }

    /// Select a tool.
    pub fn set_tool(&mut self, tool: MarkupTool) {
        log::debug!("Markup tool: {}", tool.name());
        self.tool = tool;
    }

    /// Select a color from `#rrggbb` or `#rgb`.
    pub fn set_color(&mut self, hex: &str) -> Result<()> {
        let color = Rgb::from_hex(hex)
            .ok_or_else(|| ViewerError::config(format!("invalid color '{}'", hex)))?;
        self.color = color;
        Ok(())
    }

    /// Select a color.
    pub fn set_rgb(&mut self, color: Rgb) {
        self.color = color;
    }

    /// Set the logical line width, clamped to `[1, 10]`.
    pub fn set_line_width(&mut self, width: f32) {
        self.line_width = if width.is_finite() {
            width.clamp(MIN_LINE_WIDTH, MAX_LINE_WIDTH)
        } else {
            MIN_LINE_WIDTH
        };
    }

    /// Turn markup mode on, creating a blank surface for the current view.
    pub fn enter(&mut self, base_size: Size, zoom: f32) -> Result<()> {
        if self.active {
            return self.sync_size(base_size, zoom);
        }
        self.surface = Some(MarkupSurface::for_view(base_size, zoom)?);
        self.base_size = base_size;
        self.zoom = zoom;
        self.history.clear();
        self.is_drawing = false;
        self.active = true;
        log::info!("Markup mode on");
        Ok(())
    }

    /// Turn markup mode off and dispose the surface and its history.
    pub fn exit(&mut self) {
        if !self.active {
            return;
        }
        self.surface = None;
        self.history.clear();
        self.is_drawing = false;
        self.active = false;
        log::info!("Markup mode off");
    }

    /// Toggle markup mode. Returns the new state.
    pub fn toggle(&mut self, base_size: Size, zoom: f32) -> Result<bool> {
        if self.active {
            self.exit();
        } else {
            self.enter(base_size, zoom)?;
        }
        Ok(self.active)
    }

    /// Follow a base size or zoom change, keeping drawn content.
    pub fn sync_size(&mut self, base_size: Size, zoom: f32) -> Result<()> {
        self.base_size = base_size;
        self.zoom = zoom;
        let Some(surface) = self.surface.as_mut() else {
            return Ok(());
        };
        let (w, h) = surface_dimensions(base_size, zoom);
        surface.resize_preserving(w, h)?;
        Ok(())
    }

    fn style(&self) -> StrokeStyle {
        StrokeStyle {
            color: self.color,
            width: self.line_width * self.zoom,
        }
    }

    fn scaled(&self, p: (f32, f32)) -> (f32, f32) {
        (p.0 * self.zoom, p.1 * self.zoom)
    }

    /// Font size in surface pixels for the text tool.
    pub fn text_size(&self) -> f32 {
        (self.line_width * TEXT_SIZE_PER_LINE_WIDTH * self.zoom).max(MIN_TEXT_SIZE)
    }

    /// Start a gesture at a logical point.
    ///
    /// The surface state before the gesture is pushed onto the history.
    pub fn pointer_down(&mut self, logical: (f32, f32)) -> Result<()> {
        let Some(surface) = self.surface.as_ref() else {
            return Err(ViewerError::MarkupInactive);
        };
        self.history.push(surface.snapshot());
        self.is_drawing = true;
        self.draw_start = logical;
        self.last_point = logical;
        log::trace!(
            "Markup {} start at ({:.1}, {:.1})",
            self.tool.name(),
            logical.0,
            logical.1
        );
        Ok(())
    }

    /// Continue a gesture. Only the pen and eraser paint here.
    pub fn pointer_move(&mut self, logical: (f32, f32)) -> bool {
        if !self.is_drawing || !self.tool.is_continuous() {
            return false;
        }
        let style = self.style();
        let from = self.scaled(self.last_point);
        let to = self.scaled(logical);
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        match self.tool {
            MarkupTool::Pen => surface.stroke_segment(from, to, &style),
            _ => {
                // half-extent of the cleared square
                let half = 2.0 * style.width;
                surface.clear_rect(to.0 - half, to.1 - half, 2.0 * half, 2.0 * half);
            }
        }
        self.last_point = logical;
        true
    }

    /// Finish a gesture at a logical point.
    ///
    /// Shape tools draw from the gesture start to `logical`. The text tool
    /// stamps `text` at the gesture start; `None` or an empty string draws
    /// nothing. Returns `false` when no gesture was in progress.
    pub fn pointer_up(&mut self, logical: (f32, f32), text: Option<&str>) -> Result<bool> {
        if !self.is_drawing {
            return Ok(false);
        }
        self.is_drawing = false;

        let style = self.style();
        let start = self.scaled(self.draw_start);
        let end = self.scaled(logical);
        let size = self.text_size();
        let Some(surface) = self.surface.as_mut() else {
            return Err(ViewerError::MarkupInactive);
        };

        match self.tool {
            MarkupTool::Pen | MarkupTool::Eraser => {}
            MarkupTool::Line => surface.stroke_segment(start, end, &style),
            MarkupTool::Rect => {
                surface.stroke_rect(start.0, start.1, end.0 - start.0, end.1 - start.1, &style)
            }
            MarkupTool::Circle => {
                let radius = (end.0 - start.0).hypot(end.1 - start.1);
                surface.stroke_circle(start.0, start.1, radius, &style);
            }
            MarkupTool::Text => {
                let Some(text) = text.filter(|t| !t.is_empty()) else {
                    return Ok(true);
                };
                let font = self.font.as_ref().ok_or(ViewerError::FontUnavailable)?;
                draw_text(
                    surface.pixmap_mut(),
                    font,
                    text,
                    start.0,
                    start.1,
                    size,
                    style.color,
                );
            }
        }
        log::trace!("Markup {} finished", self.tool.name());
        Ok(true)
    }

    /// Restore the state before the last gesture. No-op without history.
    pub fn undo(&mut self) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        match self.history.pop_undo(surface.snapshot()) {
            Some(previous) => {
                surface.restore(&previous);
                true
            }
            None => false,
        }
    }

    /// Re-apply the last undone gesture. No-op without redo history.
    pub fn redo(&mut self) -> bool {
        let Some(surface) = self.surface.as_mut() else {
            return false;
        };
        match self.history.pop_redo(surface.snapshot()) {
            Some(next) => {
                surface.restore(&next);
                true
            }
            None => false,
        }
    }

    /// Wipe the surface and forget all history.
    pub fn clear(&mut self) {
        if let Some(surface) = self.surface.as_mut() {
            surface.clear();
        }
        self.history.clear();
        self.is_drawing = false;
    }

    /// Apply an undo/redo shortcut. Ignored unless markup mode is on.
    pub fn handle_key(&mut self, press: &KeyPress) -> bool {
        if !self.active {
            return false;
        }
        match shortcut_for(press) {
            Some(MarkupShortcut::Undo) => self.undo(),
            Some(MarkupShortcut::Redo) => self.redo(),
            None => false,
        }
    }
}

impl Default for MarkupEngine {
    fn default() -> Self {
        Self::new(&MarkupSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(base: f32, zoom: f32) -> MarkupEngine {
        let mut e = MarkupEngine::default();
        e.enter(Size::new(base, base), zoom).unwrap();
        e
    }

    fn alpha(e: &MarkupEngine, x: u32, y: u32) -> u8 {
        e.surface().unwrap().pixel(x, y).unwrap()[3]
    }

    #[test]
    fn test_surface_lifecycle() {
        let mut e = MarkupEngine::default();
        assert!(e.surface().is_none());
        assert!(matches!(
            e.pointer_down((1.0, 1.0)),
            Err(ViewerError::MarkupInactive)
        ));
        e.enter(Size::new(100.0, 50.0), 2.0).unwrap();
        let s = e.surface().unwrap();
        assert_eq!((s.width(), s.height()), (200, 100));
        assert!(e.toggle(Size::new(100.0, 50.0), 2.0).is_ok());
        assert!(!e.is_active());
        assert!(e.surface().is_none());
    }

    #[test]
    fn test_pen_is_stamped_in_scaled_space() {
        let mut e = engine(100.0, 2.0);
        e.pointer_down((10.0, 20.0)).unwrap();
        assert!(e.pointer_move((40.0, 20.0)));
        assert!(e.pointer_up((40.0, 20.0), None).unwrap());
        assert_eq!(alpha(&e, 50, 40), 255);
        assert_eq!(alpha(&e, 50, 20), 0);
    }

    #[test]
    fn test_undo_restores_exact_bytes() {
        let mut e = engine(60.0, 1.0);
        e.pointer_down((5.0, 5.0)).unwrap();
        e.pointer_move((50.0, 50.0));
        e.pointer_up((50.0, 50.0), None).unwrap();
        let before = e.surface().unwrap().data().to_vec();

        e.set_tool(MarkupTool::Line);
        e.pointer_down((0.0, 50.0)).unwrap();
        e.pointer_up((50.0, 0.0), None).unwrap();
        assert_ne!(e.surface().unwrap().data(), &before[..]);

        assert!(e.undo());
        assert_eq!(e.surface().unwrap().data(), &before[..]);
    }

    #[test]
    fn test_redo_reapplies_and_new_gesture_clears_it() {
        let mut e = engine(60.0, 1.0);
        e.set_tool(MarkupTool::Rect);
        e.pointer_down((10.0, 10.0)).unwrap();
        e.pointer_up((40.0, 40.0), None).unwrap();
        let drawn = e.surface().unwrap().data().to_vec();

        assert!(e.undo());
        assert!(e.surface().unwrap().is_blank());
        assert!(e.redo());
        assert_eq!(e.surface().unwrap().data(), &drawn[..]);

        e.undo();
        e.pointer_down((1.0, 1.0)).unwrap();
        e.pointer_up((2.0, 2.0), None).unwrap();
        assert!(!e.can_redo());
        assert!(!e.redo());
    }

    #[test]
    fn test_empty_undo_is_noop() {
        let mut e = engine(10.0, 1.0);
        assert!(!e.undo());
        assert!(e.surface().unwrap().is_blank());
    }

    #[test]
    fn test_history_is_bounded() {
        let mut e = engine(20.0, 1.0);
        for _ in 0..25 {
            e.pointer_down((1.0, 1.0)).unwrap();
            e.pointer_up((1.0, 1.0), None).unwrap();
        }
        assert_eq!(e.history().undo_count(), 20);
    }

    #[test]
    fn test_eraser_clears_square() {
        let mut e = engine(100.0, 1.0);
        e.pointer_down((0.0, 50.0)).unwrap();
        e.pointer_move((100.0, 50.0));
        e.pointer_up((100.0, 50.0), None).unwrap();

        e.set_tool(MarkupTool::Eraser);
        e.set_line_width(5.0);
        e.pointer_down((50.0, 50.0)).unwrap();
        e.pointer_move((50.0, 50.0));
        e.pointer_up((50.0, 50.0), None).unwrap();
        // square of side 4 * line width around the pointer
        assert_eq!(alpha(&e, 50, 50), 0);
        assert_eq!(alpha(&e, 42, 50), 0);
        assert_eq!(alpha(&e, 58, 50), 0);
        assert_eq!(alpha(&e, 28, 50), 255);
        assert_eq!(alpha(&e, 72, 50), 255);
    }

    #[test]
    fn test_circle_radius_is_distance() {
        let mut e = engine(100.0, 1.0);
        e.set_tool(MarkupTool::Circle);
        e.set_line_width(4.0);
        e.pointer_down((50.0, 50.0)).unwrap();
        assert!(!e.pointer_move((68.0, 74.0)));
        e.pointer_up((68.0, 74.0), None).unwrap();
        // radius 30
        assert!(alpha(&e, 80, 50) > 200);
        assert!(alpha(&e, 50, 20) > 200);
        assert_eq!(alpha(&e, 50, 50), 0);
        assert_eq!(alpha(&e, 50, 10), 0);
    }

    #[test]
    fn test_zoom_change_preserves_markup() {
        let mut e = engine(100.0, 1.0);
        e.set_line_width(6.0);
        e.pointer_down((10.0, 50.0)).unwrap();
        e.pointer_move((40.0, 50.0));
        e.pointer_up((40.0, 50.0), None).unwrap();

        e.sync_size(Size::new(100.0, 100.0), 2.0).unwrap();
        let s = e.surface().unwrap();
        assert_eq!((s.width(), s.height()), (200, 200));
        assert!(alpha(&e, 50, 100) >= 250);

        // Undo across the resize rescales the older snapshot.
        assert!(e.undo());
        assert_eq!(e.surface().unwrap().width(), 200);
        assert!(e.surface().unwrap().is_blank());
    }

    #[test]
    fn test_line_width_and_color_setters() {
        let mut e = MarkupEngine::default();
        e.set_line_width(0.2);
        assert_eq!(e.line_width(), 1.0);
        e.set_line_width(42.0);
        assert_eq!(e.line_width(), 10.0);
        e.set_line_width(f32::NAN);
        assert_eq!(e.line_width(), 1.0);
        assert!(e.set_color("#00f").is_ok());
        assert_eq!(e.color(), Rgb::new(0, 0, 255));
        assert!(e.set_color("blue").is_err());
        assert_eq!(e.color(), Rgb::new(0, 0, 255));
    }

    #[test]
    fn test_text_size_formula() {
        let mut e = engine(10.0, 1.0);
        e.set_line_width(1.0);
        assert_eq!(e.text_size(), 12.0);
        e.set_line_width(4.0);
        e.sync_size(Size::new(10.0, 10.0), 2.0).unwrap();
        assert_eq!(e.text_size(), 48.0);
    }

    #[test]
    fn test_text_without_font() {
        let mut e = engine(50.0, 1.0);
        e.set_tool(MarkupTool::Text);
        e.pointer_down((5.0, 20.0)).unwrap();
        assert!(matches!(
            e.pointer_up((5.0, 20.0), Some("A1")),
            Err(ViewerError::FontUnavailable)
        ));
        assert!(!e.is_drawing());

        e.pointer_down((5.0, 20.0)).unwrap();
        assert!(e.pointer_up((5.0, 20.0), None).unwrap());
        assert!(e.surface().unwrap().is_blank());
    }

    #[test]
    fn test_shortcuts_only_in_markup_mode() {
        let mut e = MarkupEngine::default();
        assert!(!e.handle_key(&KeyPress::new('z').ctrl()));

        e.enter(Size::new(30.0, 30.0), 1.0).unwrap();
        e.set_tool(MarkupTool::Line);
        e.pointer_down((0.0, 0.0)).unwrap();
        e.pointer_up((30.0, 30.0), None).unwrap();
        assert!(e.handle_key(&KeyPress::new('z').ctrl()));
        assert!(e.surface().unwrap().is_blank());
        assert!(e.handle_key(&KeyPress::new('y').meta()));
        assert!(!e.surface().unwrap().is_blank());
    }

    #[test]
    fn test_clear_empties_history() {
        let mut e = engine(30.0, 1.0);
        e.pointer_down((0.0, 0.0)).unwrap();
        e.pointer_move((20.0, 20.0));
        e.pointer_up((20.0, 20.0), None).unwrap();
        e.clear();
        assert!(e.surface().unwrap().is_blank());
        assert!(!e.can_undo());
    }
}
