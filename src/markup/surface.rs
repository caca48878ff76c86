//! Raster surface the markup is painted on.
//!
//! The surface lives in *scaled* pixel space: it is `base * zoom` pixels
//! large, and callers stamp primitives at `logical * zoom`.

use tiny_skia::{
    BlendMode, LineCap, LineJoin, Paint, PathBuilder, Pixmap, Rect, Stroke, Transform,
};

use super::tool::Rgb;
use crate::error::{Result, ViewerError};
use crate::viewer::Size;

/// Color and width of a stroke in scaled pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    /// Stroke color
    pub color: Rgb,
    /// Stroke width in scaled pixels
    pub width: f32,
}

impl StrokeStyle {
    fn paint(&self) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color_rgba8(self.color.r, self.color.g, self.color.b, 255);
        paint.anti_alias = true;
        paint
    }

    fn stroke(&self) -> Stroke {
        Stroke {
            width: self.width,
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        }
    }
}

/// A saved copy of the surface pixels.
#[derive(Clone)]
pub struct Snapshot {
    pixmap: Pixmap,
}

impl Snapshot {
    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Raw premultiplied RGBA bytes.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Snapshot({}x{})", self.width(), self.height())
    }
}

/// Pixel dimensions of a surface for a base size at a zoom level.
///
/// Fractional sizes are truncated, and each side is at least one pixel.
pub fn surface_dimensions(base: Size, zoom: f32) -> (u32, u32) {
    let scaled = base.scaled(zoom);
    let side = |v: f32| {
        if v.is_finite() && v >= 1.0 {
            v as u32
        } else {
            1
        }
    };
    (side(scaled.width), side(scaled.height))
}

/// Markup raster surface.
#[derive(Clone)]
pub struct MarkupSurface {
    pixmap: Pixmap,
}

impl std::fmt::Debug for MarkupSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "MarkupSurface({}x{})", self.width(), self.height())
    }
}

fn allocate(width: u32, height: u32) -> Result<Pixmap> {
    Pixmap::new(width, height).ok_or(ViewerError::SurfaceUnavailable { width, height })
}

impl MarkupSurface {
    /// Create a transparent surface.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Ok(Self {
            pixmap: allocate(width, height)?,
        })
    }

    /// Create a surface sized for a base image at a zoom level.
    pub fn for_view(base: Size, zoom: f32) -> Result<Self> {
        let (w, h) = surface_dimensions(base, zoom);
        Self::new(w, h)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Underlying pixmap.
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }

    /// Raw premultiplied RGBA bytes.
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Straight-alpha RGBA value of a pixel.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Whether no pixel has any coverage.
    pub fn is_blank(&self) -> bool {
        self.pixmap.pixels().iter().all(|p| p.alpha() == 0)
    }

    /// Resize, scaling the existing content into the new dimensions.
    ///
    /// Returns `false` when the size is unchanged and nothing was done.
    pub fn resize_preserving(&mut self, width: u32, height: u32) -> Result<bool> {
        if width == self.width() && height == self.height() {
            return Ok(false);
        }
        let mut next = allocate(width, height)?;
        draw_scaled(&mut next, &self.pixmap);
        log::debug!(
            "Markup surface resized {}x{} -> {}x{}",
            self.width(),
            self.height(),
            width,
            height
        );
        self.pixmap = next;
        Ok(true)
    }

    /// Copy the current pixels.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            pixmap: self.pixmap.clone(),
        }
    }

    /// Restore a snapshot.
    ///
    /// A snapshot of the same size is copied verbatim; one taken at another
    /// zoom level is scaled to the current size.
    pub fn restore(&mut self, snapshot: &Snapshot) {
        if snapshot.width() == self.width() && snapshot.height() == self.height() {
            self.pixmap.data_mut().copy_from_slice(snapshot.data());
        } else {
            self.clear();
            draw_scaled(&mut self.pixmap, &snapshot.pixmap);
        }
    }

    /// Make every pixel transparent.
    pub fn clear(&mut self) {
        self.pixmap.fill(tiny_skia::Color::TRANSPARENT);
    }

    /// Stroke a straight segment.
    pub fn stroke_segment(&mut self, from: (f32, f32), to: (f32, f32), style: &StrokeStyle) {
        let mut pb = PathBuilder::new();
        pb.move_to(from.0, from.1);
        pb.line_to(to.0, to.1);
        if let Some(path) = pb.finish() {
            self.pixmap.stroke_path(
                &path,
                &style.paint(),
                &style.stroke(),
                Transform::identity(),
                None,
            );
        }
    }

    /// Stroke a rectangle outline. Negative sizes extend left/up.
    pub fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32, style: &StrokeStyle) {
        let mut pb = PathBuilder::new();
        pb.move_to(x, y);
        pb.line_to(x + width, y);
        pb.line_to(x + width, y + height);
        pb.line_to(x, y + height);
        pb.close();
        if let Some(path) = pb.finish() {
            let stroke = Stroke {
                line_cap: LineCap::Butt,
                line_join: LineJoin::Miter,
                ..style.stroke()
            };
            self.pixmap
                .stroke_path(&path, &style.paint(), &stroke, Transform::identity(), None);
        }
    }

    /// Stroke a circle outline.
    pub fn stroke_circle(&mut self, cx: f32, cy: f32, radius: f32, style: &StrokeStyle) {
        if let Some(path) = PathBuilder::from_circle(cx, cy, radius) {
            self.pixmap.stroke_path(
                &path,
                &style.paint(),
                &style.stroke(),
                Transform::identity(),
                None,
            );
        }
    }

    /// Make an axis-aligned rectangle transparent.
    pub fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let Some(rect) = Rect::from_xywh(x, y, width, height) else {
            return;
        };
        let mut paint = Paint::default();
        paint.blend_mode = BlendMode::Clear;
        paint.anti_alias = false;
        self.pixmap
            .fill_rect(rect, &paint, Transform::identity(), None);
    }
}

fn draw_scaled(target: &mut Pixmap, source: &Pixmap) {
    let sx = target.width() as f32 / source.width() as f32;
    let sy = target.height() as f32 / source.height() as f32;
    super::export::draw_scaled(target, source, sx, sy, 1.0);
}
