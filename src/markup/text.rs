//! Glyph rasterisation for the text tool.

use ab_glyph::{Font, FontArc, GlyphId, PxScale, ScaleFont, point};
use tiny_skia::{Pixmap, PremultipliedColorU8};

use super::tool::Rgb;
use crate::error::{Result, ViewerError};

/// Parse a TTF/OTF font.
pub fn load_font(bytes: Vec<u8>) -> Result<FontArc> {
    FontArc::try_from_vec(bytes).map_err(|_| ViewerError::InvalidFont)
}

/// Draw `text` with its baseline starting at `(x, y)`.
///
/// Returns the horizontal advance of the whole string.
pub fn draw_text(
    pixmap: &mut Pixmap,
    font: &FontArc,
    text: &str,
    x: f32,
    y: f32,
    size: f32,
    color: Rgb,
) -> f32 {
    let scale = PxScale::from(size);
    let scaled = font.as_scaled(scale);
    let mut caret = x;
    let mut previous: Option<GlyphId> = None;

    for ch in text.chars() {
        let id = scaled.glyph_id(ch);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(scale, point(caret, y));
        caret += scaled.h_advance(id);
        previous = Some(id);

        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, coverage| {
            let px = bounds.min.x as i32 + gx as i32;
            let py = bounds.min.y as i32 + gy as i32;
            blend_pixel(pixmap, px, py, color, coverage);
        });
    }
    caret - x
}

fn blend_pixel(pixmap: &mut Pixmap, x: i32, y: i32, color: Rgb, coverage: f32) {
    if x < 0 || y < 0 || x >= pixmap.width() as i32 || y >= pixmap.height() as i32 {
        return;
    }
    let coverage = coverage.clamp(0.0, 1.0);
    if coverage <= 0.0 {
        return;
    }
    let index = y as usize * pixmap.width() as usize + x as usize;
    let pixels = pixmap.pixels_mut();
    let dst = pixels[index];
    let keep = 1.0 - coverage;

    let channel = |src: u8, dst: u8| -> f32 { src as f32 * coverage + dst as f32 * keep };
    let a = (255.0 * coverage + dst.alpha() as f32 * keep).round().min(255.0) as u8;
    let r = channel(color.r, dst.red()).round().min(a as f32) as u8;
    let g = channel(color.g, dst.green()).round().min(a as f32) as u8;
    let b = channel(color.b, dst.blue()).round().min(a as f32) as u8;

    if let Some(blended) = PremultipliedColorU8::from_rgba(r, g, b, a) {
        pixels[index] = blended;
    }
}
