//! Merging the markup with its drawing and writing the result as PNG.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, RgbaImage};
use tiny_skia::{ColorU8, FilterQuality, IntSize, Pixmap, PixmapPaint, Transform};

use super::surface::{MarkupSurface, surface_dimensions};
use crate::constants::EXPORT_FILE_PREFIX;
use crate::error::{Result, ViewerError};
use crate::viewer::Size;

/// A PNG ready to be handed to the user.
#[derive(Debug, Clone)]
pub struct MarkupExport {
    /// Suggested file name
    pub file_name: String,
    /// Encoded PNG bytes
    pub png: Vec<u8>,
}

/// Convert a decoded image into a premultiplied pixmap.
pub(crate) fn image_to_pixmap(image: &DynamicImage) -> Result<Pixmap> {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    let size =
        IntSize::from_wh(width, height).ok_or(ViewerError::SurfaceUnavailable { width, height })?;
    let mut data = Vec::with_capacity(rgba.as_raw().len());
    for px in rgba.pixels() {
        let [r, g, b, a] = px.0;
        let c = ColorU8::from_rgba(r, g, b, a).premultiply();
        data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
    }
    Pixmap::from_vec(data, size).ok_or(ViewerError::SurfaceUnavailable { width, height })
}

/// Convert a pixmap back to straight-alpha RGBA.
pub(crate) fn pixmap_to_image(pixmap: &Pixmap) -> RgbaImage {
    let mut out = RgbaImage::new(pixmap.width(), pixmap.height());
    for (dst, src) in out.pixels_mut().zip(pixmap.pixels()) {
        let c = src.demultiply();
        dst.0 = [c.red(), c.green(), c.blue(), c.alpha()];
    }
    out
}

/// Draw `source` onto `target` scaled by `(sx, sy)` with the given opacity.
pub(crate) fn draw_scaled(target: &mut Pixmap, source: &Pixmap, sx: f32, sy: f32, opacity: f32) {
    let paint = PixmapPaint {
        opacity,
        quality: FilterQuality::Bilinear,
        ..Default::default()
    };
    target.draw_pixmap(
        0,
        0,
        source.as_ref(),
        &paint,
        Transform::from_scale(sx, sy),
        None,
    );
}

/// Composite the markup over the drawing at the drawing's natural size.
///
/// The base image is scaled to `base_size` and the markup surface, which
/// lives at `base_size * zoom`, is scaled by `1 / zoom` on top of it.
pub fn merge_with_markup(
    base: &DynamicImage,
    markup: &MarkupSurface,
    base_size: Size,
    zoom: f32,
) -> Result<RgbaImage> {
    let (width, height) = surface_dimensions(base_size, 1.0);
    let mut canvas =
        Pixmap::new(width, height).ok_or(ViewerError::SurfaceUnavailable { width, height })?;

    let base_pixmap = image_to_pixmap(base)?;
    draw_scaled(
        &mut canvas,
        &base_pixmap,
        width as f32 / base_pixmap.width() as f32,
        height as f32 / base_pixmap.height() as f32,
        1.0,
    );

    let inverse = if zoom > 0.0 && zoom.is_finite() {
        1.0 / zoom
    } else {
        1.0
    };
    draw_scaled(&mut canvas, markup.pixmap(), inverse, inverse, 1.0);

    Ok(pixmap_to_image(&canvas))
}

/// Encode an image as PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png)?;
    Ok(bytes.into_inner())
}

/// Export file name for a unix timestamp in milliseconds.
pub fn export_file_name(unix_millis: u128) -> String {
    format!("{}{}.png", EXPORT_FILE_PREFIX, unix_millis)
}

fn now_millis() -> u128 {
    web_time::SystemTime::now()
        .duration_since(web_time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or_default()
}

/// Merge and encode the markup, named with the current time.
pub fn export_png(
    base: &DynamicImage,
    markup: &MarkupSurface,
    base_size: Size,
    zoom: f32,
) -> Result<MarkupExport> {
    let merged = merge_with_markup(base, markup, base_size, zoom)?;
    let png = encode_png(&merged)?;
    let file_name = export_file_name(now_millis());
    log::info!("Exported {} ({} bytes)", file_name, png.len());
    Ok(MarkupExport { file_name, png })
}

/// Write an export into `dir`, returning the file path.
pub fn save_export(dir: &Path, export: &MarkupExport) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    let path = dir.join(&export.file_name);
    std::fs::write(&path, &export.png)?;
    log::info!("Saved export to {}", path.display());
    Ok(path)
}
