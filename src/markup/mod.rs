//! Raster markup drawn over the viewed drawing.
//!
//! The markup layer is a tiny-skia pixmap sized `base * zoom`. Gestures are
//! recorded as raster snapshots for undo/redo, and the finished markup can be
//! merged with the drawing and exported as PNG.

mod engine;
mod export;
mod history;
mod surface;
mod text;
mod tool;

pub use engine::MarkupEngine;
pub use export::{
    MarkupExport, encode_png, export_file_name, export_png, merge_with_markup, save_export,
};
pub(crate) use export::{draw_scaled, image_to_pixmap, pixmap_to_image};
pub use history::SnapshotHistory;
pub use surface::{MarkupSurface, Snapshot, StrokeStyle, surface_dimensions};
pub use text::{draw_text, load_font};
pub use tool::{MarkupTool, Rgb};
