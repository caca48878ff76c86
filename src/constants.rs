//! Global constants for the drawing viewer

/// Smallest allowed zoom level
pub const MIN_ZOOM: f32 = 0.1;

/// Largest allowed zoom level
pub const MAX_ZOOM: f32 = 5.0;

/// Multiplier applied by the zoom in / zoom out buttons
pub const ZOOM_STEP: f32 = 1.2;

/// Wheel factor when scrolling up (zoom in)
pub const WHEEL_ZOOM_IN: f32 = 1.15;

/// Wheel factor when scrolling down (zoom out)
pub const WHEEL_ZOOM_OUT: f32 = 0.85;

/// Base image size assumed until the first image has loaded
pub const DEFAULT_BASE_WIDTH: f32 = 1600.0;

/// Base image size assumed until the first image has loaded
pub const DEFAULT_BASE_HEIGHT: f32 = 1000.0;

/// Maximum number of raster snapshots kept in the markup history
pub const MARKUP_HISTORY_LIMIT: usize = 20;

/// Default markup stroke color
pub const DEFAULT_MARKUP_COLOR: &str = "#ff0000";

/// Default markup stroke width in logical pixels
pub const DEFAULT_LINE_WIDTH: f32 = 2.0;

/// Allowed markup stroke width range
pub const MIN_LINE_WIDTH: f32 = 1.0;

/// Allowed markup stroke width range
pub const MAX_LINE_WIDTH: f32 = 10.0;

/// Minimum text size in scaled pixels
pub const MIN_TEXT_SIZE: f32 = 12.0;

/// Text size per unit of line width
pub const TEXT_SIZE_PER_LINE_WIDTH: f32 = 6.0;

/// Default opacity of a comparison layer
pub const DEFAULT_LAYER_OPACITY: f32 = 0.8;

/// Minimum number of revisions for comparison mode
pub const MIN_COMPARISON_REVISIONS: usize = 2;

/// Number of filter results shown per page
pub const FILTER_PAGE_SIZE: usize = 10;

/// Root drawing id preferred by the parser
pub const ROOT_DRAWING_ID: &str = "00";

/// Prefix of exported markup files
pub const EXPORT_FILE_PREFIX: &str = "drawing_with_markup_";
