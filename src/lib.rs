//! drawview - construction drawing viewer core
//!
//! Parses drawing metadata into a navigation tree and provides the headless
//! state behind a drawing viewer: selection, pan/zoom, raster markup with
//! undo/redo, outline overlays and revision comparison.

pub mod comparison;
pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod explorer;
pub mod filter;
pub mod image_store;
pub mod keybindings;
pub mod markup;
pub mod model;
pub mod overlay;
pub mod parse;
pub mod selection;
pub mod session;
pub mod viewer;
pub mod zoom_math;

pub use comparison::{ComparisonLayer, ComparisonState};
pub use config::{LogLevel, ViewerConfig};
pub use error::{Result, ViewerError};
pub use image_store::{DirImageStore, ImageStore, MemoryImageStore};
pub use markup::{MarkupEngine, MarkupTool};
pub use model::{NavigationTree, NodeKind, ParsedDrawingData};
pub use parse::{parse_drawing_metadata, parse_metadata_json};
pub use selection::SelectionState;
pub use session::{ImageStatus, ViewerSession};
pub use viewer::{PointerInput, Size, ViewerState};
