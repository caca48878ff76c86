//! Error types for drawing viewer operations.

use thiserror::Error;

/// Errors that can occur while loading, viewing or exporting drawings.
#[derive(Error, Debug)]
pub enum ViewerError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Image decoding or encoding error
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// SVG writing error
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    /// Image file not present in the store
    #[error("Image not found: {name}")]
    ImageNotFound {
        /// File name that was requested
        name: String,
    },

    /// Image exists but could not be loaded
    #[error("Failed to load image '{name}': {message}")]
    ImageLoad {
        /// File name that was requested
        name: String,
        /// Description of the failure
        message: String,
    },

    /// A raster surface of the requested size could not be allocated
    #[error("Raster surface unavailable ({width}x{height})")]
    SurfaceUnavailable {
        /// Requested width in pixels
        width: u32,
        /// Requested height in pixels
        height: u32,
    },

    /// The text tool was used without a font
    #[error("No font loaded for the text tool")]
    FontUnavailable,

    /// Font bytes could not be parsed
    #[error("Invalid font data")]
    InvalidFont,

    /// A node id that does not exist in the navigation tree
    #[error("Unknown node: {id}")]
    UnknownNode {
        /// The missing node id
        id: String,
    },

    /// Comparison mode needs more revisions than are selected
    #[error("Comparison needs at least {required} revisions, found {found}")]
    NotEnoughRevisions {
        /// Minimum number of revisions
        required: usize,
        /// Number of revisions available
        found: usize,
    },

    /// No base image is resolved for the current selection
    #[error("No base image for the current selection")]
    NoBaseImage,

    /// A markup operation was requested outside markup mode
    #[error("Markup mode is not active")]
    MarkupInactive,

    /// Invalid configuration value
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration error
        message: String,
    },
}

impl ViewerError {
    /// Create an image load error.
    pub fn image_load(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ImageLoad {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an image-not-found error.
    pub fn image_not_found(name: impl Into<String>) -> Self {
        Self::ImageNotFound { name: name.into() }
    }

    /// Create an unknown node error.
    pub fn unknown_node(id: impl Into<String>) -> Self {
        Self::UnknownNode { id: id.into() }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ViewerError>;
