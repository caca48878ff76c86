//! Image lookup and caching.
//!
//! Drawings reference their raster images by bare file name. A store
//! resolves those names, decodes the image once and keeps the decoded copy.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use image::DynamicImage;

use crate::error::{Result, ViewerError};
use crate::viewer::Size;

/// Supported image file extensions.
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// Check if a filename has a supported image extension.
pub fn is_image_file(filename: &str) -> bool {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Check that a name is a plain image file name with no directory parts.
fn check_name(name: &str) -> Result<()> {
    if name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.split('.').all(|part| part.is_empty())
    {
        return Err(ViewerError::image_load(name, "not a plain file name"));
    }
    if !is_image_file(name) {
        return Err(ViewerError::image_load(name, "unsupported image type"));
    }
    Ok(())
}

fn decode(name: &str, bytes: &[u8]) -> Result<Arc<DynamicImage>> {
    let image =
        image::load_from_memory(bytes).map_err(|e| ViewerError::image_load(name, e.to_string()))?;
    log::info!(
        "Loaded image {} ({}x{})",
        name,
        image.width(),
        image.height()
    );
    Ok(Arc::new(image))
}

/// Source of drawing images.
pub trait ImageStore {
    /// Load (or fetch from cache) the image with this file name.
    fn load(&mut self, name: &str) -> Result<Arc<DynamicImage>>;

    /// Natural pixel size of an image.
    fn natural_size(&mut self, name: &str) -> Result<Size> {
        let image = self.load(name)?;
        Ok(Size::new(image.width() as f32, image.height() as f32))
    }
}

/// Images served from a directory on disk.
#[derive(Debug)]
pub struct DirImageStore {
    root: PathBuf,
    cache: HashMap<String, Arc<DynamicImage>>,
}

impl DirImageStore {
    /// Create a store rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: HashMap::new(),
        }
    }

    /// Directory images are read from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Number of decoded images held.
    pub fn cached_count(&self) -> usize {
        self.cache.len()
    }

    /// Drop all decoded images.
    pub fn clear(&mut self) {
        self.cache.clear();
    }
}

impl ImageStore for DirImageStore {
    fn load(&mut self, name: &str) -> Result<Arc<DynamicImage>> {
        if let Some(image) = self.cache.get(name) {
            return Ok(Arc::clone(image));
        }
        check_name(name)?;

        let path = self.root.join(name);
        if !path.is_file() {
            log::warn!("Image not found: {}", path.display());
            return Err(ViewerError::image_not_found(name));
        }
        let bytes = std::fs::read(&path)?;
        let image = decode(name, &bytes)?;
        self.cache.insert(name.to_string(), Arc::clone(&image));
        Ok(image)
    }
}

/// Images held in memory, for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryImageStore {
    files: HashMap<String, Vec<u8>>,
    cache: HashMap<String, Arc<DynamicImage>>,
}

impl MemoryImageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add encoded image bytes under a file name.
    pub fn insert_bytes(&mut self, name: impl Into<String>, bytes: Vec<u8>) {
        let name = name.into();
        self.cache.remove(&name);
        self.files.insert(name, bytes);
    }

    /// Add an already decoded image under a file name.
    pub fn insert_image(&mut self, name: impl Into<String>, image: DynamicImage) {
        let name = name.into();
        self.files.remove(&name);
        self.cache.insert(name, Arc::new(image));
    }

    /// Whether an image with this name is present.
    pub fn contains(&self, name: &str) -> bool {
        self.files.contains_key(name) || self.cache.contains_key(name)
    }
}

impl ImageStore for MemoryImageStore {
    fn load(&mut self, name: &str) -> Result<Arc<DynamicImage>> {
        if let Some(image) = self.cache.get(name) {
            return Ok(Arc::clone(image));
        }
        let bytes = self
            .files
            .get(name)
            .ok_or_else(|| ViewerError::image_not_found(name))?;
        let image = decode(name, bytes)?;
        self.cache.insert(name.to_string(), Arc::clone(&image));
        Ok(image)
    }
}
