use std::{
    collections::HashMap,
    fmt,
    path::PathBuf,
    sync::Arc,
};

use anyhow::{anyhow, Context, Result};
use derive_more::Constructor;
use nalgebra::Vector2;

use crate::png::decode_png;

/// An image an atlas can be bound to. Atlases only need to know
/// its dimensions to validate regions and compute texture coordinates.
pub trait AtlasImage {
    /// Image size in pixels.
    fn size(&self) -> Vector2<u32>;
}

/// Images which are only known by their dimensions, for example when
/// the texture lives on a GPU and the pixels were never kept around.
impl AtlasImage for Vector2<u32> {
    fn size(&self) -> Vector2<u32> {
        *self
    }
}

/// An RGBA8 image decoded into memory.
#[derive(Constructor, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub name: String,
    pub size: Vector2<u32>,
    pub pixels: Vec<u8>,
}

impl fmt::Debug for DecodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecodedImage")
            .field("name", &self.name)
            .field("size", &self.size)
            .field("pixels", &self.pixels.len())
            .finish()
    }
}

impl AtlasImage for DecodedImage {
    fn size(&self) -> Vector2<u32> {
        self.size
    }
}

/// Loads backing images referenced by atlas descriptors by their relative name.
pub trait ImageResolver {
    type Image: AtlasImage;

    fn load_image(&mut self, name: &str) -> Result<Arc<Self::Image>>;
}

/// Resolves images from a fixed set registered up front.
#[derive(Debug)]
pub struct MemoryResolver<I> {
    images: HashMap<String, Arc<I>>,
}

impl<I> Default for MemoryResolver<I> {
    fn default() -> Self {
        Self {
            images: Default::default(),
        }
    }
}

impl<I> MemoryResolver<I> {
    pub fn insert(&mut self, name: impl Into<String>, image: I) -> &mut Self {
        self.images.insert(name.into(), Arc::new(image));
        self
    }

    pub fn with(mut self, name: impl Into<String>, image: I) -> Self {
        self.insert(name, image);
        self
    }
}

impl<I: AtlasImage> ImageResolver for MemoryResolver<I> {
    type Image = I;

    fn load_image(&mut self, name: &str) -> Result<Arc<I>> {
        self.images
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow!("asset not found: {name}"))
    }
}

/// Loads PNG images relative to a root directory.
/// Every image is decoded once, later requests share the same handle.
#[derive(Debug)]
pub struct DirectoryResolver {
    root: PathBuf,
    cache: HashMap<String, Arc<DecodedImage>>,
}

impl DirectoryResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: Default::default(),
        }
    }
}

impl ImageResolver for DirectoryResolver {
    type Image = DecodedImage;

    fn load_image(&mut self, name: &str) -> Result<Arc<DecodedImage>> {
        if let Some(image) = self.cache.get(name) {
            return Ok(image.clone());
        }

        let path = self.root.join(name);
        let bytes =
            std::fs::read(&path).with_context(|| format!("asset not found: {}", path.display()))?;
        let image = Arc::new(
            decode_png(name, &bytes).with_context(|| format!("invalid png: {}", path.display()))?,
        );

        log::debug!(
            "decoded image {} ({}x{})",
            path.display(),
            image.size.x,
            image.size.y
        );

        self.cache.insert(name.to_owned(), image.clone());
        Ok(image)
    }
}
