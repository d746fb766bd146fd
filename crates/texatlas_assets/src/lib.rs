//! Texture atlas descriptors: loading them from binary records and
//! TexturePacker JSON exports, and looking regions up for rendering.

pub mod atlas;
pub mod binary;
pub mod error;
pub mod image;
pub mod png;
pub mod region;
pub mod settings;
pub mod sprite;
pub mod texture_packer;

pub use atlas::{Atlas, AtlasBuilder, AtlasSet};
pub use error::AtlasError;
pub use image::{AtlasImage, DecodedImage, DirectoryResolver, ImageResolver, MemoryResolver};
pub use region::{Region, RegionDesc, Trim};
pub use settings::{ByteOrder, DuplicatePolicy, ReaderSettings};
pub use sprite::{Sprite, SubTexture};
pub use texture_packer::TexturePackerDocument;
