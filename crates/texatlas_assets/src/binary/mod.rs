//! Compact binary atlas records produced by the content pipeline.
//!
//! ```text
//! string   imageAssetName
//! int32    regionCount
//! repeat regionCount times:
//!   int32 x, y, width, height
//!   string name
//!   int32 rotatedFlag        // nonzero = rotated
//!   bool  hasTrim
//!   if hasTrim: int32 origWidth, origHeight, offsetX, offsetY
//!   bool  hasPivot
//!   if hasPivot: float64 pivotX, pivotY
//! ```
//!
//! Strings are UTF-8 prefixed with their byte length encoded as
//! a 7-bit variable length integer, booleans take a single byte.

mod reader;
mod writer;

use std::{fs::File, io::BufReader, path::Path};

pub use reader::*;
pub use writer::*;

use crate::{
    atlas::Atlas,
    error::{AtlasError, Result},
    image::ImageResolver,
    settings::ReaderSettings,
};

/// Reads a binary atlas from a file. Errors carry the file path.
pub fn load_atlas_file<R: ImageResolver>(
    path: impl AsRef<Path>,
    resolver: &mut R,
    settings: &ReaderSettings,
) -> Result<Atlas<R::Image>> {
    let path = path.as_ref();
    File::open(path)
        .map_err(AtlasError::from)
        .and_then(|file| read_atlas(BufReader::new(file), resolver, settings))
        .map_err(|e| e.in_asset(path.display().to_string()))
}
