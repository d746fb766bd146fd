//! Sprite atlas loading and lookup.
//!
//! Atlas descriptors come either as compact binary records written by the
//! content pipeline or as TexturePacker JSON exports. Both end up as an
//! [`Atlas`]: a shared backing image and a table of named regions,
//! which can be looked up by name or index at draw time.

pub use texatlas_assets::*;
pub use texatlas_collections as collections;
pub use texatlas_geometry as geometry;
