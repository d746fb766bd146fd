//! TexturePacker JSON descriptors.
//!
//! Two dialects are supported: a single texture export with top level
//! `frames` and `meta`, and a multi-texture export with a `textures` array
//! where each texture maps frame names to frames. Both are lifted into
//! `RawFrame` and normalized into `RegionDesc` by `RawFrame::into_desc`.

mod legacy;
mod modern;
mod types;

use std::path::Path;

use log::debug;
use nalgebra::Vector2;
use serde::{Deserialize, Serialize};

pub use legacy::*;
pub use modern::*;
pub use types::*;

use crate::{
    atlas::{AtlasBuilder, AtlasSet},
    error::{AtlasError, Result},
    image::ImageResolver,
    region::RegionDesc,
    settings::ReaderSettings,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TexturePackerDocument {
    Legacy(LegacyDocument),
    Modern(ModernDocument),
}

/// Both dialects at once, to tell which one a document uses.
#[derive(Deserialize)]
struct DocumentProbe {
    #[serde(default)]
    frames: Option<LegacyFrames>,
    #[serde(default)]
    textures: Option<Vec<ModernTexture>>,
    #[serde(default)]
    meta: Option<Meta>,
}

/// A frame of either dialect, borrowed from its document.
#[derive(Debug, Clone, Copy)]
pub enum RawFrame<'a> {
    Legacy {
        index: usize,
        key: Option<&'a str>,
        frame: &'a LegacyFrame,
    },
    Modern {
        name: &'a str,
        frame: &'a ModernFrame,
    },
}

/// Frames of a single atlas page, along with the name of its image.
#[derive(Debug, Clone)]
pub struct RawPage<'a> {
    pub image: Option<&'a str>,
    pub frames: Vec<RawFrame<'a>>,
    location: String,
    image_field: &'static str,
}

fn missing(location: impl Into<String>, field: &'static str) -> AtlasError {
    AtlasError::MissingRequiredField {
        location: location.into(),
        field,
    }
}

impl RawFrame<'_> {
    /// Converts a frame of either dialect into a region description.
    pub fn into_desc(self) -> Result<RegionDesc> {
        match self {
            RawFrame::Legacy { index, key, frame } => {
                let name = key
                    .or(frame.filename.as_deref())
                    .ok_or_else(|| missing(format!("frame #{index}"), "filename"))?;
                let rect = frame
                    .frame
                    .ok_or_else(|| missing(format!("frame `{name}`"), "frame"))?;

                let mut desc = RegionDesc::new(name, rect).rotated(frame.rotated);
                if frame.source_size.is_some() || frame.sprite_source_size.is_some() {
                    let size = desc.size();
                    desc = desc.trim(
                        frame.source_size.map(Size::vector).unwrap_or(size),
                        frame
                            .sprite_source_size
                            .map(|r| r.origin())
                            .unwrap_or_else(Vector2::zeros),
                    );
                }
                desc.pivot = frame.pivot.map(Pivot::vector);

                Ok(desc)
            }
            RawFrame::Modern { name, frame } => {
                let rect = frame
                    .frame
                    .ok_or_else(|| missing(format!("frame `{name}`"), "frame"))?;

                let mut desc = RegionDesc::new(name, rect).rotated(frame.rotated.is_rotated());
                if frame.size.is_some() || frame.offset.is_some() {
                    let size = desc.size();
                    desc = desc.trim(
                        frame.size.map(Size::vector).unwrap_or(size),
                        frame
                            .offset
                            .map(Point::vector)
                            .unwrap_or_else(Vector2::zeros),
                    );
                }
                desc.pivot = frame.pivot.map(Pivot::vector);
                desc.scale9 = frame.scale9;

                Ok(desc)
            }
        }
    }
}

impl TexturePackerDocument {
    /// Parses a document, detecting which dialect it is written in.
    pub fn decode(json: &str) -> Result<Self> {
        let probe: DocumentProbe = serde_json::from_str(json)?;

        match (probe.frames, probe.textures) {
            (Some(frames), None) => Ok(Self::Legacy(LegacyDocument {
                frames,
                meta: probe.meta,
            })),
            (None, Some(textures)) => Ok(Self::Modern(ModernDocument {
                textures,
                meta: probe.meta,
            })),
            (frames, textures) => Err(AtlasError::SchemaDetection {
                frames: frames.is_some(),
                textures: textures.is_some(),
            }),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn meta(&self) -> Option<&Meta> {
        match self {
            Self::Legacy(document) => document.meta.as_ref(),
            Self::Modern(document) => document.meta.as_ref(),
        }
    }

    /// Splits the document into pages, one per backing image.
    pub fn pages(&self) -> Vec<RawPage<'_>> {
        match self {
            Self::Legacy(document) => {
                let frames = match &document.frames {
                    LegacyFrames::List(frames) => frames
                        .iter()
                        .enumerate()
                        .map(|(index, frame)| RawFrame::Legacy {
                            index,
                            key: None,
                            frame,
                        })
                        .collect(),
                    LegacyFrames::Hash(frames) => frames
                        .iter()
                        .enumerate()
                        .map(|(index, (key, frame))| RawFrame::Legacy {
                            index,
                            key: Some(key.as_str()),
                            frame,
                        })
                        .collect(),
                };

                vec![RawPage {
                    image: document.meta.as_ref().and_then(|m| m.image.as_deref()),
                    frames,
                    location: "meta".to_owned(),
                    image_field: "image",
                }]
            }
            Self::Modern(document) => document
                .textures
                .iter()
                .enumerate()
                .map(|(index, texture)| RawPage {
                    image: texture.image.as_deref().or(texture.filename.as_deref()),
                    frames: texture
                        .frames
                        .iter()
                        .map(|(name, frame)| RawFrame::Modern {
                            name: name.as_str(),
                            frame,
                        })
                        .collect(),
                    location: format!("texture #{index}"),
                    image_field: "filename",
                })
                .collect(),
        }
    }

    /// Resolves the image of every page and builds an atlas for it.
    pub fn load_atlases<R: ImageResolver>(
        &self,
        resolver: &mut R,
        settings: &ReaderSettings,
    ) -> Result<AtlasSet<R::Image>> {
        let mut set = AtlasSet::default();

        for page in self.pages() {
            let image_name = page
                .image
                .ok_or_else(|| missing(page.location.as_str(), page.image_field))?;
            let image =
                resolver
                    .load_image(image_name)
                    .map_err(|source| AtlasError::AssetResolution {
                        name: image_name.to_owned(),
                        source,
                    })?;

            let mut builder = AtlasBuilder::new(image_name, image, *settings);
            builder.reserve(page.frames.len());
            for frame in page.frames {
                builder.create_region(frame.into_desc()?)?;
            }

            let atlas = builder.build();
            debug!(
                "read texture packer page `{}` with {} regions",
                atlas.image_name(),
                atlas.region_count()
            );
            set.push(atlas, settings.duplicates)?;
        }

        Ok(set)
    }
}

/// Reads a TexturePacker JSON file. Errors carry the file path.
pub fn load_atlas_file<R: ImageResolver>(
    path: impl AsRef<Path>,
    resolver: &mut R,
    settings: &ReaderSettings,
) -> Result<AtlasSet<R::Image>> {
    let path = path.as_ref();
    std::fs::read_to_string(path)
        .map_err(AtlasError::from)
        .and_then(|json| TexturePackerDocument::decode(&json))
        .and_then(|document| document.load_atlases(resolver, settings))
        .map_err(|e| e.in_asset(path.display().to_string()))
}
