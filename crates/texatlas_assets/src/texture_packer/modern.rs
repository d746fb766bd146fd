use serde::{Deserialize, Serialize};
use texatlas_geometry::PixelRect;

use super::types::{FrameMap, Meta, Pivot, Point, Size};
use crate::{atlas::Atlas, image::AtlasImage};

/// A multi-texture export, one entry of `textures` per atlas page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModernDocument {
    pub textures: Vec<ModernTexture>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModernTexture {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub premultiplied: Option<bool>,
    #[serde(default)]
    pub frames: FrameMap<ModernFrame>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModernFrame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame: Option<PixelRect>,
    #[serde(default)]
    pub rotated: Rotation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pivot: Option<Pivot>,
    #[serde(
        default,
        alias = "scale9Borders",
        skip_serializing_if = "Option::is_none"
    )]
    pub scale9: Option<PixelRect>,
}

/// Rotation is a count of quarter turns, but some exporters write a boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rotation {
    Flag(bool),
    Count(i64),
}

impl Default for Rotation {
    fn default() -> Self {
        Rotation::Count(0)
    }
}

impl Rotation {
    pub fn is_rotated(self) -> bool {
        match self {
            Rotation::Flag(flag) => flag,
            Rotation::Count(count) => count != 0,
        }
    }
}

impl ModernDocument {
    /// Exports an atlas as a single texture document.
    pub fn from_atlas<I: AtlasImage>(atlas: &Atlas<I>) -> Self {
        let size = atlas.image().size();
        let frames = atlas
            .regions()
            .map(|region| {
                let trimmed = region.is_trimmed();
                let frame = ModernFrame {
                    frame: Some(region.source_rect),
                    rotated: Rotation::Count(region.rotated as i64),
                    size: trimmed.then(|| region.original_size.into()),
                    offset: trimmed.then(|| region.offset.into()),
                    pivot: region.pivot.map(Into::into),
                    scale9: region.scale9,
                };
                (region.name.clone(), frame)
            })
            .collect();

        Self {
            textures: vec![ModernTexture {
                filename: Some(atlas.image_name().to_owned()),
                size: Some(Size {
                    w: size.x as i32,
                    h: size.y as i32,
                }),
                frames: FrameMap(frames),
                ..Default::default()
            }],
            meta: None,
        }
    }
}
