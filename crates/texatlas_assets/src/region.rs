use nalgebra::{vector, Vector2};
use texatlas_geometry::PixelRect;

use crate::error::{AtlasError, Result};

/// One named sprite on a shared atlas image.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    /// Location of the sprite pixels in the backing image.
    pub source_rect: PixelRect,
    /// The pixels are stored rotated by 90 degrees clockwise,
    /// so the logical size is `source_rect` size transposed.
    pub rotated: bool,
    /// Size of the sprite before transparent padding was trimmed.
    pub original_size: Vector2<i32>,
    /// Position of the trimmed pixels inside of the original canvas.
    pub offset: Vector2<i32>,
    /// Normalized anchor point.
    pub pivot: Option<Vector2<f32>>,
    /// Nine-slice border box. Never used for lookups.
    pub scale9: Option<PixelRect>,
}

impl Region {
    /// Size of the sprite pixels once rotated back.
    #[inline]
    pub fn size(&self) -> Vector2<i32> {
        logical_size(&self.source_rect, self.rotated)
    }

    /// Returns true if trimming removed any padding from this sprite.
    pub fn is_trimmed(&self) -> bool {
        self.offset != Vector2::zeros() || self.original_size != self.size()
    }
}

fn logical_size(rect: &PixelRect, rotated: bool) -> Vector2<i32> {
    match rotated {
        true => rect.transposed_size(),
        false => rect.size(),
    }
}

/// Trim metadata as it is stored in descriptors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trim {
    pub original_size: Vector2<i32>,
    pub offset: Vector2<i32>,
}

/// A region as every descriptor reader produces it, before
/// defaults are derived and invariants are checked.
#[derive(Debug, Clone, PartialEq)]
pub struct RegionDesc {
    pub name: String,
    pub source_rect: PixelRect,
    pub rotated: bool,
    pub trim: Option<Trim>,
    pub pivot: Option<Vector2<f32>>,
    pub scale9: Option<PixelRect>,
}

impl RegionDesc {
    pub fn new(name: impl Into<String>, source_rect: PixelRect) -> Self {
        Self {
            name: name.into(),
            source_rect,
            rotated: false,
            trim: None,
            pivot: None,
            scale9: None,
        }
    }

    /// Size of the sprite pixels once rotated back.
    pub fn size(&self) -> Vector2<i32> {
        logical_size(&self.source_rect, self.rotated)
    }

    pub fn rotated(mut self, rotated: bool) -> Self {
        self.rotated = rotated;
        self
    }

    pub fn trim(mut self, original_size: Vector2<i32>, offset: Vector2<i32>) -> Self {
        self.trim = Some(Trim {
            original_size,
            offset,
        });
        self
    }

    pub fn pivot(mut self, x: f32, y: f32) -> Self {
        self.pivot = Some(vector![x, y]);
        self
    }

    /// Derives untrimmed defaults and checks that the region is consistent
    /// on its own. Image bounds and name uniqueness are the atlas' concern.
    pub fn into_region(self) -> Result<Region> {
        if self.source_rect.is_empty() {
            return Err(AtlasError::invalid_region(
                &self.name,
                format!(
                    "source rectangle {}x{} is empty",
                    self.source_rect.w, self.source_rect.h
                ),
            ));
        }

        let size = self.size();
        let Trim {
            original_size,
            offset,
        } = self.trim.unwrap_or(Trim {
            original_size: size,
            offset: Vector2::zeros(),
        });

        if offset.x < 0 || offset.y < 0 {
            return Err(AtlasError::invalid_region(
                &self.name,
                format!("negative trim offset ({}, {})", offset.x, offset.y),
            ));
        }

        let end = offset.cast::<i64>() + size.cast::<i64>();
        if end.x > original_size.x as i64 || end.y > original_size.y as i64 {
            return Err(AtlasError::invalid_region(
                &self.name,
                format!(
                    "trimmed {}x{} at ({}, {}) exceeds original size {}x{}",
                    size.x, size.y, offset.x, offset.y, original_size.x, original_size.y
                ),
            ));
        }

        Ok(Region {
            name: self.name,
            source_rect: self.source_rect,
            rotated: self.rotated,
            original_size,
            offset,
            pivot: self.pivot,
            scale9: self.scale9,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_untrimmed_defaults() {
        let region = RegionDesc::new("a", PixelRect::new(0, 0, 10, 20))
            .into_region()
            .unwrap();

        assert_eq!(region.original_size, vector![10, 20]);
        assert_eq!(region.offset, vector![0, 0]);
        assert!(!region.is_trimmed());
    }

    #[test]
    fn test_untrimmed_rotated_swaps_size() {
        let region = RegionDesc::new("a", PixelRect::new(0, 0, 10, 20))
            .rotated(true)
            .into_region()
            .unwrap();

        assert_eq!(region.size(), vector![20, 10]);
        assert_eq!(region.original_size, vector![20, 10]);
        assert_eq!(region.pivot, None);
    }

    #[test]
    fn test_trim_may_touch_original_edge() {
        let region = RegionDesc::new("a", PixelRect::new(0, 0, 10, 20))
            .trim(vector![12, 24], vector![2, 4])
            .into_region()
            .unwrap();

        assert!(region.is_trimmed());
        assert_eq!(region.offset + region.size(), region.original_size);
    }

    #[test]
    fn test_trim_exceeding_original_is_rejected() {
        let result = RegionDesc::new("a", PixelRect::new(0, 0, 10, 20))
            .trim(vector![12, 24], vector![3, 4])
            .into_region();

        assert!(matches!(result, Err(AtlasError::InvalidRegion { region, .. }) if region == "a"));
    }

    #[test]
    fn test_rotated_trim_uses_logical_size() {
        let desc = RegionDesc::new("a", PixelRect::new(0, 0, 10, 20)).rotated(true);

        assert!(desc.clone().trim(vector![20, 10], vector![0, 0]).into_region().is_ok());
        assert!(desc.trim(vector![10, 20], vector![0, 0]).into_region().is_err());
    }

    #[test]
    fn test_empty_and_negative_offset_rejected() {
        assert!(RegionDesc::new("a", PixelRect::new(0, 0, 0, 20))
            .into_region()
            .is_err());
        assert!(RegionDesc::new("a", PixelRect::new(0, 0, 4, 4))
            .trim(vector![8, 8], vector![-1, 0])
            .into_region()
            .is_err());
    }
}
