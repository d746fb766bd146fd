use std::sync::Arc;

use nalgebra::{vector, Vector2};
use texatlas_geometry::Rect;

use crate::{image::AtlasImage, region::Region};

// Defines a single drawable object by its coordinates on a texture
// and a crop factor
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SubTexture {
    /// The trimmed quad in units, relative to the pivot, with Y pointing up
    pub clip: Rect,
    /// Texture coordinates for each of `clip.points()`
    pub uv: [[f32; 2]; 4],
}

/// Everything a renderer needs to draw a region.
#[derive(Debug)]
pub struct Sprite<I> {
    pub image: Arc<I>,
    /// Untrimmed sprite size in units
    pub size: Vector2<f32>,
    pub sub_texture: SubTexture,
}

impl<I> Clone for Sprite<I> {
    fn clone(&self) -> Self {
        Self {
            image: self.image.clone(),
            size: self.size,
            sub_texture: self.sub_texture,
        }
    }
}

impl<I: AtlasImage> Sprite<I> {
    pub fn from_region(image: Arc<I>, region: &Region, pixels_per_unit: f32) -> Self {
        let original_size = region.original_size.cast::<f32>();
        let pivot = region.pivot.unwrap_or(vector![0.5, 0.5]);
        let anchor = original_size.component_mul(&pivot);

        let a = region.offset.cast::<f32>() - anchor;
        let b = a + region.size().cast::<f32>();
        let clip = Rect::new(
            (a / pixels_per_unit).into(),
            (b / pixels_per_unit).into(),
        )
        .flip_y();

        let mut uv = region.source_rect.normalize(image.size()).points();
        // Rotated regions are packed 90 degrees clockwise, so the top-left
        // corner of the sprite is stored in the top-right corner of the rect.
        if region.rotated {
            uv.rotate_right(1);
        }

        Self {
            image,
            size: original_size / pixels_per_unit,
            sub_texture: SubTexture { clip, uv },
        }
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::Vector2;
    use texatlas_geometry::PixelRect;

    use super::*;
    use crate::region::RegionDesc;

    fn sprite(desc: RegionDesc) -> Sprite<Vector2<u32>> {
        let region = desc.into_region().unwrap();
        Sprite::from_region(Arc::new(vector![64, 32]), &region, 16.)
    }

    #[test]
    fn test_centered_untrimmed() {
        let sprite = sprite(RegionDesc::new("a", PixelRect::new(16, 0, 32, 16)));

        assert_eq!(sprite.size, vector![2., 1.]);
        assert_eq!(sprite.sub_texture.clip, Rect::new([-1., 0.5], [1., -0.5]));
        assert_eq!(
            sprite.sub_texture.uv,
            [[0.25, 0.], [0.25, 0.5], [0.75, 0.5], [0.75, 0.]]
        );
    }

    #[test]
    fn test_trimmed_with_pivot() {
        let sprite = sprite(
            RegionDesc::new("a", PixelRect::new(0, 0, 16, 16))
                .trim(vector![32, 32], vector![16, 0])
                .pivot(0.5, 1.0),
        );

        assert_eq!(sprite.size, vector![2., 2.]);
        assert_eq!(sprite.sub_texture.clip, Rect::new([0., 2.], [1., 1.]));
    }

    #[test]
    fn test_rotated_uv_corners() {
        let sprite = sprite(RegionDesc::new("a", PixelRect::new(0, 0, 16, 32)).rotated(true));

        assert_eq!(sprite.size, vector![2., 1.]);
        // top-left of the sprite maps to the top-right of the stored rect
        assert_eq!(
            sprite.sub_texture.uv,
            [[0.25, 0.], [0., 0.], [0., 1.], [0.25, 1.]]
        );
    }
}
