use derive_more::Constructor;
use nalgebra::{vector, Vector2};
use serde::{Deserialize, Serialize};

/// Defines a rectangle by two dots.
/// Since we are not storing position and size here, by switching points
/// we can change rectangles orientation
///  ---     ---
/// | / |   | \ |
///  ---     ---
#[derive(Constructor, Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    pub a: [f32; 2],
    pub b: [f32; 2],
}

impl Rect {
    pub fn flip_y(self) -> Self {
        Self::new([self.a[0], -self.a[1]], [self.b[0], -self.b[1]])
    }

    #[inline]
    pub fn points(&self) -> [[f32; 2]; 4] {
        [
            [self.a[0], self.a[1]],
            [self.a[0], self.b[1]],
            [self.b[0], self.b[1]],
            [self.b[0], self.a[1]],
        ]
    }
}

/// An integer rectangle in the pixel space of an image,
/// defined by its top-left corner and its size.
#[derive(Constructor, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl PixelRect {
    #[inline]
    pub fn origin(&self) -> Vector2<i32> {
        vector![self.x, self.y]
    }

    #[inline]
    pub fn size(&self) -> Vector2<i32> {
        vector![self.w, self.h]
    }

    /// Size with width and height swapped. This is the size a region
    /// stored rotated by 90 degrees has once it is rotated back.
    #[inline]
    pub fn transposed_size(&self) -> Vector2<i32> {
        vector![self.h, self.w]
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.w <= 0 || self.h <= 0
    }

    /// Returns true if the rectangle fits into `[0; width) x [0; height)`.
    /// Computed in i64 so that huge coordinates can't overflow.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        let right = self.x as i64 + self.w as i64;
        let bottom = self.y as i64 + self.h as i64;

        self.x >= 0 && self.y >= 0 && right <= width as i64 && bottom <= height as i64
    }

    /// Converts pixel coordinates to a texture space rectangle with
    /// coordinates normalized by the texture size.
    pub fn normalize(&self, texture_size: Vector2<u32>) -> Rect {
        let scale = vector![1.0 / texture_size.x as f32, 1.0 / texture_size.y as f32];
        let a = self.origin().cast::<f32>().component_mul(&scale);
        let b = (self.origin() + self.size()).cast::<f32>().component_mul(&scale);

        Rect::new(a.into(), b.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_points_order() {
        let rect = Rect::new([0., 0.], [2., 1.]);
        assert_eq!(rect.points(), [[0., 0.], [0., 1.], [2., 1.], [2., 0.]]);
        assert_eq!(rect.flip_y().points()[1], [0., -1.]);
    }

    #[test]
    fn test_fits_within() {
        let rect = PixelRect::new(2, 2, 30, 30);
        assert!(rect.fits_within(32, 32));
        assert!(!rect.fits_within(31, 32));
        assert!(!PixelRect::new(-1, 0, 4, 4).fits_within(32, 32));
        assert!(!PixelRect::new(i32::MAX, 0, i32::MAX, 4).fits_within(u32::MAX / 2, 32));
    }

    #[test]
    fn test_transposed_size() {
        let rect = PixelRect::new(0, 0, 10, 20);
        assert_eq!(rect.size(), vector![10, 20]);
        assert_eq!(rect.transposed_size(), vector![20, 10]);
        assert!(!rect.is_empty());
        assert!(PixelRect::new(0, 0, 0, 20).is_empty());
    }

    #[test]
    fn test_normalize() {
        let rect = PixelRect::new(16, 0, 16, 32).normalize(vector![64, 32]);
        assert_eq!(rect, Rect::new([0.25, 0.], [0.5, 1.]));
    }
}
