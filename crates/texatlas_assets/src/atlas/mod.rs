use std::sync::Arc;

use log::{trace, warn};
use texatlas_collections::IndexedMap;

use crate::{
    error::{AtlasError, Result},
    image::AtlasImage,
    region::{Region, RegionDesc},
    settings::{DuplicatePolicy, ReaderSettings},
    sprite::Sprite,
};

mod set;

pub use set::AtlasSet;

/// A single backing image and a table of named regions on it.
///
/// An atlas is immutable once built. Regions are only handed out
/// by reference, so none of them can outlive the atlas, while the
/// image itself is shared with every sprite created from it.
#[derive(Debug)]
pub struct Atlas<I> {
    image_name: String,
    image: Arc<I>,
    regions: IndexedMap<String, Region>,
}

impl<I> Atlas<I> {
    /// Name the backing image was resolved by.
    pub fn image_name(&self) -> &str {
        &self.image_name
    }

    pub fn image(&self) -> &Arc<I> {
        &self.image
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Iterates regions in descriptor order.
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.values()
    }

    pub fn get(&self, name: &str) -> Option<&Region> {
        self.regions.get_by_key(name)
    }

    /// Index of a region, which can be cached for `region_at` lookups.
    pub fn get_index(&self, name: &str) -> Option<usize> {
        self.regions.get_index(name)
    }

    pub fn region(&self, name: &str) -> Result<&Region> {
        self.get(name)
            .ok_or_else(|| AtlasError::RegionNotFound(name.to_owned()))
    }

    pub fn region_at(&self, index: usize) -> Result<&Region> {
        self.regions.get(index).ok_or(AtlasError::IndexOutOfRange {
            index,
            len: self.regions.len(),
        })
    }
}

impl<I: AtlasImage> Atlas<I> {
    /// Builds a renderer-ready sprite for a region.
    /// `pixels_per_unit` converts pixels into world units.
    pub fn create_sprite(&self, name: &str, pixels_per_unit: f32) -> Result<Sprite<I>> {
        let region = self.region(name)?;
        Ok(Sprite::from_region(
            self.image.clone(),
            region,
            pixels_per_unit,
        ))
    }
}

/// Collects regions for an atlas while a descriptor is being read.
#[derive(Debug)]
pub struct AtlasBuilder<I> {
    atlas: Atlas<I>,
    settings: ReaderSettings,
}

impl<I: AtlasImage> AtlasBuilder<I> {
    pub fn new(image_name: impl Into<String>, image: Arc<I>, settings: ReaderSettings) -> Self {
        Self {
            atlas: Atlas {
                image_name: image_name.into(),
                image,
                regions: IndexedMap::default(),
            },
            settings,
        }
    }

    pub fn reserve(&mut self, additional: usize) {
        self.atlas.regions.reserve(additional);
    }

    pub fn region_count(&self) -> usize {
        self.atlas.region_count()
    }

    /// Validates a region and appends it to the atlas, returning its index.
    pub fn create_region(&mut self, desc: RegionDesc) -> Result<usize> {
        let region = desc.into_region()?;

        if self.settings.check_bounds {
            let size = self.atlas.image.size();
            let rect = &region.source_rect;
            if !rect.fits_within(size.x, size.y) {
                return Err(AtlasError::invalid_region(
                    &region.name,
                    format!(
                        "rectangle ({}, {}, {}, {}) lies outside of {}x{} image `{}`",
                        rect.x, rect.y, rect.w, rect.h, size.x, size.y, self.atlas.image_name
                    ),
                ));
            }
        }

        trace!(
            "region `{}` at ({}, {}) {}x{}{}",
            region.name,
            region.source_rect.x,
            region.source_rect.y,
            region.source_rect.w,
            region.source_rect.h,
            if region.rotated { " rotated" } else { "" }
        );

        let regions = &mut self.atlas.regions;
        match self.settings.duplicates {
            DuplicatePolicy::Reject => {
                let name = region.name.clone();
                regions
                    .try_insert(name.clone(), region)
                    .map_err(|_| AtlasError::DuplicateRegionName(name))
            }
            DuplicatePolicy::Overwrite => {
                if regions.contains_key(&region.name) {
                    warn!(
                        "region `{}` is defined twice in `{}`, the last one wins",
                        region.name, self.atlas.image_name
                    );
                }
                Ok(regions.insert(region.name.clone(), region))
            }
        }
    }

    pub fn build(self) -> Atlas<I> {
        self.atlas
    }
}

#[cfg(test)]
mod tests {
    use nalgebra::{vector, Vector2};
    use texatlas_geometry::PixelRect;

    use super::*;

    fn builder(settings: ReaderSettings) -> AtlasBuilder<Vector2<u32>> {
        AtlasBuilder::new("page.png", Arc::new(vector![64, 64]), settings)
    }

    fn atlas() -> Atlas<Vector2<u32>> {
        let mut builder = builder(ReaderSettings::default());
        builder
            .create_region(RegionDesc::new("a", PixelRect::new(0, 0, 16, 16)))
            .unwrap();
        builder
            .create_region(RegionDesc::new("b", PixelRect::new(16, 0, 16, 32)).rotated(true))
            .unwrap();
        builder.build()
    }

    #[test]
    fn test_lookup_by_name_and_index() {
        let atlas = atlas();

        assert_eq!(atlas.region_count(), 2);
        assert_eq!(atlas.region("b").unwrap().size(), vector![32, 16]);
        assert_eq!(atlas.region_at(0).unwrap().name, "a");
        assert_eq!(atlas.get_index("b"), Some(1));
        assert_eq!(
            atlas.regions().map(|r| r.name.as_str()).collect::<Vec<_>>(),
            vec!["a", "b"]
        );
    }

    #[test]
    fn test_failed_lookups_leave_table_intact() {
        let atlas = atlas();

        assert!(matches!(atlas.region("c"), Err(AtlasError::RegionNotFound(name)) if name == "c"));
        assert!(matches!(
            atlas.region_at(2),
            Err(AtlasError::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert_eq!(atlas.region_count(), 2);
        assert_eq!(atlas.region_at(1).unwrap().name, "b");
    }

    #[test]
    fn test_duplicates_rejected_by_default() {
        let mut builder = builder(ReaderSettings::default());
        builder
            .create_region(RegionDesc::new("a", PixelRect::new(0, 0, 8, 8)))
            .unwrap();
        let result = builder.create_region(RegionDesc::new("a", PixelRect::new(8, 0, 8, 8)));

        assert!(matches!(result, Err(AtlasError::DuplicateRegionName(name)) if name == "a"));
        assert_eq!(builder.region_count(), 1);
    }

    #[test]
    fn test_duplicates_overwrite_keeps_index() {
        let mut builder = builder(ReaderSettings {
            duplicates: DuplicatePolicy::Overwrite,
            ..Default::default()
        });
        builder
            .create_region(RegionDesc::new("a", PixelRect::new(0, 0, 8, 8)))
            .unwrap();
        builder
            .create_region(RegionDesc::new("b", PixelRect::new(0, 8, 8, 8)))
            .unwrap();
        let index = builder
            .create_region(RegionDesc::new("a", PixelRect::new(8, 0, 8, 8)))
            .unwrap();

        let atlas = builder.build();
        assert_eq!(index, 0);
        assert_eq!(atlas.region_count(), 2);
        assert_eq!(atlas.region("a").unwrap().source_rect.x, 8);
    }

    #[test]
    fn test_bounds_check() {
        let desc = RegionDesc::new("big", PixelRect::new(60, 0, 8, 8));

        assert!(matches!(
            builder(ReaderSettings::default()).create_region(desc.clone()),
            Err(AtlasError::InvalidRegion { .. })
        ));

        let mut unchecked = builder(ReaderSettings {
            check_bounds: false,
            ..Default::default()
        });
        assert_eq!(unchecked.create_region(desc).unwrap(), 0);
    }
}
