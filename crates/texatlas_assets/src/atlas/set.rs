use std::collections::HashMap;

use log::warn;

use super::Atlas;
use crate::{
    error::{AtlasError, Result},
    image::AtlasImage,
    region::Region,
    settings::DuplicatePolicy,
    sprite::Sprite,
};

/// Atlases loaded from one multi-texture descriptor,
/// with a combined lookup over the regions of every page.
#[derive(Debug)]
pub struct AtlasSet<I> {
    pages: Vec<Atlas<I>>,
    lookup: HashMap<String, (usize, usize)>,
}

impl<I> Default for AtlasSet<I> {
    fn default() -> Self {
        Self {
            pages: Default::default(),
            lookup: Default::default(),
        }
    }
}

impl<I> AtlasSet<I> {
    pub fn push(&mut self, atlas: Atlas<I>, duplicates: DuplicatePolicy) -> Result<()> {
        let page = self.pages.len();

        for region in atlas.regions() {
            if let Some((other, _)) = self.lookup.get(&region.name) {
                match duplicates {
                    DuplicatePolicy::Reject => {
                        return Err(AtlasError::DuplicateRegionName(region.name.clone()))
                    }
                    DuplicatePolicy::Overwrite => warn!(
                        "region `{}` from `{}` shadows the one from `{}`",
                        region.name,
                        atlas.image_name(),
                        self.pages[*other].image_name()
                    ),
                }
            }
        }

        for (index, region) in atlas.regions().enumerate() {
            self.lookup.insert(region.name.clone(), (page, index));
        }

        self.pages.push(atlas);
        Ok(())
    }

    pub fn pages(&self) -> &[Atlas<I>] {
        &self.pages
    }

    /// Finds a page by the name of its backing image.
    pub fn page(&self, image_name: &str) -> Option<&Atlas<I>> {
        self.pages.iter().find(|p| p.image_name() == image_name)
    }

    pub fn region_count(&self) -> usize {
        self.lookup.len()
    }

    /// Looks a region up on all pages, returning it along with its page.
    pub fn region(&self, name: &str) -> Result<(&Atlas<I>, &Region)> {
        let &(page, index) = self
            .lookup
            .get(name)
            .ok_or_else(|| AtlasError::RegionNotFound(name.to_owned()))?;
        let atlas = &self.pages[page];

        Ok((atlas, atlas.region_at(index)?))
    }
}

impl<I: AtlasImage> AtlasSet<I> {
    pub fn create_sprite(&self, name: &str, pixels_per_unit: f32) -> Result<Sprite<I>> {
        let (atlas, region) = self.region(name)?;
        Ok(Sprite::from_region(
            atlas.image().clone(),
            region,
            pixels_per_unit,
        ))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use nalgebra::{vector, Vector2};
    use texatlas_geometry::PixelRect;

    use super::*;
    use crate::{atlas::AtlasBuilder, region::RegionDesc, settings::ReaderSettings};

    fn page(image: &str, names: &[&str]) -> Atlas<Vector2<u32>> {
        let mut builder =
            AtlasBuilder::new(image, Arc::new(vector![64, 64]), ReaderSettings::default());
        for (i, name) in names.iter().enumerate() {
            builder
                .create_region(RegionDesc::new(*name, PixelRect::new(i as i32 * 8, 0, 8, 8)))
                .unwrap();
        }
        builder.build()
    }

    #[test]
    fn test_lookup_across_pages() {
        let mut set = AtlasSet::default();
        set.push(page("a.png", &["one", "two"]), DuplicatePolicy::Reject)
            .unwrap();
        set.push(page("b.png", &["three"]), DuplicatePolicy::Reject)
            .unwrap();

        let (atlas, region) = set.region("three").unwrap();
        assert_eq!(atlas.image_name(), "b.png");
        assert_eq!(region.name, "three");
        assert_eq!(set.region_count(), 3);
        assert_eq!(set.page("a.png").unwrap().region_count(), 2);
        assert!(matches!(set.region("four"), Err(AtlasError::RegionNotFound(_))));
    }

    #[test]
    fn test_duplicate_across_pages() {
        let mut set = AtlasSet::default();
        set.push(page("a.png", &["one"]), DuplicatePolicy::Reject)
            .unwrap();

        let result = set.push(page("b.png", &["one"]), DuplicatePolicy::Reject);
        assert!(matches!(result, Err(AtlasError::DuplicateRegionName(_))));
        assert_eq!(set.pages().len(), 1);

        set.push(page("b.png", &["one"]), DuplicatePolicy::Overwrite)
            .unwrap();
        assert_eq!(set.region("one").unwrap().0.image_name(), "b.png");
    }
}
