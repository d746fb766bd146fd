use std::io::Write;

use log::debug;
use texatlas_geometry::PixelRect;

use crate::{
    atlas::Atlas,
    error::{AtlasError, Result},
    region::Region,
    settings::{ByteOrder, ReaderSettings},
};

/// Writes binary atlas records, the counterpart of `AtlasReader`.
pub struct AtlasWriter<W> {
    inner: W,
    byte_order: ByteOrder,
}

impl<W: Write> AtlasWriter<W> {
    pub fn new(inner: W, byte_order: ByteOrder) -> Self {
        Self { inner, byte_order }
    }

    pub fn into_inner(self) -> W {
        self.inner
    }

    pub fn write_i32(&mut self, value: i32) -> Result<()> {
        let bytes = match self.byte_order {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        };
        Ok(self.inner.write_all(&bytes)?)
    }

    pub fn write_f64(&mut self, value: f64) -> Result<()> {
        let bytes = match self.byte_order {
            ByteOrder::Little => value.to_le_bytes(),
            ByteOrder::Big => value.to_be_bytes(),
        };
        Ok(self.inner.write_all(&bytes)?)
    }

    pub fn write_bool(&mut self, value: bool) -> Result<()> {
        Ok(self.inner.write_all(&[value as u8])?)
    }

    pub fn write_string(&mut self, value: &str) -> Result<()> {
        let mut length = value.len();
        while length >= 0x80 {
            self.inner.write_all(&[(length as u8 & 0x7f) | 0x80])?;
            length >>= 7;
        }
        self.inner.write_all(&[length as u8])?;

        Ok(self.inner.write_all(value.as_bytes())?)
    }

    fn write_rect(&mut self, rect: &PixelRect) -> Result<()> {
        self.write_i32(rect.x)?;
        self.write_i32(rect.y)?;
        self.write_i32(rect.w)?;
        self.write_i32(rect.h)
    }

    /// Writes a region record. The trim block is only emitted for
    /// trimmed regions, untrimmed ones are derived again on read.
    pub fn write_region(&mut self, region: &Region) -> Result<()> {
        self.write_rect(&region.source_rect)?;
        self.write_string(&region.name)?;
        self.write_i32(region.rotated as i32)?;

        let trimmed = region.is_trimmed();
        self.write_bool(trimmed)?;
        if trimmed {
            self.write_i32(region.original_size.x)?;
            self.write_i32(region.original_size.y)?;
            self.write_i32(region.offset.x)?;
            self.write_i32(region.offset.y)?;
        }

        self.write_bool(region.pivot.is_some())?;
        if let Some(pivot) = region.pivot {
            self.write_f64(pivot.x as f64)?;
            self.write_f64(pivot.y as f64)?;
        }

        Ok(())
    }

    pub fn write_atlas<I>(&mut self, atlas: &Atlas<I>) -> Result<()> {
        self.write_string(atlas.image_name())?;
        self.write_i32(encode_count(atlas.region_count())?)?;
        for region in atlas.regions() {
            self.write_region(region)?;
        }

        debug!(
            "wrote binary atlas `{}` with {} regions",
            atlas.image_name(),
            atlas.region_count()
        );
        Ok(())
    }
}

fn encode_count(count: usize) -> Result<i32> {
    i32::try_from(count).map_err(|_| AtlasError::MalformedStream {
        field: "region count".to_owned(),
        reason: format!("{count} regions don't fit into a 32-bit count"),
    })
}

/// Writes one atlas record to a stream.
pub fn write_atlas<W: Write, I>(
    writer: W,
    atlas: &Atlas<I>,
    settings: &ReaderSettings,
) -> Result<()> {
    AtlasWriter::new(writer, settings.byte_order).write_atlas(atlas)
}
