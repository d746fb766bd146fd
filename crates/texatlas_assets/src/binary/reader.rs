use std::io::{ErrorKind, Read};

use log::debug;
use nalgebra::vector;
use texatlas_geometry::PixelRect;

use crate::{
    atlas::{Atlas, AtlasBuilder},
    error::{AtlasError, Result},
    image::ImageResolver,
    region::RegionDesc,
    settings::{ByteOrder, ReaderSettings},
};

/// Upper bound of regions to preallocate, so a corrupted count
/// can't request an enormous allocation before the stream runs out.
const MAX_PREALLOCATED_REGIONS: usize = 4096;

/// Reads primitive values of a binary atlas stream.
///
/// Keeps track of the region being read, so that errors can
/// point to the exact field which couldn't be read.
pub struct AtlasReader<R> {
    inner: R,
    byte_order: ByteOrder,
    region: Option<usize>,
}

impl<R: Read> AtlasReader<R> {
    pub fn new(inner: R, byte_order: ByteOrder) -> Self {
        Self {
            inner,
            byte_order,
            region: None,
        }
    }

    fn malformed(&self, field: &str, reason: impl Into<String>) -> AtlasError {
        let field = match self.region {
            Some(index) => format!("region #{index} {field}"),
            None => field.to_owned(),
        };

        AtlasError::MalformedStream {
            field,
            reason: reason.into(),
        }
    }

    fn read_bytes<const N: usize>(&mut self, field: &str) -> Result<[u8; N]> {
        let mut bytes = [0u8; N];
        self.inner.read_exact(&mut bytes).map_err(|e| {
            let reason = match e.kind() {
                ErrorKind::UnexpectedEof => "unexpected end of stream".to_owned(),
                _ => e.to_string(),
            };
            self.malformed(field, reason)
        })?;
        Ok(bytes)
    }

    pub fn read_i32(&mut self, field: &str) -> Result<i32> {
        let bytes = self.read_bytes(field)?;
        Ok(match self.byte_order {
            ByteOrder::Little => i32::from_le_bytes(bytes),
            ByteOrder::Big => i32::from_be_bytes(bytes),
        })
    }

    pub fn read_f64(&mut self, field: &str) -> Result<f64> {
        let bytes = self.read_bytes(field)?;
        Ok(match self.byte_order {
            ByteOrder::Little => f64::from_le_bytes(bytes),
            ByteOrder::Big => f64::from_be_bytes(bytes),
        })
    }

    pub fn read_bool(&mut self, field: &str) -> Result<bool> {
        let [byte] = self.read_bytes(field)?;
        Ok(byte != 0)
    }

    /// Reads a 7-bit encoded length, low groups first.
    fn read_length(&mut self, field: &str) -> Result<usize> {
        let mut length = 0u32;
        for shift in (0..35).step_by(7) {
            let [byte] = self.read_bytes(field)?;
            length |= ((byte & 0x7f) as u32) << shift;
            if byte & 0x80 == 0 {
                return Ok(length as usize);
            }
        }

        Err(self.malformed(field, "string length is longer than 5 bytes"))
    }

    pub fn read_string(&mut self, field: &str) -> Result<String> {
        let length = self.read_length(field)?;

        let mut bytes = Vec::with_capacity(length.min(1024));
        let read = (&mut self.inner)
            .take(length as u64)
            .read_to_end(&mut bytes);
        read.map_err(|e| self.malformed(field, e.to_string()))?;
        if bytes.len() != length {
            return Err(self.malformed(
                field,
                format!("expected {length} bytes of string, got {}", bytes.len()),
            ));
        }

        String::from_utf8(bytes).map_err(|e| self.malformed(field, e.to_string()))
    }

    fn read_rect(&mut self) -> Result<PixelRect> {
        Ok(PixelRect::new(
            self.read_i32("x")?,
            self.read_i32("y")?,
            self.read_i32("width")?,
            self.read_i32("height")?,
        ))
    }

    /// Reads a single region record.
    pub fn read_region(&mut self) -> Result<RegionDesc> {
        let source_rect = self.read_rect()?;
        let name = self.read_string("name")?;
        let rotated = self.read_i32("rotated")? != 0;
        let mut desc = RegionDesc::new(name, source_rect).rotated(rotated);

        if self.read_bool("has trim")? {
            let original_size = vector![
                self.read_i32("original width")?,
                self.read_i32("original height")?
            ];
            let offset = vector![self.read_i32("offset x")?, self.read_i32("offset y")?];
            desc = desc.trim(original_size, offset);
        }

        if self.read_bool("has pivot")? {
            let x = self.read_f64("pivot x")? as f32;
            let y = self.read_f64("pivot y")? as f32;
            desc = desc.pivot(x, y);
        }

        Ok(desc)
    }

    /// Reads a whole atlas record, resolving its backing image.
    pub fn read_atlas<Res: ImageResolver>(
        &mut self,
        resolver: &mut Res,
        settings: &ReaderSettings,
    ) -> Result<Atlas<Res::Image>> {
        self.region = None;

        let image_name = self.read_string("image name")?;
        let image = resolver
            .load_image(&image_name)
            .map_err(|source| AtlasError::AssetResolution {
                name: image_name.clone(),
                source,
            })?;

        let count = self.read_i32("region count")?;
        let count = usize::try_from(count)
            .map_err(|_| self.malformed("region count", format!("negative count {count}")))?;

        let mut builder = AtlasBuilder::new(image_name, image, *settings);
        builder.reserve(count.min(MAX_PREALLOCATED_REGIONS));

        for index in 0..count {
            self.region = Some(index);
            let desc = self.read_region()?;
            builder.create_region(desc)?;
        }
        self.region = None;

        let atlas = builder.build();
        debug!(
            "read binary atlas `{}` with {} regions",
            atlas.image_name(),
            atlas.region_count()
        );

        Ok(atlas)
    }
}

/// Reads one atlas record from a stream.
pub fn read_atlas<R: Read, Res: ImageResolver>(
    reader: R,
    resolver: &mut Res,
    settings: &ReaderSettings,
) -> Result<Atlas<Res::Image>> {
    AtlasReader::new(reader, settings.byte_order).read_atlas(resolver, settings)
}

#[cfg(test)]
mod tests {
    use nalgebra::{vector, Vector2};

    use super::*;
    use crate::image::MemoryResolver;

    /// Builds binary records by hand, independently of the writer.
    #[derive(Default)]
    struct Record(Vec<u8>);

    impl Record {
        fn i32(mut self, value: i32) -> Self {
            self.0.extend(value.to_le_bytes());
            self
        }

        fn f64(mut self, value: f64) -> Self {
            self.0.extend(value.to_le_bytes());
            self
        }

        fn bool(mut self, value: bool) -> Self {
            self.0.push(value as u8);
            self
        }

        fn string(mut self, value: &str) -> Self {
            assert!(value.len() < 0x80);
            self.0.push(value.len() as u8);
            self.0.extend(value.as_bytes());
            self
        }

        fn rect(self, x: i32, y: i32, w: i32, h: i32) -> Self {
            self.i32(x).i32(y).i32(w).i32(h)
        }
    }

    fn resolver() -> MemoryResolver<Vector2<u32>> {
        MemoryResolver::default().with("page.png", vector![128, 128])
    }

    fn read(bytes: &[u8]) -> Result<Atlas<Vector2<u32>>> {
        read_atlas(bytes, &mut resolver(), &ReaderSettings::default())
    }

    #[test]
    fn test_rotated_region_without_trim_or_pivot() {
        let record = Record::default()
            .string("page.png")
            .i32(1)
            .rect(0, 0, 10, 20)
            .string("hero")
            .i32(1)
            .bool(false)
            .bool(false);

        let atlas = read(&record.0).unwrap();
        let region = atlas.region("hero").unwrap();

        assert!(region.rotated);
        assert_eq!(region.original_size, vector![20, 10]);
        assert_eq!(region.offset, vector![0, 0]);
        assert_eq!(region.pivot, None);
    }

    #[test]
    fn test_trim_and_pivot() {
        let record = Record::default()
            .string("page.png")
            .i32(2)
            .rect(2, 2, 30, 28)
            .string("a")
            .i32(0)
            .bool(true)
            .rect(32, 32, 1, 4)
            .bool(true)
            .f64(0.25)
            .f64(1.0)
            .rect(40, 0, 8, 8)
            .string("b")
            .i32(0)
            .bool(false)
            .bool(false);

        let atlas = read(&record.0).unwrap();
        let a = atlas.region_at(0).unwrap();

        assert_eq!(a.name, "a");
        assert_eq!(a.source_rect, PixelRect::new(2, 2, 30, 28));
        assert_eq!(a.original_size, vector![32, 32]);
        assert_eq!(a.offset, vector![1, 4]);
        assert_eq!(a.pivot, Some(vector![0.25, 1.0]));
        assert_eq!(atlas.region_at(1).unwrap().name, "b");
    }

    #[test]
    fn test_truncated_stream() {
        let record = Record::default()
            .string("page.png")
            .i32(1)
            .rect(0, 0, 10, 20)
            .string("hero")
            .i32(0)
            .bool(true)
            .i32(10);

        let error = read(&record.0).unwrap_err();
        match error {
            AtlasError::MalformedStream { field, .. } => {
                assert_eq!(field, "region #0 original height")
            }
            e => panic!("unexpected error {e}"),
        }
    }

    #[test]
    fn test_negative_region_count() {
        let record = Record::default().string("page.png").i32(-1);

        assert!(matches!(
            read(&record.0),
            Err(AtlasError::MalformedStream { .. })
        ));
    }

    #[test]
    fn test_unresolved_image() {
        let record = Record::default().string("missing.png").i32(0);

        assert!(matches!(
            read(&record.0),
            Err(AtlasError::AssetResolution { name, .. }) if name == "missing.png"
        ));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let region = |r: Record| {
            r.rect(0, 0, 4, 4)
                .string("dup")
                .i32(0)
                .bool(false)
                .bool(false)
        };
        let record = region(region(Record::default().string("page.png").i32(2)));

        assert!(matches!(
            read(&record.0),
            Err(AtlasError::DuplicateRegionName(name)) if name == "dup"
        ));
    }

    #[test]
    fn test_multi_byte_string_length() {
        let name = "x".repeat(200);
        let mut bytes = vec![0xc8, 0x01];
        bytes.extend(name.as_bytes());

        let mut reader = AtlasReader::new(&bytes[..], ByteOrder::Little);
        assert_eq!(reader.read_string("name").unwrap(), name);
    }

    #[test]
    fn test_overlong_string_length() {
        let bytes = [0xff; 6];
        let mut reader = AtlasReader::new(&bytes[..], ByteOrder::Little);

        assert!(matches!(
            reader.read_string("name"),
            Err(AtlasError::MalformedStream { .. })
        ));
    }

    #[test]
    fn test_big_endian() {
        let mut reader = AtlasReader::new(&[0, 0, 1, 2][..], ByteOrder::Big);
        assert_eq!(reader.read_i32("value").unwrap(), 258);
    }
}
