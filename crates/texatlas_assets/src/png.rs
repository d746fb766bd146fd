use anyhow::Result;
use nalgebra::vector;
use rgb::ComponentBytes;

use crate::image::DecodedImage;

/// Decodes a PNG into a tightly packed RGBA8 image.
pub fn decode_png(name: &str, png: &[u8]) -> Result<DecodedImage> {
    let image = lodepng::decode32(png)?;
    let size = vector![image.width as u32, image.height as u32];
    let pixels = image.buffer.as_bytes().to_owned();

    Ok(DecodedImage::new(name.to_owned(), size, pixels))
}
