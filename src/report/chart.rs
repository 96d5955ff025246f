use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::Write;

use super::RenderError;

/// A decoded chart ready for embedding: 8-bit RGB samples, zlib-compressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl ChartImage {
    /// Height in the same unit as `width_units`, keeping the aspect ratio
    pub fn scaled_height(&self, width_units: f32) -> f32 {
        width_units * self.height as f32 / self.width as f32
    }
}

/// Decode a PNG or JPEG chart. The raw pixel buffer only lives for this call.
pub fn decode_chart(bytes: &[u8]) -> Result<ChartImage, RenderError> {
    let decoded = image::load_from_memory(bytes).map_err(RenderError::ImageDecode)?;
    let rgb = decoded.to_rgb8();
    let (width, height) = rgb.dimensions();

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(rgb.as_raw())?;
    let data = encoder.finish()?;

    Ok(ChartImage {
        width,
        height,
        data,
    })
}

#[cfg(test)]
pub(crate) fn sample_png(width: u32, height: u32) -> Vec<u8> {
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x * 40) as u8, (y * 40) as u8, 128])
    });
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png).unwrap();
    buf.into_inner()
}
