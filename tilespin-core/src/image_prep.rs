use image::{DynamicImage, GenericImageView, RgbaImage};
use png::{BitDepth, ColorType, Encoder};

use crate::error::PuzzleError;

/// Centered square crop of an uploaded image, owned by the session and
/// replaced wholesale on every upload.
#[derive(Clone, Debug, PartialEq)]
pub struct SquareImage {
    raster: RgbaImage,
    // crop origin inside the uploaded image
    offset: (u32, u32),
}

impl SquareImage {
    /// Edge length in pixels.
    pub fn size(&self) -> u32 {
        self.raster.width()
    }

    pub fn offset(&self) -> (u32, u32) {
        self.offset
    }

    pub fn raster(&self) -> &RgbaImage {
        &self.raster
    }

    /// PNG bytes for the reference preview.
    pub fn to_png(&self) -> Result<Vec<u8>, PuzzleError> {
        encode_png(&self.raster)
    }
}

/// Decode an uploaded file. Anything the `image` crate cannot read is a
/// `Decode` failure for the upload path to report.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, PuzzleError> {
    image::load_from_memory(bytes).map_err(|e| PuzzleError::Decode(e.to_string()))
}

/// Crop the largest centered square out of `img`. No scaling is applied.
/// Odd size differences floor the offset on that axis.
pub fn prepare(img: &DynamicImage) -> Result<SquareImage, PuzzleError> {
    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        return Err(PuzzleError::Dimensions);
    }
    let size = w.min(h);
    let sx = (w - size) / 2;
    let sy = (h - size) / 2;
    let raster = img.crop_imm(sx, sy, size, size).to_rgba8();
    Ok(SquareImage {
        raster,
        offset: (sx, sy),
    })
}

/// Deterministic RGBA8 PNG encoding used for every displayable raster.
pub fn encode_png(raster: &RgbaImage) -> Result<Vec<u8>, PuzzleError> {
    let mut buf = Vec::new();
    let mut enc = Encoder::new(&mut buf, raster.width(), raster.height());
    enc.set_color(ColorType::Rgba);
    enc.set_depth(BitDepth::Eight);
    {
        let mut writer = enc
            .write_header()
            .map_err(|e| PuzzleError::Encode(e.to_string()))?;
        writer
            .write_image_data(raster.as_raw())
            .map_err(|e| PuzzleError::Encode(e.to_string()))?;
    }
    Ok(buf)
}

#[cfg(test)]
pub(crate) fn gradient(w: u32, h: u32) -> RgbaImage {
    // every pixel gets a distinct color so crops and rotations are observable
    RgbaImage::from_fn(w, h, |x, y| image::Rgba([x as u8, y as u8, (x ^ y) as u8, 255]))
}
