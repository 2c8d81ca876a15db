//! Farbfeld backend.
//!
//! Farbfeld is an 8-byte magic ("farbfeld"), width and height as u32
//! big-endian, then RGBA u16 big-endian pixels. The pixel layout is exactly
//! an RGBA64 [`ImageBuffer`], so decoding is a bounds check and a copy.

pub(crate) mod decode;
mod encode;

use alloc::vec::Vec;
use enough::Stop;

use crate::backend::Backend;
use crate::decode::DecodeOutput;
use crate::error::ImageError;
use crate::image::ImageBuffer;
use crate::limits::Limits;
use crate::metadata::TextMetadata;
use crate::pixel::ImageType;

pub(crate) fn detect(data: &[u8]) -> bool {
    data.starts_with(b"farbfeld")
}

/// Decode farbfeld data to an RGBA64 image.
pub(crate) fn decode(
    data: &[u8],
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<DecodeOutput, ImageError> {
    let (width, height) = decode::parse_header(data)?;
    let mut image = ImageBuffer::new().with_type(width, height, ImageType::Rgba64);
    if !image.has_valid_geometry() {
        return Err(ImageError::InvalidHeader(alloc::format!(
            "farbfeld dimensions {width}x{height} overflow"
        )));
    }
    if let Some(limits) = limits {
        limits.check_geometry(&image.geometry())?;
    }
    stop.check()?;
    let pixels = decode::decode_pixels(data, image.size(), image.row_size(), stop)?;
    image.take_ownership(pixels)?;
    Ok(DecodeOutput {
        image,
        text: TextMetadata::new(),
        backend: Backend::Farbfeld,
    })
}

/// Encode an image as farbfeld.
pub(crate) fn encode(image: &ImageBuffer, stop: &dyn Stop) -> Result<Vec<u8>, ImageError> {
    encode::encode_farbfeld(image, stop)
}
