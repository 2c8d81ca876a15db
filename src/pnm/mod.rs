//! PNM family backend: P5 (PGM), P6 (PPM), P7 (PAM).
//!
//! Samples are big-endian on the wire, which is also the buffer's byte
//! order, so maxval 255 and 65535 images move without per-sample work.
//! Text annotations travel as `# key: value` comment lines.

mod decode;
mod encode;

use alloc::vec::Vec;
use enough::Stop;
use log::debug;

use crate::backend::Backend;
use crate::decode::DecodeOutput;
use crate::error::ImageError;
use crate::image::ImageBuffer;
use crate::limits::Limits;
use crate::metadata::TextMetadata;

/// Which PNM sub-format to use.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PnmFormat {
    /// P5, binary grayscale.
    Pgm,
    /// P6, binary RGB.
    Ppm,
    /// P7, arbitrary channel count with a TUPLTYPE header.
    Pam,
}

impl PnmFormat {
    fn magic(self) -> &'static str {
        match self {
            PnmFormat::Pgm => "P5",
            PnmFormat::Ppm => "P6",
            PnmFormat::Pam => "P7",
        }
    }
}

pub(crate) fn detect(data: &[u8]) -> Option<PnmFormat> {
    match data.get(..2)? {
        b"P5" => Some(PnmFormat::Pgm),
        b"P6" => Some(PnmFormat::Ppm),
        b"P7" => Some(PnmFormat::Pam),
        _ => None,
    }
}

/// Parsed PNM header (internal).
pub(crate) struct PnmHeader {
    pub format: PnmFormat,
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub maxval: u32,
    pub data_offset: usize,
    pub text: TextMetadata,
}

impl PnmHeader {
    fn depth(&self) -> u8 {
        if self.maxval > 255 { 16 } else { 8 }
    }
}

pub(crate) fn decode(
    data: &[u8],
    format: PnmFormat,
    limits: Option<&Limits>,
    stop: &dyn Stop,
) -> Result<DecodeOutput, ImageError> {
    let header = decode::parse_header(data)?;
    if header.format != format {
        return Err(ImageError::InvalidHeader(alloc::format!(
            "expected {format:?} ({}), found {:?} ({})",
            format.magic(),
            header.format,
            header.format.magic()
        )));
    }
    debug!(
        "pnm header: {:?} {}x{} c{} maxval {}",
        header.format, header.width, header.height, header.channels, header.maxval
    );

    let mut image =
        ImageBuffer::new().with_geometry(header.width, header.height, header.channels, header.depth());
    if !image.has_valid_geometry() {
        return Err(ImageError::InvalidHeader(alloc::format!(
            "unusable geometry {}x{} with {} channels",
            header.width,
            header.height,
            header.channels
        )));
    }
    if let Some(limits) = limits {
        limits.check_geometry(&image.geometry())?;
    }
    stop.check()?;

    let size = image.size();
    let pixel_data = data
        .get(header.data_offset..)
        .and_then(|d| d.get(..size))
        .ok_or(ImageError::UnexpectedEof)?;
    let pixels = decode::decode_samples(pixel_data, &header, image.row_size(), stop)?;
    image.take_ownership(pixels)?;

    Ok(DecodeOutput {
        image,
        text: header.text,
        backend: Backend::Pnm(header.format),
    })
}

pub(crate) fn encode(
    image: &ImageBuffer,
    text: &TextMetadata,
    format: PnmFormat,
    stop: &dyn Stop,
) -> Result<Vec<u8>, ImageError> {
    encode::encode_pnm(image, text, format, stop)
}
