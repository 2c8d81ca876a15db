//! Farbfeld decoder.
//!
//! Header parsing forked from zune-farbfeld 0.5.2 by Caleb Etemesi (MIT/Apache-2.0/Zlib).

use alloc::vec::Vec;
use enough::Stop;

use crate::error::ImageError;

/// Parse farbfeld header, returning (width, height).
pub(crate) fn parse_header(data: &[u8]) -> Result<(u32, u32), ImageError> {
    if data.len() < 16 {
        return Err(ImageError::UnexpectedEof);
    }
    if &data[0..8] != b"farbfeld" {
        return Err(ImageError::UnrecognizedFormat);
    }
    let width = u32::from_be_bytes([data[8], data[9], data[10], data[11]]);
    let height = u32::from_be_bytes([data[12], data[13], data[14], data[15]]);

    if width == 0 {
        return Err(ImageError::InvalidHeader("farbfeld width is zero".into()));
    }
    if height == 0 {
        return Err(ImageError::InvalidHeader("farbfeld height is zero".into()));
    }
    Ok((width, height))
}

/// Copy `size` bytes of pixel data following the header.
pub(crate) fn decode_pixels(
    data: &[u8],
    size: usize,
    row_size: usize,
    stop: &dyn Stop,
) -> Result<Vec<u8>, ImageError> {
    let end = size.checked_add(16).ok_or(ImageError::UnexpectedEof)?;
    let pixel_data = data.get(16..end).ok_or(ImageError::UnexpectedEof)?;

    let mut out = Vec::with_capacity(size);
    for (row_idx, row) in pixel_data.chunks(row_size.max(1)).enumerate() {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        out.extend_from_slice(row);
    }
    Ok(out)
}
