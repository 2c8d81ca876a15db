//! Farbfeld encoder.

use alloc::vec::Vec;
use enough::Stop;

use crate::error::ImageError;
use crate::image::ImageBuffer;

const OPAQUE: [u8; 2] = [0xff, 0xff];

/// Encode to farbfeld.
///
/// Accepts 1 to 4 channels (gray, gray+alpha, RGB, RGBA) at 8, 16 or 32
/// bits. Samples are rescaled to 16 bits first; missing alpha is opaque.
pub(crate) fn encode_farbfeld(image: &ImageBuffer, stop: &dyn Stop) -> Result<Vec<u8>, ImageError> {
    if !image.is_loaded() {
        return Err(ImageError::NotLoaded);
    }
    let channels = image.channels();
    if !(1..=4).contains(&channels) {
        return Err(ImageError::UnsupportedVariant(alloc::format!(
            "cannot encode {channels} channels as farbfeld"
        )));
    }

    let widened;
    let image = if image.depth() == 16 {
        image
    } else {
        let mut copy = image.clone();
        copy.set_depth(16)?;
        widened = copy;
        &widened
    };

    let (width, height) = (image.width(), image.height());
    let total = (image.pixel_count() as usize)
        .checked_mul(8)
        .and_then(|n| n.checked_add(16))
        .ok_or(ImageError::InvalidGeometry {
            width,
            height,
            channels,
            depth: 16,
        })?;
    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(b"farbfeld");
    out.extend_from_slice(&width.to_be_bytes());
    out.extend_from_slice(&height.to_be_bytes());

    stop.check()?;

    for (row_idx, row) in image.rows().enumerate() {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        if channels == 4 {
            out.extend_from_slice(row);
            continue;
        }
        for px in row.chunks_exact(usize::from(channels) * 2) {
            match channels {
                1 => {
                    for _ in 0..3 {
                        out.extend_from_slice(px);
                    }
                    out.extend_from_slice(&OPAQUE);
                }
                2 => {
                    for _ in 0..3 {
                        out.extend_from_slice(&px[..2]);
                    }
                    out.extend_from_slice(&px[2..]);
                }
                _ => {
                    out.extend_from_slice(px);
                    out.extend_from_slice(&OPAQUE);
                }
            }
        }
    }

    Ok(out)
}
