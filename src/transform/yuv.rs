//! Planar YUV 4:2:0 to packed RGB.

use alloc::vec::Vec;

use log::debug;

use crate::error::ImageError;
use crate::geometry::Geometry;
use crate::image::ImageBuffer;

// BT.601 full-range coefficients in 16.16 fixed point.
const CR_R: i32 = 91_881; // 1.402
const CB_G: i32 = 22_554; // 0.344136
const CR_G: i32 = 46_802; // 0.714136
const CB_B: i32 = 116_130; // 1.772
const HALF: i32 = 1 << 15;

#[inline]
fn clamp_u8(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

/// Convert one sample with `U`/`V` centred at 128.
#[inline]
pub(crate) fn yuv_to_rgb(y: u8, u: u8, v: u8) -> [u8; 3] {
    let y = i32::from(y);
    let u = i32::from(u) - 128;
    let v = i32::from(v) - 128;
    [
        clamp_u8(y + ((CR_R * v + HALF) >> 16)),
        clamp_u8(y + ((HALF - CB_G * u - CR_G * v) >> 16)),
        clamp_u8(y + ((CB_B * u + HALF) >> 16)),
    ]
}

fn check_plane(plane: &[u8], needed: usize) -> Result<(), ImageError> {
    if plane.len() < needed {
        return Err(ImageError::BufferTooSmall {
            needed,
            actual: plane.len(),
        });
    }
    Ok(())
}

impl ImageBuffer {
    /// Build an RGB24 image from tightly packed 4:2:0 planes.
    ///
    /// See [`convert_yuv420_to_rgb24`](Self::convert_yuv420_to_rgb24).
    pub fn from_yuv420(
        width: u32,
        height: u32,
        y: &[u8],
        u: &[u8],
        v: &[u8],
    ) -> Result<Self, ImageError> {
        let mut img = ImageBuffer::new();
        img.convert_yuv420_to_rgb24(width, height, y, u, v)?;
        Ok(img)
    }

    /// Replace this image with the RGB24 conversion of three 4:2:0 planes.
    ///
    /// `y` holds `width * height` luma bytes; `u` and `v` each hold one
    /// sample per 2×2 luma block (`width * height / 4` bytes). Chroma is
    /// nearest-neighbour upsampled. Both dimensions must be even.
    ///
    /// On error the image is left untouched.
    pub fn convert_yuv420_to_rgb24(
        &mut self,
        width: u32,
        height: u32,
        y: &[u8],
        u: &[u8],
        v: &[u8],
    ) -> Result<(), ImageError> {
        let next = Geometry::new(width, height, 3, 8);
        if !next.is_valid() {
            return Err(next.invalid_error());
        }
        if width % 2 != 0 || height % 2 != 0 {
            return Err(ImageError::OddDimensions { width, height });
        }

        let w = width as usize;
        let h = height as usize;
        let cw = w / 2;
        check_plane(y, w * h)?;
        check_plane(u, cw * (h / 2))?;
        check_plane(v, cw * (h / 2))?;

        let mut out = Vec::with_capacity(next.size());
        for (row, luma) in y.chunks_exact(w).take(h).enumerate() {
            let chroma = (row / 2) * cw;
            let u_row = &u[chroma..chroma + cw];
            let v_row = &v[chroma..chroma + cw];
            for (col, &l) in luma.iter().enumerate() {
                out.extend_from_slice(&yuv_to_rgb(l, u_row[col / 2], v_row[col / 2]));
            }
        }

        debug!("converted {width}x{height} yuv420 to rgb24");
        self.install(next, Some(out));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_chroma_is_gray() {
        for l in [0u8, 16, 128, 235, 255] {
            assert_eq!(yuv_to_rgb(l, 128, 128), [l, l, l]);
        }
    }

    #[test]
    fn primaries_are_close() {
        // Full-range BT.601 encodings of pure red, green and blue.
        let [r, g, b] = yuv_to_rgb(76, 85, 255);
        assert!(r >= 253 && g <= 2 && b <= 2, "{r} {g} {b}");
        let [r, g, b] = yuv_to_rgb(150, 44, 21);
        assert!(r <= 2 && g >= 253 && b <= 2, "{r} {g} {b}");
        let [r, g, b] = yuv_to_rgb(29, 255, 107);
        assert!(r <= 2 && g <= 2 && b >= 253, "{r} {g} {b}");
    }

    #[test]
    fn chroma_is_shared_per_block() {
        // 4x2: left block pulls toward red, right block toward blue.
        let y = [100u8; 8];
        let u = [128u8, 200];
        let v = [200u8, 128];
        let img = ImageBuffer::from_yuv420(4, 2, &y, &u, &v).unwrap();
        let left = yuv_to_rgb(100, 128, 200);
        let right = yuv_to_rgb(100, 200, 128);
        for row in 0..2 {
            assert_eq!(img.pixel(0, row), &left);
            assert_eq!(img.pixel(1, row), &left);
            assert_eq!(img.pixel(2, row), &right);
            assert_eq!(img.pixel(3, row), &right);
        }
        assert!(left[0] > left[2]);
        assert!(right[2] > right[0]);
    }

    #[test]
    fn short_planes_rejected() {
        let mut img = ImageBuffer::new();
        assert!(matches!(
            img.convert_yuv420_to_rgb24(2, 2, &[0; 4], &[], &[0]),
            Err(ImageError::BufferTooSmall {
                needed: 1,
                actual: 0
            })
        ));
        assert!(!img.is_loaded());
    }
}
