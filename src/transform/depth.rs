//! Bit-depth conversion.

use alloc::vec::Vec;

use log::debug;

use crate::error::ImageError;
use crate::image::ImageBuffer;

/// Sample width in bytes for depths this module can rescale.
fn sample_bytes(depth: u8) -> Option<usize> {
    match depth {
        8 => Some(1),
        16 => Some(2),
        32 => Some(4),
        _ => None,
    }
}

fn read_be(bytes: &[u8]) -> u32 {
    bytes.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
}

fn write_be(value: u32, out: &mut Vec<u8>, width: usize) {
    out.extend_from_slice(&value.to_be_bytes()[4 - width..]);
}

/// Linear rescale between full ranges, rounding to nearest.
fn rescale(value: u32, from_bits: u32, to_bits: u32) -> u32 {
    if from_bits == to_bits {
        return value;
    }
    let max_from = (1u64 << from_bits) - 1;
    let max_to = (1u64 << to_bits) - 1;
    ((u64::from(value) * max_to + max_from / 2) / max_from) as u32
}

impl ImageBuffer {
    /// Convert every sample to `depth` bits by linear rescale of its range.
    ///
    /// Widening replicates (8 → 16 maps `v` to `v * 257`); narrowing rounds
    /// to nearest. Only 8, 16 and 32 bit samples are supported, on both
    /// sides; other depths fail with [`ImageError::UnsupportedDepth`] and
    /// leave the image unchanged.
    pub fn set_depth(&mut self, depth: u8) -> Result<(), ImageError> {
        let geometry = self.geometry();
        if !geometry.is_valid() {
            return Err(geometry.invalid_error());
        }
        let unsupported = ImageError::UnsupportedDepth {
            from: geometry.depth,
            to: depth,
        };
        let (Some(from_w), Some(to_w)) = (sample_bytes(geometry.depth), sample_bytes(depth)) else {
            return Err(unsupported);
        };
        if depth == geometry.depth {
            return Ok(());
        }
        let next = geometry.with_depth(depth);
        if !next.is_valid() {
            return Err(next.invalid_error());
        }

        let Some(src) = self.data() else {
            self.install(next, None);
            return Ok(());
        };

        let mut out = Vec::with_capacity(next.size());
        for sample in src.chunks_exact(from_w) {
            let v = rescale(read_be(sample), u32::from(geometry.depth), u32::from(depth));
            write_be(v, &mut out, to_w);
        }

        debug!("set_depth: {} -> {} bits", geometry.depth, depth);
        self.install(next, Some(out));
        Ok(())
    }

    /// Narrow 16-bit samples to 8 bits by keeping the high byte.
    ///
    /// Fails with [`ImageError::UnsupportedDepth`] unless the depth is 16.
    ///
    /// ```
    /// use zenraster::ImageBuffer;
    ///
    /// let mut img = ImageBuffer::new()
    ///     .with_geometry(1, 1, 1, 16)
    ///     .with_data(&[0x12, 0x34])?;
    /// img.strip_16_to_8()?;
    /// assert_eq!(img.depth(), 8);
    /// assert_eq!(img.data(), Some(&[0x12][..]));
    /// # Ok::<(), zenraster::ImageError>(())
    /// ```
    pub fn strip_16_to_8(&mut self) -> Result<(), ImageError> {
        let geometry = self.geometry();
        if !geometry.is_valid() {
            return Err(geometry.invalid_error());
        }
        if geometry.depth != 16 {
            return Err(ImageError::UnsupportedDepth {
                from: geometry.depth,
                to: 8,
            });
        }
        let next = geometry.with_depth(8);
        let data = self
            .data()
            .map(|src| src.chunks_exact(2).map(|s| s[0]).collect::<Vec<u8>>());
        self.install(next, data);
        Ok(())
    }
}
