/// Logical layout of an image: width, height, channels per pixel and bits
/// per channel.
///
/// All sizes are derived on demand in `usize` with checked arithmetic. A
/// geometry whose byte size overflows is invalid, not wrapped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub depth: u8,
}

impl Geometry {
    /// The empty geometry (all zero).
    pub const EMPTY: Geometry = Geometry {
        width: 0,
        height: 0,
        channels: 0,
        depth: 0,
    };

    pub const fn new(width: u32, height: u32, channels: u8, depth: u8) -> Self {
        Self {
            width,
            height,
            channels,
            depth,
        }
    }

    /// Bits per pixel.
    #[inline]
    pub const fn pixel_bits(&self) -> usize {
        self.channels as usize * self.depth as usize
    }

    /// Bytes per pixel (`channels * depth / 8`).
    #[inline]
    pub const fn pixel_size(&self) -> usize {
        self.pixel_bits() / 8
    }

    /// Bytes per row, or `None` on overflow.
    #[inline]
    pub fn row_size(&self) -> Option<usize> {
        (self.width as usize).checked_mul(self.pixel_size())
    }

    /// Total bytes, or `None` on overflow.
    pub fn checked_size(&self) -> Option<usize> {
        (self.width as usize)
            .checked_mul(self.height as usize)?
            .checked_mul(self.pixel_size())
    }

    /// Total bytes; 0 when the size overflows.
    #[inline]
    pub fn size(&self) -> usize {
        self.checked_size().unwrap_or(0)
    }

    /// Number of pixels.
    #[inline]
    pub const fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Whether this geometry can describe an image.
    ///
    /// Every field must be nonzero, a pixel must be a whole number of bytes,
    /// and the byte size must be representable.
    pub fn is_valid(&self) -> bool {
        self.width != 0
            && self.height != 0
            && self.channels != 0
            && self.depth != 0
            && self.pixel_bits() % 8 == 0
            && self.checked_size().is_some_and(|s| s > 0)
    }

    pub(crate) fn with_channels(self, channels: u8) -> Self {
        Self { channels, ..self }
    }

    pub(crate) fn with_depth(self, depth: u8) -> Self {
        Self { depth, ..self }
    }

    pub(crate) fn invalid_error(&self) -> crate::ImageError {
        crate::ImageError::InvalidGeometry {
            width: self.width,
            height: self.height,
            channels: self.channels,
            depth: self.depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes() {
        let g = Geometry::new(4, 3, 3, 8);
        assert!(g.is_valid());
        assert_eq!(g.pixel_size(), 3);
        assert_eq!(g.row_size(), Some(12));
        assert_eq!(g.size(), 36);
        assert_eq!(g.pixel_count(), 12);

        let g = Geometry::new(5, 2, 2, 4);
        assert!(g.is_valid());
        assert_eq!(g.pixel_size(), 1);
        assert_eq!(g.size(), 10);
    }

    #[test]
    fn wide_pixels_do_not_wrap() {
        // 255 * 255 bits would wrap a 16-bit intermediate; it must not here.
        let g = Geometry::new(1, 1, 255, 248);
        assert!(g.is_valid());
        assert_eq!(g.pixel_size(), 255 * 248 / 8);
    }

    #[test]
    fn invalid() {
        assert!(!Geometry::EMPTY.is_valid());
        assert!(!Geometry::new(0, 1, 3, 8).is_valid());
        assert!(!Geometry::new(1, 0, 3, 8).is_valid());
        assert!(!Geometry::new(1, 1, 0, 8).is_valid());
        assert!(!Geometry::new(1, 1, 3, 0).is_valid());
        assert!(!Geometry::new(1, 1, 3, 4).is_valid());
        assert!(!Geometry::new(1, 1, 1, 12).is_valid());
    }

    #[test]
    fn overflow_is_invalid() {
        // u32::MAX^2 * 8 bytes exceeds u64.
        let g = Geometry::new(u32::MAX, u32::MAX, 4, 16);
        assert_eq!(g.checked_size(), None);
        assert!(!g.is_valid());
        assert_eq!(g.size(), 0);
    }
}
