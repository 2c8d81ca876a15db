//! Pixel buffer ownership and geometry bookkeeping.

use alloc::vec;
use alloc::vec::Vec;
use core::ops::{Index, IndexMut};

use log::{debug, trace};

use crate::error::ImageError;
use crate::geometry::Geometry;
use crate::pixel::ImageType;

/// Packed raster image: a geometry plus an exclusively owned byte buffer.
///
/// The buffer, when present, is always exactly [`size()`](Self::size) bytes
/// for the current geometry. It may be absent while the geometry is valid
/// ("sized but not loaded"); check [`is_loaded()`](Self::is_loaded) before
/// using the raw accessors.
///
/// Pixels are row-major with no padding. Samples wider than 8 bits are
/// stored most-significant byte first. Sub-byte samples are packed
/// most-significant bit first within each pixel.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImageBuffer {
    geometry: Geometry,
    planes: u8,
    data: Option<Vec<u8>>,
}

impl ImageBuffer {
    /// Create an empty image with zero geometry and no buffer.
    pub const fn new() -> Self {
        Self {
            geometry: Geometry::EMPTY,
            planes: 0,
            data: None,
        }
    }

    /// Set geometry, consuming and returning `self`.
    ///
    /// Invalid geometry leaves the image empty; check
    /// [`has_valid_geometry()`](Self::has_valid_geometry).
    pub fn with_geometry(mut self, width: u32, height: u32, channels: u8, depth: u8) -> Self {
        self.set_geometry(width, height, channels, depth);
        self
    }

    /// Set geometry from a well-known [`ImageType`].
    pub fn with_type(self, width: u32, height: u32, ty: ImageType) -> Self {
        let f = ty.format();
        self.with_geometry(width, height, f.channels, f.depth)
    }

    /// Copy pixel data in, consuming and returning `self`.
    pub fn with_data(mut self, data: &[u8]) -> Result<Self, ImageError> {
        self.copy_in(data)?;
        Ok(self)
    }

    /// Adopt an owned buffer, consuming and returning `self`.
    pub fn with_owned_data(mut self, data: Vec<u8>) -> Result<Self, ImageError> {
        self.take_ownership(data)?;
        Ok(self)
    }

    /// Set the logical layout of the image without allocating.
    ///
    /// Invalid geometry empties the image and releases the buffer. A valid
    /// geometry whose byte size differs from the current buffer releases the
    /// buffer, so stale memory is never reused under a new layout. A valid
    /// geometry with an unchanged size keeps the buffer and its contents.
    ///
    /// Returns whether the geometry was accepted.
    pub fn set_geometry(&mut self, width: u32, height: u32, channels: u8, depth: u8) -> bool {
        let next = Geometry::new(width, height, channels, depth);
        if !next.is_valid() {
            if self.data.is_some() {
                debug!("releasing buffer: invalid geometry {width}x{height} c{channels} d{depth}");
            }
            self.clear();
            return false;
        }
        if let Some(buf) = &self.data {
            if buf.len() != next.size() {
                debug!(
                    "releasing {} byte buffer: geometry now needs {} bytes",
                    buf.len(),
                    next.size()
                );
                self.data = None;
            }
        }
        self.geometry = next;
        self.planes = 1;
        true
    }

    /// Set geometry from a well-known [`ImageType`], keeping width and height.
    pub fn set_type(&mut self, ty: ImageType) -> bool {
        let f = ty.format();
        self.set_geometry(self.geometry.width, self.geometry.height, f.channels, f.depth)
    }

    /// Change the width, keeping the rest of the geometry.
    pub fn set_width(&mut self, width: u32) -> bool {
        let g = self.geometry;
        self.set_geometry(width, g.height, g.channels, g.depth)
    }

    /// Change the height, keeping the rest of the geometry.
    pub fn set_height(&mut self, height: u32) -> bool {
        let g = self.geometry;
        self.set_geometry(g.width, height, g.channels, g.depth)
    }

    /// Allocate a fresh buffer for the current geometry, releasing any old one.
    ///
    /// Fails with [`ImageError::InvalidGeometry`] and leaves the image as-is
    /// when the geometry is invalid.
    pub fn allocate(&mut self) -> Result<(), ImageError> {
        let size = self.checked_size()?;
        self.data = None;
        self.data = Some(vec![0; size]);
        trace!("allocated {size} bytes");
        Ok(())
    }

    /// Fill the buffer with zeroes, allocating it if needed.
    pub fn zero(&mut self) -> Result<(), ImageError> {
        self.checked_size()?;
        if let Some(buf) = self.data.as_mut() {
            buf.fill(0);
            return Ok(());
        }
        self.allocate()
    }

    /// Copy exactly [`size()`](Self::size) bytes from `src`, allocating the
    /// buffer if needed. `src` is not retained.
    pub fn copy_in(&mut self, src: &[u8]) -> Result<(), ImageError> {
        let size = self.checked_size()?;
        let src = src.get(..size).ok_or(ImageError::BufferTooSmall {
            needed: size,
            actual: src.len(),
        })?;
        if let Some(buf) = self.data.as_mut() {
            buf.copy_from_slice(src);
        } else {
            self.data = Some(src.to_vec());
        }
        Ok(())
    }

    /// Adopt `data` as the pixel buffer without copying.
    ///
    /// The existing buffer is released first. `data` must be exactly
    /// [`size()`](Self::size) bytes long.
    pub fn take_ownership(&mut self, data: Vec<u8>) -> Result<(), ImageError> {
        let size = self.checked_size()?;
        if data.len() != size {
            return Err(ImageError::BufferSizeMismatch {
                expected: size,
                actual: data.len(),
            });
        }
        self.data = None;
        self.data = Some(data);
        Ok(())
    }

    /// Release the buffer and reset geometry to empty.
    pub fn clear(&mut self) {
        self.geometry = Geometry::EMPTY;
        self.planes = 0;
        self.data = None;
    }

    /// Remove and return the buffer, keeping the geometry.
    pub fn take_data(&mut self) -> Option<Vec<u8>> {
        self.data.take()
    }

    /// Consume the image, returning its buffer.
    pub fn into_data(self) -> Option<Vec<u8>> {
        self.data
    }

    /// Move `other`'s geometry and buffer into `self`, leaving `other` empty.
    pub fn transfer_from(&mut self, other: &mut ImageBuffer) {
        *self = core::mem::take(other);
    }

    /// Whether the geometry is valid and a buffer is present.
    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.geometry.is_valid() && self.data.is_some()
    }

    #[inline]
    pub fn has_valid_geometry(&self) -> bool {
        self.geometry.is_valid()
    }

    #[inline]
    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.geometry.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.geometry.height
    }

    #[inline]
    pub fn channels(&self) -> u8 {
        self.geometry.channels
    }

    #[inline]
    pub fn depth(&self) -> u8 {
        self.geometry.depth
    }

    /// Plane count: 1 for any valid geometry, 0 when empty.
    #[inline]
    pub fn planes(&self) -> u8 {
        self.planes
    }

    #[inline]
    pub fn pixel_count(&self) -> u64 {
        self.geometry.pixel_count()
    }

    /// Bytes per pixel.
    #[inline]
    pub fn pixel_size(&self) -> usize {
        self.geometry.pixel_size()
    }

    /// Bytes per row.
    #[inline]
    pub fn row_size(&self) -> usize {
        self.geometry.row_size().unwrap_or(0)
    }

    /// Logical size in bytes. Does not imply the buffer is allocated.
    #[inline]
    pub fn size(&self) -> usize {
        self.geometry.size()
    }

    /// Allocated size in bytes (0 when not loaded).
    #[inline]
    pub fn real_size(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }

    /// The well-known type matching this geometry, if any.
    pub fn image_type(&self) -> Option<ImageType> {
        ImageType::from_layout(self.geometry.channels, self.geometry.depth)
    }

    #[inline]
    pub fn is_rgb24(&self) -> bool {
        self.channels() == 3 && self.depth() == 8
    }

    #[inline]
    pub fn is_rgb48(&self) -> bool {
        self.channels() == 3 && self.depth() == 16
    }

    #[inline]
    pub fn is_rgba32(&self) -> bool {
        self.channels() == 4 && self.depth() == 8
    }

    #[inline]
    pub fn is_rgba64(&self) -> bool {
        self.channels() == 4 && self.depth() == 16
    }

    /// The pixel buffer, if loaded.
    #[inline]
    pub fn data(&self) -> Option<&[u8]> {
        self.data.as_deref()
    }

    /// The pixel buffer, if loaded.
    #[inline]
    pub fn data_mut(&mut self) -> Option<&mut [u8]> {
        self.data.as_deref_mut()
    }

    /// Bytes of pixel `i` in row-major order.
    ///
    /// # Panics
    ///
    /// Panics if the image is not loaded or `i` is out of range.
    #[inline]
    pub fn pixel_at(&self, i: usize) -> &[u8] {
        let ps = self.pixel_size();
        &self.bytes()[i * ps..(i + 1) * ps]
    }

    /// Bytes of pixel `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the image is not loaded or the coordinates are out of range.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> &[u8] {
        self.pixel_at(y as usize * self.geometry.width as usize + x as usize)
    }

    /// Mutable bytes of pixel `(x, y)`.
    ///
    /// # Panics
    ///
    /// Panics if the image is not loaded or the coordinates are out of range.
    #[inline]
    pub fn pixel_mut(&mut self, x: u32, y: u32) -> &mut [u8] {
        let ps = self.pixel_size();
        let i = y as usize * self.geometry.width as usize + x as usize;
        &mut self.bytes_mut()[i * ps..(i + 1) * ps]
    }

    /// Iterate rows of the loaded buffer.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        let row = self.row_size().max(1);
        self.data.as_deref().unwrap_or(&[]).chunks_exact(row)
    }

    #[inline]
    fn bytes(&self) -> &[u8] {
        self.data.as_deref().unwrap_or(&[])
    }

    #[inline]
    fn bytes_mut(&mut self) -> &mut [u8] {
        self.data.as_deref_mut().unwrap_or(&mut [])
    }

    /// Size of the current geometry, or an error if it is invalid.
    fn checked_size(&self) -> Result<usize, ImageError> {
        if !self.geometry.is_valid() {
            return Err(self.geometry.invalid_error());
        }
        Ok(self.geometry.size())
    }

    /// Replace geometry and buffer together. `geometry` must be valid and
    /// `data`, if present, exactly its size.
    pub(crate) fn install(&mut self, geometry: Geometry, data: Option<Vec<u8>>) {
        debug_assert!(geometry.is_valid());
        debug_assert!(data.as_ref().is_none_or(|d| d.len() == geometry.size()));
        self.data = None;
        self.geometry = geometry;
        self.planes = 1;
        self.data = data;
    }
}

impl Index<usize> for ImageBuffer {
    type Output = u8;

    /// Byte `i` of the buffer. Panics when not loaded.
    #[inline]
    fn index(&self, i: usize) -> &u8 {
        &self.bytes()[i]
    }
}

impl IndexMut<usize> for ImageBuffer {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut u8 {
        &mut self.bytes_mut()[i]
    }
}
