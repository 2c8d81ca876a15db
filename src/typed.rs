//! Typed views of 8-bit images through the `rgb` and `imgref` crates.

use rgb::AsPixels as _;

use crate::error::ImageError;
use crate::image::ImageBuffer;
use crate::pixel::ImageType;

/// Pixel types that can view an [`ImageBuffer`] without copying.
pub trait BufferPixel: Copy + 'static {
    /// Image type whose packed layout matches `Self`.
    const IMAGE_TYPE: ImageType;
}

impl BufferPixel for rgb::RGB8 {
    const IMAGE_TYPE: ImageType = ImageType::Rgb24;
}

impl BufferPixel for rgb::RGBA8 {
    const IMAGE_TYPE: ImageType = ImageType::Rgba32;
}

impl ImageBuffer {
    fn check_layout<P: BufferPixel>(&self) -> Result<(), ImageError> {
        let f = P::IMAGE_TYPE.format();
        if self.channels() != f.channels || self.depth() != f.depth {
            return Err(ImageError::LayoutMismatch {
                expected: P::IMAGE_TYPE,
                channels: self.channels(),
                depth: self.depth(),
            });
        }
        if !self.is_loaded() {
            return Err(ImageError::NotLoaded);
        }
        Ok(())
    }

    /// Reinterpret the buffer as typed pixels.
    ///
    /// Returns [`ImageError::LayoutMismatch`] if the geometry doesn't match `P`.
    pub fn as_pixels<P: BufferPixel>(&self) -> Result<&[P], ImageError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        self.check_layout::<P>()?;
        Ok(self.data().unwrap_or(&[]).as_pixels())
    }

    /// Mutable typed view of the buffer.
    pub fn as_pixels_mut<P: BufferPixel>(&mut self) -> Result<&mut [P], ImageError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        self.check_layout::<P>()?;
        Ok(self.data_mut().unwrap_or(&mut []).as_pixels_mut())
    }

    /// Zero-copy view as an [`imgref::ImgRef`].
    #[cfg(feature = "imgref")]
    pub fn as_imgref<P: BufferPixel>(&self) -> Result<imgref::ImgRef<'_, P>, ImageError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        let pixels: &[P] = self.as_pixels()?;
        Ok(imgref::ImgRef::new(
            pixels,
            self.width() as usize,
            self.height() as usize,
        ))
    }

    /// Copy into an [`imgref::ImgVec`].
    #[cfg(feature = "imgref")]
    pub fn to_imgvec<P: BufferPixel>(&self) -> Result<imgref::ImgVec<P>, ImageError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        let pixels: &[P] = self.as_pixels()?;
        Ok(imgref::ImgVec::new(
            pixels.to_vec(),
            self.width() as usize,
            self.height() as usize,
        ))
    }

    /// Build an image from a (possibly strided) [`imgref::ImgRef`].
    #[cfg(feature = "imgref")]
    pub fn from_imgref<P: BufferPixel>(img: imgref::ImgRef<'_, P>) -> Result<Self, ImageError>
    where
        [u8]: rgb::AsPixels<P>,
    {
        let width = u32::try_from(img.width()).unwrap_or(0);
        let height = u32::try_from(img.height()).unwrap_or(0);
        let mut image = ImageBuffer::new().with_type(width, height, P::IMAGE_TYPE);
        image.allocate()?;
        let dst: &mut [P] = image.as_pixels_mut()?;
        for (d, row) in dst.chunks_exact_mut(img.width()).zip(img.rows()) {
            d.copy_from_slice(row);
        }
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rgb::{RGB8, RGBA8};

    #[test]
    fn typed_view_matches_bytes() {
        let img = ImageBuffer::new()
            .with_type(2, 1, ImageType::Rgb24)
            .with_data(&[1, 2, 3, 4, 5, 6])
            .unwrap();
        let px: &[RGB8] = img.as_pixels().unwrap();
        assert_eq!(px, &[RGB8::new(1, 2, 3), RGB8::new(4, 5, 6)]);
        assert!(matches!(
            img.as_pixels::<RGBA8>(),
            Err(ImageError::LayoutMismatch {
                expected: ImageType::Rgba32,
                channels: 3,
                depth: 8
            })
        ));
    }

    #[test]
    fn depth_mismatch_is_reported() {
        let img = ImageBuffer::new()
            .with_type(1, 1, ImageType::Rgb48)
            .with_data(&[0; 6])
            .unwrap();
        let err = img.as_pixels::<RGB8>().unwrap_err();
        assert!(matches!(
            err,
            ImageError::LayoutMismatch {
                expected: ImageType::Rgb24,
                channels: 3,
                depth: 16
            }
        ));
        assert_eq!(
            alloc::format!("{err}"),
            "pixel layout mismatch: expected Rgb24, image has 3 channels at 16 bits"
        );
    }

    #[test]
    fn unloaded_view_fails() {
        let img = ImageBuffer::new().with_type(2, 1, ImageType::Rgb24);
        assert!(matches!(
            img.as_pixels::<RGB8>(),
            Err(ImageError::NotLoaded)
        ));
    }

    #[cfg(feature = "imgref")]
    #[test]
    fn imgref_roundtrip() {
        let src = imgref::ImgVec::new(
            alloc::vec![RGBA8::new(1, 2, 3, 4), RGBA8::new(5, 6, 7, 8)],
            1,
            2,
        );
        let img = ImageBuffer::from_imgref(src.as_ref()).unwrap();
        assert_eq!(img.data(), Some(&[1, 2, 3, 4, 5, 6, 7, 8][..]));
        let view = img.as_imgref::<RGBA8>().unwrap();
        assert_eq!(view.height(), 2);
        assert_eq!(img.to_imgvec::<RGBA8>().unwrap().buf(), src.buf());
    }
}
