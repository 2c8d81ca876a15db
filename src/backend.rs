//! Codec backends behind a single capability trait.

use alloc::vec::Vec;
use enough::Stop;

use crate::decode::DecodeOutput;
use crate::error::ImageError;
use crate::image::ImageBuffer;
use crate::limits::Limits;
use crate::metadata::TextMetadata;

#[cfg(feature = "pnm")]
use crate::pnm::{self, PnmFormat};

#[cfg(feature = "farbfeld")]
use crate::farbfeld;

/// Encode and decode between an [`ImageBuffer`] and an in-memory file format.
///
/// Backends only see the buffer through its geometry and bytes; they build
/// decoded images with `with_geometry` + `take_ownership`.
pub trait ImageBackend {
    /// Encode a loaded image together with its text annotations.
    fn encode(
        &self,
        image: &ImageBuffer,
        text: &TextMetadata,
        stop: &dyn Stop,
    ) -> Result<Vec<u8>, ImageError>;

    /// Decode `data`, checking `limits` before allocating pixels.
    fn decode(
        &self,
        data: &[u8],
        limits: Option<&Limits>,
        stop: &dyn Stop,
    ) -> Result<DecodeOutput, ImageError>;
}

/// Supported codec backends.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Backend {
    /// Binary PNM (P5, P6, P7). Decoding requires the data's magic to match
    /// the given sub-format.
    #[cfg(feature = "pnm")]
    Pnm(PnmFormat),
    /// Farbfeld.
    #[cfg(feature = "farbfeld")]
    Farbfeld,
}

impl Backend {
    /// Detect the backend from magic bytes.
    pub fn detect(data: &[u8]) -> Option<Self> {
        #[cfg(feature = "pnm")]
        if let Some(format) = pnm::detect(data) {
            return Some(Backend::Pnm(format));
        }
        #[cfg(feature = "farbfeld")]
        if farbfeld::detect(data) {
            return Some(Backend::Farbfeld);
        }
        None
    }
}

impl ImageBackend for Backend {
    fn encode(
        &self,
        image: &ImageBuffer,
        text: &TextMetadata,
        stop: &dyn Stop,
    ) -> Result<Vec<u8>, ImageError> {
        if !image.is_loaded() {
            return Err(ImageError::NotLoaded);
        }
        match *self {
            #[cfg(feature = "pnm")]
            Backend::Pnm(format) => pnm::encode(image, text, format, stop),
            #[cfg(feature = "farbfeld")]
            Backend::Farbfeld => farbfeld::encode(image, stop),
        }
    }

    fn decode(
        &self,
        data: &[u8],
        limits: Option<&Limits>,
        stop: &dyn Stop,
    ) -> Result<DecodeOutput, ImageError> {
        match *self {
            #[cfg(feature = "pnm")]
            Backend::Pnm(format) => pnm::decode(data, format, limits, stop),
            #[cfg(feature = "farbfeld")]
            Backend::Farbfeld => farbfeld::decode(data, limits, stop),
        }
    }
}
