use alloc::vec::Vec;
use enough::Stop;

use crate::backend::{Backend, ImageBackend};
use crate::error::ImageError;
use crate::image::ImageBuffer;
use crate::metadata::TextMetadata;

#[cfg(feature = "pnm")]
use crate::pnm::PnmFormat;

/// Encode builder for a chosen backend.
#[derive(Clone, Debug)]
pub struct EncodeRequest<'a> {
    backend: Backend,
    text: Option<&'a TextMetadata>,
}

impl<'a> EncodeRequest<'a> {
    pub fn new(backend: Backend) -> Self {
        Self {
            backend,
            text: None,
        }
    }

    #[cfg(feature = "pnm")]
    pub fn pnm(format: PnmFormat) -> Self {
        Self::new(Backend::Pnm(format))
    }

    #[cfg(feature = "farbfeld")]
    pub fn farbfeld() -> Self {
        Self::new(Backend::Farbfeld)
    }

    /// Attach text annotations. Backends without text support ignore them.
    pub fn with_text(mut self, text: &'a TextMetadata) -> Self {
        self.text = Some(text);
        self
    }

    pub fn encode(&self, image: &ImageBuffer, stop: impl Stop) -> Result<Vec<u8>, ImageError> {
        let empty = TextMetadata::new();
        let text = self.text.unwrap_or(&empty);
        self.backend.encode(image, text, &stop)
    }
}
