use enough::Stop;

use crate::backend::{Backend, ImageBackend};
use crate::error::ImageError;
use crate::image::ImageBuffer;
use crate::limits::Limits;
use crate::metadata::TextMetadata;

/// Decoded image with its text annotations and the backend that read it.
#[derive(Clone, Debug)]
pub struct DecodeOutput {
    pub image: ImageBuffer,
    pub text: TextMetadata,
    pub backend: Backend,
}

/// Decode builder: detects the format unless one is forced.
#[derive(Clone, Debug)]
pub struct DecodeRequest<'a> {
    data: &'a [u8],
    limits: Option<&'a Limits>,
    backend: Option<Backend>,
}

impl<'a> DecodeRequest<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            data,
            limits: None,
            backend: None,
        }
    }

    /// Apply resource limits before allocating pixels.
    pub fn with_limits(mut self, limits: &'a Limits) -> Self {
        self.limits = Some(limits);
        self
    }

    /// Skip detection and decode with `backend`.
    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = Some(backend);
        self
    }

    pub fn decode(self, stop: impl Stop) -> Result<DecodeOutput, ImageError> {
        let backend = match self.backend {
            Some(backend) => backend,
            None => Backend::detect(self.data).ok_or(ImageError::UnrecognizedFormat)?,
        };
        backend.decode(self.data, self.limits, &stop)
    }
}

/// Detect the format of `data` and decode it.
pub fn decode(data: &[u8], stop: impl Stop) -> Result<DecodeOutput, ImageError> {
    DecodeRequest::new(data).decode(stop)
}
