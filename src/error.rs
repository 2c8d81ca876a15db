use alloc::string::String;
use enough::StopReason;

use crate::pixel::{Channel, ImageType};

/// Errors from buffer management, pixel transforms and codec backends.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ImageError {
    #[error("invalid geometry: {width}x{height}, {channels} channels at {depth} bits")]
    InvalidGeometry {
        width: u32,
        height: u32,
        channels: u8,
        depth: u8,
    },

    #[error("image has no pixel buffer loaded")]
    NotLoaded,

    #[error("buffer too small: need {needed} bytes, got {actual}")]
    BufferTooSmall { needed: usize, actual: usize },

    #[error("buffer size mismatch: expected exactly {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    #[error("channel layout has {actual} entries but image has {expected} channels")]
    ChannelCountMismatch { expected: usize, actual: usize },

    #[error("channel {0:?} appears more than once in layout")]
    DuplicateChannel(Channel),

    #[error("unsupported depth conversion: {from} -> {to} bits")]
    UnsupportedDepth { from: u8, to: u8 },

    #[error("4:2:0 input needs even dimensions, got {width}x{height}")]
    OddDimensions { width: u32, height: u32 },

    #[error("pixel layout mismatch: expected {expected:?}, image has {channels} channels at {depth} bits")]
    LayoutMismatch {
        expected: ImageType,
        channels: u8,
        depth: u8,
    },

    #[error("unrecognized format magic bytes")]
    UnrecognizedFormat,

    #[error("invalid header: {0}")]
    InvalidHeader(String),

    #[error("unsupported format variant: {0}")]
    UnsupportedVariant(String),

    #[error("unexpected end of input")]
    UnexpectedEof,

    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    #[error("operation cancelled")]
    Cancelled(StopReason),
}

impl From<StopReason> for ImageError {
    fn from(r: StopReason) -> Self {
        ImageError::Cancelled(r)
    }
}
