//! # zenraster
//!
//! Raster image buffer with strict size invariants, plus in-place pixel
//! format transforms.
//!
//! ## The buffer
//!
//! An [`ImageBuffer`] is a [`Geometry`] (width, height, channels, bits per
//! channel) and an exclusively owned byte buffer. When the buffer exists its
//! length is exactly `width * height * channels * depth / 8`; when the
//! geometry changes size the buffer is released rather than resized. A
//! buffer can be absent while the geometry is valid, so check
//! [`ImageBuffer::is_loaded`] before the raw accessors, which panic on an
//! unloaded image.
//!
//! Data enters by [`allocate`](ImageBuffer::allocate),
//! [`zero`](ImageBuffer::zero), [`copy_in`](ImageBuffer::copy_in) or
//! [`take_ownership`](ImageBuffer::take_ownership) (no copy).
//!
//! ## Transforms
//!
//! - [`reformat`](ImageBuffer::reformat): permute, add or drop tagged
//!   channels, at any depth including sub-byte.
//! - [`set_channels`](ImageBuffer::set_channels): grow or shrink along the
//!   packed order with an expansion mask.
//! - [`set_depth`](ImageBuffer::set_depth) and
//!   [`strip_16_to_8`](ImageBuffer::strip_16_to_8): sample depth changes.
//! - [`convert_yuv420_to_rgb24`](ImageBuffer::convert_yuv420_to_rgb24):
//!   planar 4:2:0 to packed RGB, BT.601.
//!
//! Transforms are all-or-nothing: on error the image is unchanged.
//!
//! ## Codecs (`pnm`, `farbfeld` features)
//!
//! Backends sit at the boundary behind [`ImageBackend`] and only touch the
//! buffer through its geometry and bytes.
//!
//! ## Credits
//!
//! The farbfeld header parser is forked from
//! [zune-farbfeld](https://github.com/etemesi254/zune-image) by Caleb Etemesi
//! (MIT/Apache-2.0/Zlib licensed). We credit that work and recommend the
//! zune-image ecosystem if you need a broader set of decoders.
//!
//! ## Usage
//!
//! ```
//! use zenraster::{ImageBuffer, ImageType};
//!
//! let mut img = ImageBuffer::new().with_type(2, 2, ImageType::Rgb24);
//! assert!(!img.is_loaded());
//! img.zero()?;
//! img.pixel_mut(1, 0).copy_from_slice(&[10, 20, 30]);
//! img.set_channels(4, Some(&[0, 0, 0, 255]))?;
//! assert_eq!(img.pixel(1, 0), &[10, 20, 30, 255]);
//! # Ok::<(), zenraster::ImageError>(())
//! ```
//!
//! ```
//! # #[cfg(feature = "pnm")]
//! # {
//! use zenraster::{DecodeRequest, EncodeRequest, ImageBuffer, ImageType, TextMetadata, Unstoppable};
//! use zenraster::pnm::PnmFormat;
//!
//! let img = ImageBuffer::new()
//!     .with_type(1, 1, ImageType::G8)
//!     .with_data(&[128])?;
//! let mut text = TextMetadata::new();
//! text.insert("Title", "one gray pixel");
//!
//! let encoded = EncodeRequest::pnm(PnmFormat::Pgm)
//!     .with_text(&text)
//!     .encode(&img, Unstoppable)?;
//! let decoded = DecodeRequest::new(&encoded).decode(Unstoppable)?;
//! assert_eq!(decoded.image, img);
//! assert_eq!(decoded.text.get("Title"), Some("one gray pixel"));
//! # }
//! # Ok::<(), zenraster::ImageError>(())
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

mod error;
mod geometry;
mod image;
mod limits;
mod metadata;
mod pixel;
mod transform;

#[cfg(feature = "rgb")]
mod typed;

#[cfg(feature = "pnm")]
pub mod pnm;

#[cfg(feature = "farbfeld")]
mod farbfeld;

#[cfg(any(feature = "pnm", feature = "farbfeld"))]
mod backend;
#[cfg(any(feature = "pnm", feature = "farbfeld"))]
mod decode;
#[cfg(any(feature = "pnm", feature = "farbfeld"))]
mod encode;

// Re-exports
pub use enough::{Stop, Unstoppable};
pub use error::ImageError;
pub use geometry::Geometry;
pub use image::ImageBuffer;
pub use limits::Limits;
pub use metadata::TextMetadata;
pub use pixel::{Channel, ImageType, TypeFormat};

#[cfg(feature = "rgb")]
pub use typed::BufferPixel;

#[cfg(any(feature = "pnm", feature = "farbfeld"))]
pub use backend::{Backend, ImageBackend};
#[cfg(any(feature = "pnm", feature = "farbfeld"))]
pub use decode::{DecodeOutput, DecodeRequest, decode};
#[cfg(any(feature = "pnm", feature = "farbfeld"))]
pub use encode::EncodeRequest;
