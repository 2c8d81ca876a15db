//! In-place pixel format transforms on [`ImageBuffer`](crate::ImageBuffer).
//!
//! Every transform validates its input completely before touching the
//! image, builds the result in a freshly sized buffer, and installs it with
//! the new geometry in one step. A failed transform leaves the image as it
//! was.

mod channels;
mod depth;
mod yuv;
