//! Channel permutation, expansion and loss.

use alloc::vec;
use alloc::vec::Vec;

use log::debug;

use crate::error::ImageError;
use crate::image::ImageBuffer;
use crate::pixel::Channel;

impl ImageBuffer {
    /// Repack every pixel from the `before` channel layout to `after`.
    ///
    /// `before` names each existing channel slot in packed order and must
    /// have exactly [`channels()`](Self::channels) entries. Channels present
    /// in both layouts are moved bit-exactly to their new slot, channels only
    /// in `after` are zero, and channels only in `before` are dropped. Depth
    /// is unchanged. A tag may appear at most once in each layout.
    ///
    /// Nothing is modified when an error is returned. When no buffer is
    /// loaded only the geometry changes.
    ///
    /// ```
    /// use zenraster::{Channel, ImageBuffer, ImageType};
    ///
    /// let mut img = ImageBuffer::new()
    ///     .with_type(1, 1, ImageType::Rgb24)
    ///     .with_data(&[10, 20, 30])?;
    /// img.reformat(&Channel::RGB, &Channel::BGRA)?;
    /// assert_eq!(img.data(), Some(&[30, 20, 10, 0][..]));
    /// # Ok::<(), zenraster::ImageError>(())
    /// ```
    pub fn reformat(&mut self, before: &[Channel], after: &[Channel]) -> Result<(), ImageError> {
        let geometry = self.geometry();
        if !geometry.is_valid() {
            return Err(geometry.invalid_error());
        }
        if before.len() != geometry.channels as usize {
            return Err(ImageError::ChannelCountMismatch {
                expected: geometry.channels as usize,
                actual: before.len(),
            });
        }
        if let Some(tag) = find_duplicate(before).or_else(|| find_duplicate(after)) {
            return Err(ImageError::DuplicateChannel(tag));
        }
        let new_channels = u8::try_from(after.len()).unwrap_or(0);
        let next = geometry.with_channels(new_channels);
        if !next.is_valid() {
            return Err(next.invalid_error());
        }

        // Source slot for each destination slot.
        let sources: Vec<Option<usize>> = after
            .iter()
            .map(|tag| before.iter().position(|t| t == tag))
            .collect();

        let Some(src) = self.data() else {
            self.install(next, None);
            return Ok(());
        };

        let depth = geometry.depth as usize;
        let mut out = vec![0u8; next.size()];
        let src_pixels = src.chunks_exact(geometry.pixel_size());
        let dst_pixels = out.chunks_exact_mut(next.pixel_size());

        if depth % 8 == 0 {
            let sample = depth / 8;
            for (s, d) in src_pixels.zip(dst_pixels) {
                for (slot, from) in sources.iter().enumerate() {
                    if let Some(from) = *from {
                        d[slot * sample..(slot + 1) * sample]
                            .copy_from_slice(&s[from * sample..(from + 1) * sample]);
                    }
                }
            }
        } else {
            for (s, d) in src_pixels.zip(dst_pixels) {
                for (slot, from) in sources.iter().enumerate() {
                    if let Some(from) = *from {
                        copy_bits(s, from * depth, d, slot * depth, depth);
                    }
                }
            }
        }

        debug!(
            "reformat: {} -> {} channels at {} bits, {} -> {} bytes",
            geometry.channels,
            new_channels,
            depth,
            geometry.size(),
            next.size()
        );
        self.install(next, Some(out));
        Ok(())
    }

    /// Change the channel count along the packed order.
    ///
    /// When growing, each new pixel is first filled from `expand_mask` (at
    /// least one new pixel's worth of bytes; `None` means zeroes), then the
    /// original pixel bytes are copied over its leading bytes, so the mask
    /// only shows through in the added channels. When shrinking, trailing
    /// channels are dropped.
    pub fn set_channels(
        &mut self,
        channels: u8,
        expand_mask: Option<&[u8]>,
    ) -> Result<(), ImageError> {
        let geometry = self.geometry();
        if !geometry.is_valid() {
            return Err(geometry.invalid_error());
        }
        let next = geometry.with_channels(channels);
        if !next.is_valid() {
            return Err(next.invalid_error());
        }
        if next == geometry {
            return Ok(());
        }

        let old_ps = geometry.pixel_size();
        let new_ps = next.pixel_size();
        let zeros;
        let mask = match expand_mask {
            Some(mask) if new_ps > old_ps => {
                mask.get(..new_ps).ok_or(ImageError::BufferTooSmall {
                    needed: new_ps,
                    actual: mask.len(),
                })?
            }
            _ => {
                zeros = vec![0u8; new_ps];
                &zeros[..]
            }
        };

        let Some(src) = self.data() else {
            self.install(next, None);
            return Ok(());
        };

        let keep = old_ps.min(new_ps);
        let mut out = vec![0u8; next.size()];
        for (s, d) in src.chunks_exact(old_ps).zip(out.chunks_exact_mut(new_ps)) {
            d.copy_from_slice(mask);
            d[..keep].copy_from_slice(&s[..keep]);
        }

        debug!("set_channels: {} -> {}", geometry.channels, channels);
        self.install(next, Some(out));
        Ok(())
    }
}

fn find_duplicate(tags: &[Channel]) -> Option<Channel> {
    tags.iter()
        .enumerate()
        .find(|(i, tag)| tags[..*i].contains(tag))
        .map(|(_, tag)| *tag)
}

/// Copy `count` bits, most-significant bit first.
fn copy_bits(src: &[u8], src_bit: usize, dst: &mut [u8], dst_bit: usize, count: usize) {
    for i in 0..count {
        let s = src_bit + i;
        let d = dst_bit + i;
        let bit = (src[s / 8] >> (7 - s % 8)) & 1;
        let mask = 0x80u8 >> (d % 8);
        if bit != 0 {
            dst[d / 8] |= mask;
        } else {
            dst[d / 8] &= !mask;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::ImageType;

    #[test]
    fn swap_red_blue() {
        let mut img = ImageBuffer::new()
            .with_type(2, 1, ImageType::Rgb24)
            .with_data(&[1, 2, 3, 4, 5, 6])
            .unwrap();
        img.reformat(&Channel::RGB, &Channel::BGR).unwrap();
        assert_eq!(img.channels(), 3);
        assert_eq!(img.data(), Some(&[3, 2, 1, 6, 5, 4][..]));
    }

    #[test]
    fn sixteen_bit_samples_move_as_units() {
        let mut img = ImageBuffer::new()
            .with_type(1, 1, ImageType::Ga32)
            .with_data(&[0x12, 0x34, 0xab, 0xcd])
            .unwrap();
        img.reformat(&Channel::GRAY_ALPHA, &[Channel::Alpha, Channel::Gray])
            .unwrap();
        assert_eq!(img.data(), Some(&[0xab, 0xcd, 0x12, 0x34][..]));
    }

    #[test]
    fn sub_byte_depth() {
        // Two 4-bit channels per pixel: 0xA then 0x5.
        let mut img = ImageBuffer::new()
            .with_geometry(2, 1, 2, 4)
            .with_data(&[0xa5, 0x3c])
            .unwrap();
        img.reformat(
            &[Channel::Gray, Channel::Alpha],
            &[Channel::Alpha, Channel::Gray],
        )
        .unwrap();
        assert_eq!(img.data(), Some(&[0x5a, 0xc3][..]));

        // Grow to four 4-bit channels: new ones are zero.
        img.reformat(
            &[Channel::Alpha, Channel::Gray],
            &[Channel::Red, Channel::Gray, Channel::Green, Channel::Alpha],
        )
        .unwrap();
        assert_eq!(img.pixel_size(), 2);
        assert_eq!(img.data(), Some(&[0x0a, 0x05, 0x03, 0x0c][..]));
    }

    #[test]
    fn duplicates_rejected_without_mutation() {
        let mut img = ImageBuffer::new()
            .with_type(1, 1, ImageType::Rgb24)
            .with_data(&[1, 2, 3])
            .unwrap();
        let before = img.clone();
        let err = img
            .reformat(&[Channel::Red, Channel::Red, Channel::Blue], &Channel::RGB)
            .unwrap_err();
        assert!(matches!(err, ImageError::DuplicateChannel(Channel::Red)));
        let err = img
            .reformat(&Channel::RGB, &[Channel::Green, Channel::Green])
            .unwrap_err();
        assert!(matches!(err, ImageError::DuplicateChannel(Channel::Green)));
        assert_eq!(img, before);
    }

    #[test]
    fn empty_after_is_invalid() {
        let mut img = ImageBuffer::new()
            .with_type(1, 1, ImageType::G8)
            .with_data(&[9])
            .unwrap();
        assert!(matches!(
            img.reformat(&[Channel::Gray], &[]),
            Err(ImageError::InvalidGeometry { .. })
        ));
        assert!(img.is_loaded());
    }

    #[test]
    fn unloaded_reformat_updates_geometry_only() {
        let mut img = ImageBuffer::new().with_type(3, 3, ImageType::Rgb24);
        img.reformat(&Channel::RGB, &Channel::RGBA).unwrap();
        assert_eq!(img.channels(), 4);
        assert_eq!(img.size(), 36);
        assert!(!img.is_loaded());
    }

    #[test]
    fn set_channels_mask_is_required_length() {
        let mut img = ImageBuffer::new()
            .with_type(1, 1, ImageType::Rgb24)
            .with_data(&[1, 2, 3])
            .unwrap();
        assert!(matches!(
            img.set_channels(4, Some(&[0, 0, 0])),
            Err(ImageError::BufferTooSmall {
                needed: 4,
                actual: 3
            })
        ));
        img.set_channels(4, None).unwrap();
        assert_eq!(img.data(), Some(&[1, 2, 3, 0][..]));
        img.set_channels(1, None).unwrap();
        assert_eq!(img.data(), Some(&[1][..]));
    }
}
