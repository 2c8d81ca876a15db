/// Well-known image types and their channel/depth layout.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageType {
    /// Red, green, blue; 3 channels, 8 bits each.
    Rgb24,
    /// Red, green, blue; 3 channels, 16 bits each.
    Rgb48,
    /// Red, green, blue, alpha; 4 channels, 8 bits each.
    Rgba32,
    /// Red, green, blue, alpha; 4 channels, 16 bits each.
    Rgba64,
    /// Grayscale; 1 channel, 8 bits.
    G8,
    /// Grayscale; 1 channel, 16 bits.
    G16,
    /// Grayscale with alpha; 2 channels, 8 bits each.
    Ga16,
    /// Grayscale with alpha; 2 channels, 16 bits each.
    Ga32,
}

/// Channel count, bits per channel and plane count of an [`ImageType`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeFormat {
    pub channels: u8,
    pub depth: u8,
    pub planes: u8,
}

impl ImageType {
    /// Every known type, in declaration order.
    pub const ALL: [ImageType; 8] = [
        Self::Rgb24,
        Self::Rgb48,
        Self::Rgba32,
        Self::Rgba64,
        Self::G8,
        Self::G16,
        Self::Ga16,
        Self::Ga32,
    ];

    /// Layout of this type.
    pub const fn format(self) -> TypeFormat {
        let (channels, depth) = match self {
            Self::Rgb24 => (3, 8),
            Self::Rgb48 => (3, 16),
            Self::Rgba32 => (4, 8),
            Self::Rgba64 => (4, 16),
            Self::G8 => (1, 8),
            Self::G16 => (1, 16),
            Self::Ga16 => (2, 8),
            Self::Ga32 => (2, 16),
        };
        TypeFormat {
            channels,
            depth,
            planes: 1,
        }
    }

    /// Find the type matching a channel count and depth.
    pub fn from_layout(channels: u8, depth: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|t| {
            let f = t.format();
            f.channels == channels && f.depth == depth
        })
    }

    /// Bytes per pixel for this type.
    pub const fn bytes_per_pixel(self) -> usize {
        let f = self.format();
        f.channels as usize * f.depth as usize / 8
    }
}

/// Semantic tag for one channel slot of a packed pixel.
///
/// Used by [`ImageBuffer::reformat`](crate::ImageBuffer::reformat) to say
/// what each slot means before and after the transform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
    Alpha,
    Gray,
    /// Padding or unused slot (e.g. the X in BGRX).
    Padding,
    /// Application-defined channel.
    Other(u8),
}

impl Channel {
    /// Red, green, blue.
    pub const RGB: [Channel; 3] = [Self::Red, Self::Green, Self::Blue];
    /// Red, green, blue, alpha.
    pub const RGBA: [Channel; 4] = [Self::Red, Self::Green, Self::Blue, Self::Alpha];
    /// Blue, green, red.
    pub const BGR: [Channel; 3] = [Self::Blue, Self::Green, Self::Red];
    /// Blue, green, red, alpha.
    pub const BGRA: [Channel; 4] = [Self::Blue, Self::Green, Self::Red, Self::Alpha];
    /// Alpha, red, green, blue.
    pub const ARGB: [Channel; 4] = [Self::Alpha, Self::Red, Self::Green, Self::Blue];
    /// Gray, alpha.
    pub const GRAY_ALPHA: [Channel; 2] = [Self::Gray, Self::Alpha];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_roundtrips_through_from_layout() {
        for t in ImageType::ALL {
            let f = t.format();
            assert_eq!(f.planes, 1);
            assert_eq!(ImageType::from_layout(f.channels, f.depth), Some(t));
        }
        assert_eq!(ImageType::from_layout(3, 32), None);
    }

    #[test]
    fn bytes_per_pixel() {
        assert_eq!(ImageType::Rgb24.bytes_per_pixel(), 3);
        assert_eq!(ImageType::Rgba64.bytes_per_pixel(), 8);
        assert_eq!(ImageType::Ga16.bytes_per_pixel(), 2);
        assert_eq!(ImageType::G16.bytes_per_pixel(), 2);
    }
}
