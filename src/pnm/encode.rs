//! PNM encoder: P5, P6, P7.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write as _;
use enough::Stop;

use super::PnmFormat;
use crate::error::ImageError;
use crate::image::ImageBuffer;
use crate::metadata::TextMetadata;

fn tupltype(channels: u8) -> Option<&'static str> {
    match channels {
        1 => Some("GRAYSCALE"),
        2 => Some("GRAYSCALE_ALPHA"),
        3 => Some("RGB"),
        4 => Some("RGB_ALPHA"),
        _ => None,
    }
}

/// One `# key: value` line per line of each value; empty lines are written
/// as `# key:`. Whitespace in keys becomes `_`.
fn write_comments(header: &mut String, text: &TextMetadata) {
    for (key, value) in text.iter() {
        let key: String = key
            .chars()
            .map(|c| if c.is_whitespace() { '_' } else { c })
            .collect();
        for line in value.split('\n') {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                let _ = writeln!(header, "# {key}:");
            } else {
                let _ = writeln!(header, "# {key}: {line}");
            }
        }
    }
}

fn read_sample(bytes: &[u8]) -> u32 {
    match *bytes {
        [hi, lo] => u32::from(u16::from_be_bytes([hi, lo])),
        [b] => u32::from(b),
        _ => 0,
    }
}

fn push_sample(out: &mut Vec<u8>, value: u32, width: usize) {
    if width == 2 {
        out.extend_from_slice(&(value as u16).to_be_bytes());
    } else {
        out.push(value as u8);
    }
}

/// Encode a loaded image to PNM.
///
/// PGM accepts 1 channel, or 3/4 channels reduced to luma. PPM accepts 3
/// channels, 4 (alpha dropped) or 1 (gray replicated). PAM writes any
/// channel count as-is. Depth must be 8 or 16.
pub(crate) fn encode_pnm(
    image: &ImageBuffer,
    text: &TextMetadata,
    fmt: PnmFormat,
    stop: &dyn Stop,
) -> Result<Vec<u8>, ImageError> {
    if !image.is_loaded() {
        return Err(ImageError::NotLoaded);
    }
    let depth = image.depth();
    let channels = image.channels();
    let (width, height) = (image.width(), image.height());
    let sample = match depth {
        8 => 1,
        16 => 2,
        _ => {
            return Err(ImageError::UnsupportedVariant(format!(
                "PNM stores 8 or 16 bit samples, image has {depth}"
            )));
        }
    };
    let maxval = if depth == 16 { 65535 } else { 255 };

    let out_channels = match (fmt, channels) {
        (PnmFormat::Pgm, 1 | 3 | 4) => 1,
        (PnmFormat::Ppm, 1 | 3 | 4) => 3,
        (PnmFormat::Pam, c) => c,
        _ => {
            return Err(ImageError::UnsupportedVariant(format!(
                "cannot encode {channels} channels as {fmt:?}"
            )));
        }
    };

    let mut header = String::new();
    header.push_str(fmt.magic());
    header.push('\n');
    write_comments(&mut header, text);
    match fmt {
        PnmFormat::Pgm | PnmFormat::Ppm => {
            let _ = write!(header, "{width} {height}\n{maxval}\n");
        }
        PnmFormat::Pam => {
            let _ = write!(
                header,
                "WIDTH {width}\nHEIGHT {height}\nDEPTH {channels}\nMAXVAL {maxval}\n"
            );
            if let Some(t) = tupltype(channels) {
                let _ = writeln!(header, "TUPLTYPE {t}");
            }
            header.push_str("ENDHDR\n");
        }
    }

    let ps = image.pixel_size();
    let out_size = image.pixel_count() as usize * usize::from(out_channels) * sample;
    let mut out = Vec::with_capacity(header.len() + out_size);
    out.extend_from_slice(header.as_bytes());

    stop.check()?;

    for (row_idx, row) in image.rows().enumerate() {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        if out_channels == channels {
            out.extend_from_slice(row);
            continue;
        }
        for px in row.chunks_exact(ps) {
            let s = |i: usize| read_sample(&px[i * sample..(i + 1) * sample]);
            match (out_channels, channels) {
                (1, _) => {
                    let luma = (s(0) * 299 + s(1) * 587 + s(2) * 114 + 500) / 1000;
                    push_sample(&mut out, luma, sample);
                }
                (3, 1) => {
                    for _ in 0..3 {
                        out.extend_from_slice(px);
                    }
                }
                _ => out.extend_from_slice(&px[..3 * sample]),
            }
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::ImageType;
    use enough::Unstoppable;

    #[test]
    fn pgm_from_rgb_uses_luma() {
        let img = ImageBuffer::new()
            .with_type(2, 1, ImageType::Rgb24)
            .with_data(&[255, 0, 0, 255, 255, 255])
            .unwrap();
        let out = encode_pnm(&img, &TextMetadata::new(), PnmFormat::Pgm, &Unstoppable).unwrap();
        assert_eq!(out, b"P5\n2 1\n255\n\x4c\xff");
    }

    #[test]
    fn pam_header_and_comments() {
        let img = ImageBuffer::new()
            .with_type(1, 1, ImageType::Ga16)
            .with_data(&[1, 2])
            .unwrap();
        let mut text = TextMetadata::new();
        text.insert("Title", "two\nlines");
        let out = encode_pnm(&img, &text, PnmFormat::Pam, &Unstoppable).unwrap();
        let expected: &[u8] = b"P7\n# Title: two\n# Title: lines\nWIDTH 1\nHEIGHT 1\nDEPTH 2\nMAXVAL 255\nTUPLTYPE GRAYSCALE_ALPHA\nENDHDR\n\x01\x02";
        assert_eq!(out, expected);
    }

    #[test]
    fn ppm_rejects_two_channels() {
        let img = ImageBuffer::new()
            .with_type(1, 1, ImageType::Ga16)
            .with_data(&[1, 2])
            .unwrap();
        assert!(matches!(
            encode_pnm(&img, &TextMetadata::new(), PnmFormat::Ppm, &Unstoppable),
            Err(ImageError::UnsupportedVariant(_))
        ));
    }
}
