//! PNM header parsing and sample normalization.

use alloc::string::String;
use alloc::vec::Vec;
use enough::Stop;

use super::{PnmFormat, PnmHeader};
use crate::error::ImageError;
use crate::metadata::TextMetadata;

fn invalid(msg: &str) -> ImageError {
    ImageError::InvalidHeader(msg.into())
}

#[inline]
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c)
}

/// Record one comment line (the bytes after `#`).
///
/// Only the single space written after `#` and a trailing `\r` are removed;
/// values keep their own whitespace. `key: value` and `key:` comments become
/// entries, with keys free of whitespace. Anything else is trimmed and
/// appended to `Comment`. Repeated keys join with newlines, blank lines
/// included.
fn record_comment(text: &mut TextMetadata, line: &[u8]) {
    let owned = String::from_utf8_lossy(line);
    let line: &str = &owned;
    let line = line.strip_suffix('\r').unwrap_or(line);
    let line = line.strip_prefix(' ').unwrap_or(line);
    let valid_key = |key: &str| !key.is_empty() && !key.contains(char::is_whitespace);
    let (key, value) = match line.split_once(": ") {
        Some((key, value)) if valid_key(key) => (key, value),
        _ => match line.strip_suffix(':') {
            Some(key) if valid_key(key) => (key, ""),
            _ => {
                let free = line.trim();
                if free.is_empty() {
                    return;
                }
                ("Comment", free)
            }
        },
    };
    let seen = text.get(key).is_some();
    let slot = text.entry(key);
    if seen {
        slot.push('\n');
    }
    slot.push_str(value);
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
    text: TextMetadata,
}

impl<'a> Cursor<'a> {
    fn new(data: &'a [u8], pos: usize) -> Self {
        Self {
            data,
            pos,
            text: TextMetadata::new(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    /// Bytes up to (not including) the next newline; consumes the newline.
    fn line(&mut self) -> Result<&'a [u8], ImageError> {
        let data: &'a [u8] = self.data;
        let rest = data.get(self.pos..).ok_or(ImageError::UnexpectedEof)?;
        let end = rest
            .iter()
            .position(|&b| b == b'\n')
            .ok_or(ImageError::UnexpectedEof)?;
        self.pos += end + 1;
        Ok(&rest[..end])
    }

    fn skip_space_and_comments(&mut self) -> Result<(), ImageError> {
        loop {
            while self.peek().is_some_and(is_space) {
                self.pos += 1;
            }
            if self.peek() != Some(b'#') {
                return Ok(());
            }
            self.pos += 1;
            let comment = self.line()?;
            record_comment(&mut self.text, comment);
        }
    }

    fn uint(&mut self) -> Result<u32, ImageError> {
        self.skip_space_and_comments()?;
        let start = self.pos;
        let mut value: u32 = 0;
        while let Some(b) = self.peek().filter(u8::is_ascii_digit) {
            value = value
                .checked_mul(10)
                .and_then(|v| v.checked_add(u32::from(b - b'0')))
                .ok_or_else(|| invalid("header number overflows u32"))?;
            self.pos += 1;
        }
        if self.pos == start {
            return Err(match self.peek() {
                None => ImageError::UnexpectedEof,
                Some(_) => invalid("expected a number"),
            });
        }
        Ok(value)
    }
}

fn parse_number(token: &[u8]) -> Result<u32, ImageError> {
    core::str::from_utf8(token)
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| invalid("expected a number"))
}

fn check_maxval(maxval: u32) -> Result<u32, ImageError> {
    if maxval == 0 || maxval > 65535 {
        return Err(ImageError::InvalidHeader(alloc::format!(
            "maxval {maxval} outside 1..=65535"
        )));
    }
    Ok(maxval)
}

pub(crate) fn parse_header(data: &[u8]) -> Result<PnmHeader, ImageError> {
    let format = super::detect(data).ok_or_else(|| match data.get(..2) {
        Some(b"Pf" | b"PF") => ImageError::UnsupportedVariant("PFM float images".into()),
        Some(b"P1" | b"P2" | b"P3" | b"P4") => {
            ImageError::UnsupportedVariant("ASCII and 1-bit PNM".into())
        }
        Some(_) => ImageError::UnrecognizedFormat,
        None => ImageError::UnexpectedEof,
    })?;
    let mut cur = Cursor::new(data, 2);
    match format {
        PnmFormat::Pgm | PnmFormat::Ppm => parse_pnm(cur, format),
        PnmFormat::Pam => {
            // P7 must be followed by a newline before the first header line.
            if cur.line()?.iter().any(|&b| !is_space(b)) {
                return Err(invalid("garbage after P7 magic"));
            }
            parse_pam(cur)
        }
    }
}

fn parse_pnm(mut cur: Cursor<'_>, format: PnmFormat) -> Result<PnmHeader, ImageError> {
    if !cur.peek().is_some_and(|b| is_space(b) || b == b'#') {
        return Err(invalid("missing whitespace after magic"));
    }
    let width = cur.uint()?;
    let height = cur.uint()?;
    let maxval = check_maxval(cur.uint()?)?;
    // Exactly one whitespace byte separates maxval from the raster.
    match cur.peek() {
        Some(b) if is_space(b) => cur.pos += 1,
        Some(_) => return Err(invalid("missing whitespace after maxval")),
        None => return Err(ImageError::UnexpectedEof),
    }
    Ok(PnmHeader {
        format,
        width,
        height,
        channels: if format == PnmFormat::Pgm { 1 } else { 3 },
        maxval,
        data_offset: cur.pos,
        text: cur.text,
    })
}

fn parse_pam(mut cur: Cursor<'_>) -> Result<PnmHeader, ImageError> {
    let (mut width, mut height, mut depth, mut maxval) = (None, None, None, None);
    loop {
        let raw = cur.line()?;
        if let Some(comment) = raw.trim_ascii_start().strip_prefix(b"#") {
            record_comment(&mut cur.text, comment);
            continue;
        }
        let line = raw.trim_ascii();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.splitn(2, |&b| is_space(b));
        let key = parts.next().unwrap_or_default();
        let value = parts.next().unwrap_or_default().trim_ascii();
        match key {
            b"ENDHDR" => break,
            b"WIDTH" => width = Some(parse_number(value)?),
            b"HEIGHT" => height = Some(parse_number(value)?),
            b"DEPTH" => depth = Some(parse_number(value)?),
            b"MAXVAL" => maxval = Some(check_maxval(parse_number(value)?)?),
            b"TUPLTYPE" => {}
            _ => {
                return Err(ImageError::InvalidHeader(alloc::format!(
                    "unknown PAM header line: {}",
                    String::from_utf8_lossy(line)
                )));
            }
        }
    }
    let width = width.ok_or_else(|| invalid("PAM header missing WIDTH"))?;
    let height = height.ok_or_else(|| invalid("PAM header missing HEIGHT"))?;
    let depth = depth.ok_or_else(|| invalid("PAM header missing DEPTH"))?;
    let maxval = maxval.ok_or_else(|| invalid("PAM header missing MAXVAL"))?;
    let channels = u8::try_from(depth)
        .ok()
        .filter(|&c| c != 0)
        .ok_or_else(|| invalid("PAM DEPTH must be 1..=255"))?;
    Ok(PnmHeader {
        format: PnmFormat::Pam,
        width,
        height,
        channels,
        maxval,
        data_offset: cur.pos,
        text: cur.text,
    })
}

/// Convert raw samples to the buffer's full-range big-endian layout.
///
/// `raw` is exactly one image worth of bytes. maxval 255 and 65535 are
/// copied as-is; other maxvals are rescaled to the full range.
pub(crate) fn decode_samples(
    raw: &[u8],
    header: &PnmHeader,
    row_size: usize,
    stop: &dyn Stop,
) -> Result<Vec<u8>, ImageError> {
    let mut out = Vec::with_capacity(raw.len());
    let maxval = header.maxval;
    let wide = maxval > 255;
    let full: u32 = if wide { 65535 } else { 255 };
    for (row_idx, row) in raw.chunks(row_size.max(1)).enumerate() {
        if row_idx % 16 == 0 {
            stop.check()?;
        }
        if maxval == full {
            out.extend_from_slice(row);
        } else if wide {
            for pair in row.chunks_exact(2) {
                let v = u32::from(u16::from_be_bytes([pair[0], pair[1]])).min(maxval);
                let scaled = (v * full + maxval / 2) / maxval;
                out.extend_from_slice(&(scaled as u16).to_be_bytes());
            }
        } else {
            for &b in row {
                let v = u32::from(b).min(maxval);
                out.push(((v * full + maxval / 2) / maxval) as u8);
            }
        }
    }
    Ok(out)
}
