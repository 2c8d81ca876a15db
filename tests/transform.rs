//! Pixel transform behavior across channel, depth and YUV conversions.

use zenraster::*;

fn solid(w: u32, h: u32, px: &[u8]) -> ImageBuffer {
    let data: Vec<u8> = px.iter().copied().cycle().take(w as usize * h as usize * px.len()).collect();
    ImageBuffer::new()
        .with_geometry(w, h, px.len() as u8, 8)
        .with_owned_data(data)
        .unwrap()
}

fn noise(len: usize) -> Vec<u8> {
    let mut state: u32 = 0xDEAD_BEEF;
    (0..len)
        .map(|_| {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            state as u8
        })
        .collect()
}

#[test]
fn expand_rgb_with_opaque_mask() {
    let mut img = solid(4, 3, &[10, 20, 30]);
    img.set_channels(4, Some(&[0, 0, 0, 255])).unwrap();
    assert_eq!(img.channels(), 4);
    assert_eq!(img.size(), 4 * 3 * 4);
    assert_eq!(img.real_size(), img.size());
    for y in 0..3 {
        for x in 0..4 {
            assert_eq!(img.pixel(x, y), &[10, 20, 30, 255]);
        }
    }
}

#[test]
fn reformat_roundtrip_keeps_shared_and_zeroes_dropped() {
    let src = noise(6 * 5 * 4);
    let mut img = ImageBuffer::new()
        .with_type(6, 5, ImageType::Rgba32)
        .with_data(&src)
        .unwrap();

    // Alpha is dropped on the way out; Gray is introduced.
    let l1 = Channel::RGBA;
    let l2 = [Channel::Blue, Channel::Gray, Channel::Red, Channel::Green];
    img.reformat(&l1, &l2).unwrap();
    img.reformat(&l2, &l1).unwrap();

    assert_eq!(img.channels(), 4);
    for (got, want) in img.data().unwrap().chunks_exact(4).zip(src.chunks_exact(4)) {
        assert_eq!(&got[..3], &want[..3]);
        assert_eq!(got[3], 0, "dropped alpha is not reconstructed");
    }
}

#[test]
fn reformat_sixteen_bit_rgb_to_bgra() {
    let mut img = ImageBuffer::new()
        .with_type(1, 1, ImageType::Rgb48)
        .with_data(&[0x11, 0x12, 0x21, 0x22, 0x31, 0x32])
        .unwrap();
    img.reformat(&Channel::RGB, &Channel::BGRA).unwrap();
    assert!(img.is_rgba64());
    assert_eq!(
        img.data(),
        Some(&[0x31, 0x32, 0x21, 0x22, 0x11, 0x12, 0, 0][..])
    );
}

#[test]
fn reformat_length_mismatch_is_rejected() {
    let mut img = solid(2, 2, &[1, 2, 3]);
    let before = img.clone();
    assert!(matches!(
        img.reformat(&Channel::RGBA, &Channel::RGB),
        Err(ImageError::ChannelCountMismatch {
            expected: 3,
            actual: 4
        })
    ));
    assert_eq!(img, before);
}

#[test]
fn strip_16_to_8_keeps_high_byte() {
    let mut img = ImageBuffer::new()
        .with_geometry(1, 1, 1, 16)
        .with_data(&[0x12, 0x34])
        .unwrap();
    img.strip_16_to_8().unwrap();
    assert_eq!(img.width(), 1);
    assert_eq!(img.height(), 1);
    assert_eq!(img.depth(), 8);
    assert_eq!(img.data(), Some(&[0x12][..]));
}

#[test]
fn strip_halves_buffer() {
    let src = noise(3 * 2 * 4 * 2);
    let mut img = ImageBuffer::new()
        .with_type(3, 2, ImageType::Rgba64)
        .with_data(&src)
        .unwrap();
    img.strip_16_to_8().unwrap();
    assert_eq!(img.real_size(), src.len() / 2);
    let expected: Vec<u8> = src.chunks_exact(2).map(|s| s[0]).collect();
    assert_eq!(img.data(), Some(&expected[..]));
}

#[test]
fn widen_then_narrow_is_lossless() {
    let src = noise(7 * 3 * 3);
    let mut img = ImageBuffer::new()
        .with_type(7, 3, ImageType::Rgb24)
        .with_data(&src)
        .unwrap();
    img.set_depth(16).unwrap();
    assert!(img.is_rgb48());
    img.set_depth(32).unwrap();
    assert_eq!(img.size(), 7 * 3 * 3 * 4);
    img.set_depth(8).unwrap();
    assert_eq!(img.data(), Some(&src[..]));
}

#[test]
fn yuv_mid_gray() {
    let img = ImageBuffer::from_yuv420(2, 2, &[235; 4], &[128], &[128]).unwrap();
    assert!(img.is_rgb24());
    assert_eq!(img.size(), 12);
    for px in img.data().unwrap().chunks_exact(3) {
        for &c in px {
            assert!(c.abs_diff(235) <= 1, "{px:?}");
        }
    }
}

#[test]
fn yuv_odd_dimensions_rejected() {
    let mut img = solid(2, 2, &[1, 2, 3]);
    let before = img.clone();
    let err = img
        .convert_yuv420_to_rgb24(3, 2, &[0; 6], &[128; 2], &[128; 2])
        .unwrap_err();
    assert!(matches!(
        err,
        ImageError::OddDimensions {
            width: 3,
            height: 2
        }
    ));
    assert!(matches!(
        ImageBuffer::from_yuv420(2, 3, &[0; 6], &[128; 2], &[128; 2]),
        Err(ImageError::OddDimensions { .. })
    ));
    assert_eq!(img, before);
}

#[test]
fn yuv_replaces_previous_image() {
    let mut img = solid(9, 9, &[1, 2, 3, 4]);
    img.convert_yuv420_to_rgb24(4, 2, &[16; 8], &[128; 2], &[128; 2])
        .unwrap();
    assert_eq!(img.geometry(), Geometry::new(4, 2, 3, 8));
    assert_eq!(img.data(), Some(&[16u8; 24][..]));
}
