#![no_main]
use libfuzzer_sys::fuzz_target;
use zenraster::{Channel, ImageBuffer};

const TAGS: [Channel; 6] = [
    Channel::Red,
    Channel::Green,
    Channel::Blue,
    Channel::Alpha,
    Channel::Gray,
    Channel::Padding,
];

fn layout(bits: u8, n: u8) -> Vec<Channel> {
    (0..n)
        .map(|i| TAGS[(usize::from(bits) + usize::from(i)) % TAGS.len()])
        .collect()
}

fn check(img: &ImageBuffer) {
    if img.is_loaded() {
        assert!(img.has_valid_geometry());
        assert_eq!(img.real_size(), img.size());
    } else {
        assert_eq!(img.real_size(), 0);
    }
}

fuzz_target!(|data: &[u8]| {
    let [w, h, c, d, ops @ ..] = data else {
        return;
    };
    let mut img = ImageBuffer::new();
    img.set_geometry(u32::from(w % 17), u32::from(h % 17), c % 6, d % 33);
    check(&img);
    if img.has_valid_geometry() {
        let fill: Vec<u8> = ops.iter().copied().cycle().take(img.size()).collect();
        if fill.len() == img.size() {
            let _ = img.take_ownership(fill);
        } else {
            let _ = img.zero();
        }
    }
    check(&img);

    for op in ops.chunks(2) {
        let before = img.clone();
        let arg = op.get(1).copied().unwrap_or(0);
        let result = match op[0] % 6 {
            0 => {
                let from = layout(arg, img.channels());
                let to = layout(arg >> 3, arg % 5);
                img.reformat(&from, &to)
            }
            1 => img.set_channels(arg % 6, Some(&[arg, !arg, arg ^ 0x5a, 0xff, 0, 1])),
            2 => img.set_depth([8, 16, 32, 4][usize::from(arg % 4)]),
            3 => img.strip_16_to_8(),
            4 => {
                img.set_geometry(u32::from(arg % 9), img.height(), img.channels(), img.depth());
                Ok(())
            }
            _ => {
                let (w, h) = (u32::from(arg % 8), u32::from(arg / 32));
                let luma = vec![arg; (w * h) as usize];
                let chroma = vec![128; (w * h / 4) as usize];
                img.convert_yuv420_to_rgb24(w, h, &luma, &chroma, &chroma)
            }
        };
        if result.is_err() {
            assert_eq!(img, before, "failed transform must leave the image unchanged");
        }
        check(&img);
    }
});
