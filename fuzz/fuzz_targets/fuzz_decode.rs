#![no_main]
use libfuzzer_sys::fuzz_target;
use zenraster::pnm::PnmFormat;
use zenraster::{Backend, DecodeRequest, EncodeRequest, Limits};

fuzz_target!(|data: &[u8]| {
    let limits = Limits {
        max_memory_bytes: Some(64 << 20),
        ..Default::default()
    };

    // Auto-detect and each forced backend must never panic.
    for backend in [
        None,
        Some(Backend::Pnm(PnmFormat::Pam)),
        Some(Backend::Farbfeld),
    ] {
        let mut req = DecodeRequest::new(data).with_limits(&limits);
        if let Some(b) = backend {
            req = req.with_backend(b);
        }
        let Ok(out) = req.decode(enough::Unstoppable) else {
            continue;
        };
        let image = out.image;
        assert!(image.is_loaded());
        assert_eq!(image.real_size(), image.size());

        // Whatever decoded must re-encode as PAM and come back identical.
        if matches!(image.depth(), 8 | 16) {
            let encoded = EncodeRequest::pnm(PnmFormat::Pam)
                .encode(&image, enough::Unstoppable)
                .expect("decoded image re-encodes");
            let again = zenraster::decode(&encoded, enough::Unstoppable)
                .expect("re-encoded image decodes");
            assert_eq!(again.image, image);
        }
    }
});
