#![no_main]

//! Fuzz target for image normalization.
//!
//! Arbitrary bytes must either fail with a processing error or produce an
//! image whose longest edge is within bounds.
//!
//! Run with: cargo +nightly fuzz run fuzz_compress

use libfuzzer_sys::fuzz_target;
use nydart_core::compress::MAX_DIMENSION;
use nydart_core::{ImageNormalizer, SourceImage};

fuzz_target!(|data: &[u8]| {
    let source = SourceImage::new("fuzz.bin", data.to_vec());
    if let Ok(image) = ImageNormalizer::default().normalize(&source) {
        assert!(image.width.max(image.height) <= MAX_DIMENSION);
    }
});
