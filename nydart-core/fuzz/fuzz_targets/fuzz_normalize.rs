#![no_main]

//! Fuzz target for result normalization.
//!
//! Any JSON payload must normalize without panicking and always yield
//! three or four improvements.
//!
//! Run with: cargo +nightly fuzz run fuzz_normalize

use libfuzzer_sys::fuzz_target;
use nydart_core::{normalize, UpstreamAnalysis};

fuzz_target!(|data: &[u8]| {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(data) {
        let result = normalize(&UpstreamAnalysis::from(&value));
        assert!((3..=4).contains(&result.improvements.len()));
        assert!(!result.style.is_empty());
    }
});
