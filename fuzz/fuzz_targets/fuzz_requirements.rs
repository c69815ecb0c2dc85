#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Manifest parsing must reject bad input with an error, never a panic
        let _ = strata::domain::services::parse_manifest(content);
    }
});
