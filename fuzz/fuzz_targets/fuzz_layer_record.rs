#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(content) = std::str::from_utf8(data) {
        // Layer and image records are read back from the store on every build
        let _ = toml::from_str::<strata::domain::entities::LayerRecord>(content);
        let _ = toml::from_str::<strata::domain::entities::ImageRecord>(content);
    }
});
