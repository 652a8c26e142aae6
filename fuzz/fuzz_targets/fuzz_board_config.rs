#![no_main]

use laneboard_core::BoardConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Any config a loader accepts must also pass validation on its own.
    for loaded in [BoardConfig::from_toml_str(text), BoardConfig::from_json_str(text)] {
        if let Ok(config) = loaded {
            assert!(config.validate().is_empty());
        }
    }
});
