#![no_main]

use chatrelay::fuzz_api::{try_json_to_yaml, try_yaml_to_json};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data)
        && let Ok(json) = try_yaml_to_json(s)
    {
        // Anything emitted as JSON must convert back.
        assert!(try_json_to_yaml(&json).is_ok());
    }
});
