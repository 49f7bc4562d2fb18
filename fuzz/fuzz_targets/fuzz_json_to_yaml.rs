#![no_main]

use chatrelay::fuzz_api::{try_json_to_yaml, try_yaml_to_json};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data)
        && let Ok(yaml) = try_json_to_yaml(s)
    {
        assert!(try_yaml_to_json(&yaml).is_ok());
    }
});
