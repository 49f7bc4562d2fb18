#![no_main]

use chatrelay::fuzz_api::LineLimit;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let limit = LineLimit::default();
        let effective = limit.effective_limit(s);
        assert!(effective == limit.base() || effective == limit.base() + 2);
        let _ = limit.is_within_limit(s);
    }
});
