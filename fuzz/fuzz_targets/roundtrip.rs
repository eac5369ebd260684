#![no_main]
use libfuzzer_sys::fuzz_target;
use franvaro::{extract_cases, generate, parse};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(tree) = parse(s) {
            let _ = generate(&tree);
            let _ = extract_cases(&tree);
        }
    }
});
