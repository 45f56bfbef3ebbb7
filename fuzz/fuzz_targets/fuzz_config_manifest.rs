//! Fuzz target for sieve.json manifest parsing.
//!
//! Tests that manifest parsing and validation handle arbitrary input
//! without panicking.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sieve_config::{validate_config, KeywordConfig};

fuzz_target!(|data: &[u8]| {
    if let Ok(json) = std::str::from_utf8(data) {
        if let Ok(config) = KeywordConfig::parse_json(json) {
            let _ = validate_config(&config);
        }
    }
});
