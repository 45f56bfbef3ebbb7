//! Fuzz target for line-oriented keyword ingestion.
//!
//! Tests that arbitrary bytes fed as a keyword list never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use sieve_core::Matcher;

fuzz_target!(|data: &[u8]| {
    let matcher = Matcher::new();
    // Invalid UTF-8 is decoded lossily; no input may panic or error
    assert!(matcher.add_from_lines(data, 1, true).is_ok());
});
