//! Fuzz target for pattern installation and scanning.
//!
//! Arbitrary patterns are installed and an arbitrary text is scanned. The
//! redacted text must keep its character count and only ever gain masks.

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sieve_core::{Matcher, MASK};

#[derive(Debug, Arbitrary)]
struct Input {
    patterns: Vec<String>,
    removed: Vec<String>,
    tag: u8,
    auto_replace: bool,
    text: String,
}

fuzz_target!(|input: Input| {
    let matcher = Matcher::new();
    matcher.add_many(&input.patterns, input.tag, input.auto_replace);
    matcher.remove_many(&input.removed);

    let (keyword, _) = matcher.find_first(&input.text);
    assert!(keyword.is_empty() || input.text.contains(&keyword));

    let (redacted, _) = matcher.scan_and_redact(&input.text);
    assert_eq!(redacted.chars().count(), input.text.chars().count());
    for (before, after) in input.text.chars().zip(redacted.chars()) {
        assert!(before == after || after == MASK);
    }
});
