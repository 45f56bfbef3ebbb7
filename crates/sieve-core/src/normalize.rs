//! Code point normalization for trie keys.
//!
//! Every character of a pattern and of a scanned text goes through
//! [`normalize`] before it touches the trie. Characters that normalize to
//! `None` are transparent: they never start, continue or end a match, and
//! they never break one either.

use once_cell::sync::Lazy;
use regex::Regex;

/// Wildcard metacharacter in patterns, and the mask written over redacted runs.
pub const MASK: char = '*';

// Unicode general category P (Pc, Pd, Ps, Pe, Pi, Pf, Po).
static RE_PUNCTUATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\p{P}$").unwrap()
});

/// Normalize a single code point.
///
/// - ASCII uppercase letters fold to lowercase.
/// - ASCII lowercase letters, ASCII digits and [`MASK`] pass through.
/// - Every other ASCII code point (whitespace, punctuation, control) is skipped.
/// - Non-ASCII code points pass through unless they are Unicode punctuation.
pub fn normalize(c: char) -> Option<char> {
    if c.is_ascii() {
        return match c {
            'A'..='Z' => Some(c.to_ascii_lowercase()),
            'a'..='z' | '0'..='9' | MASK => Some(c),
            _ => None,
        };
    }

    if is_punctuation(c) {
        None
    } else {
        Some(c)
    }
}

/// Whether a non-ASCII code point belongs to the Unicode punctuation category.
fn is_punctuation(c: char) -> bool {
    let mut buf = [0u8; 4];
    RE_PUNCTUATION.is_match(c.encode_utf8(&mut buf))
}
