//! Multi-pattern keyword matcher and redactor for Unicode text.
//!
//! Patterns are stored in a trie over normalized code points and tagged
//! with a small caller-defined group number. A scan finds the leftmost,
//! longest keyword and can mask every occurrence with `*`.
//!
//! # Key Features
//!
//! - **Punctuation transparency**: whitespace and punctuation never break a
//!   match, so `s.p-a m` still matches `spam`.
//! - **ASCII case folding**: `SPAM` matches `spam`.
//! - **Single-character wildcards**: each `*` in a pattern matches exactly one
//!   character; `a**b` needs two characters between `a` and `b`.
//! - **Tags**: matches are grouped by the tag of the pattern that fired.
//! - **Concurrent use**: [`Matcher`] serializes pattern updates against any
//!   number of concurrent scans.
//!
//! # Example
//!
//! ```
//! use sieve_core::Matcher;
//!
//! let matcher = Matcher::new();
//! matcher.add(["apple", "tomato"]);
//!
//! let (redacted, matches) = matcher.scan_and_redact("an apple, a tomato");
//! assert_eq!(redacted, "an *****, a ******");
//! assert_eq!(matches[&0], vec!["apple", "tomato"]);
//! ```

pub mod error;
pub mod matcher;
pub mod normalize;
pub mod report;
pub mod trie;

pub use error::{Result, SieveError};
pub use matcher::{Matcher, INGEST_BATCH_LINES};
pub use normalize::{normalize, MASK};
pub use report::{FirstMatch, ScanReport};
pub use trie::{Hit, PatternTrie, Terminal, TrieNode};
