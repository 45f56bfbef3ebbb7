//! Thread-safe keyword matcher.
//!
//! The [`Matcher`] owns a single [`PatternTrie`] behind a reader-writer lock.
//! Adding and removing patterns takes the write lock; searching and
//! redacting take the read lock and only ever mutate a private copy of the
//! input text.

use crate::error::Result;
use crate::normalize::MASK;
use crate::report::{FirstMatch, ScanReport};
use crate::trie::PatternTrie;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, trace, warn};

/// Lines inserted per write-lock acquisition when reading a line source.
pub const INGEST_BATCH_LINES: usize = 2048;

/// Keyword matcher and redactor.
///
/// Thread-safe implementation using RwLock for concurrent access.
#[derive(Debug, Default)]
pub struct Matcher {
    trie: RwLock<PatternTrie>,
}

impl Matcher {
    /// Create an empty matcher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a matcher around an existing trie.
    pub fn with_trie(trie: PatternTrie) -> Self {
        Self {
            trie: RwLock::new(trie),
        }
    }

    // Every trie mutation completes before it can panic, so a poisoned
    // lock still guards a structurally valid trie.
    fn read(&self) -> RwLockReadGuard<'_, PatternTrie> {
        self.trie.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, PatternTrie> {
        self.trie.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add patterns with tag 0 and auto-replace enabled.
    pub fn add<I, S>(&self, patterns: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.add_many(patterns, 0, true)
    }

    /// Add patterns under one tag.
    ///
    /// Returns the patterns that were rejected. A rejection never stops the
    /// rest of the batch.
    pub fn add_many<I, S>(&self, patterns: I, tag: u8, auto_replace: bool) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trie = self.write();
        let mut failed = Vec::new();
        let mut total = 0usize;

        for pattern in patterns {
            let pattern = pattern.as_ref();
            total += 1;
            if !trie.insert(pattern, tag, auto_replace) {
                failed.push(pattern.to_string());
            }
        }

        debug!(total, failed = failed.len(), tag, auto_replace, "patterns added");
        failed
    }

    /// Add newline-delimited patterns from a line source.
    ///
    /// Lines are inserted in batches as they are read. Bytes that are not
    /// valid UTF-8 are decoded lossily to U+FFFD, so a bad line is still one
    /// candidate pattern and never ends the source. A read failure
    /// aborts the call with [`SieveError::Io`](crate::SieveError::Io);
    /// lines read before the failure stay inserted.
    pub fn add_from_lines<R: BufRead>(
        &self,
        mut reader: R,
        tag: u8,
        auto_replace: bool,
    ) -> Result<Vec<String>> {
        let mut failed = Vec::new();
        let mut pending = Vec::with_capacity(INGEST_BATCH_LINES);
        let mut buf = Vec::new();

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf);
                    let line = line.trim_end_matches(['\n', '\r']);
                    pending.push(line.to_string());
                    if pending.len() == INGEST_BATCH_LINES {
                        failed.extend(self.add_many(pending.drain(..), tag, auto_replace));
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    failed.extend(self.add_many(pending.drain(..), tag, auto_replace));
                    warn!(error = %e, rejected = failed.len(), "keyword source read failed");
                    return Err(e.into());
                }
            }
        }

        failed.extend(self.add_many(pending.drain(..), tag, auto_replace));
        Ok(failed)
    }

    /// Add patterns from a keyword file, one per line.
    pub fn add_from_file<P: AsRef<Path>>(
        &self,
        path: P,
        tag: u8,
        auto_replace: bool,
    ) -> Result<Vec<String>> {
        let path = path.as_ref();
        let file = File::open(path)?;
        debug!(path = %path.display(), tag, "loading keyword file");
        self.add_from_lines(BufReader::new(file), tag, auto_replace)
    }

    /// Remove patterns by literal. Absent patterns are ignored.
    pub fn remove_many<I, S>(&self, patterns: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trie = self.write();
        let mut removed = 0usize;
        for pattern in patterns {
            if trie.remove(pattern.as_ref()) {
                removed += 1;
            }
        }
        debug!(removed, "patterns removed");
    }

    /// Whether the matcher holds no patterns.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Number of trie nodes below the root.
    pub fn node_count(&self) -> usize {
        self.read().node_count()
    }

    /// First keyword in `text` and its tag, or `("", 0)` if none.
    pub fn find_first(&self, text: &str) -> (String, u8) {
        let trie = self.read();
        let chars: Vec<char> = text.chars().collect();
        match trie.search(&chars) {
            Some(hit) => (chars[hit.start..hit.end].iter().collect(), hit.tag),
            None => (String::new(), 0),
        }
    }

    /// Scan `text` left to right and mask every auto-replace match.
    ///
    /// Returns the redacted text and the matched runs grouped by tag, in
    /// scan order. Matches never overlap, and the output has as many code
    /// points as the input.
    pub fn scan_and_redact(&self, text: &str) -> (String, BTreeMap<u8, Vec<String>>) {
        let trie = self.read();
        let mut chars: Vec<char> = text.chars().collect();
        let mut matches: BTreeMap<u8, Vec<String>> = BTreeMap::new();
        let mut offset = 0;

        while let Some(hit) = trie.search(&chars[offset..]) {
            let start = offset + hit.start;
            let end = offset + hit.end;
            let keyword: String = chars[start..end].iter().collect();
            trace!(start, end, tag = hit.tag, "keyword matched");
            matches.entry(hit.tag).or_default().push(keyword);

            if hit.auto_replace {
                chars[start..end].fill(MASK);
            }
            offset = end;
        }

        (chars.into_iter().collect(), matches)
    }

    /// [`find_first`](Self::find_first) as a serializable value.
    pub fn first(&self, text: &str) -> FirstMatch {
        self.find_first(text).into()
    }

    /// [`scan_and_redact`](Self::scan_and_redact) as a serializable report.
    pub fn scan(&self, text: &str) -> ScanReport {
        self.scan_and_redact(text).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor, Read};
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_add_and_remove() {
        let matcher = Matcher::new();
        matcher.add(["apple", "tomato", "grape"]);
        matcher.remove_many(["grape"]);

        let text = "I want grape and tomato, apple is good";
        assert_eq!(matcher.find_first(text), ("tomato".to_string(), 0));

        let (redacted, matches) = matcher.scan_and_redact(text);
        assert_eq!(redacted, "I want grape and ******, ***** is good");
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[&0], vec!["tomato", "apple"]);
    }

    #[test]
    fn test_add_many_reports_failures() {
        let matcher = Matcher::new();
        let failed = matcher.add_many(vec!["ok", "*bad", "x!", "#comment", "", "fine"], 4, false);
        assert_eq!(failed, vec!["*bad", "x!"]);
        assert_eq!(matcher.first("fine day"), FirstMatch { keyword: "fine".into(), tag: 4 });
    }

    #[test]
    fn test_no_auto_replace_reports_without_masking() {
        let matcher = Matcher::new();
        matcher.add_many(["tomato"], 9, false);
        let report = matcher.scan("one tomato, two tomato");
        assert_eq!(report.text, "one tomato, two tomato");
        assert_eq!(report.matches[&9], vec!["tomato", "tomato"]);
    }

    #[test]
    fn test_tags_grouped_in_scan_order() {
        let matcher = Matcher::new();
        matcher.add_many(["apple"], 1, true);
        matcher.add_many(["tomato"], 2, false);
        let report = matcher.scan("tomato apple tomato apple");
        assert_eq!(report.text, "tomato ***** tomato *****");
        assert_eq!(report.matches[&1], vec!["apple", "apple"]);
        assert_eq!(report.matches[&2], vec!["tomato", "tomato"]);
        assert_eq!(report.match_count(), 4);
    }

    #[test]
    fn test_mask_length_counts_code_points() {
        let matcher = Matcher::new();
        matcher.add(["苹果"]);
        let (redacted, _) = matcher.scan_and_redact("我爱苹果😯");
        assert_eq!(redacted, "我爱**😯");
    }

    #[test]
    fn test_empty_matcher() {
        let matcher = Matcher::new();
        assert!(matcher.is_empty());
        assert_eq!(matcher.find_first("anything"), (String::new(), 0));
        let (text, matches) = matcher.scan_and_redact("anything");
        assert_eq!(text, "anything");
        assert!(matches.is_empty());
    }

    #[test]
    fn test_add_from_lines() {
        let matcher = Matcher::new();
        let source = Cursor::new("# keywords\n傻b\r\n二手\n\n*nope\nlast");
        let failed = matcher.add_from_lines(source, 1, true).unwrap();
        assert_eq!(failed, vec!["*nope"]);

        let report = matcher.scan("你是傻b么？这么傻呢！");
        assert_eq!(report.text, "你是**么？这么傻呢！");
        assert_eq!(report.matches[&1], vec!["傻b"]);
        assert_eq!(matcher.find_first("the last one").0, "last");
    }

    #[test]
    fn test_add_from_lines_invalid_utf8_keeps_going() {
        let matcher = Matcher::new();
        let source = Cursor::new(b"apple\ncaf\xe9\ntomato\n".to_vec());
        let failed = matcher.add_from_lines(source, 0, true).unwrap();
        assert!(failed.is_empty());

        assert_eq!(matcher.find_first("tomato").0, "tomato");
        assert_eq!(matcher.find_first("apple").0, "apple");
        assert_eq!(matcher.find_first("caf\u{FFFD}").0, "caf\u{FFFD}");
    }

    struct FailingReader {
        data: Cursor<Vec<u8>>,
    }

    impl Read for FailingReader {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.data.read(buf)? {
                0 => Err(io::Error::new(io::ErrorKind::BrokenPipe, "source went away")),
                n => Ok(n),
            }
        }
    }

    #[test]
    fn test_add_from_lines_read_failure_keeps_earlier_lines() {
        let matcher = Matcher::new();
        let reader = io::BufReader::new(FailingReader {
            data: Cursor::new(b"apple\ntomato\n".to_vec()),
        });
        let err = matcher.add_from_lines(reader, 0, true).unwrap_err();
        assert_eq!(err.io_kind(), io::ErrorKind::BrokenPipe);
        assert_eq!(matcher.find_first("tomato").0, "tomato");
        assert_eq!(matcher.find_first("apple").0, "apple");
    }

    #[test]
    fn test_add_from_missing_file() {
        let matcher = Matcher::new();
        let err = matcher
            .add_from_file("/nonexistent/keywords.txt", 1, true)
            .unwrap_err();
        assert_eq!(err.io_kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_concurrent_readers_and_writer() {
        let matcher = Arc::new(Matcher::new());
        matcher.add(["apple"]);

        let writer = {
            let matcher = Arc::clone(&matcher);
            thread::spawn(move || {
                for i in 0..200 {
                    let word = format!("word{}", i);
                    matcher.add([word.as_str()]);
                    matcher.remove_many([word.as_str()]);
                }
            })
        };

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let matcher = Arc::clone(&matcher);
                thread::spawn(move || {
                    for _ in 0..200 {
                        let (text, matches) = matcher.scan_and_redact("an apple a day");
                        assert_eq!(text, "an ***** a day");
                        assert_eq!(matches[&0], vec!["apple"]);
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for reader in readers {
            reader.join().unwrap();
        }
        assert_eq!(matcher.node_count(), 5);
    }
}
