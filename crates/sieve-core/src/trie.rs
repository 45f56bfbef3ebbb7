//! Pattern trie over normalized code points.
//!
//! Each node stands for one normalized code point position shared by every
//! pattern with that prefix. A node that ends a pattern carries a
//! [`Terminal`] with the pattern's tag and auto-replace flag.
//!
//! Every literal [`MASK`] in a pattern occupies its own trie level and
//! matches any single normalized character at that depth during search.

use crate::normalize::{normalize, MASK};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Flags stored on a node where some pattern ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Terminal {
    /// Caller-defined group for the pattern.
    pub tag: u8,
    /// Whether matches ending here are masked during redaction.
    pub auto_replace: bool,
}

/// A single trie node. Children are owned by value.
#[derive(Debug, Clone, Default)]
pub struct TrieNode {
    terminal: Option<Terminal>,
    children: HashMap<char, TrieNode>,
}

impl TrieNode {
    /// The terminal flags, if some pattern ends exactly here.
    pub fn terminal(&self) -> Option<Terminal> {
        self.terminal
    }

    /// Whether some pattern ends exactly here.
    pub fn is_terminal(&self) -> bool {
        self.terminal.is_some()
    }

    /// Child for a normalized code point.
    pub fn child(&self, key: char) -> Option<&TrieNode> {
        self.children.get(&key)
    }

    /// Number of direct children.
    pub fn child_count(&self) -> usize {
        self.children.len()
    }

    /// Not terminal and no children: nothing depends on this node.
    fn is_dead(&self) -> bool {
        self.terminal.is_none() && self.children.is_empty()
    }
}

/// A confirmed match: `[start, end)` in code-point indices of the searched sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hit {
    /// Index of the first matched code point.
    pub start: usize,
    /// One past the index of the last matched code point.
    pub end: usize,
    /// Tag of the matching pattern.
    pub tag: u8,
    /// Whether the matching pattern is masked during redaction.
    pub auto_replace: bool,
}

impl Hit {
    /// Number of code points covered by the match.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the match covers no code points.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Prefix tree of tagged keyword patterns.
#[derive(Debug, Clone, Default)]
pub struct PatternTrie {
    root: TrieNode,
}

impl PatternTrie {
    /// Create an empty trie.
    pub fn new() -> Self {
        Self::default()
    }

    /// The root node. It is never terminal.
    pub fn root(&self) -> &TrieNode {
        &self.root
    }

    /// Whether no pattern path exists at all.
    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Total number of nodes below the root.
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        let mut stack: Vec<&TrieNode> = vec![&self.root];
        while let Some(node) = stack.pop() {
            count += node.children.len();
            stack.extend(node.children.values());
        }
        count
    }

    /// Insert a pattern.
    ///
    /// Returns `true` when the pattern was installed, or when the line was
    /// empty or a `#` comment (accepted no-ops). Returns `false` when the
    /// pattern is rejected:
    /// - it starts with a skipped character or with the wildcard;
    /// - it is longer than one code point yet carries fewer than two
    ///   matchable characters (a single character dressed in punctuation
    ///   would otherwise fire on that character everywhere).
    ///
    /// Re-inserting an existing pattern overwrites its tag and flag.
    pub fn insert(&mut self, pattern: &str, tag: u8, auto_replace: bool) -> bool {
        let pattern = pattern.trim();
        let mut chars = pattern.chars();
        let Some(first) = chars.next() else {
            return true;
        };
        if first == '#' {
            return true;
        }

        // The path is validated in full before any node is created, so a
        // rejected pattern never leaves a partial branch behind.
        let mut path = Vec::new();
        if let Some(key) = normalize(first).filter(|&k| k != MASK) {
            path.push(key);
            path.extend(chars.filter_map(normalize));
        }

        let length = pattern.chars().count();
        if length > 1 && path.len() < 2 {
            tracing::debug!(pattern, real = path.len(), "pattern too short after normalization");
            return false;
        }
        if path.is_empty() {
            return false;
        }

        let mut node = &mut self.root;
        for key in path {
            node = node.children.entry(key).or_default();
        }
        node.terminal = Some(Terminal { tag, auto_replace });
        true
    }

    /// Remove a pattern by its literal characters.
    ///
    /// The literal is walked as-is, without normalization, so it must spell
    /// the stored keys exactly (lowercase ASCII, no punctuation). Clears the
    /// terminal flag at the end of the path and prunes every ancestor left
    /// with neither children nor a terminal flag.
    ///
    /// Returns `false` if the literal path does not exist.
    pub fn remove(&mut self, literal: &str) -> bool {
        let path: Vec<char> = literal.chars().collect();
        remove_path(&mut self.root, &path)
    }

    /// Leftmost-longest search over a code-point sequence.
    ///
    /// Skipped characters are invisible to the walk. When the exact
    /// transition fails below the root, the wildcard child is tried. Once a
    /// match has been confirmed, the first failed transition ends the scan.
    /// A failed tentative match re-examines the failing position once as a
    /// fresh start.
    pub fn search(&self, seq: &[char]) -> Option<Hit> {
        let root = &self.root;
        let mut cursor = root;
        let mut start: Option<usize> = None;
        let mut confirmed: Option<Hit> = None;

        let mut i = 0;
        while i < seq.len() {
            let Some(key) = normalize(seq[i]) else {
                i += 1;
                continue;
            };

            let next = match cursor.child(key) {
                Some(node) => Some(node),
                None if !std::ptr::eq(cursor, root) => cursor.child(MASK),
                None => None,
            };

            match next {
                None => {
                    if confirmed.is_some() {
                        break;
                    }
                    cursor = root;
                    if start.take().is_some() {
                        // Same position, this time as a possible start.
                        continue;
                    }
                }
                Some(node) => {
                    cursor = node;
                    let begin = *start.get_or_insert(i);
                    if let Some(terminal) = node.terminal {
                        confirmed = Some(Hit {
                            start: begin,
                            end: i + 1,
                            tag: terminal.tag,
                            auto_replace: terminal.auto_replace,
                        });
                        if node.children.is_empty() {
                            break;
                        }
                    }
                }
            }
            i += 1;
        }

        confirmed
    }
}

fn remove_path(node: &mut TrieNode, path: &[char]) -> bool {
    let Some((key, rest)) = path.split_first() else {
        node.terminal = None;
        return true;
    };
    let Some(child) = node.children.get_mut(key) else {
        return false;
    };
    if !remove_path(child, rest) {
        return false;
    }
    if child.is_dead() {
        node.children.remove(key);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn found(trie: &PatternTrie, text: &str) -> Option<String> {
        let seq = chars(text);
        trie.search(&seq)
            .map(|hit| seq[hit.start..hit.end].iter().collect())
    }

    #[test]
    fn test_empty_and_comment_lines_accepted() {
        let mut trie = PatternTrie::new();
        assert!(trie.insert("", 1, true));
        assert!(trie.insert("   \n", 1, true));
        assert!(trie.insert("# a comment", 1, true));
        assert!(trie.is_empty());
        assert!(!trie.root().is_terminal());
    }

    #[test]
    fn test_rejects_wildcard_or_skipped_start() {
        let mut trie = PatternTrie::new();
        assert!(!trie.insert("*abc", 0, true));
        assert!(!trie.insert("!abc", 0, true));
        assert!(!trie.insert("*", 0, true));
        assert!(!trie.insert("!", 0, true));
        assert!(trie.is_empty());
    }

    #[test]
    fn test_rejects_single_char_with_punctuation() {
        let mut trie = PatternTrie::new();
        assert!(!trie.insert("a!", 0, true));
        assert!(!trie.insert("傻！", 0, true));
        assert!(!trie.insert("x...", 0, true));
        assert!(trie.is_empty(), "rejected patterns leave no nodes");
    }

    #[test]
    fn test_single_char_pattern_accepted() {
        let mut trie = PatternTrie::new();
        assert!(trie.insert("a", 3, false));
        let node = trie.root().child('a').unwrap();
        assert_eq!(node.terminal(), Some(Terminal { tag: 3, auto_replace: false }));
    }

    #[test]
    fn test_insert_normalizes_keys() {
        let mut trie = PatternTrie::new();
        assert!(trie.insert("  Foo-Bar \n", 2, true));
        assert_eq!(trie.node_count(), 6);
        let mut node = trie.root();
        for key in "foobar".chars() {
            node = node.child(key).unwrap();
        }
        assert!(node.is_terminal());
    }

    #[test]
    fn test_reinsert_overwrites_flags() {
        let mut trie = PatternTrie::new();
        trie.insert("tomato", 1, true);
        trie.insert("tomato", 7, false);
        let hit = trie.search(&chars("tomato")).unwrap();
        assert_eq!(hit.tag, 7);
        assert!(!hit.auto_replace);
        assert_eq!(trie.node_count(), 6);
    }

    #[test]
    fn test_remove_prunes_dead_branch() {
        let mut trie = PatternTrie::new();
        trie.insert("grape", 0, true);
        trie.insert("grain", 0, true);
        assert_eq!(trie.node_count(), 7);

        assert!(trie.remove("grape"));
        assert_eq!(trie.node_count(), 5);
        assert_eq!(found(&trie, "grape"), None);
        assert_eq!(found(&trie, "grain"), Some("grain".to_string()));

        assert!(trie.remove("grain"));
        assert!(trie.is_empty());
    }

    #[test]
    fn test_remove_keeps_terminal_ancestor() {
        let mut trie = PatternTrie::new();
        trie.insert("app", 0, true);
        trie.insert("apple", 0, true);
        assert!(trie.remove("apple"));
        assert_eq!(trie.node_count(), 3);
        assert_eq!(found(&trie, "apple"), Some("app".to_string()));
    }

    #[test]
    fn test_remove_prefix_keeps_longer_pattern() {
        let mut trie = PatternTrie::new();
        trie.insert("app", 0, true);
        trie.insert("apple", 0, true);
        assert!(trie.remove("app"));
        assert_eq!(trie.node_count(), 5);
        assert_eq!(found(&trie, "app"), None);
        assert_eq!(found(&trie, "apple"), Some("apple".to_string()));
    }

    #[test]
    fn test_remove_absent_literal() {
        let mut trie = PatternTrie::new();
        trie.insert("tomato", 0, true);
        assert!(!trie.remove("potato"));
        assert!(!trie.remove("tomatoes"));
        assert_eq!(trie.node_count(), 6);
    }

    #[test]
    fn test_remove_is_literal_not_normalized() {
        let mut trie = PatternTrie::new();
        trie.insert("Tomato", 0, true);
        assert!(!trie.remove("Tomato"));
        assert_eq!(found(&trie, "tomato"), Some("tomato".to_string()));
        assert!(trie.remove("tomato"));
        assert!(trie.is_empty());
    }

    #[test]
    fn test_search_longest_match_wins() {
        let mut trie = PatternTrie::new();
        trie.insert("ab", 1, true);
        trie.insert("abc", 2, true);
        let hit = trie.search(&chars("xxabcx")).unwrap();
        assert_eq!((hit.start, hit.end, hit.tag), (2, 5, 2));
    }

    #[test]
    fn test_search_commits_to_confirmed_match() {
        let mut trie = PatternTrie::new();
        trie.insert("ab", 1, true);
        trie.insert("abcd", 2, true);
        let hit = trie.search(&chars("abcx")).unwrap();
        assert_eq!((hit.start, hit.end, hit.tag), (0, 2, 1));
    }

    #[test]
    fn test_search_skips_punctuation_inside_match() {
        let mut trie = PatternTrie::new();
        trie.insert("spam", 0, true);
        let seq = chars("no s.p-a m here");
        let hit = trie.search(&seq).unwrap();
        assert_eq!((hit.start, hit.end), (3, 10));
    }

    #[test]
    fn test_search_case_insensitive_ascii() {
        let mut trie = PatternTrie::new();
        trie.insert("spam", 0, true);
        assert_eq!(found(&trie, "SpAm!"), Some("SpAm".to_string()));
    }

    #[test]
    fn test_search_restarts_at_failing_position() {
        let mut trie = PatternTrie::new();
        trie.insert("ab", 0, true);
        // "a" starts a tentative match, the second "a" breaks it and is
        // re-examined as a fresh start.
        let hit = trie.search(&chars("aab")).unwrap();
        assert_eq!((hit.start, hit.end), (1, 3));
    }

    #[test]
    fn test_search_match_at_index_zero() {
        let mut trie = PatternTrie::new();
        trie.insert("x", 0, true);
        let hit = trie.search(&chars("xyz")).unwrap();
        assert_eq!((hit.start, hit.end), (0, 1));
    }

    #[test]
    fn test_wildcard_gap_count() {
        let mut trie = PatternTrie::new();
        trie.insert("a*b", 0, true);
        assert_eq!(found(&trie, "axb"), Some("axb".to_string()));
        assert_eq!(found(&trie, "a中b"), Some("a中b".to_string()));
        assert_eq!(found(&trie, "ab"), None);
        assert_eq!(found(&trie, "axxb"), None);
    }

    #[test]
    fn test_wildcard_is_a_fallback() {
        let mut trie = PatternTrie::new();
        trie.insert("ab", 1, true);
        trie.insert("a*c", 2, true);
        assert_eq!(trie.search(&chars("ab")).map(|h| h.tag), Some(1));
        assert_eq!(trie.search(&chars("azc")).map(|h| h.tag), Some(2));
    }

    #[test]
    fn test_search_empty_inputs() {
        let trie = PatternTrie::new();
        assert_eq!(trie.search(&[]), None);
        assert_eq!(trie.search(&chars("anything")), None);
    }
}
