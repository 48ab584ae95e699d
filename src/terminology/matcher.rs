/*!
 * Whole-word, case-insensitive term matching.
 *
 * A [`Matcher`] finds the occurrences of one term in a text. The claim
 * algorithm in the enforcer only depends on this trait, so the way a single
 * term is located can change without touching longest-match-first logic.
 */

use std::collections::{HashMap, HashSet};
use std::ops::Range;

use log::{debug, warn};
use parking_lot::RwLock;
use regex::{Regex, RegexBuilder};

use crate::terminology::glossary::GlossarySnapshot;

/// Finds occurrences of a single term in a text
pub trait Matcher: Send + Sync {
    /// Byte ranges of the leftmost, non-overlapping, case-insensitive
    /// occurrences of `term` that are bounded by non-word characters or the
    /// edges of `text`.
    fn find_matches(&self, text: &str, term: &str) -> Vec<Range<usize>>;

    /// Called when `glossary` replaces the snapshot in service
    fn glossary_changed(&self, _glossary: &GlossarySnapshot) {}
}

/// Word characters are letters, digits and underscore
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Check that `range` is neither preceded nor followed by a word character
pub fn has_word_boundaries(text: &str, range: &Range<usize>) -> bool {
    let before = text[..range.start].chars().next_back();
    let after = text[range.end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

fn chars_eq_ignore_case(a: char, b: char) -> bool {
    a == b || a.to_lowercase().eq(b.to_lowercase())
}

fn next_char_len(text: &str, at: usize) -> usize {
    text[at..].chars().next().map_or(1, char::len_utf8)
}

/// Character-by-character scanner, the default matcher.
///
/// Matching compares one character of the text to one character of the term,
/// so a match always spans exactly as many characters as the term.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundaryMatcher;

impl BoundaryMatcher {
    fn match_at(text: &str, start: usize, needle: &[char]) -> Option<usize> {
        let mut chars = text[start..].char_indices();
        let mut end = start;
        for &expected in needle {
            let (offset, actual) = chars.next()?;
            if !chars_eq_ignore_case(actual, expected) {
                return None;
            }
            end = start + offset + actual.len_utf8();
        }
        Some(end)
    }
}

impl Matcher for BoundaryMatcher {
    fn find_matches(&self, text: &str, term: &str) -> Vec<Range<usize>> {
        let needle: Vec<char> = term.chars().collect();
        if needle.is_empty() {
            return Vec::new();
        }

        let mut found = Vec::new();
        let mut resume_at = 0;
        for (start, _) in text.char_indices() {
            if start < resume_at {
                continue;
            }
            if let Some(end) = Self::match_at(text, start, &needle) {
                let range = start..end;
                if has_word_boundaries(text, &range) {
                    resume_at = end;
                    found.push(range);
                }
            }
        }
        found
    }
}

/// Matcher backed by escaped, case-insensitive regular expressions.
///
/// Compiled patterns are cached per term.
#[derive(Debug, Default)]
pub struct RegexMatcher {
    patterns: RwLock<HashMap<String, Regex>>,
}

impl RegexMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    fn pattern(&self, term: &str) -> Option<Regex> {
        if let Some(pattern) = self.patterns.read().get(term) {
            return Some(pattern.clone());
        }

        match RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
        {
            Ok(pattern) => {
                self.patterns
                    .write()
                    .insert(term.to_string(), pattern.clone());
                Some(pattern)
            }
            Err(e) => {
                warn!("Cannot build a pattern for term '{}': {}", term, e);
                None
            }
        }
    }

    /// Number of compiled patterns held in the cache
    pub fn cached_patterns(&self) -> usize {
        self.patterns.read().len()
    }

    /// Drop cached patterns for terms that are not in `glossary`
    pub fn retain_terms(&self, glossary: &GlossarySnapshot) {
        let terms: HashSet<&str> = glossary.entries().iter().map(|e| e.source_term()).collect();
        let mut patterns = self.patterns.write();
        let before = patterns.len();
        patterns.retain(|term, _| terms.contains(term.as_str()));
        debug!("Dropped {} cached patterns", before - patterns.len());
    }

    pub fn clear(&self) {
        self.patterns.write().clear();
    }
}

impl Matcher for RegexMatcher {
    fn glossary_changed(&self, glossary: &GlossarySnapshot) {
        self.retain_terms(glossary);
    }

    fn find_matches(&self, text: &str, term: &str) -> Vec<Range<usize>> {
        if term.is_empty() {
            return Vec::new();
        }
        let Some(pattern) = self.pattern(term) else {
            return Vec::new();
        };

        let mut found = Vec::new();
        let mut position = 0;
        while position < text.len() {
            let Some(m) = pattern.find_at(text, position) else {
                break;
            };
            let range = m.range();
            if has_word_boundaries(text, &range) {
                position = range.end;
                found.push(range);
            } else {
                // Retry one character later so overlapping candidates are not lost
                position = range.start + next_char_len(text, range.start);
            }
        }
        found
    }
}
