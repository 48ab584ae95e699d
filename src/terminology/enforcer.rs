/*!
 * Deterministic terminology enforcement.
 *
 * Entries are tried longest source term first. Each whole-word occurrence
 * claims its range of the input unless it intersects a range claimed earlier,
 * which lets "critical incident" win over the "incident" it contains. Claims
 * are never revoked within a call. The output is rebuilt left to right from
 * the unclaimed text and the case-adapted targets.
 *
 * Enforcement performs no I/O and never fails on text content.
 */

use std::ops::Range;

use log::{debug, trace, warn};
use serde::Serialize;

use crate::terminology::audit::{AppliedTerm, AuditRecorder, AuditSummary};
use crate::terminology::case;
use crate::terminology::glossary::{GlossaryEntry, GlossarySnapshot};
use crate::terminology::matcher::{BoundaryMatcher, Matcher};

/// A claimed region of the input text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchSpan<'a> {
    /// Entry that claimed the region
    pub entry: &'a GlossaryEntry,
    /// Byte offset where the region starts
    pub start: usize,
    /// Byte offset one past the end of the region
    pub end: usize,
    /// The claimed text
    pub matched_text: &'a str,
}

impl MatchSpan<'_> {
    fn intersects(&self, range: &Range<usize>) -> bool {
        range.start < self.end && self.start < range.end
    }
}

/// Enforced text and the substitutions that produced it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnforcementResult {
    enforced_text: String,
    applied_terms: Vec<AppliedTerm>,
}

impl EnforcementResult {
    fn new(enforced_text: String, applied_terms: Vec<AppliedTerm>) -> Self {
        Self {
            enforced_text,
            applied_terms,
        }
    }

    pub fn enforced_text(&self) -> &str {
        &self.enforced_text
    }

    /// Applied terms ordered by ascending position in the original text
    pub fn applied_terms(&self) -> &[AppliedTerm] {
        &self.applied_terms
    }

    /// True when no term was applied
    pub fn is_unchanged(&self) -> bool {
        self.applied_terms.is_empty()
    }

    /// Inserted texts a downstream editor must leave alone, without duplicates
    pub fn protected_terms(&self) -> Vec<String> {
        let mut protected: Vec<String> = Vec::new();
        for applied in &self.applied_terms {
            if !protected.contains(&applied.replacement) {
                protected.push(applied.replacement.clone());
            }
        }
        protected
    }

    pub fn summary(&self) -> AuditSummary {
        AuditSummary::from_applied(&self.applied_terms)
    }

    pub fn into_parts(self) -> (String, Vec<AppliedTerm>) {
        (self.enforced_text, self.applied_terms)
    }
}

/// Applies a glossary snapshot to text
#[derive(Debug, Default)]
pub struct EnforcementEngine<M: Matcher = BoundaryMatcher> {
    matcher: M,
}

impl EnforcementEngine<BoundaryMatcher> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: Matcher> EnforcementEngine<M> {
    /// Use a different way of locating single terms
    pub fn with_matcher(matcher: M) -> Self {
        Self { matcher }
    }

    pub fn matcher(&self) -> &M {
        &self.matcher
    }

    /// Claim non-overlapping spans, longest term first, ordered by start.
    pub fn find_spans<'a>(&self, text: &'a str, glossary: &'a GlossarySnapshot) -> Vec<MatchSpan<'a>> {
        let mut spans: Vec<MatchSpan<'a>> = Vec::new();

        for entry in glossary.entries() {
            for range in self.matcher.find_matches(text, entry.source_term()) {
                let Some(matched_text) = text.get(range.clone()).filter(|m| !m.is_empty()) else {
                    warn!(
                        "Matcher returned invalid range {:?} for '{}', ignoring it",
                        range,
                        entry.source_term()
                    );
                    continue;
                };
                if spans.iter().any(|span| span.intersects(&range)) {
                    trace!(
                        "'{}' at {}..{} overlaps an earlier claim",
                        entry.source_term(),
                        range.start,
                        range.end
                    );
                    continue;
                }
                spans.push(MatchSpan {
                    entry,
                    start: range.start,
                    end: range.end,
                    matched_text,
                });
            }
        }

        spans.sort_by_key(|span| span.start);
        spans
    }

    /// Rewrite every claimed span of `text` into its glossary target.
    pub fn enforce(&self, text: &str, glossary: &GlossarySnapshot) -> EnforcementResult {
        let spans = self.find_spans(text, glossary);
        if spans.is_empty() {
            return EnforcementResult::new(text.to_string(), Vec::new());
        }

        let mut enforced = String::with_capacity(text.len());
        let mut recorder = AuditRecorder::new();
        let mut cursor = 0;
        let mut char_offset = 0;

        for span in &spans {
            let unclaimed = &text[cursor..span.start];
            enforced.push_str(unclaimed);
            char_offset += unclaimed.chars().count();

            let replacement = case::adapt(span.entry.target_term(), span.matched_text);
            debug!(
                "Applied '{}' -> '{}' at {}",
                span.matched_text, replacement, char_offset
            );
            enforced.push_str(&replacement);
            recorder.record(span, char_offset, replacement);

            char_offset += span.matched_text.chars().count();
            cursor = span.end;
        }
        enforced.push_str(&text[cursor..]);

        EnforcementResult::new(enforced, recorder.finish())
    }

    /// Entries with at least one whole-word occurrence in `text`, in snapshot
    /// order. Overlaps are not resolved.
    pub fn applicable_terms<'g>(&self, text: &str, glossary: &'g GlossarySnapshot) -> Vec<&'g GlossaryEntry> {
        glossary
            .entries()
            .iter()
            .filter(|entry| !self.matcher.find_matches(text, entry.source_term()).is_empty())
            .collect()
    }
}

/// Enforce `glossary` on `text` with the default matcher
pub fn enforce(text: &str, glossary: &GlossarySnapshot) -> EnforcementResult {
    EnforcementEngine::new().enforce(text, glossary)
}
