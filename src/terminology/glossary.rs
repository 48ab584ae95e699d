/*!
 * Glossary loading and immutable glossary snapshots.
 *
 * A glossary source is a UTF-8 text with one mapping per line:
 *
 * ```text
 * # comment
 * critical incident<TAB>incident
 * service desk<TAB>servicedesk
 * ```
 *
 * Parsing produces a [`GlossarySnapshot`], sorted longest source term first
 * (ties keep declaration order). The ordering is computed once here and is
 * never recomputed per enforcement call.
 */

use std::cmp::Reverse;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::errors::{ConfigError, EntryDefect};
use crate::terminology::matcher::{BoundaryMatcher, Matcher};

/// Default marker that starts a comment line
pub const DEFAULT_COMMENT_MARKER: &str = "#";

/// What to do when a source term is declared more than once
/// (compared case-insensitively)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The first declaration wins, later ones are ignored
    #[default]
    KeepFirst,
    /// The last declaration wins and takes the later declaration position
    KeepLast,
}

/// Options controlling how a glossary source is parsed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadOptions {
    /// Lines starting with this marker (after leading whitespace) are skipped
    pub comment_marker: String,

    /// Policy for repeated source terms
    pub duplicate_policy: DuplicatePolicy,

    /// Skip malformed lines with a warning instead of failing the load
    pub skip_malformed: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            comment_marker: DEFAULT_COMMENT_MARKER.to_string(),
            duplicate_policy: DuplicatePolicy::default(),
            skip_malformed: false,
        }
    }
}

impl LoadOptions {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.comment_marker.trim().is_empty() {
            return Err(ConfigError::InvalidOptions(
                "comment marker must not be empty".to_string(),
            ));
        }
        if self.comment_marker.contains('\t') {
            return Err(ConfigError::InvalidOptions(
                "comment marker must not contain a tab".to_string(),
            ));
        }
        Ok(())
    }
}

/// A single source → target mapping
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GlossaryEntry {
    source_term: String,
    target_term: String,
    declaration_index: usize,
    line: usize,
}

impl GlossaryEntry {
    /// Source term as written in the glossary (matched case-insensitively)
    pub fn source_term(&self) -> &str {
        &self.source_term
    }

    /// Target term in its canonical, stored casing
    pub fn target_term(&self) -> &str {
        &self.target_term
    }

    /// Position among the accepted entries in declaration order
    pub fn declaration_index(&self) -> usize {
        self.declaration_index
    }

    /// 1-based line of the glossary source this entry came from
    pub fn line(&self) -> usize {
        self.line
    }

    /// Length of the source term in characters, the sort key of a snapshot
    pub fn source_len(&self) -> usize {
        self.source_term.chars().count()
    }

    fn key(&self) -> String {
        self.source_term.to_lowercase()
    }
}

/// Size statistics of a snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GlossaryStats {
    /// Number of entries
    pub total_terms: usize,
    /// Longest source term, in characters
    pub longest_term: usize,
    /// Shortest source term, in characters
    pub shortest_term: usize,
}

/// An entry whose target would be rewritten again by a second enforcement pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdempotenceConflict<'a> {
    /// Entry whose target term contains another source term
    pub entry: &'a GlossaryEntry,
    /// Entry whose source term occurs inside that target
    pub reenforced_by: &'a GlossaryEntry,
}

/// Ordered, read-only set of glossary entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlossarySnapshot {
    entries: Vec<GlossaryEntry>,
    fingerprint: String,
}

impl GlossarySnapshot {
    /// An empty glossary: enforcement leaves every text unchanged
    pub fn empty() -> Self {
        Self::from_entries(Vec::new())
    }

    /// Parse a glossary from its text form.
    pub fn parse(source: &str, options: &LoadOptions) -> Result<Self, ConfigError> {
        options.validate()?;

        let mut builder = SnapshotBuilder::new(options.duplicate_policy);
        for (index, raw_line) in source.lines().enumerate() {
            let line = index + 1;
            if raw_line.trim().is_empty()
                || raw_line.trim_start().starts_with(options.comment_marker.as_str())
            {
                continue;
            }

            match split_entry(raw_line) {
                Ok((source_term, target_term)) => builder.push(source_term, target_term, line),
                Err(defect) if options.skip_malformed => {
                    warn!("Skipping malformed glossary line {}: {}", line, defect);
                }
                Err(defect) => return Err(ConfigError::MalformedEntry { line, defect }),
            }
        }

        Ok(builder.build())
    }

    /// Read and parse a glossary file.
    pub fn load<P: AsRef<Path>>(path: P, options: &LoadOptions) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Unreadable {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot = Self::parse(&source, options)?;
        info!(
            "Loaded {} glossary terms from {} ({})",
            snapshot.len(),
            path.display(),
            snapshot.short_fingerprint()
        );
        Ok(snapshot)
    }

    /// Build a snapshot from in-memory pairs with the default options.
    ///
    /// Pairs are validated like glossary lines; the reported line number is the
    /// 1-based position of the pair.
    pub fn from_pairs<I, S, T>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (S, T)>,
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let mut builder = SnapshotBuilder::new(DuplicatePolicy::default());
        for (index, (source_term, target_term)) in pairs.into_iter().enumerate() {
            let line = index + 1;
            let (source_term, target_term) =
                check_fields(source_term.as_ref(), target_term.as_ref())
                    .map_err(|defect| ConfigError::MalformedEntry { line, defect })?;
            builder.push(source_term, target_term, line);
        }
        Ok(builder.build())
    }

    fn from_entries(mut entries: Vec<GlossaryEntry>) -> Self {
        // Stable sort keeps declaration order between equal lengths
        entries.sort_by_key(|entry| Reverse(entry.source_len()));

        let mut hasher = Sha256::new();
        for entry in &entries {
            hasher.update(entry.source_term.as_bytes());
            hasher.update(b"\t");
            hasher.update(entry.target_term.as_bytes());
            hasher.update(b"\n");
        }
        let fingerprint = format!("{:x}", hasher.finalize());

        Self { entries, fingerprint }
    }

    /// Entries, longest source term first
    pub fn entries(&self) -> &[GlossaryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by source term, ignoring case
    pub fn get(&self, source_term: &str) -> Option<&GlossaryEntry> {
        let key = source_term.trim().to_lowercase();
        self.entries.iter().find(|entry| entry.key() == key)
    }

    /// SHA-256 over the ordered entries, identifying the snapshot contents
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// First 12 hex digits of the fingerprint, for logs
    pub fn short_fingerprint(&self) -> &str {
        &self.fingerprint[..12]
    }

    pub fn stats(&self) -> GlossaryStats {
        let lengths = self.entries.iter().map(GlossaryEntry::source_len);
        GlossaryStats {
            total_terms: self.entries.len(),
            longest_term: lengths.clone().max().unwrap_or(0),
            shortest_term: lengths.min().unwrap_or(0),
        }
    }

    /// Entries whose target contains some source term as a whole word.
    ///
    /// When this is empty, enforcing already enforced text cannot rewrite the
    /// inserted targets. Matches spanning a target and its surrounding text
    /// are not detected.
    pub fn idempotence_conflicts(&self) -> Vec<IdempotenceConflict<'_>> {
        let matcher = BoundaryMatcher;
        let mut conflicts = Vec::new();
        for entry in &self.entries {
            for other in &self.entries {
                // An identity mapping rewrites its own output to itself
                if std::ptr::eq(entry, other)
                    && entry.target_term.to_lowercase() == entry.key()
                {
                    continue;
                }
                if !matcher.find_matches(&entry.target_term, &other.source_term).is_empty() {
                    conflicts.push(IdempotenceConflict {
                        entry,
                        reenforced_by: other,
                    });
                }
            }
        }
        conflicts
    }
}

impl Default for GlossarySnapshot {
    fn default() -> Self {
        Self::empty()
    }
}

struct SnapshotBuilder {
    policy: DuplicatePolicy,
    slots: Vec<Option<GlossaryEntry>>,
    by_key: HashMap<String, usize>,
}

impl SnapshotBuilder {
    fn new(policy: DuplicatePolicy) -> Self {
        Self {
            policy,
            slots: Vec::new(),
            by_key: HashMap::new(),
        }
    }

    fn push(&mut self, source_term: String, target_term: String, line: usize) {
        let entry = GlossaryEntry {
            source_term,
            target_term,
            declaration_index: 0,
            line,
        };
        let key = entry.key();

        if let Some(&slot) = self.by_key.get(&key) {
            match self.policy {
                DuplicatePolicy::KeepFirst => {
                    warn!(
                        "Ignoring duplicate glossary term '{}' at line {}",
                        entry.source_term, line
                    );
                    return;
                }
                DuplicatePolicy::KeepLast => {
                    debug!(
                        "Glossary term '{}' at line {} overrides an earlier declaration",
                        entry.source_term, line
                    );
                    self.slots[slot] = None;
                }
            }
        }

        self.by_key.insert(key, self.slots.len());
        self.slots.push(Some(entry));
    }

    fn build(self) -> GlossarySnapshot {
        let entries = self
            .slots
            .into_iter()
            .flatten()
            .enumerate()
            .map(|(declaration_index, entry)| GlossaryEntry {
                declaration_index,
                ..entry
            })
            .collect();
        GlossarySnapshot::from_entries(entries)
    }
}

fn split_entry(line: &str) -> Result<(String, String), EntryDefect> {
    let fields: Vec<&str> = line.split('\t').collect();
    match fields.as_slice() {
        [_] => Err(EntryDefect::MissingTab),
        [source, target] => check_fields(source, target),
        _ => Err(EntryDefect::TooManyFields(fields.len())),
    }
}

fn check_fields(source: &str, target: &str) -> Result<(String, String), EntryDefect> {
    let source = source.trim();
    let target = target.trim();
    if source.is_empty() {
        return Err(EntryDefect::EmptySource);
    }
    if target.is_empty() {
        return Err(EntryDefect::EmptyTarget);
    }
    Ok((source.to_string(), target.to_string()))
}
