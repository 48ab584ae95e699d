/*!
 * Audit trail of applied glossary terms.
 *
 * An [`AuditRecorder`] lives for exactly one enforcement call and is consumed
 * when the call returns. The [`AuditCollector`] is the optional, shared
 * history that callers may keep across calls.
 */

use std::collections::{HashSet, VecDeque};

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

use crate::terminology::enforcer::{EnforcementResult, MatchSpan};

/// One substitution made during enforcement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedTerm {
    /// Source term of the glossary entry that claimed the span
    pub source_term: String,

    /// Target term as stored in the glossary
    pub target_term: String,

    /// Text that was replaced, in its original casing
    pub matched_text: String,

    /// Character offset of the match in the original input text
    pub position: usize,

    /// Text that was inserted, after case adaptation
    pub replacement: String,
}

/// Collects the applied terms of a single enforcement call
#[derive(Debug, Default)]
pub struct AuditRecorder {
    applied: Vec<AppliedTerm>,
}

impl AuditRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a claimed span at character offset `position`
    pub fn record(&mut self, span: &MatchSpan<'_>, position: usize, replacement: String) {
        self.applied.push(AppliedTerm {
            source_term: span.entry.source_term().to_string(),
            target_term: span.entry.target_term().to_string(),
            matched_text: span.matched_text.to_string(),
            position,
            replacement,
        });
    }

    pub fn len(&self) -> usize {
        self.applied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }

    /// Close the recorder and return the applied terms by ascending position
    pub fn finish(mut self) -> Vec<AppliedTerm> {
        self.applied.sort_by_key(|applied| applied.position);
        self.applied
    }
}

/// Condensed view of one enforcement call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditSummary {
    pub total_replacements: usize,
    /// Distinct source terms applied, ignoring case
    pub unique_terms: usize,
    pub replacements: Vec<AppliedTerm>,
}

impl AuditSummary {
    pub fn from_applied(applied: &[AppliedTerm]) -> Self {
        let unique: HashSet<String> = applied
            .iter()
            .map(|term| term.source_term.to_lowercase())
            .collect();
        Self {
            total_replacements: applied.len(),
            unique_terms: unique.len(),
            replacements: applied.to_vec(),
        }
    }
}

/// A stored enforcement call
#[derive(Debug, Clone, Serialize)]
pub struct EnforcementAudit {
    pub original_text: String,
    pub enforced_text: String,
    pub applied_terms: Vec<AppliedTerm>,
    /// Fingerprint of the glossary snapshot that was used, when known
    pub glossary_fingerprint: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// Aggregate numbers over every recorded call
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuditStatistics {
    pub total_audits: usize,
    pub total_replacements: usize,
    pub unique_terms_used: usize,
    pub avg_replacements_per_audit: f64,
}

#[derive(Debug, Default)]
struct CollectorState {
    history: VecDeque<EnforcementAudit>,
    total_audits: usize,
    total_replacements: usize,
    terms_used: HashSet<String>,
}

/// Thread-safe, bounded history of enforcement calls.
///
/// Only the most recent `capacity` audits are kept; the statistics cover every
/// call recorded since creation.
#[derive(Debug)]
pub struct AuditCollector {
    capacity: usize,
    state: Mutex<CollectorState>,
}

impl AuditCollector {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            state: Mutex::new(CollectorState::default()),
        }
    }

    /// Store the outcome of one enforcement call
    pub fn record(
        &self,
        original_text: &str,
        result: &EnforcementResult,
        glossary_fingerprint: Option<&str>,
    ) {
        let audit = EnforcementAudit {
            original_text: original_text.to_string(),
            enforced_text: result.enforced_text().to_string(),
            applied_terms: result.applied_terms().to_vec(),
            glossary_fingerprint: glossary_fingerprint.map(str::to_string),
            timestamp: Utc::now(),
        };

        let mut state = self.state.lock();
        state.total_audits += 1;
        state.total_replacements += audit.applied_terms.len();
        for applied in &audit.applied_terms {
            state.terms_used.insert(applied.source_term.to_lowercase());
        }

        if self.capacity == 0 {
            return;
        }
        if state.history.len() == self.capacity {
            state.history.pop_front();
        }
        state.history.push_back(audit);
    }

    /// Up to `limit` most recent audits, oldest first
    pub fn recent(&self, limit: usize) -> Vec<EnforcementAudit> {
        let state = self.state.lock();
        let skip = state.history.len().saturating_sub(limit);
        state.history.iter().skip(skip).cloned().collect()
    }

    pub fn statistics(&self) -> AuditStatistics {
        let state = self.state.lock();
        let avg_replacements_per_audit = if state.total_audits == 0 {
            0.0
        } else {
            state.total_replacements as f64 / state.total_audits as f64
        };
        AuditStatistics {
            total_audits: state.total_audits,
            total_replacements: state.total_replacements,
            unique_terms_used: state.terms_used.len(),
            avg_replacements_per_audit,
        }
    }
}

impl Default for AuditCollector {
    fn default() -> Self {
        Self::new(100)
    }
}
