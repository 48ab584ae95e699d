/*!
 * Terminology enforcement.
 *
 * - `glossary`: glossary parsing and immutable, longest-first snapshots
 * - `store`: the swappable snapshot currently in service
 * - `matcher`: whole-word, case-insensitive matching of single terms
 * - `case`: casing of replacements
 * - `audit`: applied-term records and audit history
 * - `enforcer`: the claim algorithm and text rewriting
 */

pub mod audit;
pub mod case;
pub mod enforcer;
pub mod glossary;
pub mod matcher;
pub mod store;

pub use self::audit::{AppliedTerm, AuditCollector, AuditRecorder, AuditStatistics, AuditSummary};
pub use self::case::CaseStyle;
pub use self::enforcer::{EnforcementEngine, EnforcementResult, MatchSpan, enforce};
pub use self::glossary::{DuplicatePolicy, GlossaryEntry, GlossarySnapshot, LoadOptions};
pub use self::matcher::{BoundaryMatcher, Matcher, RegexMatcher};
pub use self::store::GlossaryStore;
