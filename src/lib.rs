/*!
 * # termguard - deterministic terminology enforcement
 *
 * A Rust library that rewrites machine-translated text so that domain terms
 * always render as the form prescribed by a glossary.
 *
 * ## Features
 *
 * - Tab-separated glossary files with comments and strict validation
 * - Longest-match-first, whole-word, case-insensitive term claiming
 * - Case-preserving replacements (UPPER, Title, lower)
 * - A position-ordered audit trail of every substitution
 * - Atomic glossary reload without interrupting running calls
 * - A translate → enforce → post-edit pipeline over pluggable services
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `terminology`: the enforcement engine:
 *   - `terminology::glossary`: glossary parsing and snapshots
 *   - `terminology::store`: the snapshot currently in service
 *   - `terminology::matcher`: single-term matching
 *   - `terminology::case`: replacement casing
 *   - `terminology::audit`: applied-term records
 *   - `terminology::enforcer`: the claim algorithm
 * - `pipeline`: translator and post-editor interfaces and the pipeline
 * - `app_config`: Configuration management
 * - `language_utils`: ISO language code utilities
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the library
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod pipeline;
pub mod terminology;

// Re-export main types for easier usage
pub use app_config::Config;
pub use errors::{AppError, ConfigError, EntryDefect, ProviderError, TranslationError};
pub use pipeline::{PostEditor, TerminologyPipeline, Translator};
pub use terminology::{
    AppliedTerm, EnforcementEngine, EnforcementResult, GlossaryEntry, GlossarySnapshot,
    GlossaryStore, LoadOptions, enforce,
};
