/*!
 * Error types for the termguard library.
 *
 * This module contains custom error types for different parts of the library,
 * using the thiserror crate for ergonomic error definitions.
 *
 * Enforcement itself has no error type: it is total over any input text.
 * Failures only surface while loading a glossary or while talking to the
 * external translation and post-editing collaborators.
 */

use std::path::PathBuf;

use thiserror::Error;

/// Reasons a glossary data line is rejected
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EntryDefect {
    /// The line has no tab separator
    #[error("expected 2 tab-separated fields (source<TAB>target), found no tab")]
    MissingTab,

    /// The line has more than two fields
    #[error("expected 2 tab-separated fields (source<TAB>target), found {0}")]
    TooManyFields(usize),

    /// The source field is empty after trimming
    #[error("source term is empty")]
    EmptySource,

    /// The target field is empty after trimming
    #[error("target term is empty")]
    EmptyTarget,
}

/// Errors raised while building a glossary snapshot
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The glossary source could not be read
    #[error("Unable to read glossary {path:?}: {source}")]
    Unreadable {
        /// Path of the glossary file
        path: PathBuf,
        /// Underlying I/O failure
        #[source]
        source: std::io::Error,
    },

    /// A data line does not hold exactly two non-empty fields
    #[error("Malformed glossary entry at line {line}: {defect}")]
    MalformedEntry {
        /// 1-based line number in the glossary source
        line: usize,
        /// What is wrong with the line
        defect: EntryDefect,
    },

    /// The load options themselves are unusable
    #[error("Invalid glossary options: {0}")]
    InvalidOptions(String),
}

/// Errors that can occur when calling an external provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making a request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// The provider did not answer in time
    #[error("Provider timed out after {0}s")]
    Timeout(u64),
}

/// Errors that can occur while running the translation pipeline
#[derive(Error, Debug)]
pub enum TranslationError {
    /// Error from the translation provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// The requested source language is not enabled
    #[error("Unsupported source language: {0}")]
    UnsupportedLanguage(String),
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error while loading the glossary
    #[error("Glossary error: {0}")]
    Config(#[from] ConfigError),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
