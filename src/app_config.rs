use anyhow::{Context, Result, anyhow};
use log::{LevelFilter, warn};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::terminology::audit::AuditCollector;
use crate::terminology::glossary::{DEFAULT_COMMENT_MARKER, DuplicatePolicy, LoadOptions};

/// Application configuration module
/// This module handles loading, validating and saving the termguard
/// configuration file.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Default source language code (ISO)
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code (ISO) the glossary targets are written in
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// Source languages accepted by the pipeline; empty accepts any
    #[serde(default = "default_supported_source_languages")]
    pub supported_source_languages: Vec<String>,

    /// Glossary config
    #[serde(default)]
    pub glossary: GlossaryConfig,

    /// Pipeline config
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Audit history config
    #[serde(default)]
    pub audit: AuditConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Where the glossary lives and how it is parsed
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GlossaryConfig {
    /// Path to the tab-separated glossary file
    #[serde(default = "default_glossary_path")]
    pub path: String,

    /// Lines starting with this marker are comments
    #[serde(default = "default_comment_marker")]
    pub comment_marker: String,

    /// Which declaration wins for repeated source terms
    #[serde(default)]
    pub duplicate_policy: DuplicatePolicy,

    /// Skip malformed lines with a warning instead of refusing the glossary
    #[serde(default)]
    pub skip_malformed: bool,
}

impl Default for GlossaryConfig {
    fn default() -> Self {
        Self {
            path: default_glossary_path(),
            comment_marker: default_comment_marker(),
            duplicate_policy: DuplicatePolicy::default(),
            skip_malformed: false,
        }
    }
}

impl GlossaryConfig {
    pub fn load_options(&self) -> LoadOptions {
        LoadOptions {
            comment_marker: self.comment_marker.clone(),
            duplicate_policy: self.duplicate_policy,
            skip_malformed: self.skip_malformed,
        }
    }
}

/// Settings of the translate → enforce → post-edit pipeline
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Run the fluency post-editor after enforcement
    #[serde(default)]
    pub enable_post_editor: bool,

    /// Timeout for each external call, in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            enable_post_editor: false,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Audit history settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AuditConfig {
    /// Number of recent enforcement calls kept in memory
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
}

impl AuditConfig {
    /// Collector keeping the configured number of recent calls
    pub fn collector(&self) -> AuditCollector {
        AuditCollector::new(self.history_limit)
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
        }
    }
}

/// Log level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_target_language() -> String {
    "nl".to_string()
}

fn default_supported_source_languages() -> Vec<String> {
    ["de", "fr", "pl", "es", "it", "en"]
        .iter()
        .map(|code| code.to_string())
        .collect()
}

fn default_glossary_path() -> String {
    "data/glossary.tsv".to_string()
}

fn default_comment_marker() -> String {
    DEFAULT_COMMENT_MARKER.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_history_limit() -> usize {
    100
}

impl Config {
    /// Read a JSON config file, or write and return the defaults when the
    /// file does not exist yet
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path)
                .with_context(|| format!("Failed to open config file: {}", path.display()))?;
            let config: Config = serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            return Ok(config);
        }

        warn!("Config file not found at '{}', creating default config.", path.display());
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(path, config_json)
            .with_context(|| format!("Failed to write default config to file: {}", path.display()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let _source_name = crate::language_utils::get_language_name(&self.source_language)?;
        let _target_name = crate::language_utils::get_language_name(&self.target_language)?;

        for code in &self.supported_source_languages {
            crate::language_utils::validate_language_code(code)
                .with_context(|| format!("Invalid entry in supported_source_languages: '{}'", code))?;
        }

        if self.glossary.path.trim().is_empty() {
            return Err(anyhow!("Glossary path must not be empty"));
        }
        if self.glossary.comment_marker.trim().is_empty() {
            return Err(anyhow!("Glossary comment marker must not be empty"));
        }
        if self.glossary.comment_marker.contains('\t') {
            return Err(anyhow!("Glossary comment marker must not contain a tab"));
        }

        if self.pipeline.timeout_secs == 0 {
            return Err(anyhow!("Pipeline timeout must be at least one second"));
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: default_source_language(),
            target_language: default_target_language(),
            supported_source_languages: default_supported_source_languages(),
            glossary: GlossaryConfig::default(),
            pipeline: PipelineConfig::default(),
            audit: AuditConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
