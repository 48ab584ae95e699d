/*!
 * Tests for application configuration functionality
 */

use anyhow::Result;
use termguard::app_config::{Config, LogLevel};
use termguard::terminology::DuplicatePolicy;

use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "nl");
    assert_eq!(config.glossary.path, "data/glossary.tsv");
    assert_eq!(config.glossary.comment_marker, "#");
    assert_eq!(config.glossary.duplicate_policy, DuplicatePolicy::KeepFirst);
    assert!(!config.glossary.skip_malformed);
    assert!(!config.pipeline.enable_post_editor);
    assert_eq!(config.pipeline.timeout_secs, 30);
    assert_eq!(config.audit.history_limit, 100);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.supported_source_languages.contains(&"de".to_string()));
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    config.target_language = "xyz".to_string();
    assert!(config.validate().is_err());
    config.target_language = "nl".to_string();

    config.supported_source_languages.push("??".to_string());
    assert!(config.validate().is_err());
    config.supported_source_languages.pop();

    config.glossary.path = "  ".to_string();
    assert!(config.validate().is_err());
    config.glossary.path = "glossary.tsv".to_string();

    config.glossary.comment_marker = "\t".to_string();
    assert!(config.validate().is_err());
    config.glossary.comment_marker = "//".to_string();
    assert!(config.validate().is_ok());

    config.pipeline.timeout_secs = 0;
    assert!(config.validate().is_err());
}

/// Test that partial JSON falls back to defaults
#[test]
fn test_config_deserialize_withPartialJson_shouldFillDefaults() -> Result<()> {
    let json = r#"{
        "target_language": "de",
        "glossary": { "path": "terms.tsv", "duplicate_policy": "keep_last" },
        "log_level": "debug"
    }"#;
    let config: Config = serde_json::from_str(json)?;

    assert_eq!(config.source_language, "en");
    assert_eq!(config.target_language, "de");
    assert_eq!(config.glossary.path, "terms.tsv");
    assert_eq!(config.glossary.comment_marker, "#");
    assert_eq!(config.glossary.duplicate_policy, DuplicatePolicy::KeepLast);
    assert_eq!(config.pipeline.timeout_secs, 30);
    assert_eq!(config.log_level, LogLevel::Debug);

    let options = config.glossary.load_options();
    assert_eq!(options.duplicate_policy, DuplicatePolicy::KeepLast);
    Ok(())
}

/// Test loading a missing config writes the defaults
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("termguard.json");

    let created = Config::load_or_create(&path)?;
    assert!(path.exists());

    let reloaded = Config::load_or_create(&path)?;
    assert_eq!(reloaded.glossary, created.glossary);
    assert_eq!(reloaded.target_language, created.target_language);
    Ok(())
}

/// Test that a broken config file is reported
#[test]
fn test_load_or_create_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "termguard.json", "{ not json")?;

    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}
