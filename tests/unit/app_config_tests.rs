/*!
 * Tests for application configuration
 */

use std::fs;
use std::path::Path;

use anyhow::Result;
use subsent::app_config::{Config, LogLevel};
use subsent::errors::ConfigError;
use subsent::DEFAULT_MAX_CHARS;
use crate::common;

/// Test the default configuration values
#[test]
fn test_default_config_shouldHaveExpectedValues() {
    let config = Config::default();

    assert_eq!(config.source_language, "en");
    assert_eq!(config.source_language_preferences, vec!["en", "en-US", "en-GB"]);
    assert_eq!(config.translation_languages, vec!["ko"]);
    assert_eq!(config.merge.max_chars, DEFAULT_MAX_CHARS);
    assert_eq!(config.publish.index_path(), Path::new("./index.json"));
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
}

/// Test that a missing file is created with defaults
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("conf.json");

    let config = Config::load_or_create(&path)?;

    assert!(path.exists());
    assert_eq!(config.source_language, "en");
    let written: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path)?)?;
    assert_eq!(written["merge"]["max_chars"], 120);
    Ok(())
}

/// Test that a partial config file is completed with defaults
#[test]
fn test_load_or_create_withPartialFile_shouldFillDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{"translation_languages": ["ko", "ja"], "merge": {"max_chars": 80}, "log_level": "debug"}"#,
    )?;

    let config = Config::load_or_create(&path)?;

    assert_eq!(config.translation_languages, vec!["ko", "ja"]);
    assert_eq!(config.merge.max_chars, 80);
    assert_eq!(config.log_level, LogLevel::Debug);
    assert_eq!(config.youtube.page_size, 50);
    assert_eq!(config.publish.transcripts_dir, "transcripts");
    Ok(())
}

/// Test that malformed config files are reported
#[test]
fn test_load_or_create_withMalformedFile_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    assert!(Config::load_or_create(&path).is_err());
    Ok(())
}

/// Test that an unknown translation language fails validation
#[test]
fn test_validate_withInvalidTranslationLanguage_shouldFail() {
    let mut config = Config::default();
    config.translation_languages.push("klingon".to_string());

    assert!(matches!(config.validate(), Err(ConfigError::InvalidLanguage(code)) if code == "klingon"));
}

/// Test that a zero threshold fails validation
#[test]
fn test_validate_withZeroMaxChars_shouldFail() {
    let mut config = Config::default();
    config.merge.max_chars = 0;

    assert!(matches!(config.validate(), Err(ConfigError::InvalidMaxChars)));
}

/// Test that every missing publish setting is reported at once
#[test]
fn test_validate_for_publish_withNoSecrets_shouldListAllMissing() {
    let config = Config::default();

    let error = config.validate_for_publish().unwrap_err();

    match &error {
        ConfigError::MissingSettings(names) => assert_eq!(
            names,
            &vec!["YOUTUBE_API_KEY", "YOUTUBE_PLAYLIST_ID", "GITHUB_PAGES_BASE_URL"]
        ),
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(error.to_string().contains("YOUTUBE_PLAYLIST_ID"));
}

/// Test that an unparsable base URL is rejected
#[test]
fn test_validate_for_publish_withRelativeBaseUrl_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let mut config = common::publish_config(temp_dir.path());
    config.publish.base_url = "lectures/transcripts".to_string();

    assert!(matches!(
        config.validate_for_publish(),
        Err(ConfigError::InvalidBaseUrl { .. })
    ));
    Ok(())
}

/// Test published URLs and paths
#[test]
fn test_publish_paths_withTrailingSlash_shouldJoinCleanly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = common::publish_config(temp_dir.path());

    assert!(config.validate_for_publish().is_ok());
    assert_eq!(
        config.publish.transcript_url("ko", "abc123"),
        "https://example.github.io/lectures/transcripts/ko/abc123.json"
    );
    assert_eq!(
        config.publish.transcript_path("en", "abc123"),
        temp_dir.path().join("transcripts").join("en").join("abc123.json")
    );
    Ok(())
}
