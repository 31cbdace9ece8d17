use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{warn, LevelFilter};
use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::language_utils;
use crate::segmentation::DEFAULT_MAX_CHARS;

/// Application configuration module
///
/// This module handles the application configuration including loading,
/// validating and saving configuration settings. Secrets are normally left
/// empty in the file and supplied through the environment instead.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// YouTube Data API and caption settings
    #[serde(default)]
    pub youtube: YouTubeConfig,

    /// Output and publishing settings
    #[serde(default)]
    pub publish: PublishConfig,

    /// Language key under which source transcripts are published
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Caption languages to look for, in preference order
    #[serde(default = "default_source_language_preferences")]
    pub source_language_preferences: Vec<String>,

    /// Languages to machine translate the source captions into
    #[serde(default = "default_translation_languages")]
    pub translation_languages: Vec<String>,

    /// Sentence merging settings
    #[serde(default)]
    pub merge: MergeConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// YouTube access configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct YouTubeConfig {
    // @field: Data API key (YOUTUBE_API_KEY)
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Playlist to publish (YOUTUBE_PLAYLIST_ID)
    #[serde(default = "String::new")]
    pub playlist_id: String,

    // @field: Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Playlist items per page, at most 50
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            playlist_id: String::new(),
            timeout_secs: default_timeout_secs(),
            page_size: default_page_size(),
        }
    }
}

/// Publishing configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PublishConfig {
    /// Public base URL the output directory is served from (GITHUB_PAGES_BASE_URL)
    #[serde(default = "String::new")]
    pub base_url: String,

    /// Directory that receives the index and the transcripts folder
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Name of the transcripts folder, also used in published URLs
    #[serde(default = "default_transcripts_dir")]
    pub transcripts_dir: String,

    /// Name of the index file
    #[serde(default = "default_index_file")]
    pub index_file: String,

    /// Number of videos processed at the same time
    #[serde(default = "default_concurrent_videos")]
    pub concurrent_videos: usize,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            output_dir: default_output_dir(),
            transcripts_dir: default_transcripts_dir(),
            index_file: default_index_file(),
            concurrent_videos: default_concurrent_videos(),
        }
    }
}

impl PublishConfig {
    /// Base URL without trailing slashes
    pub fn normalized_base_url(&self) -> &str {
        self.base_url.trim().trim_end_matches('/')
    }

    /// Public URL of one published transcript
    pub fn transcript_url(&self, language: &str, video_id: &str) -> String {
        format!(
            "{}/{}/{}/{}.json",
            self.normalized_base_url(),
            self.transcripts_dir,
            language,
            video_id
        )
    }

    /// Local path of one published transcript
    pub fn transcript_path(&self, language: &str, video_id: &str) -> PathBuf {
        self.output_dir
            .join(&self.transcripts_dir)
            .join(language)
            .join(format!("{}.json", video_id))
    }

    /// Local path of the index file
    pub fn index_path(&self) -> PathBuf {
        self.output_dir.join(&self.index_file)
    }
}

/// Sentence merging configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MergeConfig {
    /// Character count that forces a sentence flush
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn default_timeout_secs() -> u64 {
    15
}

fn default_page_size() -> u32 {
    50
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_transcripts_dir() -> String {
    "transcripts".to_string()
}

fn default_index_file() -> String {
    "index.json".to_string()
}

fn default_concurrent_videos() -> usize {
    4
}

fn default_max_chars() -> usize {
    DEFAULT_MAX_CHARS
}

fn default_source_language() -> String {
    "en".to_string()
}

fn default_source_language_preferences() -> Vec<String> {
    vec!["en".to_string(), "en-US".to_string(), "en-GB".to_string()]
}

fn default_translation_languages() -> Vec<String> {
    vec!["ko".to_string()]
}

impl Config {
    /// Load the configuration file, writing a default one when it does not exist
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

    /// Validate settings shared by every command
    pub fn validate(&self) -> Result<(), ConfigError> {
        language_utils::validate_language_code(&self.source_language)?;
        for code in self
            .source_language_preferences
            .iter()
            .chain(&self.translation_languages)
        {
            language_utils::validate_language_code(code)?;
        }

        if self.merge.max_chars == 0 {
            return Err(ConfigError::InvalidMaxChars);
        }

        Ok(())
    }

    /// Validate everything the publish workflow needs, reporting all missing settings at once
    pub fn validate_for_publish(&self) -> Result<(), ConfigError> {
        self.validate()?;

        let missing: Vec<String> = [
            ("YOUTUBE_API_KEY", &self.youtube.api_key),
            ("YOUTUBE_PLAYLIST_ID", &self.youtube.playlist_id),
            ("GITHUB_PAGES_BASE_URL", &self.publish.base_url),
        ]
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name.to_string())
        .collect();

        if !missing.is_empty() {
            return Err(ConfigError::MissingSettings(missing));
        }

        let base_url = self.publish.normalized_base_url();
        url::Url::parse(base_url).map_err(|e| ConfigError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            youtube: YouTubeConfig::default(),
            publish: PublishConfig::default(),
            source_language: default_source_language(),
            source_language_preferences: default_source_language_preferences(),
            translation_languages: default_translation_languages(),
            merge: MergeConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}
