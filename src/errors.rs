/*!
 * Error types for the subsent application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions. The sentence
 * segmentation core has no error cases of its own.
 */

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when talking to the catalog or caption services
#[derive(Error, Debug)]
pub enum ProviderError {
    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

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

    /// The video does not exist, is private or cannot be played
    #[error("Video unavailable: {0}")]
    VideoUnavailable(String),

    /// The video has captions turned off
    #[error("Transcripts are disabled for video {0}")]
    TranscriptsDisabled(String),

    /// None of the requested languages has a caption track
    #[error("No transcript found for video {video_id} in languages [{}]", .languages.join(", "))]
    NoTranscriptFound {
        /// Video identifier
        video_id: String,
        /// Requested language codes, in preference order
        languages: Vec<String>,
    },

    /// The caption track cannot be machine translated to the requested language
    #[error("Transcript of video {video_id} cannot be translated to {language}")]
    TranslationUnavailable {
        /// Video identifier
        video_id: String,
        /// Requested target language
        language: String,
    },
}

impl ProviderError {
    /// Whether the error means the video simply has no usable captions
    pub fn is_transcript_unavailable(&self) -> bool {
        matches!(
            self,
            Self::VideoUnavailable(_) | Self::TranscriptsDisabled(_) | Self::NoTranscriptFound { .. }
        )
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_connect() || error.is_timeout() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors that can occur while reading or writing transcript files
#[derive(Error, Debug)]
pub enum TranscriptError {
    /// Error accessing a transcript file
    #[error("I/O error on {path:?}: {source}")]
    Io {
        /// File that could not be accessed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Malformed transcript JSON
    #[error("Invalid transcript JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors reported by configuration validation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Required settings are empty
    #[error("Missing required settings: {}", .0.join(", "))]
    MissingSettings(Vec<String>),

    /// A language code is not a known ISO 639 code
    #[error("Invalid language code: {0}")]
    InvalidLanguage(String),

    /// The public base URL cannot be parsed
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl {
        /// Offending value
        url: String,
        /// Parser message
        reason: String,
    },

    /// The sentence length threshold must be positive
    #[error("max_chars must be a positive integer")]
    InvalidMaxChars,
}
