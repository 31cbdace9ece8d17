/*!
 * Provider implementations for the services transcripts come from.
 *
 * This module contains client implementations for:
 * - YouTube captions: caption track discovery, download and machine translation
 * - YouTube Data API: playlist catalog paging
 * - Mock: in-memory fixtures for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;
use crate::transcript::RawFragment;

/// A caption transcript fetched for one video
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedTranscript {
    /// Video identifier
    pub video_id: String,

    /// Language code of the caption track
    pub language_code: String,

    /// Whether the track was generated by speech recognition
    pub is_generated: bool,

    /// Whether the track can be machine translated
    pub is_translatable: bool,

    /// Download URL of the track, when the provider has one
    pub source_url: Option<String>,

    /// Caption lines in time order
    pub fragments: Vec<RawFragment>,
}

/// Common trait for caption sources
///
/// Implementations must be usable from several tasks at once; each call is
/// independent of the others.
#[async_trait]
pub trait TranscriptProvider: Send + Sync + Debug {
    /// Fetch captions in the first available language of `languages`
    ///
    /// # Arguments
    /// * `video_id` - The video to fetch captions for
    /// * `languages` - Language codes in preference order
    async fn fetch(&self, video_id: &str, languages: &[String]) -> Result<FetchedTranscript, ProviderError>;

    /// Machine translate a fetched transcript
    ///
    /// # Returns
    /// * `Result<Vec<RawFragment>, ProviderError>` - The translated caption lines or an error
    async fn translate(
        &self,
        transcript: &FetchedTranscript,
        target_language: &str,
    ) -> Result<Vec<RawFragment>, ProviderError>;
}

/// Source of the video identifiers to publish
#[async_trait]
pub trait VideoCatalog: Send + Sync + Debug {
    /// List every video of a playlist, in playlist order
    async fn fetch_video_ids(&self, playlist_id: &str) -> Result<Vec<String>, ProviderError>;
}

pub mod mock;
pub mod playlist;
pub mod youtube;
