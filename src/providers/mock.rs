/*!
 * Mock provider implementations for testing.
 *
 * - `MockTranscriptProvider` serves caption fixtures from memory. Videos
 *   without a fixture behave like videos without captions, and translation
 *   can be switched off per language to simulate translation failures.
 * - `MockCatalog` returns a fixed playlist.
 */

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::errors::ProviderError;
use crate::providers::{FetchedTranscript, TranscriptProvider, VideoCatalog};
use crate::transcript::RawFragment;

/// Mock caption source for testing
#[derive(Debug, Default)]
pub struct MockTranscriptProvider {
    /// Caption fixtures per video, with their language code
    transcripts: HashMap<String, (String, Vec<RawFragment>)>,
    /// Languages whose translation fails
    failing_translations: HashSet<String>,
    /// Number of fetch calls, for assertions
    fetch_count: AtomicUsize,
}

impl MockTranscriptProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register captions for a video
    pub fn with_transcript(mut self, video_id: &str, language_code: &str, fragments: Vec<RawFragment>) -> Self {
        self.transcripts
            .insert(video_id.to_string(), (language_code.to_string(), fragments));
        self
    }

    /// Make translation to `language` fail
    pub fn with_failing_translation(mut self, language: &str) -> Self {
        self.failing_translations.insert(language.to_string());
        self
    }

    /// Number of fetch calls made so far
    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }

    /// Deterministic stand-in for machine translation
    pub fn translate_text(text: &str, target_language: &str) -> String {
        if text.trim().is_empty() {
            text.to_string()
        } else {
            format!("[{}] {}", target_language, text)
        }
    }
}

#[async_trait]
impl TranscriptProvider for MockTranscriptProvider {
    async fn fetch(&self, video_id: &str, languages: &[String]) -> Result<FetchedTranscript, ProviderError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        let (language_code, fragments) = self
            .transcripts
            .get(video_id)
            .ok_or_else(|| ProviderError::TranscriptsDisabled(video_id.to_string()))?;

        if !languages.iter().any(|l| l == language_code) {
            return Err(ProviderError::NoTranscriptFound {
                video_id: video_id.to_string(),
                languages: languages.to_vec(),
            });
        }

        Ok(FetchedTranscript {
            video_id: video_id.to_string(),
            language_code: language_code.clone(),
            is_generated: true,
            is_translatable: true,
            source_url: None,
            fragments: fragments.clone(),
        })
    }

    async fn translate(
        &self,
        transcript: &FetchedTranscript,
        target_language: &str,
    ) -> Result<Vec<RawFragment>, ProviderError> {
        if self.failing_translations.contains(target_language) {
            return Err(ProviderError::TranslationUnavailable {
                video_id: transcript.video_id.clone(),
                language: target_language.to_string(),
            });
        }

        Ok(transcript
            .fragments
            .iter()
            .map(|f| RawFragment::new(Self::translate_text(&f.text, target_language), f.start, f.duration))
            .collect())
    }
}

/// Mock playlist catalog
#[derive(Debug, Default)]
pub struct MockCatalog {
    video_ids: Vec<String>,
    failing: bool,
}

impl MockCatalog {
    pub fn new(video_ids: &[&str]) -> Self {
        Self {
            video_ids: video_ids.iter().map(|id| id.to_string()).collect(),
            failing: false,
        }
    }

    /// A catalog whose API always errors
    pub fn failing() -> Self {
        Self {
            video_ids: Vec::new(),
            failing: true,
        }
    }
}

#[async_trait]
impl VideoCatalog for MockCatalog {
    async fn fetch_video_ids(&self, _playlist_id: &str) -> Result<Vec<String>, ProviderError> {
        if self.failing {
            return Err(ProviderError::ApiError {
                status_code: 403,
                message: "quotaExceeded".to_string(),
            });
        }
        Ok(self.video_ids.clone())
    }
}
