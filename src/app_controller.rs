use anyhow::{anyhow, Context, Result};
use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::file_utils::FileManager;
use crate::language_utils;
use crate::providers::playlist::PlaylistClient;
use crate::providers::youtube::YouTubeTranscripts;
use crate::providers::{TranscriptProvider, VideoCatalog};
use crate::segmentation::SentenceMerger;
use crate::transcript::{self, IndexEntry, SentenceSegment, TranscriptUrls};

// @module: Application controller for transcript publishing

/// Suffix of files written by the offline merge
pub const SENTENCES_SUFFIX: &str = "sentences";

/// Sentence transcripts of one video, source language first
#[derive(Debug, Clone, PartialEq)]
pub struct VideoTranscripts {
    pub video_id: String,
    pub sentences: Vec<(String, Vec<SentenceSegment>)>,
}

/// Outcome of one publish run
#[derive(Debug, Clone, PartialEq)]
pub struct PublishSummary {
    /// Videos listed in the playlist
    pub playlist_items: usize,
    /// Entries written to the index
    pub index_entries: Vec<IndexEntry>,
    /// Where the index was written
    pub index_path: PathBuf,
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Playlist source
    catalog: Arc<dyn VideoCatalog>,
    // @field: Caption source
    provider: Arc<dyn TranscriptProvider>,
    // @field: Sentence merger configured from `config.merge`
    merger: SentenceMerger,
}

impl Controller {
    // @method: Create a controller talking to YouTube
    pub fn with_config(config: Config) -> Self {
        let catalog = Arc::new(PlaylistClient::new(
            config.youtube.api_key.clone(),
            config.youtube.timeout_secs,
            config.youtube.page_size,
        ));
        let provider = Arc::new(YouTubeTranscripts::new(config.youtube.timeout_secs));

        Self::with_providers(config, catalog, provider)
    }

    // @method: Create a controller with explicit providers
    pub fn with_providers(
        config: Config,
        catalog: Arc<dyn VideoCatalog>,
        provider: Arc<dyn TranscriptProvider>,
    ) -> Self {
        let merger = SentenceMerger::new(config.merge.max_chars);
        Self {
            config,
            catalog,
            provider,
            merger,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Fetch, merge and publish every transcript of the configured playlist.
    ///
    /// The index is regenerated from scratch on every run. Videos without
    /// captions are skipped; a failed translation only drops that language.
    pub async fn run_publish(&self) -> Result<PublishSummary> {
        let start_time = Instant::now();

        let video_ids = self
            .catalog
            .fetch_video_ids(&self.config.youtube.playlist_id)
            .await
            .context("Failed to fetch playlist items")?;
        info!("playlist items: {}", video_ids.len());

        let progress_bar = Self::progress_bar(video_ids.len() as u64, "videos");
        progress_bar.set_message("Fetching transcripts");

        // Videos are independent; `buffered` keeps results in playlist order
        let results: Vec<Option<VideoTranscripts>> = stream::iter(video_ids.iter())
            .map(|video_id| self.process_video(video_id))
            .buffered(self.config.publish.concurrent_videos.max(1))
            .inspect(|_| progress_bar.inc(1))
            .collect()
            .await;
        progress_bar.finish_and_clear();

        let mut index_entries = Vec::new();
        for transcripts in results.into_iter().flatten() {
            if let Some(entry) = self.save_video(&transcripts)? {
                info!(
                    "saved transcript for {}: {}",
                    entry.video_id,
                    entry.transcript_urls.languages().collect::<Vec<_>>().join(", ")
                );
                index_entries.push(entry);
            }
        }

        let index_path = self.config.publish.index_path();
        transcript::save_json(&index_path, &index_entries)
            .with_context(|| format!("Failed to write index: {:?}", index_path))?;

        info!(
            "Update complete: {} of {} videos published in {}",
            index_entries.len(),
            video_ids.len(),
            Self::format_duration(start_time.elapsed())
        );

        Ok(PublishSummary {
            playlist_items: video_ids.len(),
            index_entries,
            index_path,
        })
    }

    /// Fetch one video's captions and merge them into sentences, plus translations.
    ///
    /// Returns `None` when the source captions cannot be fetched or are not
    /// in the source language they would be published under.
    pub async fn process_video(&self, video_id: &str) -> Option<VideoTranscripts> {
        let fetched = match self
            .provider
            .fetch(video_id, &self.config.source_language_preferences)
            .await
        {
            Ok(fetched) => fetched,
            Err(e) if e.is_transcript_unavailable() => {
                warn!("Skipping {}, transcript unavailable: {}", video_id, e);
                return None;
            }
            Err(e) => {
                error!("Failed to fetch transcript for {}: {}", video_id, e);
                return None;
            }
        };

        if !language_utils::language_codes_match(&fetched.language_code, &self.config.source_language) {
            warn!(
                "Skipping {}, captions are in {} but are published as {}",
                video_id, fetched.language_code, self.config.source_language
            );
            return None;
        }

        debug!(
            "Fetched {} fragments for {} in {}",
            fetched.fragments.len(),
            video_id,
            fetched.language_code
        );

        let mut sentences = vec![(
            self.config.source_language.clone(),
            self.merger.merge(&fetched.fragments),
        )];

        for language in &self.config.translation_languages {
            match self.provider.translate(&fetched, language).await {
                Ok(fragments) => sentences.push((language.clone(), self.merger.merge(&fragments))),
                Err(e) => warn!("Could not translate {} to {}: {}", video_id, language, e),
            }
        }

        Some(VideoTranscripts {
            video_id: video_id.to_string(),
            sentences,
        })
    }

    /// Write a video's non-empty transcripts and build its index entry
    pub fn save_video(&self, transcripts: &VideoTranscripts) -> Result<Option<IndexEntry>> {
        let publish = &self.config.publish;
        let mut urls = TranscriptUrls::new();

        for (language, sentences) in &transcripts.sentences {
            if sentences.is_empty() {
                debug!("No sentences for {} in {}, not saving", transcripts.video_id, language);
                continue;
            }

            let path = publish.transcript_path(language, &transcripts.video_id);
            transcript::save_segments(&path, sentences)
                .with_context(|| format!("Failed to save transcript: {:?}", path))?;
            urls.insert(language.clone(), publish.transcript_url(language, &transcripts.video_id));
        }

        if urls.is_empty() {
            return Ok(None);
        }

        Ok(Some(IndexEntry {
            video_id: transcripts.video_id.clone(),
            transcript_urls: urls,
        }))
    }

    /// Merge local fragment JSON files into sentence files.
    ///
    /// `input` is a single file or a directory searched recursively for
    /// `*.json`. Outputs are named `<stem>.sentences.json` and written to
    /// `output_dir`, or next to each input when no directory is given.
    /// Returns the number of files written.
    pub fn run_merge(&self, input: &Path, output_dir: Option<&Path>, force_overwrite: bool) -> Result<usize> {
        if FileManager::file_exists(input) {
            let written = self.merge_file(input, output_dir, force_overwrite)?;
            return Ok(usize::from(written));
        }

        if !FileManager::dir_exists(input) {
            return Err(anyhow!("Input path does not exist: {:?}", input));
        }

        let files: Vec<PathBuf> = FileManager::find_files(input, "json")?
            .into_iter()
            .filter(|path| !Self::is_merge_output(path))
            .collect();
        info!("Merging {} transcript files from {:?}", files.len(), input);

        let progress_bar = Self::progress_bar(files.len() as u64, "files");
        let mut written = 0;
        for file in &files {
            progress_bar.set_message(file.display().to_string());
            match self.merge_file(file, output_dir, force_overwrite) {
                Ok(true) => written += 1,
                Ok(false) => {}
                Err(e) => error!("Error processing file {:?}: {:#}", file, e),
            }
            progress_bar.inc(1);
        }
        progress_bar.finish_with_message("Folder processing complete");

        info!("Finished processing {} files", written);
        Ok(written)
    }

    fn merge_file(&self, input: &Path, output_dir: Option<&Path>, force_overwrite: bool) -> Result<bool> {
        let output_dir = output_dir
            .map(Path::to_path_buf)
            .or_else(|| input.parent().map(Path::to_path_buf))
            .unwrap_or_default();
        let output_path = FileManager::generate_output_path(input, &output_dir, SENTENCES_SUFFIX, "json");

        if output_path.exists() && !force_overwrite {
            warn!("Output file already exists: {:?}. Use -f to force overwrite.", output_path);
            return Ok(false);
        }

        let fragments = transcript::load_fragments(input)
            .with_context(|| format!("Failed to load fragments: {:?}", input))?;
        let sentences = self.merger.merge(&fragments);

        FileManager::write_to_file(&output_path, &transcript::to_pretty_json(&sentences)?)?;
        info!("Success: {:?} ({} sentences)", output_path, sentences.len());
        Ok(true)
    }

    fn is_merge_output(path: &Path) -> bool {
        path.file_stem()
            .and_then(|stem| Path::new(stem).extension())
            .is_some_and(|ext| ext == SENTENCES_SUFFIX)
    }

    fn progress_bar(len: u64, unit: &str) -> ProgressBar {
        let progress_bar = ProgressBar::new(len);
        let template = format!(
            "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{percent}}%) {{msg}}",
            unit
        );
        let style = ProgressStyle::default_bar()
            .template(&template)
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("█▓▒░"));
        progress_bar
    }

    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
