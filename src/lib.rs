/*!
 * # subsent - caption fragments to sentence transcripts
 *
 * A Rust library and tool that turns automatic caption fragments into
 * sentence-level transcripts with interpolated timing, and publishes them
 * as static JSON for transcript viewers.
 *
 * ## Features
 *
 * - Merge caption fragments into punctuation-delimited sentences
 * - Split fragments that hold several sentences, sharing their time span
 *   by character length
 * - Fetch captions and machine translations for every video of a playlist
 * - Publish per-language JSON transcripts and an `index.json`
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `segmentation`: fragment to sentence merging (the core algorithm)
 * - `transcript`: fragment, sentence and index types and their JSON shape
 * - `providers`: playlist and caption clients:
 *   - `providers::youtube`: caption tracks and translations
 *   - `providers::playlist`: YouTube Data API playlist paging
 *   - `providers::mock`: in-memory providers for tests
 * - `app_controller`: publish and offline merge workflows
 * - `app_config`: Configuration management
 * - `language_utils`: language tag validation
 * - `file_utils`: File system operations
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
#![allow(clippy::uninlined_format_args)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod providers;
pub mod segmentation;
pub mod transcript;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::Controller;
pub use errors::{ConfigError, ProviderError, TranscriptError};
pub use segmentation::{merge_segments_to_sentences, SentenceMerger, DEFAULT_MAX_CHARS};
pub use transcript::{IndexEntry, RawFragment, SentenceSegment};
