/*!
 * Common test utilities for the subsent test suite
 */

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tempfile::TempDir;

use subsent::app_config::Config;
use subsent::RawFragment;

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Automatic captions of a short lecture intro
pub fn caption_stream() -> Vec<RawFragment> {
    vec![
        RawFragment::new("so today we're going to", 0.08, 2.4),
        RawFragment::new("talk about ownership. It is", 2.48, 3.1),
        RawFragment::new("", 5.58, 0.5),
        RawFragment::new("the feature that makes Rust", 5.58, 2.2),
        RawFragment::new("different!   Let's start. First", 7.78, 3.0),
        RawFragment::new("   ", 10.78, 0.4),
        RawFragment::new("a quick recap", 10.78, 1.9),
    ]
}

/// Captions as they appear in a fragment JSON file
pub fn caption_stream_json() -> String {
    r#"[
  {"text": "so today we're going to", "start": 0.08, "duration": 2.4},
  {"text": "talk about ownership. It is", "start": 2.48, "duration": 3.1},
  {"text": "", "start": 5.58, "duration": 0.5},
  {"text": "the feature that makes Rust", "start": 5.58, "duration": 2.2},
  {"text": "different!   Let's start. First", "start": 7.78, "duration": 3.0},
  {"text": "   ", "start": 10.78, "duration": 0.4},
  {"text": "a quick recap", "start": 10.78, "duration": 1.9}
]"#
    .to_string()
}

/// A config ready for publishing into `output_dir`
pub fn publish_config(output_dir: &Path) -> Config {
    let mut config = Config::default();
    config.youtube.api_key = "test-key".to_string();
    config.youtube.playlist_id = "PLtest".to_string();
    config.publish.base_url = "https://example.github.io/lectures/".to_string();
    config.publish.output_dir = output_dir.to_path_buf();
    config.publish.concurrent_videos = 2;
    config
}
