/*!
 * Tests for transcript types and their JSON files
 */

use std::fs;

use anyhow::Result;
use subsent::transcript::{self, round_millis, TranscriptUrls};
use subsent::{IndexEntry, RawFragment, SentenceSegment, TranscriptError};
use crate::common;

/// Test that fragment files load with their timings
#[test]
fn test_load_fragments_withValidFile_shouldParseAllEntries() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "abc.json", &common::caption_stream_json())?;

    let fragments = transcript::load_fragments(&path)?;

    assert_eq!(fragments, common::caption_stream());
    Ok(())
}

/// Test that a missing file reports its path
#[test]
fn test_load_fragments_withMissingFile_shouldReturnIoError() {
    let result = transcript::load_fragments("does/not/exist.json");

    match result {
        Err(TranscriptError::Io { path, .. }) => assert!(path.ends_with("exist.json")),
        other => panic!("expected I/O error, got {:?}", other),
    }
}

/// Test that malformed JSON is rejected
#[test]
fn test_parse_fragments_withMalformedJson_shouldReturnJsonError() {
    let result = transcript::parse_fragments(r#"[{"text": "hi", "start": }]"#);
    assert!(matches!(result, Err(TranscriptError::Json(_))));
}

/// Test that unknown fields are ignored
#[test]
fn test_parse_fragments_withExtraFields_shouldIgnoreThem() -> Result<()> {
    let fragments = transcript::parse_fragments(r#"[{"text": "hi", "start": 1, "duration": 2, "lang": "en"}]"#)?;
    assert_eq!(fragments, vec![RawFragment::new("hi", 1.0, 2.0)]);
    Ok(())
}

/// Test that saved sentences are pretty printed UTF-8 with a trailing newline
#[test]
fn test_save_segments_withNestedPath_shouldCreateDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("transcripts").join("ko").join("abc.json");
    let segments = vec![SentenceSegment {
        text: "[ko] 소유권에 대해.".to_string(),
        start: 1.5,
        duration: 0.25,
    }];

    transcript::save_segments(&path, &segments)?;

    let content = fs::read_to_string(&path)?;
    assert_eq!(
        content,
        "[\n  {\n    \"text\": \"[ko] 소유권에 대해.\",\n    \"start\": 1.5,\n    \"duration\": 0.25\n  }\n]\n"
    );
    Ok(())
}

/// Test that the index keeps entry and language order
#[test]
fn test_index_json_withTwoVideos_shouldKeepOrder() -> Result<()> {
    let entry = |id: &str| {
        let mut urls = TranscriptUrls::new();
        urls.insert("en", format!("https://x.test/transcripts/en/{}.json", id));
        urls.insert("ko", format!("https://x.test/transcripts/ko/{}.json", id));
        IndexEntry {
            video_id: id.to_string(),
            transcript_urls: urls,
        }
    };

    let json = transcript::to_pretty_json(&vec![entry("zzz"), entry("aaa")])?;
    let value: serde_json::Value = serde_json::from_str(&json)?;

    assert_eq!(value[0]["videoId"], "zzz");
    assert_eq!(value[1]["videoId"], "aaa");
    assert!(json.find("\"en\"").unwrap() < json.find("\"ko\"").unwrap());
    assert_eq!(
        value[1]["transcriptUrls"]["ko"],
        "https://x.test/transcripts/ko/aaa.json"
    );
    Ok(())
}

/// Test that inserting a language twice replaces its URL in place
#[test]
fn test_transcript_urls_withDuplicateLanguage_shouldReplaceUrl() {
    let mut urls = TranscriptUrls::new();
    urls.insert("en", "first");
    urls.insert("ko", "second");
    urls.insert("en", "third");

    assert_eq!(urls.languages().collect::<Vec<_>>(), vec!["en", "ko"]);
    assert_eq!(urls.get("en"), Some("third"));
}

/// Test millisecond rounding of typical durations
#[test]
fn test_round_millis_withLongFraction_shouldKeepThreeDecimals() {
    assert_eq!(round_millis(1.7142857142857142), 1.714);
    assert_eq!(round_millis(2.2857142857142856), 2.286);
    assert_eq!(round_millis(-0.0004), 0.0);
}
