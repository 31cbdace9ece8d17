use std::fs::File;
use std::io::{BufReader, Write};
use std::path::Path;

use log::debug;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::TranscriptError;

// @module: Transcript data types and their on-disk JSON shape

// @struct: One caption line as delivered by a captioning source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawFragment {
    // @field: Caption text, possibly padded with whitespace
    #[serde(default, deserialize_with = "null_as_empty")]
    pub text: String,

    // @field: Start time in seconds
    #[serde(default)]
    pub start: f64,

    // @field: Duration in seconds
    #[serde(default)]
    pub duration: f64,
}

impl RawFragment {
    pub fn new(text: impl Into<String>, start: f64, duration: f64) -> Self {
        Self {
            text: text.into(),
            start,
            duration,
        }
    }

    /// End time in seconds
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

/// One sentence with interpolated timing.
///
/// Field order is part of the published JSON shape: `text`, `start`, `duration`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentenceSegment {
    pub text: String,
    pub start: f64,
    /// Seconds, rounded to 3 decimal places
    pub duration: f64,
}

impl SentenceSegment {
    pub fn end(&self) -> f64 {
        self.start + self.duration
    }
}

impl From<SentenceSegment> for RawFragment {
    fn from(segment: SentenceSegment) -> Self {
        RawFragment {
            text: segment.text,
            start: segment.start,
            duration: segment.duration,
        }
    }
}

impl From<&SentenceSegment> for RawFragment {
    fn from(segment: &SentenceSegment) -> Self {
        segment.clone().into()
    }
}

/// Published transcript URLs of one video, keyed by language in publishing order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TranscriptUrls(Vec<(String, String)>);

impl TranscriptUrls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a language, or replace its URL keeping its position
    pub fn insert(&mut self, language: impl Into<String>, url: impl Into<String>) {
        let language = language.into();
        let url = url.into();
        match self.0.iter_mut().find(|(lang, _)| *lang == language) {
            Some(entry) => entry.1 = url,
            None => self.0.push((language, url)),
        }
    }

    pub fn get(&self, language: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(lang, _)| lang == language)
            .map(|(_, url)| url.as_str())
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(lang, _)| lang.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for TranscriptUrls {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (language, url) in &self.0 {
            map.serialize_entry(language, url)?;
        }
        map.end()
    }
}

// @struct: One video in the published index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexEntry {
    #[serde(rename = "videoId")]
    pub video_id: String,

    #[serde(rename = "transcriptUrls")]
    pub transcript_urls: TranscriptUrls,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Round to 3 decimal places the way Python's `round(x, 3)` does.
///
/// Goes through the exact decimal expansion instead of scaling by 1000,
/// so values such as 1.0005 (stored slightly below) round down.
pub fn round_millis(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }
    format!("{:.3}", value).parse().unwrap_or(value)
}

/// Parse a JSON array of raw fragments
pub fn parse_fragments(content: &str) -> Result<Vec<RawFragment>, TranscriptError> {
    Ok(serde_json::from_str(content)?)
}

/// Load raw fragments from a JSON file
pub fn load_fragments<P: AsRef<Path>>(path: P) -> Result<Vec<RawFragment>, TranscriptError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| TranscriptError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    let fragments: Vec<RawFragment> = serde_json::from_reader(BufReader::new(file))?;
    debug!("Loaded {} fragments from {:?}", fragments.len(), path);
    Ok(fragments)
}

/// Serialize a value as two-space indented JSON followed by a newline.
///
/// Non-ASCII text is written verbatim.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<String, TranscriptError> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

/// Write any serializable value to `path` in the published JSON format
pub fn save_json<T: Serialize + ?Sized, P: AsRef<Path>>(
    path: P,
    value: &T,
) -> Result<(), TranscriptError> {
    let path = path.as_ref();
    let json = to_pretty_json(value)?;

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| TranscriptError::Io {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let mut file = File::create(path).map_err(|e| TranscriptError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    file.write_all(json.as_bytes())
        .map_err(|e| TranscriptError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
    Ok(())
}

/// Write sentence segments to a JSON file
pub fn save_segments<P: AsRef<Path>>(
    path: P,
    segments: &[SentenceSegment],
) -> Result<(), TranscriptError> {
    save_json(path, segments)
}
