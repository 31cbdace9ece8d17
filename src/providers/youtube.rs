use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::errors::ProviderError;
use crate::providers::{FetchedTranscript, TranscriptProvider};
use crate::transcript::RawFragment;

const WATCH_URL: &str = "https://www.youtube.com/watch";
const INNERTUBE_PLAYER_URL: &str = "https://www.youtube.com/youtubei/v1/player";
const INNERTUBE_CLIENT_NAME: &str = "ANDROID";
const INNERTUBE_CLIENT_VERSION: &str = "20.10.38";

static INNERTUBE_KEY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).unwrap()
});

static TEXT_ELEMENT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<text\b([^>]*?)(?:/>|>(.*?)</text>)").unwrap()
});

static ATTRIBUTE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([A-Za-z_]+)="([^"]*)""#).unwrap()
});

static INLINE_TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").unwrap());

static FMT_PARAM_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"&fmt=[^&]*").unwrap());

static ENTITY_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"&(#[0-9]+|#[xX][0-9a-fA-F]+|[A-Za-z]+);").unwrap()
});

/// Player response subset needed to locate caption tracks
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerResponse {
    #[serde(default)]
    pub playability_status: Option<PlayabilityStatus>,
    #[serde(default)]
    pub captions: Option<Captions>,
}

#[derive(Debug, Deserialize)]
pub struct PlayabilityStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Captions {
    #[serde(default)]
    pub player_captions_tracklist_renderer: Option<TracklistRenderer>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TracklistRenderer {
    #[serde(default)]
    pub caption_tracks: Vec<CaptionTrack>,
}

/// One caption track listed by the player
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptionTrack {
    pub base_url: String,
    pub language_code: String,
    /// `asr` for speech recognition tracks
    #[serde(default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub is_translatable: bool,
}

impl CaptionTrack {
    pub fn is_generated(&self) -> bool {
        self.kind.as_deref() == Some("asr")
    }
}

/// Caption tracks of a player response, or the reason there are none
pub fn caption_tracks(video_id: &str, player: PlayerResponse) -> Result<Vec<CaptionTrack>, ProviderError> {
    if let Some(status) = &player.playability_status {
        if status.status != "OK" {
            debug!(
                "Video {} not playable: {} {}",
                video_id,
                status.status,
                status.reason.as_deref().unwrap_or_default()
            );
            return Err(ProviderError::VideoUnavailable(video_id.to_string()));
        }
    }

    let tracks = player
        .captions
        .and_then(|c| c.player_captions_tracklist_renderer)
        .map(|r| r.caption_tracks)
        .unwrap_or_default();

    if tracks.is_empty() {
        return Err(ProviderError::TranscriptsDisabled(video_id.to_string()));
    }
    Ok(tracks)
}

/// Pick a track for the first language that has one.
///
/// For each language a manually created track wins over a generated one.
pub fn select_track<'a>(tracks: &'a [CaptionTrack], languages: &[String]) -> Option<&'a CaptionTrack> {
    languages.iter().find_map(|language| {
        let mut candidates = tracks.iter().filter(|t| t.language_code == *language);
        let manual = candidates.clone().find(|t| !t.is_generated());
        manual.or_else(|| candidates.next())
    })
}

/// Decode HTML character references; unknown names are kept verbatim
pub fn unescape_html(text: &str) -> String {
    ENTITY_REGEX
        .replace_all(text, |caps: &regex::Captures| {
            let entity = &caps[1];
            let decoded = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ if entity.starts_with("#x") || entity.starts_with("#X") => {
                    u32::from_str_radix(&entity[2..], 16).ok().and_then(char::from_u32)
                }
                _ if entity.starts_with('#') => entity[1..].parse().ok().and_then(char::from_u32),
                _ => None,
            };
            decoded.map_or_else(|| caps[0].to_string(), |c| c.to_string())
        })
        .into_owned()
}

/// Parse a timed-text XML document into caption fragments.
///
/// Element text is XML escaped and the caption itself HTML escaped, so
/// entities are decoded twice before inline formatting tags are dropped.
pub fn parse_timedtext(xml: &str) -> Result<Vec<RawFragment>, ProviderError> {
    if !xml.contains("<transcript") && !xml.contains("<text") {
        return Err(ProviderError::ParseError("not a timed-text document".to_string()));
    }

    let mut fragments = Vec::new();
    for caps in TEXT_ELEMENT_REGEX.captures_iter(xml) {
        let Some(body) = caps.get(2) else {
            continue;
        };

        let mut start = 0.0;
        let mut duration = 0.0;
        for attr in ATTRIBUTE_REGEX.captures_iter(&caps[1]) {
            match &attr[1] {
                "start" => start = attr[2].parse().unwrap_or(0.0),
                "dur" => duration = attr[2].parse().unwrap_or(0.0),
                _ => {}
            }
        }

        let text = unescape_html(&unescape_html(body.as_str()));
        let text = INLINE_TAG_REGEX.replace_all(&text, "").into_owned();
        fragments.push(RawFragment::new(text, start, duration));
    }

    Ok(fragments)
}

/// Caption client reading YouTube's timed-text tracks
#[derive(Debug)]
pub struct YouTubeTranscripts {
    /// HTTP client for page and API requests
    client: Client,
}

impl YouTubeTranscripts {
    /// Create a new caption client
    pub fn new(timeout_secs: u64) -> Self {
        let mut headers = header::HeaderMap::new();
        headers.insert(header::ACCEPT_LANGUAGE, header::HeaderValue::from_static("en-US"));

        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .default_headers(headers)
                .build()
                .unwrap_or_else(|e| {
                    warn!("Failed to build caption HTTP client, using defaults: {}", e);
                    Client::new()
                }),
        }
    }

    async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String, ProviderError> {
        let response = self.client.get(url).query(query).send().await?;
        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: body,
            });
        }
        Ok(body)
    }

    async fn innertube_api_key(&self, video_id: &str) -> Result<String, ProviderError> {
        let page = self.get_text(WATCH_URL, &[("v", video_id)]).await?;
        INNERTUBE_KEY_REGEX
            .captures(&page)
            .map(|caps| caps[1].to_string())
            .ok_or_else(|| ProviderError::ParseError(format!("no innertube key on watch page of {}", video_id)))
    }

    async fn player(&self, video_id: &str) -> Result<PlayerResponse, ProviderError> {
        let api_key = self.innertube_api_key(video_id).await?;
        let body = json!({
            "context": {
                "client": {
                    "clientName": INNERTUBE_CLIENT_NAME,
                    "clientVersion": INNERTUBE_CLIENT_VERSION,
                }
            },
            "videoId": video_id,
        });

        let response = self
            .client
            .post(INNERTUBE_PLAYER_URL)
            .query(&[("key", api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<PlayerResponse>().await?)
    }

    async fn download(&self, url: &str) -> Result<Vec<RawFragment>, ProviderError> {
        let xml = self.get_text(url, &[]).await?;
        parse_timedtext(&xml)
    }
}

#[async_trait]
impl TranscriptProvider for YouTubeTranscripts {
    async fn fetch(&self, video_id: &str, languages: &[String]) -> Result<FetchedTranscript, ProviderError> {
        let player = self.player(video_id).await?;
        let tracks = caption_tracks(video_id, player)?;

        let track = select_track(&tracks, languages).ok_or_else(|| ProviderError::NoTranscriptFound {
            video_id: video_id.to_string(),
            languages: languages.to_vec(),
        })?;

        let url = FMT_PARAM_REGEX.replace_all(&track.base_url, "").into_owned();
        let fragments = self.download(&url).await?;
        debug!(
            "Fetched {} caption lines for {} ({}{})",
            fragments.len(),
            video_id,
            track.language_code,
            if track.is_generated() { ", generated" } else { "" }
        );

        Ok(FetchedTranscript {
            video_id: video_id.to_string(),
            language_code: track.language_code.clone(),
            is_generated: track.is_generated(),
            is_translatable: track.is_translatable,
            source_url: Some(url),
            fragments,
        })
    }

    async fn translate(
        &self,
        transcript: &FetchedTranscript,
        target_language: &str,
    ) -> Result<Vec<RawFragment>, ProviderError> {
        let unavailable = || ProviderError::TranslationUnavailable {
            video_id: transcript.video_id.clone(),
            language: target_language.to_string(),
        };

        if !transcript.is_translatable {
            return Err(unavailable());
        }
        let source_url = transcript.source_url.as_deref().ok_or_else(unavailable)?;

        self.download(&format!("{}&tlang={}", source_url, target_language)).await
    }
}
