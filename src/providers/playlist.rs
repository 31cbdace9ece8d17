use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;
use serde::Deserialize;

use crate::errors::ProviderError;
use crate::providers::VideoCatalog;

/// YouTube Data API playlist items endpoint
pub const PLAYLIST_ITEMS_URL: &str = "https://www.googleapis.com/youtube/v3/playlistItems";

/// Client for paging through a playlist with the YouTube Data API
#[derive(Debug)]
pub struct PlaylistClient {
    /// HTTP client for API requests
    client: Client,
    /// Data API key
    api_key: String,
    /// Endpoint URL, defaults to the public API
    endpoint: String,
    /// Items requested per page
    page_size: u32,
}

/// One page of the playlistItems response
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItemsResponse {
    #[serde(default)]
    pub items: Vec<PlaylistItem>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistItem {
    #[serde(default)]
    pub content_details: Option<ContentDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentDetails {
    #[serde(default)]
    pub video_id: Option<String>,
}

impl PlaylistItemsResponse {
    /// Video identifiers on this page, skipping items without one
    pub fn video_ids(&self) -> impl Iterator<Item = &str> {
        self.items
            .iter()
            .filter_map(|item| item.content_details.as_ref())
            .filter_map(|details| details.video_id.as_deref())
            .filter(|id| !id.is_empty())
    }

    /// Token of the next page, if there is one
    pub fn next_page(&self) -> Option<&str> {
        self.next_page_token.as_deref().filter(|token| !token.is_empty())
    }
}

/// Parse one page of the playlistItems response
pub fn parse_page(body: &str) -> Result<PlaylistItemsResponse, ProviderError> {
    serde_json::from_str(body).map_err(|e| ProviderError::ParseError(e.to_string()))
}

impl PlaylistClient {
    /// Create a new playlist client
    pub fn new(api_key: impl Into<String>, timeout_secs: u64, page_size: u32) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_else(|e| {
                    warn!("Failed to build playlist HTTP client, using defaults: {}", e);
                    Client::new()
                }),
            api_key: api_key.into(),
            endpoint: PLAYLIST_ITEMS_URL.to_string(),
            page_size: page_size.clamp(1, 50),
        }
    }

    /// Use a different endpoint, e.g. a recording proxy
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn fetch_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<PlaylistItemsResponse, ProviderError> {
        let page_size = self.page_size.to_string();
        let mut params = vec![
            ("part", "contentDetails"),
            ("playlistId", playlist_id),
            ("maxResults", page_size.as_str()),
            ("key", self.api_key.as_str()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }

        let response = self.client.get(&self.endpoint).query(&params).send().await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ProviderError::ApiError {
                status_code: status.as_u16(),
                message: body,
            });
        }

        parse_page(&body)
    }
}

#[async_trait]
impl VideoCatalog for PlaylistClient {
    async fn fetch_video_ids(&self, playlist_id: &str) -> Result<Vec<String>, ProviderError> {
        let mut ids = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.fetch_page(playlist_id, page_token.as_deref()).await?;
            ids.extend(page.video_ids().map(str::to_string));
            debug!("Playlist page fetched, {} videos so far", ids.len());

            match page.next_page() {
                Some(token) => page_token = Some(token.to_string()),
                None => break,
            }
        }

        Ok(ids)
    }
}
