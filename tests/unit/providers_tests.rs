/*!
 * Tests for provider implementations
 */

use anyhow::Result;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use subsent::errors::ProviderError;
use subsent::providers::mock::{MockCatalog, MockTranscriptProvider};
use subsent::providers::playlist::PlaylistClient;
use subsent::providers::{TranscriptProvider, VideoCatalog};
use subsent::RawFragment;
use crate::common;

fn languages(codes: &[&str]) -> Vec<String> {
    codes.iter().map(|c| c.to_string()).collect()
}

/// Serve canned playlist pages on a local port, answering `status` to every request.
///
/// Requests carrying `pageToken=P2` get the second page.
async fn spawn_playlist_server(status: u16) -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let address = listener.local_addr()?;

    tokio::spawn(async move {
        while let Ok((mut socket, _)) = listener.accept().await {
            tokio::spawn(async move {
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => request.extend_from_slice(&buf[..n]),
                    }
                }
                let request_line = String::from_utf8_lossy(&request).lines().next().unwrap_or_default().to_string();

                let body = if status != 200 {
                    r#"{"error": {"code": 403, "message": "quotaExceeded"}}"#
                } else if request_line.contains("pageToken=P2") {
                    r#"{"items": [{"contentDetails": {"videoId": "vid3"}}]}"#
                } else {
                    r#"{"nextPageToken": "P2", "items": [
                        {"contentDetails": {"videoId": "vid1"}},
                        {"contentDetails": {"videoId": "vid2"}}
                    ]}"#
                };
                let reason = if status == 200 { "OK" } else { "Forbidden" };
                let response = format!(
                    "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status,
                    reason,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            });
        }
    });

    Ok(format!("http://{}/youtube/v3/playlistItems", address))
}

/// Test that the playlist client follows page tokens in order
#[tokio::test]
async fn test_playlist_client_withTwoPages_shouldCollectAllIds() -> Result<()> {
    let endpoint = spawn_playlist_server(200).await?;
    let client = PlaylistClient::new("test-key", 5, 2).with_endpoint(endpoint);

    let ids = client.fetch_video_ids("PLtest").await?;

    assert_eq!(ids, vec!["vid1", "vid2", "vid3"]);
    Ok(())
}

/// Test that API errors surface with their status code
#[tokio::test]
async fn test_playlist_client_withForbiddenResponse_shouldReturnApiError() -> Result<()> {
    let endpoint = spawn_playlist_server(403).await?;
    let client = PlaylistClient::new("bad-key", 5, 50).with_endpoint(endpoint);

    let result = client.fetch_video_ids("PLtest").await;

    match result {
        Err(ProviderError::ApiError { status_code, message }) => {
            assert_eq!(status_code, 403);
            assert!(message.contains("quotaExceeded"));
        }
        other => panic!("expected API error, got {:?}", other),
    }
    Ok(())
}

/// Test that the mock serves registered captions
#[tokio::test]
async fn test_mock_provider_withRegisteredVideo_shouldFetchFragments() -> Result<()> {
    let provider = MockTranscriptProvider::new().with_transcript("abc", "en-US", common::caption_stream());

    let fetched = provider.fetch("abc", &languages(&["en", "en-US"])).await?;

    assert_eq!(fetched.language_code, "en-US");
    assert_eq!(fetched.fragments, common::caption_stream());
    assert_eq!(provider.fetch_count(), 1);
    Ok(())
}

/// Test the mock's failure modes
#[tokio::test]
async fn test_mock_provider_withUnknownVideoOrLanguage_shouldReportUnavailable() {
    let provider = MockTranscriptProvider::new().with_transcript("abc", "de", common::caption_stream());

    let missing = provider.fetch("zzz", &languages(&["en"])).await.unwrap_err();
    assert!(matches!(missing, ProviderError::TranscriptsDisabled(_)));

    let wrong_language = provider.fetch("abc", &languages(&["en"])).await.unwrap_err();
    assert!(matches!(wrong_language, ProviderError::NoTranscriptFound { .. }));
    assert!(wrong_language.is_transcript_unavailable());
    assert_eq!(provider.fetch_count(), 2);
}

/// Test that mock translation keeps timing and marks text
#[tokio::test]
async fn test_mock_provider_translate_shouldKeepTimingAndBlanks() -> Result<()> {
    let provider = MockTranscriptProvider::new().with_transcript(
        "abc",
        "en",
        vec![RawFragment::new("Hello.", 1.0, 2.0), RawFragment::new(" ", 3.0, 1.0)],
    );
    let fetched = provider.fetch("abc", &languages(&["en"])).await?;

    let translated = provider.translate(&fetched, "ko").await?;

    assert_eq!(
        translated,
        vec![RawFragment::new("[ko] Hello.", 1.0, 2.0), RawFragment::new(" ", 3.0, 1.0)]
    );
    Ok(())
}

/// Test that a failing translation is reported per language
#[tokio::test]
async fn test_mock_provider_withFailingTranslation_shouldReturnTranslationUnavailable() -> Result<()> {
    let provider = MockTranscriptProvider::new()
        .with_transcript("abc", "en", common::caption_stream())
        .with_failing_translation("ja");
    let fetched = provider.fetch("abc", &languages(&["en"])).await?;

    assert!(provider.translate(&fetched, "ko").await.is_ok());
    assert!(matches!(
        provider.translate(&fetched, "ja").await,
        Err(ProviderError::TranslationUnavailable { ref language, .. }) if language == "ja"
    ));
    Ok(())
}

/// Test the mock catalog
#[tokio::test]
async fn test_mock_catalog_shouldListOrFail() {
    let ids = MockCatalog::new(&["b", "a"]).fetch_video_ids("PL").await.unwrap();
    assert_eq!(ids, vec!["b", "a"]);

    assert!(MockCatalog::failing().fetch_video_ids("PL").await.is_err());
}
