//! YouTube Data API playlist listing

use std::future::Future;

use serde::Deserialize;
use tracing::debug;

use crate::error::{Result, YtFocusError};

/// Maximum page size the API allows for playlistItems
pub const PAGE_SIZE: u32 = 50;

/// One page request of a playlist listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub list_id: String,
    pub max_results: u32,
    /// None on the first request
    pub page_token: Option<String>,
    pub credential: String,
}

/// A video as listed by the provider, before ordering is finalized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageItem {
    pub video_id: String,
    pub title: String,
}

/// One page of a playlist listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<PageItem>,
    /// Absent on the last page
    pub next_page_token: Option<String>,
}

/// Anything that can serve playlist pages
pub trait ListingSource: Clone + Send + Sync + 'static {
    fn fetch_page(&self, request: PageRequest) -> impl Future<Output = Result<Page>> + Send;
}

// ============================================
// Wire format
// ============================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemsResponse {
    #[serde(default)]
    items: Vec<PlaylistItem>,
    next_page_token: Option<String>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: String,
    resource_id: ResourceId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    video_id: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

/// Turn a playlistItems response body into a page.
///
/// An `error` object wins over the HTTP status so the API's own reason
/// reaches the user.
fn parse_page(status: reqwest::StatusCode, body: &str) -> Result<Page> {
    let parsed: std::result::Result<PlaylistItemsResponse, _> = serde_json::from_str(body);

    match parsed {
        Ok(PlaylistItemsResponse {
            error: Some(error), ..
        }) => {
            let message = if error.message.is_empty() {
                format!("HTTP {}", status)
            } else {
                error.message
            };
            Err(YtFocusError::Provider(message))
        }
        Ok(_) if !status.is_success() => Err(YtFocusError::Network(format!("HTTP {}", status))),
        Ok(response) => Ok(Page {
            items: response
                .items
                .into_iter()
                .map(|item| PageItem {
                    video_id: item.snippet.resource_id.video_id,
                    title: item.snippet.title,
                })
                .collect(),
            next_page_token: response.next_page_token.filter(|token| !token.is_empty()),
        }),
        Err(_) if !status.is_success() => Err(YtFocusError::Network(format!("HTTP {}", status))),
        Err(e) => Err(YtFocusError::Provider(format!(
            "Failed to parse playlist response: {}",
            e
        ))),
    }
}

// ============================================
// HTTP client
// ============================================

/// playlistItems client over HTTPS
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    http: reqwest::Client,
    base_url: String,
}

impl YouTubeClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn playlist_items_url(&self) -> String {
        format!("{}/playlistItems", self.base_url)
    }
}

impl ListingSource for YouTubeClient {
    fn fetch_page(&self, request: PageRequest) -> impl Future<Output = Result<Page>> + Send {
        let http = self.http.clone();
        let url = self.playlist_items_url();

        async move {
            debug!(list_id = %request.list_id, token = ?request.page_token, "fetching playlist page");

            let max_results = request.max_results.to_string();
            let mut query = vec![
                ("part", "snippet"),
                ("maxResults", max_results.as_str()),
                ("playlistId", request.list_id.as_str()),
                ("key", request.credential.as_str()),
            ];
            if let Some(ref token) = request.page_token {
                query.push(("pageToken", token.as_str()));
            }

            let response = http
                .get(&url)
                .query(&query)
                .send()
                .await
                .map_err(|e| YtFocusError::Network(e.without_url().to_string()))?;

            let status = response.status();
            let body = response.text().await?;
            parse_page(status, &body)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    const PAGE_BODY: &str = r#"{
        "kind": "youtube#playlistItemListResponse",
        "nextPageToken": "CDIQAA",
        "items": [
            {"snippet": {"title": "lofi one", "resourceId": {"kind": "youtube#video", "videoId": "aaa"}}},
            {"snippet": {"title": "lofi two", "resourceId": {"kind": "youtube#video", "videoId": "bbb"}}}
        ]
    }"#;

    #[test]
    fn test_parse_page_keeps_order_and_token() {
        let page = parse_page(StatusCode::OK, PAGE_BODY).unwrap();
        assert_eq!(page.next_page_token.as_deref(), Some("CDIQAA"));
        let ids: Vec<&str> = page.items.iter().map(|i| i.video_id.as_str()).collect();
        assert_eq!(ids, ["aaa", "bbb"]);
        assert_eq!(page.items[1].title, "lofi two");
    }

    #[test]
    fn test_parse_last_page() {
        let page = parse_page(StatusCode::OK, r#"{"items": []}"#).unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.next_page_token, None);
    }

    #[test]
    fn test_parse_provider_error() {
        let body = r#"{"error": {"code": 404, "message": "The playlist identified with the request's playlistId parameter cannot be found."}}"#;
        let err = parse_page(StatusCode::NOT_FOUND, body).unwrap_err();
        match err {
            YtFocusError::Provider(message) => assert!(message.contains("cannot be found")),
            other => panic!("expected provider error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_non_json_failure_is_network() {
        let err = parse_page(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>").unwrap_err();
        assert!(matches!(err, YtFocusError::Network(_)));
    }

    #[test]
    fn test_playlist_items_url() {
        let client = YouTubeClient::new("https://www.googleapis.com/youtube/v3/");
        assert_eq!(
            client.playlist_items_url(),
            "https://www.googleapis.com/youtube/v3/playlistItems"
        );
    }
}
