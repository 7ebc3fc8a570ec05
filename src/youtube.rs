use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth::Credentials;
use crate::error::{Error, Result};

const YOUTUBE_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Page size used by every list call, and the id-batch limit of `videos`
pub const API_PAGE_SIZE: usize = 50;

/// Position in a paginated listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageToken {
    Start,
    Next(String),
    End,
}

impl PageToken {
    fn from_response(token: Option<String>) -> Self {
        match token {
            Some(t) if !t.is_empty() => PageToken::Next(t),
            _ => PageToken::End,
        }
    }

    fn as_query(&self) -> Option<&str> {
        match self {
            PageToken::Next(t) => Some(t),
            PageToken::Start | PageToken::End => None,
        }
    }
}

/// One page of a list response
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub next: PageToken,
}

/// Video entry as returned by `videos.list`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiVideo {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<ApiVideoSnippet>,
    #[serde(default)]
    pub content_details: Option<ApiContentDetails>,
    #[serde(default)]
    pub statistics: Option<ApiStatistics>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiVideoSnippet {
    pub title: Option<String>,
    pub channel_title: Option<String>,
    pub thumbnails: Option<ApiThumbnails>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiThumbnails {
    pub default: Option<ApiThumbnail>,
    pub medium: Option<ApiThumbnail>,
    pub high: Option<ApiThumbnail>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiThumbnail {
    pub url: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiContentDetails {
    /// ISO 8601, e.g. `PT15M33S`
    pub duration: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiStatistics {
    /// Counts are sent as decimal strings
    pub view_count: Option<String>,
}

/// Playlist entry as returned by `playlists.list`
#[derive(Debug, Clone, Deserialize)]
pub struct ApiPlaylist {
    pub id: String,
    pub snippet: ApiPlaylistSnippet,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiPlaylistSnippet {
    pub title: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPlaylistItem {
    content_details: Option<ApiPlaylistItemDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApiPlaylistItemDetails {
    video_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

/// The three YouTube Data API operations the fetcher relies on
#[async_trait]
pub trait VideoSource {
    /// One page of the signed-in user's playlists
    async fn list_playlists(&self, page: &PageToken) -> Result<Page<ApiPlaylist>>;

    /// One page of video ids belonging to a playlist
    async fn list_playlist_items(&self, playlist_id: &str, page: &PageToken)
    -> Result<Page<String>>;

    /// Details for up to [`API_PAGE_SIZE`] videos
    async fn videos(&self, ids: &[String]) -> Result<Vec<ApiVideo>>;
}

/// YouTube Data API v3 client authorised with a bearer token
pub struct YouTube {
    client: Client,
    access_token: String,
    base_url: String,
}

impl YouTube {
    pub fn new(credentials: &Credentials) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            access_token: credentials.access_token.clone(),
            base_url: YOUTUBE_API_BASE_URL.to_string(),
        })
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(%url, ?params, "YouTube API request");

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &text));
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl VideoSource for YouTube {
    async fn list_playlists(&self, page: &PageToken) -> Result<Page<ApiPlaylist>> {
        let max_results = API_PAGE_SIZE.to_string();
        let mut params = vec![("part", "snippet"), ("mine", "true"), ("maxResults", max_results.as_str())];
        if let Some(token) = page.as_query() {
            params.push(("pageToken", token));
        }

        let response: ListResponse<ApiPlaylist> = self.get("playlists", &params).await?;
        Ok(Page {
            items: response.items,
            next: PageToken::from_response(response.next_page_token),
        })
    }

    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page: &PageToken,
    ) -> Result<Page<String>> {
        let max_results = API_PAGE_SIZE.to_string();
        let mut params = vec![
            ("part", "snippet,contentDetails"),
            ("playlistId", playlist_id),
            ("maxResults", max_results.as_str()),
        ];
        if let Some(token) = page.as_query() {
            params.push(("pageToken", token));
        }

        let response: ListResponse<ApiPlaylistItem> = self.get("playlistItems", &params).await?;
        Ok(Page {
            items: response
                .items
                .into_iter()
                .filter_map(|item| item.content_details.map(|cd| cd.video_id))
                .collect(),
            next: PageToken::from_response(response.next_page_token),
        })
    }

    async fn videos(&self, ids: &[String]) -> Result<Vec<ApiVideo>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let ids_joined = ids.join(",");
        let params = [
            ("part", "snippet,contentDetails,statistics"),
            ("id", ids_joined.as_str()),
        ];

        let response: ListResponse<ApiVideo> = self.get("videos", &params).await?;
        Ok(response.items)
    }
}

/// Turn a non-success response body into an [`Error::Api`]
fn api_error(status: u16, body: &str) -> Error {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) => Error::Api {
            status: parsed.error.code,
            message: parsed.error.message,
        },
        Err(_) => Error::Api {
            status,
            message: if body.is_empty() {
                "empty response".to_string()
            } else {
                body.to_string()
            },
        },
    }
}
