use serde::Serialize;

use crate::duration::{format_duration, parse_duration};
use crate::youtube::ApiVideo;

/// Canonical video entry used for sorting and display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoRecord {
    pub id: String,
    pub title: String,
    pub thumbnail_url: String,
    pub channel: String,
    /// `0` for live streams and unknown lengths
    pub duration_seconds: u64,
    pub duration_display: String,
    pub view_count: u64,
}

impl VideoRecord {
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.id)
    }
}

/// Playlist choice offered to the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistDescriptor {
    pub id: String,
    pub title: String,
}

impl PlaylistDescriptor {
    /// Sentinel id YouTube uses for the Watch Later list
    pub const WATCH_LATER_ID: &'static str = "WL";

    pub fn watch_later() -> Self {
        Self {
            id: Self::WATCH_LATER_ID.to_string(),
            title: "Watch Later (Default)".to_string(),
        }
    }

    pub fn is_watch_later(&self) -> bool {
        self.id == Self::WATCH_LATER_ID
    }
}

/// Map a `videos.list` entry to a [`VideoRecord`], defaulting anything missing.
pub fn normalize(raw: &ApiVideo) -> VideoRecord {
    let snippet = raw.snippet.as_ref();

    let title = snippet
        .and_then(|s| s.title.clone())
        .unwrap_or_else(|| "Unknown Title".to_string());
    let channel = snippet
        .and_then(|s| s.channel_title.clone())
        .unwrap_or_else(|| "Unknown Channel".to_string());
    let thumbnail_url = snippet
        .and_then(|s| s.thumbnails.as_ref())
        .and_then(|t| t.medium.as_ref())
        .map(|t| t.url.clone())
        .unwrap_or_default();

    let duration_seconds = parse_duration(
        raw.content_details
            .as_ref()
            .and_then(|cd| cd.duration.as_deref())
            .unwrap_or("PT0S"),
    );

    let view_count = raw
        .statistics
        .as_ref()
        .and_then(|s| s.view_count.as_deref())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(0);

    VideoRecord {
        id: raw.id.clone(),
        title,
        thumbnail_url,
        channel,
        duration_seconds,
        duration_display: format_duration(duration_seconds),
        view_count,
    }
}
