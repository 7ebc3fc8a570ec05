//! Paginated retrieval of video collections.
//!
//! Every loop here is bounded: a traversal ends when the continuation token
//! runs out or a named cutoff is reached, whichever comes first. Requests are
//! issued one after another because each page token comes from the previous
//! response.

use std::collections::HashSet;
use std::fmt;

use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::video::{PlaylistDescriptor, VideoRecord, normalize};
use crate::youtube::{API_PAGE_SIZE, PageToken, VideoSource};

/// Stop requesting playlist pages once this many videos have accumulated
pub const MAX_PLAYLIST_VIDEOS: usize = 200;

/// Playlists collected beyond the seeded Watch Later entry before stopping
pub const MAX_EXTRA_PLAYLISTS: usize = 50;

/// Ids per `videos.list` call
pub const DETAILS_BATCH_SIZE: usize = API_PAGE_SIZE;

/// A recoverable failure that cost part of the result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchWarning {
    /// Listing playlists or playlist items failed; traversal stopped there
    Enumeration(String),
    /// A `videos.list` batch failed; its records are missing
    DetailBatch { batch: usize, message: String },
}

impl fmt::Display for FetchWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchWarning::Enumeration(message) => write!(f, "Listing failed: {}", message),
            FetchWarning::DetailBatch { batch, message } => {
                write!(f, "Could not fetch details for batch {}: {}", batch, message)
            }
        }
    }
}

/// Videos gathered by one fetch plus whatever went wrong on the way
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    pub videos: Vec<VideoRecord>,
    pub warnings: Vec<FetchWarning>,
}

impl FetchOutcome {
    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    /// Append normalized records, skipping ids already collected
    fn extend_unique(&mut self, seen: &mut HashSet<String>, records: impl IntoIterator<Item = VideoRecord>) {
        for record in records {
            if seen.insert(record.id.clone()) {
                self.videos.push(record);
            }
        }
    }
}

/// Playlists available to the user; Watch Later always comes first
#[derive(Debug, Clone)]
pub struct PlaylistListing {
    pub playlists: Vec<PlaylistDescriptor>,
    pub warning: Option<FetchWarning>,
}

/// Fetch the videos of a playlist, page by page
///
/// An empty outcome is a normal result: YouTube hides Watch Later from the
/// API, so callers should offer the paste flow in that case.
pub async fn fetch_playlist<S: VideoSource + Sync + ?Sized>(source: &S, playlist_id: &str) -> FetchOutcome {
    let mut outcome = FetchOutcome::default();
    let mut seen = HashSet::new();
    let mut token = PageToken::Start;
    let mut batch = 0;

    while token != PageToken::End {
        let page = match source.list_playlist_items(playlist_id, &token).await {
            Ok(page) => page,
            Err(e) => {
                warn!(playlist_id, error = %e, "playlist items request failed");
                outcome.warnings.push(FetchWarning::Enumeration(e.to_string()));
                break;
            }
        };
        token = page.next;

        if !page.items.is_empty() {
            batch += 1;
            match source.videos(&page.items).await {
                Ok(items) => outcome.extend_unique(&mut seen, items.iter().map(normalize)),
                Err(e) => {
                    warn!(playlist_id, batch, error = %e, "video details batch failed");
                    outcome.warnings.push(FetchWarning::DetailBatch {
                        batch,
                        message: e.to_string(),
                    });
                }
            }
        }

        info!(playlist_id, fetched = outcome.videos.len(), "fetched playlist page");
        if outcome.videos.len() >= MAX_PLAYLIST_VIDEOS {
            info!(playlist_id, cutoff = MAX_PLAYLIST_VIDEOS, "reached video cutoff");
            break;
        }
    }

    outcome
}

/// Fetch details for an explicit set of ids, in batches
///
/// Duplicates are dropped first; results keep the order of the input ids.
pub async fn fetch_by_ids<S: VideoSource + Sync + ?Sized>(source: &S, ids: &[String]) -> Result<FetchOutcome> {
    let mut seen = HashSet::new();
    let unique: Vec<String> = ids.iter().filter(|id| seen.insert(id.as_str())).cloned().collect();

    if unique.is_empty() {
        return Err(Error::NoVideoIds);
    }

    let mut outcome = FetchOutcome::default();
    let mut collected = HashSet::new();

    for (index, chunk) in unique.chunks(DETAILS_BATCH_SIZE).enumerate() {
        let batch = index + 1;
        match source.videos(chunk).await {
            Ok(items) => {
                // The API does not promise to answer in request order
                let mut records: Vec<VideoRecord> = items.iter().map(normalize).collect();
                records.sort_by_key(|r| chunk.iter().position(|id| *id == r.id).unwrap_or(usize::MAX));
                outcome.extend_unique(&mut collected, records);
            }
            Err(e) => {
                warn!(batch, error = %e, "video details batch failed");
                outcome.warnings.push(FetchWarning::DetailBatch {
                    batch,
                    message: e.to_string(),
                });
            }
        }
        info!(batch, fetched = outcome.videos.len(), "fetched id batch");
    }

    Ok(outcome)
}

/// List the user's playlists, seeded with Watch Later
pub async fn fetch_playlists<S: VideoSource + Sync + ?Sized>(source: &S) -> PlaylistListing {
    let mut playlists = vec![PlaylistDescriptor::watch_later()];
    let mut warning = None;
    let mut token = PageToken::Start;

    while token != PageToken::End {
        match source.list_playlists(&token).await {
            Ok(page) => {
                playlists.extend(page.items.into_iter().map(|p| PlaylistDescriptor {
                    id: p.id,
                    title: p.snippet.title,
                }));
                token = page.next;
            }
            Err(e) => {
                warn!(error = %e, "playlist listing failed");
                warning = Some(FetchWarning::Enumeration(e.to_string()));
                break;
            }
        }

        if playlists.len() > MAX_EXTRA_PLAYLISTS {
            break;
        }
    }

    PlaylistListing { playlists, warning }
}
