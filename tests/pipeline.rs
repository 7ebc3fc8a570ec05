use async_trait::async_trait;
use pretty_assertions::assert_eq;
use serde_json::json;

use wl_sorter::error::{Error, Result};
use wl_sorter::listing::{PageSize, SortOrder};
use wl_sorter::session::Session;
use wl_sorter::youtube::{ApiPlaylist, ApiVideo, Page, PageToken, VideoSource};

/// Answers `videos.list` from a fixed catalogue; Watch Later comes back empty
struct Catalogue {
    videos: Vec<(&'static str, &'static str, &'static str)>,
}

#[async_trait]
impl VideoSource for Catalogue {
    async fn list_playlists(&self, _page: &PageToken) -> Result<Page<ApiPlaylist>> {
        Err(Error::Api {
            status: 403,
            message: "insufficient permissions".to_string(),
        })
    }

    async fn list_playlist_items(&self, _playlist_id: &str, _page: &PageToken) -> Result<Page<String>> {
        Ok(Page {
            items: Vec::new(),
            next: PageToken::End,
        })
    }

    async fn videos(&self, ids: &[String]) -> Result<Vec<ApiVideo>> {
        Ok(self
            .videos
            .iter()
            .filter(|(id, _, _)| ids.iter().any(|wanted| wanted == id))
            .map(|(id, title, duration)| {
                serde_json::from_value(json!({
                    "id": id,
                    "snippet": {
                        "title": title,
                        "channelTitle": "Some Channel",
                        "thumbnails": {"medium": {"url": format!("https://i.ytimg.com/vi/{}/mqdefault.jpg", id)}}
                    },
                    "contentDetails": {"duration": duration},
                    "statistics": {"viewCount": "42"}
                }))
                .unwrap()
            })
            .collect())
    }
}

fn catalogue() -> Catalogue {
    Catalogue {
        videos: vec![
            ("aaaaaaaaaaa", "Rust in 100 Seconds", "PT2M20S"),
            ("bbbbbbbbbbb", "Conference keynote", "PT1H2M5S"),
            ("ccccccccccc", "Live: coding stream", "P0D"),
            ("ddddddddddd", "Async Rust explained", "PT25M"),
            ("eeeeeeeeeee", "Quick rust tip", "PT59S"),
        ],
    }
}

const PASTED: &str = "\
https://www.youtube.com/watch?v=aaaaaaaaaaa&list=WL&index=1
https://www.youtube.com/watch?v=bbbbbbbbbbb&list=WL&index=2
not a link
https://youtu.be/ccccccccccc
https://www.youtube.com/watch?v=ddddddddddd
https://youtu.be/eeeeeeeeeee?si=share
https://www.youtube.com/watch?v=aaaaaaaaaaa
";

#[tokio::test]
async fn watch_later_falls_back_to_pasted_links() {
    let mut session = Session::new(Box::new(catalogue()), PageSize::default());

    // Playlist listing is denied, Watch Later is still offered
    assert!(session.refresh_playlists().await.is_some());
    assert_eq!(session.playlists()[0].id, "WL");

    let report = session.load_playlist("WL", SortOrder::Shortest).await;
    assert!(report.is_empty());
    assert!(report.warnings.is_empty());
    assert!(session.current_page().is_none());

    let report = session.load_pasted(PASTED, SortOrder::Longest).await.unwrap();
    assert_eq!(report.loaded, 5);

    let page = session.current_page().unwrap();
    let shown: Vec<(&str, &str)> = page
        .items
        .iter()
        .map(|v| (v.title.as_str(), v.duration_display.as_str()))
        .collect();
    assert_eq!(
        shown,
        vec![
            ("Conference keynote", "1:02:05"),
            ("Async Rust explained", "25:00"),
            ("Rust in 100 Seconds", "2:20"),
            ("Quick rust tip", "0:59"),
            ("Live: coding stream", "Live"),
        ]
    );
}

#[tokio::test]
async fn search_and_paging_over_pasted_videos() {
    let mut session = Session::new(Box::new(catalogue()), PageSize::default());
    session.load_pasted(PASTED, SortOrder::Shortest).await.unwrap();

    session.set_search("RUST");
    let page = session.current_page().unwrap();
    let ids: Vec<&str> = page.items.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["eeeeeeeeeee", "aaaaaaaaaaa", "ddddddddddd"]);
    assert_eq!(page.info.total_pages, 1);
    assert_eq!((page.info.range_start, page.info.range_end), (1, 3));

    session.set_search("no such title");
    let page = session.current_page().unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.info.total_pages, 1);
}

#[tokio::test]
async fn paste_without_links_fetches_nothing() {
    let mut session = Session::new(Box::new(catalogue()), PageSize::default());
    let result = session.load_pasted("dQw4w9WgXcQ only a bare id", SortOrder::Shortest).await;
    assert!(matches!(result, Err(Error::NoVideoIds)));
}
