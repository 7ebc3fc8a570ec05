use tracing::info;

use crate::error::{Error, Result};
use crate::extract::extract_ids;
use crate::fetcher::{FetchOutcome, FetchWarning, fetch_by_ids, fetch_playlist, fetch_playlists};
use crate::listing::{ListingPage, PageSize, SortOrder, ViewState, render_page};
use crate::video::{PlaylistDescriptor, VideoRecord};
use crate::youtube::VideoSource;

/// Result of loading a collection into the session
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    pub loaded: usize,
    pub warnings: Vec<FetchWarning>,
}

impl LoadReport {
    pub fn is_empty(&self) -> bool {
        self.loaded == 0
    }
}

/// Everything one signed-in user works with
///
/// Created after a successful sign-in and dropped on sign-out, which clears
/// the fetched records and view state with it. All mutation goes through
/// `&mut self`, so one session is never driven by two interactions at once.
pub struct Session {
    source: Box<dyn VideoSource + Send + Sync>,
    playlists: Vec<PlaylistDescriptor>,
    records: Vec<VideoRecord>,
    view: Option<ViewState>,
    page_size: PageSize,
}

impl Session {
    pub fn new(source: Box<dyn VideoSource + Send + Sync>, page_size: PageSize) -> Self {
        Self {
            source,
            playlists: vec![PlaylistDescriptor::watch_later()],
            records: Vec::new(),
            view: None,
            page_size,
        }
    }

    pub fn playlists(&self) -> &[PlaylistDescriptor] {
        &self.playlists
    }

    pub fn records(&self) -> &[VideoRecord] {
        &self.records
    }

    pub fn view(&self) -> Option<&ViewState> {
        self.view.as_ref()
    }

    /// Re-read the user's playlists; Watch Later stays first even on failure
    pub async fn refresh_playlists(&mut self) -> Option<FetchWarning> {
        let listing = fetch_playlists(&*self.source).await;
        self.playlists = listing.playlists;
        listing.warning
    }

    /// Find a playlist by its 1-based position in [`Self::playlists`], id or title
    pub fn resolve_playlist(&self, selector: &str) -> Result<PlaylistDescriptor> {
        let selector = selector.trim();

        if let Ok(position) = selector.parse::<usize>() {
            if let Some(playlist) = position.checked_sub(1).and_then(|i| self.playlists.get(i)) {
                return Ok(playlist.clone());
            }
        }

        self.playlists
            .iter()
            .find(|p| p.id == selector || p.title.eq_ignore_ascii_case(selector))
            .cloned()
            .ok_or_else(|| Error::UnknownPlaylist(selector.to_string()))
    }

    /// Fetch a playlist and, if anything came back, make it the current collection
    ///
    /// An empty report leaves the previous collection in place; for Watch
    /// Later this is the cue to fall back to [`Self::load_pasted`].
    pub async fn load_playlist(&mut self, playlist_id: &str, order: SortOrder) -> LoadReport {
        let outcome = fetch_playlist(&*self.source, playlist_id).await;
        info!(playlist_id, videos = outcome.videos.len(), "playlist fetched");
        self.install(outcome, order)
    }

    /// Extract ids from pasted links and load their details
    pub async fn load_pasted(&mut self, text: &str, order: SortOrder) -> Result<LoadReport> {
        let ids = extract_ids(text);
        if ids.is_empty() {
            return Err(Error::NoVideoIds);
        }

        info!(ids = ids.len(), "fetching pasted videos");
        let outcome = fetch_by_ids(&*self.source, &ids).await?;
        Ok(self.install(outcome, order))
    }

    fn install(&mut self, outcome: FetchOutcome, order: SortOrder) -> LoadReport {
        let report = LoadReport {
            loaded: outcome.videos.len(),
            warnings: outcome.warnings,
        };
        if report.is_empty() {
            return report;
        }

        self.records = outcome.videos;
        let page_size = self.page_size;
        let view = self.view.get_or_insert_with(|| ViewState::new(order, page_size));
        view.sort_order = order;
        view.page_index = 0;
        report
    }

    pub fn set_search(&mut self, text: &str) {
        if let Some(view) = self.view.as_mut() {
            view.set_search(text);
        }
    }

    pub fn set_sort_order(&mut self, order: SortOrder) {
        if let Some(view) = self.view.as_mut() {
            view.sort_order = order;
        }
    }

    pub fn set_page_size(&mut self, page_size: PageSize) {
        self.page_size = page_size;
        if let Some(view) = self.view.as_mut() {
            view.page_size = page_size;
        }
    }

    /// Move to the next page; `false` when already on the last one
    pub fn next_page(&mut self) -> bool {
        let Some(view) = self.view.as_mut() else {
            return false;
        };
        let total_pages = render_page(&self.records, view).info.total_pages;
        view.page_index = view.page_index.min(total_pages - 1);
        view.next_page(total_pages)
    }

    /// Move to the previous page; `false` when already on the first one
    pub fn previous_page(&mut self) -> bool {
        let Some(view) = self.view.as_mut() else {
            return false;
        };
        let clamped = render_page(&self.records, view).info.page_index;
        view.page_index = clamped;
        view.previous_page()
    }

    /// Page to display, or `None` before the first successful fetch
    pub fn current_page(&mut self) -> Option<ListingPage<'_>> {
        let view = self.view.as_mut()?;
        let page = render_page(&self.records, view);
        view.page_index = page.info.page_index;
        Some(page)
    }

    /// End the session, discarding credentials, records and view state
    pub fn sign_out(self) {
        info!(records = self.records.len(), "signed out");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::fake::FakeSource;
    use pretty_assertions::assert_eq;

    fn source() -> FakeSource {
        let mut source = FakeSource::default();
        for i in 0..25u64 {
            source = source.with_video(&format!("vid{:08}", i), &format!("PT{}S", 100 - i));
        }
        let page: Vec<String> = (0..25).map(|i| format!("vid{:08}", i)).collect();
        source.playlist_pages.insert("PL1".to_string(), vec![page]);
        source.playlists = vec![vec![("PL1".to_string(), "Lectures".to_string())]];
        source
    }

    fn session() -> Session {
        Session::new(Box::new(source()), PageSize::default())
    }

    #[tokio::test]
    async fn no_view_before_first_fetch() {
        let mut session = session();
        assert!(session.current_page().is_none());
        assert!(!session.next_page());
    }

    #[tokio::test]
    async fn fetch_creates_view_sorted_as_requested() {
        let mut session = session();

        let report = session.load_playlist("PL1", SortOrder::Shortest).await;
        assert_eq!(report.loaded, 25);

        let page = session.current_page().unwrap();
        assert_eq!(page.info.total_pages, 3);
        assert_eq!(page.items[0].id, "vid00000024");
    }

    #[tokio::test]
    async fn search_change_resets_to_first_page() {
        let mut session = session();
        session.load_playlist("PL1", SortOrder::Shortest).await;
        assert!(session.next_page());
        assert!(session.next_page());
        assert!(!session.next_page());
        assert_eq!(session.view().unwrap().page_index, 2);

        session.set_search("VIDEO VID");

        assert_eq!(session.view().unwrap().page_index, 0);
        assert_eq!(session.current_page().unwrap().info.total_count, 25);
    }

    #[tokio::test]
    async fn new_fetch_resets_page_and_sort() {
        let mut session = session();
        session.load_playlist("PL1", SortOrder::Shortest).await;
        session.next_page();

        session
            .load_pasted("https://youtu.be/vid00000003 https://youtu.be/vid00000004", SortOrder::Longest)
            .await
            .unwrap();

        let view = session.view().unwrap();
        assert_eq!(view.page_index, 0);
        assert_eq!(view.sort_order, SortOrder::Longest);
        assert_eq!(session.records().len(), 2);
    }

    #[tokio::test]
    async fn empty_playlist_keeps_previous_collection() {
        let mut session = session();
        session.load_playlist("PL1", SortOrder::Shortest).await;

        let report = session.load_playlist("WL", SortOrder::Longest).await;

        assert!(report.is_empty());
        assert_eq!(session.records().len(), 25);
        assert_eq!(session.view().unwrap().sort_order, SortOrder::Shortest);
    }

    #[tokio::test]
    async fn paste_without_links_is_rejected() {
        let mut session = session();
        let result = session.load_pasted("nothing to see here", SortOrder::Shortest).await;
        assert!(matches!(result, Err(Error::NoVideoIds)));
    }

    #[tokio::test]
    async fn page_size_change_clamps_page() {
        let mut session = session();
        session.load_playlist("PL1", SortOrder::Shortest).await;
        session.next_page();
        session.next_page();

        session.set_page_size(PageSize::try_from(50).unwrap());

        assert_eq!(session.current_page().unwrap().info.page_index, 0);
        assert_eq!(session.view().unwrap().page_index, 0);
        assert!(!session.previous_page());
    }

    #[tokio::test]
    async fn playlists_resolve_by_position_id_or_title() {
        let mut session = session();
        assert!(session.refresh_playlists().await.is_none());

        assert_eq!(session.resolve_playlist("1").unwrap().id, "WL");
        assert_eq!(session.resolve_playlist("2").unwrap().id, "PL1");
        assert_eq!(session.resolve_playlist("PL1").unwrap().title, "Lectures");
        assert_eq!(session.resolve_playlist("lectures").unwrap().id, "PL1");
        assert!(matches!(session.resolve_playlist("9"), Err(Error::UnknownPlaylist(_))));
    }
}
