//! Search, sort and pagination over an already fetched collection.
//!
//! [`render_page`] never touches the records it is given; it borrows them and
//! returns the slice to draw together with the numbers the pagination
//! controls need.

use std::fmt;

use serde::Serialize;

use crate::error::Error;
use crate::video::VideoRecord;

/// Direction of the duration sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, clap::ValueEnum)]
pub enum SortOrder {
    /// Shortest -> Longest
    #[default]
    Shortest,
    /// Longest -> Shortest
    Longest,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Shortest => write!(f, "Shortest -> Longest"),
            SortOrder::Longest => write!(f, "Longest -> Shortest"),
        }
    }
}

/// Videos per page; only the sizes offered in the selector are allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageSize(usize);

impl PageSize {
    pub const ALLOWED: [usize; 4] = [10, 20, 50, 100];

    pub fn get(self) -> usize {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize(Self::ALLOWED[0])
    }
}

impl TryFrom<usize> for PageSize {
    type Error = Error;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        if Self::ALLOWED.contains(&value) {
            Ok(PageSize(value))
        } else {
            Err(Error::InvalidPageSize(value))
        }
    }
}

/// Sort, filter and paging choices for the current collection
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ViewState {
    pub sort_order: SortOrder,
    pub search_text: String,
    pub page_size: PageSize,
    pub page_index: usize,
}

impl ViewState {
    pub fn new(sort_order: SortOrder, page_size: PageSize) -> Self {
        Self {
            sort_order,
            page_size,
            ..Default::default()
        }
    }

    /// Replace the search text; a different value sends the view back to page one
    pub fn set_search(&mut self, text: &str) {
        if self.search_text != text {
            self.search_text = text.to_string();
            self.page_index = 0;
        }
    }

    /// Step back one page, staying put on the first
    pub fn previous_page(&mut self) -> bool {
        if self.page_index == 0 {
            return false;
        }
        self.page_index -= 1;
        true
    }

    /// Step forward one page, staying put on the last
    pub fn next_page(&mut self, total_pages: usize) -> bool {
        if self.page_index + 1 >= total_pages {
            return false;
        }
        self.page_index += 1;
        true
    }
}

/// Numbers shown around the results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    /// Zero-based, already clamped
    pub page_index: usize,
    pub total_pages: usize,
    pub total_count: usize,
    /// One-based position of the first item on the page, `0` when empty
    pub range_start: usize,
    /// One-based position of the last item on the page
    pub range_end: usize,
}

impl PageInfo {
    pub fn has_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn has_next(&self) -> bool {
        self.page_index + 1 < self.total_pages
    }
}

/// The slice of records to draw plus its pagination metadata
#[derive(Debug, Clone)]
pub struct ListingPage<'a> {
    pub items: Vec<&'a VideoRecord>,
    pub info: PageInfo,
}

/// Filter by title, sort by duration and cut out the requested page
pub fn render_page<'a>(records: &'a [VideoRecord], view: &ViewState) -> ListingPage<'a> {
    let needle = view.search_text.to_lowercase();
    let mut filtered: Vec<&VideoRecord> = records
        .iter()
        .filter(|r| needle.is_empty() || r.title.to_lowercase().contains(&needle))
        .collect();

    // sort_by_key is stable, so equal durations keep their input order either way
    match view.sort_order {
        SortOrder::Shortest => filtered.sort_by_key(|r| r.duration_seconds),
        SortOrder::Longest => filtered.sort_by_key(|r| std::cmp::Reverse(r.duration_seconds)),
    }

    let page_size = view.page_size.get();
    let total_count = filtered.len();
    let total_pages = total_count.div_ceil(page_size).max(1);
    let page_index = view.page_index.min(total_pages - 1);

    let start = (page_index * page_size).min(total_count);
    let end = (start + page_size).min(total_count);
    let items = filtered[start..end].to_vec();

    ListingPage {
        items,
        info: PageInfo {
            page_index,
            total_pages,
            total_count,
            range_start: if start < end { start + 1 } else { 0 },
            range_end: end,
        },
    }
}
