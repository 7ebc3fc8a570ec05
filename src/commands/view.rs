use serde::Serialize;

use crate::error::Result;
use crate::fetcher::FetchWarning;
use crate::listing::{ListingPage, PageInfo, SortOrder};
use crate::video::{PlaylistDescriptor, VideoRecord};

pub fn print_playlists(playlists: &[PlaylistDescriptor]) {
    println!("Playlists:\n");
    for (i, playlist) in playlists.iter().enumerate() {
        println!("{:>3}. {} ({})", i + 1, playlist.title, playlist.id);
    }
    println!();
}

pub fn print_warnings(warnings: &[FetchWarning]) {
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }
}

/// Results as cards, with page controls above and below
pub fn print_page(page: &ListingPage<'_>, order: SortOrder, search: &str) {
    print_summary(&page.info, order, search);
    println!("{}\n", nav_line(&page.info));

    for (offset, video) in page.items.iter().enumerate() {
        print_video_entry(page.info.range_start + offset, video);
    }

    println!("---");
    println!("{}", nav_line(&page.info));
}

/// Compact one-line-per-video table
pub fn print_list(page: &ListingPage<'_>, order: SortOrder, search: &str) {
    print_summary(&page.info, order, search);
    println!();
    println!("{:>4}  {:>9}  {:>7}  {:<50}  Channel", "#", "Duration", "Seconds", "Title");
    for (offset, video) in page.items.iter().enumerate() {
        println!(
            "{:>4}  {:>9}  {:>7}  {:<50}  {}",
            page.info.range_start + offset,
            video.duration_display,
            video.duration_seconds,
            truncate(&video.title, 50),
            video.channel
        );
    }
    println!();
    println!("{}", nav_line(&page.info));
}

#[derive(Serialize)]
struct PageExport<'a> {
    page: PageInfo,
    order: SortOrder,
    search: &'a str,
    videos: &'a [&'a VideoRecord],
}

pub fn print_json(page: &ListingPage<'_>, order: SortOrder, search: &str) -> Result<()> {
    let export = PageExport {
        page: page.info,
        order,
        search,
        videos: &page.items,
    };
    println!("{}", serde_json::to_string_pretty(&export)?);
    Ok(())
}

fn print_summary(info: &PageInfo, order: SortOrder, search: &str) {
    let filter = if search.is_empty() {
        String::new()
    } else {
        format!(" matching \"{}\"", search)
    };

    if info.total_count == 0 {
        println!("No videos{}.", filter);
    } else {
        println!(
            "Found {} videos{}. Showing {}-{} ({}).",
            info.total_count, filter, info.range_start, info.range_end, order
        );
    }
}

pub fn nav_line(info: &PageInfo) -> String {
    let prev = if info.has_previous() { "« prev" } else { "      " };
    let next = if info.has_next() { "next »" } else { "" };
    format!(
        "{}   Page {} of {}   {}",
        prev,
        info.page_index + 1,
        info.total_pages,
        next
    )
    .trim_end()
    .to_string()
}

fn print_video_entry(position: usize, video: &VideoRecord) {
    println!("#{} [{}] {}", position, video.duration_display, video.title);
    println!("   by {} | {}", video.channel, format_view_count(video.view_count));
    println!("   {}", video.watch_url());
    println!();
}

fn format_view_count(views: u64) -> String {
    if views >= 1_000_000 {
        format!("{:.1}M views", views as f64 / 1_000_000.0)
    } else if views >= 1_000 {
        format!("{:.1}K views", views as f64 / 1_000.0)
    } else {
        format!("{} views", views)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_chars.saturating_sub(3)).collect();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn info(page_index: usize, total_pages: usize) -> PageInfo {
        PageInfo {
            page_index,
            total_pages,
            total_count: total_pages * 10,
            range_start: page_index * 10 + 1,
            range_end: (page_index + 1) * 10,
        }
    }

    #[test]
    fn nav_hides_unavailable_directions() {
        assert_eq!(nav_line(&info(0, 1)), "         Page 1 of 1");
        assert_eq!(nav_line(&info(0, 3)), "         Page 1 of 3   next »");
        assert_eq!(nav_line(&info(1, 3)), "« prev   Page 2 of 3   next »");
        assert_eq!(nav_line(&info(2, 3)), "« prev   Page 3 of 3");
    }

    #[test]
    fn view_counts_are_abbreviated() {
        assert_eq!(format_view_count(999), "999 views");
        assert_eq!(format_view_count(12_300), "12.3K views");
        assert_eq!(format_view_count(4_560_000), "4.6M views");
    }

    #[test]
    fn long_titles_are_cut_on_char_boundaries() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("ééééééééééééé", 8), "ééééé...");
    }
}
