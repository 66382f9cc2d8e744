//! downloads.khinsider.com markup.
//!
//! Album page: `div#pageContent` holds an `h2` title and `table#songlist`,
//! whose `td.playlistDownloadSong` cells link to track pages. Track page:
//! each `p` carrying a `span.songDownloadLink` has the direct file link as
//! its first anchor.

use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

use super::{AlbumListing, SiteAdapter};
use crate::config::DEFAULT_BASE_HOST;
use crate::url_model::UNKNOWN_ALBUM;

struct Selectors {
    page_content: Selector,
    heading: Selector,
    song_cells: Selector,
    anchor: Selector,
    paragraph: Selector,
    download_marker: Selector,
}

// Compiled once; all patterns are literals.
fn selectors() -> &'static Selectors {
    static S: OnceLock<Selectors> = OnceLock::new();
    S.get_or_init(|| {
        let css = |s: &str| Selector::parse(s).expect("static selector");
        Selectors {
            page_content: css("div#pageContent"),
            heading: css("h2"),
            song_cells: css("table#songlist td.playlistDownloadSong"),
            anchor: css("a"),
            paragraph: css("p"),
            download_marker: css("span.songDownloadLink"),
        }
    })
}

/// Site adapter for khinsider. `base_host` is prefixed to relative track hrefs.
#[derive(Debug, Clone)]
pub struct Khinsider {
    base_host: String,
}

impl Khinsider {
    pub fn new(base_host: impl Into<String>) -> Self {
        Self {
            base_host: base_host.into(),
        }
    }
}

impl Default for Khinsider {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_HOST)
    }
}

impl SiteAdapter for Khinsider {
    fn parse_album(&self, html: &str, source_url: &str) -> AlbumListing {
        extract_album_listing(html, source_url, &self.base_host)
    }

    fn parse_download_link(&self, html: &str, extension: &str) -> Option<String> {
        extract_download_link(html, extension)
    }
}

/// Parses an album page into its title and absolute track page URLs.
///
/// Without `div#pageContent` the result is "Unknown Album" with no tracks.
/// Song cells without an anchor (or an anchor without `href`) are skipped.
pub fn extract_album_listing(html: &str, source_url: &str, base_host: &str) -> AlbumListing {
    let doc = Html::parse_document(html);
    let sel = selectors();

    let mut listing = AlbumListing {
        source_url: source_url.to_string(),
        title: UNKNOWN_ALBUM.to_string(),
        track_page_urls: Vec::new(),
    };

    let Some(content) = doc.select(&sel.page_content).next() else {
        return listing;
    };

    if let Some(title) = content
        .select(&sel.heading)
        .next()
        .map(text_of)
        .filter(|t| !t.is_empty())
    {
        listing.title = title;
    }

    listing.track_page_urls = content
        .select(&sel.song_cells)
        .filter_map(|cell| cell.select(&sel.anchor).next())
        .filter_map(|a| a.value().attr("href"))
        .map(|href| join_host(base_host, href))
        .collect();

    listing
}

/// Returns the first download-paragraph link whose `href` ends with
/// `extension` (case-sensitive), in document order.
pub fn extract_download_link(html: &str, extension: &str) -> Option<String> {
    let doc = Html::parse_document(html);
    let sel = selectors();

    doc.select(&sel.paragraph)
        .filter(|p| p.select(&sel.download_marker).next().is_some())
        .filter_map(|p| p.select(&sel.anchor).next())
        .filter_map(|a| a.value().attr("href"))
        .find(|href| href.ends_with(extension))
        .map(str::to_string)
}

fn text_of(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// `https://host` + `/path` → `https://host/path`; absolute hrefs pass through.
fn join_host(base_host: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        return href.to_string();
    }
    let base = base_host.trim_end_matches('/');
    if href.starts_with('/') {
        format!("{}{}", base, href)
    } else {
        format!("{}/{}", base, href)
    }
}
