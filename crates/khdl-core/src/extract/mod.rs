//! Album and track page extraction.
//!
//! The pipeline only depends on [`SiteAdapter`]; [`Khinsider`] is the
//! adapter for downloads.khinsider.com markup. Missing markup is never an
//! error: it yields an empty listing or no link.

mod khinsider;

pub use khinsider::{extract_album_listing, extract_download_link, Khinsider};

/// Tracks discovered on one album page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumListing {
    /// Album page URL this listing was parsed from.
    pub source_url: String,
    /// First heading of the main content, or "Unknown Album".
    pub title: String,
    /// Absolute track page URLs, in document order.
    pub track_page_urls: Vec<String>,
}

/// Parses one site's album and track pages.
pub trait SiteAdapter: Send + Sync {
    /// Album page → title and track page URLs.
    fn parse_album(&self, html: &str, source_url: &str) -> AlbumListing;

    /// Track page → first direct download URL ending with `extension`.
    fn parse_download_link(&self, html: &str, extension: &str) -> Option<String>;
}
