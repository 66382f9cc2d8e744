//! URL modeling and filename derivation.
//!
//! Derives safe local filenames from the Content-Disposition header or the
//! URL path, and sanitizes album titles for use as directory names.

mod content_disposition;
mod path;
mod sanitize;

pub use content_disposition::parse_content_disposition_filename;
pub use path::filename_from_url_path;
pub use sanitize::{sanitize_dir_name, sanitize_filename, NAME_MAX, UNKNOWN_ALBUM};

/// Default filename when URL path and Content-Disposition yield nothing usable.
pub const DEFAULT_FILENAME: &str = "download.bin";

/// Derives a safe filename for saving a download.
///
/// Prefers the filename from `content_disposition` (if present and parseable),
/// otherwise uses the percent-decoded last path segment of `url`. The result
/// is passed through [`sanitize_filename`].
///
/// # Examples
///
/// - `derive_filename("https://example.com/01%20Intro.mp3", None)` → `"01 Intro.mp3"`
/// - `derive_filename("https://example.com/", Some("attachment; filename=\"a.flac\""))` → `"a.flac"`
pub fn derive_filename(url: &str, content_disposition: Option<&str>) -> String {
    let candidate = content_disposition
        .and_then(parse_content_disposition_filename)
        .or_else(|| filename_from_url_path(url));

    let Some(raw) = candidate else {
        return DEFAULT_FILENAME.to_string();
    };

    let sanitized = sanitize_filename(&raw);
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        DEFAULT_FILENAME.to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_filename_from_url_path() {
        assert_eq!(
            derive_filename("https://example.com/ost/track.mp3", None),
            "track.mp3"
        );
        assert_eq!(
            derive_filename("https://example.com/ost/01%20-%20Opening%3F.mp3", None),
            "01 - Opening_.mp3"
        );
    }

    #[test]
    fn derive_filename_content_disposition_overrides_url() {
        assert_eq!(
            derive_filename(
                "https://example.com/track.mp3",
                Some("attachment; filename=\"Aerith: Theme.mp3\"")
            ),
            "Aerith_ Theme.mp3"
        );
    }

    #[test]
    fn derive_filename_unparseable_disposition_falls_back_to_url() {
        assert_eq!(
            derive_filename("https://example.com/track.ogg", Some("inline")),
            "track.ogg"
        );
    }

    #[test]
    fn derive_filename_empty_url_path_fallback() {
        assert_eq!(derive_filename("https://example.com/", None), DEFAULT_FILENAME);
        assert_eq!(derive_filename("https://example.com", None), DEFAULT_FILENAME);
    }

    #[test]
    fn derive_filename_reserved_names_fallback() {
        assert_eq!(
            derive_filename("https://example.com/x", Some("attachment; filename=..")),
            DEFAULT_FILENAME
        );
    }
}
