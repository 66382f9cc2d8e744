//! Album URL list parsing for batch input (one URL per line).

/// Splits free-form text into album URLs: one per line, trimmed; blank lines
/// and `#` comments are dropped.
pub fn album_urls_from_text(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}
