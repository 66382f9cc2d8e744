//! Filesystem-safe filename sanitization.

/// Maximum length of a sanitized name, in characters.
pub const NAME_MAX: usize = 255;

/// Directory name used when an album title sanitizes to nothing usable.
pub const UNKNOWN_ALBUM: &str = "Unknown Album";

fn is_illegal(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*') || ('\0'..='\x1f').contains(&c)
}

/// Sanitizes a candidate filename.
///
/// - Replaces `< > : " / \ | ? *` and control characters U+0000..=U+001F with `_`
/// - Keeps everything else untouched (case, whitespace, unicode)
/// - Truncates to the first 255 characters
pub fn sanitize_filename(name: &str) -> String {
    name.chars()
        .map(|c| if is_illegal(c) { '_' } else { c })
        .take(NAME_MAX)
        .collect()
}

/// Sanitizes an album title for use as a single directory segment.
///
/// Same substitution as [`sanitize_filename`]; names that would still be
/// unusable as a directory (`.`, `..`, empty, blank) become [`UNKNOWN_ALBUM`].
pub fn sanitize_dir_name(title: &str) -> String {
    let sanitized = sanitize_filename(title);
    let trimmed = sanitized.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." {
        UNKNOWN_ALBUM.to_string()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ILLEGAL: &[char] = &['<', '>', ':', '"', '/', '\\', '|', '?', '*'];

    #[test]
    fn replaces_each_illegal_char() {
        assert_eq!(sanitize_filename("a<b>c:d\"e/f\\g|h?i*j"), "a_b_c_d_e_f_g_h_i_j");
    }

    #[test]
    fn control_chars() {
        assert_eq!(sanitize_filename("file\x00name\x1f.txt"), "file_name_.txt");
        assert_eq!(sanitize_filename("tab\there"), "tab_here");
    }

    #[test]
    fn clean_name_is_identity() {
        for name in ["01 - Prelude.mp3", "Aerith's Theme.flac", "café  ~ remix .ogg", ""] {
            assert_eq!(sanitize_filename(name), name);
        }
    }

    #[test]
    fn del_and_unicode_untouched() {
        assert_eq!(sanitize_filename("x\x7fy"), "x\x7fy");
        assert_eq!(sanitize_filename("ファイナルファンタジー"), "ファイナルファンタジー");
    }

    #[test]
    fn truncates_to_255_chars_not_bytes() {
        let long: String = "é".repeat(300);
        let out = sanitize_filename(&long);
        assert_eq!(out.chars().count(), NAME_MAX);
        assert_eq!(out.len(), NAME_MAX * 2);
    }

    #[test]
    fn output_never_contains_illegal_chars() {
        let samples = [
            "<<<>>>",
            "C:\\Program Files\\x?.mp3",
            "\x01\x02\x03",
            "../../etc/passwd",
            "a\"b\"c",
        ];
        for s in samples {
            let out = sanitize_filename(s);
            assert!(!out.chars().any(|c| ILLEGAL.contains(&c) || c < '\x20'), "{out:?}");
            assert!(out.chars().count() <= NAME_MAX);
        }
    }

    #[test]
    fn idempotent() {
        let long = format!("{}?{}", "a".repeat(200), "b/".repeat(100));
        for s in ["x:y", "plain.mp3", "\x00", long.as_str()] {
            let once = sanitize_filename(s);
            assert_eq!(sanitize_filename(&once), once);
        }
    }

    #[test]
    fn dir_name_neutralizes_traversal() {
        assert_eq!(sanitize_dir_name("../evil"), ".._evil");
        assert_eq!(sanitize_dir_name(".."), UNKNOWN_ALBUM);
        assert_eq!(sanitize_dir_name("."), UNKNOWN_ALBUM);
        assert_eq!(sanitize_dir_name("   "), UNKNOWN_ALBUM);
        assert_eq!(sanitize_dir_name(""), UNKNOWN_ALBUM);
        assert_eq!(sanitize_dir_name("Final Fantasy VII"), "Final Fantasy VII");
        assert_eq!(sanitize_dir_name("Halo 3: ODST"), "Halo 3_ ODST");
    }
}
