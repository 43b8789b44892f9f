//! Upload file name handling.
//!
//! Client-supplied names are never used as storage keys; they are sanitized
//! for logging and only their extension is taken into account.

use std::sync::LazyLock;

use regex::Regex;

static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));

static UNSAFE_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9._-]").expect("valid regex"));

/// Reduce a client-supplied file name to a safe ASCII name.
///
/// Directory components are dropped, whitespace becomes `_`, characters
/// outside `[A-Za-z0-9._-]` are removed and leading dots or underscores are
/// stripped. The result may be empty.
#[must_use]
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(&['/', '\\'][..]).next().unwrap_or_default();
    let joined = WHITESPACE.replace_all(base.trim(), "_");
    let cleaned = UNSAFE_CHARS.replace_all(&joined, "");
    cleaned.trim_start_matches(&['.', '_'][..]).to_string()
}

/// Split a file name into stem and extension at the last dot.
///
/// Returns `None` when there is no extension.
#[must_use]
pub fn split_extension(name: &str) -> Option<(&str, &str)> {
    match name.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => Some((stem, ext)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_plain_name() {
        assert_eq!(sanitize_file_name("moon.png"), "moon.png");
    }

    #[test]
    fn test_sanitize_strips_directories() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name(r"C:\Users\me\earth.jpg"), "earth.jpg");
    }

    #[test]
    fn test_sanitize_whitespace_and_symbols() {
        assert_eq!(sanitize_file_name("  my planet (1).gif "), "my_planet_1.gif");
        assert_eq!(sanitize_file_name("Vénus.jpeg"), "Vnus.jpeg");
    }

    #[test]
    fn test_sanitize_leading_dots() {
        assert_eq!(sanitize_file_name(".hidden.png"), "hidden.png");
        assert_eq!(sanitize_file_name("..."), "");
    }

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("moon.png"), Some(("moon", "png")));
        assert_eq!(
            split_extension("archive.tar.gz"),
            Some(("archive.tar", "gz"))
        );
    }

    #[test]
    fn test_split_extension_missing() {
        assert_eq!(split_extension("README"), None);
        assert_eq!(split_extension("trailing."), None);
        assert_eq!(split_extension(".png"), None);
    }
}
