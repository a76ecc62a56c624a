//! Local filenames for remote sources.
//!
//! The last URL path segment is percent-decoded, sanitized for Linux, and
//! falls back to [`DEFAULT_FILENAME`] when nothing usable remains.

mod sanitize;

pub use sanitize::sanitize_filename;

use sanitize::{truncate_on_char_boundary, NAME_MAX};

use std::collections::HashSet;
use url::Url;

/// Filename used when the URL path yields nothing usable.
pub const DEFAULT_FILENAME: &str = "download.bin";

/// Last non-empty path segment of `url`, percent-decoded.
pub fn last_segment(url: &Url) -> Option<String> {
    let segment = url.path_segments()?.filter(|s| !s.is_empty()).last()?;
    let raw = urlencoding::decode_binary(segment.as_bytes());
    let decoded = String::from_utf8_lossy(&raw).into_owned();
    if decoded.is_empty() || decoded == "." || decoded == ".." {
        return None;
    }
    Some(decoded)
}

/// Derives a safe filename for saving `url`.
///
/// - `https://example.com/archive.zip` → `archive.zip`
/// - `https://example.com/` → `download.bin`
pub fn derive_filename(url: &Url) -> String {
    let sanitized = last_segment(url)
        .map(|s| sanitize_filename(&s))
        .unwrap_or_default();
    if sanitized.is_empty() || sanitized == "." || sanitized == ".." {
        DEFAULT_FILENAME.to_string()
    } else {
        sanitized
    }
}

/// Filenames for a batch of URLs, made unique by suffixing `-1`, `-2`, ...
/// before the extension on collisions (`a.iso`, `a-1.iso`). The stem is
/// shortened when needed so a suffixed name still fits in 255 bytes.
pub fn unique_filenames(urls: &[Url]) -> Vec<String> {
    let mut taken = HashSet::new();
    urls.iter()
        .map(|url| {
            let name = derive_filename(url);
            if taken.insert(name.clone()) {
                return name;
            }
            let (stem, ext) = match name.rfind('.') {
                // an extension that leaves no room for a stem is treated as part of it
                Some(dot) if dot > 0 && name.len() - dot < NAME_MAX / 2 => name.split_at(dot),
                _ => (name.as_str(), ""),
            };
            let mut n = 1;
            loop {
                let suffix = format!("-{}", n);
                let room = NAME_MAX - suffix.len() - ext.len();
                let candidate = format!("{}{}{}", truncate_on_char_boundary(stem, room), suffix, ext);
                if taken.insert(candidate.clone()) {
                    return candidate;
                }
                n += 1;
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn derive_filename_from_url_path() {
        assert_eq!(derive_filename(&url("https://example.com/archive.zip")), "archive.zip");
        assert_eq!(
            derive_filename(&url("https://cdn.example.com/path/to/debian-12.iso")),
            "debian-12.iso"
        );
        assert_eq!(
            derive_filename(&url("https://example.com/file.zip?token=abc")),
            "file.zip"
        );
    }

    #[test]
    fn root_or_empty_path_uses_default() {
        assert_eq!(derive_filename(&url("https://example.com/")), DEFAULT_FILENAME);
        assert_eq!(derive_filename(&url("https://example.com")), DEFAULT_FILENAME);
        assert_eq!(derive_filename(&url("https://example.com/dir/")), "dir");
    }

    #[test]
    fn percent_encoded_segment_is_decoded_and_sanitized() {
        assert_eq!(
            derive_filename(&url("https://example.com/my%20report.pdf")),
            "my_report.pdf"
        );
        assert_eq!(derive_filename(&url("https://example.com/a%2Fb")), "a_b");
        assert_eq!(derive_filename(&url("https://example.com/%2e%2e")), DEFAULT_FILENAME);
    }

    #[test]
    fn unique_names_for_colliding_urls() {
        let urls = [
            url("https://a.example/x/file.iso"),
            url("https://b.example/y/file.iso"),
            url("https://c.example/"),
            url("https://d.example/file.iso"),
            url("https://e.example/"),
        ];
        assert_eq!(
            unique_filenames(&urls),
            vec!["file.iso", "file-1.iso", "download.bin", "file-2.iso", "download-1.bin"]
        );
    }

    #[test]
    fn unique_names_stay_within_name_max() {
        // 254 bytes, two-byte chars in the stem
        let long = format!("{}.iso", "é".repeat(125));
        let u = url(&format!("https://example.com/{}", long));
        let names = unique_filenames(&[u.clone(), u.clone(), u]);
        assert_eq!(names[0], long);
        for name in &names[1..] {
            assert!(name.len() <= NAME_MAX, "{} bytes", name.len());
            assert!(name.ends_with(".iso"));
        }
        assert!(names[1].ends_with("-1.iso"));
        assert!(names[2].ends_with("-2.iso"));
        assert_ne!(names[1], names[2]);
    }

    #[test]
    fn unique_names_with_overlong_extension() {
        let long = format!("a.{}", "x".repeat(253));
        let u = url(&format!("https://example.com/{}", long));
        let names = unique_filenames(&[u.clone(), u]);
        assert_eq!(names[0].len(), NAME_MAX);
        assert_eq!(names[1].len(), NAME_MAX);
        assert!(names[1].ends_with("-1"));
    }
}
