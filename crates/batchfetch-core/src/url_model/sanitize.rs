//! Filename sanitization for Linux filesystems.

/// Linux NAME_MAX in bytes.
pub(crate) const NAME_MAX: usize = 255;

fn is_unsafe(c: char) -> bool {
    c == '/' || c == '\\' || c.is_control() || c.is_whitespace()
}

/// Makes `name` safe to use as a single path component.
///
/// Separators, control characters and whitespace become `_` (runs collapse
/// to one), leading/trailing dots and underscores are trimmed, and the
/// result is cut to 255 bytes on a char boundary. May return an empty string.
pub fn sanitize_filename(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if is_unsafe(c) {
            if !out.ends_with('_') {
                out.push('_');
            }
        } else {
            out.push(c);
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    truncate_on_char_boundary(trimmed, NAME_MAX).to_string()
}

/// Longest prefix of `s` that fits in `max` bytes without splitting a char.
pub(crate) fn truncate_on_char_boundary(s: &str, max: usize) -> &str {
    let mut end = s.len().min(max);
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passes_normal_names() {
        assert_eq!(sanitize_filename("debian-12.iso"), "debian-12.iso");
        assert_eq!(sanitize_filename("résumé.pdf"), "résumé.pdf");
    }

    #[test]
    fn replaces_separators_and_whitespace() {
        assert_eq!(sanitize_filename("a/b\\c"), "a_b_c");
        assert_eq!(sanitize_filename("two  spaces\tand\ttab"), "two_spaces_and_tab");
        assert_eq!(sanitize_filename("nul\0byte"), "nul_byte");
    }

    #[test]
    fn trims_dots_and_underscores() {
        assert_eq!(sanitize_filename("..hidden.."), "hidden");
        assert_eq!(sanitize_filename(" padded "), "padded");
        assert_eq!(sanitize_filename(".."), "");
    }

    #[test]
    fn limits_length_on_char_boundary() {
        let long = "é".repeat(200); // 400 bytes
        let out = sanitize_filename(&long);
        assert!(out.len() <= NAME_MAX);
        assert_eq!(out.len(), 254);
        assert!(out.chars().all(|c| c == 'é'));
    }
}
