//! Header-line parsing for HEAD probes and streamed GETs.

/// What we need from a response's header block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct HeaderInfo {
    /// Status code of the last status line seen (the final response after redirects).
    pub status: Option<u32>,
    /// `Content-Length` of that same response, if present and numeric.
    pub content_length: Option<u64>,
}

impl HeaderInfo {
    /// Feeds one raw header line. A status line starts a new response and
    /// discards what was collected for the previous one (redirect hops).
    pub fn push_line(&mut self, line: &str) {
        let line = line.trim();
        if line.is_empty() {
            return;
        }
        if let Some(code) = parse_status_line(line) {
            *self = HeaderInfo {
                status: Some(code),
                content_length: None,
            };
            return;
        }
        if let Some((name, value)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("content-length") {
                if let Ok(n) = value.trim().parse::<u64>() {
                    self.content_length = Some(n);
                }
            }
        }
    }

    pub fn from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        let mut info = HeaderInfo::default();
        for line in lines {
            info.push_line(line);
        }
        info
    }
}

/// Parses `HTTP/1.1 200 OK` (or `HTTP/2 404`) into the status code.
pub(crate) fn parse_status_line(line: &str) -> Option<u32> {
    let mut parts = line.split_whitespace();
    let version = parts.next()?;
    if !version.starts_with("HTTP/") {
        return None;
    }
    parts.next()?.parse().ok()
}
