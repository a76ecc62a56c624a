//! HTTP transport over libcurl.
//!
//! Probing is a HEAD request; opening runs a GET whose body is streamed back
//! to the caller through [`HttpBody`].

mod body;
mod parse;

pub use body::HttpBody;

use super::{is_success, Response, Transport, TransportError};
use parse::HeaderInfo;
use std::collections::HashMap;
use std::str;
use std::time::Duration;
use url::Url;

/// Per-request curl settings.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub connect_timeout: Duration,
    /// Whole-transfer timeout.
    pub timeout: Duration,
    pub max_redirections: u32,
    /// Abort when slower than `low_speed_limit` bytes/s for `low_speed_time`.
    pub low_speed_limit: u32,
    pub low_speed_time: Duration,
    pub max_recv_speed: Option<u64>,
    pub buffer_size: Option<usize>,
    pub user_agent: Option<String>,
    /// Extra request headers ("Name" -> "value").
    pub headers: HashMap<String, String>,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(30),
            timeout: Duration::from_secs(3600),
            max_redirections: 10,
            low_speed_limit: 1024,
            low_speed_time: Duration::from_secs(60),
            max_recv_speed: None,
            buffer_size: None,
            user_agent: None,
            headers: HashMap::new(),
        }
    }
}

impl HttpOptions {
    /// Applies these options to a fresh handle for `url`.
    fn configure(&self, easy: &mut curl::easy::Easy, url: &Url) -> Result<(), curl::Error> {
        easy.url(url.as_str())?;
        easy.follow_location(true)?;
        easy.max_redirections(self.max_redirections)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(self.timeout)?;
        easy.low_speed_limit(self.low_speed_limit)?;
        easy.low_speed_time(self.low_speed_time)?;
        if let Some(speed) = self.max_recv_speed {
            easy.max_recv_speed(speed)?;
        }
        if let Some(sz) = self.buffer_size {
            easy.buffer_size(sz)?;
        }
        if let Some(agent) = &self.user_agent {
            easy.useragent(agent)?;
        }

        if !self.headers.is_empty() {
            let mut list = curl::easy::List::new();
            for (k, v) in &self.headers {
                list.append(&format!("{}: {}", k.trim(), v.trim()))?;
            }
            easy.http_headers(list)?;
        }
        Ok(())
    }
}

/// [`Transport`] for `http`/`https` URLs.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    options: HttpOptions,
}

impl HttpTransport {
    pub fn new(options: HttpOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &HttpOptions {
        &self.options
    }

    /// HEAD request; returns the final response's status and length.
    fn head(&self, url: &Url) -> Result<HeaderInfo, TransportError> {
        let mut lines: Vec<String> = Vec::new();

        let mut easy = curl::easy::Easy::new();
        self.options.configure(&mut easy, url)?;
        easy.nobody(true)?;

        {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    lines.push(s.trim_end().to_string());
                }
                true
            })?;
            transfer.perform()?;
        }

        let mut info = HeaderInfo::from_lines(lines.iter().map(String::as_str));
        if info.status.is_none() {
            info.status = Some(easy.response_code()?);
        }
        Ok(info)
    }
}

impl Transport for HttpTransport {
    type Source = Url;
    type Body = HttpBody;

    /// A missing or unparseable `Content-Length` counts as zero.
    fn probe_length(&self, url: &Url) -> Result<u64, TransportError> {
        let info = self.head(url)?;
        let code = info.status.unwrap_or(0);
        if !is_success(code) {
            return Err(TransportError::Status { code });
        }
        if info.content_length.is_none() {
            tracing::debug!(%url, "HEAD response without Content-Length");
        }
        Ok(info.content_length.unwrap_or(0))
    }

    fn open(&self, url: &Url) -> Result<Response<HttpBody>, TransportError> {
        HttpBody::open(url.clone(), self.options.clone())
    }
}
