//! HTTP GET over libcurl.
//!
//! [`HttpClient`] is the explicit per-run session handle: it carries the
//! transfer settings and is cloned into every task. Transfers are blocking
//! curl calls; the async entry points run them on `spawn_blocking`.

use std::io::Write;
use std::str;
use std::sync::Arc;
use std::time::Duration;

use crate::config::HttpSettings;
use crate::error::FetchError;

/// Headers of the final response that the pipeline cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders {
    /// `Content-Disposition` value if present (filename hint).
    pub content_disposition: Option<String>,
    /// Total size in bytes, if `Content-Length` is present.
    pub content_length: Option<u64>,
}

/// Shared HTTP handle. Cheap to clone; safe to use from many tasks at once.
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    settings: Arc<HttpSettings>,
}

impl HttpClient {
    pub fn new(settings: HttpSettings) -> Self {
        Self {
            settings: Arc::new(settings),
        }
    }

    /// GETs `url` and returns the body as text (invalid UTF-8 replaced).
    pub async fn fetch_text(&self, url: &str) -> Result<String, FetchError> {
        let client = self.clone();
        let url = url.to_string();
        tokio::task::spawn_blocking(move || client.get_text_blocking(&url)).await?
    }

    /// Blocking variant of [`HttpClient::fetch_text`].
    pub fn get_text_blocking(&self, url: &str) -> Result<String, FetchError> {
        let mut body = Vec::new();
        self.get_to_writer(url, &mut body)?;
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// GETs `url`, streaming the body into `sink`. Follows redirects.
    ///
    /// Returns the final response's headers on a 2xx status. A transport
    /// failure is `Network`, a non-2xx status is `HttpStatus`, and a failed
    /// write into `sink` is `Io`. On error `sink` may hold a partial body.
    pub fn get_to_writer<W: Write>(
        &self,
        url: &str,
        sink: &mut W,
    ) -> Result<ResponseHeaders, FetchError> {
        let mut header_lines: Vec<String> = Vec::new();
        let mut write_error: Option<std::io::Error> = None;

        let mut easy = curl::easy::Easy::new();
        self.configure(&mut easy, url)?;

        let performed = {
            let mut transfer = easy.transfer();
            transfer.header_function(|data| {
                if let Ok(s) = str::from_utf8(data) {
                    let line = s.trim_end();
                    // A new status line starts the headers of a redirect target.
                    if line.starts_with("HTTP/") {
                        header_lines.clear();
                    }
                    header_lines.push(line.to_string());
                }
                true
            })?;
            transfer.write_function(|data| match sink.write_all(data) {
                Ok(()) => Ok(data.len()),
                Err(e) => {
                    write_error = Some(e);
                    Ok(0) // abort transfer
                }
            })?;
            transfer.perform()
        };

        if let Some(e) = write_error {
            return Err(FetchError::Io(e));
        }
        performed?;

        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(FetchError::HttpStatus { code });
        }

        Ok(parse_headers(&header_lines))
    }

    fn configure(&self, easy: &mut curl::easy::Easy, url: &str) -> Result<(), curl::Error> {
        let s = &self.settings;
        easy.url(url)?;
        easy.get(true)?;
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.useragent(&s.user_agent)?;
        easy.accept_encoding("")?;
        easy.connect_timeout(Duration::from_secs(s.connect_timeout_secs))?;
        if let Some(secs) = s.timeout_secs {
            easy.timeout(Duration::from_secs(secs))?;
        }
        if s.low_speed_limit_bytes > 0 {
            easy.low_speed_limit(s.low_speed_limit_bytes)?;
            easy.low_speed_time(Duration::from_secs(s.low_speed_time_secs))?;
        }
        Ok(())
    }
}

/// Parse collected header lines of the final response.
fn parse_headers(lines: &[String]) -> ResponseHeaders {
    let mut out = ResponseHeaders::default();
    for line in lines {
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        let name = name.trim();
        let value = value.trim();
        if name.eq_ignore_ascii_case("content-disposition") {
            out.content_disposition = Some(value.to_string());
        } else if name.eq_ignore_ascii_case("content-length") {
            out.content_length = value.parse::<u64>().ok();
        }
    }
    out
}
