//! Turning resolved payloads into HTTP-shaped responses.

use std::collections::BTreeMap;

use bytes::Bytes;
use serde_json::Value;

use ssb_fetch_core::{resolve_type, ByteRange, Identifier, JSON_MIME};

use crate::config::FetchConfig;
use crate::error::FetchError;
use crate::request::Method;

/// Content type of plain-text error bodies.
pub const TEXT_MIME: &str = "text/plain; charset=utf-8";

/// What a request resolved to, before it is rendered.
#[derive(Debug)]
pub enum ResolvedPayload {
    /// A message record or a profile, served as JSON.
    Record(Value),
    /// Blob bytes, whole or the concatenation of the requested ranges.
    Blob {
        id: Identifier,
        bytes: Bytes,
        is_partial: bool,
        /// Size of the whole blob, if the backend reported it.
        total_size: Option<u64>,
    },
    /// Resolution failed.
    Error(FetchError),
}

/// A rendered response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: BTreeMap<String, String>,
    /// `None` for HEAD requests.
    pub body: Option<Bytes>,
}

impl HttpResponse {
    /// Look up a header by case-insensitive name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn content_type(&self) -> Option<&str> {
        self.header("Content-Type")
    }

    pub fn content_length(&self) -> Option<u64> {
        self.header("Content-Length")?.parse().ok()
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as UTF-8 text.
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(self.body.as_deref()?).ok()
    }

    /// Body parsed as JSON.
    pub fn json(&self) -> Option<Value> {
        serde_json::from_slice(self.body.as_deref()?).ok()
    }
}

/// Renders payloads under a given configuration.
#[derive(Debug, Clone, Copy)]
pub struct ResponseBuilder<'a> {
    config: &'a FetchConfig,
}

impl<'a> ResponseBuilder<'a> {
    pub fn new(config: &'a FetchConfig) -> Self {
        Self { config }
    }

    /// Render `payload` for `method`.
    ///
    /// `Content-Length` always reflects the body a GET would carry, so HEAD
    /// and GET agree on every header.
    pub fn build(
        &self,
        payload: ResolvedPayload,
        method: Method,
        ranges: Option<&[ByteRange]>,
    ) -> HttpResponse {
        let mut headers = self.cors_headers();

        let (status, content_type, body) = match payload {
            ResolvedPayload::Record(value) => (200, JSON_MIME, Bytes::from(value.to_string())),
            ResolvedPayload::Blob {
                id,
                bytes,
                is_partial,
                total_size,
            } => {
                headers.insert("ETag".to_string(), id.canonical_id().to_string());
                headers.insert("Accept-Ranges".to_string(), "bytes".to_string());
                if is_partial {
                    if let (Some([range]), Some(total)) = (ranges, total_size) {
                        headers.insert(
                            "Content-Range".to_string(),
                            content_range(range, bytes.len() as u64, total),
                        );
                    }
                }
                let status = if is_partial { 206 } else { 200 };
                (status, resolve_type(&bytes), bytes)
            }
            ResolvedPayload::Error(err) => {
                if err.is_internal() {
                    tracing::warn!(error = %err, "request failed");
                } else {
                    tracing::debug!(error = %err, "request rejected");
                }
                match err.capability_body() {
                    Some(body) => (err.status(), JSON_MIME, Bytes::from(body.to_string())),
                    None => (
                        err.status(),
                        TEXT_MIME,
                        Bytes::from(err.ui_message(&self.config.bug_report_hint)),
                    ),
                }
            }
        };

        headers.insert("Content-Type".to_string(), content_type.to_string());
        headers.insert("Content-Length".to_string(), body.len().to_string());

        HttpResponse {
            status,
            headers,
            body: match method {
                Method::Get => Some(body),
                Method::Head => None,
            },
        }
    }

    fn cors_headers(&self) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("Access-Control-Allow-Origin".to_string(), "*".to_string()),
            (
                "Access-Control-Allow-Methods".to_string(),
                "GET, HEAD".to_string(),
            ),
            ("Access-Control-Allow-Headers".to_string(), "Range".to_string()),
            (
                "Access-Control-Expose-Headers".to_string(),
                self.config.expose_headers.join(", "),
            ),
        ])
    }
}

/// Render with the default configuration.
pub fn build_response(
    payload: ResolvedPayload,
    method: Method,
    ranges: Option<&[ByteRange]>,
) -> HttpResponse {
    ResponseBuilder::new(&FetchConfig::default()).build(payload, method, ranges)
}

/// `Content-Range` for the bytes actually served from a single range.
fn content_range(range: &ByteRange, served: u64, total: u64) -> String {
    if served == 0 {
        format!("bytes */{total}")
    } else {
        format!("bytes {}-{}/{total}", range.start, range.start + served - 1)
    }
}
