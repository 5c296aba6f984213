//! Resolver configuration.

use ssb_fetch_core::PROFILE_FIELDS;

/// Headers browsers are allowed to read from a response.
pub const DEFAULT_EXPOSE_HEADERS: [&str; 5] = [
    "Content-Type",
    "Content-Length",
    "Content-Range",
    "Accept-Ranges",
    "ETag",
];

/// Configuration for a [`Fetcher`](crate::Fetcher).
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Ask peers for blobs that are not stored locally.
    pub want_missing_blobs: bool,
    /// Profile fields to resolve, in output order.
    pub profile_fields: Vec<String>,
    /// Appended to the body of every 500 response.
    pub bug_report_hint: String,
    /// Value list for `Access-Control-Expose-Headers`.
    pub expose_headers: Vec<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            want_missing_blobs: true,
            profile_fields: PROFILE_FIELDS.iter().map(|f| f.to_string()).collect(),
            bug_report_hint: "Please report this with the URL you requested.".to_string(),
            expose_headers: DEFAULT_EXPOSE_HEADERS.iter().map(|h| h.to_string()).collect(),
        }
    }
}
