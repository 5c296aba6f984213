//! HTTP `Range` header parsing.
//!
//! Only the `bytes=` unit is understood. Ranges are kept in the order the
//! client sent them; nothing is sorted, merged or deduplicated.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, Result};

/// The only range unit this layer serves.
pub const BYTES_PREFIX: &str = "bytes=";

/// A single requested byte range.
///
/// `end == None` is an open range running to the end of the resource.
/// The end value is handed to the backend as an exclusive slice bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteRange {
    pub start: u64,
    pub end: Option<u64>,
}

impl ByteRange {
    /// A closed range.
    pub const fn new(start: u64, end: u64) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// A range from `start` to the end of the resource.
    pub const fn open(start: u64) -> Self {
        Self { start, end: None }
    }

    /// Whether the range runs to the end of the resource.
    pub const fn is_open(&self) -> bool {
        self.end.is_none()
    }

    /// The bound passed to the backend slice call. `None` means "through end".
    pub const fn exclusive_end(&self) -> Option<u64> {
        self.end
    }
}

impl fmt::Display for ByteRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.end {
            Some(end) => write!(f, "{}-{}", self.start, end),
            None => write!(f, "{}-", self.start),
        }
    }
}

/// Parse a `Range` header value into its ranges, in request order.
///
/// Whitespace around each comma-separated spec is ignored. A single bad
/// spec invalidates the whole header.
pub fn parse_range(header: &str) -> Result<Vec<ByteRange>> {
    let specs = header
        .trim()
        .strip_prefix(BYTES_PREFIX)
        .ok_or_else(|| malformed(header))?;

    specs
        .split(',')
        .map(|spec| parse_spec(spec.trim()).ok_or_else(|| malformed(header)))
        .collect()
}

fn parse_spec(spec: &str) -> Option<ByteRange> {
    let (start, end) = spec.split_once('-')?;
    let start = parse_offset(start)?;

    if end.is_empty() {
        return Some(ByteRange::open(start));
    }

    let end = parse_offset(end)?;
    (end >= start).then_some(ByteRange::new(start, end))
}

fn parse_offset(s: &str) -> Option<u64> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn malformed(header: &str) -> CoreError {
    CoreError::MalformedRange(header.to_string())
}
