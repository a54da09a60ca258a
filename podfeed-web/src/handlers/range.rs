//! HTTP Range request handling for media streaming
//!
//! Implements the single-range subset of RFC 7233 that audio players use for
//! seeking and resuming. Multi-range and malformed headers are ignored and
//! the whole file is served.

use axum::http::HeaderMap;
use axum::http::header::RANGE;

/// Inclusive byte range inside a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    /// First byte served
    pub start: u64,
    /// Last byte served, inclusive
    pub end: u64,
}

impl ByteRange {
    /// Number of bytes covered
    pub fn length(&self) -> u64 {
        self.end - self.start + 1
    }

    /// `Content-Range` header value for a file of `total_size` bytes
    pub fn content_range(&self, total_size: u64) -> String {
        format!("bytes {}-{}/{}", self.start, self.end, total_size)
    }
}

/// Outcome of interpreting a Range header against a file size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeRequest {
    /// Serve the whole file with 200
    Full,
    /// Serve part of the file with 206
    Partial(ByteRange),
    /// Answer 416
    Unsatisfiable,
}

/// Parse a Range header value for a file of `total_size` bytes.
///
/// Handles `bytes=start-end`, `bytes=start-` and `bytes=-suffix`. The end is
/// clamped to the last byte of the file.
///
/// # Examples
/// ```
/// use podfeed_web::handlers::range::{ByteRange, RangeRequest, parse_range_header};
/// let range = parse_range_header("bytes=100-199", 1000);
/// assert_eq!(range, RangeRequest::Partial(ByteRange { start: 100, end: 199 }));
/// ```
pub fn parse_range_header(range: &str, total_size: u64) -> RangeRequest {
    let Some(range_spec) = range.trim().strip_prefix("bytes=") else {
        return RangeRequest::Full;
    };
    if range_spec.contains(',') {
        return RangeRequest::Full;
    }
    let Some((start_str, end_str)) = range_spec.split_once('-') else {
        return RangeRequest::Full;
    };
    let (start_str, end_str) = (start_str.trim(), end_str.trim());

    if start_str.is_empty() {
        let Ok(suffix) = end_str.parse::<u64>() else {
            return RangeRequest::Full;
        };
        if suffix == 0 || total_size == 0 {
            return RangeRequest::Unsatisfiable;
        }
        return RangeRequest::Partial(ByteRange {
            start: total_size.saturating_sub(suffix),
            end: total_size - 1,
        });
    }

    let Ok(start) = start_str.parse::<u64>() else {
        return RangeRequest::Full;
    };
    let end = if end_str.is_empty() {
        None
    } else {
        match end_str.parse::<u64>() {
            Ok(end) if end >= start => Some(end),
            _ => return RangeRequest::Full,
        }
    };

    if start >= total_size {
        return RangeRequest::Unsatisfiable;
    }

    let last_byte = total_size - 1;
    RangeRequest::Partial(ByteRange {
        start,
        end: end.map_or(last_byte, |end| end.min(last_byte)),
    })
}

/// Interpret the request's Range header, if any.
pub fn range_from_headers(headers: &HeaderMap, total_size: u64) -> RangeRequest {
    headers
        .get(RANGE)
        .and_then(|range| range.to_str().ok())
        .map_or(RangeRequest::Full, |range| {
            parse_range_header(range, total_size)
        })
}
